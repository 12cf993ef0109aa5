//! Result-key disambiguation for repeated method names.
//!
//! The first call to a name is stored under the bare name with instance 0.
//! When the name recurs while the bare key is still held, the earlier entry
//! moves to `<name>_<n>` for the smallest free `n`, and the new call takes
//! the next smallest free suffix. Later repetitions only take free suffixes.
//! Keys are unique within a batch.

use std::collections::{HashMap, HashSet};

/// Key chosen for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyAssignment {
    pub(crate) key: String,
    pub(crate) instance: u32,
    pub(crate) renamed: Option<Renamed>,
}

/// An earlier entry that must move to a suffixed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Renamed {
    pub(crate) position: usize,
    pub(crate) key: String,
}

/// Allocates result keys for one batch.
#[derive(Debug, Default)]
pub(crate) struct ResultKeys {
    used: HashSet<String>,
    seen: HashSet<String>,
    bare_holders: HashMap<String, usize>,
}

impl ResultKeys {
    /// Assigns a key to the call at `position` requesting `name`.
    pub(crate) fn assign(&mut self, name: &str, position: usize) -> KeyAssignment {
        if let Some(holder) = self.bare_holders.remove(name) {
            self.used.remove(name);
            let (_, moved) = self.claim_suffix(name);
            let (instance, key) = self.claim_suffix(name);
            return KeyAssignment {
                key,
                instance,
                renamed: Some(Renamed {
                    position: holder,
                    key: moved,
                }),
            };
        }

        if self.seen.insert(name.to_owned()) && self.used.insert(name.to_owned()) {
            self.bare_holders.insert(name.to_owned(), position);
            return KeyAssignment {
                key: name.to_owned(),
                instance: 0,
                renamed: None,
            };
        }

        let (instance, key) = self.claim_suffix(name);
        KeyAssignment {
            key,
            instance,
            renamed: None,
        }
    }

    fn claim_suffix(&mut self, name: &str) -> (u32, String) {
        let mut suffix = 0u32;
        loop {
            let key = format!("{name}_{suffix}");
            if self.used.insert(key.clone()) {
                return (suffix, key);
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn keys_for(names: &[&str]) -> Vec<String> {
        let mut allocator = ResultKeys::default();
        let mut keys: Vec<String> = Vec::new();
        for (position, name) in names.iter().enumerate() {
            let assignment = allocator.assign(name, position);
            if let Some(renamed) = assignment.renamed {
                if let Some(slot) = keys.get_mut(renamed.position) {
                    *slot = renamed.key;
                }
            }
            keys.push(assignment.key);
        }
        keys
    }

    #[test]
    fn first_use_keeps_bare_name() {
        let mut allocator = ResultKeys::default();
        let assignment = allocator.assign("Math.Add", 0);
        assert_eq!(
            assignment,
            KeyAssignment {
                key: String::from("Math.Add"),
                instance: 0,
                renamed: None
            }
        );
    }

    #[test]
    fn second_use_renames_first() {
        let mut allocator = ResultKeys::default();
        allocator.assign("Foo.Bar", 0);
        let assignment = allocator.assign("Foo.Bar", 1);
        assert_eq!(assignment.key, "Foo.Bar_1");
        assert_eq!(assignment.instance, 1);
        assert_eq!(
            assignment.renamed,
            Some(Renamed {
                position: 0,
                key: String::from("Foo.Bar_0")
            })
        );
    }

    #[rstest]
    #[case::two(&["A", "A"], &["A_0", "A_1"])]
    #[case::three(&["A", "A", "A"], &["A_0", "A_1", "A_2"])]
    #[case::interleaved(&["A", "B", "A", "B"], &["A_0", "B_0", "A_1", "B_1"])]
    #[case::suffix_taken_by_literal(&["A_0", "A", "A"], &["A_0", "A_1", "A_2"])]
    #[case::literal_after_suffix(&["A", "A", "A_0"], &["A_0", "A_1", "A_0_0"])]
    fn disambiguates(#[case] names: &[&str], #[case] expected: &[&str]) {
        assert_eq!(keys_for(names), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    fn repeated_names_get_distinct_keys(#[case] count: usize) {
        let names = vec!["Foo.Bar"; count];
        let keys = keys_for(&names);
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), count);
    }
}
