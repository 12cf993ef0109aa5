//! File reference tokens shared by the client, the splitter and dispatch.
//!
//! Clients name every file field `file:::<method>_<instance>_files_<field>_<file>`
//! and pass the same text as a call argument to say which call should receive
//! the file. The method part may itself contain underscores and dots, so the
//! four trailing segments are taken from the right.

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// Marker that prefixes every file reference.
pub const FILE_SENTINEL: &str = "file:::";

/// Literal segment separating the instance number from the field number.
const FILES_SEGMENT: &str = "files";

/// Errors produced while parsing a file reference.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// A field name did not start with [`FILE_SENTINEL`].
    #[error("'{value}' does not start with '{FILE_SENTINEL}'")]
    MissingSentinel {
        /// Rejected text.
        value: String,
    },

    /// The token did not have the `<method>_<instance>_files_<field>_<file>` shape.
    #[error("'{value}' is not a file reference: {reason}")]
    Malformed {
        /// Rejected text.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// One of the numeric segments was not a non-negative integer.
    #[error("'{value}' has a non-numeric {segment} segment: {source}")]
    InvalidNumber {
        /// Rejected text.
        value: String,
        /// Which segment failed to parse.
        segment: &'static str,
        /// Integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Parsed `<method>_<instance>_files_<field>_<file>` reference.
///
/// # Example
///
/// ```
/// use courier_multipart::FileToken;
///
/// let token = FileToken::from_field_name("file:::Up.Save_0_files_1_2").unwrap();
/// assert_eq!(token.method(), "Up.Save");
/// assert_eq!((token.instance(), token.field(), token.file()), (0, 1, 2));
/// assert_eq!(token.to_string(), "Up.Save_0_files_1_2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileToken {
    method: String,
    instance: u32,
    field: u32,
    file: u32,
}

impl FileToken {
    /// Creates a token from its parts.
    #[must_use]
    pub fn new(method: impl Into<String>, instance: u32, field: u32, file: u32) -> Self {
        Self {
            method: method.into(),
            instance,
            field,
            file,
        }
    }

    /// Parses a bare token (without the sentinel prefix).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] when the layout is wrong and
    /// [`TokenError::InvalidNumber`] when a numeric segment does not parse.
    pub fn parse(value: &str) -> Result<Self, TokenError> {
        let malformed = |reason| TokenError::Malformed {
            value: value.to_owned(),
            reason,
        };

        let mut segments = value.rsplitn(5, '_');
        let file = segments.next().ok_or_else(|| malformed("missing file number"))?;
        let field = segments
            .next()
            .ok_or_else(|| malformed("missing field number"))?;
        let marker = segments
            .next()
            .ok_or_else(|| malformed("missing 'files' marker"))?;
        let instance = segments
            .next()
            .ok_or_else(|| malformed("missing instance number"))?;
        let method = segments
            .next()
            .ok_or_else(|| malformed("missing method name"))?;

        if marker != FILES_SEGMENT {
            return Err(malformed("missing 'files' marker"));
        }
        if method.trim().is_empty() {
            return Err(malformed("missing method name"));
        }

        Ok(Self {
            method: method.to_owned(),
            instance: parse_number(value, instance, "instance")?,
            field: parse_number(value, field, "field")?,
            file: parse_number(value, file, "file")?,
        })
    }

    /// Parses a multipart field name, which must carry the sentinel prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSentinel`] when the prefix is absent, or
    /// any error from [`FileToken::parse`].
    pub fn from_field_name(name: &str) -> Result<Self, TokenError> {
        let bare = name
            .strip_prefix(FILE_SENTINEL)
            .ok_or_else(|| TokenError::MissingSentinel {
                value: name.to_owned(),
            })?;
        Self::parse(bare)
    }

    /// Qualified method name the file belongs to.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Call instance number within the batch.
    #[must_use]
    pub const fn instance(&self) -> u32 {
        self.instance
    }

    /// Argument field number.
    #[must_use]
    pub const fn field(&self) -> u32 {
        self.field
    }

    /// File number within the field.
    #[must_use]
    pub const fn file(&self) -> u32 {
        self.file
    }

    /// Renders the multipart field name for this token.
    #[must_use]
    pub fn field_name(&self) -> String {
        format!("{FILE_SENTINEL}{self}")
    }
}

impl fmt::Display for FileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{FILES_SEGMENT}_{}_{}",
            self.method, self.instance, self.field, self.file
        )
    }
}

fn parse_number(value: &str, segment_text: &str, segment: &'static str) -> Result<u32, TokenError> {
    segment_text
        .parse()
        .map_err(|source| TokenError::InvalidNumber {
            value: value.to_owned(),
            segment,
            source,
        })
}

/// Returns `true` when the text holds at least one file reference.
#[must_use]
pub fn contains_reference(text: &str) -> bool {
    text.contains(FILE_SENTINEL)
}

/// Splits text on the sentinel and yields each non-empty bare token.
///
/// Separators commonly placed between references (commas and whitespace)
/// are trimmed from every token.
pub fn split_references(text: &str) -> impl Iterator<Item = &str> {
    text.split(FILE_SENTINEL)
        .map(|piece| piece.trim_matches(|c: char| c == ',' || c.is_whitespace()))
        .filter(|piece| !piece.is_empty())
}
