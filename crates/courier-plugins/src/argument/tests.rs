//! Unit tests for argument conversion and typed access.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::tests::uploaded_files;

#[fixture]
fn args() -> Arguments {
    Arguments::from_json(vec![
        json!(7),
        json!("text"),
        json!(true),
        json!([1, "two"]),
        json!({"k": null}),
        json!(1.5),
    ])
}

#[test]
fn json_objects_become_maps() {
    let argument = Argument::from(json!({"b": [1], "a": {"c": false}}));
    let Argument::Map(entries) = argument else {
        panic!("expected map");
    };
    let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert!(matches!(entries.get("b"), Some(Argument::List(items)) if items.len() == 1));
}

#[rstest]
fn typed_accessors_read_matching_shapes(args: Arguments) {
    assert_eq!(args.integer(0), Ok(7));
    assert_eq!(args.string(1), Ok("text"));
    assert_eq!(args.boolean(2), Ok(true));
    assert_eq!(args.list(3).map(<[Argument]>::len), Ok(2));
    assert!(args.map(4).is_ok_and(|entries| entries.contains_key("k")));
    assert_eq!(args.number(5).map(Number::as_f64), Ok(Some(1.5)));
}

#[rstest]
#[case::wrong_shape(1, ArgumentError::TypeMismatch { index: 1, expected: "integer", found: "string" })]
#[case::fractional(5, ArgumentError::TypeMismatch { index: 5, expected: "integer", found: "number" })]
#[case::absent(9, ArgumentError::Missing { index: 9 })]
fn integer_reports_position(args: Arguments, #[case] index: usize, #[case] expected: ArgumentError) {
    assert_eq!(args.integer(index), Err(expected));
}

#[test]
fn take_files_moves_files_out_once() {
    let files = uploaded_files("Up.Save", &[b"one".as_slice(), b"two".as_slice()]);
    let mut args = Arguments::new(vec![Argument::Files(files)]);

    let taken = args.take_files(0).expect("files");
    assert_eq!(taken.len(), 2);
    assert_eq!(args.take_files(0).map(|rest| rest.len()), Ok(0));
}

#[rstest]
fn take_files_rejects_other_shapes(mut args: Arguments) {
    let err = args.take_files(0).expect_err("not files");
    assert_eq!(
        err,
        ArgumentError::TypeMismatch {
            index: 0,
            expected: "files",
            found: "number"
        }
    );
}
