//! Unit tests for boundary scanning and bounded copies.

use std::io::Cursor;

use rstest::rstest;

use super::*;

// ---------------------------------------------------------------------------
// Boundary extraction
// ---------------------------------------------------------------------------

#[test]
fn extracts_token_before_carriage_return() {
    let boundary = find_boundary_token(b"--XyZ\r\nContent-Disposition").expect("boundary");
    assert_eq!(boundary.as_bytes(), b"--XyZ");
    assert_eq!(boundary.to_string(), "--XyZ");
}

#[test]
fn rejects_body_without_carriage_return() {
    let err = find_boundary_token(&[b'-'; 200]).expect_err("no terminator");
    assert!(matches!(err, MultipartError::MalformedBoundary { limit: 60 }));
}

#[rstest]
#[case::just_inside(59, true)]
#[case::at_limit(60, false)]
#[case::far_beyond(120, false)]
fn never_looks_past_scan_limit(#[case] cr_position: usize, #[case] accepted: bool) {
    let mut body = vec![b'a'; cr_position];
    body.extend_from_slice(b"\r\n");
    assert_eq!(find_boundary_token(&body).is_ok(), accepted);
}

#[test]
fn rejects_empty_boundary() {
    let err = find_boundary_token(b"\r\nrest").expect_err("empty");
    assert!(matches!(err, MultipartError::EmptyBoundary));
}

// ---------------------------------------------------------------------------
// Position search
// ---------------------------------------------------------------------------

#[rstest]
#[case::start(b"--b\r\nabc".as_slice(), 0, PartLocation::At(0))]
#[case::middle(b"xx--b yy".as_slice(), 0, PartLocation::At(2))]
#[case::skips_earlier(b"--b--b".as_slice(), 1, PartLocation::At(3))]
#[case::absent(b"no boundary here".as_slice(), 0, PartLocation::End)]
#[case::offset_past_end(b"--b".as_slice(), 10, PartLocation::End)]
fn finds_needle(#[case] haystack: &[u8], #[case] from: u64, #[case] expected: PartLocation) {
    let mut stream = Cursor::new(haystack.to_vec());
    let found = find_position(&mut stream, b"--b", from).expect("search");
    assert_eq!(found, expected);
}

#[test]
fn finds_needle_after_repeated_prefix() {
    // The needle's own prefix repeats, which defeats a cursor that only resets.
    let mut stream = Cursor::new(b"-------boundary".to_vec());
    let found = find_position(&mut stream, b"------boundary", 0).expect("search");
    assert_eq!(found, PartLocation::At(1));
}

#[test]
fn lists_every_occurrence() {
    let body = b"--b\r\none\r\n--b\r\ntwo\r\n--b--\r\n".to_vec();
    let mut stream = Cursor::new(body);
    let mut offsets = Vec::new();
    let mut from = 0;
    while let PartLocation::At(offset) = find_position(&mut stream, b"--b", from).expect("scan") {
        offsets.push(offset);
        from = offset + 3;
    }
    assert_eq!(offsets, vec![0, 10, 20]);
}

// ---------------------------------------------------------------------------
// Bounded copies
// ---------------------------------------------------------------------------

fn sample_bytes() -> Vec<u8> {
    (0..=255u8).cycle().take(300_000).collect()
}

#[rstest]
#[case::single_byte(1)]
#[case::odd(7_919)]
#[case::default(128 * 1024)]
fn copy_is_identical_for_any_chunk_size(#[case] chunk_size: usize) {
    let data = sample_bytes();
    let mut source = Cursor::new(data.clone());
    let mut copy = Vec::new();
    let copied = copy_range(&mut source, 0, data.len() as u64, &mut copy, chunk_size)
        .expect("copy");
    assert_eq!(copied, data.len() as u64);
    assert_eq!(copy, data);
}

#[test]
fn copies_only_requested_range() {
    let mut source = Cursor::new(b"0123456789".to_vec());
    let mut copy = Vec::new();
    copy_range(&mut source, 2, 6, &mut copy, 3).expect("copy");
    assert_eq!(copy, b"2345");
}

#[test]
fn stops_quietly_at_end_of_source() {
    let mut source = Cursor::new(b"short".to_vec());
    let mut copy = Vec::new();
    let copied = copy_range(&mut source, 1, 100, &mut copy, 2).expect("copy");
    assert_eq!(copied, 4);
    assert_eq!(copy, b"hort");
}

#[test]
fn empty_range_copies_nothing() {
    let mut source = Cursor::new(b"data".to_vec());
    let mut copy = Vec::new();
    assert_eq!(copy_range(&mut source, 3, 3, &mut copy, 8).expect("copy"), 0);
    assert!(copy.is_empty());
}
