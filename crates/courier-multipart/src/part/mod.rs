//! Header parsing for individual body parts.
//!
//! A part starts with the boundary line, followed by header lines, a blank
//! line and the content. Only the headers this layout uses are understood:
//! `Content-Disposition` (field name and file name) and `Content-Type`.

/// Signature that marks the call-map field.
const CALL_MAP_SIGNATURE: &[u8] = b"Content-Disposition: form-data; name=\"map\"";

/// Signature that marks the correlation-id field.
const CORRELATION_ID_SIGNATURE: &[u8] = b"Content-Disposition: form-data; name=\"id\"";

/// Maximum size of a part's boundary line plus header block.
pub(crate) const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Length of a canonical hyphenated UUID string.
pub(crate) const CORRELATION_ID_LEN: usize = 36;

const LINE_END: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

/// Well-known field a part announces right after its boundary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signature {
    CallMap,
    CorrelationId,
    Other,
}

/// Classifies a part by peeking at the line after the boundary.
pub(crate) fn signature(head: &[u8], boundary_len: usize) -> Signature {
    let Some(after_boundary) = head
        .get(boundary_len..)
        .and_then(|rest| rest.strip_prefix(LINE_END))
    else {
        return Signature::Other;
    };

    if after_boundary.starts_with(CALL_MAP_SIGNATURE) {
        Signature::CallMap
    } else if after_boundary.starts_with(CORRELATION_ID_SIGNATURE) {
        Signature::CorrelationId
    } else {
        Signature::Other
    }
}

/// Parsed header block of one part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PartHead {
    /// Bytes from the start of the part to the first content byte.
    pub(crate) content_offset: usize,
    /// Value of the `name` disposition parameter.
    pub(crate) field_name: Option<String>,
    /// Value of the `filename` disposition parameter.
    pub(crate) file_name: Option<String>,
    /// Value of the `Content-Type` header.
    pub(crate) content_type: Option<String>,
}

/// Parses the boundary line and header block at the start of `head`.
///
/// Returns `None` when the header block is not terminated within `head`.
pub(crate) fn parse_head(head: &[u8], boundary_len: usize) -> Option<PartHead> {
    let after_boundary = head.get(boundary_len..)?;
    let header_end = find(after_boundary, HEADER_END)?;
    let (block, _) = after_boundary.split_at(header_end);
    let headers = block.strip_prefix(LINE_END).unwrap_or(block);

    let mut parsed = PartHead {
        content_offset: boundary_len + header_end + HEADER_END.len(),
        ..PartHead::default()
    };

    let text = String::from_utf8_lossy(headers);
    for line in text.split("\r\n") {
        let Some((name, raw_value)) = line.split_once(':') else {
            continue;
        };
        let value = raw_value.trim();
        if name.trim().eq_ignore_ascii_case("content-disposition") {
            apply_disposition(&mut parsed, value);
        } else if name.trim().eq_ignore_ascii_case("content-type") && !value.is_empty() {
            parsed.content_type = Some(value.to_owned());
        }
    }

    Some(parsed)
}

fn apply_disposition(head: &mut PartHead, value: &str) {
    for (key, param) in parameters(value) {
        if key.eq_ignore_ascii_case("name") {
            head.field_name = Some(param);
        } else if key.eq_ignore_ascii_case("filename") {
            head.file_name = Some(param);
        }
    }
}

/// Splits `form-data; key="value"; ...` into key/value pairs.
///
/// Semicolons inside quoted values do not split.
fn parameters(value: &str) -> Vec<(String, String)> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in value.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                current.push(ch);
            }
            ';' if !quoted => pieces.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    pieces.push(current);

    pieces
        .iter()
        .filter_map(|piece| piece.split_once('='))
        .map(|(key, raw)| {
            let trimmed = raw.trim();
            let unquoted = trimmed
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(trimmed);
            (key.trim().to_owned(), unquoted.to_owned())
        })
        .collect()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
