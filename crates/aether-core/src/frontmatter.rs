//! Frontmatter codec.
//!
//! Parses and serializes the constrained `key: value` metadata dialect at the
//! top of a note. This is deliberately not a YAML parser: only the four
//! recognized keys survive a round trip, unknown keys are dropped.

use crate::model::NoteMeta;

const DELIMITER: &str = "---";
const BOM: char = '\u{feff}';

/// Split note content into parsed metadata and body.
///
/// Content that does not start with a frontmatter delimiter, or whose block
/// is never closed, passes through untouched with empty metadata. Malformed
/// metadata is never an error. A leading byte-order-mark is stripped before
/// delimiter detection.
pub fn parse(content: &str) -> (NoteMeta, &str) {
    let content = content.strip_prefix(BOM).unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (NoteMeta::default(), content);
    };
    if trim_newline(first) != DELIMITER {
        return (NoteMeta::default(), content);
    }

    let mut meta = NoteMeta::default();
    let mut consumed = first.len();
    let mut closed = false;
    for line in lines {
        consumed += line.len();
        let line = trim_newline(line);
        if line == DELIMITER {
            closed = true;
            break;
        }
        apply_field(&mut meta, line);
    }

    if !closed {
        // Opening delimiter without a closing one: treat the whole content
        // as body, discarding whatever fields were half-read.
        return (NoteMeta::default(), content);
    }
    (meta, &content[consumed..])
}

/// Render metadata and body back into note content.
///
/// Emits a frontmatter block only when at least one recognized field is set.
/// Emission order is fixed (title, pinned, tags, status) regardless of how
/// the metadata was built; absent fields are not emitted.
pub fn serialize(meta: &NoteMeta, body: &str) -> String {
    if meta.is_empty() {
        return body.to_string();
    }

    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    if let Some(title) = &meta.title {
        out.push_str("title: ");
        out.push_str(title);
        out.push('\n');
    }
    if let Some(pinned) = meta.pinned {
        out.push_str("pinned: ");
        out.push_str(if pinned { "true" } else { "false" });
        out.push('\n');
    }
    if let Some(tags) = &meta.tags {
        out.push_str("tags: [");
        out.push_str(&tags.join(", "));
        out.push_str("]\n");
    }
    if let Some(status) = &meta.status {
        out.push_str("status: ");
        out.push_str(status);
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    out
}

fn trim_newline(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

fn apply_field(meta: &mut NoteMeta, line: &str) {
    let Some((key, value)) = line.split_once(':') else {
        return;
    };
    let key = key.trim().to_ascii_lowercase();
    let value = value.trim();
    match key.as_str() {
        "title" => meta.title = Some(unquote(value).to_string()),
        "pinned" => meta.pinned = Some(value.eq_ignore_ascii_case("true")),
        "tags" => meta.tags = Some(parse_tags(value)),
        "status" => meta.status = Some(value.to_lowercase()),
        // Unknown keys are dropped, not preserved.
        _ => {}
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if value.len() >= 2 {
        let (first, last) = (bytes[0], bytes[value.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Either a bracketed list `[a, b]` (empty brackets yield an empty list) or a
/// bare comma-separated list. Entries are trimmed, empty entries dropped,
/// duplicates keep their first occurrence.
fn parse_tags(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    let mut tags: Vec<String> = Vec::new();
    for entry in inner.split(',') {
        let entry = entry.trim();
        if entry.is_empty() || tags.iter().any(|t| t == entry) {
            continue;
        }
        tags.push(entry.to_string());
    }
    tags
}
