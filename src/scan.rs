//! Structural locator for JSON-like target files.
//!
//! Target files mix JSON with template syntax (`{{ ... }}`), so a real JSON
//! parser cannot round-trip them. This module is a minimal byte scanner
//! instead: it finds a named key at object-nesting depth 1 and returns the
//! byte span of its value, so callers can splice a replacement while leaving
//! every surrounding byte untouched.
//!
//! Depth counting considers only `{` and `}`; quoted strings (including
//! escaped quotes) are skipped wholesale so braces inside them never count.

use crate::errors::ScanError;

/// Half-open byte range within a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering all of `contents`.
    pub fn whole(contents: &str) -> Self {
        Self::new(0, contents.len())
    }
}

/// A located key and the span of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValue {
    /// Byte offset of the opening quote of the key.
    pub key_pos: usize,
    pub value: Span,
}

/// Find `key` at object-nesting depth 1 within `contents[within]` and return
/// the span of its value.
///
/// With `within` covering the whole document this matches keys directly
/// inside the outermost object; with `within` covering an object value it
/// matches the keys of that object.
pub fn find_key_value(contents: &str, within: Span, key: &str) -> Result<KeyValue, ScanError> {
    let bytes = contents.as_bytes();
    let mut depth = 0i32;
    let mut i = within.start;
    while i < within.end {
        match bytes[i] {
            b'"' => {
                let (token, close) = scan_string(contents, i)?;
                if depth == 1 && token == key {
                    let key_pos = i;
                    let mut j = skip_spaces(contents, close + 1);
                    if j >= contents.len() || bytes[j] != b':' {
                        return Err(ScanError::MissingColon(key.to_string()));
                    }
                    j = skip_spaces(contents, j + 1);
                    if j >= contents.len() {
                        return Err(ScanError::MissingValue(key.to_string()));
                    }
                    let value_end = find_value_end(contents, j)?;
                    return Ok(KeyValue {
                        key_pos,
                        value: Span::new(j, value_end),
                    });
                }
                i = close;
            }
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    Err(ScanError::KeyNotFound(key.to_string()))
}

/// Like [`find_key_value`], but require the value to be an object.
pub fn find_object_value(contents: &str, within: Span, key: &str) -> Result<KeyValue, ScanError> {
    let found = find_key_value(contents, within, key)?;
    if contents.as_bytes()[found.value.start] != b'{' {
        return Err(ScanError::NotAnObject(key.to_string()));
    }
    Ok(found)
}

/// Exclusive end of the value starting at `start`.
///
/// Objects and arrays end after their matching delimiter, strings after the
/// closing quote, and bare scalars before the first separator (`,`,
/// whitespace, or `}`).
pub fn find_value_end(contents: &str, start: usize) -> Result<usize, ScanError> {
    let bytes = contents.as_bytes();
    match bytes[start] {
        b'{' => Ok(find_matching_brace(contents, start)? + 1),
        b'[' => Ok(find_matching_bracket(contents, start)? + 1),
        b'"' => {
            let (_, close) = scan_string(contents, start)?;
            Ok(close + 1)
        }
        _ => {
            for (i, &b) in bytes.iter().enumerate().skip(start) {
                match b {
                    b',' | b'\n' | b'\r' | b'\t' | b' ' | b'}' => return Ok(i),
                    _ => {}
                }
            }
            Ok(contents.len())
        }
    }
}

/// Byte offset of the `}` matching the `{` at `start`.
fn find_matching_brace(contents: &str, start: usize) -> Result<usize, ScanError> {
    let bytes = contents.as_bytes();
    let mut depth = 0i32;
    let mut i = start;
    while i < contents.len() {
        match bytes[i] {
            b'"' => {
                let (_, close) = scan_string(contents, i)?;
                i = close;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ScanError::UnterminatedObject(start))
}

/// Byte offset of the `]` matching the `[` at `start`.
fn find_matching_bracket(contents: &str, start: usize) -> Result<usize, ScanError> {
    let bytes = contents.as_bytes();
    let mut depth = 0i32;
    let mut i = start;
    while i < contents.len() {
        match bytes[i] {
            b'"' => {
                let (_, close) = scan_string(contents, i)?;
                i = close;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ScanError::UnterminatedArray(start))
}

/// Scan the quoted string opening at `start`; return its contents and the
/// byte offset of the closing quote. Escaped quotes do not terminate.
fn scan_string(contents: &str, start: usize) -> Result<(&str, usize), ScanError> {
    let bytes = contents.as_bytes();
    let mut escaped = false;
    let mut i = start + 1;
    while i < contents.len() {
        if escaped {
            escaped = false;
        } else {
            match bytes[i] {
                b'\\' => escaped = true,
                b'"' => return Ok((&contents[start + 1..i], i)),
                _ => {}
            }
        }
        i += 1;
    }
    Err(ScanError::UnterminatedString(start))
}

fn skip_spaces(contents: &str, start: usize) -> usize {
    let bytes = contents.as_bytes();
    let mut i = start;
    while i < contents.len() {
        match bytes[i] {
            b' ' | b'\n' | b'\r' | b'\t' => i += 1,
            _ => return i,
        }
    }
    contents.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
  "permission": {
    "bash": {
      "old": "value"
    },
    "other": 1
  },
  "list": [1, {"nested": "}"}],
  "name": "a \"quoted\" brace {"
}"#;

    fn value_of(contents: &str, key: &str) -> String {
        let kv = find_key_value(contents, Span::whole(contents), key).unwrap();
        contents[kv.value.start..kv.value.end].to_string()
    }

    #[test]
    fn test_find_object_value() {
        let kv = find_object_value(DOC, Span::whole(DOC), "permission").unwrap();
        assert!(DOC[kv.value.start..kv.value.end].starts_with("{\n    \"bash\""));
        assert!(DOC[kv.value.start..kv.value.end].ends_with('}'));
    }

    #[test]
    fn test_find_nested_key_within_object() {
        let outer = find_object_value(DOC, Span::whole(DOC), "permission").unwrap();
        let inner = find_key_value(DOC, outer.value, "bash").unwrap();
        assert_eq!(
            &DOC[inner.value.start..inner.value.end],
            "{\n      \"old\": \"value\"\n    }"
        );
    }

    #[test]
    fn test_nested_keys_do_not_match_at_top_level() {
        let err = find_key_value(DOC, Span::whole(DOC), "old").unwrap_err();
        assert_eq!(err, ScanError::KeyNotFound("old".to_string()));
    }

    #[test]
    fn test_array_value_with_embedded_brace_strings() {
        assert_eq!(value_of(DOC, "list"), r#"[1, {"nested": "}"}]"#);
    }

    #[test]
    fn test_string_value_with_escaped_quotes() {
        assert_eq!(value_of(DOC, "name"), r#""a \"quoted\" brace {""#);
    }

    #[test]
    fn test_scalar_value_stops_at_separator() {
        assert_eq!(value_of(DOC, "other"), "1");
        let doc = "{\"n\": true}";
        assert_eq!(value_of(doc, "n"), "true");
    }

    #[test]
    fn test_template_syntax_outside_region_is_tolerated() {
        let doc = "{{- if .work }}\n{\n  \"permission\": { \"bash\": {} }\n}\n{{- end }}";
        let kv = find_object_value(doc, Span::whole(doc), "permission").unwrap();
        assert_eq!(&doc[kv.value.start..kv.value.end], "{ \"bash\": {} }");
    }

    #[test]
    fn test_key_not_found() {
        let err = find_key_value("{}", Span::whole("{}"), "permission").unwrap_err();
        assert_eq!(err, ScanError::KeyNotFound("permission".to_string()));
    }

    #[test]
    fn test_value_must_be_object() {
        let doc = "{\"permission\": []}";
        let err = find_object_value(doc, Span::whole(doc), "permission").unwrap_err();
        assert_eq!(err, ScanError::NotAnObject("permission".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let doc = "{\"permission";
        let err = find_key_value(doc, Span::whole(doc), "permission").unwrap_err();
        assert_eq!(err, ScanError::UnterminatedString(1));
    }

    #[test]
    fn test_unterminated_object() {
        let doc = "{\"permission\": {\"bash\": 1}";
        let kv = find_key_value(doc, Span::whole(doc), "permission").unwrap();
        assert_eq!(&doc[kv.value.start..kv.value.end], "{\"bash\": 1}");
        let err = find_object_value(doc, Span::whole(doc), "missing").unwrap_err();
        assert_eq!(err, ScanError::KeyNotFound("missing".to_string()));
    }

    #[test]
    fn test_unterminated_object_value() {
        let doc = "{\"permission\": {\"bash\": 1";
        let err = find_key_value(doc, Span::whole(doc), "permission").unwrap_err();
        assert_eq!(err, ScanError::UnterminatedObject(15));
    }
}
