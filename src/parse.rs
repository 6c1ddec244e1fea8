//! Structured-parser boundary between text repair and schema validation.
//!
//! Parsing produces the generic value tree (`serde_json::Value`) that the
//! validator consumes. A failure here is fatal for the whole run: there is
//! no record boundary to recover at before the text parses.

use serde_json::Value;

use crate::constants::reporting::CONTEXT_LINE_WIDTH;
use crate::errors::EtlError;

/// Parse repaired text into individual record value trees.
///
/// A single top-level object is treated as a one-record batch.
pub fn parse_records(text: &str) -> Result<Vec<Value>, EtlError> {
    let root: Value = serde_json::from_str(text).map_err(|error| EtlError::Parse {
        line: error.line(),
        column: error.column(),
        message: error.to_string(),
    })?;
    Ok(match root {
        Value::Array(records) => records,
        single => vec![single],
    })
}

/// Render the source lines around a parse-error location, marking the
/// offending line. `line` is 1-based, matching `EtlError::Parse`.
pub fn error_context(text: &str, line: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if line == 0 || lines.is_empty() {
        return String::new();
    }
    let start = line.saturating_sub(2);
    let end = (line + 1).min(lines.len());
    let mut rendered = Vec::new();
    for idx in start..end {
        let marker = if idx + 1 == line { ">>> " } else { "    " };
        let content: String = lines[idx].chars().take(CONTEXT_LINE_WIDTH).collect();
        rendered.push(format!("{marker}line {}: {content}", idx + 1));
    }
    rendered.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_single_record_into_a_batch() {
        let records = parse_records(r#"{"City": "Austin"}"#).expect("parse");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn keeps_array_records_separate() {
        let records = parse_records(r#"[{"a": 1}, {"a": 2}, {"a": 3}]"#).expect("parse");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn reports_error_location() {
        let error = parse_records("{\n  \"City\": oops\n}").expect_err("must fail");
        match error {
            EtlError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_context_marks_the_offending_line() {
        let text = "line one\nline two\nline three";
        let context = error_context(text, 2);
        assert!(context.contains(">>> line 2: line two"));
        assert!(context.contains("    line 1: line one"));
        assert!(context.contains("    line 3: line three"));
    }
}
