//! Rule-based text repair for malformed property-record exports.
//!
//! Each rule is a single leftmost-first, non-overlapping pass over the text;
//! rules run in a fixed order because later rules assume earlier ones have
//! already normalized syntax. The engine never fails — it applies its known
//! heuristics once and leaves any residual defect for the parser to report.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::constants::repair::{
    NUMBER_SCALES, NUMBER_TENS, NUMBER_UNITS, RESERVED_WORDS, RULE_BAREWORD, RULE_NUMBER_UNIT,
    RULE_STRAY_NUMBER, RULE_TRAILING_COMMA, RULE_UNQUOTED_KEY,
};
use crate::types::RuleName;

/// One applied fix, recorded for diagnostics only and never re-parsed.
#[derive(Clone, Debug, Serialize)]
pub struct RepairLogEntry {
    /// Which rule produced the fix.
    pub rule: RuleName,
    /// Human-readable account of what changed.
    pub description: String,
    /// The matched text before the rewrite.
    pub original_fragment: String,
    /// The text spliced in instead.
    pub replacement_fragment: String,
}

/// Repaired text plus the ordered fixes that produced it.
#[derive(Clone, Debug)]
pub struct RepairOutcome {
    /// Best-effort structurally-parseable text.
    pub text: String,
    /// Fixes in application order.
    pub fixes: Vec<RepairLogEntry>,
}

static BAREWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*([A-Z][A-Za-z]*)\s*([,}\]])").expect("bareword pattern"));
static NUMBER_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":\s*(\d+(?:\.\d+)?)\s+([a-z]+)\s*([,}\]])").expect("number-unit pattern")
});
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing-comma pattern"));
static UNQUOTED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("unquoted-key pattern"));
static STRAY_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*(\d+)\s*([,}])").expect("stray-number pattern"));

/// Apply every repair rule once, in order, over `raw`.
///
/// Pure function of its input; the output is not guaranteed to parse.
pub fn repair(raw: &str) -> RepairOutcome {
    let mut fixes = Vec::new();
    let text = quote_barewords(raw, &mut fixes);
    let text = quote_numbers_with_units(&text, &mut fixes);
    let text = strip_trailing_commas(&text, &mut fixes);
    let text = quote_object_keys(&text, &mut fixes);
    let text = drop_stray_numbers(&text, &mut fixes);
    RepairOutcome { text, fixes }
}

/// Convert a single spelled-out number token to its value, if it is one.
pub fn spelled_number(word: &str) -> Option<u64> {
    let lower = word.to_ascii_lowercase();
    if let Some(position) = NUMBER_UNITS.iter().position(|unit| *unit == lower) {
        return Some(position as u64);
    }
    if let Some(position) = NUMBER_TENS.iter().position(|tens| *tens == lower) {
        return Some(20 + 10 * position as u64);
    }
    NUMBER_SCALES
        .iter()
        .find(|(scale, _)| *scale == lower)
        .map(|(_, value)| *value)
}

fn record_fix(
    fixes: &mut Vec<RepairLogEntry>,
    rule: RuleName,
    description: String,
    original: &str,
    replacement: &str,
) {
    fixes.push(RepairLogEntry {
        rule,
        description,
        original_fragment: original.to_string(),
        replacement_fragment: replacement.to_string(),
    });
}

/// Rule 1: a capitalized bareword value is either a spelled-out number
/// (replaced by digits) or a missing-quotes string (wrapped in quotes).
/// Reserved words pass through untouched.
fn quote_barewords(text: &str, fixes: &mut Vec<RepairLogEntry>) -> String {
    BAREWORD_RE
        .replace_all(text, |caps: &Captures| {
            let word = &caps[1];
            let delimiter = &caps[2];
            if RESERVED_WORDS
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(word))
            {
                return caps[0].to_string();
            }
            let (replacement, description) = match spelled_number(word) {
                Some(value) => (
                    format!(": {value}{delimiter}"),
                    format!("converted number word '{word}' to {value}"),
                ),
                None => (
                    format!(": \"{word}\"{delimiter}"),
                    format!("quoted bareword '{word}'"),
                ),
            };
            record_fix(fixes, RULE_BAREWORD, description, &caps[0], &replacement);
            replacement
        })
        .into_owned()
}

/// Rule 2: a bare number followed by a lowercase unit token is re-quoted as
/// one string value, e.g. `: 5649 sqft,` becomes `: "5649 sqft",`.
fn quote_numbers_with_units(text: &str, fixes: &mut Vec<RepairLogEntry>) -> String {
    NUMBER_UNIT_RE
        .replace_all(text, |caps: &Captures| {
            let number = &caps[1];
            let unit = &caps[2];
            let delimiter = &caps[3];
            let replacement = format!(": \"{number} {unit}\"{delimiter}");
            record_fix(
                fixes,
                RULE_NUMBER_UNIT,
                format!("quoted number with unit '{number} {unit}'"),
                &caps[0],
                &replacement,
            );
            replacement
        })
        .into_owned()
}

/// Rule 3: delete a comma that immediately precedes a closing delimiter.
fn strip_trailing_commas(text: &str, fixes: &mut Vec<RepairLogEntry>) -> String {
    TRAILING_COMMA_RE
        .replace_all(text, |caps: &Captures| {
            let delimiter = &caps[1];
            record_fix(
                fixes,
                RULE_TRAILING_COMMA,
                format!("removed trailing comma before '{delimiter}'"),
                &caps[0],
                delimiter,
            );
            delimiter.to_string()
        })
        .into_owned()
}

/// Rule 4: quote a bare identifier used as an object key right after `{`.
fn quote_object_keys(text: &str, fixes: &mut Vec<RepairLogEntry>) -> String {
    UNQUOTED_KEY_RE
        .replace_all(text, |caps: &Captures| {
            let key = &caps[1];
            let replacement = format!("{{\"{key}\":");
            record_fix(
                fixes,
                RULE_UNQUOTED_KEY,
                format!("quoted unquoted key '{key}'"),
                &caps[0],
                &replacement,
            );
            replacement
        })
        .into_owned()
}

/// Rule 5: delete a bare number sitting between a comma and a following
/// delimiter, but only when the innermost enclosing container is an object —
/// inside an array the same shape is a legitimate value and must survive.
fn drop_stray_numbers(text: &str, fixes: &mut Vec<RepairLogEntry>) -> String {
    let mut scanner = ContainerScanner::new(text);
    let mut repaired = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in STRAY_NUMBER_RE.captures_iter(text) {
        let whole = caps.get(0).expect("whole match");
        if !scanner.object_at(whole.start()) {
            continue;
        }
        let number = &caps[1];
        let delimiter = &caps[2];
        repaired.push_str(&text[last_end..whole.start()]);
        repaired.push_str(delimiter);
        record_fix(
            fixes,
            RULE_STRAY_NUMBER,
            format!("removed stray number '{number}' in object"),
            whole.as_str(),
            delimiter,
        );
        last_end = whole.end();
    }
    repaired.push_str(&text[last_end..]);
    repaired
}

/// Incremental bracket-nesting scanner; positions must be queried in
/// increasing order.
struct ContainerScanner<'a> {
    bytes: &'a [u8],
    cursor: usize,
    stack: Vec<u8>,
    in_string: bool,
    escaped: bool,
}

impl<'a> ContainerScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            cursor: 0,
            stack: Vec::new(),
            in_string: false,
            escaped: false,
        }
    }

    /// True when the innermost open container at `position` is an object.
    fn object_at(&mut self, position: usize) -> bool {
        while self.cursor < position && self.cursor < self.bytes.len() {
            let byte = self.bytes[self.cursor];
            self.cursor += 1;
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }
            match byte {
                b'"' => self.in_string = true,
                b'{' | b'[' => self.stack.push(byte),
                b'}' | b']' => {
                    self.stack.pop();
                }
                _ => {}
            }
        }
        self.stack.last() == Some(&b'{')
    }
}
