/// Constants used by the text repair engine.
pub mod repair {
    /// JSON reserved words that bareword repair must leave untouched.
    pub const RESERVED_WORDS: [&str; 3] = ["true", "false", "null"];

    /// Spelled-out values zero through nineteen, indexed by value.
    pub const NUMBER_UNITS: [&str; 20] = [
        "zero",
        "one",
        "two",
        "three",
        "four",
        "five",
        "six",
        "seven",
        "eight",
        "nine",
        "ten",
        "eleven",
        "twelve",
        "thirteen",
        "fourteen",
        "fifteen",
        "sixteen",
        "seventeen",
        "eighteen",
        "nineteen",
    ];
    /// Spelled-out tens values twenty through ninety, indexed from twenty.
    pub const NUMBER_TENS: [&str; 8] = [
        "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];
    /// Spelled-out scale words accepted as standalone number tokens.
    pub const NUMBER_SCALES: [(&str, u64); 3] =
        [("hundred", 100), ("thousand", 1_000), ("million", 1_000_000)];

    /// Rule name emitted for bareword-after-colon repairs.
    pub const RULE_BAREWORD: &str = "bareword_value";
    /// Rule name emitted for numeric-with-trailing-unit repairs.
    pub const RULE_NUMBER_UNIT: &str = "number_with_unit";
    /// Rule name emitted for trailing-comma removals.
    pub const RULE_TRAILING_COMMA: &str = "trailing_comma";
    /// Rule name emitted for unquoted-object-key repairs.
    pub const RULE_UNQUOTED_KEY: &str = "unquoted_key";
    /// Rule name emitted for stray-number removals.
    pub const RULE_STRAY_NUMBER: &str = "stray_number";
}

/// Canonical tokens used by yes/no flag normalization.
pub mod flags {
    /// Canonical affirmative flag token.
    pub const FLAG_YES: &str = "YES";
    /// Canonical negative flag token.
    pub const FLAG_NO: &str = "NO";
}

/// Environment keys and defaults consumed by `EtlConfig`.
pub mod config {
    /// Environment variable naming the raw input file.
    pub const ENV_INPUT_FILE: &str = "JSON_INPUT_FILE";
    /// Environment variable capping the number of records processed (0 = unlimited).
    pub const ENV_MAX_RECORDS: &str = "MAX_RECORDS";
    /// Environment variable controlling whether rejected records are skipped.
    pub const ENV_SKIP_INVALID: &str = "SKIP_INVALID";
    /// Environment variable sizing row batches handed to storage sinks.
    pub const ENV_BATCH_SIZE: &str = "BATCH_SIZE";

    /// Default raw input file path.
    pub const DEFAULT_INPUT_FILE: &str = "data/property_records.json";
    /// Default storage batch size.
    pub const DEFAULT_BATCH_SIZE: usize = 1000;
}

/// Constants used by validation and runner progress reporting.
pub mod reporting {
    /// Sequential validation logs progress every this many records.
    pub const PROGRESS_LOG_INTERVAL: usize = 100;
    /// Validation failures rendered in detail before truncation.
    pub const FAILURE_DETAIL_LIMIT: usize = 5;
    /// Repair-log entries rendered in detail before truncation.
    pub const REPAIR_DETAIL_LIMIT: usize = 5;
    /// Parse-error context lines are truncated to this many characters.
    pub const CONTEXT_LINE_WIDTH: usize = 100;
}
