/// Field location inside a record, canonical snake_case with child paths.
/// Examples: `latitude`, `zip_code`, `valuation[2].list_price`
pub type FieldPath = String;
/// 1-based record position within the input batch.
/// Example: the third record in the input array has index `3`
pub type RecordIndex = usize;
/// 1-based surrogate key referencing a `properties` row by output position.
/// Example: the first emitted property row has id `1`
pub type PropertyId = usize;
/// Repair-rule identifier as it appears in repair-log entries.
/// Examples: `bareword_value`, `trailing_comma`
pub type RuleName = &'static str;
