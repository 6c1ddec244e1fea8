//! Schema validation and coercion for raw record value trees.
//!
//! The validator iterates the static `FieldSpec` tables declared in
//! `schema`, resolving field names case- and convention-insensitively and
//! coercing one field at a time. Failures are explicit values: every field
//! error for a record is collected before the record is rejected, and a
//! rejected record never blocks the rest of the batch unless the caller
//! asks to stop on the first failure.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::reporting::PROGRESS_LOG_INTERVAL;
use crate::errors::EtlError;
use crate::schema::{
    FieldKind, FieldSpec, HoaRecord, Property, RehabRecord, TriState, ValuationRecord,
    HOA_FIELDS, PROPERTY_FIELDS, REHAB_FIELDS, VALUATION_FIELDS,
};
use crate::types::{FieldPath, RecordIndex};

/// A single field-level coercion or requirement problem.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    /// Where in the record the problem sits.
    pub field: FieldPath,
    /// What went wrong.
    pub message: String,
}

/// Aggregate of all field errors for one rejected record.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationFailure {
    /// 1-based position of the record in the input batch.
    pub record_index: RecordIndex,
    /// The raw value tree, kept for diagnostics.
    pub raw_record: Value,
    /// Every field problem found, not just the first.
    pub errors: Vec<FieldError>,
}

/// Controls for batch admission and failure handling.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchOptions {
    /// Process only the first N records when set.
    pub max_records: Option<usize>,
    /// Reject the whole batch on the first bad record instead of
    /// accumulating failures.
    pub stop_on_first_failure: bool,
}

/// Valid records and rejected-record detail, both in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records that passed coercion, in input order.
    pub valid: Vec<Property>,
    /// Rejected records with per-field detail, in input order.
    pub failures: Vec<ValidationFailure>,
}

/// Outcome of coercing one raw field value.
#[derive(Clone, Debug)]
enum Coerced {
    /// No usable value: missing, null, or collapsed by lossy coercion.
    Absent,
    /// A hard type error was already recorded for this field.
    Invalid,
    Text(String),
    Float(f64),
    Int(i64),
    Flag(TriState),
}

/// Coerced values keyed by canonical field name, in table order.
struct CoercedFields(IndexMap<&'static str, Coerced>);

impl CoercedFields {
    fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name) {
            Some(Coerced::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn float(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(Coerced::Float(value)) => Some(*value),
            _ => None,
        }
    }

    fn int(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(Coerced::Int(value)) => Some(*value),
            _ => None,
        }
    }

    fn flag(&self, name: &str) -> Option<TriState> {
        match self.0.get(name) {
            Some(Coerced::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Normalize a field name for case- and convention-insensitive matching.
fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Index raw object keys by normalized form; first occurrence wins.
fn index_keys(object: &Map<String, Value>) -> IndexMap<String, &Value> {
    let mut index = IndexMap::new();
    for (key, value) in object {
        index.entry(normalize_key(key)).or_insert(value);
    }
    index
}

fn lookup<'a>(index: &IndexMap<String, &'a Value>, spec: &FieldSpec) -> Option<&'a Value> {
    index
        .get(&normalize_key(spec.canonical))
        .copied()
        .or_else(|| {
            spec.aliases
                .iter()
                .find_map(|alias| index.get(&normalize_key(alias)).copied())
        })
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strip everything but digits and decimal points, then parse as a float.
/// A string that yields no digits coerces to nothing rather than failing.
fn strip_to_number(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

fn coerce_numeric(value: &Value) -> Result<Coerced, String> {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(parsed) => Ok(Coerced::Float(parsed)),
            None => Err("numeric literal out of range".to_string()),
        },
        Value::String(text) => Ok(match strip_to_number(text) {
            Some(parsed) => Coerced::Float(parsed),
            None => Coerced::Absent,
        }),
        other => Err(format!("expected a number, got {}", kind_name(other))),
    }
}

fn coerce_integer(value: &Value) -> Result<Coerced, String> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(Coerced::Int)
            .ok_or_else(|| "expected an integer literal".to_string()),
        Value::String(text) => Ok(match strip_to_number(text) {
            Some(parsed) if parsed.fract() == 0.0 => Coerced::Int(parsed as i64),
            _ => Coerced::Absent,
        }),
        other => Err(format!("expected an integer, got {}", kind_name(other))),
    }
}

fn coerce_value(kind: FieldKind, value: &Value) -> Result<Coerced, String> {
    if value.is_null() {
        return Ok(Coerced::Absent);
    }
    match kind {
        FieldKind::Text => match value {
            Value::String(text) => Ok(Coerced::Text(text.clone())),
            other => Err(format!("expected a string, got {}", kind_name(other))),
        },
        FieldKind::TextEmptyAbsent => match value {
            Value::String(text) if text.trim().is_empty() => Ok(Coerced::Absent),
            Value::String(text) => Ok(Coerced::Text(text.clone())),
            other => Err(format!("expected a string, got {}", kind_name(other))),
        },
        FieldKind::Numeric => coerce_numeric(value),
        FieldKind::Integer => coerce_integer(value),
        FieldKind::Flag => Ok(match value.as_str().and_then(TriState::parse) {
            Some(flag) => Coerced::Flag(flag),
            None => Coerced::Absent,
        }),
    }
}

fn qualify(scope: Option<&str>, canonical: &str) -> FieldPath {
    match scope {
        Some(prefix) => format!("{prefix}.{canonical}"),
        None => canonical.to_string(),
    }
}

/// Walk one field table over a raw object, coercing uniformly and
/// accumulating every error found.
fn coerce_fields(
    object: &Map<String, Value>,
    specs: &[FieldSpec],
    scope: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> CoercedFields {
    let index = index_keys(object);
    let mut coerced = IndexMap::with_capacity(specs.len());
    for spec in specs {
        let value = match lookup(&index, spec) {
            Some(raw) => match coerce_value(spec.kind, raw) {
                Ok(outcome) => outcome,
                Err(message) => {
                    errors.push(FieldError {
                        field: qualify(scope, spec.canonical),
                        message,
                    });
                    Coerced::Invalid
                }
            },
            None => Coerced::Absent,
        };
        if spec.required && matches!(value, Coerced::Absent) {
            errors.push(FieldError {
                field: qualify(scope, spec.canonical),
                message: "required field is missing or could not be coerced".to_string(),
            });
        }
        coerced.insert(spec.canonical, value);
    }
    CoercedFields(coerced)
}

/// Coerce a child collection; absent collections default to empty.
fn coerce_children<T>(
    index: &IndexMap<String, &Value>,
    name: &'static str,
    specs: &[FieldSpec],
    build: fn(&CoercedFields) -> T,
    errors: &mut Vec<FieldError>,
) -> Vec<T> {
    let raw = match index.get(name) {
        Some(value) if !value.is_null() => *value,
        _ => return Vec::new(),
    };
    let Some(elements) = raw.as_array() else {
        errors.push(FieldError {
            field: name.to_string(),
            message: format!("expected a sequence, got {}", kind_name(raw)),
        });
        return Vec::new();
    };
    let mut children = Vec::with_capacity(elements.len());
    for (offset, element) in elements.iter().enumerate() {
        let scope = format!("{name}[{}]", offset + 1);
        match element.as_object() {
            Some(object) => {
                let fields = coerce_fields(object, specs, Some(&scope), errors);
                children.push(build(&fields));
            }
            None => errors.push(FieldError {
                field: scope,
                message: format!("expected an object, got {}", kind_name(element)),
            }),
        }
    }
    children
}

fn build_valuation(fields: &CoercedFields) -> ValuationRecord {
    ValuationRecord {
        list_price: fields.float("list_price"),
        previous_rent: fields.float("previous_rent"),
        arv: fields.float("arv"),
        rent_estimate: fields.float("rent_estimate"),
        low_fmr: fields.float("low_fmr"),
        high_fmr: fields.float("high_fmr"),
        avm_estimate: fields.float("avm_estimate"),
        expected_rent: fields.float("expected_rent"),
        alternate_estimate: fields.float("alternate_estimate"),
    }
}

fn build_hoa(fields: &CoercedFields) -> HoaRecord {
    HoaRecord {
        hoa_amount: fields.float("hoa_amount"),
        hoa_flag: fields.flag("hoa_flag"),
    }
}

fn build_rehab(fields: &CoercedFields) -> RehabRecord {
    RehabRecord {
        underwriting_rehab: fields.float("underwriting_rehab"),
        rehab_calculation: fields.float("rehab_calculation"),
        paint: fields.text("paint"),
        flooring_flag: fields.flag("flooring_flag"),
        foundation_flag: fields.flag("foundation_flag"),
        roof_flag: fields.flag("roof_flag"),
        hvac_flag: fields.flag("hvac_flag"),
        kitchen_flag: fields.flag("kitchen_flag"),
        bathroom_flag: fields.flag("bathroom_flag"),
        appliances_flag: fields.flag("appliances_flag"),
        windows_flag: fields.flag("windows_flag"),
        landscaping_flag: fields.flag("landscaping_flag"),
        trashout_flag: fields.flag("trashout_flag"),
    }
}

// Required values are guaranteed present once the caller has checked the
// error list; the defaults below are unreachable then.
fn build_property(fields: &CoercedFields) -> Property {
    Property {
        property_title: fields.text("property_title").unwrap_or_default(),
        address: fields.text("address").unwrap_or_default(),
        street_address: fields.text("street_address").unwrap_or_default(),
        city: fields.text("city").unwrap_or_default(),
        state: fields.text("state").unwrap_or_default(),
        zip_code: fields.text("zip_code").unwrap_or_default(),
        latitude: fields.float("latitude").unwrap_or_default(),
        longitude: fields.float("longitude").unwrap_or_default(),
        property_type: fields.text("property_type").unwrap_or_default(),
        year_built: fields.int("year_built"),
        sqft_total: fields.float("sqft_total"),
        sqft_basement: fields.float("sqft_basement"),
        sqft_mu: fields.float("sqft_mu"),
        bed: fields.int("bed"),
        bath: fields.int("bath"),
        layout: fields.text("layout"),
        pool: fields.flag("pool"),
        parking: fields.text("parking"),
        basement_yes_no: fields.text("basement_yes_no"),
        water: fields.text("water"),
        sewage: fields.text("sewage"),
        htw: fields.flag("htw"),
        commercial: fields.flag("commercial"),
        highway: fields.text("highway"),
        train: fields.text("train"),
        flood: fields.text("flood"),
        occupancy: fields.text("occupancy"),
        net_yield: fields.float("net_yield"),
        irr: fields.float("irr"),
        taxes: fields.float("taxes"),
        tax_rate: fields.float("tax_rate"),
        market: fields.text("market"),
        source: fields.text("source"),
        neighborhood_rating: fields.int("neighborhood_rating"),
        school_average: fields.float("school_average"),
        subdivision: fields.text("subdivision"),
        reviewed_status: fields.text("reviewed_status"),
        most_recent_status: fields.text("most_recent_status"),
        selling_reason: fields.text("selling_reason"),
        final_reviewer: fields.text("final_reviewer"),
        seller_retained_broker: fields.text("seller_retained_broker"),
        rent_restricted: fields.flag("rent_restricted"),
        valuation: Vec::new(),
        hoa: Vec::new(),
        rehab: Vec::new(),
    }
}

/// Validate and coerce one raw record into a typed `Property`.
///
/// Every field problem is collected before the record is rejected, so a
/// failure enumerates all defects at once.
pub fn validate_record(record_index: RecordIndex, raw: &Value) -> Result<Property, ValidationFailure> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationFailure {
            record_index,
            raw_record: raw.clone(),
            errors: vec![FieldError {
                field: "record".to_string(),
                message: format!("expected an object, got {}", kind_name(raw)),
            }],
        });
    };
    let mut errors = Vec::new();
    let fields = coerce_fields(object, PROPERTY_FIELDS, None, &mut errors);
    let index = index_keys(object);
    let valuation = coerce_children(&index, "valuation", VALUATION_FIELDS, build_valuation, &mut errors);
    let hoa = coerce_children(&index, "hoa", HOA_FIELDS, build_hoa, &mut errors);
    let rehab = coerce_children(&index, "rehab", REHAB_FIELDS, build_rehab, &mut errors);
    if !errors.is_empty() {
        return Err(ValidationFailure {
            record_index,
            raw_record: raw.clone(),
            errors,
        });
    }
    let mut property = build_property(&fields);
    property.valuation = valuation;
    property.hoa = hoa;
    property.rehab = rehab;
    Ok(property)
}

/// Validate a record batch.
///
/// Records are independent, so the accumulating mode validates them in
/// parallel; input order is re-imposed on both output lists. In
/// stop-on-first mode the records run sequentially and the first rejection
/// is returned as an error.
pub fn validate_batch(records: &[Value], options: &BatchOptions) -> Result<BatchOutcome, EtlError> {
    let limit = options.max_records.unwrap_or(records.len()).min(records.len());
    let admitted = &records[..limit];
    if limit < records.len() {
        debug!(total = records.len(), admitted = limit, "record cap applied");
    }

    let mut outcome = BatchOutcome::default();
    if options.stop_on_first_failure {
        for (position, raw) in admitted.iter().enumerate() {
            let record_index = position + 1;
            match validate_record(record_index, raw) {
                Ok(property) => outcome.valid.push(property),
                Err(failure) => return Err(EtlError::RecordRejected(Box::new(failure))),
            }
            if record_index % PROGRESS_LOG_INTERVAL == 0 {
                debug!(processed = record_index, "validation progress");
            }
        }
        return Ok(outcome);
    }

    let results: Vec<Result<Property, ValidationFailure>> = admitted
        .par_iter()
        .enumerate()
        .map(|(position, raw)| validate_record(position + 1, raw))
        .collect();
    for result in results {
        match result {
            Ok(property) => outcome.valid.push(property),
            Err(failure) => outcome.failures.push(failure),
        }
    }
    Ok(outcome)
}
