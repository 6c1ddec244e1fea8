//! Typed property records and the declarative field tables that drive
//! validation.
//!
//! Ownership model:
//! - `Property` owns its valuation/HOA/rehab children by composition; child
//!   records never outlive the parent.
//! - `FieldSpec` tables are immutable static data; the validator iterates
//!   them uniformly instead of hand-resolving each field.

use serde::{Deserialize, Serialize};

use crate::constants::flags::{FLAG_NO, FLAG_YES};

/// Normalized yes/no flag state; absent/unknown is `Option::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriState {
    /// Affirmative, canonicalized to `YES`.
    Yes,
    /// Negative, canonicalized to `NO`.
    No,
}

impl TriState {
    /// Parse a raw flag value. Anything but case-insensitive, trimmed
    /// yes/no is `None` — a lossy normalization, never an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            FLAG_YES => Some(Self::Yes),
            FLAG_NO => Some(Self::No),
            _ => None,
        }
    }

    /// Canonical uppercase token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => FLAG_YES,
            Self::No => FLAG_NO,
        }
    }
}

/// Point-in-time valuation snapshot for a property.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub list_price: Option<f64>,
    pub previous_rent: Option<f64>,
    pub arv: Option<f64>,
    pub rent_estimate: Option<f64>,
    pub low_fmr: Option<f64>,
    pub high_fmr: Option<f64>,
    pub avm_estimate: Option<f64>,
    pub expected_rent: Option<f64>,
    pub alternate_estimate: Option<f64>,
}

/// Homeowner-association fee information.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HoaRecord {
    pub hoa_amount: Option<f64>,
    pub hoa_flag: Option<TriState>,
}

/// Rehab cost estimates and normalized condition flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RehabRecord {
    pub underwriting_rehab: Option<f64>,
    pub rehab_calculation: Option<f64>,
    pub paint: Option<String>,
    pub flooring_flag: Option<TriState>,
    pub foundation_flag: Option<TriState>,
    pub roof_flag: Option<TriState>,
    pub hvac_flag: Option<TriState>,
    pub kitchen_flag: Option<TriState>,
    pub bathroom_flag: Option<TriState>,
    pub appliances_flag: Option<TriState>,
    pub windows_flag: Option<TriState>,
    pub landscaping_flag: Option<TriState>,
    pub trashout_flag: Option<TriState>,
}

/// Core property record with all nested child collections.
///
/// The nine non-optional fields are the schema's required set; a record
/// missing any of them never becomes a `Property`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    // Identifiers
    pub property_title: String,
    pub address: String,

    // Location
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,

    // Characteristics
    pub property_type: String,
    pub year_built: Option<i64>,
    pub sqft_total: Option<f64>,
    pub sqft_basement: Option<f64>,
    pub sqft_mu: Option<f64>,
    pub bed: Option<i64>,
    pub bath: Option<i64>,

    // Features
    pub layout: Option<String>,
    pub pool: Option<TriState>,
    pub parking: Option<String>,
    pub basement_yes_no: Option<String>,
    pub water: Option<String>,
    pub sewage: Option<String>,
    pub htw: Option<TriState>,
    pub commercial: Option<TriState>,
    pub highway: Option<String>,
    pub train: Option<String>,
    pub flood: Option<String>,
    pub occupancy: Option<String>,

    // Financial
    pub net_yield: Option<f64>,
    pub irr: Option<f64>,
    pub taxes: Option<f64>,
    pub tax_rate: Option<f64>,

    // Market
    pub market: Option<String>,
    pub source: Option<String>,
    pub neighborhood_rating: Option<i64>,
    pub school_average: Option<f64>,
    pub subdivision: Option<String>,

    // Status
    pub reviewed_status: Option<String>,
    pub most_recent_status: Option<String>,
    pub selling_reason: Option<String>,
    pub final_reviewer: Option<String>,
    pub seller_retained_broker: Option<String>,
    pub rent_restricted: Option<TriState>,

    // Child records
    #[serde(default)]
    pub valuation: Vec<ValuationRecord>,
    #[serde(default)]
    pub hoa: Vec<HoaRecord>,
    #[serde(default)]
    pub rehab: Vec<RehabRecord>,
}

/// How a raw field value is converted into a typed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text kept as-is.
    Text,
    /// Free text where empty/whitespace-only strings mean absent.
    TextEmptyAbsent,
    /// Floating-point numeric; string input is stripped to digits first.
    Numeric,
    /// Integer numeric; fractional literals are rejected.
    Integer,
    /// Yes/no flag; anything unrecognized is absent, never an error.
    Flag,
}

/// Declarative description of one schema field.
///
/// Field names resolve case- and naming-convention-insensitively, so
/// `aliases` only lists external spellings that differ beyond convention
/// (for example `Zip` for `zip_code`).
#[derive(Debug)]
pub struct FieldSpec {
    /// Canonical snake_case field name; doubles as the output column name.
    pub canonical: &'static str,
    /// Accepted external spellings beyond the canonical name.
    pub aliases: &'static [&'static str],
    /// Coercion applied to raw values.
    pub kind: FieldKind,
    /// Whether an absent or unusable value fails the record.
    pub required: bool,
}

impl FieldSpec {
    const fn required(canonical: &'static str, kind: FieldKind) -> Self {
        Self {
            canonical,
            aliases: &[],
            kind,
            required: true,
        }
    }

    const fn optional(canonical: &'static str, kind: FieldKind) -> Self {
        Self {
            canonical,
            aliases: &[],
            kind,
            required: false,
        }
    }

    const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Field table for the main property record, in output column order.
pub static PROPERTY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("property_title", FieldKind::Text),
    FieldSpec::required("address", FieldKind::Text),
    FieldSpec::required("street_address", FieldKind::Text),
    FieldSpec::required("city", FieldKind::Text),
    FieldSpec::required("state", FieldKind::Text),
    FieldSpec::required("zip_code", FieldKind::Text).with_aliases(&["Zip"]),
    FieldSpec::required("latitude", FieldKind::Numeric),
    FieldSpec::required("longitude", FieldKind::Numeric),
    FieldSpec::required("property_type", FieldKind::Text),
    FieldSpec::optional("year_built", FieldKind::Integer),
    FieldSpec::optional("sqft_total", FieldKind::Numeric),
    FieldSpec::optional("sqft_basement", FieldKind::Numeric),
    FieldSpec::optional("sqft_mu", FieldKind::Numeric),
    FieldSpec::optional("bed", FieldKind::Integer),
    FieldSpec::optional("bath", FieldKind::Integer),
    FieldSpec::optional("layout", FieldKind::Text),
    FieldSpec::optional("pool", FieldKind::Flag),
    FieldSpec::optional("parking", FieldKind::Text),
    FieldSpec::optional("basement_yes_no", FieldKind::Text),
    FieldSpec::optional("water", FieldKind::Text),
    FieldSpec::optional("sewage", FieldKind::Text),
    FieldSpec::optional("htw", FieldKind::Flag),
    FieldSpec::optional("commercial", FieldKind::Flag),
    FieldSpec::optional("highway", FieldKind::Text),
    FieldSpec::optional("train", FieldKind::Text),
    FieldSpec::optional("flood", FieldKind::TextEmptyAbsent),
    FieldSpec::optional("occupancy", FieldKind::TextEmptyAbsent),
    FieldSpec::optional("net_yield", FieldKind::Numeric),
    FieldSpec::optional("irr", FieldKind::Numeric),
    FieldSpec::optional("taxes", FieldKind::Numeric),
    FieldSpec::optional("tax_rate", FieldKind::Numeric),
    FieldSpec::optional("market", FieldKind::Text),
    FieldSpec::optional("source", FieldKind::Text),
    FieldSpec::optional("neighborhood_rating", FieldKind::Integer),
    FieldSpec::optional("school_average", FieldKind::Numeric),
    FieldSpec::optional("subdivision", FieldKind::Text),
    FieldSpec::optional("reviewed_status", FieldKind::TextEmptyAbsent),
    FieldSpec::optional("most_recent_status", FieldKind::Text),
    FieldSpec::optional("selling_reason", FieldKind::Text),
    FieldSpec::optional("final_reviewer", FieldKind::Text),
    FieldSpec::optional("seller_retained_broker", FieldKind::Text),
    FieldSpec::optional("rent_restricted", FieldKind::Flag),
];

/// Field table for valuation snapshots.
pub static VALUATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("list_price", FieldKind::Numeric),
    FieldSpec::optional("previous_rent", FieldKind::Numeric),
    FieldSpec::optional("arv", FieldKind::Numeric),
    FieldSpec::optional("rent_estimate", FieldKind::Numeric).with_aliases(&["Rent_Zestimate"]),
    FieldSpec::optional("low_fmr", FieldKind::Numeric),
    FieldSpec::optional("high_fmr", FieldKind::Numeric),
    FieldSpec::optional("avm_estimate", FieldKind::Numeric).with_aliases(&["Zestimate"]),
    FieldSpec::optional("expected_rent", FieldKind::Numeric),
    FieldSpec::optional("alternate_estimate", FieldKind::Numeric).with_aliases(&["Redfin_Value"]),
];

/// Field table for HOA entries.
pub static HOA_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("hoa_amount", FieldKind::Numeric).with_aliases(&["HOA"]),
    FieldSpec::optional("hoa_flag", FieldKind::Flag),
];

/// Field table for rehab assessments.
pub static REHAB_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("underwriting_rehab", FieldKind::Numeric),
    FieldSpec::optional("rehab_calculation", FieldKind::Numeric),
    FieldSpec::optional("paint", FieldKind::Text),
    FieldSpec::optional("flooring_flag", FieldKind::Flag),
    FieldSpec::optional("foundation_flag", FieldKind::Flag),
    FieldSpec::optional("roof_flag", FieldKind::Flag),
    FieldSpec::optional("hvac_flag", FieldKind::Flag),
    FieldSpec::optional("kitchen_flag", FieldKind::Flag),
    FieldSpec::optional("bathroom_flag", FieldKind::Flag),
    FieldSpec::optional("appliances_flag", FieldKind::Flag),
    FieldSpec::optional("windows_flag", FieldKind::Flag),
    FieldSpec::optional("landscaping_flag", FieldKind::Flag),
    FieldSpec::optional("trashout_flag", FieldKind::Flag),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_state_parses_case_insensitively() {
        assert_eq!(TriState::parse("yes"), Some(TriState::Yes));
        assert_eq!(TriState::parse("  No "), Some(TriState::No));
        assert_eq!(TriState::parse("YES"), Some(TriState::Yes));
    }

    #[test]
    fn tri_state_rejects_everything_else() {
        assert_eq!(TriState::parse(""), None);
        assert_eq!(TriState::parse("maybe"), None);
        assert_eq!(TriState::parse("y"), None);
    }

    #[test]
    fn tri_state_round_trips_canonical_tokens() {
        assert_eq!(TriState::Yes.as_str(), "YES");
        assert_eq!(TriState::parse(TriState::No.as_str()), Some(TriState::No));
    }

    #[test]
    fn property_fields_declare_exactly_nine_required() {
        let required: Vec<_> = PROPERTY_FIELDS
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.canonical)
            .collect();
        assert_eq!(required.len(), 9);
        assert!(required.contains(&"latitude"));
        assert!(required.contains(&"zip_code"));
    }

    #[test]
    fn child_fields_are_all_optional() {
        for table in [VALUATION_FIELDS, HOA_FIELDS, REHAB_FIELDS] {
            assert!(table.iter().all(|spec| !spec.required));
        }
    }
}
