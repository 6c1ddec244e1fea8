//! Distinct-value dimension sets derived from property rows.
//!
//! A stateless, idempotent read-only view: membership only, no counts, and
//! recomputable at any time from the `properties` rows alone.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::transform::PropertyRow;

/// Distinct categorical values observed across all property rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DimensionSet {
    /// Distinct market names.
    pub markets: BTreeSet<String>,
    /// Distinct listing sources.
    pub sources: BTreeSet<String>,
    /// Distinct property types.
    pub property_types: BTreeSet<String>,
    /// Distinct layout labels.
    pub layouts: BTreeSet<String>,
}

/// Collect distinct non-empty dimension values from `properties` rows.
pub fn extract_dimensions(properties: &[PropertyRow]) -> DimensionSet {
    let mut dimensions = DimensionSet::default();
    for row in properties {
        insert_present(&mut dimensions.markets, row.market.as_deref());
        insert_present(&mut dimensions.sources, row.source.as_deref());
        insert_present(&mut dimensions.property_types, Some(&row.property_type));
        insert_present(&mut dimensions.layouts, row.layout.as_deref());
    }
    dimensions
}

fn insert_present(set: &mut BTreeSet<String>, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            set.insert(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Property;
    use crate::transform::denormalize;

    fn property_in_market(market: Option<&str>) -> Property {
        Property {
            property_title: "T".to_string(),
            address: "A".to_string(),
            street_address: "S".to_string(),
            city: "C".to_string(),
            state: "TX".to_string(),
            zip_code: "75201".to_string(),
            latitude: 32.78,
            longitude: -96.80,
            property_type: "SFR".to_string(),
            market: market.map(str::to_string),
            year_built: None,
            sqft_total: None,
            sqft_basement: None,
            sqft_mu: None,
            bed: None,
            bath: None,
            layout: None,
            pool: None,
            parking: None,
            basement_yes_no: None,
            water: None,
            sewage: None,
            htw: None,
            commercial: None,
            highway: None,
            train: None,
            flood: None,
            occupancy: None,
            net_yield: None,
            irr: None,
            taxes: None,
            tax_rate: None,
            source: None,
            neighborhood_rating: None,
            school_average: None,
            subdivision: None,
            reviewed_status: None,
            most_recent_status: None,
            selling_reason: None,
            final_reviewer: None,
            seller_retained_broker: None,
            rent_restricted: None,
            valuation: Vec::new(),
            hoa: Vec::new(),
            rehab: Vec::new(),
        }
    }

    #[test]
    fn duplicates_collapse_by_set_semantics() {
        let facts = denormalize(&[
            property_in_market(Some("Dallas")),
            property_in_market(Some("Dallas")),
            property_in_market(Some("Austin")),
        ]);
        let dimensions = extract_dimensions(&facts.properties);
        assert_eq!(dimensions.markets.len(), 2);
        assert!(dimensions.markets.contains("Dallas"));
        assert!(dimensions.markets.contains("Austin"));
        assert_eq!(dimensions.property_types.len(), 1);
    }

    #[test]
    fn absent_values_contribute_nothing() {
        let facts = denormalize(&[property_in_market(None)]);
        let dimensions = extract_dimensions(&facts.properties);
        assert!(dimensions.markets.is_empty());
        assert!(dimensions.layouts.is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let facts = denormalize(&[property_in_market(Some("Dallas"))]);
        let first = extract_dimensions(&facts.properties);
        let second = extract_dimensions(&facts.properties);
        assert_eq!(first, second);
    }
}
