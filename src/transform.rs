//! Denormalization of validated properties into relational row sets.
//!
//! One pass, input-order-preserving. Surrogate keys are positions in the
//! output sequence, never derived from input fields, so every child row's
//! parent exists before the child is emitted.

use serde::Serialize;
use tracing::info;

use crate::schema::{HoaRecord, Property, RehabRecord, TriState, ValuationRecord};
use crate::types::PropertyId;

/// One row of the `properties` fact table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyRow {
    pub property_title: String,
    pub address: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub property_type: String,
    pub year_built: Option<i64>,
    pub sqft_total: Option<f64>,
    pub sqft_basement: Option<f64>,
    pub sqft_mu: Option<f64>,
    pub bed: Option<i64>,
    pub bath: Option<i64>,
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
    pub net_yield: Option<f64>,
    pub irr: Option<f64>,
    pub taxes: Option<f64>,
    pub tax_rate: Option<f64>,
    pub market: Option<String>,
    pub source: Option<String>,
    pub neighborhood_rating: Option<i64>,
    pub school_average: Option<f64>,
    pub subdivision: Option<String>,
    pub reviewed_status: Option<String>,
    pub most_recent_status: Option<String>,
    pub selling_reason: Option<String>,
    pub final_reviewer: Option<String>,
    pub seller_retained_broker: Option<String>,
    pub rent_restricted: Option<TriState>,
}

/// One row of the `valuations` fact table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValuationRow {
    /// Surrogate key of the owning `properties` row.
    pub property_id: PropertyId,
    /// 1-based position within the owning property's valuation list.
    pub valuation_index: usize,
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

/// One row of the `hoa_fees` fact table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoaRow {
    /// Surrogate key of the owning `properties` row.
    pub property_id: PropertyId,
    /// 1-based position within the owning property's HOA list.
    pub hoa_index: usize,
    pub hoa_amount: Option<f64>,
    pub hoa_flag: Option<TriState>,
}

/// One row of the `rehab_assessments` fact table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RehabRow {
    /// Surrogate key of the owning `properties` row.
    pub property_id: PropertyId,
    /// 1-based position within the owning property's rehab list.
    pub rehab_index: usize,
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

/// Flattened row lists for the four fact tables.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FactRowSet {
    pub properties: Vec<PropertyRow>,
    pub valuations: Vec<ValuationRow>,
    pub hoa_fees: Vec<HoaRow>,
    pub rehab_assessments: Vec<RehabRow>,
}

/// Flatten validated properties into fact rows, assigning positional
/// surrogate keys in input order.
pub fn denormalize(properties: &[Property]) -> FactRowSet {
    let mut facts = FactRowSet::default();
    for property in properties {
        facts.properties.push(property_row(property));
        let property_id = facts.properties.len();
        for (offset, valuation) in property.valuation.iter().enumerate() {
            facts
                .valuations
                .push(valuation_row(property_id, offset + 1, valuation));
        }
        for (offset, hoa) in property.hoa.iter().enumerate() {
            facts.hoa_fees.push(hoa_row(property_id, offset + 1, hoa));
        }
        for (offset, rehab) in property.rehab.iter().enumerate() {
            facts
                .rehab_assessments
                .push(rehab_row(property_id, offset + 1, rehab));
        }
    }
    info!(
        properties = facts.properties.len(),
        valuations = facts.valuations.len(),
        hoa_fees = facts.hoa_fees.len(),
        rehab_assessments = facts.rehab_assessments.len(),
        "denormalization complete"
    );
    facts
}

fn property_row(property: &Property) -> PropertyRow {
    PropertyRow {
        property_title: property.property_title.clone(),
        address: property.address.clone(),
        street_address: property.street_address.clone(),
        city: property.city.clone(),
        state: property.state.clone(),
        zip_code: property.zip_code.clone(),
        latitude: property.latitude,
        longitude: property.longitude,
        property_type: property.property_type.clone(),
        year_built: property.year_built,
        sqft_total: property.sqft_total,
        sqft_basement: property.sqft_basement,
        sqft_mu: property.sqft_mu,
        bed: property.bed,
        bath: property.bath,
        layout: property.layout.clone(),
        pool: property.pool,
        parking: property.parking.clone(),
        basement_yes_no: property.basement_yes_no.clone(),
        water: property.water.clone(),
        sewage: property.sewage.clone(),
        htw: property.htw,
        commercial: property.commercial,
        highway: property.highway.clone(),
        train: property.train.clone(),
        flood: property.flood.clone(),
        occupancy: property.occupancy.clone(),
        net_yield: property.net_yield,
        irr: property.irr,
        taxes: property.taxes,
        tax_rate: property.tax_rate,
        market: property.market.clone(),
        source: property.source.clone(),
        neighborhood_rating: property.neighborhood_rating,
        school_average: property.school_average,
        subdivision: property.subdivision.clone(),
        reviewed_status: property.reviewed_status.clone(),
        most_recent_status: property.most_recent_status.clone(),
        selling_reason: property.selling_reason.clone(),
        final_reviewer: property.final_reviewer.clone(),
        seller_retained_broker: property.seller_retained_broker.clone(),
        rent_restricted: property.rent_restricted,
    }
}

fn valuation_row(property_id: PropertyId, valuation_index: usize, record: &ValuationRecord) -> ValuationRow {
    ValuationRow {
        property_id,
        valuation_index,
        list_price: record.list_price,
        previous_rent: record.previous_rent,
        arv: record.arv,
        rent_estimate: record.rent_estimate,
        low_fmr: record.low_fmr,
        high_fmr: record.high_fmr,
        avm_estimate: record.avm_estimate,
        expected_rent: record.expected_rent,
        alternate_estimate: record.alternate_estimate,
    }
}

fn hoa_row(property_id: PropertyId, hoa_index: usize, record: &HoaRecord) -> HoaRow {
    HoaRow {
        property_id,
        hoa_index,
        hoa_amount: record.hoa_amount,
        hoa_flag: record.hoa_flag,
    }
}

fn rehab_row(property_id: PropertyId, rehab_index: usize, record: &RehabRecord) -> RehabRow {
    RehabRow {
        property_id,
        rehab_index,
        underwriting_rehab: record.underwriting_rehab,
        rehab_calculation: record.rehab_calculation,
        paint: record.paint.clone(),
        flooring_flag: record.flooring_flag,
        foundation_flag: record.foundation_flag,
        roof_flag: record.roof_flag,
        hvac_flag: record.hvac_flag,
        kitchen_flag: record.kitchen_flag,
        bathroom_flag: record.bathroom_flag,
        appliances_flag: record.appliances_flag,
        windows_flag: record.windows_flag,
        landscaping_flag: record.landscaping_flag,
        trashout_flag: record.trashout_flag,
    }
}
