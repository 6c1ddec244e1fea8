use homefacts::{run_pipeline, BatchOptions, EtlError};

fn record_with(extra: &str) -> String {
    let separator = if extra.is_empty() { "" } else { ",\n        " };
    format!(
        r#"{{
        "Property_Title": "Sample",
        "Address": "1 Main St, Springfield",
        "Street_Address": "1 Main St",
        "City": "Springfield",
        "State": "IL",
        "Zip": "62704",
        "Latitude": 39.78,
        "Longitude": -89.65,
        "Property_Type": "SFR"{separator}{extra}
    }}"#
    )
}

#[test]
fn unit_suffixed_square_footage_is_repaired_and_coerced() {
    let raw = format!("[{}]", record_with(r#""SQFT_Total": 5649 sqft"#));
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.facts.properties.len(), 1);
    assert_eq!(report.facts.properties[0].sqft_total, Some(5649.0));
    assert!(report
        .repairs
        .iter()
        .any(|fix| fix.replacement_fragment.contains("\"5649 sqft\"")));
}

#[test]
fn bareword_city_is_quoted_and_validates() {
    let raw = r#"[{
        "Property_Title": "Sample",
        "Address": "1 Main St, Springfield",
        "Street_Address": "1 Main St",
        "City": Springfield,
        "State": "IL",
        "Zip": "62704",
        "Latitude": 39.78,
        "Longitude": -89.65,
        "Property_Type": "SFR"
    }]"#;
    let report = run_pipeline(raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.facts.properties[0].city, "Springfield");
}

#[test]
fn trailing_comma_is_removed_and_record_validates() {
    let raw = format!("[{}]", record_with(r#""Bed": 3,"#));
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.facts.properties[0].bed, Some(3));
}

#[test]
fn one_bad_record_does_not_block_the_rest() {
    let missing_type = r#"{
        "Property_Title": "Broken",
        "Address": "2 Oak Ave, Dallas",
        "Street_Address": "2 Oak Ave",
        "City": "Dallas",
        "State": "TX",
        "Zip": "75201",
        "Latitude": 32.78,
        "Longitude": -96.80
    }"#;
    let raw = format!("[{},{},{}]", record_with(""), missing_type, record_with(""));
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.facts.properties.len(), 2);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.record_index, 2);
    assert!(failure
        .errors
        .iter()
        .any(|error| error.field == "property_type"));
}

#[test]
fn child_rows_are_indexed_per_parent() {
    let children = r#""Valuation": [
            {"List_Price": 250000, "Rent_Zestimate": 1900},
            {"List_Price": 255000}
        ]"#;
    let raw = format!("[{}]", record_with(children));
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.facts.valuations.len(), 2);
    assert_eq!(report.facts.valuations[0].property_id, 1);
    assert_eq!(report.facts.valuations[0].valuation_index, 1);
    assert_eq!(report.facts.valuations[1].valuation_index, 2);
    assert_eq!(report.facts.valuations[0].rent_estimate, Some(1900.0));
    assert!(report.facts.hoa_fees.is_empty());
}

#[test]
fn duplicate_markets_collapse_in_dimension_sets() {
    let dallas = record_with(r#""Market": "Dallas""#);
    let austin = record_with(r#""Market": "Austin""#);
    let raw = format!("[{dallas},{dallas},{austin}]");
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.dimensions.markets.len(), 2);
    assert!(report.dimensions.markets.contains("Dallas"));
    assert!(report.dimensions.markets.contains("Austin"));
    assert_eq!(report.summary.distinct_markets, 2);
}

#[test]
fn residual_parse_failure_is_fatal_with_location() {
    let raw = r#"[{"Property_Title": "A", "City": [}]"#;
    let error = run_pipeline(raw, &BatchOptions::default()).expect_err("must fail");
    match error {
        EtlError::Parse { line, column, .. } => {
            assert_eq!(line, 1);
            assert!(column > 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn an_empty_valid_set_aborts_the_run() {
    let raw = r#"[{"Property_Title": "Only a title"}]"#;
    let error = run_pipeline(raw, &BatchOptions::default()).expect_err("must fail");
    assert!(matches!(error, EtlError::EmptyValidSet));
}

#[test]
fn single_record_input_is_treated_as_a_batch_of_one() {
    let raw = record_with("");
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.summary.records_seen, 1);
    assert_eq!(report.facts.properties.len(), 1);
}

#[test]
fn summary_reflects_repairs_and_failures() {
    let raw = format!(
        "[{},{}]",
        record_with(r#""SQFT_Total": 5649 sqft"#),
        r#"{"Property_Title": "Broken"}"#
    );
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    assert_eq!(report.summary.records_seen, 2);
    assert_eq!(report.summary.valid_records, 1);
    assert_eq!(report.summary.failed_records, 1);
    assert_eq!(report.summary.repairs_applied, report.repairs.len());
    assert!(report.summary.repairs_applied >= 1);
}
