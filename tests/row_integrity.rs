use homefacts::{run_pipeline, BatchOptions};

fn record(title: &str, valuations: usize, hoa: usize, rehab: usize) -> String {
    let valuation_entries: Vec<String> = (0..valuations)
        .map(|idx| format!(r#"{{"List_Price": {}}}"#, 100_000 + idx))
        .collect();
    let hoa_entries: Vec<String> = (0..hoa)
        .map(|_| r#"{"HOA": 120, "HOA_Flag": "yes"}"#.to_string())
        .collect();
    let rehab_entries: Vec<String> = (0..rehab)
        .map(|_| r#"{"Paint": "fair", "Roof_Flag": "no"}"#.to_string())
        .collect();
    format!(
        r#"{{
        "Property_Title": "{title}",
        "Address": "1 Main St, Springfield",
        "Street_Address": "1 Main St",
        "City": "Springfield",
        "State": "IL",
        "Zip": "62704",
        "Latitude": 39.78,
        "Longitude": -89.65,
        "Property_Type": "SFR",
        "Valuation": [{}],
        "HOA": [{}],
        "Rehab": [{}]
    }}"#,
        valuation_entries.join(","),
        hoa_entries.join(","),
        rehab_entries.join(",")
    )
}

#[test]
fn every_child_row_references_an_existing_parent() {
    let raw = format!(
        "[{},{},{}]",
        record("a", 2, 0, 1),
        record("b", 0, 3, 0),
        record("c", 1, 1, 2)
    );
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    let parent_count = report.facts.properties.len();
    assert_eq!(parent_count, 3);
    for row in &report.facts.valuations {
        assert!(row.property_id >= 1 && row.property_id <= parent_count);
    }
    for row in &report.facts.hoa_fees {
        assert!(row.property_id >= 1 && row.property_id <= parent_count);
    }
    for row in &report.facts.rehab_assessments {
        assert!(row.property_id >= 1 && row.property_id <= parent_count);
    }
}

#[test]
fn child_row_counts_match_source_collection_lengths() {
    let raw = format!(
        "[{},{},{}]",
        record("a", 2, 0, 1),
        record("b", 0, 3, 0),
        record("c", 1, 1, 2)
    );
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    let valuations_for = |id: usize| {
        report
            .facts
            .valuations
            .iter()
            .filter(|row| row.property_id == id)
            .count()
    };
    let hoa_for = |id: usize| {
        report
            .facts
            .hoa_fees
            .iter()
            .filter(|row| row.property_id == id)
            .count()
    };
    let rehab_for = |id: usize| {
        report
            .facts
            .rehab_assessments
            .iter()
            .filter(|row| row.property_id == id)
            .count()
    };
    assert_eq!(valuations_for(1), 2);
    assert_eq!(valuations_for(2), 0);
    assert_eq!(valuations_for(3), 1);
    assert_eq!(hoa_for(1), 0);
    assert_eq!(hoa_for(2), 3);
    assert_eq!(hoa_for(3), 1);
    assert_eq!(rehab_for(1), 1);
    assert_eq!(rehab_for(2), 0);
    assert_eq!(rehab_for(3), 2);
}

#[test]
fn child_indices_restart_at_one_for_each_parent() {
    let raw = format!("[{},{}]", record("a", 3, 0, 0), record("b", 2, 0, 0));
    let report = run_pipeline(&raw, &BatchOptions::default()).expect("pipeline");
    let indices_for = |id: usize| -> Vec<usize> {
        report
            .facts
            .valuations
            .iter()
            .filter(|row| row.property_id == id)
            .map(|row| row.valuation_index)
            .collect()
    };
    assert_eq!(indices_for(1), vec![1, 2, 3]);
    assert_eq!(indices_for(2), vec![1, 2]);
}
