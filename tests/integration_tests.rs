use monthly_rollup::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn alice_table() -> FlatTable {
    let mut record = SourceRecord::new("Alice");
    for period in Period::ALL {
        record = record.with_value(period.name(), 100);
    }
    load_flat(&[record, SourceRecord::new("Bob")], &RollupConfig::default()).unwrap()
}

fn org_json() -> String {
    json!([
        {"name": "Region A", "path": ["Region A"]},
        {"name": "Team 1", "path": ["Region A", "Team 1"], "Jan": 50, "Feb": 10},
        {"name": "Team 2", "path": ["Region A", "Team 2"], "Jan": 30, "Mar": "5"},
        {"name": "Region B", "path": ["Region B"]},
        {"name": "East", "path": ["Region B", "East"]},
        {"name": "Ann", "path": ["Region B", "East", "Ann"], "Jan": 1, "Dec": 2},
        {"name": "Ben", "path": ["Region B", "East", "Ben"], "Jun": 4},
        {"name": "West", "path": ["Region B", "West"], "Jul": "n/a"}
    ])
    .to_string()
}

fn path(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn assert_totals_consistent(table: &FlatTable) {
    for row in table.rows() {
        assert_eq!(row.total(), row.record.values.sum(), "row {}", row.name());
        assert_eq!(row.average, compute_average(row.total(), PERIOD_COUNT));
    }
}

#[test]
fn test_flat_month_edit_scenario() {
    let mut table = alice_table();
    let row = table
        .apply_edit(&EditRequest::new("Alice", "Mar", 400.0))
        .unwrap();

    assert_eq!(row.total(), 1500.0);
    assert_eq!(row.average, 125.00);
    assert_eq!(row.record.value(Period::Feb), 100.0);
    assert_eq!(row.record.value(Period::Apr), 100.0);
    assert_totals_consistent(&table);
}

#[test]
fn test_flat_total_redistribution_scenarios() {
    let mut table = alice_table();

    let row = table
        .apply_edit(&EditRequest::new("Alice", "total", 2400.0))
        .unwrap();
    assert!(row.record.values.iter().all(|(_, v)| v == 200.0));
    assert_eq!(row.total(), 2400.0);

    let row = table
        .apply_edit(&EditRequest::new("Alice", "total", 2405.0))
        .unwrap();
    assert_eq!(row.record.value(Period::Jan), 205.0);
    for period in &Period::ALL[1..] {
        assert_eq!(row.record.value(*period), 200.0);
    }
    assert_eq!(row.record.values.sum(), 2405.0);
    assert_totals_consistent(&table);
}

#[test]
fn test_redistribution_round_trip_for_signed_totals() {
    let mut table = alice_table();
    for total in [-2405, -13, -1, 0, 1, 11, 12, 13, 2405, 1_000_003] {
        let row = table
            .apply_edit(&EditRequest::new("Bob", "total", total as f64))
            .unwrap();
        assert_eq!(compute_total(&row.record.values, &Period::ALL), total as f64);
        let first = row.clone();

        let again = table
            .apply_edit(&EditRequest::new("Bob", "total", total as f64))
            .unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_hierarchical_propagation_scenario() {
    let mut store = load_tree_from_json(&org_json(), &RollupConfig::default()).unwrap();
    let region_a = store.find(&path(&["Region A"])).unwrap();
    assert_eq!(store.node(region_a).value(Period::Jan), 80.0);

    let chain = store
        .apply_edit(&EditRequest::new("Team 1", "Jan", 80.0))
        .unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(store.node(region_a).value(Period::Jan), 110.0);
    assert_eq!(store.node(region_a).total(), 110.0 + 10.0 + 5.0);

    let team2 = store.find(&path(&["Region A", "Team 2"])).unwrap();
    assert_eq!(store.node(team2).value(Period::Jan), 30.0);
    assert_eq!(store.node(team2).total(), 35.0);
    assert!(store.verify(1e-9).is_empty());
}

#[test]
fn test_deep_edit_updates_every_ancestor() {
    let mut store = load_tree_from_json(&org_json(), &RollupConfig::default()).unwrap();

    let chain = store
        .apply_edit(&EditRequest::new("Ben", "Jun", "10"))
        .unwrap();

    let names: Vec<&str> = chain.iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["Ben", "East", "Region B"]);
    assert_eq!(chain[1].value(Period::Jun), 10.0);
    assert_eq!(chain[2].value(Period::Jun), 10.0);
    assert_eq!(chain[2].total(), 1.0 + 2.0 + 10.0);
    assert!(store.verify(1e-9).is_empty());
}

#[test]
fn test_internal_node_edit_rejected() {
    let mut store = load_tree_from_json(&org_json(), &RollupConfig::default()).unwrap();
    let before = store.nodes().to_vec();

    let result = store.apply_edit(&EditRequest::new("Region A", "Jan", 1.0));
    assert!(matches!(result, Err(RollupError::EditNotAllowed { .. })));

    let request = EditRequest::new("East", "Feb", 1.0).at_path(["Region B", "East"]);
    let result = store.apply_edit(&request);
    assert!(matches!(result, Err(RollupError::EditNotAllowed { .. })));

    assert_eq!(store.nodes(), before.as_slice());
}

#[test]
fn test_random_edit_sequences_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut resum = load_tree_from_json(&org_json(), &RollupConfig::default()).unwrap();
    let delta_config = RollupConfig::default().with_propagation(PropagationStrategy::Delta);
    let mut delta = load_tree_from_json(&org_json(), &delta_config).unwrap();
    let mut flat = alice_table();

    let leaves: Vec<Vec<String>> = resum
        .index()
        .walk()
        .into_iter()
        .filter(|&id| resum.index().is_leaf(id))
        .map(|id| resum.index().path_of(id).to_vec())
        .collect();

    for _ in 0..500 {
        let leaf = &leaves[rng.gen_range(0..leaves.len())];
        let period = Period::ALL[rng.gen_range(0..PERIOD_COUNT)];
        let value = rng.gen_range(-1_000i64..=1_000) as f64;
        let fractional = value / 10.0 + rng.gen_range(0.0..1.0);
        let request = EditRequest::new(leaf.last().unwrap().as_str(), period.name(), fractional)
            .at_path(leaf.iter().cloned());

        resum.apply_edit(&request).unwrap();
        delta.apply_edit(&request).unwrap();

        let name = if rng.gen_bool(0.5) { "Alice" } else { "Bob" };
        let field = if rng.gen_bool(0.3) { "total" } else { period.name() };
        flat.apply_edit(&EditRequest::new(name, field, value)).unwrap();
    }

    assert!(resum.verify(0.0).is_empty());
    assert!(delta.verify(0.0).is_empty());
    assert_eq!(resum.nodes(), delta.nodes());
    assert_totals_consistent(&flat);
}

#[test]
fn test_dataset_dispatch() {
    let mut flat = Dataset::Flat(alice_table());
    let store = load_tree_from_json(&org_json(), &RollupConfig::default()).unwrap();
    let mut tree = Dataset::Tree(store);
    assert_eq!(flat.len(), 2);
    assert_eq!(tree.len(), 8);

    match flat
        .apply_edit(&EditRequest::new("Alice", "total", 12.0))
        .unwrap()
    {
        EditOutcome::Row(row) => assert_eq!(row.average, 1.0),
        other => panic!("expected a row, got {:?}", other),
    }

    match tree.apply_edit(&EditRequest::new("Ann", "Jan", 3.0)).unwrap() {
        EditOutcome::Chain(chain) => assert_eq!(chain.len(), 3),
        other => panic!("expected a chain, got {:?}", other),
    }

    let exported: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 8);
}

#[test]
fn test_csv_export_parses_back() -> anyhow::Result<()> {
    let mut table = alice_table();
    table.apply_edit(&EditRequest::new("Alice", "total", 2405.0))?;

    let csv_text = table.to_csv();
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    assert_eq!(headers.len(), 15);
    assert_eq!(&headers[0], "Name");
    assert_eq!(&headers[3], "Jan");

    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Alice");
    assert_eq!(rows[0][1].parse::<f64>()?, 2405.0);
    assert_eq!(rows[0][2].parse::<f64>()?, 200.42);
    assert_eq!(rows[0][3].parse::<f64>()?, 205.0);
    assert_eq!(rows[0][4].parse::<f64>()?, 200.0);
    Ok(())
}

#[test]
fn test_views_over_loaded_data() -> anyhow::Result<()> {
    let table = alice_table();
    let q1 = PeriodRange::parse("2024-01:2024-03")?;
    let totals = range_totals(&table, q1);
    assert_eq!(totals[0], RangeTotal { name: "Alice".to_string(), total: 300.0 });
    assert_eq!(totals[1].total, 0.0);
    assert_eq!(search_rows(&table, "bo").len(), 1);

    let store = load_tree_from_json(&org_json(), &RollupConfig::default())?;
    let visible = search_tree(&store, "east");
    assert_eq!(visible.len(), 4);
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("monthly-rollup-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let file = dir.join("rollup.json");
    std::fs::write(
        &file,
        r#"{"propagation": "delta", "synthesize_missing_ancestors": true}"#,
    )?;

    let config = RollupConfig::from_path(&file)?;
    assert_eq!(config.propagation, PropagationStrategy::Delta);

    let raw = json!([
        {"name": "Leaf", "path": ["Top", "Middle", "Leaf"], "Jan": 4}
    ])
    .to_string();
    let store = load_tree_from_json(&raw, &config)?;
    assert_eq!(store.len(), 3);
    assert_eq!(store.node(store.index().roots()[0]).total(), 4.0);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
