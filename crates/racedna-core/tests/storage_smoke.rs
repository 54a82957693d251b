use chrono::{TimeZone, Utc};
use racedna_core::model::{
    DnaProfile, Driver, Race, RaceResult, RacingStats, TimelineEntry, TraitBreakdown, TraitKind,
};
use racedna_core::storage::store::Store;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn profile(score: f64) -> DnaProfile {
    DnaProfile {
        driver_id: 44,
        driver_name: "Lewis Hamilton".into(),
        aggression_score: score,
        consistency_score: 71.0,
        pressure_performance_score: 66.5,
        racecraft_score: 80.25,
        race_start_score: None,
        races_analyzed: 300,
        career_span: "2007-2024".into(),
        last_updated: Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap(),
    }
}

fn breakdown(kind: TraitKind) -> TraitBreakdown {
    TraitBreakdown {
        driver_id: 44,
        trait_name: kind,
        raw_value: Some(1.5),
        normalized_score: 60.0,
        contributing_stats: r#"{"x":null}"#.into(),
        calculation_notes: "n".into(),
    }
}

#[test]
fn test_storage_smoke_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("racedna.db");

    let store = Store::open(&db_path)?;
    store.init_schema()?;
    // idempotent
    store.init_schema()?;

    store.insert_driver(&Driver {
        driver_id: 44,
        reference: "hamilton".into(),
        forename: "Lewis".into(),
        surname: "Hamilton".into(),
    })?;
    store.insert_race(&Race {
        race_id: 1,
        year: 2020,
        round: 1,
        circuit: Some("red_bull_ring".into()),
        name: "Austrian Grand Prix".into(),
    })?;
    store.insert_results(&[RaceResult {
        race_id: 1,
        driver_id: 44,
        constructor_id: 131,
        year: None,
        round: None,
        circuit: None,
        grid: Some(5),
        position: Some(4),
        position_order: 4,
        points: 12.0,
    }])?;

    let ds = store.load_dataset()?;
    let bundle = ds.bundle_for_driver(44);
    assert_eq!(bundle.results.len(), 1);
    assert_eq!(bundle.results[0].year, Some(2020));
    assert_eq!(bundle.results[0].circuit.as_deref(), Some("red_bull_ring"));

    let summaries = store.driver_summaries(1, None)?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].career_span, "2020");
    assert!(store.driver_summaries(2, None)?.is_empty());

    // Verify via raw SQL
    let conn = rusqlite::Connection::open(&db_path)?;
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM results", [], |r| r.get(0))?;
    assert_eq!(n, 1);

    Ok(())
}

#[test]
fn test_profile_upsert_is_idempotent() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let p = profile(55.0);
    store.save_dna(&p, &[])?;
    let first = store.get_profile(44)?;
    store.save_dna(&p, &[])?;
    let second = store.get_profile(44)?;

    assert_eq!(first, second);
    assert_eq!(second, Some(p));
    assert_eq!(store.count_rows("drivers_dna_profiles")?, 1);

    store.save_dna(&profile(90.0), &[])?;
    assert_eq!(store.get_profile(44)?.map(|p| p.aggression_score), Some(90.0));
    assert_eq!(store.count_rows("drivers_dna_profiles")?, 1);
    Ok(())
}

#[test]
fn test_breakdowns_are_replaced() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let old: Vec<_> = TraitKind::ALL.iter().map(|k| breakdown(*k)).collect();
    store.save_dna(&profile(50.0), &old)?;
    assert_eq!(store.list_breakdowns(44)?.len(), 5);

    let new = vec![breakdown(TraitKind::Aggression), breakdown(TraitKind::Racecraft)];
    store.save_dna(&profile(50.0), &new)?;
    let rows = store.list_breakdowns(44)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].trait_name, TraitKind::Racecraft);

    store.save_dna(&profile(50.0), &[])?;
    assert!(store.list_breakdowns(44)?.is_empty());
    Ok(())
}

#[test]
fn test_timeline_and_racing_stats_upsert() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let mut scores = BTreeMap::new();
    scores.insert("aggression".to_string(), Some(61.0));
    scores.insert("race_start".to_string(), None);
    let entry = TimelineEntry {
        driver_id: 44,
        season: 2020,
        trait_scores: scores,
        races_completed: 17,
    };
    store.save_timeline(&[entry.clone()])?;
    store.save_timeline(&[TimelineEntry {
        races_completed: 16,
        ..entry.clone()
    }])?;
    let rows = store.get_timeline(44)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].races_completed, 16);
    assert_eq!(rows[0].trait_scores.get("race_start"), Some(&None));

    let stats = RacingStats {
        driver_id: 44,
        total_races: 17,
        wins: 11,
        second_places: 2,
        third_places: 1,
        podiums: 14,
        avg_finish_position: Some(2.1),
        best_championship_finish: Some(1),
        avg_championship_finish: Some(1.0),
        seasons_completed: 1,
        avg_teammate_points_delta: None,
        last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    };
    store.upsert_racing_stats(&stats)?;
    store.upsert_racing_stats(&stats)?;
    assert_eq!(store.get_racing_stats(44)?, Some(stats));
    assert_eq!(store.count_rows("driver_racing_stats")?, 1);

    assert!(store.count_rows("sqlite_master; DROP TABLE races").is_err());
    Ok(())
}
