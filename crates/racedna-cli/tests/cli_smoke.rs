use assert_cmd::Command;
use predicates::str::contains;
use racedna_core::model::{Driver, Race, RaceResult};
use racedna_core::storage::Store;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Two drivers sharing a car over 20 races in 2020-2021.
fn seed_db(path: &Path) {
    let store = Store::open(path).unwrap();
    store.init_schema().unwrap();

    for (id, reference, forename, surname) in [
        (1, "hamilton", "Lewis", "Hamilton"),
        (2, "bottas", "Valtteri", "Bottas"),
        (3, "rookie", "Rook", "Ie"),
    ] {
        store
            .insert_driver(&Driver {
                driver_id: id,
                reference: reference.to_string(),
                forename: forename.to_string(),
                surname: surname.to_string(),
            })
            .unwrap();
    }

    let mut results = Vec::new();
    for race_id in 1..=20i64 {
        store
            .insert_race(&Race {
                race_id,
                year: if race_id <= 10 { 2020 } else { 2021 },
                round: ((race_id - 1) % 10 + 1) as u32,
                circuit: Some("monza".to_string()),
                name: format!("Grand Prix {}", race_id),
            })
            .unwrap();
        for (driver_id, grid, position) in [(1, 3, Some(1)), (2, 1, if race_id % 4 == 0 { None } else { Some(2) })] {
            results.push(RaceResult {
                race_id,
                driver_id,
                constructor_id: 131,
                year: None,
                round: None,
                circuit: None,
                grid: Some(grid),
                position,
                position_order: position.unwrap_or(20),
                points: match position {
                    Some(1) => 25.0,
                    Some(2) => 18.0,
                    _ => 0.0,
                },
            });
        }
    }
    results.push(RaceResult {
        race_id: 20,
        driver_id: 3,
        constructor_id: 9,
        year: None,
        round: None,
        circuit: None,
        grid: Some(18),
        position: Some(14),
        position_order: 14,
        points: 0.0,
    });
    store.insert_results(&results).unwrap();
}

fn racedna(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("racedna").unwrap();
    cmd.current_dir(dir.path()).env_remove("RACEDNA_LOG");
    cmd
}

#[test]
fn test_version_prints_package_version() {
    let dir = TempDir::new().unwrap();
    racedna(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();

    racedna(&dir)
        .args(["init", "--db", "data/racedna.db"])
        .assert()
        .success()
        .stderr(contains("created racedna.yaml"));
    assert!(dir.path().join("racedna.yaml").exists());
    assert!(dir.path().join("data/racedna.db").exists());

    racedna(&dir)
        .args(["init", "--no-schema"])
        .assert()
        .success()
        .stderr(contains("already exists"));
}

#[test]
fn test_calculate_update_status_flow() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("f1.db");
    seed_db(&db);

    racedna(&dir)
        .args(["calculate", "--db"])
        .arg(&db)
        .args(["--min-races", "15", "--parallel", "2"])
        .assert()
        .success()
        .stdout(contains("Summary (calculate): 2 drivers, 2 saved, 0 skipped, 0 failed"));

    racedna(&dir)
        .args(["update", "HAMILTON", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("Lewis Hamilton (#1)"))
        .stdout(contains("Race Start Performance"));

    racedna(&dir)
        .args(["update", "2", "--format", "json", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("\"driver_name\": \"Valtteri Bottas\""));

    racedna(&dir)
        .args(["status", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("drivers_dna_profiles"))
        .stdout(contains("Top profiles by races analyzed:"));

    racedna(&dir)
        .args(["stats", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("Summary (stats): 2 drivers, 2 saved"));

    let store = Store::open(&db).unwrap();
    let stats = store.get_racing_stats(1).unwrap().expect("stats row");
    assert_eq!(stats.wins, 20);
    assert!(store.get_profile(3).unwrap().is_none());
}

#[test]
fn test_timeline_and_list() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("f1.db");
    seed_db(&db);

    racedna(&dir)
        .args(["timeline", "--driver", "bottas", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("Summary (timeline): 2 drivers, 2 saved"))
        .stdout(contains("2020 (10 races)"))
        .stdout(contains("2021 (10 races)"));

    racedna(&dir)
        .args(["list", "--min-races", "1", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(contains("hamilton"))
        .stdout(contains("2020-2021"))
        .stdout(contains("3 drivers"));
}

#[test]
fn test_no_eligible_drivers_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("f1.db");
    seed_db(&db);

    racedna(&dir)
        .args(["calculate", "--min-races", "100", "--db"])
        .arg(&db)
        .assert()
        .code(1)
        .stderr(contains("no drivers with at least 100 races"));
}

#[test]
fn test_unknown_driver_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("f1.db");
    seed_db(&db);

    racedna(&dir)
        .args(["update", "senna", "--db"])
        .arg(&db)
        .assert()
        .code(1)
        .stderr(contains("driver not found: senna"));
}

#[test]
fn test_config_errors_exit_2() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("f1.db");
    seed_db(&db);

    fs::write(dir.path().join("racedna.yaml"), "configVersion: 2\n").unwrap();
    racedna(&dir)
        .args(["calculate", "--db"])
        .arg(&db)
        .assert()
        .code(2)
        .stderr(contains("unsupported config version 2"));

    fs::write(
        dir.path().join("racedna.yaml"),
        "configVersion: 1\nsettings:\n  min_race: 3\n",
    )
    .unwrap();
    racedna(&dir)
        .args(["calculate", "--strict", "--db"])
        .arg(&db)
        .assert()
        .code(2)
        .stderr(contains("Unknown fields detected in strict mode"));

    // lenient mode warns and keeps going
    racedna(&dir)
        .args(["calculate", "--db"])
        .arg(&db)
        .assert()
        .success();
}
