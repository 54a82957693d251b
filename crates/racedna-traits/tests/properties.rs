//! Cross-calculator properties
//!
//! - Scores stay inside [0, 100] for arbitrary inputs
//! - Below the minimum race count every calculator returns the neutral default
//! - Reference scenarios for race start, aggression and consistency

use racedna_core::config::DnaConfig;
use racedna_core::dataset::DriverBundle;
use racedna_core::model::{
    Confidence, LapPosition, QualifyingRecord, RaceResult, Standing, TraitKind, NEUTRAL_SCORE,
};
use racedna_traits::aggression::overtaking_rate;
use racedna_traits::consistency::finishing_reliability;
use racedna_traits::{calculator_for, default_calculators};

fn result(race: i64, driver: i64, grid: Option<u32>, position: Option<u32>) -> RaceResult {
    RaceResult {
        race_id: race,
        driver_id: driver,
        constructor_id: 1,
        year: Some(2000 + (race / 10) as i32),
        round: Some((race % 10) as u32 + 1),
        circuit: Some(if race % 2 == 0 { "monaco" } else { "spa" }.to_string()),
        grid,
        position,
        position_order: position.unwrap_or(22),
        points: match position {
            Some(p) if p <= 10 => (11 - p) as f64,
            _ => 0.0,
        },
    }
}

/// Small deterministic generator so the bound check covers uneven inputs.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, modulo: u32) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % modulo as u64) as u32
    }
}

fn noisy_bundle(seed: u64, races: i64) -> DriverBundle {
    let mut rng = Lcg(seed);
    let mut results = Vec::new();
    let mut qualifying = Vec::new();
    let mut lap_times = Vec::new();
    let mut standings = Vec::new();
    let mut all = Vec::new();

    for race in 1..=races {
        let grid = rng.next(24) + 1;
        let finish = (rng.next(5) > 0).then(|| rng.next(24) + 1);
        results.push(result(race, 1, Some(grid), finish));
        all.push(result(race, 2, Some(rng.next(24) + 1), (rng.next(4) > 0).then_some(7)));
        qualifying.push(QualifyingRecord {
            race_id: race,
            driver_id: 1,
            constructor_id: Some(1),
            position: Some(grid),
        });
        standings.push(Standing {
            race_id: race,
            driver_id: 1,
            position: Some(rng.next(12) + 1),
            points: 0.0,
            wins: 0,
        });
        let mut pos = grid;
        for lap in 1..=(rng.next(40) + 1) {
            pos = (pos + rng.next(5)).saturating_sub(2).clamp(1, 24);
            lap_times.push(LapPosition {
                race_id: race,
                driver_id: 1,
                lap,
                position: Some(pos),
            });
        }
    }
    all.extend(results.clone());

    DriverBundle::new(1)
        .with_results(results)
        .with_qualifying(qualifying)
        .with_lap_times(lap_times)
        .with_standings(standings)
        .with_all_results(all)
}

#[test]
fn test_scores_stay_in_bounds() {
    let calculators = default_calculators(&DnaConfig::default());
    assert_eq!(calculators.len(), 5);

    for seed in 0..40 {
        let bundle = noisy_bundle(seed, 5 + (seed as i64 % 30));
        for calc in &calculators {
            let r = calc.calculate(1, &bundle);
            assert!(
                (0.0..=100.0).contains(&r.score),
                "{} scored {} for seed {}",
                calc.name(),
                r.score,
                seed
            );
            for (key, value) in &r.contributing_stats {
                assert!(
                    value.map_or(true, f64::is_finite),
                    "{}: non-finite {}",
                    calc.name(),
                    key
                );
            }
        }
    }
}

#[test]
fn test_below_min_races_returns_default() {
    let cfg = DnaConfig::default();
    for kind in TraitKind::ALL {
        let calc = calculator_for(kind, &cfg);
        assert_eq!(calc.kind(), kind);

        let bundle = noisy_bundle(7, calc.min_races() as i64 - 1);
        let r = calc.calculate(1, &bundle);
        assert!(r.is_default(), "{} should fall back", kind);
        assert_eq!(r.score, NEUTRAL_SCORE);
        assert_eq!(r.races_analyzed, 0);
        assert!(r.contributing_stats.is_empty());
        assert_eq!(r.raw_value, None);
    }
}

#[test]
fn test_race_start_holding_position_from_the_front() {
    let grids = [1u32, 2, 3, 1, 2, 3];
    let results = grids
        .iter()
        .enumerate()
        .map(|(i, g)| result(i as i64 + 1, 1, Some(*g), Some(*g)))
        .collect();
    let laps = grids
        .iter()
        .enumerate()
        .map(|(i, g)| LapPosition {
            race_id: i as i64 + 1,
            driver_id: 1,
            lap: 1,
            position: Some(*g),
        })
        .collect();
    let bundle = DriverBundle::new(1)
        .with_results(results)
        .with_lap_times(laps);

    let r = calculator_for(TraitKind::RaceStart, &DnaConfig::default()).calculate(1, &bundle);
    assert_eq!(r.score, 55.0);
    assert_eq!(r.confidence, Some(Confidence::Low));
    assert_eq!(r.stat("average_position_change"), Some(0.0));
    assert_eq!(r.stat("grid_adjustment"), Some(5.0));
}

#[test]
fn test_aggression_overtaking_from_qualifying() {
    let results = (1..=3).map(|race| result(race, 1, Some(10), Some(5))).collect();
    let qualifying = (1..=3)
        .map(|race| QualifyingRecord {
            race_id: race,
            driver_id: 1,
            constructor_id: Some(1),
            position: Some(10),
        })
        .collect();
    let bundle = DriverBundle::new(1)
        .with_results(results)
        .with_qualifying(qualifying);

    let o = overtaking_rate(&bundle).expect("rows with start and finish");
    assert_eq!(o.avg_positions_gained, 5.0);
    assert_eq!(o.overtaking_frequency, 1.0);
    assert_eq!(o.gain_score, 100.0);
}

#[test]
fn test_consistency_reliability_against_teammate() {
    let results: Vec<RaceResult> = (1..=20).map(|race| result(race, 1, Some(5), Some(5))).collect();
    let mut all: Vec<RaceResult> = (1..=20)
        .map(|race| result(race, 2, Some(6), (race % 5 != 0).then_some(6)))
        .collect();
    all.extend(results.clone());
    let bundle = DriverBundle::new(1)
        .with_results(results)
        .with_all_results(all);

    let r = finishing_reliability(&bundle).expect("has results");
    assert_eq!(r.reference_rate, Some(0.2));
    assert_eq!(r.relative_reliability, 1.0);
    assert_eq!(r.score, 100.0);
}
