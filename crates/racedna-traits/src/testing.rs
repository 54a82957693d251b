//! Fixture builders for calculator unit tests.

use racedna_core::era::EraWeights;
use racedna_core::model::{LapPosition, RaceId, RaceResult};

pub(crate) fn era() -> EraWeights {
    EraWeights {
        decay_rate: 0.1,
        floor: 0.1,
        reference_year: 2024,
    }
}

pub(crate) fn result(race: RaceId, grid: Option<u32>, position: Option<u32>) -> RaceResult {
    RaceResult {
        race_id: race,
        driver_id: 1,
        constructor_id: 1,
        year: Some(2020),
        round: Some(race as u32),
        circuit: None,
        grid,
        position,
        position_order: position.unwrap_or(20),
        points: match position {
            Some(1) => 25.0,
            Some(2) => 18.0,
            Some(3) => 15.0,
            Some(p) if p <= 10 => 11.0 - p as f64,
            _ => 0.0,
        },
    }
}

pub(crate) fn results_with(n: usize, grid: Option<u32>, position: Option<u32>) -> Vec<RaceResult> {
    (1..=n as RaceId).map(|race| result(race, grid, position)).collect()
}

/// One lap row per entry, laps numbered from 1.
pub(crate) fn laps(race: RaceId, positions: &[u32]) -> Vec<LapPosition> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| LapPosition {
            race_id: race,
            driver_id: 1,
            lap: i as u32 + 1,
            position: Some(*p),
        })
        .collect()
}
