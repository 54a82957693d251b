use racedna_core::calculator_api::{guarded, TraitCalculator};
use racedna_core::dataset::DriverBundle;
use racedna_core::model::{Confidence, DriverId, TraitKind, TraitResult};
use racedna_core::stats::{clamp_score, mean, sample_std, share};
use std::collections::BTreeMap;

/// Places gained or lost between the grid and the end of lap 1.
#[derive(Debug, Default)]
pub struct RaceStartCalculator;

/// Start rows moving more than this many places are treated as incidents.
const INCIDENT_THRESHOLD: f64 = 10.0;

/// Front-runners have fewer places to gain.
pub fn grid_adjustment(avg_grid: f64) -> f64 {
    if avg_grid <= 5.0 {
        5.0
    } else if avg_grid <= 10.0 {
        2.0
    } else {
        -2.0
    }
}

pub fn confidence(samples: usize, std_dev: f64) -> Confidence {
    if samples >= 30 && std_dev <= 2.0 {
        Confidence::High
    } else if samples >= 15 && std_dev <= 3.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

impl RaceStartCalculator {
    fn neutral(notes: String) -> TraitResult {
        TraitResult::insufficient(notes).with_confidence(Confidence::Low)
    }

    fn try_calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> anyhow::Result<TraitResult> {
        if !self.validate(driver_id, bundle) || bundle.lap_times.is_empty() {
            return Ok(Self::neutral(
                "No race results or lap times data available".into(),
            ));
        }

        // (grid, lap-1 position) per race with both
        let rows: Vec<(f64, f64)> = bundle
            .results
            .iter()
            .filter_map(|r| {
                let grid = r.grid?;
                let lap1 = bundle.lap_position(r.race_id, 1)?;
                Some((grid as f64, lap1 as f64))
            })
            .collect();
        if rows.len() < 5 {
            return Ok(Self::neutral(format!(
                "Insufficient data: only {} races with grid/lap1 data",
                rows.len()
            )));
        }

        let clean: Vec<(f64, f64)> = rows
            .iter()
            .copied()
            .filter(|(grid, lap1)| (lap1 - grid).abs() <= INCIDENT_THRESHOLD)
            .collect();
        if clean.len() < rows.len() {
            tracing::debug!(
                event = "racedna.race_start.incidents_excluded",
                driver_id,
                excluded = rows.len() - clean.len(),
                "starts with large position swings excluded"
            );
        }
        if clean.len() < 3 {
            return Ok(Self::neutral(format!(
                "Too few clean starts: only {} races without major incidents",
                clean.len()
            )));
        }

        let changes: Vec<f64> = clean.iter().map(|(grid, lap1)| lap1 - grid).collect();
        let grids: Vec<f64> = clean.iter().map(|(grid, _)| *grid).collect();
        let avg_change = mean(&changes).unwrap_or_default();
        let avg_grid = mean(&grids).unwrap_or_default();
        let std_dev = sample_std(&changes).unwrap_or_default();
        let adjustment = grid_adjustment(avg_grid);
        let raw = 50.0 - avg_change * 5.0 + adjustment;

        let stats: BTreeMap<String, Option<f64>> = [
            ("average_position_change", avg_change),
            (
                "positions_gained_percentage",
                share(&changes, |c| *c < 0.0) * 100.0,
            ),
            ("average_grid_position", avg_grid),
            ("clean_starts_analyzed", clean.len() as f64),
            ("total_races_with_data", rows.len() as f64),
            ("standard_deviation", std_dev),
            ("grid_adjustment", adjustment),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Some(v)))
        .collect();

        Ok(TraitResult {
            score: clamp_score(raw),
            raw_value: Some(raw),
            contributing_stats: stats,
            notes: format!(
                "Average lap-1 change {:+.2} over {} clean starts",
                avg_change,
                clean.len()
            ),
            races_analyzed: bundle.race_count(),
            confidence: Some(confidence(clean.len(), std_dev)),
            insufficient_data: false,
        })
    }
}

impl TraitCalculator for RaceStartCalculator {
    fn kind(&self) -> TraitKind {
        TraitKind::RaceStart
    }

    fn min_races(&self) -> usize {
        5
    }

    fn describe(&self) -> &'static str {
        "Measures a driver's ability to gain or maintain position on the first lap of a race"
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult {
        guarded(self.kind(), driver_id, || self.try_calculate(driver_id, bundle))
    }
}
