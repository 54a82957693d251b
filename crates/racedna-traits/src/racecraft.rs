use crate::consistency::era_dnf_rate;
use crate::track;
use racedna_core::aggregate::Component;
use racedna_core::calculator_api::{guarded, TraitCalculator};
use racedna_core::config::RacecraftSettings;
use racedna_core::dataset::DriverBundle;
use racedna_core::era::EraWeights;
use racedna_core::model::{DriverId, RaceId, TraitKind, TraitResult, NEUTRAL_SCORE};
use racedna_core::stats::{clamp_range, clamp_score, mean, population_std, sample_std, share};
use std::collections::HashMap;

/// Overtaking, defending, wheel-to-wheel and strategic reads of the race.
pub struct RacecraftCalculator {
    pub era: EraWeights,
    pub settings: RacecraftSettings,
}

/// Per-race lap positions for races the driver has results in, results order.
fn race_laps(bundle: &DriverBundle) -> Vec<(RaceId, Vec<u32>)> {
    let mut by_race: HashMap<RaceId, Vec<u32>> = bundle
        .laps_by_race()
        .into_iter()
        .map(|(id, laps)| (id, laps.iter().filter_map(|l| l.position).collect()))
        .collect();
    bundle
        .results
        .iter()
        .filter_map(|r| Some((r.race_id, by_race.remove(&r.race_id)?)))
        .collect()
}

/// Lap-to-lap position deltas; negative means places gained.
fn deltas(positions: &[u32]) -> Vec<i64> {
    positions
        .windows(2)
        .map(|w| w[1] as i64 - w[0] as i64)
        .collect()
}

fn grid_vs_finish(bundle: &DriverBundle) -> Vec<f64> {
    bundle
        .results
        .iter()
        .filter_map(|r| Some(r.grid? as f64 - r.position? as f64))
        .collect()
}

impl RacecraftCalculator {
    pub fn new(era: EraWeights, settings: RacecraftSettings) -> Self {
        Self { era, settings }
    }

    fn difficulty(&self, bundle: &DriverBundle, race_id: RaceId) -> f64 {
        if !self.settings.circuit_difficulty {
            return track::DEFAULT_DIFFICULTY;
        }
        let circuit = bundle
            .results
            .iter()
            .find(|r| r.race_id == race_id)
            .and_then(|r| r.circuit.as_deref());
        track::difficulty(circuit)
    }

    pub fn overtaking_quality(&self, bundle: &DriverBundle) -> f64 {
        if bundle.lap_times.is_empty() {
            return overtaking_fallback(bundle);
        }

        let mut race_scores = Vec::new();
        for (race_id, positions) in race_laps(bundle) {
            if positions.len() < 5 {
                continue;
            }
            let gains: Vec<f64> = deltas(&positions)
                .into_iter()
                .filter(|d| *d < 0)
                .map(|d| d.unsigned_abs() as f64)
                .collect();
            let Some(avg_gain) = mean(&gains) else {
                continue;
            };
            let max_gain = gains.iter().copied().fold(0.0, f64::max);
            race_scores.push(
                (gains.len() as f64 * 10.0 + avg_gain * 15.0 + max_gain * 5.0)
                    * self.difficulty(bundle, race_id),
            );
        }

        match (mean(&race_scores), population_std(&race_scores)) {
            (Some(avg), Some(std)) => clamp_score(avg + (20.0 - std).max(0.0)),
            _ => 40.0,
        }
    }
}

fn overtaking_fallback(bundle: &DriverBundle) -> f64 {
    let gains = grid_vs_finish(bundle);
    if gains.is_empty() {
        return NEUTRAL_SCORE;
    }
    let gained: Vec<f64> = gains.iter().copied().filter(|g| *g > 0.0).collect();
    let Some(avg) = mean(&gained) else {
        return 35.0;
    };
    let frequency = gained.len() as f64 / gains.len() as f64;
    (frequency * 60.0 + (avg * 8.0).min(40.0)).min(95.0)
}

/// Laps holding position and resisting losses, over races longer than 10 laps.
pub fn defensive_driving(bundle: &DriverBundle) -> f64 {
    if bundle.lap_times.is_empty() {
        return defensive_fallback(bundle);
    }

    let race_scores: Vec<f64> = race_laps(bundle)
        .into_iter()
        .filter(|(_, positions)| positions.len() > 10)
        .map(|(_, positions)| {
            let laps = positions.len() as f64;
            let d = deltas(&positions);
            let held = d.iter().filter(|x| **x == 0).count() as f64;
            let lost = d.iter().filter(|x| **x > 0).count() as f64;
            held / laps * 50.0 + (1.0 - lost / laps).max(0.0) * 50.0
        })
        .collect();

    match mean(&race_scores) {
        Some(avg) => clamp_range(avg, 20.0, 100.0),
        None => NEUTRAL_SCORE,
    }
}

fn defensive_fallback(bundle: &DriverBundle) -> f64 {
    let gains = grid_vs_finish(bundle);
    if gains.is_empty() {
        return NEUTRAL_SCORE;
    }
    (share(&gains, |g| *g >= 0.0) * 100.0).min(90.0)
}

/// Reliability against the era plus average places made up from the grid.
pub fn wheel_to_wheel_combat(bundle: &DriverBundle) -> f64 {
    let total = bundle.results.len();
    if total < 5 {
        return NEUTRAL_SCORE;
    }
    let dnf_rate = share(&bundle.results, |r| r.is_dnf());
    let era_rate = era_dnf_rate(bundle);
    let reliability = if era_rate > 0.0 {
        1.0 - dnf_rate / era_rate
    } else {
        1.0 - dnf_rate
    };
    let position_factor = mean(&grid_vs_finish(bundle))
        .map(|g| clamp_range(g / 5.0, -1.0, 1.0))
        .unwrap_or(0.0);

    clamp_range(
        50.0 + reliability * 25.0 + position_factor * 25.0,
        20.0,
        100.0,
    )
}

/// Distinct race ids in results order, at most `n`. Races without lap data still count.
fn first_races(bundle: &DriverBundle, n: usize) -> Vec<RaceId> {
    let mut ids: Vec<RaceId> = Vec::with_capacity(n);
    for r in &bundle.results {
        if ids.len() == n {
            break;
        }
        if !ids.contains(&r.race_id) {
            ids.push(r.race_id);
        }
    }
    ids
}

/// Race-day gains over qualifying, plus late-race moves in the first ten races.
pub fn strategic_intelligence(bundle: &DriverBundle) -> f64 {
    let mut scores = Vec::new();

    let improvements: Vec<f64> = bundle
        .results
        .iter()
        .filter_map(|r| {
            let quali = bundle.qualifying_position(r.race_id)?;
            Some(quali as f64 - r.position? as f64)
        })
        .collect();
    if let (Some(avg), Some(std)) = (mean(&improvements), sample_std(&improvements)) {
        scores.push(50.0 + avg * 8.0 + 20.0 / (1.0 + std));
    }

    let mut laps: HashMap<RaceId, Vec<u32>> = race_laps(bundle).into_iter().collect();
    for race_id in first_races(bundle, 10) {
        let Some(positions) = laps.remove(&race_id) else {
            continue;
        };
        if positions.len() <= 20 {
            continue;
        }
        let start = (positions.len() as f64 * 0.67).floor() as usize;
        let final_third = &positions[start..];
        if final_third.len() <= 5 {
            continue;
        }
        let moves = deltas(final_third).iter().filter(|d| **d < 0).count() as f64;
        scores.push(40.0 + moves / final_third.len() as f64 * 60.0);
    }

    match mean(&scores) {
        Some(avg) => clamp_range(avg, 20.0, 100.0),
        None => NEUTRAL_SCORE,
    }
}

impl RacecraftCalculator {
    fn try_calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> anyhow::Result<TraitResult> {
        if !self.validate(driver_id, bundle) {
            return Ok(TraitResult::insufficient(
                "Insufficient data for racecraft calculation",
            ));
        }

        let components = [
            Component::new("overtaking_quality", 0.35, Some(self.overtaking_quality(bundle))),
            Component::new("defensive_driving", 0.25, Some(defensive_driving(bundle))),
            Component::new("wheel_to_wheel_combat", 0.25, Some(wheel_to_wheel_combat(bundle))),
            Component::new("strategic_intelligence", 0.15, Some(strategic_intelligence(bundle))),
        ];
        let used = components.iter().filter(|c| c.value.is_some()).count();
        let notes = format!("Based on {} racecraft components", used);

        Ok(crate::common::blend_with_era(
            &components,
            &self.era,
            &bundle.results,
            notes,
            bundle.race_count(),
        )
        .unwrap_or_else(|| TraitResult::insufficient("Insufficient data for racecraft calculation")))
    }
}

impl TraitCalculator for RacecraftCalculator {
    fn kind(&self) -> TraitKind {
        TraitKind::Racecraft
    }

    fn min_races(&self) -> usize {
        20
    }

    fn describe(&self) -> &'static str {
        "Measures racecraft skills including overtaking quality, defensive driving, \
         wheel-to-wheel combat, and strategic race intelligence"
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult {
        guarded(self.kind(), driver_id, || self.try_calculate(driver_id, bundle))
    }
}
