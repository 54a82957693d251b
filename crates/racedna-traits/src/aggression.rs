use crate::common::{blend_with_era, describe_components};
use racedna_core::aggregate::Component;
use racedna_core::calculator_api::{guarded, TraitCalculator};
use racedna_core::dataset::DriverBundle;
use racedna_core::era::EraWeights;
use racedna_core::model::{DriverId, TraitKind, TraitResult};
use racedna_core::stats::{clamp_score, mean, share};

/// Overtaking, first-lap gains and late-race moves.
pub struct AggressionCalculator {
    pub era: EraWeights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OvertakingRate {
    pub avg_positions_gained: f64,
    /// Fraction of races with a net gain, 0..=1.
    pub overtaking_frequency: f64,
    pub max_positions_gained: f64,
    pub gain_score: f64,
    pub frequency_score: f64,
    pub peak_score: f64,
    pub score: f64,
}

/// Start position (qualifying, else grid) versus finish, over races with both.
pub fn overtaking_rate(bundle: &DriverBundle) -> Option<OvertakingRate> {
    let gains: Vec<f64> = bundle
        .results
        .iter()
        .filter_map(|r| {
            let start = bundle.start_position(r)?;
            let finish = r.position?;
            Some(start as f64 - finish as f64)
        })
        .collect();

    let avg = mean(&gains)?;
    let frequency = share(&gains, |g| *g > 0.0);
    let max_gain = gains.iter().copied().fold(f64::MIN, f64::max);

    let gain_score = clamp_score(avg * 10.0 + 50.0);
    let frequency_score = frequency * 100.0;
    let peak_score = (max_gain * 5.0).min(100.0);
    Some(OvertakingRate {
        avg_positions_gained: avg,
        overtaking_frequency: frequency,
        max_positions_gained: max_gain,
        gain_score,
        frequency_score,
        peak_score,
        score: gain_score * 0.5 + frequency_score * 0.3 + peak_score * 0.2,
    })
}

/// Lap-1 position versus grid; falls back to grid versus finish without telemetry.
pub fn first_lap_aggression(bundle: &DriverBundle) -> Option<f64> {
    let lap_one: Vec<_> = bundle.lap_times.iter().filter(|l| l.lap == 1).collect();
    if lap_one.is_empty() {
        return first_lap_fallback(bundle);
    }

    let gains: Vec<Option<f64>> = lap_one
        .iter()
        .map(|l| {
            let grid = bundle
                .results
                .iter()
                .find(|r| r.race_id == l.race_id)
                .and_then(|r| r.grid)?;
            Some(grid as f64 - l.position? as f64)
        })
        .collect();
    let known: Vec<f64> = gains.iter().flatten().copied().collect();
    let avg = mean(&known)?;

    let gain_score = clamp_score(avg * 15.0 + 50.0);
    let aggressive = share(&gains, |g| g.is_some_and(|g| g > 1.0)) * 100.0;
    Some(gain_score * 0.7 + aggressive * 0.3)
}

fn first_lap_fallback(bundle: &DriverBundle) -> Option<f64> {
    let gains: Vec<f64> = bundle
        .results
        .iter()
        .filter_map(|r| Some(r.grid? as f64 - r.position? as f64))
        .collect();
    let avg = mean(&gains)?;
    Some(clamp_score(avg * 8.0 + 50.0))
}

/// Position change over the final stint of each race with enough laps.
pub fn late_race_moves(bundle: &DriverBundle) -> Option<f64> {
    if bundle.lap_times.is_empty() {
        return None;
    }

    let mut gains = Vec::new();
    for (_, laps) in bundle.laps_by_race() {
        let laps: Vec<(u32, u32)> = laps
            .iter()
            .filter_map(|l| Some((l.lap, l.position?)))
            .collect();
        let Some(max_lap) = laps.iter().map(|(lap, _)| *lap).max() else {
            continue;
        };
        if max_lap < 10 {
            continue;
        }
        let threshold = (max_lap - 9).max((max_lap as f64 * 0.8).floor() as u32);
        let window: Vec<u32> = laps
            .iter()
            .filter(|(lap, _)| *lap >= threshold)
            .map(|(_, pos)| *pos)
            .collect();
        if window.len() < 2 {
            continue;
        }
        gains.push(window[0] as f64 - window[window.len() - 1] as f64);
    }

    let avg = mean(&gains)?;
    let gain_score = clamp_score(avg * 12.0 + 50.0);
    let frequency_score = share(&gains, |g| *g > 0.0) * 100.0;
    Some(gain_score * 0.6 + frequency_score * 0.4)
}

impl AggressionCalculator {
    pub fn new(era: EraWeights) -> Self {
        Self { era }
    }

    fn try_calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> anyhow::Result<TraitResult> {
        if !self.validate(driver_id, bundle) {
            return Ok(TraitResult::insufficient(
                "Insufficient data for aggression calculation",
            ));
        }

        let overtaking = overtaking_rate(bundle);
        let components = [
            Component::new(
                "overtaking_rate",
                0.4,
                overtaking.as_ref().map(|o| o.score),
            ),
            Component::new("first_lap_aggression", 0.35, first_lap_aggression(bundle)),
            Component::new("late_race_moves", 0.25, late_race_moves(bundle)),
        ];
        let notes = describe_components(&[
            ("Overtaking rate score", components[0].value),
            ("First lap aggression", components[1].value),
            ("Late race moves", components[2].value),
        ]);

        let Some(mut result) =
            blend_with_era(&components, &self.era, &bundle.results, notes, bundle.race_count())
        else {
            return Ok(TraitResult::insufficient(
                "Insufficient data for aggression calculation",
            ));
        };
        if let Some(o) = overtaking {
            let stats = &mut result.contributing_stats;
            stats.insert("avg_positions_gained".into(), Some(o.avg_positions_gained));
            stats.insert("overtaking_frequency".into(), Some(o.overtaking_frequency));
            stats.insert("max_positions_gained".into(), Some(o.max_positions_gained));
        }
        Ok(result)
    }
}

impl TraitCalculator for AggressionCalculator {
    fn kind(&self) -> TraitKind {
        TraitKind::Aggression
    }

    fn min_races(&self) -> usize {
        15
    }

    fn describe(&self) -> &'static str {
        "Measures racing aggression through overtaking frequency, first lap position gains, \
         and late-race attacking moves. Higher scores indicate a more aggressive racing style."
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult {
        guarded(self.kind(), driver_id, || self.try_calculate(driver_id, bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{era, laps, result, results_with};
    use racedna_core::model::QualifyingRecord;

    #[test]
    fn test_overtaking_from_qualifying() {
        let results = vec![result(1, Some(4), Some(5)), result(2, Some(4), Some(5)), result(3, Some(4), Some(5))];
        let quali = (1..=3)
            .map(|race| QualifyingRecord {
                race_id: race,
                driver_id: 1,
                constructor_id: Some(1),
                position: Some(10),
            })
            .collect();
        let bundle = DriverBundle::new(1)
            .with_results(results)
            .with_qualifying(quali);

        let o = overtaking_rate(&bundle).unwrap();
        assert_eq!(o.avg_positions_gained, 5.0);
        assert_eq!(o.overtaking_frequency, 1.0);
        assert_eq!(o.gain_score, 100.0);
        assert_eq!(o.peak_score, 25.0);
        assert!((o.score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_overtaking_uses_grid_without_qualifying() {
        let bundle = DriverBundle::new(1).with_results(vec![
            result(1, Some(3), Some(5)),
            result(2, Some(8), None),
        ]);
        let o = overtaking_rate(&bundle).unwrap();
        assert_eq!(o.avg_positions_gained, -2.0);
        assert_eq!(o.overtaking_frequency, 0.0);
        assert_eq!(o.gain_score, 30.0);
        assert_eq!(o.peak_score, -10.0);
    }

    #[test]
    fn test_first_lap_falls_back_without_telemetry() {
        let bundle = DriverBundle::new(1).with_results(vec![
            result(1, Some(5), Some(3)),
            result(2, Some(5), Some(3)),
        ]);
        // mean gain 2 -> 2*8+50
        assert_eq!(first_lap_aggression(&bundle), Some(66.0));
    }

    #[test]
    fn test_first_lap_from_lap_one() {
        let bundle = DriverBundle::new(1)
            .with_results(vec![result(1, Some(10), Some(8)), result(2, Some(10), Some(8))])
            .with_lap_times(vec![laps(1, &[7]), laps(2, &[10])].concat());
        // gains 3 and 0: mean 1.5 -> 72.5; one of two > 1 -> 50
        let s = first_lap_aggression(&bundle).unwrap();
        assert!((s - (72.5 * 0.7 + 50.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_late_race_window() {
        // 20 laps: window starts at lap 16; position 9 -> 6
        let mut positions = vec![9u32; 15];
        positions.extend([9, 8, 8, 7, 6]);
        let bundle = DriverBundle::new(1)
            .with_results(vec![result(1, Some(10), Some(6))])
            .with_lap_times(laps(1, &positions));
        // gain 3 -> 86 gain score, frequency 100
        assert_eq!(late_race_moves(&bundle), Some(86.0 * 0.6 + 100.0 * 0.4));

        let short = DriverBundle::new(1)
            .with_results(vec![result(1, Some(10), Some(6))])
            .with_lap_times(laps(1, &[5, 4, 3]));
        assert_eq!(late_race_moves(&short), None);
        assert_eq!(late_race_moves(&DriverBundle::new(1)), None);
    }

    #[test]
    fn test_below_min_races_is_default() {
        let calc = AggressionCalculator::new(era());
        let bundle = DriverBundle::new(1).with_results(results_with(14, Some(5), Some(1)));
        let r = calc.calculate(1, &bundle);
        assert_eq!(r, TraitResult::insufficient("Insufficient data for aggression calculation"));
    }

    #[test]
    fn test_full_calculation_records_era_hook() {
        let calc = AggressionCalculator::new(era());
        let bundle = DriverBundle::new(1).with_results(results_with(20, Some(5), Some(3)));
        let r = calc.calculate(1, &bundle);

        assert!(!r.is_default());
        assert_eq!(r.races_analyzed, 20);
        assert_eq!(r.stat("late_race_moves"), None);
        assert!(r.contributing_stats.contains_key("late_race_moves"));
        assert!(r.stat("era_weight_mean").is_some());
        assert!(r.notes.contains("era weighting: pass-through"));
        assert!((0.0..=100.0).contains(&r.score));
    }
}
