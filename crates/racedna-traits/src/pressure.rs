use crate::common::blend_with_era;
use racedna_core::aggregate::Component;
use racedna_core::calculator_api::{guarded, TraitCalculator};
use racedna_core::dataset::DriverBundle;
use racedna_core::era::EraWeights;
use racedna_core::model::{DriverId, RaceId, RaceResult, TraitKind, TraitResult, NEUTRAL_SCORE};
use racedna_core::stats::{clamp_range, mean, share};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Results in title fights, season finales, must-win races and comebacks.
pub struct PressureCalculator {
    pub era: EraWeights,
}

/// Results paired with the driver's championship position after that race.
fn with_standings(bundle: &DriverBundle) -> Vec<(&RaceResult, u32)> {
    let standing: HashMap<RaceId, u32> = bundle
        .standings
        .iter()
        .filter_map(|s| Some((s.race_id, s.position?)))
        .collect();
    bundle
        .results
        .iter()
        .filter_map(|r| Some((r, *standing.get(&r.race_id)?)))
        .collect()
}

fn avg_order(rows: &[&RaceResult]) -> Option<f64> {
    let orders: Vec<f64> = rows.iter().map(|r| r.position_order as f64).collect();
    mean(&orders)
}

/// Finishing order while top three in the standings versus the rest.
pub fn championship_pressure(bundle: &DriverBundle) -> Option<f64> {
    let merged = with_standings(bundle);
    let (pressure, normal): (Vec<_>, Vec<_>) = merged.iter().partition(|(_, pos)| *pos <= 3);
    if pressure.len() < 3 || normal.len() < 5 {
        return None;
    }
    let pressure: Vec<&RaceResult> = pressure.iter().map(|(r, _)| *r).collect();
    let normal: Vec<&RaceResult> = normal.iter().map(|(r, _)| *r).collect();

    // negative effect: better under pressure
    let effect = avg_order(&pressure)? - avg_order(&normal)?;
    Some(if effect < -2.0 {
        80.0 + ((effect + 2.0).abs() * 3.0).min(20.0)
    } else if effect < 0.0 {
        60.0 + effect.abs() * 10.0
    } else if effect < 2.0 {
        50.0 - effect * 5.0
    } else {
        (40.0 - (effect - 2.0) * 5.0).max(10.0)
    })
}

/// Race ids of the last three rounds of every season in the calendar.
fn season_finales(bundle: &DriverBundle) -> HashSet<RaceId> {
    let mut seasons: BTreeMap<i32, Vec<(u32, RaceId)>> = BTreeMap::new();
    for race in &bundle.races {
        seasons
            .entry(race.year)
            .or_default()
            .push((race.round, race.race_id));
    }
    seasons
        .into_values()
        .flat_map(|mut rounds| {
            rounds.sort_unstable();
            let skip = rounds.len().saturating_sub(3);
            rounds.into_iter().skip(skip).map(|(_, id)| id)
        })
        .collect()
}

pub fn season_ending_performance(bundle: &DriverBundle) -> Option<f64> {
    if bundle.races.is_empty() {
        return None;
    }
    let finales = season_finales(bundle);
    let (finals, normal): (Vec<&RaceResult>, Vec<&RaceResult>) = bundle
        .results
        .iter()
        .partition(|r| finales.contains(&r.race_id));
    if finals.len() < 3 || normal.len() < 5 {
        return None;
    }

    let diff = avg_order(&normal)? - avg_order(&finals)?;
    Some(if diff > 2.0 {
        (70.0 + diff * 5.0).min(95.0)
    } else if diff > 0.0 {
        50.0 + diff * 10.0
    } else {
        (50.0 + diff * 8.0).max(20.0)
    })
}

/// Podium rate while fifth or lower in the standings, relative to the overall rate.
pub fn must_win_performance(bundle: &DriverBundle) -> Option<f64> {
    let merged = with_standings(bundle);
    let desperate: Vec<&RaceResult> = merged
        .iter()
        .filter(|(_, pos)| *pos >= 5)
        .map(|(r, _)| *r)
        .collect();
    if desperate.len() < 5 {
        return None;
    }

    let overall = share(&merged, |(r, _)| r.position_order <= 3);
    if overall == 0.0 {
        return Some(NEUTRAL_SCORE);
    }
    let factor = share(&desperate, |r| r.position_order <= 3) / overall;
    Some(if factor > 1.5 {
        (60.0 + (factor - 1.0) * 30.0).min(90.0)
    } else if factor > 1.0 {
        50.0 + (factor - 1.0) * 20.0
    } else {
        (50.0 * factor).max(20.0)
    })
}

/// Points finishes and places gained from starts of 15th or worse.
pub fn recovery_performance(bundle: &DriverBundle) -> Option<f64> {
    let poor: Vec<(f64, &RaceResult)> = bundle
        .results
        .iter()
        .filter_map(|r| {
            let start = bundle.start_position(r)?;
            (start >= 15).then_some((start as f64, r))
        })
        .collect();
    if poor.len() < 3 {
        return None;
    }

    let rate = share(&poor, |(_, r)| r.position_order <= 10);
    let gains: Vec<f64> = poor
        .iter()
        .map(|(start, r)| start - r.position_order as f64)
        .collect();
    let gained = mean(&gains)?;
    Some(clamp_range(
        rate * 40.0 + clamp_range(gained * 2.0, 0.0, 40.0) + 20.0,
        10.0,
        95.0,
    ))
}

impl PressureCalculator {
    pub fn new(era: EraWeights) -> Self {
        Self { era }
    }

    fn try_calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> anyhow::Result<TraitResult> {
        if !self.validate(driver_id, bundle) || bundle.standings.is_empty() {
            return Ok(TraitResult::insufficient(
                "Insufficient data for pressure performance calculation",
            ));
        }

        let measured = [
            ("championship_pressure", 0.4, championship_pressure(bundle)),
            ("season_ending_performance", 0.25, season_ending_performance(bundle)),
            ("must_win_performance", 0.2, must_win_performance(bundle)),
            ("recovery_performance", 0.15, recovery_performance(bundle)),
        ];
        let neutral = measured.iter().filter(|(_, _, v)| v.is_none()).count();
        let components: Vec<Component> = measured
            .iter()
            .map(|(name, weight, v)| Component::new(*name, *weight, Some(v.unwrap_or(NEUTRAL_SCORE))))
            .collect();

        let mut notes = format!("Based on {} pressure components", components.len());
        if neutral > 0 {
            notes.push_str(&format!(", {} neutral for lack of situations", neutral));
        }
        let Some(mut result) =
            blend_with_era(&components, &self.era, &bundle.results, notes, bundle.race_count())
        else {
            return Ok(TraitResult::insufficient(
                "Insufficient data for pressure performance calculation",
            ));
        };
        // neutral fill-ins are blended but not reported as measured
        for (name, _, v) in &measured {
            if v.is_none() {
                result.contributing_stats.insert(name.to_string(), None);
            }
        }
        Ok(result)
    }
}

impl TraitCalculator for PressureCalculator {
    fn kind(&self) -> TraitKind {
        TraitKind::PressurePerformance
    }

    fn min_races(&self) -> usize {
        20
    }

    fn describe(&self) -> &'static str {
        "Measures performance under high-pressure situations like championship battles and crucial moments"
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult {
        guarded(self.kind(), driver_id, || self.try_calculate(driver_id, bundle))
    }
}
