use crate::common::{blend_with_era, describe_components};
use racedna_core::aggregate::Component;
use racedna_core::calculator_api::{guarded, TraitCalculator};
use racedna_core::dataset::DriverBundle;
use racedna_core::era::EraWeights;
use racedna_core::model::{DriverId, RaceResult, TraitKind, TraitResult};
use racedna_core::stats::{clamp_score, mean, sample_std, share};
use std::collections::BTreeSet;

const HISTORICAL_DNF_RATE: f64 = 0.15;

/// Finishing reliability, qualifying spread and points-scoring rate.
pub struct ConsistencyCalculator {
    pub era: EraWeights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinishingReliability {
    pub dnf_rate: f64,
    /// Teammate or era DNF rate the driver was measured against.
    pub reference_rate: Option<f64>,
    pub relative_reliability: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarTier {
    TopTeam,
    Midfield,
    Backmarker,
}

impl CarTier {
    pub fn expected_points_rate(self) -> f64 {
        match self {
            CarTier::TopTeam => 0.8,
            CarTier::Midfield => 0.4,
            CarTier::Backmarker => 0.1,
        }
    }
}

/// DNF share of teammates in the same races and constructors.
pub fn teammate_dnf_rate(bundle: &DriverBundle) -> Option<f64> {
    let races: BTreeSet<_> = bundle.results.iter().map(|r| r.race_id).collect();
    let constructors: BTreeSet<_> = bundle.results.iter().map(|r| r.constructor_id).collect();
    let teammates: Vec<&RaceResult> = bundle
        .all_results
        .iter()
        .filter(|r| {
            races.contains(&r.race_id)
                && constructors.contains(&r.constructor_id)
                && r.driver_id != bundle.driver_id
        })
        .collect();
    if teammates.is_empty() {
        return None;
    }
    Some(share(&teammates, |r| r.is_dnf()))
}

/// DNF share across the field in the driver's seasons.
pub fn era_dnf_rate(bundle: &DriverBundle) -> f64 {
    let years: BTreeSet<i32> = bundle.years().into_iter().collect();
    if years.is_empty() {
        return HISTORICAL_DNF_RATE;
    }
    let field: Vec<&RaceResult> = bundle
        .all_results
        .iter()
        .filter(|r| r.year.is_some_and(|y| years.contains(&y)))
        .collect();
    if field.is_empty() {
        return HISTORICAL_DNF_RATE;
    }
    share(&field, |r| r.is_dnf())
}

pub fn finishing_reliability(bundle: &DriverBundle) -> Option<FinishingReliability> {
    if bundle.results.is_empty() {
        return None;
    }
    let dnf_rate = share(&bundle.results, |r| r.is_dnf());

    let reference = teammate_dnf_rate(bundle)
        .filter(|rate| *rate > 0.0)
        .or_else(|| Some(era_dnf_rate(bundle)).filter(|rate| *rate > 0.0));
    let relative = match reference {
        Some(rate) => (rate - dnf_rate) / rate,
        None => 1.0 - dnf_rate,
    };

    Some(FinishingReliability {
        dnf_rate,
        reference_rate: reference,
        relative_reliability: relative,
        score: clamp_score((1.0 - dnf_rate) * 100.0 + relative * 20.0),
    })
}

/// Coefficient of variation of qualifying positions, blended with lap-to-lap steadiness.
pub fn qualifying_consistency(bundle: &DriverBundle) -> Option<f64> {
    let positions: Vec<f64> = bundle
        .qualifying
        .iter()
        .filter_map(|q| q.position.map(f64::from))
        .collect();
    if positions.len() < 5 {
        return None;
    }

    let std = sample_std(&positions)?;
    let avg = mean(&positions)?;
    let cv = if avg > 0.0 { std / avg } else { std };
    let cv_score = (100.0 - cv * 100.0).max(0.0);

    Some(clamp_score(
        cv_score * 0.7 + consecutive_consistency(&positions) * 0.3,
    ))
}

fn consecutive_consistency(positions: &[f64]) -> f64 {
    if positions.len() < 3 {
        return 50.0;
    }
    let diffs: Vec<f64> = positions.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    match mean(&diffs) {
        Some(avg) => (100.0 - avg * 5.0).max(0.0),
        None => 50.0,
    }
}

/// Tier of the driver's first constructor by its average points across the field.
pub fn car_tier(bundle: &DriverBundle) -> CarTier {
    let Some(first) = bundle.results.first() else {
        return CarTier::Midfield;
    };
    let points: Vec<f64> = bundle
        .all_results
        .iter()
        .filter(|r| r.constructor_id == first.constructor_id)
        .map(|r| r.points)
        .collect();
    match mean(&points) {
        None => CarTier::Midfield,
        Some(avg) if avg >= 6.0 => CarTier::TopTeam,
        Some(avg) if avg >= 1.0 => CarTier::Midfield,
        Some(_) => CarTier::Backmarker,
    }
}

pub fn points_reliability(bundle: &DriverBundle) -> Option<f64> {
    let finished: Vec<&RaceResult> = bundle.results.iter().filter(|r| !r.is_dnf()).collect();
    if finished.is_empty() {
        return None;
    }

    let rate = share(&finished, |r| r.points > 0.0);
    let expected = car_tier(bundle).expected_points_rate();
    let reliability = (rate / expected * 50.0 + 25.0).min(100.0);

    let scored: Vec<f64> = finished
        .iter()
        .map(|r| r.points)
        .filter(|p| *p > 0.0)
        .collect();
    let score = if scored.len() > 1 {
        reliability * 0.8 + points_spread(&scored) * 0.2
    } else {
        reliability
    };
    Some(clamp_score(score))
}

fn points_spread(points: &[f64]) -> f64 {
    match (sample_std(points), mean(points)) {
        (Some(std), Some(avg)) if avg > 0.0 => (100.0 - std / avg * 50.0).max(0.0),
        _ => 50.0,
    }
}

impl ConsistencyCalculator {
    pub fn new(era: EraWeights) -> Self {
        Self { era }
    }

    fn try_calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> anyhow::Result<TraitResult> {
        if !self.validate(driver_id, bundle) {
            return Ok(TraitResult::insufficient(
                "Insufficient data for consistency calculation",
            ));
        }

        let reliability = finishing_reliability(bundle);
        let components = [
            Component::new(
                "finishing_reliability",
                0.4,
                reliability.as_ref().map(|r| r.score),
            ),
            Component::new("qualifying_consistency", 0.35, qualifying_consistency(bundle)),
            Component::new("points_reliability", 0.25, points_reliability(bundle)),
        ];
        let notes = describe_components(&[
            ("Finishing reliability", components[0].value),
            ("Qualifying consistency", components[1].value),
            ("Points reliability", components[2].value),
        ]);

        let Some(mut result) =
            blend_with_era(&components, &self.era, &bundle.results, notes, bundle.race_count())
        else {
            return Ok(TraitResult::insufficient(
                "Insufficient data for consistency calculation",
            ));
        };
        if let Some(r) = reliability {
            let stats = &mut result.contributing_stats;
            stats.insert("dnf_rate".into(), Some(r.dnf_rate));
            stats.insert("relative_reliability".into(), Some(r.relative_reliability));
        }
        Ok(result)
    }
}

impl TraitCalculator for ConsistencyCalculator {
    fn kind(&self) -> TraitKind {
        TraitKind::Consistency
    }

    fn min_races(&self) -> usize {
        15
    }

    fn describe(&self) -> &'static str {
        "Measures racing consistency through finishing reliability, qualifying consistency, \
         and points scoring reliability. Higher scores indicate more predictable and reliable performance."
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult {
        guarded(self.kind(), driver_id, || self.try_calculate(driver_id, bundle))
    }
}
