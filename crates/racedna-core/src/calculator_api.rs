use crate::dataset::DriverBundle;
use crate::era::EraWeights;
use crate::model::{DriverId, TraitKind, TraitResult};
use crate::stats::NormalizeMethod;
use serde::Serialize;

/// A trait calculator scores one behavioral dimension from a driver bundle.
///
/// `calculate` never fails: insufficient data yields
/// [`TraitResult::insufficient`], and internal errors are folded into the
/// same default with an error note (see [`guarded`]).
pub trait TraitCalculator: Send + Sync {
    fn kind(&self) -> TraitKind;

    fn min_races(&self) -> usize;

    fn describe(&self) -> &'static str;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn validate(&self, driver_id: DriverId, bundle: &DriverBundle) -> bool {
        let races = bundle.race_count();
        if races == 0 {
            tracing::warn!(
                event = "racedna.calculator.no_results",
                calculator = self.name(),
                driver_id,
                "no results for driver"
            );
            return false;
        }
        if races < self.min_races() {
            tracing::warn!(
                event = "racedna.calculator.insufficient_races",
                calculator = self.name(),
                driver_id,
                races,
                min_races = self.min_races(),
                "insufficient races"
            );
            return false;
        }
        true
    }

    fn calculate(&self, driver_id: DriverId, bundle: &DriverBundle) -> TraitResult;

    fn apply_era_weighting(&self, weights: &EraWeights, rows: &[(i32, f64)]) -> Vec<f64> {
        weights.apply(rows)
    }

    fn normalize_score(&self, values: &[f64], method: NormalizeMethod) -> f64 {
        crate::stats::normalize_score(values, method)
    }

    fn metadata(&self, driver_id: DriverId, bundle: &DriverBundle) -> CalculationMetadata {
        let years = bundle.years();
        CalculationMetadata {
            driver_id,
            total_races: bundle.race_count(),
            trait_name: self.kind(),
            min_races_required: self.min_races(),
            career_start: years.first().copied(),
            career_end: years.last().copied(),
            years_active: years.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationMetadata {
    pub driver_id: DriverId,
    pub total_races: usize,
    pub trait_name: TraitKind,
    pub min_races_required: usize,
    pub career_start: Option<i32>,
    pub career_end: Option<i32>,
    pub years_active: usize,
}

/// Runs a fallible calculation, turning an error into the default result.
pub fn guarded(
    kind: TraitKind,
    driver_id: DriverId,
    f: impl FnOnce() -> anyhow::Result<TraitResult>,
) -> TraitResult {
    match f() {
        Ok(mut r) => {
            r.score = crate::stats::clamp_score(r.score);
            r
        }
        Err(e) => {
            tracing::error!(
                event = "racedna.calculator.error",
                calculator = kind.as_str(),
                driver_id,
                error = %format!("{:#}", e),
                "calculation failed, using default"
            );
            TraitResult::errored(kind, &e)
        }
    }
}
