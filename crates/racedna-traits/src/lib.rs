use std::sync::Arc;

use racedna_core::calculator_api::TraitCalculator;
use racedna_core::config::DnaConfig;
use racedna_core::model::TraitKind;

mod common;
#[cfg(test)]
mod testing;

pub mod aggression;
pub mod consistency;
pub mod pressure;
pub mod race_start;
pub mod racecraft;
pub mod track;

pub fn calculator_for(kind: TraitKind, cfg: &DnaConfig) -> Arc<dyn TraitCalculator> {
    let era = cfg.era.weights();
    match kind {
        TraitKind::Aggression => Arc::new(aggression::AggressionCalculator::new(era)),
        TraitKind::Consistency => Arc::new(consistency::ConsistencyCalculator::new(era)),
        TraitKind::RaceStart => Arc::new(race_start::RaceStartCalculator),
        TraitKind::PressurePerformance => Arc::new(pressure::PressureCalculator::new(era)),
        TraitKind::Racecraft => Arc::new(racecraft::RacecraftCalculator::new(
            era,
            cfg.calculators.racecraft.clone(),
        )),
    }
}

pub fn default_calculators(cfg: &DnaConfig) -> Vec<Arc<dyn TraitCalculator>> {
    TraitKind::ALL
        .iter()
        .map(|kind| calculator_for(*kind, cfg))
        .collect()
}
