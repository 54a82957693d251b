use crate::calculator_api::TraitCalculator;
use crate::dataset::Dataset;
use crate::engine::runner::{DnaRunner, DriverStatus, RunSummary};
use crate::model::{DriverId, TimelineEntry};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-season trait scores for one driver.
///
/// Only seasons with at least `min_per_season` results are scored. A trait
/// whose calculator fell back to its default is stored as `None`.
pub fn season_entries(
    calculators: &[Arc<dyn TraitCalculator>],
    dataset: &Dataset,
    driver_id: DriverId,
    min_per_season: usize,
) -> Vec<TimelineEntry> {
    let mut entries = Vec::new();
    for (season, races_completed) in dataset.driver_seasons(driver_id, min_per_season) {
        let bundle = dataset.bundle_for_season(driver_id, season);

        let mut trait_scores = BTreeMap::new();
        for calc in calculators {
            let result = calc.calculate(driver_id, &bundle);
            let score = (!result.is_default()).then_some(result.score);
            tracing::debug!(
                event = "racedna.timeline.trait",
                driver_id,
                season,
                calculator = calc.name(),
                score = ?score,
            );
            trait_scores.insert(calc.name().to_string(), score);
        }

        entries.push(TimelineEntry {
            driver_id,
            season,
            trait_scores,
            races_completed,
        });
    }
    entries
}

impl DnaRunner {
    /// Season-by-season scores for every driver with at least two full
    /// seasons' worth of races.
    pub async fn run_timeline(&self, dataset: Arc<Dataset>) -> anyhow::Result<RunSummary> {
        let min_per_season = self.settings.min_races_per_season.max(1);
        let ids = dataset.eligible_drivers(min_per_season * 2, self.settings.limit);
        tracing::info!(
            event = "racedna.timeline.start",
            drivers = ids.len(),
            min_races_per_season = min_per_season,
        );

        let store = self.store.clone();
        let calculators = self.calculators.clone();
        let summary = self
            .run_batch(ids, move |driver_id| {
                let entries = season_entries(&calculators, &dataset, driver_id, min_per_season);
                if entries.is_empty() {
                    return Ok(DriverStatus::Skipped);
                }
                store.save_timeline(&entries)?;
                tracing::info!(
                    event = "racedna.timeline.saved",
                    driver_id,
                    seasons = entries.len(),
                );
                Ok(DriverStatus::Saved)
            })
            .await?;

        tracing::info!(
            event = "racedna.timeline.done",
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
        );
        Ok(summary)
    }
}
