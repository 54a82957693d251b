use crate::calculator_api::TraitCalculator;
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::model::{DnaProfile, DriverId, TraitBreakdown, TraitKind, TraitResult, NEUTRAL_SCORE};
use crate::storage::store::Store;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Everything computed for one driver in one run.
#[derive(Debug, Clone)]
pub struct DnaOutcome {
    pub profile: DnaProfile,
    pub breakdowns: Vec<TraitBreakdown>,
    pub results: BTreeMap<TraitKind, TraitResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Saved,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs every calculator over one driver's bundle and assembles the profile.
///
/// Returns `Ok(None)` when the driver has no results at all.
pub fn calculate_driver_dna(
    calculators: &[Arc<dyn TraitCalculator>],
    dataset: &Dataset,
    driver_id: DriverId,
    now: DateTime<Utc>,
) -> anyhow::Result<Option<DnaOutcome>> {
    let bundle = dataset.bundle_for_driver(driver_id);
    if bundle.results.is_empty() {
        tracing::warn!(
            event = "racedna.runner.no_results",
            driver_id,
            "no results data for driver"
        );
        return Ok(None);
    }

    let mut results = BTreeMap::new();
    let mut breakdowns = Vec::with_capacity(calculators.len());
    for calc in calculators {
        tracing::debug!(
            event = "racedna.calculator.start",
            metadata = ?calc.metadata(driver_id, &bundle),
        );
        let result = calc.calculate(driver_id, &bundle);
        tracing::debug!(
            event = "racedna.calculator.done",
            calculator = calc.name(),
            driver_id,
            score = result.score,
            races_analyzed = result.races_analyzed,
        );
        breakdowns.push(TraitBreakdown::from_result(driver_id, calc.kind(), &result)?);
        results.insert(calc.kind(), result);
    }

    let score = |kind: TraitKind| {
        results
            .get(&kind)
            .map(|r: &TraitResult| r.score)
            .unwrap_or(NEUTRAL_SCORE)
    };
    let profile = DnaProfile {
        driver_id,
        driver_name: dataset.driver_name(driver_id),
        aggression_score: score(TraitKind::Aggression),
        consistency_score: score(TraitKind::Consistency),
        pressure_performance_score: score(TraitKind::PressurePerformance),
        racecraft_score: score(TraitKind::Racecraft),
        race_start_score: results
            .get(&TraitKind::RaceStart)
            .filter(|r| !r.is_default())
            .map(|r| r.score),
        races_analyzed: bundle.race_count(),
        career_span: bundle.career_span(),
        last_updated: now,
    };

    Ok(Some(DnaOutcome {
        profile,
        breakdowns,
        results,
    }))
}

/// Batch orchestrator: one blocking task per driver, bounded by `settings.parallel`.
pub struct DnaRunner {
    pub store: Store,
    pub calculators: Vec<Arc<dyn TraitCalculator>>,
    pub settings: Settings,
}

impl DnaRunner {
    pub fn new(store: Store, calculators: Vec<Arc<dyn TraitCalculator>>, settings: Settings) -> Self {
        Self {
            store,
            calculators,
            settings,
        }
    }

    /// Computes and persists one driver.
    pub fn run_driver(&self, dataset: &Dataset, driver_id: DriverId) -> anyhow::Result<Option<DnaOutcome>> {
        process_driver(&self.store, &self.calculators, dataset, driver_id)
    }

    pub async fn run_all(&self, dataset: Arc<Dataset>) -> anyhow::Result<RunSummary> {
        let ids = dataset.eligible_drivers(self.settings.min_races, self.settings.limit);
        tracing::info!(
            event = "racedna.run.start",
            drivers = ids.len(),
            min_races = self.settings.min_races,
            parallel = self.settings.parallel,
        );

        let store = self.store.clone();
        let calculators = self.calculators.clone();
        let summary = self
            .run_batch(ids, move |driver_id| {
                let outcome = process_driver(&store, &calculators, &dataset, driver_id)?;
                Ok(match outcome {
                    Some(_) => DriverStatus::Saved,
                    None => DriverStatus::Skipped,
                })
            })
            .await?;

        tracing::info!(
            event = "racedna.run.done",
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
        );
        Ok(summary)
    }

    /// Runs `work` for every driver on the blocking pool. One driver failing
    /// (error or panic) is logged and counted; the batch continues.
    pub(crate) async fn run_batch<F>(&self, ids: Vec<DriverId>, work: F) -> anyhow::Result<RunSummary>
    where
        F: Fn(DriverId) -> anyhow::Result<DriverStatus> + Send + Sync + 'static,
    {
        let parallel = self.settings.parallel.max(1);
        let sem = Arc::new(Semaphore::new(parallel));
        let work = Arc::new(work);
        let mut handles = Vec::with_capacity(ids.len());

        for driver_id in ids {
            let permit = sem.clone().acquire_owned().await?;
            let work = work.clone();
            let h = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work(driver_id)
            });
            handles.push((driver_id, h));
        }

        let mut summary = RunSummary {
            total: handles.len(),
            ..Default::default()
        };
        for (driver_id, h) in handles {
            match h.await {
                Ok(Ok(DriverStatus::Saved)) => summary.succeeded += 1,
                Ok(Ok(DriverStatus::Skipped)) => summary.skipped += 1,
                Ok(Err(e)) => {
                    summary.failed += 1;
                    tracing::error!(
                        event = "racedna.driver.failed",
                        driver_id,
                        error = %format!("{:#}", e),
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        event = "racedna.driver.join_error",
                        driver_id,
                        error = %e,
                    );
                }
            }
        }
        Ok(summary)
    }
}

fn process_driver(
    store: &Store,
    calculators: &[Arc<dyn TraitCalculator>],
    dataset: &Dataset,
    driver_id: DriverId,
) -> anyhow::Result<Option<DnaOutcome>> {
    let Some(outcome) = calculate_driver_dna(calculators, dataset, driver_id, Utc::now())? else {
        return Ok(None);
    };
    store.save_dna(&outcome.profile, &outcome.breakdowns)?;
    tracing::info!(
        event = "racedna.driver.saved",
        driver_id,
        driver = %outcome.profile.driver_name,
        aggression = outcome.profile.aggression_score,
        consistency = outcome.profile.consistency_score,
        pressure = outcome.profile.pressure_performance_score,
        racecraft = outcome.profile.racecraft_score,
        race_start = ?outcome.profile.race_start_score,
    );
    Ok(Some(outcome))
}
