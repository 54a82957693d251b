use crate::dataset::{Dataset, DriverBundle};
use crate::engine::runner::{DnaRunner, DriverStatus, RunSummary};
use crate::model::{DriverId, RaceId, RacingStats};
use crate::stats::{mean, teammate_baseline};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Career counting stats for one driver.
///
/// Race counts and finishing stats use classified results only. Championship finishes use the
/// standing after the last round the driver was classified in each season.
pub fn compute_racing_stats(bundle: &DriverBundle, now: DateTime<Utc>) -> RacingStats {
    let finishes: Vec<u32> = bundle.results.iter().filter_map(|r| r.position).collect();
    let count = |p: u32| finishes.iter().filter(|x| **x == p).count();
    let positions: Vec<f64> = finishes.iter().map(|p| *p as f64).collect();

    let calendar: HashMap<RaceId, (i32, u32)> = bundle
        .races
        .iter()
        .map(|r| (r.race_id, (r.year, r.round)))
        .collect();
    let mut final_standing: BTreeMap<i32, (u32, u32)> = BTreeMap::new();
    for s in &bundle.standings {
        let (Some((year, round)), Some(pos)) = (calendar.get(&s.race_id), s.position) else {
            continue;
        };
        let slot = final_standing.entry(*year).or_insert((*round, pos));
        if *round >= slot.0 {
            *slot = (*round, pos);
        }
    }
    let champ: Vec<u32> = final_standing.values().map(|(_, p)| *p).collect();
    let champ_f: Vec<f64> = champ.iter().map(|p| *p as f64).collect();

    let deltas: Vec<f64> = teammate_baseline(&bundle.all_results, |r| Some(r.points))
        .into_iter()
        .filter(|d| d.driver_id == bundle.driver_id)
        .map(|d| d.delta)
        .collect();

    RacingStats {
        driver_id: bundle.driver_id,
        total_races: finishes.len(),
        wins: count(1),
        second_places: count(2),
        third_places: count(3),
        podiums: finishes.iter().filter(|p| (1..=3).contains(*p)).count(),
        avg_finish_position: mean(&positions),
        best_championship_finish: champ.iter().min().copied(),
        avg_championship_finish: mean(&champ_f),
        seasons_completed: champ.len(),
        avg_teammate_points_delta: mean(&deltas),
        last_updated: now,
    }
}

impl DnaRunner {
    pub async fn run_racing_stats(
        &self,
        dataset: Arc<Dataset>,
        ids: Vec<DriverId>,
    ) -> anyhow::Result<RunSummary> {
        let store = self.store.clone();
        let summary = self
            .run_batch(ids, move |driver_id| {
                let bundle = dataset.bundle_for_driver(driver_id);
                if bundle.results.is_empty() {
                    return Ok(DriverStatus::Skipped);
                }
                let stats = compute_racing_stats(&bundle, Utc::now());
                store.upsert_racing_stats(&stats)?;
                tracing::info!(
                    event = "racedna.stats.saved",
                    driver_id,
                    wins = stats.wins,
                    podiums = stats.podiums,
                );
                Ok(DriverStatus::Saved)
            })
            .await?;
        Ok(summary)
    }
}
