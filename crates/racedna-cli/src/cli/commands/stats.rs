use super::{build_runner, exit_codes, load_config, load_dataset, open_store};
use crate::cli::args::{GlobalArgs, StatsArgs};
use racedna_core::report::console::format_run_summary;

/// Racing stats for every profiled driver, or the eligible drivers when nothing is profiled yet.
pub async fn run(global: &GlobalArgs, args: StatsArgs) -> anyhow::Result<i32> {
    let cfg = load_config(global)?;
    let store = open_store(global)?;
    let dataset = load_dataset(&store)?;

    let mut ids = store.profile_driver_ids()?;
    if ids.is_empty() {
        ids = dataset.eligible_drivers(cfg.settings.min_races, args.limit.or(cfg.settings.limit));
        tracing::info!(
            event = "racedna.stats.no_profiles",
            drivers = ids.len(),
            "no profiles yet, using eligible drivers"
        );
    }

    let runner = build_runner(store, &cfg);
    let summary = runner.run_racing_stats(dataset, ids).await?;
    println!("{}", format_run_summary("stats", &summary));
    Ok(if summary.is_success() {
        exit_codes::OK
    } else {
        exit_codes::FAILED
    })
}
