use super::{build_runner, exit_codes, load_config, load_dataset, open_store, resolve_driver};
use crate::cli::args::{GlobalArgs, TimelineArgs};
use racedna_core::report::console::{format_run_summary, format_timeline};

pub async fn run(global: &GlobalArgs, args: TimelineArgs) -> anyhow::Result<i32> {
    let mut cfg = load_config(global)?;
    if args.limit.is_some() {
        cfg.settings.limit = args.limit;
    }

    let store = open_store(global)?;
    let dataset = load_dataset(&store)?;
    let runner = build_runner(store.clone(), &cfg);
    let summary = runner.run_timeline(dataset.clone()).await?;
    println!("{}", format_run_summary("timeline", &summary));

    if let Some(needle) = &args.driver {
        let driver = resolve_driver(&dataset, needle)?;
        let entries = store.get_timeline(driver.driver_id)?;
        println!("{} (#{})", driver.full_name(), driver.driver_id);
        if entries.is_empty() {
            println!("  no seasons with at least {} races", cfg.settings.min_races_per_season);
        } else {
            print!("{}", format_timeline(&entries));
        }
    }

    Ok(if summary.is_success() {
        exit_codes::OK
    } else {
        exit_codes::FAILED
    })
}
