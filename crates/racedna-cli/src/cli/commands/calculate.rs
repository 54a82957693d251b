use super::{build_runner, exit_codes, load_config, load_dataset, open_store};
use crate::cli::args::{CalculateArgs, GlobalArgs};
use racedna_core::report::console::format_run_summary;

pub async fn run(global: &GlobalArgs, args: CalculateArgs) -> anyhow::Result<i32> {
    let mut cfg = load_config(global)?;
    if let Some(n) = args.min_races {
        cfg.settings.min_races = n;
    }
    if args.limit.is_some() {
        cfg.settings.limit = args.limit;
    }
    if let Some(n) = args.parallel {
        cfg.settings.parallel = n.max(1);
    }

    let store = open_store(global)?;
    let dataset = load_dataset(&store)?;
    let runner = build_runner(store, &cfg);
    let summary = runner.run_all(dataset).await?;

    println!("{}", format_run_summary("calculate", &summary));
    if summary.total == 0 {
        eprintln!(
            "no drivers with at least {} races",
            cfg.settings.min_races
        );
        return Ok(exit_codes::FAILED);
    }
    Ok(if summary.is_success() {
        exit_codes::OK
    } else {
        exit_codes::FAILED
    })
}
