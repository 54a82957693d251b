use super::{build_runner, exit_codes, load_config, load_dataset, open_store, resolve_driver};
use crate::cli::args::{GlobalArgs, UpdateArgs};
use racedna_core::report::console::format_profile;

pub fn run(global: &GlobalArgs, args: UpdateArgs) -> anyhow::Result<i32> {
    let cfg = load_config(global)?;
    let store = open_store(global)?;
    let dataset = load_dataset(&store)?;
    let driver = resolve_driver(&dataset, &args.driver)?;
    let runner = build_runner(store, &cfg);

    let Some(outcome) = runner.run_driver(&dataset, driver.driver_id)? else {
        eprintln!("no race results for {} (#{})", driver.full_name(), driver.driver_id);
        return Ok(exit_codes::FAILED);
    };

    match args.format.as_str() {
        "json" => {
            let doc = serde_json::json!({
                "profile": outcome.profile,
                "breakdown": outcome.breakdowns,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        _ => print!("{}", format_profile(&outcome.profile, &outcome.breakdowns)),
    }
    Ok(exit_codes::OK)
}
