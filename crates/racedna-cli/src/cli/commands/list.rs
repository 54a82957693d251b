use super::{exit_codes, open_store};
use crate::cli::args::{GlobalArgs, ListArgs};
use racedna_core::report::console::format_driver_table;

pub fn run(global: &GlobalArgs, args: ListArgs) -> anyhow::Result<i32> {
    let store = open_store(global)?;
    let rows = store.driver_summaries(args.min_races, args.limit)?;
    println!("{}", format_driver_table(&rows));
    Ok(exit_codes::OK)
}
