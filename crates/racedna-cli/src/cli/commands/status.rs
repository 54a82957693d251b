use super::{exit_codes, open_store};
use crate::cli::args::GlobalArgs;
use racedna_core::report::console::format_status;

pub fn run(global: &GlobalArgs) -> anyhow::Result<i32> {
    let store = open_store(global)?;
    let status = store.status()?;
    let top = store.profiles_by_races(5)?;
    print!("{}", format_status(&status, &top));
    Ok(exit_codes::OK)
}
