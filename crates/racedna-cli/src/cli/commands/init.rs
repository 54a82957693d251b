use super::exit_codes;
use crate::cli::args::{GlobalArgs, InitArgs};
use racedna_core::storage::Store;
use std::path::Path;

pub fn run(global: &GlobalArgs, args: InitArgs) -> anyhow::Result<i32> {
    write_sample_config_if_missing(&global.config)?;

    if !args.no_schema {
        ensure_parent_dir(&global.db)?;
        let store = Store::open(&global.db)?;
        store.init_schema()?;
        eprintln!("schema ready in {}", global.db.display());
    }
    Ok(exit_codes::OK)
}

fn write_sample_config_if_missing(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        eprintln!("note: {} already exists", path.display());
        return Ok(());
    }
    ensure_parent_dir(path)?;
    racedna_core::config::write_sample_config(path)?;
    eprintln!("created {}", path.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
