use super::args::*;
use anyhow::Context;
use racedna_core::config::DnaConfig;
use racedna_core::dataset::Dataset;
use racedna_core::engine::DnaRunner;
use racedna_core::model::Driver;
use racedna_core::storage::Store;
use std::sync::Arc;

pub mod calculate;
pub mod init;
pub mod list;
pub mod stats;
pub mod status;
pub mod timeline;
pub mod update;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    match cli.cmd {
        Command::Init(args) => init::run(&global, args),
        Command::Calculate(args) => calculate::run(&global, args).await,
        Command::Timeline(args) => timeline::run(&global, args).await,
        Command::Update(args) => update::run(&global, args),
        Command::List(args) => list::run(&global, args),
        Command::Stats(args) => stats::run(&global, args).await,
        Command::Status => status::run(&global),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

pub(crate) fn load_config(global: &GlobalArgs) -> anyhow::Result<DnaConfig> {
    let cfg = racedna_core::config::load_or_default(&global.config, global.strict)?;
    Ok(cfg)
}

/// Opens `--db` and makes sure the output tables exist.
pub(crate) fn open_store(global: &GlobalArgs) -> anyhow::Result<Store> {
    if !global.db.exists() {
        anyhow::bail!(
            "database {} not found (run `racedna init` or point --db at an Ergast export)",
            global.db.display()
        );
    }
    let store = Store::open(&global.db)?;
    store.init_schema()?;
    Ok(store)
}

pub(crate) fn load_dataset(store: &Store) -> anyhow::Result<Arc<Dataset>> {
    let dataset = store.load_dataset().context("failed to load source tables")?;
    Ok(Arc::new(dataset))
}

pub(crate) fn build_runner(store: Store, cfg: &DnaConfig) -> DnaRunner {
    DnaRunner::new(
        store,
        racedna_traits::default_calculators(cfg),
        cfg.settings.clone(),
    )
}

pub(crate) fn resolve_driver<'a>(dataset: &'a Dataset, needle: &str) -> anyhow::Result<&'a Driver> {
    dataset
        .find_driver(needle)
        .with_context(|| format!("driver not found: {}", needle))
}
