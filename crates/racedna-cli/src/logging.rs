use crate::cli::args::{GlobalArgs, LogFormat};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "RACEDNA_LOG";

/// `--verbose` wins, then `RACEDNA_LOG`, then `log_level` from the config file.
fn filter(args: &GlobalArgs) -> EnvFilter {
    if args.verbose {
        return EnvFilter::new("debug");
    }
    if let Ok(f) = EnvFilter::try_from_env(LOG_ENV) {
        return f;
    }
    config_log_level(&args.config)
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Reads only `log_level` so logging is up before the full config parse reports anything.
fn config_log_level(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&raw).ok()?;
    doc.get("log_level")?.as_str().map(str::to_string)
}

pub fn init_logging(args: &GlobalArgs) {
    let builder = fmt()
        .with_env_filter(filter(args))
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = match args.log_format {
        LogFormat::Json => builder
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_log_level_is_read_leniently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("racedna.yaml");

        assert_eq!(config_log_level(&path), None);

        std::fs::write(&path, "configVersion: 1\nlog_level: warn\n").unwrap();
        assert_eq!(config_log_level(&path).as_deref(), Some("warn"));

        std::fs::write(&path, "configVersion: [\n").unwrap();
        assert_eq!(config_log_level(&path), None);
    }
}
