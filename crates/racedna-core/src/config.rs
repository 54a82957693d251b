use crate::era::EraWeights;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "racedna.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaConfig {
    #[serde(rename = "configVersion", alias = "version", default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub era: EraSettings,
    #[serde(default)]
    pub calculators: CalculatorSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

impl Default for DnaConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            settings: Settings::default(),
            era: EraSettings::default(),
            calculators: CalculatorSettings::default(),
            log_level: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Drivers with fewer results are skipped by `calculate`.
    #[serde(default = "default_min_races")]
    pub min_races: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default = "default_parallel")]
    pub parallel: usize,
    #[serde(default = "default_min_races_per_season")]
    pub min_races_per_season: usize,
}

fn default_min_races() -> usize {
    15
}
fn default_parallel() -> usize {
    4
}
fn default_min_races_per_season() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_races: default_min_races(),
            limit: None,
            parallel: default_parallel(),
            min_races_per_season: default_min_races_per_season(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraSettings {
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// Defaults to the current calendar year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

fn default_decay_rate() -> f64 {
    0.1
}
fn default_floor() -> f64 {
    0.1
}

impl Default for EraSettings {
    fn default() -> Self {
        Self {
            decay_rate: default_decay_rate(),
            floor: default_floor(),
            reference_year: None,
        }
    }
}

impl EraSettings {
    pub fn weights(&self) -> EraWeights {
        let base = EraWeights::default();
        EraWeights {
            decay_rate: self.decay_rate,
            floor: self.floor,
            reference_year: self.reference_year.unwrap_or(base.reference_year),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSettings {
    #[serde(default)]
    pub racecraft: RacecraftSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RacecraftSettings {
    /// Look circuits up in the difficulty table instead of using 1.5 everywhere.
    #[serde(default)]
    pub circuit_difficulty: bool,
}

pub fn load_config(path: &Path, strict: bool) -> Result<DnaConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw, strict).map_err(|e| ConfigError(format!("{} (file: {})", e.0, path.display())))
}

pub fn parse_config(raw: &str, strict: bool) -> Result<DnaConfig, ConfigError> {
    let mut ignored_keys = std::collections::BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);

    let cfg: DnaConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    let meaningful_unknowns: Vec<_> = ignored_keys
        .iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();
    if !meaningful_unknowns.is_empty() {
        if strict {
            return Err(ConfigError(format!(
                "Unknown fields detected in strict mode: {:?}",
                meaningful_unknowns
            )));
        }
        tracing::warn!(
            event = "racedna.config.unknown_fields",
            fields = ?meaningful_unknowns,
            "ignored unknown config fields"
        );
    }

    validate(&cfg)?;
    Ok(cfg)
}

/// Missing file means defaults; a present but broken file is an error.
pub fn load_or_default(path: &Path, strict: bool) -> Result<DnaConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(
            event = "racedna.config.default",
            path = %path.display(),
            "config file not found, using defaults"
        );
        return Ok(DnaConfig::default());
    }
    load_config(path, strict)
}

fn validate(cfg: &DnaConfig) -> Result<(), ConfigError> {
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if cfg.settings.parallel == 0 {
        return Err(ConfigError("settings.parallel must be at least 1".into()));
    }
    if cfg.settings.min_races_per_season == 0 {
        return Err(ConfigError(
            "settings.min_races_per_season must be at least 1".into(),
        ));
    }
    if !cfg.era.decay_rate.is_finite() || cfg.era.decay_rate < 0.0 {
        return Err(ConfigError(format!(
            "era.decay_rate must be a non-negative number, got {}",
            cfg.era.decay_rate
        )));
    }
    if !(cfg.era.floor > 0.0 && cfg.era.floor <= 1.0) {
        return Err(ConfigError(format!(
            "era.floor must be in (0, 1], got {}",
            cfg.era.floor
        )));
    }
    Ok(())
}

pub const SAMPLE_CONFIG: &str = r#"configVersion: 1
settings:
  min_races: 15
  parallel: 4
  min_races_per_season: 5
era:
  decay_rate: 0.1
  floor: 0.1
calculators:
  racecraft:
    circuit_difficulty: false
"#;

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let cfg = parse_config(SAMPLE_CONFIG, true).unwrap();
        assert_eq!(cfg.settings, Settings::default());
        assert_eq!(cfg.era, EraSettings::default());
        assert!(!cfg.calculators.racecraft.circuit_difficulty);
    }

    #[test]
    fn test_version_alias_and_partial_sections() {
        let cfg = parse_config("version: 1\nsettings:\n  parallel: 8\n", false).unwrap();
        assert_eq!(cfg.settings.parallel, 8);
        assert_eq!(cfg.settings.min_races, 15);
    }

    #[test]
    fn test_unknown_keys_rejected_only_in_strict_mode() {
        let raw = "configVersion: 1\nsettings:\n  paralel: 2\n";
        assert!(parse_config(raw, false).is_ok());
        let err = parse_config(raw, true).unwrap_err();
        assert!(err.to_string().contains("settings.paralel"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("configVersion: 2\n", false).is_err());
        assert!(parse_config("settings:\n  parallel: 0\n", false).is_err());
        assert!(parse_config("era:\n  floor: 0\n", false).is_err());
        assert!(parse_config("era:\n  decay_rate: -1\n", false).is_err());
    }

    #[test]
    fn test_era_reference_year_override() {
        let cfg = parse_config("era:\n  reference_year: 2010\n", false).unwrap();
        let w = cfg.era.weights();
        assert_eq!(w.reference_year, 2010);
        assert_eq!(w.weight(2010), 1.0);
    }
}
