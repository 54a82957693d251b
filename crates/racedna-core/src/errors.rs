#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// True when `err` (or any cause) is a configuration fault.
pub fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|e| e.is::<ConfigError>())
}
