use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid weight '{name}': {value} (must be finite and non-negative)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Invalid annealing settings: {0}")]
    InvalidAnnealing(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
