//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, LoggingConfig, StrategySettings, TelegramSettings,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `FXSIGNAL__SCANNER__CANDLES=500`.
pub const ENV_PREFIX: &str = "FXSIGNAL";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("scanner.symbols")
        .with_list_parse_key("scanner.timeframes")
        .with_list_parse_key("strategies.enabled")
        .try_parsing(true)
}

fn build(path: &Path, required: bool, env: Environment) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()?;

    config.try_deserialize()
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, true, environment())
}

/// Like [`load_config`], falling back to built-in defaults when the file is
/// missing.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, false, environment())
}
