//! Configuration loading: file + CLI + environment, merged with `config-rs`
//! over every field of [`AppConfig`].
//!
//! Precedence, lowest to highest: `config/default.toml` → optional override
//! file → CLI flags → environment variables (`SENSECAP_*`). Environment always
//! wins when both a flag and an environment variable are set.

use clap::Parser;
use config::{Config as ConfigRs, ConfigError as RsConfigError, Environment, File, FileFormat};
use sensecap_types::AppConfig;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error accessing configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("configuration parsing or validation error: {0}")]
    Config(#[from] RsConfigError),
}

/// CLI flags mirroring every field of [`AppConfig`]. Every field is
/// optional so that an unset flag falls through to the file/default layer
/// rather than overwriting it with `None`.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "sensecap-local-server")]
pub struct CliArgs {
    /// Path to an optional TOML file overriding config/default.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub listen_port: Option<u16>,
    #[arg(long)]
    pub listen_host: Option<String>,
    #[arg(long)]
    pub bearer_token: Option<String>,
    #[arg(long)]
    pub db_path: Option<PathBuf>,
    #[arg(long)]
    pub stt_base_url: Option<String>,
    #[arg(long)]
    pub llm_base_url: Option<String>,
    #[arg(long)]
    pub llm_text_model: Option<String>,
    #[arg(long)]
    pub llm_vision_model: Option<String>,
    #[arg(long)]
    pub tts_base_url: Option<String>,
    #[arg(long)]
    pub api_schema: Option<String>,
    #[arg(long)]
    pub api_base_url: Option<String>,
}

fn cli_args_to_json(cli: &CliArgs) -> JsonValue {
    let mut map = Map::new();
    macro_rules! put {
        ($field:ident) => {
            if let Some(v) = &cli.$field {
                map.insert(stringify!($field).to_string(), JsonValue::from(v.clone()));
            }
        };
    }
    if let Some(v) = cli.listen_port {
        map.insert("listen_port".to_string(), JsonValue::from(v));
    }
    put!(listen_host);
    put!(bearer_token);
    if let Some(v) = &cli.db_path {
        map.insert(
            "db_path".to_string(),
            JsonValue::from(v.to_string_lossy().to_string()),
        );
    }
    put!(stt_base_url);
    put!(llm_base_url);
    put!(llm_text_model);
    put!(llm_vision_model);
    put!(tts_base_url);
    put!(api_schema);
    put!(api_base_url);
    JsonValue::Object(map)
}

/// Loads the application configuration, layering `config/default.toml`, an
/// optional override file, CLI flags, and `SENSECAP_`-prefixed environment
/// variables (highest precedence, in that order).
pub fn load_config(cli: CliArgs) -> Result<AppConfig, ConfigError> {
    debug!("building configuration sources");

    let override_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("sensecap.toml"));

    let cli_json = cli_args_to_json(&cli).to_string();

    let builder = ConfigRs::builder()
        .add_source(File::with_name("config/default.toml").required(false))
        .add_source(File::from(override_path).required(false))
        .add_source(File::from_str(&cli_json, FileFormat::Json))
        .add_source(
            Environment::with_prefix("SENSECAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config_rs = builder.build()?;
    let app_config = config_rs.try_deserialize::<AppConfig>()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_become_json_fragment() {
        let cli = CliArgs {
            listen_port: Some(9090),
            bearer_token: Some("secret".to_string()),
            ..Default::default()
        };
        let json = cli_args_to_json(&cli);
        assert_eq!(json["listen_port"], 9090);
        assert_eq!(json["bearer_token"], "secret");
        assert!(json.get("llm_base_url").is_none());
    }

    #[test]
    fn load_config_falls_back_to_defaults_when_nothing_configured() {
        let cli = CliArgs {
            config: Some(PathBuf::from("/nonexistent/sensecap-test-override.toml")),
            ..Default::default()
        };
        let result = load_config(cli);
        // config/default.toml is not present in the test working directory either,
        // so every layer is empty; config-rs should still deserialize the AppConfig
        // only if every field has a default, which it does not (no field defaults
        // are registered here) -- this asserts the loader surfaces that as an error
        // rather than silently producing a half-populated struct.
        assert!(result.is_err());
    }
}
