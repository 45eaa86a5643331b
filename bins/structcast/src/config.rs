use clap::{Args, Parser, Subcommand, ValueEnum};
use structcast::Value;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "structcast", about = "Layered settings loader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the settings file, environment and overrides, then print the result
    Load(LoadArgs),
}

#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// Path to the TOML settings file (skipped when missing)
    #[arg(long, default_value = "settings.toml", env = "STRUCTCAST_CONFIG")]
    pub config: String,

    /// Prefix of environment variables taken as settings; `__` nests
    #[arg(long, default_value = "APP_")]
    pub env_prefix: String,

    /// Override a setting, `.` nests; repeat a key to build a list
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Toml,
}

// ---- TOML settings file ----

/// Read the settings file as a dynamic value. A missing file is an empty layer.
pub fn load_settings_file(path: &str) -> Result<Value, CliError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(config = %path, "no settings file, skipping");
            return Ok(Value::Null);
        }
        Err(e) => {
            return Err(CliError::Config { context: "read", detail: format!("'{path}': {e}") });
        }
    };
    parse_settings(&content)
        .map_err(|detail| CliError::Config { context: "parse", detail: format!("'{path}': {detail}") })
}

fn parse_settings(content: &str) -> Result<Value, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    let json = serde_json::to_value(table).map_err(|e| e.to_string())?;
    Ok(Value::from(json))
}
