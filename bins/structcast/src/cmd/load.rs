use structcast::{Value, convert};

use crate::config::{LoadArgs, OutputFormat, load_settings_file};
use crate::error::CliError;
use crate::layers;
use crate::settings::AppSettings;

pub fn run(args: LoadArgs) -> Result<(), CliError> {
    tracing::info!("structcast load starting");

    // --- Collect layers, lowest precedence first ---
    let file = load_settings_file(&args.config)?;
    let env = layers::from_env(&args.env_prefix, std::env::vars());
    let overrides = layers::from_overrides(&args.overrides)?;

    let settings = merge(&[("file", &file), ("env", &env), ("set", &overrides)])?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&settings)?,
        OutputFormat::Toml => toml::to_string_pretty(&settings)?,
    };
    println!("{output}");
    Ok(())
}

/// Apply each layer onto the defaults in order. Keys absent from a layer keep
/// the value of the layers below it.
pub fn merge(layers: &[(&'static str, &Value)]) -> Result<AppSettings, CliError> {
    let mut settings = AppSettings::default();
    for &(layer, source) in layers {
        convert(&mut settings, source).map_err(|source| CliError::Layer { layer, source })?;
        tracing::info!(layer, "applied settings layer");
    }
    Ok(settings)
}
