#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("{layer} layer: {source}")]
    Layer {
        layer: &'static str,
        #[source]
        source: structcast::CoerceError,
    },

    #[error("output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output: {0}")]
    Toml(#[from] toml::ser::Error),
}
