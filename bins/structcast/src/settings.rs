use serde::Serialize;
use structcast::Reflect;

/// Settings assembled by `structcast load`.
#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize)]
pub struct AppSettings {
    pub name: String,
    #[reflect(rename = "listen")]
    #[serde(rename = "listen")]
    pub listen_addr: String,
    pub port: u16,
    pub debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
    pub tags: Vec<String>,
    /// Limit keys sit at the top level (`max_connections`, `timeout_secs`).
    #[reflect(flatten)]
    #[serde(flatten)]
    pub limits: Option<Limits>,
    pub database: Database,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize)]
pub struct Limits {
    pub max_connections: u32,
    pub timeout_secs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize)]
pub struct Database {
    pub url: String,
    pub pool_size: u32,
}
