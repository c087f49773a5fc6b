use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::export::{default_export_columns, ExportColumn, ExportOptions};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("pickbook.db")
}

/// Labels and fallbacks used while deriving catalog views.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Note type assumed when an entry carries none.
    #[serde(default = "default_note_type")]
    pub default_note_type: String,
    /// Group label for entries without a category.
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
    /// Sub-group label for entries without an issuing authority.
    #[serde(default = "default_unknown_authority_label")]
    pub unknown_authority_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_note_type: default_note_type(),
            uncategorized_label: default_uncategorized_label(),
            unknown_authority_label: default_unknown_authority_label(),
        }
    }
}

fn default_note_type() -> String {
    crate::matching::DEFAULT_NOTE_TYPE.to_string()
}

fn default_uncategorized_label() -> String {
    "Uncategorized".to_string()
}

fn default_unknown_authority_label() -> String {
    "Unknown".to_string()
}

/// Spreadsheet export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Record fields probed, in order, for the catalog number.
    #[serde(default = "default_number_fields")]
    pub number_fields: Vec<String>,
    /// Candidate columns, in output order.
    #[serde(default = "default_export_columns")]
    pub columns: Vec<ExportColumn>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            number_fields: default_number_fields(),
            columns: default_export_columns(),
        }
    }
}

fn default_number_fields() -> Vec<String> {
    vec![
        "extended_pick_number".to_string(),
        "pick_number".to_string(),
    ]
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            number_fields: config.number_fields.clone(),
            columns: config.columns.clone(),
        }
    }
}
