//! Server configuration types
//!
//! Contains all configuration structures for the Pixelboard server.

use anyhow::{Context, Result};
use pixelboard_canvas::CanvasConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default, rename = "static")]
    pub static_files: StaticConfig,
}

impl AppConfig {
    /// Render as TOML (used by `pixelboard config`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted paint batch body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1_048_576
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Static front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticConfig {
    /// File served at `/`
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

fn default_index_path() -> PathBuf {
    PathBuf::from("index.html")
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
        }
    }
}
