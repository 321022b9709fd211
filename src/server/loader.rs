//! Configuration loading
//!
//! Layers, lowest priority first:
//!
//! 1. `config/default.toml` compiled into the binary
//! 2. `default.toml`, `{profile}.toml` and `local.toml` in the config
//!    directory, each optional
//! 3. `PIXELBOARD_<SECTION>__<KEY>` environment variables
//!
//! The profile comes from `PIXELBOARD_ENV` (default `development`). The
//! environment layer also sees that variable, as a top-level `env` key that
//! [`AppConfig`] does not declare and therefore ignores.
//!
//! Environment values are type-inferred, so an all-digit color loses its
//! leading zeros. Colors must keep their `#`:
//! `PIXELBOARD_CANVAS__PAINT_COLOR=#008000`.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

const ENV_PREFIX: &str = "PIXELBOARD";
const PROFILE_VAR: &str = "PIXELBOARD_ENV";
const DEFAULT_PROFILE: &str = "development";
const CONFIG_DIR: &str = "config";

/// Load configuration from `./config` and the environment
pub fn load_config() -> Result<AppConfig> {
    let profile = std::env::var(PROFILE_VAR).unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
    load_layers(Path::new(CONFIG_DIR), &profile)
}

fn load_layers(dir: &Path, profile: &str) -> Result<AppConfig> {
    let optional = |name: &str| File::from(dir.join(format!("{name}.toml"))).required(false);

    Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(optional("default"))
        .add_source(optional(profile))
        .add_source(optional("local"))
        // "_" after the prefix, "__" between section and key:
        // PIXELBOARD_CANVAS__WIDTH -> canvas.width
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to build configuration (profile {profile})"))?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
