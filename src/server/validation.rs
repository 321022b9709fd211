//! Startup configuration validation

use super::config::AppConfig;
use anyhow::{bail, Result};
use tracing::warn;

/// Reject settings the server cannot run with, warn about risky ones
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.server.max_body_bytes == 0 {
        bail!("server.max_body_bytes must be greater than zero");
    }

    if !config.static_files.index_path.exists() {
        warn!(
            path = %config.static_files.index_path.display(),
            "Index page not found, GET / will return 404"
        );
    }

    let is_production = std::env::var("PIXELBOARD_ENV")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    if is_production && config.server.host == "0.0.0.0" {
        warn!(
            "SECURITY WARNING: Server is binding to all interfaces (0.0.0.0) in production \
             and paint events are unauthenticated. Consider a reverse proxy."
        );
    }

    Ok(())
}
