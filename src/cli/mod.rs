//! CLI module for Pixelboard
//!
//! Provides commands:
//! - `serve`: Start the canvas server
//! - `palette`: Print the palette as JSON
//! - `config`: Print the effective configuration as TOML

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::server;

/// Pixelboard shared pixel canvas
#[derive(Parser, Debug)]
#[command(name = "pixelboard")]
#[command(about = "Shared pixel canvas server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server
    Serve(ServeArgs),
    /// Print the palette as JSON
    Palette,
    /// Print the effective configuration
    Config,
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long)]
    pub host: Option<String>,
    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn apply(&self, config: &mut server::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => {
            let mut config = server::load_config()?;
            args.apply(&mut config);
            server::run(config).await
        }
        Some(Commands::Palette) => {
            let json = pixelboard_canvas::encode::palette_json(&pixelboard_canvas::Palette::burn())
                .context("Failed to encode palette")?;
            println!("{}", String::from_utf8_lossy(&json));
            Ok(())
        }
        Some(Commands::Config) => {
            print!("{}", server::load_config()?.to_toml()?);
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
