//! Config CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config, output),
        ConfigCommands::Init { force } => init(config, output, force),
    }
}

fn show(config: &Config, output: &Output) -> Result<()> {
    let path = Config::config_dir().map(|dir| dir.join("config.toml"));

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.map(|p| p.display().to_string()),
            "config": config,
        }));
    } else {
        match path {
            Some(path) => println!("# {}", path.display()),
            None => println!("# no config directory available"),
        }
        print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
    }

    Ok(())
}

fn init(config: &Config, output: &Output, force: bool) -> Result<()> {
    let path = Config::config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if path.exists() && !force {
        anyhow::bail!("Config already exists: {} (use --force to overwrite)", path.display());
    }

    config.save_to(&path)?;
    output.verbose_ctx("config", &format!("Wrote {}", path.display()));
    output.success(&format!("Wrote config to {}", path.display()));
    Ok(())
}
