//! dotlink: link configuration files from a managed store into your home
//! directory, with restorable backups of anything already in the way.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod mapping;
mod paths;
mod platform;

use config::Config;

#[derive(Parser)]
#[command(name = "dotlink")]
#[command(about = "Link dotfiles from a managed store into your home directory", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the symlinks described by the mapping file
    Link {
        /// Path to the mapping file
        #[arg(default_value = config::DEFAULT_MAPPING_FILE)]
        mapping: String,
    },

    /// Archive existing link destinations into a restorable backup
    Backup {
        /// Include every existing destination without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Link { mapping } => {
            let config = Config::with_mapping(mapping)?;
            commands::link::execute(&config)?;
        }

        Commands::Backup { yes } => {
            let config = Config::from_env()?;
            if yes {
                commands::backup::execute(&config, &mut commands::backup::AlwaysConfirm)?;
            } else {
                commands::backup::execute(&config, &mut commands::backup::StdinConfirm)?;
            }
        }
    }

    Ok(())
}
