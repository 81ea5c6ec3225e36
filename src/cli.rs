//! Command-line argument parsing for the replay harness
//!
//! Supports:
//! - Replaying a scripted session over CSV rows
//! - Showing and initializing the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::GridConfig;

/// Replay grid interaction scripts against CSV data
#[derive(Parser, Debug)]
#[command(name = "rowgrid", version, about = "Grid interaction and row-mutation engine")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a YAML script of grid events over a CSV file
    Replay(ReplayArgs),
    /// Show the config file location and effective settings
    Config {
        /// Write the default config if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// CSV file with a header line
    #[arg(long, value_name = "CSV")]
    pub rows: PathBuf,

    /// YAML script of steps
    #[arg(long, value_name = "YAML")]
    pub script: PathBuf,

    /// Grid config to use instead of the user config
    #[arg(long, value_name = "YAML")]
    pub config: Option<PathBuf>,

    /// Reject every row submit
    #[arg(long)]
    pub reject_submits: bool,

    /// Use the system clipboard instead of an in-memory one
    #[arg(long)]
    pub system_clipboard: bool,

    /// Also print the host event log as JSON
    #[arg(long)]
    pub json: bool,

    /// Start in edit mode regardless of config
    #[arg(short = 'e', long)]
    pub edit: bool,
}

impl ReplayArgs {
    /// Resolve the grid config for this run
    pub fn grid_config(&self) -> Result<GridConfig, String> {
        let mut config = match &self.config {
            Some(path) => GridConfig::load_from(path)?,
            None => GridConfig::load(),
        };
        if self.edit {
            config.edit_mode = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay_args() {
        let args = CliArgs::try_parse_from([
            "rowgrid",
            "replay",
            "--rows",
            "people.csv",
            "--script",
            "steps.yaml",
            "--reject-submits",
            "--json",
        ])
        .unwrap();
        match args.command {
            Command::Replay(replay) => {
                assert_eq!(replay.rows, PathBuf::from("people.csv"));
                assert!(replay.reject_submits);
                assert!(replay.json);
                assert!(!replay.system_clipboard);
                assert_eq!(replay.config, None);
            }
            other => panic!("expected replay, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_requires_rows_and_script() {
        assert!(CliArgs::try_parse_from(["rowgrid", "replay", "--rows", "a.csv"]).is_err());
    }
}
