//! Command-line argument parsing for sqlexec.

use clap::{Parser, Subcommand};
use sqlexec::config::Config;
use sqlexec::error::{Result, SqlExecError};
use std::io::Read;
use std::path::PathBuf;

/// Runs SQL against a remote query service.
#[derive(Parser, Debug)]
#[command(name = "sqlexec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to the state directory instead of stderr
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a query and print the result
    Run {
        /// Query text (read from --file or stdin when omitted)
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Read the query from a file
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Export the result table to an xlsx file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Copy the result table to the clipboard
        #[arg(long)]
        copy: bool,

        /// Print the table as tab-separated text
        #[arg(long)]
        tsv: bool,

        /// Serve this file as the service's 200 response (no network)
        #[arg(long, value_name = "PATH")]
        mock_response: Option<PathBuf>,
    },

    /// Print SQL with syntax colouring
    Highlight {
        /// Read SQL from a file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Store the endpoint password in the OS keyring
    StorePassword {
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "SQLEXEC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}

/// Reads text from a file, or from stdin when no path is given.
pub fn read_input(inline: Option<&str>, file: Option<&PathBuf>) -> Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| {
            SqlExecError::config(format!("Failed to read {}: {e}", path.display()))
        });
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| SqlExecError::internal(format!("Failed to read stdin: {e}")))?;
    Ok(text)
}
