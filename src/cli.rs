//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// urlshortener - shorten URLs, redirect, count clicks
#[derive(Parser)]
#[command(name = "urlshortener")]
#[command(version)]
#[command(about = "A small URL shortener with click analytics and link health checks", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    RunServer,

    /// Shorten a URL
    Create {
        /// Long URL to shorten (read from stdin when omitted)
        #[arg(long, short = 'u')]
        url: Option<String>,
    },

    /// Show a link and its total clicks
    Stats {
        /// Short code
        code: String,
    },

    /// Print a sample configuration file
    ConfigGen,
}
