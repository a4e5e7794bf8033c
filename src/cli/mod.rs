//! CLI command definitions for site-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod resolve;

use clap::{Args, Parser, Subcommand};
use resolve::{GetArgs, ResolveArgs};
use std::path::PathBuf;

/// Resolve layered site configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the global configuration (overrides SITE_CONFIG_APP_DIR)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,

    /// Environment name (overrides SITE_CONFIG_ENV)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a resolved configuration layer
    Resolve(ResolveArgs),

    /// Load and validate the site configuration
    Check(SiteArgs),

    /// Print one value of the effective configuration
    Get(GetArgs),

    /// Show version, config filenames, and the environment in use
    Info,
}

/// Site selection shared by subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct SiteArgs {
    /// Site directory (defaults to the global configuration's `source`)
    #[arg(value_name = "SITE_DIR")]
    pub site_dir: Option<PathBuf>,
}
