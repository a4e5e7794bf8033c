//! Arguments for the resolve and get subcommands.

use super::SiteArgs;
use crate::config::{Configuration, Format, Repository};
use clap::{Args, ValueEnum};

/// Which repository to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Layer {
    /// Environment over local over global (default)
    #[default]
    Effective,
    /// Application defaults only
    Global,
    /// The site's own configuration
    Local,
    /// The environment override file
    Environment,
}

impl Layer {
    /// Pick the matching repository out of a loaded configuration.
    pub fn select<'a>(&self, config: &'a Configuration) -> &'a Repository {
        match self {
            Layer::Effective => config.repository(),
            Layer::Global => config.global(),
            Layer::Local => config.local(),
            Layer::Environment => config.environment(),
        }
    }
}

/// Arguments for the resolve subcommand
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Layer to print
    #[arg(long, value_enum, default_value_t = Layer::Effective)]
    pub layer: Layer,

    /// Output format: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: Format,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Option name
    pub key: String,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Output format for non-string values: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: Format,
}
