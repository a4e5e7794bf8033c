//! site-config
//!
//! Command-line front end for the layered site configuration resolver.

use anyhow::{Context, Result};
use clap::Parser;
use site_config::cli::resolve::{GetArgs, ResolveArgs};
use site_config::cli::{Cli, Command, SiteArgs};
use site_config::config::{Configuration, FileLoader, Settings};
use site_config::format::{format_info, format_repository, format_value};
use site_config::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let settings = Settings::discover().with_overrides(cli.app_dir.clone(), cli.env.clone());
    debug!(
        app_dir = %settings.app_dir.display(),
        env = %settings.env,
        "Using settings"
    );

    let config = Configuration::new(
        FileLoader::new(settings.app_dir.clone()),
        settings.path_table(),
        env!("CARGO_PKG_VERSION"),
    )
    .with_context(|| {
        format!(
            "Failed to load global configuration from {}",
            settings.app_dir.display()
        )
    })?;

    match cli.command {
        Command::Resolve(args) => run_resolve(config, &settings, args)?,
        Command::Check(args) => run_check(config, &settings, args)?,
        Command::Get(args) => run_get(config, &settings, args)?,
        Command::Info => print!("{}", format_info(&config)),
    }

    Ok(())
}

fn load_site(config: &mut Configuration, settings: &Settings, site: &SiteArgs) -> Result<()> {
    config
        .load_local(site.site_dir.as_deref(), &settings.env)
        .with_context(|| match &site.site_dir {
            Some(dir) => format!("Failed to load site configuration in {}", dir.display()),
            None => "Failed to load site configuration".to_string(),
        })
}

fn run_resolve(mut config: Configuration, settings: &Settings, args: ResolveArgs) -> Result<()> {
    load_site(&mut config, settings, &args.site)?;
    let repository = args.layer.select(&config);
    println!("{}", format_repository(repository, args.format)?);
    Ok(())
}

fn run_check(mut config: Configuration, settings: &Settings, args: SiteArgs) -> Result<()> {
    load_site(&mut config, settings, &args)?;

    let source = config
        .repository()
        .get_str(site_config::config::SOURCE_KEY)
        .unwrap_or(".")
        .to_string();
    let env_file = config
        .config_environment_filename()
        .map(|f| {
            if config.environment().is_empty() {
                format!(", {} not found", f)
            } else {
                format!(", {} applied", f)
            }
        })
        .unwrap_or_default();

    println!(
        "OK: {} ({} keys, environment {}{})",
        source,
        config.repository().len(),
        config.env_name(),
        env_file
    );
    Ok(())
}

fn run_get(mut config: Configuration, settings: &Settings, args: GetArgs) -> Result<()> {
    load_site(&mut config, settings, &args.site)?;
    let value = config
        .repository()
        .get(&args.key)
        .with_context(|| format!("No configuration option named \"{}\"", args.key))?;
    println!("{}", format_value(value, args.format)?);
    Ok(())
}
