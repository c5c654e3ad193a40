use crate::config::DumboConfig;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dumbo_core::build_site;
use log::{LevelFilter, info};
use std::path::Path;

pub fn make_command() -> Command {
    Command::new("dumbo")
        .about("Build a static site from HTML and markdown files")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("input")
                .value_name("INPUT_DIR")
                .help("Directory containing the site sources and its _templates")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT_DIR")
                .help("Output directory, replaced on every build")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./dumbo.toml"),
        )
        .arg(
            Arg::new("syntax-theme")
                .long("syntax-theme")
                .value_name("THEME")
                .help("Theme used to highlight fenced code blocks"),
        )
        .arg(
            Arg::new("no-highlight")
                .long("no-highlight")
                .help("Disable syntax highlighting of code blocks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

pub fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let config = DumboConfig::load(args)?;

    let source_dir = args
        .get_one::<String>("input")
        .map(Path::new)
        .context("missing INPUT_DIR")?;
    let output_dir = args
        .get_one::<String>("output")
        .map(Path::new)
        .context("missing OUTPUT_DIR")?;

    let inputs = build_site(source_dir, output_dir, &config.markdown)?;

    info!("Built {} files into {}", inputs.len(), output_dir.display());

    Ok(())
}
