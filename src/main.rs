use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gitversion::calculator::{VersionCalculator, VARIABLE_NAMES};
use gitversion::config;
use gitversion::git::Git2Repository;
use gitversion::ui;

#[derive(clap::Parser)]
#[command(
    name = "gitversion",
    about = "Calculate the semantic version of a git branch from its history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch to version instead of the checked out one")]
    branch: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path inside the git repository")]
    path: PathBuf,

    #[arg(long, value_name = "NAME", help = "Print only one variable, e.g. FullSemVer")]
    show_variable: Option<String>,

    #[arg(long, help = "Log calculation steps to stderr")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("gitversion {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let repo = Git2Repository::open(&args.path)
        .with_context(|| format!("Not in a git repository: {}", args.path.display()))?;
    let history = repo.snapshot(args.branch.as_deref())?;

    let result = VersionCalculator::new(&config).calculate(&history)?;

    for warning in &result.warnings {
        ui::display_warning(warning);
    }

    match &args.show_variable {
        Some(name) => {
            let value = result.variable(name).with_context(|| {
                format!(
                    "Unknown variable '{}'. Available: {}",
                    name,
                    VARIABLE_NAMES.join(", ")
                )
            })?;
            ui::display_variable(&value);
        }
        None => ui::display_result(&result),
    }

    Ok(())
}
