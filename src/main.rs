use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use verbeat::config;
use verbeat::ledger::{self, LEDGER_FILE_NAME};
use verbeat::ui;
use verbeat::VerbeatError;

#[derive(clap::Parser)]
#[command(
    name = "verbeat",
    version,
    about = "Compute M.YYMM.C versions from a milestone ledger and monthly commit activity"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log version control queries to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the current version
    Version {
        #[command(flatten)]
        target: Target,

        #[arg(long, help = "Print this instead of failing when the ledger is unusable")]
        fallback: Option<String>,
    },

    /// Print the milestone, calendar tag and commit count on separate lines
    Components {
        #[command(flatten)]
        target: Target,
    },

    /// Append the next milestone to the ledger and print it
    Bump {
        #[arg(help = "Comment recorded next to the new milestone")]
        comment: Vec<String>,

        #[arg(long, help = "Path to project root (defaults to the nearest directory with a ledger)")]
        project: Option<PathBuf>,
    },

    /// List recorded milestones in ascending order
    History {
        #[arg(long, help = "Path to project root (defaults to the nearest directory with a ledger)")]
        project: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Target {
    #[arg(long, help = "Path to project root (defaults to the nearest directory with a ledger)")]
    project: Option<PathBuf>,

    #[arg(long, help = "Date to compute the version for (YYYY-MM-DD)")]
    date: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cwd = std::env::current_dir().context("cannot determine current directory")?;

    match &args.command {
        Commands::Version { target, fallback } => {
            let date = parse_date_or_exit(target.date.as_deref());
            let root = resolve_root(target.project.as_deref(), &cwd);
            let result = composer_or_exit(&args, &root).version(date);

            match (result, fallback) {
                (Ok(version), _) => println!("{}", version),
                (Err(e), Some(fallback)) if e.is_ledger_error() => {
                    warn!(error = %e, "using fallback version");
                    println!("{}", fallback);
                }
                (Err(e), _) => exit_with(&e),
            }
        }
        Commands::Components { target } => {
            let date = parse_date_or_exit(target.date.as_deref());
            let root = resolve_root(target.project.as_deref(), &cwd);
            match composer_or_exit(&args, &root).components(date) {
                Ok(components) => ui::display_components(&components),
                Err(e) => exit_with(&e),
            }
        }
        Commands::Bump { comment, project } => {
            let root = resolve_root(project.as_deref(), &cwd);
            match composer_or_exit(&args, &root).bump_milestone(&comment.join(" ")) {
                Ok(milestone) => println!("{}", milestone),
                Err(e) => exit_with(&e),
            }
        }
        Commands::History { project } => {
            let root = resolve_root(project.as_deref(), &cwd);
            match composer_or_exit(&args, &root).history() {
                Ok(entries) => ui::display_history(&entries),
                Err(e) => exit_with(&e),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("verbeat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// An explicit `--project` wins; otherwise the nearest ancestor holding a ledger,
/// falling back to the current directory.
///
/// Discovery looks for the default `verbeat.version` name only; a `[ledger] file`
/// set in `verbeat.toml` needs `--project` or the project root as working directory.
fn resolve_root(project: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(project) = project {
        return cwd.join(project);
    }

    let root = ledger::discover(cwd, LEDGER_FILE_NAME).unwrap_or_else(|| cwd.to_path_buf());
    debug!(root = %root.display(), "resolved project root");
    root
}

fn parse_date_or_exit(date: Option<&str>) -> Option<NaiveDate> {
    let date = date?;
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            ui::display_error(&format!(
                "Invalid date format '{}'. Use YYYY-MM-DD format.",
                date
            ));
            std::process::exit(1);
        }
    }
}

fn composer_or_exit(
    args: &Args,
    root: &Path,
) -> verbeat::Verbeat<Box<dyn verbeat::vcs::VersionControl>> {
    let composer = config::load_config(args.config.as_deref(), root)
        .and_then(|config| config.composer(root));

    match composer {
        Ok(composer) => composer,
        Err(e) => exit_with(&e),
    }
}

fn exit_with(error: &VerbeatError) -> ! {
    ui::display_error(&error.to_string());
    std::process::exit(1);
}
