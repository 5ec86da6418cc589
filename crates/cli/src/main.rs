mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::ProjectArgs;
use output::OutputFormat;

/// strata - declarative build modules compiled to ninja
#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile build files into a ninja file
  Generate {
    #[command(flatten)]
    project: ProjectArgs,
  },

  /// Generate, then run ninja
  Build {
    #[command(flatten)]
    project: ProjectArgs,

    /// Write the ninja file but do not run ninja
    #[arg(long)]
    dry_run: bool,

    /// Targets to pass to ninja (default: every non-optional output)
    targets: Vec<String>,
  },

  /// Print the action graph
  Graph {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "error" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Generate { project } => cmd::cmd_generate(&project),
    Commands::Build {
      project,
      dry_run,
      targets,
    } => cmd::cmd_build(&project, dry_run, &targets),
    Commands::Graph { project, format } => cmd::cmd_graph(&project, format),
  }
}
