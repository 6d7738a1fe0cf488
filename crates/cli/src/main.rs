mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{EnvArgs, cmd_check, cmd_info, cmd_matrix, cmd_resolve};
use crate::output::print_error;

/// modplan - conditional module dependency resolver
#[derive(Parser)]
#[command(name = modplan_lib::consts::APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a project's target into a build plan
  Resolve {
    /// Path to the project file
    project: PathBuf,

    #[command(flatten)]
    env: EnvArgs,

    /// Maximum dependency chain length (overrides MODPLAN_MAX_DEPTH)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Write the serialized plan to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the serialized plan as JSON
    #[arg(long)]
    json: bool,
  },

  /// Resolve a project's target for every known platform
  Matrix {
    /// Path to the project file
    project: PathBuf,

    /// Build configuration (Debug, DebugGame, Development, Test, Shipping)
    #[arg(short, long)]
    configuration: Option<String>,

    /// Feature flag, as NAME or NAME=true|false (repeatable)
    #[arg(short, long = "feature")]
    features: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Check a project for undeclared or self-referencing dependencies
  Check {
    /// Path to the project file
    project: PathBuf,
  },

  /// Show the detected host environment
  Info,
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Resolve {
      project,
      env,
      max_depth,
      output,
      json,
    } => cmd_resolve(&project, &env, max_depth, output.as_deref(), json, cli.verbose),
    Commands::Matrix {
      project,
      configuration,
      features,
      json,
    } => cmd_matrix(&project, configuration.as_deref(), &features, json),
    Commands::Check { project } => cmd_check(&project),
    Commands::Info => {
      cmd_info();
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
