mod commands;
mod core;
mod release;
mod ui;
mod utils;

use clap::{Args, Parser, Subcommand};
use crate::core::config::ConfigOverrides;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Release notes and reproducible web-bundle archives for desktop app releases
#[derive(Parser)]
#[command(name = "bundle-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Config file (default: search release.toml, .release.toml, .config/release.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Only print errors
  #[arg(short, long, global = true)]
  quiet: bool,

  /// Log pipeline steps to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write categorized release notes from history since the last tag
  Notes {
    #[command(flatten)]
    output: OutputArgs,
    /// Commits to include when no tag exists
    #[arg(long)]
    fallback_commits: Option<usize>,
    /// Print a JSON report instead of the summary
    #[arg(long)]
    json: bool,
  },

  /// Package the web build output into a versioned zip archive
  Package {
    #[command(flatten)]
    output: OutputArgs,
    /// Build output directory (default: dist)
    #[arg(long)]
    build_dir: Option<PathBuf>,
    /// Print a JSON report instead of the summary
    #[arg(long)]
    json: bool,
  },

  /// Run notes and package side by side
  All {
    #[command(flatten)]
    output: OutputArgs,
    /// Build output directory (default: dist)
    #[arg(long)]
    build_dir: Option<PathBuf>,
    /// Commits to include when no tag exists
    #[arg(long)]
    fallback_commits: Option<usize>,
  },
}

#[derive(Args)]
struct OutputArgs {
  /// Directory receiving release artifacts (default: release)
  #[arg(long)]
  output_dir: Option<PathBuf>,
}

impl Commands {
  fn overrides(&self) -> ConfigOverrides {
    match self {
      Commands::Notes {
        output,
        fallback_commits,
        ..
      } => ConfigOverrides {
        output_dir: output.output_dir.clone(),
        build_dir: None,
        fallback_commits: *fallback_commits,
      },
      Commands::Package { output, build_dir, .. } => ConfigOverrides {
        output_dir: output.output_dir.clone(),
        build_dir: build_dir.clone(),
        fallback_commits: None,
      },
      Commands::All {
        output,
        build_dir,
        fallback_commits,
      } => ConfigOverrides {
        output_dir: output.output_dir.clone(),
        build_dir: build_dir.clone(),
        fallback_commits: *fallback_commits,
      },
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so stdout stays parseable with --json
fn init_tracing(verbose: bool) {
  let default = if verbose { "bundle_release=debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  // The only place the process working directory is consulted
  let root = match cli.root.clone() {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => {
        eprintln!("Error: Failed to get current directory: {}", e);
        std::process::exit(1);
      }
    },
  };

  let ctx = match ReleaseContext::build(&root, cli.config.as_deref(), &cli.command.overrides()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Notes { json, .. } => commands::run_notes(&ctx, json, cli.quiet),
    Commands::Package { json, .. } => commands::run_package(&ctx, json, cli.quiet),
    Commands::All { .. } => commands::run_all(&ctx, cli.quiet),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
