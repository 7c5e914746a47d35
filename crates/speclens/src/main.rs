//! Binary entry point for the speclens CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Lenses for one spec file, as JSON
//! speclens lens spec/models/user_spec.rb
//!
//! # Several files, human-readable
//! speclens --format text lens spec/models/user_spec.rb spec/requests/api_spec.rb
//!
//! # Which base command would terminal runs use here?
//! speclens --workspace ~/src/app base-command
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use speclens::cli::{render_text, resolve_workspace, run_base_command, run_lens, RunOptions};
use speclens_core::error::{LensError, OutputErrorCode};
use speclens_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Run and debug code lenses for RSpec spec files.
///
/// Output is JSON on stdout unless `--format text` is given; diagnostics go
/// to stderr.
#[derive(Parser, Debug)]
#[command(name = "speclens", version, about = "Code lenses for RSpec spec files")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Base command for terminal runs, used verbatim (e.g. `bin/rspec --fail-fast`).
    #[arg(long = "command", global = true)]
    base_command: Option<String>,

    /// Log one `[CodeLens]` line per processed call.
    #[arg(long, global = true)]
    debug: bool,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Write log lines as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// One line per example or group.
    Text,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Compute code lenses for spec files.
    Lens {
        /// Spec files, absolute or relative to the workspace root.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the base command terminal runs would use.
    BaseCommand,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
///
/// `RUST_LOG` wins over `--log-level`; `--debug` raises the default to DEBUG
/// so the per-call lines are visible.
fn init_tracing(global: &GlobalArgs) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let level = if global.debug {
        tracing::Level::DEBUG.max(global.log_level.to_tracing_level())
    } else {
        global.log_level.to_tracing_level()
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);

    if global.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), LensError> {
    let workspace_root = resolve_workspace(cli.global.workspace.as_deref())?;
    let options = RunOptions {
        command_override: cli.global.base_command.clone(),
        debug: cli.global.debug,
    };

    let mut stdout = io::stdout();
    match cli.command {
        Command::Lens { files } => {
            let response = run_lens(&workspace_root, &files, &options)?;
            match cli.global.format {
                OutputFormat::Json => emit_response(&response, &mut stdout)?,
                OutputFormat::Text => writeln!(stdout, "{}", render_text(&response))?,
            }
        }
        Command::BaseCommand => {
            let response = run_base_command(&workspace_root, &options)?;
            match cli.global.format {
                OutputFormat::Json => emit_response(&response, &mut stdout)?,
                OutputFormat::Text => writeln!(
                    stdout,
                    "{} ({})",
                    response.base_command, response.base_command.source
                )?,
            }
        }
    }
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
