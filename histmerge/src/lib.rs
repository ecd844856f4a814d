use crate::config::Config;
use crate::engine::{MergeOptions, Merger};
use crate::errors::display_user_error;
use anyhow::Result;
use clap::Parser;
use histmerge_types::{ErrorPolicy, MergeError, ValidationMode};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod emit;
pub mod engine;
pub mod errors;
pub mod history;
pub mod loader;

pub const APP_NAME: &str = "histmerge";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// History files to merge, processed in lexical order
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Abort when any line is not a valid history record
    #[arg(long, conflicts_with = "lenient")]
    pub strict: bool,

    /// Skip lines that are not valid history records
    #[arg(long)]
    pub lenient: bool,

    /// Keep going after a fatal error and report every error at the end
    #[arg(long, conflicts_with = "fail_fast")]
    pub collect_errors: bool,

    /// Stop at the first fatal error
    #[arg(long)]
    pub fail_fast: bool,

    /// Character used in place of invalid UTF-8 bytes
    #[arg(long, value_name = "CHAR")]
    pub repair_marker: Option<char>,

    /// Read settings from this file instead of the XDG config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve merge options: flags win over the config file.
    pub fn merge_options(&self, config: &Config) -> MergeOptions {
        let validation = if self.strict {
            ValidationMode::Strict
        } else if self.lenient {
            ValidationMode::Lenient
        } else {
            config.validation
        };
        let error_policy = if self.collect_errors {
            ErrorPolicy::CollectAll
        } else if self.fail_fast {
            ErrorPolicy::FailFast
        } else {
            config.error_policy
        };
        let repair_marker = self
            .repair_marker
            .or(config.repair_marker)
            .unwrap_or(engine::DEFAULT_REPAIR_MARKER);

        MergeOptions {
            validation,
            error_policy,
            repair_marker,
        }
    }
}

pub fn lib_main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("Failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }

    setup_panic_handler();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Merge every file named on the command line and print the result to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let options = cli.merge_options(&config);
    debug!("merge options: {:?}", options);

    let mut merger = Merger::new(options);
    merger.merge_files(&cli.files)?;

    let (records, stats) = merger.finish();
    info!(
        "merged {} files: {} logical lines, {} records parsed, {} skipped, {} distinct commands",
        stats.files,
        stats.logical_lines,
        stats.parsed,
        stats.skipped,
        records.len()
    );
    info!(
        "{} inserted, {} replaced, {} discarded, {} invalid bytes repaired",
        stats.inserted, stats.replaced, stats.discarded, stats.repaired_bytes
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    emit::write_records(&mut out, &records).map_err(MergeError::Output)?;
    out.flush().map_err(MergeError::Output)?;
    Ok(())
}

pub fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}

pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload().downcast_ref::<&str>().map_or_else(
            || {
                if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic payload".to_string()
                }
            },
            |s| (*s).to_string(),
        );

        let location = panic_info.location().map_or_else(
            || "Unknown location".to_string(),
            |location| {
                format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                )
            },
        );

        let backtrace = std::backtrace::Backtrace::capture();
        let backtrace_str = match backtrace.status() {
            std::backtrace::BacktraceStatus::Captured => format!("\nBacktrace:\n{backtrace}"),
            std::backtrace::BacktraceStatus::Disabled => {
                "\nBacktrace: disabled (set RUST_BACKTRACE=1 to enable)".to_string()
            }
            _ => String::new(),
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC");

        // tracing may not be initialized yet
        tracing::error!("PANIC OCCURRED: {payload} at {location}");

        eprintln!("\n=== histmerge PANIC ===");
        eprintln!("Message: {payload}");
        eprintln!("Location: {location}");
        eprintln!("Timestamp: {timestamp}{backtrace_str}");
        eprintln!("=======================\n");
    }));
}
