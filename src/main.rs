//! fsa_view_json CLI
//!
//! Usage: fsa_view_json [--version] [-w <working directory>] [-a|-i] [hostname|position]

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use fsa_view_json::config::LOG_ENV;
use fsa_view_json::version::version;
use fsa_view_json::{parse_args, run_view, Invocation, ViewError, ViewerConfig};
use tracing_subscriber::EnvFilter;

/// Filter used when the log variable is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "warn";

/// Log to stderr; stdout carries only the JSON document
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn run() -> Result<(), ViewError> {
    let args = match parse_args()? {
        Invocation::Run(args) => args,
        Invocation::ShowHelp(help) => {
            print!("{}", help);
            return Ok(());
        }
        Invocation::ShowVersion => {
            println!("{}", version());
            return Ok(());
        }
    };

    let config = ViewerConfig::resolve(args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_view(&config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("exiting with {:?}", e);
            for line in e.diagnostic() {
                eprintln!("{}", line);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
