use leivo::cli::{parse_args, run_command, USAGE};
use leivo::config::ClientConfig;

use color_eyre::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Install the tracing subscriber. Logs go to stderr so stdout only carries
/// progress output.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    // Parse before any initialization so usage errors stay quiet
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("leivo: {}", e);
            eprintln!("{}", USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    color_eyre::install()?;
    init_logging();

    let config = ClientConfig::from_env();
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_command(command, config))
}
