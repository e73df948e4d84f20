use clap::Parser;
use gym_tracker::{app::Cli, handlers};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match handlers::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported to the terminal by the handler.
        Err(_) => ExitCode::FAILURE,
    }
}
