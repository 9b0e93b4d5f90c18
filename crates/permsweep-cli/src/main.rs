use std::process::ExitCode;

use clap::Parser;

use permsweep_cli::cli::Cli;
use permsweep_cli::config::AppConfig;
use permsweep_cli::runner::CleanupRunner;
use permsweep_core::{init_tracing, TracingConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::cli(cli.debug)) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match CleanupRunner::new(&config, cli.dry_run).run().await {
        Ok(stats) if stats.users_failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
