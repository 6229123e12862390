mod app;
mod cli;
mod config;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    let result = match AppConfig::from_process_env(&cli.env_file) {
        Ok(config) => app::run(&cli, &config).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
