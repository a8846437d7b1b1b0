use clap::Parser;

use crate::core::{
    cli::{Cli, Command},
    configuration::get_configuration,
    logger,
};

mod core;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let configuration_file = cli
        .configuration_file
        .to_owned()
        .unwrap_or_else(|| "uvc-snapshot.toml".to_string());

    let conf = get_configuration(configuration_file).await?;

    // the handle must outlive the dispatch, dropping it stops file logging
    let _logger = logger::init(&conf.log, cli.verbosity)?;

    match &cli.command {
        Command::Snap { output } => {
            core::core::snap(&conf, output.to_owned()).await?;
        }
        Command::Watch { interval } => {
            core::core::watch(&conf, *interval).await?;
        }
        Command::SessionDiagnostic { show_token } => {
            core::core::session_diagnostic(&conf, show_token.unwrap_or(false)).await?;
        }
    }

    Ok(())
}
