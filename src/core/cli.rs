use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// grabs a single snapshot from the camera
    Snap {
        /// file path to save the snapshot to, defaults to the configured output directory
        #[arg(short, long)]
        output: Option<String>,
    },
    /// polls the camera for snapshots at a fixed interval
    Watch {
        /// the interval in seconds between snapshots, overrides the configuration value
        interval: Option<u64>,
    },
    /// runs a diagnostic on the camera session
    SessionDiagnostic {
        /// show the session token
        show_token: Option<bool>,
    },
}
