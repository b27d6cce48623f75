//! CLI module for the relay
//!
//! Runs the HTTP server or manages the VAPID key without starting it.

use clap::{Parser, Subcommand};

use crate::{
    configuration::{get_configuration, set_configuration, Config},
    error::Error,
    vapid::VapidKeys,
};

/// Web push notification relay
#[derive(Parser)]
#[command(name = "push-relay")]
#[command(about = "Web push notification relay", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default if no command specified)
    Serve,

    /// Generate a VAPID key pair at the configured path
    GenerateKeys {
        /// Replace an existing key. Browsers subscribed with the old key
        /// stop receiving notifications.
        #[arg(long)]
        force: bool,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

pub fn run_generate_keys(force: bool) -> Result<(), Error> {
    let config = init_config()?;
    let path = &config.vapid_private_key;

    if path.exists() && !force {
        return Err(Error::ConfigurationError(format!(
            "VAPID key already exists at {}, use --force to replace it",
            path.display()
        )));
    }

    let keys = VapidKeys::generate()?;
    keys.write(path)?;
    tracing::info!("VAPID public key: {}", keys.public_key());

    Ok(())
}
