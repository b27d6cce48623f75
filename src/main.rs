use clap::Parser;
use tracing::{error, info, Level};

use push_relay::{
    cli::{init_config, run_generate_keys, Cli, Commands},
    configuration::{AppState, State},
    error::Error,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::GenerateKeys { force }) => run_generate_keys(force),
        Some(Commands::Serve) | None => run_server().await,
    }
}

async fn run_server() -> Result<(), Error> {
    let config = match init_config() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let state = State::new(config)?;
    let app_state = AppState::new(state);

    info!("VAPID public key: {}", app_state.vapid_public_key);

    server::server_task(&app_state).await
}
