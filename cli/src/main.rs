use clap::Parser;
use colored::*;
use std::sync::Arc;
use tracing::{debug, info};
use tweeter_core::{
    ApiGateway, AuthService, CancellationToken, ClientConfig, FileStorage, ProfileUpdate,
    SessionStore, get_default_config_file,
};

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::{Args, Command};

/// Resolve configuration: config file, then environment and command-line overrides
fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file()?,
    };
    let file_config = ClientConfig::load_from_file(&path)?;

    let overrides = ClientConfig {
        api_url: args.api_url.clone(),
        timeout_secs: None,
        with_credentials: None,
        storage_dir: args.storage_dir.clone(),
        log_level: args.verbose.then(|| "debug".to_string()),
    };
    Ok(file_config.merge(&overrides))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads TWEETER_API_URL
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(&args)?;
    logging::init(config.log_level.as_deref().unwrap_or("warn"));
    debug!(?config, "Loaded configuration");

    let storage_dir = config.resolve_storage_dir()?;
    info!("Using session storage at {}", storage_dir.display());
    let sessions = Arc::new(SessionStore::new(Arc::new(FileStorage::new(storage_dir))));

    // Ctrl-C abandons the in-flight call instead of killing the process mid-write
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let gateway = ApiGateway::new(&config, sessions.clone())?;
    let auth = AuthService::new(gateway).with_cancellation(cancel);

    let result = match args.command {
        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => app::run_register(&auth, first_name, last_name, email, password).await,
        Command::Login { email, password } => app::run_login(&auth, email, password).await,
        Command::Logout => app::run_logout(&auth).await,
        Command::Whoami => app::run_whoami(&sessions),
        Command::Token => app::run_token(&sessions),
        Command::Profile {
            username,
            name,
            last_name,
            email,
            change_password,
        } => {
            let update = ProfileUpdate {
                username,
                name,
                last_name,
                email,
                password: None,
            };
            app::run_profile_update(&auth, update, change_password).await
        }
    };

    if let Err(e) = result {
        // Normalized API failures were already printed
        if e.downcast_ref::<tweeter_core::NormalizedResult>().is_none() {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }

    Ok(())
}
