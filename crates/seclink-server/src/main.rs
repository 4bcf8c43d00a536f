//! Seclink server binary.
//!
//! # Usage
//!
//! ```bash
//! # Bind with defaults
//! seclink-server --bind 0.0.0.0:4000
//!
//! # Load addresses, users and logging from a JSON file
//! seclink-server --config seclink.json
//! ```
//!
//! Lines typed on stdin are sent to every connected client; Ctrl-C drains
//! the live channels before exiting.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use seclink_core::{Config, CredentialStore};
use seclink_server::{Server, ServerConfig};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Seclink secure messaging server
#[derive(Parser, Debug)]
#[command(name = "seclink-server")]
#[command(about = "Seclink secure messaging server")]
#[command(version)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Address to bind to (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Local identity for the session gate
    #[arg(long, default_value = "user")]
    username: String,

    /// Credential for the local identity
    #[arg(long, default_value = "pass")]
    credential: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.config.as_deref().map(Config::load).transpose()?;

    let log_level = config.as_ref().map_or_else(|| args.log_level.clone(), |c| c.log_level.clone());
    let log_file = config.as_ref().and_then(|c| c.log_file_path.clone());
    init_logging(&log_level, log_file.as_deref())?;

    let bind_address = args
        .bind
        .clone()
        .or_else(|| config.as_ref().map(Config::endpoint))
        .unwrap_or_else(|| "0.0.0.0:4000".to_owned());

    // Fall back to the local identity when no users are configured, so a
    // bare invocation can still accept its own client.
    let users = match config.as_ref().filter(|c| !c.users.is_empty()) {
        Some(c) => c.users.clone(),
        None => HashMap::from([(args.username.clone(), args.credential.clone())]),
    };

    let server = Server::bind(ServerConfig {
        bind_address,
        username: args.username,
        credential: args.credential,
        store: CredentialStore::new(users),
    })
    .await?;

    tracing::info!("server listening on {}", server.local_addr()?);

    let input = server.input();
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            // No receivers just means no channels are live yet.
            let _ = input.send(line);
        }
    });

    let registry = server.registry();
    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested, draining channels");
            registry.shutdown().await;
        }
    }

    Ok(())
}

fn init_logging(log_level: &str, log_file: Option<&str>) -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(fmt::layer()).with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            registry.with(fmt::layer().with_ansi(false).with_writer(Arc::new(file))).init();
        }
        None => registry.init(),
    }

    Ok(())
}
