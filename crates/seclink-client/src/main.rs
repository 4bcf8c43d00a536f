//! Seclink client binary.
//!
//! # Usage
//!
//! ```bash
//! # Connect with defaults
//! seclink-client --server 127.0.0.1:4000
//!
//! # Load the server address and logging from a JSON file
//! seclink-client --config seclink.json
//! ```
//!
//! Type a line to send it; type "exit" or close stdin to end the session.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use seclink_client::ClientConfig;
use seclink_core::{Config, CredentialStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Seclink secure messaging client
#[derive(Parser, Debug)]
#[command(name = "seclink-client")]
#[command(about = "Seclink secure messaging client")]
#[command(version)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Server address to connect to (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Local identity for the session gate
    #[arg(long, default_value = "user")]
    username: String,

    /// Credential for the local identity
    #[arg(long, default_value = "pass")]
    credential: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.config.as_deref().map(Config::load).transpose()?;

    let log_level = config.as_ref().map_or_else(|| args.log_level.clone(), |c| c.log_level.clone());
    let log_file = config.as_ref().and_then(|c| c.log_file_path.clone());
    init_logging(&log_level, log_file.as_deref())?;

    let server_address = args
        .server
        .clone()
        .or_else(|| config.as_ref().map(Config::endpoint))
        .unwrap_or_else(|| "127.0.0.1:4000".to_owned());

    let users = match config.as_ref().filter(|c| !c.users.is_empty()) {
        Some(c) => c.users.clone(),
        None => HashMap::from([(args.username.clone(), args.credential.clone())]),
    };

    seclink_client::run(ClientConfig {
        server_address,
        username: args.username,
        credential: args.credential,
        store: CredentialStore::new(users),
    })
    .await?;

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
