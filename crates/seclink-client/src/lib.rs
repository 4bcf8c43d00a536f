//! Seclink client.
//!
//! Connects to a server, establishes one session, and runs the duplex
//! channel over the connection until the user types the exit sentinel, the
//! input stream ends, or the server closes. One connection, one session,
//! one channel; the process exits when the channel winds down.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use seclink_core::error::SessionError;
use seclink_core::{Console, CredentialStore, Session, run_channel, session};
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Capacity of the local input queue.
const INPUT_BUFFER: usize = 32;

/// Client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connecting to the server failed.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// Address that was attempted
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Session establishment failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Client runtime configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address to connect to (e.g. "127.0.0.1:4000").
    pub server_address: String,
    /// Local identity for the session gate.
    pub username: String,
    /// Credential for the local identity.
    pub credential: String,
    /// Credential store the gate verifies against.
    pub store: CredentialStore,
}

/// Connect, establish a session, and run the channel to completion.
///
/// Local input is read from stdin; inbound messages go to stdout. Returns
/// once the channel has wound down, with the session terminated and its
/// key material zeroized.
///
/// # Errors
///
/// - [`ClientError::Connect`] if the server is unreachable.
/// - [`ClientError::Session`] if authentication or key agreement fails.
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let mut stream =
        TcpStream::connect(&config.server_address).await.map_err(|source| {
            ClientError::Connect { address: config.server_address.clone(), source }
        })?;
    info!(address = %config.server_address, "connected");

    let established =
        Session::establish(&config.username, &config.credential, &config.store, &mut stream)
            .await?;
    let key = established.key().clone();
    let mut slot = Some(established);

    let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER);
    let reader = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).await.is_err() {
                break;
            }
        }
        debug!("local input ended");
    });

    run_channel(
        stream,
        key,
        input_rx,
        Console::new(tokio::io::stdout()),
        config.server_address.clone(),
    )
    .await;

    reader.abort();
    session::terminate(&mut slot);
    info!("channel closed");

    Ok(())
}
