//! Seclink server.
//!
//! Accepts TCP connections and runs one secure channel per client,
//! fire-and-forget: each accepted connection gets a spawned task that
//! establishes a session and then drives the duplex channel until either
//! side closes. The accept loop never blocks on a client and a failed
//! connection never takes the server down.
//!
//! Live channels are supervised by the [`ChannelRegistry`]; shutdown waits
//! for every channel to wind down. Local operator input is broadcast to
//! all live channels, and all inbound messages share one console.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod registry;

use std::sync::Arc;

use seclink_core::{Console, CredentialStore, Session, run_channel};
use tokio::io::Stdout;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

pub use error::ServerError;
pub use registry::ChannelRegistry;

/// Capacity of the operator input fan-out.
const INPUT_BUFFER: usize = 32;

/// Server runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g. "0.0.0.0:4000").
    pub bind_address: String,
    /// Local identity used for the session gate.
    pub username: String,
    /// Credential for the local identity.
    pub credential: String,
    /// Credential store the gate verifies against.
    pub store: CredentialStore,
}

/// A bound server ready to accept connections.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    registry: Arc<ChannelRegistry>,
    input: broadcast::Sender<String>,
    console: Console<Stdout>,
}

impl Server {
    /// Bind the listen socket.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(&config.bind_address).await.map_err(ServerError::Bind)?;
        let (input, _) = broadcast::channel(INPUT_BUFFER);

        Ok(Self {
            listener,
            config,
            registry: Arc::new(ChannelRegistry::new()),
            input,
            console: Console::new(tokio::io::stdout()),
        })
    }

    /// Local address the server is bound to.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Io`] if the socket cannot report its address.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Io)
    }

    /// Registry supervising the live channels.
    #[must_use]
    pub fn registry(&self) -> Arc<ChannelRegistry> {
        Arc::clone(&self.registry)
    }

    /// Handle for feeding operator input to all live channels.
    #[must_use]
    pub fn input(&self) -> broadcast::Sender<String> {
        self.input.clone()
    }

    /// Accept connections forever, spawning one channel per client.
    ///
    /// Accept failures are logged and the loop keeps serving. This method
    /// only returns through cancellation (the caller racing it against a
    /// shutdown signal).
    pub async fn run(self) -> Result<(), ServerError> {
        info!(address = %self.config.bind_address, "server accepting connections");

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(error) => {
                    warn!(%error, "accept failed");
                    continue;
                }
            };
            info!(%peer_addr, "connection accepted");

            let id = self.registry.next_id();
            let registry = Arc::clone(&self.registry);
            let config = self.config.clone();
            let console = self.console.clone();
            let input_rx = self.input.subscribe();

            let handle = tokio::spawn({
                let registry = Arc::clone(&registry);
                async move {
                    serve_connection(stream, peer_addr, config, console, input_rx).await;
                    registry.remove(id);
                }
            });
            registry.insert(id, handle);
        }
    }
}

/// Establish a session on one accepted connection and run its channel.
///
/// Errors end this connection only; the accept loop is unaffected.
async fn serve_connection(
    mut stream: TcpStream,
    peer_addr: std::net::SocketAddr,
    config: ServerConfig,
    console: Console<Stdout>,
    mut input_rx: broadcast::Receiver<String>,
) {
    let session = match Session::establish(
        &config.username,
        &config.credential,
        &config.store,
        &mut stream,
    )
    .await
    {
        Ok(session) => session,
        Err(error) => {
            warn!(%peer_addr, %error, "session establishment failed");
            return;
        }
    };

    // Fan the shared operator input into this channel's private queue. The
    // forwarder ends when the channel drops its receiver or the broadcast
    // sender goes away.
    let (input_tx, input_rx_channel) = mpsc::channel(INPUT_BUFFER);
    let forwarder = tokio::spawn(async move {
        loop {
            match input_rx.recv().await {
                Ok(line) => {
                    if input_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "operator input lagged, lines dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    run_channel(
        stream,
        session.into_key(),
        input_rx_channel,
        console,
        peer_addr.to_string(),
    )
    .await;

    forwarder.abort();
    info!(%peer_addr, "channel closed");
}
