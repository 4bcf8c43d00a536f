//! TLS client transport wrapper.
//!
//! Standalone collaborator for deployments that front the server with a
//! TLS terminator: the channel itself only needs byte-stream semantics and
//! runs over plain TCP by default. The wrapper owns one TLS connection and
//! exposes blocking send, receive, and an orderly close that sends the TLS
//! close notify.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::info;

use crate::error::TransportError;

/// Build a client configuration trusting the CA certificates in a PEM
/// file.
///
/// # Errors
///
/// - [`TransportError::Tls`] if the file cannot be read, contains no
///   certificates, or a certificate is malformed.
pub fn client_config_from_roots(pem_path: &str) -> Result<Arc<ClientConfig>, TransportError> {
    let pem = std::fs::read(pem_path)
        .map_err(|e| TransportError::Tls(format!("failed to read root certs '{pem_path}': {e}")))?;

    let certs = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TransportError::Tls(format!("failed to parse root certs: {e}")))?;
    if certs.is_empty() {
        return Err(TransportError::Tls(format!("no certificates found in '{pem_path}'")));
    }

    let mut roots = RootCertStore::empty();
    for cert in certs {
        roots
            .add(cert)
            .map_err(|e| TransportError::Tls(format!("rejected root certificate: {e}")))?;
    }

    let config = ClientConfig::builder().with_root_certificates(roots).with_no_client_auth();
    Ok(Arc::new(config))
}

/// One TLS connection to a server.
pub struct TlsClient {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl TlsClient {
    /// Connect over TCP and set up the TLS session state.
    ///
    /// The handshake itself completes lazily on the first send or receive.
    ///
    /// # Errors
    ///
    /// - [`TransportError::InvalidServerName`] if `address` is not a valid
    ///   TLS server name.
    /// - [`TransportError::Connect`] if the TCP connection fails.
    /// - [`TransportError::Tls`] if the session state cannot be created.
    pub fn connect(
        address: &str,
        port: u16,
        config: Arc<ClientConfig>,
    ) -> Result<Self, TransportError> {
        let server_name = ServerName::try_from(address.to_owned())
            .map_err(|_| TransportError::InvalidServerName(address.to_owned()))?;

        let tcp = TcpStream::connect((address, port)).map_err(TransportError::Connect)?;

        let conn = ClientConnection::new(config, server_name)
            .map_err(|e| TransportError::Tls(e.to_string()))?;

        info!(address, port, "TLS transport connected");
        Ok(Self { stream: StreamOwned::new(conn, tcp) })
    }

    /// Send a buffer over the TLS session.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Io`] if the handshake or write fails.
    pub fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(data).map_err(TransportError::Io)?;
        self.stream.flush().map_err(TransportError::Io)
    }

    /// Receive into a buffer, returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// - [`TransportError::ConnectionClosed`] on a clean end of stream.
    /// - [`TransportError::Io`] if the handshake or read fails.
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.stream.read(buf).map_err(TransportError::Io)? {
            0 => Err(TransportError::ConnectionClosed),
            n => Ok(n),
        }
    }

    /// Close the session, sending the TLS close notify.
    pub fn close(mut self) {
        self.stream.conn.send_close_notify();
        let _ = self.stream.flush();
        info!("TLS transport closed");
    }
}
