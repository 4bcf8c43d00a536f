//! Seclink core: session establishment and the duplex secure channel.
//!
//! A session pairs a local user with a 32-byte symmetric key derived from
//! an X25519 exchange over the connection. The duplex channel then runs
//! two concurrent flows over that one connection - outbound (read a line,
//! seal it, send one frame) and inbound (read one frame, open it, deliver
//! to the console) - until either side closes.
//!
//! Collaborators with no channel logic of their own also live here: the
//! JSON configuration loader, the zlib compression utility, and the TLS
//! transport wrapper. The channel itself is agnostic to the transport; it
//! only needs byte-stream semantics.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod compress;
pub mod config;
pub mod console;
pub mod duplex;
pub mod error;
pub mod session;
pub mod transport;

pub use config::Config;
pub use console::Console;
pub use duplex::run_channel;
pub use error::{CompressError, ConfigError, SessionError, TransportError};
pub use session::{CredentialStore, Session, terminate};
pub use transport::TlsClient;
