//! The duplex secure channel: two concurrent flows over one connection.
//!
//! [`run_channel`] splits the connection and runs an outbound flow (take a
//! line of local input, seal it, write one frame) and an inbound flow
//! (read one frame, open it, deliver to the console) until either side
//! closes. The flows share nothing but the connection, the session key,
//! and the console lock.
//!
//! Error policy: per-message failures (a frame that will not decode, a
//! frame that will not decrypt, a message too large to seal) are logged
//! and the flow moves on to the next message. Connection-level failures
//! (read or write errors, end of stream) end the flow, and the closing
//! flow signals the other so the whole channel winds down. There is no
//! in-band goodbye message; teardown is the connection closing.

use seclink_crypto::SessionKey;
use seclink_proto::{MAX_FRAME_SIZE, MessageFrame};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::console::Console;

/// Input prompt shown before each outbound message.
pub const PROMPT: &str = "You: ";

/// Local input line that ends the channel instead of being sent.
pub const EXIT_SENTINEL: &str = "exit";

/// Run the duplex channel over an established connection until it closes.
///
/// `input` carries lines of local user input; the channel ends when the
/// sender side of it is dropped (end of input), when the local user types
/// the exit sentinel, or when the peer closes the connection. Inbound
/// messages are delivered to `console` attributed to `peer`.
///
/// Returns once both flows have wound down. The connection is dropped on
/// return, which is the only teardown signal the peer sees.
pub async fn run_channel<S, W>(
    stream: S,
    key: SessionKey,
    input: mpsc::Receiver<String>,
    console: Console<W>,
    peer: String,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (reader, writer) = tokio::io::split(stream);
    let (closed_tx, closed_rx) = watch::channel(false);

    let outbound = tokio::spawn(outbound_flow(
        writer,
        key.clone(),
        input,
        console.clone(),
        closed_tx.clone(),
        closed_rx.clone(),
    ));
    let inbound = tokio::spawn(inbound_flow(reader, key, console, peer, closed_tx, closed_rx));

    // The flows only end by design (sentinel, EOF, connection close), so a
    // join error here means one of them panicked.
    if let Err(error) = outbound.await {
        warn!(%error, "outbound flow aborted");
    }
    if let Err(error) = inbound.await {
        warn!(%error, "inbound flow aborted");
    }
}

async fn outbound_flow<T, W>(
    mut writer: T,
    key: SessionKey,
    mut input: mpsc::Receiver<String>,
    console: Console<W>,
    closed_tx: watch::Sender<bool>,
    mut closed_rx: watch::Receiver<bool>,
) where
    T: AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.prompt(PROMPT).await;

        let line = tokio::select! {
            line = input.recv() => line,
            _ = closed_rx.changed() => {
                debug!("outbound flow stopping, channel closed");
                break;
            }
        };

        let Some(line) = line else {
            info!("local input ended");
            break;
        };
        let message = line.trim_end_matches(['\r', '\n']);

        if message == EXIT_SENTINEL {
            info!("exit requested");
            break;
        }

        let frame = match seclink_crypto::seal(message.as_bytes(), &key) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%error, "message could not be sealed, skipping");
                continue;
            }
        };

        // seal() already enforces the plaintext cap, so encoding a sealed
        // frame cannot exceed the frame limit.
        let bytes = match frame.to_bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "frame could not be encoded, skipping");
                continue;
            }
        };

        if let Err(error) = writer.write_all(&bytes).await {
            warn!(%error, "send failed, closing channel");
            break;
        }
        if let Err(error) = writer.flush().await {
            warn!(%error, "flush failed, closing channel");
            break;
        }
    }

    // Half-close so the peer's read sees end of stream.
    if let Err(error) = writer.shutdown().await {
        debug!(%error, "writer shutdown failed");
    }
    let _ = closed_tx.send(true);
}

async fn inbound_flow<R, W>(
    mut reader: R,
    key: SessionKey,
    console: Console<W>,
    peer: String,
    closed_tx: watch::Sender<bool>,
    mut closed_rx: watch::Receiver<bool>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; MAX_FRAME_SIZE];

    loop {
        let read = tokio::select! {
            read = reader.read(&mut buf) => read,
            _ = closed_rx.changed() => {
                debug!("inbound flow stopping, channel closed");
                break;
            }
        };

        let count = match read {
            Ok(0) => {
                info!("peer closed the connection");
                break;
            }
            Ok(count) => count,
            Err(error) => {
                warn!(%error, "receive failed, closing channel");
                break;
            }
        };

        let frame = match MessageFrame::decode(&buf[..count]) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%error, "discarding malformed frame");
                continue;
            }
        };

        let plaintext = match seclink_crypto::open(&frame, &key) {
            Ok(plaintext) => plaintext,
            Err(error) => {
                warn!(%error, "discarding unverifiable frame");
                continue;
            }
        };

        let message = String::from_utf8_lossy(&plaintext);
        console.deliver(&peer, &message, PROMPT).await;
    }

    let _ = closed_tx.send(true);
}
