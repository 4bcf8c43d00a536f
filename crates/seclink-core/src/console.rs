//! Shared console output for the two channel flows.
//!
//! Both flows of a duplex channel write to the same terminal: the outbound
//! flow prints prompts and the inbound flow prints arriving messages. A
//! [`Console`] serializes those writes behind one async mutex so a
//! delivered message never tears through a half-printed prompt. After an
//! inbound delivery the prompt is reprinted, leaving the cursor where the
//! local user expects it.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

/// Serialized writer for interleaved prompt and message output.
///
/// Cloning is cheap and clones share the same underlying writer and lock.
#[derive(Debug)]
pub struct Console<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> Clone for Console<W> {
    fn clone(&self) -> Self {
        Self { writer: Arc::clone(&self.writer) }
    }
}

impl<W: AsyncWrite + Unpin> Console<W> {
    /// Wrap a writer (typically stdout) in a shared console.
    pub fn new(writer: W) -> Self {
        Self { writer: Arc::new(Mutex::new(writer)) }
    }

    /// Print an input prompt, holding the lock only for the write.
    ///
    /// Write failures are logged and swallowed: a broken terminal must not
    /// take the channel down.
    pub async fn prompt(&self, prompt: &str) {
        let mut writer = self.writer.lock().await;
        if let Err(error) = writer.write_all(prompt.as_bytes()).await {
            debug!(%error, "console prompt write failed");
            return;
        }
        if let Err(error) = writer.flush().await {
            debug!(%error, "console flush failed");
        }
    }

    /// Print an inbound message attributed to the peer, then reprint the
    /// prompt.
    ///
    /// The newline before the message pushes any half-typed local input out
    /// of the way; the reprinted prompt restores the input line. Both
    /// writes happen under one lock acquisition so they cannot interleave
    /// with a concurrent prompt.
    pub async fn deliver(&self, peer: &str, message: &str, reprompt: &str) {
        let line = format!("\n{peer}: {message}\n{reprompt}");
        let mut writer = self.writer.lock().await;
        if let Err(error) = writer.write_all(line.as_bytes()).await {
            debug!(%error, "console delivery write failed");
            return;
        }
        if let Err(error) = writer.flush().await {
            debug!(%error, "console flush failed");
        }
    }
}

#[cfg(test)]
impl Console<Vec<u8>> {
    /// Snapshot of everything written so far, for channel assertions.
    pub(crate) async fn snapshot(&self) -> String {
        let writer = self.writer.lock().await;
        String::from_utf8_lossy(&writer).into_owned()
    }
}
