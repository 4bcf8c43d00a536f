//! End-to-end test: session establishment followed by a full duplex
//! exchange over one in-memory connection.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use seclink_core::{Console, CredentialStore, Session, run_channel, session};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::time::timeout;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Writer that records everything for later assertions.
#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl AsyncWrite for CaptureWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn store() -> CredentialStore {
    CredentialStore::new(HashMap::from([("user".to_owned(), "pass".to_owned())]))
}

struct End {
    input: mpsc::Sender<String>,
    output: CaptureWriter,
    handle: tokio::task::JoinHandle<()>,
}

async fn wait_for(end: &End, needle: &str) {
    timeout(TEST_TIMEOUT, async {
        loop {
            if end.output.contents().contains(needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("expected console output never arrived");
}

#[tokio::test]
async fn established_sessions_carry_a_conversation() {
    let (mut a, mut b) = tokio::io::duplex(64 * 1024);

    let store = store();
    let (left, right) = tokio::join!(
        Session::establish("user", "pass", &store, &mut a),
        Session::establish("user", "pass", &store, &mut b),
    );
    let left = left.unwrap();
    let right = right.unwrap();

    let spawn_end = |stream: tokio::io::DuplexStream, session: Session, peer: &str| {
        let (tx, rx) = mpsc::channel(8);
        let output = CaptureWriter::default();
        let console = Console::new(output.clone());
        let handle =
            tokio::spawn(run_channel(stream, session.into_key(), rx, console, peer.to_owned()));
        End { input: tx, output, handle }
    };

    let alice = spawn_end(a, left, "bob");
    let bob = spawn_end(b, right, "alice");

    alice.input.send("hello over the wire".to_owned()).await.unwrap();
    wait_for(&bob, "\nalice: hello over the wire\n").await;

    bob.input.send("loud and clear".to_owned()).await.unwrap();
    wait_for(&alice, "\nbob: loud and clear\n").await;

    // Exit on one side winds down both.
    alice.input.send("exit".to_owned()).await.unwrap();
    timeout(TEST_TIMEOUT, alice.handle).await.unwrap().unwrap();
    timeout(TEST_TIMEOUT, bob.handle).await.unwrap().unwrap();
    drop(bob.input);
}

#[tokio::test]
async fn mismatched_credentials_never_reach_the_channel() {
    let (mut a, _b) = tokio::io::duplex(1024);

    let result = Session::establish("user", "wrong", &store(), &mut a).await;
    assert!(matches!(result, Err(seclink_core::SessionError::AuthFailed { .. })));
}

#[tokio::test]
async fn terminate_after_channel_close_is_clean() {
    let (mut a, mut b) = tokio::io::duplex(1024);

    let store = store();
    let (left, right) = tokio::join!(
        Session::establish("user", "pass", &store, &mut a),
        Session::establish("user", "pass", &store, &mut b),
    );

    let mut slot = Some(left.unwrap());
    drop(right);

    session::terminate(&mut slot);
    assert!(slot.is_none());
    session::terminate(&mut slot);
    assert!(slot.is_none());
}
