use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::errors::{PiError, PiResult};

/// Runs `func` on its own thread and waits at most `timeout` for it.
///
/// On timeout the thread is left to finish in the background; its result is discarded.
pub fn run_with_timeout<T, F>(timeout: Duration, func: F) -> PiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("pi-timed".into())
        .spawn(move || {
            let _ = tx.send(func());
        })
        .map_err(|e| PiError::ResourceExhausted(format!("could not spawn timed worker: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => Ok(result),
        Err(RecvTimeoutError::Timeout) => {
            let ms = timeout.as_millis() as u64;
            warn!(timeout_ms = ms, "computation abandoned after deadline");
            Err(PiError::Timeout(ms))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(PiError::Worker("timed worker exited without a result".into()))
        }
    }
}
