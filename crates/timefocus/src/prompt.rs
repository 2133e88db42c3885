//! Questions that an interrupt can cut short
//!
//! A blocking line read can't be cancelled, so it runs on its own thread and
//! sends the line back over a oneshot channel. The caller races that against
//! an interrupt future.

use std::future::Future;
use std::io::{self, BufRead};
use std::thread;
use tokio::sync::oneshot;

/// Read one line from `reader` on a background thread
pub fn read_line_in_background<R>(mut reader: R) -> oneshot::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let result = reader.read_line(&mut line).map(|_| line);
        // The receiver is gone if the interrupt won
        let _ = tx.send(result);
    });
    rx
}

/// The trimmed answer, or `None` if `interrupt` resolved first.
/// EOF and a reader that went away both read as an empty answer.
pub async fn answer_or_interrupt<I>(
    answer: oneshot::Receiver<io::Result<String>>,
    interrupt: I,
) -> io::Result<Option<String>>
where
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => {
            tracing::debug!("prompt interrupted");
            Ok(None)
        }
        line = answer => match line {
            Ok(line) => Ok(Some(line?.trim().to_string())),
            Err(_) => Ok(Some(String::new())),
        },
    }
}
