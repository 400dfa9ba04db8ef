//! Console input channel: one utterance or command per line.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of the console line channel.
const LINE_CHANNEL_CAPACITY: usize = 64;

/// Start reading lines from stdin.
///
/// The receiver closes on end of input.
pub fn start() -> mpsc::Receiver<String> {
    spawn_reader(tokio::io::stdin())
}

/// Forward trimmed, non-empty lines from `reader` to the returned receiver.
pub fn spawn_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if tx.send(line.to_string()).await.is_err() {
                        debug!("console receiver dropped, stopping reader");
                        break;
                    }
                }
                Ok(None) => {
                    debug!("console input closed");
                    break;
                }
                Err(e) => {
                    warn!("console read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}
