//! Terminal connector for running the relay locally.
//!
//! Every stdin line is one inbound message; a literal `\n` inside a line
//! becomes a line break so multi-line messages can be typed. Outbound
//! messages are printed to stdout, prefixed with the channel name.

use crate::bot::{ChatConnector, ConnectorError, InboundMessage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

pub const CONSOLE_CHANNEL: &str = "console";

pub struct ConsoleConnector {
    stdout: Mutex<tokio::io::Stdout>,
    /// Duration of the last write, in microseconds
    last_write_us: AtomicU64,
}

impl ConsoleConnector {
    pub fn new() -> Self {
        ConsoleConnector {
            stdout: Mutex::new(tokio::io::stdout()),
            last_write_us: AtomicU64::new(0),
        }
    }
}

impl Default for ConsoleConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatConnector for ConsoleConnector {
    async fn send(&self, channel: &str, text: &str) -> Result<(), ConnectorError> {
        let started = Instant::now();
        let mut stdout = self.stdout.lock().await;
        let rendered = format!("[{}] {}\n", channel, text);
        stdout
            .write_all(rendered.as_bytes())
            .await
            .map_err(|e| ConnectorError(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| ConnectorError(e.to_string()))?;
        self.last_write_us
            .store(started.elapsed().as_micros() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn latency(&self) -> Duration {
        Duration::from_micros(self.last_write_us.load(Ordering::Relaxed))
    }
}

/// Turn typed `\n` escapes into real line breaks
pub fn unescape_line(line: &str) -> String {
    line.replace("\\n", "\n")
}

/// Forward stdin lines to `inbound` until EOF or the receiver goes away
pub async fn read_stdin(author_id: &str, inbound: mpsc::Sender<InboundMessage>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let message = InboundMessage::new(author_id, CONSOLE_CHANNEL, &unescape_line(&line));
                if inbound.send(message).await.is_err() {
                    debug!("Dispatcher stopped, no longer reading stdin");
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}
