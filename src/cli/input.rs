//! Line Input
//!
//! Reads input lines on a dedicated OS thread and forwards them to async code.
//! A blocked read on that thread never holds up runtime shutdown.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::trace;

/// Lines buffered between the reader thread and the consumer.
const LINE_BUFFER: usize = 64;

/// Spawns a detached thread forwarding every line of `reader`.
///
/// The channel closes at EOF, after the first read error (which is forwarded),
/// or once the receiver is dropped and the next line arrives.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            trace!("Line reader finished");
        })?;

    Ok(rx)
}
