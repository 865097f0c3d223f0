//! Byte-stream keyboard (piped stdin, scripts)

use super::{InputEvent, KeySource, POLL_INTERVAL};
use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Key source fed by any byte reader, one byte per key
///
/// A `stdin-reader` thread performs the blocking reads and forwards bytes
/// over a channel, so the control loop can still notice shutdown while the
/// stream is idle. The thread never touches the robot link.
pub struct StreamKeys {
    rx: Receiver<io::Result<u8>>,
    shutdown: Arc<AtomicBool>,
}

impl StreamKeys {
    /// Read keys from the process's stdin
    pub fn stdin(shutdown: Arc<AtomicBool>) -> Result<Self> {
        Self::from_reader(io::stdin(), shutdown)
    }

    pub fn from_reader<R: Read + Send + 'static>(
        mut reader: R,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self> {
        let (tx, rx) = bounded(64);

        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let mut byte = [0u8; 1];
                loop {
                    match reader.read(&mut byte) {
                        Ok(0) => break,
                        Ok(_) => {
                            if tx.send(Ok(byte[0])).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
                log::debug!("Input stream reader exiting");
            })?;

        Ok(Self { rx, shutdown })
    }
}

impl KeySource for StreamKeys {
    fn read_key(&mut self) -> Result<InputEvent> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(InputEvent::Interrupt);
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(byte)) => return Ok(InputEvent::Key(byte as char)),
                Ok(Err(e)) => return Err(Error::InputRead(e.to_string())),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(InputEvent::Closed),
            }
        }
    }
}
