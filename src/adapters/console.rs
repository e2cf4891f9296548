//! Stdin/stdout operator console.
//!
//! A reader thread pulls bytes from stdin into a channel so the session
//! controller can both block on input ([`ConsolePort::read_byte`]) and
//! poll it ([`ConsolePort::poll_byte`]) from a single thread.  Output goes
//! straight to stdout and is flushed per write, like a UART.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::app::events::CalEvent;
use crate::app::ports::{ConsoleError, ConsolePort, EventSink};
use crate::app::render::render_event;

/// How long a poll waits for a byte before reporting "nothing yet".
/// Keeps the live-read loop from spinning a host core at 100 %.
const POLL_WAIT: Duration = Duration::from_millis(1);

const READ_CHUNK: usize = 64;

pub struct StdioConsole {
    rx: Receiver<u8>,
    out: io::Stdout,
}

impl StdioConsole {
    /// Start the stdin reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut buf = [0u8; READ_CHUNK];
                loop {
                    match stdin.read(&mut buf) {
                        Ok(0) => {
                            debug!("stdin: EOF");
                            return;
                        }
                        Ok(n) => {
                            for &b in &buf[..n] {
                                if tx.send(b).is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => {
                            warn!("stdin read failed: {}", e);
                            return;
                        }
                    }
                }
            })?;

        Ok(Self {
            rx,
            out: io::stdout(),
        })
    }
}

impl ConsolePort for StdioConsole {
    fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        self.rx.recv().map_err(|_| ConsoleError::Closed)
    }

    fn poll_byte(&mut self) -> Result<Option<u8>, ConsoleError> {
        match self.rx.recv_timeout(POLL_WAIT) {
            Ok(b) => Ok(Some(b)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ConsoleError::Closed),
        }
    }

    fn write_str(&mut self, s: &str) -> Result<(), ConsoleError> {
        let mut out = self.out.lock();
        out.write_all(s.as_bytes()).map_err(|_| ConsoleError::Io)?;
        out.flush().map_err(|_| ConsoleError::Io)
    }
}

impl EventSink for StdioConsole {
    fn emit(&mut self, event: &CalEvent) {
        if let Err(e) = render_event(event, self) {
            warn!("console: dropped {:?} ({})", event, e);
        }
    }
}
