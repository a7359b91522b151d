//! Operator interrupt listener.

use super::SupervisorEvent;
use std::io;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// SIGINT/SIGTERM handlers for this process.
///
/// Signals arriving after [`SignalListener::install`] are buffered until
/// [`SignalListener::forward_to`] starts delivering them, so the launcher can
/// register before spawning the child and hand the listener to the
/// supervisor afterwards.
pub struct SignalListener {
    interrupt: Signal,
    terminate: Signal,
}

impl SignalListener {
    /// Register the handlers. Must be called from inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Forward every received signal to the supervisor as an interrupt.
    pub fn forward_to(self, tx: UnboundedSender<SupervisorEvent>) -> JoinHandle<()> {
        let SignalListener {
            mut interrupt,
            mut terminate,
        } = self;

        tokio::spawn(async move {
            loop {
                let name = tokio::select! {
                    Some(()) = interrupt.recv() => "SIGINT",
                    Some(()) = terminate.recv() => "SIGTERM",
                    else => break,
                };
                tracing::debug!(signal = name, "received termination request");
                if tx.send(SupervisorEvent::Interrupt(name.to_string())).is_err() {
                    break;
                }
            }
        })
    }
}
