//! Child supervision.
//!
//! The supervisor owns the [`ChildHandle`] and runs a small state machine:
//!
//! ```text
//! Running ──terminal status──────────────────────────────▶ Collected
//!    │
//!    ├─interrupt / stopped / continued / foreign pid──▶ Interrupted
//!    │                                                   │ SIGTERM (+SIGCONT if stopped)
//!    │                                                   │ wait; SIGKILL after grace
//!    │                                                   ▼
//!    └─wait error──▶ WaitFailed                      Collected
//! ```
//!
//! Two producers feed one channel: a blocking waiter thread
//! ([`waiter::spawn_waiter`]) and the signal listener
//! ([`SignalListener`]). The supervisory task only ever
//! suspends on that channel.

mod signals;
mod waiter;


pub use signals::SignalListener;

use crate::launch::ChildHandle;
use crate::outcome::{Outcome, Terminal};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Messages delivered to the supervisory task.
#[derive(Debug)]
pub enum SupervisorEvent {
    /// A status change reported by `waitpid`.
    Status(WaitStatus),
    /// `waitpid` itself failed.
    WaitError(Errno),
    /// A termination request for this process, named by its signal.
    Interrupt(String),
}

/// Why the supervisor left the running state early.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cause {
    Operator(String),
    Unexpected { detail: String, stopped: bool },
}

/// What a status report means for the tracked child.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    Terminal(Terminal),
    Unexpected { detail: String, stopped: bool },
}

fn observe(tracked: Pid, status: &WaitStatus) -> Observed {
    if status.pid() != Some(tracked) {
        return Observed::Unexpected {
            detail: format!("wait reported unrecognized process: {:?}", status),
            stopped: false,
        };
    }

    match *status {
        WaitStatus::Exited(_, code) => Observed::Terminal(Terminal::Exited(code)),
        WaitStatus::Signaled(_, sig, _) => Observed::Terminal(Terminal::Signaled(sig as i32)),
        WaitStatus::Stopped(_, sig) => Observed::Unexpected {
            detail: format!("child stopped by {}", sig),
            stopped: true,
        },
        WaitStatus::Continued(_) => Observed::Unexpected {
            detail: "child continued without exiting".to_string(),
            stopped: false,
        },
        ref other => Observed::Unexpected {
            detail: format!("non-terminal status {:?}", other),
            stopped: false,
        },
    }
}

enum State {
    Running,
    Interrupted(Cause),
}

/// Supervises one child to completion.
pub struct Supervisor {
    child: ChildHandle,
    grace: Duration,
    tx: UnboundedSender<SupervisorEvent>,
    rx: UnboundedReceiver<SupervisorEvent>,
}

impl Supervisor {
    /// `grace` bounds the wait after forwarding SIGTERM before SIGKILL.
    pub fn new(child: ChildHandle, grace: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            child,
            grace,
            tx,
            rx,
        }
    }

    /// Sender for injecting events, used by the signal listener.
    pub fn event_sender(&self) -> UnboundedSender<SupervisorEvent> {
        self.tx.clone()
    }

    /// Block until the child has terminated and its status is collected.
    pub async fn run(self) -> Outcome {
        let Supervisor {
            child,
            grace,
            tx,
            mut rx,
        } = self;
        let pid = child.pid();

        let _waiter = waiter::spawn_waiter(pid, tx);

        let mut state = State::Running;
        loop {
            state = match state {
                State::Running => match rx.recv().await {
                    Some(SupervisorEvent::Status(status)) => match observe(pid, &status) {
                        Observed::Terminal(terminal) => {
                            info!(pid = pid.as_raw(), %terminal, "child collected");
                            return terminal.into();
                        }
                        Observed::Unexpected { detail, stopped } => {
                            warn!(pid = pid.as_raw(), %detail, "unexpected child status");
                            State::Interrupted(Cause::Unexpected { detail, stopped })
                        }
                    },
                    Some(SupervisorEvent::WaitError(errno)) => {
                        warn!(pid = pid.as_raw(), %errno, "waiting on child failed");
                        return Outcome::WaitFailed(errno.to_string());
                    }
                    Some(SupervisorEvent::Interrupt(signal)) => {
                        warn!(pid = pid.as_raw(), %signal, "interrupted; terminating child");
                        State::Interrupted(Cause::Operator(signal))
                    }
                    None => return Outcome::WaitFailed("wait channel closed".to_string()),
                },
                State::Interrupted(cause) => {
                    let stopped = matches!(cause, Cause::Unexpected { stopped: true, .. });
                    let terminal = terminate_and_collect(pid, stopped, grace, &mut rx).await;
                    return match cause {
                        Cause::Operator(signal) => Outcome::Interrupted { signal, terminal },
                        Cause::Unexpected { detail, .. } => {
                            Outcome::UnexpectedStatus { detail, terminal }
                        }
                    };
                }
            };
        }
    }
}

/// Forward SIGTERM and wait for the terminal status, escalating to SIGKILL
/// once `grace` has passed.
async fn terminate_and_collect(
    pid: Pid,
    stopped: bool,
    grace: Duration,
    rx: &mut UnboundedReceiver<SupervisorEvent>,
) -> Option<Terminal> {
    send_signal(pid, Signal::SIGTERM);
    if stopped {
        // A stopped process only acts on SIGTERM once continued.
        send_signal(pid, Signal::SIGCONT);
    }

    let deadline = tokio::time::sleep(grace);
    tokio::pin!(deadline);
    let mut killed = false;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(SupervisorEvent::Status(status)) => match observe(pid, &status) {
                    Observed::Terminal(terminal) => {
                        info!(pid = pid.as_raw(), %terminal, "child collected after termination");
                        return Some(terminal);
                    }
                    Observed::Unexpected { detail, .. } => {
                        debug!(pid = pid.as_raw(), %detail, "skipping non-terminal status");
                    }
                },
                Some(SupervisorEvent::WaitError(errno)) => {
                    warn!(pid = pid.as_raw(), %errno, "waiting on terminated child failed");
                    return None;
                }
                Some(SupervisorEvent::Interrupt(signal)) => {
                    info!(%signal, "already terminating child; ignoring");
                }
                None => return None,
            },
            _ = &mut deadline, if !killed => {
                warn!(pid = pid.as_raw(), grace_secs = grace.as_secs_f64(), "child ignored SIGTERM; sending SIGKILL");
                send_signal(pid, Signal::SIGKILL);
                killed = true;
            }
        }
    }
}

fn send_signal(pid: Pid, signal: Signal) {
    match kill(pid, signal) {
        Ok(()) => debug!(pid = pid.as_raw(), %signal, "sent signal to child"),
        // Already exited but not yet collected; the wait will pick it up.
        Err(Errno::ESRCH) => debug!(pid = pid.as_raw(), %signal, "child already gone"),
        Err(errno) => warn!(pid = pid.as_raw(), %signal, %errno, "failed to signal child"),
    }
}
