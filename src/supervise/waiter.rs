//! Blocking wait on the child, reported as messages.

use super::SupervisorEvent;
use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Wait on `pid` from a blocking thread, forwarding every status change.
///
/// Stops after the first terminal status, a wait error, or when the
/// supervisor has gone away.
pub fn spawn_waiter(pid: Pid, tx: UnboundedSender<SupervisorEvent>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let flags = WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
        loop {
            match waitpid(pid, Some(flags)) {
                Ok(status) => {
                    let done = is_terminal_for(pid, &status);
                    if tx.send(SupervisorEvent::Status(status)).is_err() || done {
                        break;
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    let _ = tx.send(SupervisorEvent::WaitError(errno));
                    break;
                }
            }
        }
    })
}

fn is_terminal_for(pid: Pid, status: &WaitStatus) -> bool {
    match status {
        WaitStatus::Exited(p, _) | WaitStatus::Signaled(p, _, _) => *p == pid,
        _ => false,
    }
}
