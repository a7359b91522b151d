//! Classified terminal state of a run and its exit-code mapping.

use crate::error::LaunchError;
use crate::exit_codes;
use std::fmt;

/// How a collected child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Exited(i32),
    Signaled(i32),
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Exited(code) => write!(f, "exited with status {}", code),
            Terminal::Signaled(sig) => write!(f, "killed by signal {}", sig),
        }
    }
}

/// Final outcome of a run. Produced once, never mutated.
#[derive(Debug)]
pub enum Outcome {
    /// Child exited on its own with this status.
    NormalExit(i32),
    /// Child was killed by a signal nobody here sent.
    SignalDeath(i32),
    /// The child could not be created.
    LaunchFailure(LaunchError),
    /// A stopped/continued status or a foreign pid was reported; the child
    /// was then terminated and collected.
    UnexpectedStatus {
        detail: String,
        terminal: Option<Terminal>,
    },
    /// An operator interrupt was forwarded and the child collected.
    Interrupted {
        signal: String,
        terminal: Option<Terminal>,
    },
    /// The OS wait call failed.
    WaitFailed(String),
}

impl From<Terminal> for Outcome {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Exited(code) => Outcome::NormalExit(code),
            Terminal::Signaled(sig) => Outcome::SignalDeath(sig),
        }
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::NormalExit(0))
    }

    /// One-line diagnostic for the operator.
    pub fn describe(&self) -> String {
        match self {
            Outcome::NormalExit(0) => "training run completed successfully".to_string(),
            Outcome::NormalExit(code) => format!("child exited with status {}", code),
            Outcome::SignalDeath(sig) => format!("child was killed by signal {}", sig),
            Outcome::LaunchFailure(err) => err.to_string(),
            Outcome::UnexpectedStatus { detail, terminal } => format!(
                "unexpected child status ({}); child {}",
                detail,
                terminal_text(terminal)
            ),
            Outcome::Interrupted { signal, terminal } => format!(
                "interrupted by {}; child {}",
                signal,
                terminal_text(terminal)
            ),
            Outcome::WaitFailed(reason) => format!("failed waiting on child: {}", reason),
        }
    }
}

fn terminal_text(terminal: &Option<Terminal>) -> String {
    match terminal {
        Some(t) => t.to_string(),
        None => "status could not be collected".to_string(),
    }
}

/// Map an outcome to the process exit code.
pub fn translate(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::NormalExit(0) => exit_codes::SUCCESS,
        Outcome::NormalExit(_) => exit_codes::CHILD_FAILURE,
        Outcome::SignalDeath(_) => exit_codes::OS_FAILURE,
        Outcome::LaunchFailure(err) => err.exit_code(),
        Outcome::UnexpectedStatus { .. } => exit_codes::OS_FAILURE,
        Outcome::Interrupted { .. } => exit_codes::OS_FAILURE,
        Outcome::WaitFailed(_) => exit_codes::OS_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn zero_exit_is_success() {
        let outcome = Outcome::NormalExit(0);
        assert_eq!(translate(&outcome), exit_codes::SUCCESS);
        assert!(outcome.is_success());
        assert!(outcome.describe().contains("successfully"));
    }

    #[test]
    fn non_zero_exit_is_child_failure() {
        let outcome = Outcome::NormalExit(7);
        assert_eq!(translate(&outcome), exit_codes::CHILD_FAILURE);
        assert_eq!(outcome.describe(), "child exited with status 7");
    }

    #[test]
    fn launch_failures_keep_their_class() {
        let os = Outcome::LaunchFailure(LaunchError::from_spawn(
            "mpirun",
            io::Error::from_raw_os_error(13),
        ));
        let other = Outcome::LaunchFailure(LaunchError::Unexpected {
            program: "mpirun".to_string(),
            message: "nul byte".to_string(),
        });

        assert_eq!(translate(&os), exit_codes::OS_FAILURE);
        assert_eq!(translate(&other), exit_codes::UNEXPECTED_FAILURE);
    }

    #[test]
    fn abnormal_endings_exit_with_os_failure() {
        let outcomes = [
            Outcome::SignalDeath(9),
            Outcome::UnexpectedStatus {
                detail: "stopped by signal 19".to_string(),
                terminal: Some(Terminal::Signaled(15)),
            },
            Outcome::Interrupted {
                signal: "SIGINT".to_string(),
                terminal: Some(Terminal::Exited(0)),
            },
            Outcome::WaitFailed("ECHILD".to_string()),
        ];

        for outcome in &outcomes {
            assert_eq!(translate(outcome), exit_codes::OS_FAILURE, "{:?}", outcome);
            assert!(!outcome.is_success());
        }
    }

    #[test]
    fn translate_is_idempotent() {
        let outcomes = [
            Outcome::NormalExit(0),
            Outcome::NormalExit(3),
            Outcome::SignalDeath(15),
            Outcome::WaitFailed("x".to_string()),
        ];
        for outcome in &outcomes {
            assert_eq!(translate(outcome), translate(outcome));
        }
    }

    #[test]
    fn terminal_converts_to_outcome() {
        assert!(matches!(
            Outcome::from(Terminal::Exited(2)),
            Outcome::NormalExit(2)
        ));
        assert!(matches!(
            Outcome::from(Terminal::Signaled(6)),
            Outcome::SignalDeath(6)
        ));
    }

    #[test]
    fn interrupted_description_includes_final_state() {
        let outcome = Outcome::Interrupted {
            signal: "SIGTERM".to_string(),
            terminal: Some(Terminal::Signaled(15)),
        };
        assert_eq!(
            outcome.describe(),
            "interrupted by SIGTERM; child killed by signal 15"
        );
    }
}
