//! Interface to the external two-level minimizer
//!
//! The core only needs one blocking request/response call: hand over a
//! cover-set document plus configuration, get back an exit state and the raw
//! text the solver printed. [`EspressoProcess`] implements that call by
//! running the `espresso` binary; tests and embedders can supply their own
//! [`Solver`].

mod process;

pub use process::EspressoProcess;

use std::fmt;
use std::io;
use std::process::ExitStatus;

use crate::error::{Error, SolverFailureKind};
use crate::EspressoConfig;

/// How the solver run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Exited with a status code
    Code(i32),
    /// Killed by a signal
    Signal(i32),
}

#[cfg(unix)]
fn termination_signals() -> [i32; 2] {
    [libc::SIGKILL, libc::SIGTERM]
}

#[cfg(not(unix))]
fn termination_signals() -> [i32; 2] {
    [9, 15]
}

impl ExitState {
    /// Whether the run succeeded
    pub fn success(self) -> bool {
        self == ExitState::Code(0)
    }

    /// Failure category, or `None` on success
    ///
    /// Status 1 is a logic or input error and status 2 an access error. A
    /// signal, or the shell convention `128 + SIGKILL` / `128 + SIGTERM`,
    /// means the process was terminated. Anything else is unrecognized.
    pub fn failure_kind(self) -> Option<SolverFailureKind> {
        match self {
            ExitState::Code(0) => None,
            ExitState::Code(1) => Some(SolverFailureKind::Logic),
            ExitState::Code(2) => Some(SolverFailureKind::Access),
            ExitState::Signal(_) => Some(SolverFailureKind::Terminated),
            ExitState::Code(code)
                if termination_signals().iter().any(|&sig| code == 128 + sig) =>
            {
                Some(SolverFailureKind::Terminated)
            }
            ExitState::Code(_) => Some(SolverFailureKind::Unrecognized),
        }
    }
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitState::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitState::Signal(signal);
            }
        }
        ExitState::Code(-1)
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Code(code) => write!(f, "exit status {}", code),
            ExitState::Signal(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// What the solver returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverResponse {
    pub status: ExitState,
    /// Standard output: the minimized cover on success
    pub output: String,
    /// Diagnostics
    pub stderr: String,
}

impl SolverResponse {
    /// Successful response carrying `output`
    pub fn success(output: impl Into<String>) -> Self {
        SolverResponse {
            status: ExitState::Code(0),
            output: output.into(),
            stderr: String::new(),
        }
    }

    /// Failed response with `status`
    pub fn failure(status: ExitState, output: impl Into<String>) -> Self {
        SolverResponse {
            status,
            output: output.into(),
            stderr: String::new(),
        }
    }

    /// The raw cover text, or the classified failure
    pub fn into_output(self) -> Result<String, Error> {
        match self.status.failure_kind() {
            None => Ok(self.output),
            Some(kind) => {
                let mut output = self.output;
                if !self.stderr.is_empty() {
                    if !output.is_empty() && !output.ends_with('\n') {
                        output.push('\n');
                    }
                    output.push_str(&self.stderr);
                }
                Err(Error::SolverReportedFailure {
                    kind,
                    status: self.status.to_string(),
                    output,
                })
            }
        }
    }
}

/// A blocking cover-set minimizer
///
/// An `Err` means the call itself could not be completed (the binary is
/// missing, a pipe failed). A solver that ran and failed reports that
/// through [`SolverResponse::status`].
pub trait Solver {
    fn invoke(&self, document: &str, config: &EspressoConfig) -> io::Result<SolverResponse>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn invoke(&self, document: &str, config: &EspressoConfig) -> io::Result<SolverResponse> {
        (**self).invoke(document, config)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn invoke(&self, document: &str, config: &EspressoConfig) -> io::Result<SolverResponse> {
        (**self).invoke(document, config)
    }
}
