//! Running the `espresso` binary as a child process
//!
//! The document goes to the child's stdin from a helper thread while the
//! parent collects stdout and stderr, so neither side can block on a full
//! pipe.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use super::{Solver, SolverResponse};
use crate::EspressoConfig;

/// Environment variable naming the solver binary
pub const ESPRESSO_ENV: &str = "ESPRESSO";

/// [`Solver`] backed by an external `espresso` executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EspressoProcess {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl EspressoProcess {
    /// Use the binary at `program`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        EspressoProcess {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Use `$ESPRESSO`, falling back to `espresso` on `PATH`
    pub fn from_env() -> Self {
        match env::var_os(ESPRESSO_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::new("espresso"),
        }
    }

    /// Add an argument placed before the configuration flags
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    /// Path of the solver binary
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for EspressoProcess {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Solver for EspressoProcess {
    fn invoke(&self, document: &str, config: &EspressoConfig) -> io::Result<SolverResponse> {
        let args = config.to_args();
        log::debug!(
            "running {} {}",
            self.program.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("failed to start {}: {}", self.program.display(), e),
                )
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "failed to get child stdin"))?;
        let input = document.as_bytes().to_vec();
        // Dropping stdin at the end of the closure signals end of input
        let writer = thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("solver exited before reading all of its input");
            }
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(io::Error::other("stdin writer thread panicked")),
        }

        let response = SolverResponse {
            status: output.status.into(),
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if response.status.success() && !response.stderr.trim().is_empty() {
            log::warn!("solver wrote to stderr: {}", response.stderr.trim());
        }
        log::debug!(
            "solver finished with {}, {} bytes of output",
            response.status,
            response.output.len()
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let p = EspressoProcess::new("/opt/espresso").arg("-s");
        assert_eq!(p.program(), Path::new("/opt/espresso"));
        assert_eq!(p.leading_args, vec![OsString::from("-s")]);
    }

    #[test]
    fn test_missing_binary_is_transport_error() {
        let p = EspressoProcess::new("/nonexistent/espresso-binary");
        let err = p.invoke(".e\n", &EspressoConfig::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
