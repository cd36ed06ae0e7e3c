//! Error types for truth table encoding, cover-set I/O and solver invocation
//!
//! Every failure the crate can report is a variant of [`Error`], so callers can
//! tell validation problems (raised before the solver is ever started) apart
//! from solver failures and from solver output that could not be parsed.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::codec::Role;

/// Reasons a variable name was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The same name is used more than once across inputs and outputs
    NotUnique {
        /// The duplicated name
        name: Arc<str>,
    },
    /// A name is the empty string
    Empty {
        /// Which side the empty name was found on
        role: Role,
        /// Column index of the empty name
        column: usize,
    },
    /// A name is not a valid identifier
    InvalidIdentifier {
        /// The rejected name
        name: Arc<str>,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::NotUnique { name } => {
                write!(f, "Name '{}' is used more than once", name)
            }
            NameError::Empty { role, column } => {
                write!(f, "Empty {} name at column {}", role, column)
            }
            NameError::InvalidIdentifier { name } => write!(
                f,
                "Name '{}' is not a valid identifier (expected [A-Za-z_][A-Za-z0-9_]*)",
                name
            ),
        }
    }
}

impl std::error::Error for NameError {}

/// Category of a failure reported by the external solver itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFailureKind {
    /// The solver rejected its input or hit a logic error (exit status 1)
    Logic,
    /// The solver could not access a resource it needed (exit status 2)
    Access,
    /// The solver process was terminated or killed before finishing
    Terminated,
    /// Any other exit status
    Unrecognized,
}

impl fmt::Display for SolverFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolverFailureKind::Logic => "logic or input error",
            SolverFailureKind::Access => "access error",
            SolverFailureKind::Terminated => "process terminated",
            SolverFailureKind::Unrecognized => "unrecognized status",
        };
        f.write_str(text)
    }
}

/// The main error type of this crate
#[derive(Debug)]
pub enum Error {
    /// An element lies outside the recognised code domain for its role
    InvalidValue {
        /// Whether the element belongs to the independent or dependent data
        role: Role,
        /// Textual rendering of the rejected element
        value: String,
        /// Row of the rejected element
        row: usize,
        /// Column of the rejected element
        column: usize,
    },

    /// A variable name failed validation
    InvalidName(NameError),

    /// The number of supplied names doesn't match the number of columns
    LabelCountMismatch {
        /// Which side the names were supplied for
        role: Role,
        /// Number of columns
        expected: usize,
        /// Number of names supplied
        actual: usize,
    },

    /// A row has a different length than the first row of its matrix
    RaggedRow {
        /// Which matrix the row belongs to
        role: Role,
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },

    /// A table has no rows or no columns
    EmptyTable,

    /// Independent and dependent row counts differ
    RowCountMismatch {
        /// Rows in the independent matrix
        independent: usize,
        /// Rows in the dependent matrix
        dependent: usize,
    },

    /// A truth vector's length is not a power of two
    NotPowerOfTwo {
        /// The rejected length
        len: usize,
    },

    /// A truth vector implies more variables than supported
    TooLong {
        /// Implied number of variables
        bits: u32,
    },

    /// Solver output could not be turned into a pattern matrix
    MalformedResult {
        /// The offending line (empty when the problem isn't tied to a line)
        line: String,
        /// What was wrong with it
        reason: String,
    },

    /// Two mutually exclusive solver options were requested together
    ConflictingFlags {
        /// First option name
        first: &'static str,
        /// Second option name
        second: &'static str,
    },

    /// A configuration key is not recognised
    UnknownOption {
        /// The unknown key
        name: String,
    },

    /// A configuration key was given more than once
    DuplicateOption {
        /// The repeated key
        name: String,
    },

    /// A configuration value could not be parsed for its key
    InvalidOptionValue {
        /// The key
        name: String,
        /// The rejected value
        value: String,
    },

    /// The solver could not be run or talked to at all
    SolverTransportFailure(io::Error),

    /// The solver ran and reported failure through its exit status
    SolverReportedFailure {
        /// Failure category derived from the status
        kind: SolverFailureKind,
        /// Human readable status (exit code or signal)
        status: String,
        /// Whatever the solver printed before failing
        output: String,
    },

    /// IO error while reading or writing a cover-set document
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidValue {
                role,
                value,
                row,
                column,
            } => write!(
                f,
                "Invalid {} value '{}' at row {}, column {}",
                role, value, row, column
            ),
            Error::InvalidName(e) => write!(f, "Invalid name: {}", e),
            Error::LabelCountMismatch {
                role,
                expected,
                actual,
            } => write!(
                f,
                "{} name count ({}) doesn't match {} column count ({})",
                role, actual, role, expected
            ),
            Error::RaggedRow {
                role,
                row,
                expected,
                actual,
            } => write!(
                f,
                "{} row {} has {} columns, expected {}",
                role, row, actual, expected
            ),
            Error::EmptyTable => write!(f, "Truth table must have at least one row and column"),
            Error::RowCountMismatch {
                independent,
                dependent,
            } => write!(
                f,
                "Independent data has {} rows but dependent data has {}",
                independent, dependent
            ),
            Error::NotPowerOfTwo { len } => {
                write!(f, "Truth vector length {} is not a power of two", len)
            }
            Error::TooLong { bits } => write!(
                f,
                "Truth vector implies {} variables, at most {} are supported",
                bits,
                crate::truth_vector::MAX_VARIABLES
            ),
            Error::MalformedResult { line, reason } => {
                if line.is_empty() {
                    write!(f, "Malformed solver result: {}", reason)
                } else {
                    write!(f, "Malformed solver result line {:?}: {}", line, reason)
                }
            }
            Error::ConflictingFlags { first, second } => write!(
                f,
                "Options '{}' and '{}' are mutually exclusive",
                first, second
            ),
            Error::UnknownOption { name } => write!(f, "Unknown option '{}'", name),
            Error::DuplicateOption { name } => {
                write!(f, "Option '{}' was given more than once", name)
            }
            Error::InvalidOptionValue { name, value } => {
                write!(f, "Invalid value '{}' for option '{}'", value, name)
            }
            Error::SolverTransportFailure(e) => write!(f, "Could not run solver: {}", e),
            Error::SolverReportedFailure {
                kind,
                status,
                output,
            } => {
                write!(f, "Solver failed with {} ({})", kind, status)?;
                if !output.trim().is_empty() {
                    write!(f, ": {}", output.trim())?;
                }
                Ok(())
            }
            Error::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidName(e) => Some(e),
            Error::SolverTransportFailure(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Whether this error was raised by input or configuration validation
    ///
    /// Validation errors are always detected before the solver is invoked.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidValue { .. }
                | Error::InvalidName(_)
                | Error::LabelCountMismatch { .. }
                | Error::RaggedRow { .. }
                | Error::EmptyTable
                | Error::RowCountMismatch { .. }
                | Error::NotPowerOfTwo { .. }
                | Error::TooLong { .. }
                | Error::ConflictingFlags { .. }
                | Error::UnknownOption { .. }
                | Error::DuplicateOption { .. }
                | Error::InvalidOptionValue { .. }
        )
    }
}

impl From<NameError> for Error {
    fn from(err: NameError) -> Self {
        Error::InvalidName(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) | Error::SolverTransportFailure(e) => e,
            Error::MalformedResult { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::SolverReportedFailure { .. } => io::Error::other(err),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_value_names_role() {
        let err = Error::InvalidValue {
            role: Role::Dependent,
            value: "7".to_string(),
            row: 2,
            column: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("dependent"));
        assert!(msg.contains("'7'"));
        assert!(msg.contains("row 2"));
    }

    #[test]
    fn test_name_error_wraps_with_source() {
        let err: Error = NameError::NotUnique {
            name: Arc::from("a"),
        }
        .into();
        assert!(matches!(err, Error::InvalidName(NameError::NotUnique { .. })));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::NotPowerOfTwo { len: 5 }.is_validation());
        assert!(Error::ConflictingFlags {
            first: "exact",
            second: "fast"
        }
        .is_validation());
        assert!(!Error::MalformedResult {
            line: String::new(),
            reason: "x".to_string()
        }
        .is_validation());
        assert!(!Error::SolverReportedFailure {
            kind: SolverFailureKind::Logic,
            status: "exit status 1".to_string(),
            output: String::new(),
        }
        .is_validation());
    }

    #[test]
    fn test_io_error_kinds() {
        let io_err: io::Error = Error::NotPowerOfTwo { len: 3 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);

        let io_err: io::Error = Error::MalformedResult {
            line: "1x 1".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

        let original = io::Error::new(io::ErrorKind::NotFound, "no espresso");
        let io_err: io::Error = Error::SolverTransportFailure(original).into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_reported_failure_includes_output() {
        let err = Error::SolverReportedFailure {
            kind: SolverFailureKind::Access,
            status: "exit status 2".to_string(),
            output: "cannot open file\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("access error"));
        assert!(msg.contains("cannot open file"));
    }
}
