//! # Espresso Truth Table
//!
//! This crate turns truth tables into minimized sum-of-products expressions
//! using the Espresso heuristic logic minimizer (UC Berkeley, version 2.3) as
//! an external solver.
//!
//! ## Overview
//!
//! A minimization runs through five steps:
//!
//! 1. [`codec`] decodes raw matrices (booleans, integer codes, characters or
//!    categorical labels) into canonical codes.
//! 2. [`pla`] writes the decoded table as a cover-set (PLA) document.
//! 3. A [`Solver`] minimizes the document. [`EspressoProcess`] runs the
//!    `espresso` binary; any other implementation works too.
//! 4. [`pla::parse_result`] reads the solver output back into a
//!    [`PatternMatrix`](pla::PatternMatrix).
//! 5. [`expression::synthesize`] builds one expression per output column.
//!
//! For a single function given as a flat vector of `2^N` values,
//! [`TruthVector`] adds the conversion into table form and maps the solver
//! patterns back onto vector positions.
//!
//! ## Minimizing a Table
//!
//! ```no_run
//! use espresso_truthtable::codec::RawMatrix;
//! use espresso_truthtable::{EspressoConfig, EspressoProcess, Minimizer, TruthTable};
//!
//! # fn main() -> Result<(), espresso_truthtable::Error> {
//! let table = TruthTable::from_raw(
//!     &RawMatrix::from_strings(&["100", "010", "110", "000"]),
//!     &RawMatrix::from_strings(&["1", "1", "1", "0"]),
//!     Some(&["A", "B", "C"][..]),
//!     Some(&["Z"][..]),
//! )?;
//!
//! let minimizer = Minimizer::new(EspressoProcess::from_env(), EspressoConfig::default())?;
//! let result = minimizer.minimize_table(&table)?;
//! println!("{}", result.expression()); // Z = A | B
//! # Ok(())
//! # }
//! ```
//!
//! ## Minimizing a Truth Vector
//!
//! ```no_run
//! use espresso_truthtable::{DcPolicy, EspressoConfig, EspressoProcess, Minimizer, TruthVector};
//!
//! # fn main() -> Result<(), espresso_truthtable::Error> {
//! let tt: TruthVector = "0101".parse()?;
//! let minimizer = Minimizer::new(EspressoProcess::from_env(), EspressoConfig::default())?;
//! let result = minimizer.minimize_vector(&tt, DcPolicy::Consume)?;
//!
//! println!("{}", result.expression()); // y0 = x1
//! println!("{:?}", result.coverage()); // [[1, 3]]
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`EspressoConfig`] is an immutable value handed to every solver call. It
//! is validated before the solver runs: asking for both exact and fast
//! minimization is rejected with [`Error::ConflictingFlags`].
//!
//! ## Thread Safety
//!
//! All conversions are pure functions over immutable inputs. A [`Minimizer`]
//! takes `&self`, so one instance can serve several threads as long as its
//! solver is `Sync`; [`EspressoProcess`] starts a fresh process per call.

pub mod codec;
pub mod error;
pub mod expression;
pub mod minimize;
pub mod names;
pub mod pla;
pub mod solver;
pub mod table;
pub mod truth_vector;

use std::fmt;
use std::str::FromStr;

pub use error::{Error, NameError, SolverFailureKind};
pub use expression::SumOfProducts;
pub use minimize::{Minimizer, TableMinimization, VectorMinimization};
pub use pla::{PlaDocument, PlaWriter};
pub use solver::{EspressoProcess, Solver};
pub use table::TruthTable;
pub use truth_vector::{DcPolicy, TruthVector};

/// Which of the ON, DC and OFF sets the solver reports back
///
/// Always a non-empty subsequence of ON, DC, OFF in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputSet {
    on: bool,
    dc: bool,
    off: bool,
}

impl OutputSet {
    /// ON set only
    pub const F: OutputSet = OutputSet {
        on: true,
        dc: false,
        off: false,
    };
    /// ON and DC sets
    pub const FD: OutputSet = OutputSet {
        on: true,
        dc: true,
        off: false,
    };
    /// ON and OFF sets
    pub const FR: OutputSet = OutputSet {
        on: true,
        dc: false,
        off: true,
    };
    /// All three sets
    pub const FDR: OutputSet = OutputSet {
        on: true,
        dc: true,
        off: true,
    };

    pub fn includes_on(self) -> bool {
        self.on
    }

    pub fn includes_dc(self) -> bool {
        self.dc
    }

    pub fn includes_off(self) -> bool {
        self.off
    }
}

impl Default for OutputSet {
    fn default() -> Self {
        OutputSet::F
    }
}

impl FromStr for OutputSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidOptionValue {
            name: "output".to_string(),
            value: s.to_string(),
        };

        let mut set = OutputSet {
            on: false,
            dc: false,
            off: false,
        };
        // Position of the last letter seen, to enforce f < d < r
        let mut last = None;
        for c in s.trim().chars() {
            let (slot, rank) = match c.to_ascii_lowercase() {
                'f' => (&mut set.on, 0),
                'd' => (&mut set.dc, 1),
                'r' => (&mut set.off, 2),
                _ => return Err(invalid()),
            };
            if last.is_some_and(|l| l >= rank) {
                return Err(invalid());
            }
            *slot = true;
            last = Some(rank);
        }
        if last.is_none() {
            return Err(invalid());
        }
        Ok(set)
    }
}

impl fmt::Display for OutputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.on {
            f.write_str("f")?;
        }
        if self.dc {
            f.write_str("d")?;
        }
        if self.off {
            f.write_str("r")?;
        }
        Ok(())
    }
}

/// Configuration for the Espresso solver
///
/// # Examples
///
/// ```
/// use espresso_truthtable::EspressoConfig;
///
/// let config = EspressoConfig::from_options([("exact", "true"), ("output", "fd")]).unwrap();
/// assert_eq!(config.to_args(), ["-Dexact", "-o", "fd"]);
///
/// assert!(EspressoConfig::from_options([("exact", "1"), ("fast", "1")]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EspressoConfig {
    /// Run the solver's consistency check on the input
    pub check: bool,
    /// Exact minimization (slow, guaranteed minimum)
    pub exact: bool,
    /// Output phase optimization
    pub phase_opt: bool,
    /// Input variable pairing
    pub pair_opt: bool,
    /// Single-pass fast heuristic
    pub fast: bool,
    /// Sets reported back by the solver
    pub output_set: OutputSet,
}

/// Recognized option names, in the order flags are rendered
const OPTION_NAMES: [&str; 6] = ["check", "exact", "phase_opt", "pair_opt", "fast", "output"];

fn parse_flag(name: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

impl EspressoConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that no mutually exclusive options are set
    pub fn validate(&self) -> Result<(), Error> {
        if self.exact && self.fast {
            return Err(Error::ConflictingFlags {
                first: "exact",
                second: "fast",
            });
        }
        Ok(())
    }

    /// Build a validated configuration from `name`/`value` pairs
    ///
    /// Names are `check`, `exact`, `phase_opt`, `pair_opt`, `fast` (boolean
    /// values) and `output` (an [`OutputSet`] such as `fd`). Options left out
    /// keep their default.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = EspressoConfig::default();
        let mut seen = [false; OPTION_NAMES.len()];

        for (name, value) in options {
            let (name, value) = (name.as_ref().trim(), value.as_ref());
            let index = OPTION_NAMES
                .iter()
                .position(|&n| n == name)
                .ok_or_else(|| Error::UnknownOption {
                    name: name.to_string(),
                })?;
            if seen[index] {
                return Err(Error::DuplicateOption {
                    name: name.to_string(),
                });
            }
            seen[index] = true;

            match name {
                "check" => config.check = parse_flag(name, value)?,
                "exact" => config.exact = parse_flag(name, value)?,
                "phase_opt" => config.phase_opt = parse_flag(name, value)?,
                "pair_opt" => config.pair_opt = parse_flag(name, value)?,
                "fast" => config.fast = parse_flag(name, value)?,
                _ => config.output_set = value.parse()?,
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Command-line arguments for the `espresso` binary
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (enabled, flag) in [
            (self.check, "-Dcheck"),
            (self.exact, "-Dexact"),
            (self.phase_opt, "-Dopo"),
            (self.pair_opt, "-Dpair"),
            (self.fast, "-efast"),
        ] {
            if enabled {
                args.push(flag.to_string());
            }
        }
        args.push("-o".to_string());
        args.push(self.output_set.to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EspressoConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_set, OutputSet::F);
        assert_eq!(config.to_args(), ["-o", "f"]);
    }

    #[test]
    fn test_all_flags_rendered_in_order() {
        let config = EspressoConfig {
            check: true,
            exact: true,
            phase_opt: true,
            pair_opt: true,
            fast: false,
            output_set: OutputSet::FDR,
        };
        assert_eq!(
            config.to_args(),
            ["-Dcheck", "-Dexact", "-Dopo", "-Dpair", "-o", "fdr"]
        );

        let fast = EspressoConfig {
            fast: true,
            ..Default::default()
        };
        assert_eq!(fast.to_args(), ["-efast", "-o", "f"]);
    }

    #[test]
    fn test_conflicting_flags() {
        let config = EspressoConfig {
            exact: true,
            fast: true,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::ConflictingFlags {
                first: "exact",
                second: "fast"
            })
        ));
    }

    #[test]
    fn test_from_options_errors() {
        assert!(matches!(
            EspressoConfig::from_options([("verbose", "true")]),
            Err(Error::UnknownOption { .. })
        ));
        assert!(matches!(
            EspressoConfig::from_options([("check", "true"), ("check", "false")]),
            Err(Error::DuplicateOption { .. })
        ));
        assert!(matches!(
            EspressoConfig::from_options([("check", "maybe")]),
            Err(Error::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            EspressoConfig::from_options([("output", "rf")]),
            Err(Error::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn test_from_options_empty_is_default() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(
            EspressoConfig::from_options(none).unwrap(),
            EspressoConfig::default()
        );
    }

    #[test]
    fn test_output_set_parsing() {
        for text in ["f", "d", "r", "fd", "fr", "dr", "fdr"] {
            let set: OutputSet = text.parse().unwrap();
            assert_eq!(set.to_string(), text);
        }
        assert_eq!("FD".parse::<OutputSet>().unwrap(), OutputSet::FD);
        for bad in ["", "ff", "df", "x", "fdrx"] {
            assert!(bad.parse::<OutputSet>().is_err(), "{}", bad);
        }
        let dr: OutputSet = "dr".parse().unwrap();
        assert!(!dr.includes_on() && dr.includes_dc() && dr.includes_off());
    }
}
