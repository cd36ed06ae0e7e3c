//! Flat truth vectors for single-function minimization
//!
//! A [`TruthVector`] of length `2^N` stores the value of one function for every
//! assignment of `N` variables. Position `k` encodes the assignment in its
//! bits, most significant bit first: column 0 of the independent matrix is bit
//! `N - 1` of `k`, the last column is bit 0.
//!
//! # Examples
//!
//! ```
//! use espresso_truthtable::truth_vector::{DcPolicy, TruthVector};
//! use espresso_truthtable::pla::parse_result;
//!
//! let tt: TruthVector = "0101".parse().unwrap();
//! assert_eq!(tt.num_vars(), 2);
//!
//! // The solver reduces "0101" to a single pattern: second variable true
//! let patterns = parse_result("-1 1\n", 2, 1).unwrap();
//! let cover = tt.from_pattern_matrix(&patterns, DcPolicy::Consume).unwrap();
//! assert_eq!(cover.coverage(), &[vec![1, 3]]);
//! assert_eq!(cover.minimized().to_string(), "0101");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::codec::{
    CodeMatrix, DependentCode, DependentMatrix, IndependentCode, IndependentMatrix, Role,
};
use crate::error::Error;
use crate::pla::PatternMatrix;

/// Largest supported number of variables
///
/// This bounds memory use; it is not a solver limitation.
pub const MAX_VARIABLES: u32 = 52;

/// How don't-care positions are treated when building the minimized vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DcPolicy {
    /// Start from all-false: don't cares not used by any pattern become false
    #[default]
    Consume,
    /// Start from the original vector: unused don't cares stay don't care
    Preserve,
}

/// Truth vector over `N` variables with values false, true or don't care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthVector {
    values: Vec<DependentCode>,
    num_vars: u32,
}

/// Number of variables implied by a vector length
fn bit_width(len: usize) -> Result<u32, Error> {
    if !len.is_power_of_two() {
        return Err(Error::NotPowerOfTwo { len });
    }
    let bits = len.trailing_zeros();
    if bits > MAX_VARIABLES {
        return Err(Error::TooLong { bits });
    }
    Ok(bits)
}

impl TruthVector {
    /// Validate and wrap a vector of dependent codes
    ///
    /// The length must be a power of two with at most [`MAX_VARIABLES`]
    /// variables, and [`DependentCode::Ignore`] is not allowed.
    pub fn new(values: Vec<DependentCode>) -> Result<Self, Error> {
        let num_vars = bit_width(values.len())?;
        if let Some(pos) = values.iter().position(|&v| v == DependentCode::Ignore) {
            return Err(Error::InvalidValue {
                role: Role::Dependent,
                value: DependentCode::Ignore.pla_char().to_string(),
                row: 0,
                column: pos,
            });
        }
        Ok(TruthVector { values, num_vars })
    }

    /// Build from integer codes `0`, `1` and `2`
    pub fn from_codes(codes: &[i64]) -> Result<Self, Error> {
        bit_width(codes.len())?;
        let values = codes
            .iter()
            .enumerate()
            .map(|(i, &c)| match c {
                0 => Ok(DependentCode::False),
                1 => Ok(DependentCode::True),
                2 => Ok(DependentCode::DontCare),
                _ => Err(Error::InvalidValue {
                    role: Role::Dependent,
                    value: c.to_string(),
                    row: 0,
                    column: i,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }

    /// Build from booleans
    pub fn from_bools(bits: &[bool]) -> Result<Self, Error> {
        Self::new(
            bits.iter()
                .map(|&b| {
                    if b {
                        DependentCode::True
                    } else {
                        DependentCode::False
                    }
                })
                .collect(),
        )
    }

    /// Number of variables `N`
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of positions (`2^N`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a valid truth vector has at least one position
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values by position
    pub fn values(&self) -> &[DependentCode] {
        &self.values
    }

    /// Value at `position`
    pub fn get(&self, position: usize) -> Option<DependentCode> {
        self.values.get(position).copied()
    }

    /// Expand into the two-matrix table form
    ///
    /// Row `k` of the independent matrix is the MSB-first binary expansion of
    /// `k`; the dependent matrix is the vector as a single column.
    pub fn to_matrices(&self) -> (IndependentMatrix, DependentMatrix) {
        let n = self.num_vars as usize;
        let rows = self.values.len();
        let mut cells = Vec::with_capacity(rows * n);
        for k in 0..rows {
            for c in 0..n {
                cells.push(if (k >> (n - 1 - c)) & 1 == 1 {
                    IndependentCode::True
                } else {
                    IndependentCode::False
                });
            }
        }
        (
            CodeMatrix::from_cells(rows, n, cells),
            CodeMatrix::from_cells(rows, 1, self.values.clone()),
        )
    }

    /// Patterns for a zero-variable vector, without asking the solver
    ///
    /// Returns `None` when the vector has variables. A single false value gives
    /// no patterns; true and don't care give one pattern with no literals.
    pub fn constant_patterns(&self) -> Option<PatternMatrix> {
        if self.num_vars != 0 {
            return None;
        }
        match self.values[0] {
            DependentCode::False => Some(PatternMatrix::empty(0, 1)),
            _ => Some(PatternMatrix::new(
                CodeMatrix::from_cells(1, 0, Vec::new()),
                CodeMatrix::from_cells(1, 1, vec![DependentCode::True]),
            )),
        }
    }

    /// Positions covered by each pattern row, in row order
    ///
    /// A position is covered when its bits agree with every non-don't-care
    /// column of the row. Positions within a set are ascending.
    pub fn coverage(&self, patterns: &PatternMatrix) -> Result<Vec<Vec<usize>>, Error> {
        let n = self.num_vars as usize;
        if patterns.num_inputs() != n {
            return Err(Error::MalformedResult {
                line: String::new(),
                reason: format!(
                    "pattern has {} input columns but the truth vector has {} variables",
                    patterns.num_inputs(),
                    n
                ),
            });
        }

        let full: u64 = (1u64 << n) - 1;
        Ok(patterns
            .inputs()
            .iter_rows()
            .map(|row| {
                let mut care = 0u64;
                let mut value = 0u64;
                for (c, &code) in row.iter().enumerate() {
                    let bit = 1u64 << (n - 1 - c);
                    match code {
                        IndependentCode::False => care |= bit,
                        IndependentCode::True => {
                            care |= bit;
                            value |= bit;
                        }
                        IndependentCode::DontCare => {}
                    }
                }
                let free = full & !care;

                // Walk the subsets of the free bits in ascending order
                let mut positions = Vec::with_capacity(1usize << free.count_ones());
                let mut subset = 0u64;
                loop {
                    positions.push((value | subset) as usize);
                    if subset == free {
                        break;
                    }
                    subset = ((subset | !free) + 1) & free;
                }
                positions
            })
            .collect())
    }

    /// Reconstruct coverage and the minimized vector from solver patterns
    ///
    /// Every row of `patterns` is taken as part of the cover; pass the ON rows
    /// only (see [`PatternMatrix::on_set`]) when the solver also reported other
    /// sets.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_pattern_matrix(
        &self,
        patterns: &PatternMatrix,
        policy: DcPolicy,
    ) -> Result<VectorCover, Error> {
        let coverage = self.coverage(patterns)?;

        let mut values = match policy {
            DcPolicy::Consume => vec![DependentCode::False; self.values.len()],
            DcPolicy::Preserve => self.values.clone(),
        };
        for &position in coverage.iter().flatten() {
            values[position] = DependentCode::True;
        }

        Ok(VectorCover {
            coverage,
            minimized: TruthVector {
                values,
                num_vars: self.num_vars,
            },
            literal_cost: literal_cost(patterns),
            term_count: patterns.term_count(),
        })
    }
}

/// Rough synthesis cost of a cover; see [`PatternMatrix::literal_cost`]
pub fn literal_cost(patterns: &PatternMatrix) -> usize {
    patterns.literal_cost()
}

impl FromStr for TruthVector {
    type Err = Error;

    /// Parse `0`, `1` and `2`/`-`/`?` characters, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .trim()
            .chars()
            .enumerate()
            .map(|(i, c)| match c {
                '0' => Ok(DependentCode::False),
                '1' => Ok(DependentCode::True),
                '2' | '-' | '?' => Ok(DependentCode::DontCare),
                _ => Err(Error::InvalidValue {
                    role: Role::Dependent,
                    value: c.to_string(),
                    row: 0,
                    column: i,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }
}

impl fmt::Display for TruthVector {
    /// Renders `0`, `1` and `-` per position
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.values {
            let c = match v {
                DependentCode::False => '0',
                DependentCode::True => '1',
                _ => '-',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Result of mapping solver patterns back onto a truth vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorCover {
    coverage: Vec<Vec<usize>>,
    minimized: TruthVector,
    literal_cost: usize,
    term_count: usize,
}

impl VectorCover {
    /// Covered positions per pattern row
    pub fn coverage(&self) -> &[Vec<usize>] {
        &self.coverage
    }

    /// The minimized truth vector
    pub fn minimized(&self) -> &TruthVector {
        &self.minimized
    }

    /// Estimated gate cost of the cover
    pub fn literal_cost(&self) -> usize {
        self.literal_cost
    }

    /// Number of product terms
    pub fn term_count(&self) -> usize {
        self.term_count
    }
}
