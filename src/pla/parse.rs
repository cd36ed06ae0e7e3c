//! Parsing of the cover printed by the solver

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::codec::{CodeMatrix, DependentCode, DependentMatrix, IndependentCode, IndependentMatrix};
use crate::error::Error;

/// A cube line: input characters, whitespace, output characters
static CUBE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-?012]+)\s+([-~012345]+)\s*$").expect("cube line pattern is valid")
});

/// Minimised cover returned by the solver
///
/// Each row is one product term: independent codes select the literals and
/// the dependent codes say which functions the term belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatrix {
    inputs: IndependentMatrix,
    outputs: DependentMatrix,
}

impl PatternMatrix {
    /// Pair up independent and dependent pattern columns
    ///
    /// # Panics
    ///
    /// Panics if the row counts differ.
    pub fn new(inputs: IndependentMatrix, outputs: DependentMatrix) -> Self {
        assert_eq!(inputs.rows(), outputs.rows(), "pattern row counts must match");
        PatternMatrix { inputs, outputs }
    }

    /// A pattern matrix with no rows (constant false for every function)
    pub fn empty(num_inputs: usize, num_outputs: usize) -> Self {
        PatternMatrix {
            inputs: CodeMatrix::empty(num_inputs),
            outputs: CodeMatrix::empty(num_outputs),
        }
    }

    /// Independent pattern columns
    pub fn inputs(&self) -> &IndependentMatrix {
        &self.inputs
    }

    /// Dependent pattern columns
    pub fn outputs(&self) -> &DependentMatrix {
        &self.outputs
    }

    /// Number of pattern rows
    pub fn num_rows(&self) -> usize {
        self.inputs.rows()
    }

    /// Number of independent columns
    pub fn num_inputs(&self) -> usize {
        self.inputs.cols()
    }

    /// Number of dependent columns
    pub fn num_outputs(&self) -> usize {
        self.outputs.cols()
    }

    /// Rows whose dependent column `output` is true
    pub fn on_set(&self, output: usize) -> PatternMatrix {
        let keep = |r: usize| self.outputs.get(r, output) == DependentCode::True;
        PatternMatrix {
            inputs: self.inputs.select_rows(keep),
            outputs: self.outputs.select_rows(keep),
        }
    }

    /// Number of product terms
    pub fn term_count(&self) -> usize {
        self.num_rows()
    }

    /// Rough two-level synthesis cost of this cover
    ///
    /// Terms with a single literal need no AND gate and are free; every other
    /// term costs its literal count. With more than one term, each term adds
    /// one unit for the final OR gate.
    pub fn literal_cost(&self) -> usize {
        let literals: usize = self
            .inputs
            .iter_rows()
            .map(|row| row.iter().filter(|&&v| v != IndependentCode::DontCare).count())
            .filter(|&n| n > 1)
            .sum();
        let rows = self.num_rows();
        if rows > 1 {
            literals + rows
        } else {
            literals
        }
    }
}

fn independent_code(c: char) -> Option<IndependentCode> {
    match c {
        '0' => Some(IndependentCode::False),
        '1' => Some(IndependentCode::True),
        '2' | '-' | '?' => Some(IndependentCode::DontCare),
        _ => None,
    }
}

fn dependent_code(c: char) -> Option<DependentCode> {
    match c {
        '0' => Some(DependentCode::False),
        '1' => Some(DependentCode::True),
        '2' | '-' => Some(DependentCode::DontCare),
        '5' | '~' => Some(DependentCode::Ignore),
        _ => None,
    }
}

/// Parse raw solver output into a pattern matrix
///
/// Lines that are not cube lines (directives, banners, diagnostics) are
/// skipped. No cube lines at all is a valid, constant-false result.
///
/// # Examples
///
/// ```
/// use espresso_truthtable::pla::parse_result;
///
/// let out = ".i 3\n.o 1\n.p 2\n1-- 1\n-1- 1\n.e\n";
/// let patterns = parse_result(out, 3, 1).unwrap();
/// assert_eq!(patterns.num_rows(), 2);
///
/// let empty = parse_result(".i 3\n.o 1\n.p 0\n.e\n", 3, 1).unwrap();
/// assert_eq!(empty.num_rows(), 0);
/// assert_eq!(empty.num_inputs(), 3);
/// ```
pub fn parse_result(raw: &str, num_inputs: usize, num_outputs: usize) -> Result<PatternMatrix, Error> {
    if num_outputs == 0 {
        return Err(Error::MalformedResult {
            line: String::new(),
            reason: "a result needs at least one output column".to_string(),
        });
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut skipped = 0usize;

    for line in raw.split(['\r', '\n']) {
        let Some(caps) = CUBE_LINE.captures(line) else {
            if !line.trim().is_empty() {
                skipped += 1;
            }
            continue;
        };
        let (inp, out) = (&caps[1], &caps[2]);

        if inp.len() != num_inputs || out.len() != num_outputs {
            return Err(Error::MalformedResult {
                line: line.to_string(),
                reason: format!(
                    "expected {} input and {} output characters, found {} and {}",
                    num_inputs,
                    num_outputs,
                    inp.len(),
                    out.len()
                ),
            });
        }

        // The pattern already restricts the input characters
        inputs.extend(inp.chars().filter_map(independent_code));
        for c in out.chars() {
            let code = dependent_code(c).ok_or_else(|| Error::MalformedResult {
                line: line.to_string(),
                reason: format!("output value '{}' is not 0, 1, 2 or ignore", c),
            })?;
            outputs.push(code);
        }
    }

    let rows = outputs.len() / num_outputs;
    log::debug!("parsed {} pattern rows, skipped {} other lines", rows, skipped);

    Ok(PatternMatrix {
        inputs: CodeMatrix::from_cells(rows, num_inputs, inputs),
        outputs: CodeMatrix::from_cells(rows, num_outputs, outputs),
    })
}

/// Parse solver output from any `BufRead` implementation
///
/// Reads everything into memory and delegates to [`parse_result`].
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    num_inputs: usize,
    num_outputs: usize,
) -> Result<PatternMatrix, Error> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    parse_result(&raw, num_inputs, num_outputs)
}
