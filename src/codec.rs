//! Canonical value codes and conversion from external representations
//!
//! Truth tables reach this crate as booleans, small integers, single
//! characters or categorical labels. This module normalises all of them into
//! two closed code spaces:
//!
//! - [`IndependentCode`]: `0` false, `1` true, `2` don't care
//! - [`DependentCode`]: `0` false, `1` true, `2` don't care, `5` ignore
//!
//! The dependent aliases `3` (false) and `4` (true) are resolved while
//! decoding, so they never appear in a [`DependentMatrix`].
//!
//! # Examples
//!
//! ```
//! use espresso_truthtable::codec::{decode_independent, IndependentCode, RawMatrix};
//!
//! let raw = RawMatrix::from_strings(&["01-", "1?0"]);
//! let m = decode_independent(&raw).unwrap();
//! assert_eq!(m.row(0), &[IndependentCode::False, IndependentCode::True, IndependentCode::DontCare]);
//! assert_eq!(m.get(1, 1), IndependentCode::DontCare);
//! ```

use std::fmt;

use crate::error::Error;

/// Which side of a truth table a value or name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Premise columns (inputs)
    Independent,
    /// Function columns (outputs)
    Dependent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Independent => f.write_str("independent"),
            Role::Dependent => f.write_str("dependent"),
        }
    }
}

/// Canonical code of an independent (input) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndependentCode {
    /// The variable must be 0
    False = 0,
    /// The variable must be 1
    True = 1,
    /// The variable is unconstrained
    DontCare = 2,
}

impl IndependentCode {
    /// Numeric code of this value
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a numeric code, returning `None` outside `0..=2`
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(IndependentCode::False),
            1 => Some(IndependentCode::True),
            2 => Some(IndependentCode::DontCare),
            _ => None,
        }
    }

    /// The fixed value, or `None` for don't care
    pub fn as_bool(self) -> Option<bool> {
        match self {
            IndependentCode::False => Some(false),
            IndependentCode::True => Some(true),
            IndependentCode::DontCare => None,
        }
    }

    /// Character used for this value in a cover-set document
    pub fn pla_char(self) -> char {
        match self {
            IndependentCode::False => '0',
            IndependentCode::True => '1',
            IndependentCode::DontCare => '2',
        }
    }
}

/// Canonical code of a dependent (output) cell
///
/// Aliases `3` and `4` decode to [`DependentCode::False`] and
/// [`DependentCode::True`], so the type only has four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentCode {
    /// The function is 0 for this row
    False = 0,
    /// The function is 1 for this row
    True = 1,
    /// The function value is unconstrained for this row
    DontCare = 2,
    /// This row does not concern the function at all
    Ignore = 5,
}

impl DependentCode {
    /// Numeric code of this value
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a numeric code, resolving aliases `3` and `4`
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 | 3 => Some(DependentCode::False),
            1 | 4 => Some(DependentCode::True),
            2 => Some(DependentCode::DontCare),
            5 => Some(DependentCode::Ignore),
            _ => None,
        }
    }

    /// Character used for this value in a cover-set document
    pub fn pla_char(self) -> char {
        match self {
            DependentCode::False => '0',
            DependentCode::True => '1',
            DependentCode::DontCare => '2',
            DependentCode::Ignore => '~',
        }
    }
}

/// Dense row-major matrix of canonical codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

/// Matrix of independent codes (rows × K)
pub type IndependentMatrix = CodeMatrix<IndependentCode>;

/// Matrix of dependent codes (rows × M)
pub type DependentMatrix = CodeMatrix<DependentCode>;

impl<T: Copy> CodeMatrix<T> {
    /// Create a matrix with no rows and `cols` columns
    pub fn empty(cols: usize) -> Self {
        CodeMatrix {
            rows: 0,
            cols,
            cells: Vec::new(),
        }
    }

    /// Create a matrix from row-major cells
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), rows * cols, "cell count must be rows * cols");
        CodeMatrix { rows, cols, cells }
    }

    /// Create a matrix from a list of equally long rows
    ///
    /// `role` is only used to label the error for ragged input.
    pub fn from_rows(rows: &[Vec<T>], role: Role) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::RaggedRow {
                    role,
                    row: i,
                    expected: cols,
                    actual: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(CodeMatrix {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Cell at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(col < self.cols, "column {} out of bounds", col);
        self.cells[row * self.cols + col]
    }

    /// Slice of one row
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Keep only the rows for which `keep` returns true
    pub(crate) fn select_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Self {
        let mut cells = Vec::new();
        let mut rows = 0;
        for r in 0..self.rows {
            if keep(r) {
                cells.extend_from_slice(self.row(r));
                rows += 1;
            }
        }
        CodeMatrix {
            rows,
            cols: self.cols,
            cells,
        }
    }

    /// Convert each row into an owned vector with `f`
    pub fn to_rows<U>(&self, mut f: impl FnMut(T) -> U) -> Vec<Vec<U>> {
        self.iter_rows()
            .map(|row| row.iter().map(|&v| f(v)).collect())
            .collect()
    }
}

/// Default label for the ignore code in categorical encodings
pub const IGNORED_LABEL: &str = "ignored";

/// Labels used for false, true and don't care in categorical data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    false_label: String,
    true_label: String,
    dc_label: String,
}

impl Default for LabelSet {
    fn default() -> Self {
        LabelSet {
            false_label: "false".to_string(),
            true_label: "true".to_string(),
            dc_label: "dc".to_string(),
        }
    }
}

impl LabelSet {
    /// Create a label set, checking the labels are non-empty and distinct
    ///
    /// Comparison ignores case, and no label may equal [`IGNORED_LABEL`].
    pub fn new(false_label: &str, true_label: &str, dc_label: &str) -> Result<Self, Error> {
        let slots = ["false_label", "true_label", "dc_label"];
        let labels = [false_label, true_label, dc_label, IGNORED_LABEL];
        for (i, label) in labels[..slots.len()].iter().enumerate() {
            if label.trim().is_empty() || labels[..i].iter().any(|l| l.eq_ignore_ascii_case(label))
            {
                return Err(Error::InvalidOptionValue {
                    name: slots[i].to_string(),
                    value: (*label).to_string(),
                });
            }
        }
        if let Some(i) = labels[..slots.len()]
            .iter()
            .position(|l| l.eq_ignore_ascii_case(IGNORED_LABEL))
        {
            return Err(Error::InvalidOptionValue {
                name: slots[i].to_string(),
                value: labels[i].to_string(),
            });
        }
        Ok(LabelSet {
            false_label: false_label.to_string(),
            true_label: true_label.to_string(),
            dc_label: dc_label.to_string(),
        })
    }

    /// Label for false
    pub fn false_label(&self) -> &str {
        &self.false_label
    }

    /// Label for true
    pub fn true_label(&self) -> &str {
        &self.true_label
    }

    /// Label for don't care
    pub fn dc_label(&self) -> &str {
        &self.dc_label
    }

    fn lookup(&self, label: &str) -> Option<u8> {
        if label.eq_ignore_ascii_case(&self.false_label) {
            Some(0)
        } else if label.eq_ignore_ascii_case(&self.true_label) {
            Some(1)
        } else if label.eq_ignore_ascii_case(&self.dc_label) {
            Some(2)
        } else {
            None
        }
    }
}

/// A truth table column group in one of the supported external representations
///
/// Each variant has its own decoder; dispatch happens once in
/// [`decode_independent`] / [`decode_dependent`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawMatrix {
    /// Plain booleans (no don't cares)
    Bool(Vec<Vec<bool>>),
    /// Small integer codes
    Int(Vec<Vec<i64>>),
    /// Single characters such as `'0'`, `'1'`, `'-'`
    Char(Vec<Vec<char>>),
    /// Case-insensitive categorical labels
    Label {
        /// Cell labels, row by row
        cells: Vec<Vec<String>>,
        /// Extra labels recognised for false/true/don't care
        labels: LabelSet,
    },
}

impl RawMatrix {
    /// Character matrix with one string per row
    pub fn from_strings<S: AsRef<str>>(rows: &[S]) -> Self {
        RawMatrix::Char(rows.iter().map(|r| r.as_ref().chars().collect()).collect())
    }

    /// Categorical matrix using the default [`LabelSet`]
    pub fn from_labels<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        RawMatrix::Label {
            cells: rows
                .iter()
                .map(|r| r.iter().map(|s| s.as_ref().to_string()).collect())
                .collect(),
            labels: LabelSet::default(),
        }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        match self {
            RawMatrix::Bool(rows) => rows.len(),
            RawMatrix::Int(rows) => rows.len(),
            RawMatrix::Char(rows) => rows.len(),
            RawMatrix::Label { cells, .. } => cells.len(),
        }
    }
}

/// Target representation for re-encoding canonical matrices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// Numeric codes
    Int,
    /// `'0'`, `'1'` and `'-'` for everything else
    Char,
    /// The given labels, plus [`IGNORED_LABEL`] for the ignore code
    Label(LabelSet),
}

fn char_code(c: char) -> Option<u8> {
    match c {
        '0' => Some(0),
        '1' => Some(1),
        '2' | '-' | '?' => Some(2),
        '3' => Some(3),
        '4' => Some(4),
        '5' | '~' => Some(5),
        _ => None,
    }
}

fn label_code(label: &str, labels: &LabelSet) -> Option<u8> {
    let label = label.trim();
    if let Some(code) = labels.lookup(label) {
        return Some(code);
    }
    match label.to_ascii_lowercase().as_str() {
        "0" | "false" => Some(0),
        "1" | "true" => Some(1),
        "2" | "-" | "?" | "dc" | "dontcare" | "maybe" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        "5" | "~" | "ignore" | IGNORED_LABEL => Some(5),
        _ => None,
    }
}

/// Decode every cell of `rows`, failing on the first one `decode` rejects
fn decode_rows<S, T: Copy>(
    rows: &[Vec<S>],
    role: Role,
    decode: impl Fn(&S) -> Option<T>,
    render: impl Fn(&S) -> String,
) -> Result<CodeMatrix<T>, Error> {
    let mut out = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let mut codes = Vec::with_capacity(row.len());
        for (c, cell) in row.iter().enumerate() {
            let code = decode(cell).ok_or_else(|| Error::InvalidValue {
                role,
                value: render(cell),
                row: r,
                column: c,
            })?;
            codes.push(code);
        }
        out.push(codes);
    }
    CodeMatrix::from_rows(&out, role)
}

/// Dispatch on the representation once; `convert` restricts codes to the role's domain
fn decode_matrix<T: Copy>(
    raw: &RawMatrix,
    role: Role,
    convert: fn(u8) -> Option<T>,
) -> Result<CodeMatrix<T>, Error> {
    match raw {
        RawMatrix::Bool(rows) => decode_rows(rows, role, |&b| convert(u8::from(b)), |b| b.to_string()),
        RawMatrix::Int(rows) => decode_rows(
            rows,
            role,
            |&v| u8::try_from(v).ok().and_then(convert),
            |v| v.to_string(),
        ),
        RawMatrix::Char(rows) => decode_rows(
            rows,
            role,
            |&c| char_code(c).and_then(convert),
            |c| c.to_string(),
        ),
        RawMatrix::Label { cells, labels } => decode_rows(
            cells,
            role,
            |s| label_code(s, labels).and_then(convert),
            |s| s.clone(),
        ),
    }
}

/// Decode independent data into canonical codes
///
/// Accepts `0|false`, `1|true` and `2|-|?|dc|dontcare|maybe`; anything else
/// fails with [`Error::InvalidValue`] for the independent role.
pub fn decode_independent(raw: &RawMatrix) -> Result<IndependentMatrix, Error> {
    decode_matrix(raw, Role::Independent, IndependentCode::from_code)
}

/// Decode dependent data into canonical codes
///
/// Accepts the independent literals plus the aliases `3`/`4` and the
/// ignore marker `5|~`. Aliases are resolved here.
pub fn decode_dependent(raw: &RawMatrix) -> Result<DependentMatrix, Error> {
    decode_matrix(raw, Role::Dependent, DependentCode::from_code)
}

/// Re-encode an independent matrix into an external representation
pub fn encode_independent(m: &IndependentMatrix, encoding: &Encoding) -> RawMatrix {
    match encoding {
        Encoding::Int => RawMatrix::Int(m.to_rows(|v| i64::from(v.code()))),
        Encoding::Char => RawMatrix::Char(m.to_rows(|v| match v {
            IndependentCode::False => '0',
            IndependentCode::True => '1',
            IndependentCode::DontCare => '-',
        })),
        Encoding::Label(labels) => RawMatrix::Label {
            cells: m.to_rows(|v| {
                match v {
                    IndependentCode::False => labels.false_label(),
                    IndependentCode::True => labels.true_label(),
                    IndependentCode::DontCare => labels.dc_label(),
                }
                .to_string()
            }),
            labels: labels.clone(),
        },
    }
}

/// Re-encode a dependent matrix into an external representation
///
/// The character form only knows `'0'`, `'1'` and `'-'`, so ignore cells
/// come back as don't care when decoded again.
pub fn encode_dependent(m: &DependentMatrix, encoding: &Encoding) -> RawMatrix {
    match encoding {
        Encoding::Int => RawMatrix::Int(m.to_rows(|v| i64::from(v.code()))),
        Encoding::Char => RawMatrix::Char(m.to_rows(|v| match v {
            DependentCode::False => '0',
            DependentCode::True => '1',
            DependentCode::DontCare | DependentCode::Ignore => '-',
        })),
        Encoding::Label(labels) => RawMatrix::Label {
            cells: m.to_rows(|v| {
                match v {
                    DependentCode::False => labels.false_label(),
                    DependentCode::True => labels.true_label(),
                    DependentCode::DontCare => labels.dc_label(),
                    DependentCode::Ignore => IGNORED_LABEL,
                }
                .to_string()
            }),
            labels: labels.clone(),
        },
    }
}
