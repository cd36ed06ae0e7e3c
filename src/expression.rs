//! Sum-of-products expressions synthesised from a pattern matrix
//!
//! Every dependent column becomes one [`FunctionExpr`]: the disjunction of one
//! [`ProductTerm`] per pattern row that is ON for that function. Don't-care
//! inputs contribute no literal, so each term is true for every completion of
//! its fixed inputs.
//!
//! Formatting uses `~` for negation, `&` for conjunction and `|` for
//! disjunction. A term without literals prints as `1`, a function without
//! terms as `0`.

use std::fmt;
use std::sync::Arc;

use crate::codec::{DependentCode, IndependentCode, Role};
use crate::error::Error;
use crate::pla::PatternMatrix;

/// A possibly negated reference to an independent variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    column: usize,
    name: Arc<str>,
    negated: bool,
}

impl Literal {
    /// Build the literal an independent code asks for, if any
    ///
    /// False gives a negated literal, true a plain one and don't care none.
    pub fn from_code(code: IndependentCode, column: usize, name: &Arc<str>) -> Option<Self> {
        let negated = match code {
            IndependentCode::False => true,
            IndependentCode::True => false,
            IndependentCode::DontCare => return None,
        };
        Some(Literal {
            column,
            name: Arc::clone(name),
            negated,
        })
    }

    /// Independent column this literal refers to
    pub fn column(&self) -> usize {
        self.column
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the variable appears negated
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Value of the literal under `assignment` (indexed by column)
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        assignment[self.column] != self.negated
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Conjunction of literals; empty means always true
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductTerm {
    literals: Vec<Literal>,
}

impl ProductTerm {
    /// Build the term for one pattern row
    pub fn from_row(row: &[IndependentCode], names: &[Arc<str>]) -> Self {
        let literals = row
            .iter()
            .zip(names)
            .enumerate()
            .filter_map(|(column, (&code, name))| Literal::from_code(code, column, name))
            .collect();
        ProductTerm { literals }
    }

    /// Literals in column order
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Value of the term under `assignment`
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.literals.iter().all(|l| l.evaluate(assignment))
    }
}

impl fmt::Display for ProductTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literals.as_slice() {
            [] => write!(f, "1"),
            [single] => write!(f, "{}", single),
            literals => {
                write!(f, "(")?;
                for (i, literal) in literals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", literal)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One named function as a disjunction of product terms; empty means always false
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionExpr {
    name: Arc<str>,
    terms: Vec<ProductTerm>,
}

impl FunctionExpr {
    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product terms in pattern row order
    pub fn terms(&self) -> &[ProductTerm] {
        &self.terms
    }

    /// Whether the function is constant false
    pub fn is_always_false(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the function under `assignment`
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.terms.iter().any(|t| t.evaluate(assignment))
    }
}

impl fmt::Display for FunctionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.name)?;
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// One expression per dependent column, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumOfProducts {
    functions: Vec<FunctionExpr>,
}

impl SumOfProducts {
    /// Per-function expressions
    pub fn functions(&self) -> &[FunctionExpr] {
        &self.functions
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionExpr> {
        self.functions.iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for SumOfProducts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}

/// Build one sum-of-products expression per dependent column
///
/// Only rows that are ON for a function contribute to it; rows that are
/// don't care, off or ignored for that function are left out even when other
/// functions use them.
///
/// # Examples
///
/// ```
/// use espresso_truthtable::expression::synthesize;
/// use espresso_truthtable::pla::parse_result;
/// use std::sync::Arc;
///
/// let patterns = parse_result("1-- 1\n-1- 1\n", 3, 1).unwrap();
/// let names: Vec<Arc<str>> = ["A", "B", "C"].iter().map(|&s| Arc::from(s)).collect();
/// let sop = synthesize(&patterns, &names, &[Arc::from("Z")]).unwrap();
/// assert_eq!(sop.to_string(), "Z = A | B");
/// ```
pub fn synthesize(
    patterns: &PatternMatrix,
    input_names: &[Arc<str>],
    output_names: &[Arc<str>],
) -> Result<SumOfProducts, Error> {
    for (role, names, cols) in [
        (Role::Independent, input_names, patterns.num_inputs()),
        (Role::Dependent, output_names, patterns.num_outputs()),
    ] {
        if names.len() != cols {
            return Err(Error::LabelCountMismatch {
                role,
                expected: cols,
                actual: names.len(),
            });
        }
    }

    let inputs = patterns.inputs();
    let outputs = patterns.outputs();
    let functions = output_names
        .iter()
        .enumerate()
        .map(|(j, name)| FunctionExpr {
            name: Arc::clone(name),
            terms: (0..patterns.num_rows())
                .filter(|&r| outputs.get(r, j) == DependentCode::True)
                .map(|r| ProductTerm::from_row(inputs.row(r), input_names))
                .collect(),
        })
        .collect();

    Ok(SumOfProducts { functions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pla::parse_result;

    fn names(list: &[&str]) -> Vec<Arc<str>> {
        list.iter().map(|&s| Arc::from(s)).collect()
    }

    #[test]
    fn test_literal_builder_three_way() {
        let n: Arc<str> = Arc::from("a");
        assert_eq!(
            Literal::from_code(IndependentCode::False, 0, &n).unwrap().to_string(),
            "~a"
        );
        assert_eq!(
            Literal::from_code(IndependentCode::True, 0, &n).unwrap().to_string(),
            "a"
        );
        assert!(Literal::from_code(IndependentCode::DontCare, 0, &n).is_none());
    }

    #[test]
    fn test_term_formatting() {
        let p = parse_result("--- 1\n-0- 1\n1-0 1\n", 3, 1).unwrap();
        let sop = synthesize(&p, &names(&["a", "b", "c"]), &names(&["f"])).unwrap();
        assert_eq!(sop.to_string(), "f = 1 | ~b | (a & ~c)");
    }

    #[test]
    fn test_empty_function_is_always_false() {
        let p = parse_result("", 2, 1).unwrap();
        let sop = synthesize(&p, &names(&["a", "b"]), &names(&["f"])).unwrap();
        assert_eq!(sop.to_string(), "f = 0");
        assert!(sop.functions()[0].is_always_false());
        assert!(!sop.functions()[0].evaluate(&[true, true]));
    }

    #[test]
    fn test_only_on_rows_contribute_per_function() {
        let p = parse_result("11 10\n00 01\n01 21\n", 2, 2).unwrap();
        let sop = synthesize(&p, &names(&["a", "b"]), &names(&["f", "g"])).unwrap();
        assert_eq!(
            sop.to_string(),
            "f = (a & b)\ng = (~a & ~b) | (~a & b)"
        );
        assert_eq!(sop.function("g").unwrap().terms().len(), 2);
    }

    #[test]
    fn test_evaluation_matches_cube_semantics() {
        let p = parse_result("1-0 1\n", 3, 1).unwrap();
        let sop = synthesize(&p, &names(&["a", "b", "c"]), &names(&["f"])).unwrap();
        let f = &sop.functions()[0];
        for bits in 0..8u32 {
            let assignment: Vec<bool> = (0..3).map(|c| bits >> (2 - c) & 1 == 1).collect();
            let expected = assignment[0] && !assignment[2];
            assert_eq!(f.evaluate(&assignment), expected, "{:?}", assignment);
        }
    }

    #[test]
    fn test_name_count_checked() {
        let p = parse_result("1 1\n", 1, 1).unwrap();
        let err = synthesize(&p, &names(&["a", "b"]), &names(&["f"])).unwrap_err();
        assert!(matches!(
            err,
            Error::LabelCountMismatch {
                role: Role::Independent,
                ..
            }
        ));
    }
}
