//! End-to-end minimization pipeline
//!
//! A [`Minimizer`] ties the pieces together: serialise the table, hand the
//! document to the solver, parse the returned cover and synthesise
//! expressions. Every validation step runs before the solver is called, so a
//! bad table or configuration never reaches it.

use std::sync::Arc;

use crate::error::Error;
use crate::expression::{synthesize, SumOfProducts};
use crate::names::resolve_names;
use crate::pla::{parse_result, PatternMatrix, PlaDocument};
use crate::solver::Solver;
use crate::table::TruthTable;
use crate::truth_vector::{DcPolicy, TruthVector, VectorCover};
use crate::EspressoConfig;

/// Result of minimizing a truth table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMinimization {
    patterns: PatternMatrix,
    expression: SumOfProducts,
    raw_output: String,
}

impl TableMinimization {
    /// The cover parsed from the solver output
    pub fn patterns(&self) -> &PatternMatrix {
        &self.patterns
    }

    /// One expression per dependent column
    pub fn expression(&self) -> &SumOfProducts {
        &self.expression
    }

    pub fn literal_cost(&self) -> usize {
        self.patterns.literal_cost()
    }

    pub fn term_count(&self) -> usize {
        self.patterns.term_count()
    }

    /// Text printed by the solver
    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }
}

/// Result of minimizing a truth vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorMinimization {
    patterns: PatternMatrix,
    expression: SumOfProducts,
    cover: VectorCover,
    raw_output: Option<String>,
}

impl VectorMinimization {
    /// ON rows of the solver cover
    pub fn patterns(&self) -> &PatternMatrix {
        &self.patterns
    }

    /// Expression for the single function
    pub fn expression(&self) -> &SumOfProducts {
        &self.expression
    }

    /// Covered positions per pattern row
    pub fn coverage(&self) -> &[Vec<usize>] {
        self.cover.coverage()
    }

    /// The minimized vector
    pub fn minimized(&self) -> &TruthVector {
        self.cover.minimized()
    }

    pub fn literal_cost(&self) -> usize {
        self.cover.literal_cost()
    }

    pub fn term_count(&self) -> usize {
        self.cover.term_count()
    }

    /// Text printed by the solver; `None` when it was not called
    pub fn raw_output(&self) -> Option<&str> {
        self.raw_output.as_deref()
    }
}

/// Minimizes tables and vectors through a [`Solver`]
///
/// # Examples
///
/// ```
/// use espresso_truthtable::solver::{Solver, SolverResponse};
/// use espresso_truthtable::{EspressoConfig, Minimizer, TruthVector, DcPolicy};
///
/// // A stand-in solver that always answers "second variable"
/// struct Fixed;
/// impl Solver for Fixed {
///     fn invoke(&self, _: &str, _: &EspressoConfig) -> std::io::Result<SolverResponse> {
///         Ok(SolverResponse::success(".i 2\n.o 1\n.p 1\n-1 1\n.e\n"))
///     }
/// }
///
/// let minimizer = Minimizer::new(Fixed, EspressoConfig::default()).unwrap();
/// let tt: TruthVector = "0101".parse().unwrap();
/// let result = minimizer.minimize_vector(&tt, DcPolicy::Consume).unwrap();
/// assert_eq!(result.expression().to_string(), "y0 = x1");
/// assert_eq!(result.coverage(), &[vec![1, 3]]);
/// ```
#[derive(Debug, Clone)]
pub struct Minimizer<S> {
    solver: S,
    config: EspressoConfig,
}

impl<S: Solver> Minimizer<S> {
    /// Validate `config` and pair it with `solver`
    ///
    /// Expressions are built from the ON rows of the cover, so the output set
    /// must include `f`.
    pub fn new(solver: S, config: EspressoConfig) -> Result<Self, Error> {
        config.validate()?;
        if !config.output_set.includes_on() {
            return Err(Error::InvalidOptionValue {
                name: "output".to_string(),
                value: config.output_set.to_string(),
            });
        }
        Ok(Minimizer { solver, config })
    }

    pub fn config(&self) -> &EspressoConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    fn run(&self, document: &PlaDocument) -> Result<String, Error> {
        let text = document.to_string();
        let response = self
            .solver
            .invoke(&text, &self.config)
            .map_err(Error::SolverTransportFailure)?;
        response.into_output()
    }

    /// Minimize every function of a validated table
    pub fn minimize_table(&self, table: &TruthTable) -> Result<TableMinimization, Error> {
        let document = PlaDocument::from_table(table);
        let raw_output = self.run(&document)?;
        let patterns = parse_result(&raw_output, table.num_inputs(), table.num_outputs())?;
        let expression = synthesize(&patterns, table.input_labels(), table.output_labels())?;
        Ok(TableMinimization {
            patterns,
            expression,
            raw_output,
        })
    }

    /// Minimize a truth vector with generated names
    pub fn minimize_vector(
        &self,
        tt: &TruthVector,
        policy: DcPolicy,
    ) -> Result<VectorMinimization, Error> {
        self.minimize_vector_named::<&str>(tt, None, None, policy)
    }

    /// Minimize a truth vector, naming its variables and function
    ///
    /// Zero-variable vectors are answered without calling the solver.
    pub fn minimize_vector_named<N: AsRef<str>>(
        &self,
        tt: &TruthVector,
        input_names: Option<&[N]>,
        output_name: Option<&str>,
        policy: DcPolicy,
    ) -> Result<VectorMinimization, Error> {
        let num_vars = tt.num_vars() as usize;
        let inputs: Option<Vec<&str>> =
            input_names.map(|names| names.iter().map(|n| n.as_ref()).collect());
        let outputs: Option<Vec<&str>> = output_name.map(|name| vec![name]);
        let (input_labels, output_labels): (Vec<Arc<str>>, Vec<Arc<str>>) =
            resolve_names(inputs.as_deref(), num_vars, outputs.as_deref(), 1)?;

        let (patterns, raw_output) = match tt.constant_patterns() {
            Some(patterns) => {
                log::debug!("zero-variable truth vector, solver not called");
                (patterns, None)
            }
            None => {
                let (ind, dep) = tt.to_matrices();
                let table = TruthTable::new(ind, dep, input_labels.clone(), output_labels.clone())?;
                let raw = self.run(&PlaDocument::from_table(&table))?;
                let patterns = parse_result(&raw, num_vars, 1)?.on_set(0);
                (patterns, Some(raw))
            }
        };

        let cover = tt.from_pattern_matrix(&patterns, policy)?;
        let expression = synthesize(&patterns, &input_labels, &output_labels)?;
        Ok(VectorMinimization {
            patterns,
            expression,
            cover,
            raw_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawMatrix;
    use crate::error::SolverFailureKind;
    use crate::solver::{ExitState, SolverResponse};
    use std::cell::{Cell, RefCell};
    use std::io;

    /// Replays a canned response and records what it was sent
    struct Canned {
        response: SolverResponse,
        calls: Cell<usize>,
        last_document: RefCell<String>,
    }

    impl Canned {
        fn new(response: SolverResponse) -> Self {
            Canned {
                response,
                calls: Cell::new(0),
                last_document: RefCell::new(String::new()),
            }
        }
    }

    impl Solver for Canned {
        fn invoke(&self, document: &str, _: &EspressoConfig) -> io::Result<SolverResponse> {
            self.calls.set(self.calls.get() + 1);
            *self.last_document.borrow_mut() = document.to_string();
            Ok(self.response.clone())
        }
    }

    fn table() -> TruthTable {
        TruthTable::from_raw(
            &RawMatrix::from_strings(&["100", "010", "110", "000"]),
            &RawMatrix::from_strings(&["1", "1", "1", "0"]),
            Some(&["A", "B", "C"][..]),
            Some(&["Z"][..]),
        )
        .unwrap()
    }

    #[test]
    fn test_minimize_table() {
        let solver = Canned::new(SolverResponse::success(".i 3\n.o 1\n.p 2\n1-- 1\n-1- 1\n.e\n"));
        let m = Minimizer::new(&solver, EspressoConfig::default()).unwrap();
        let result = m.minimize_table(&table()).unwrap();
        assert_eq!(result.expression().to_string(), "Z = A | B");
        assert_eq!(result.term_count(), 2);
        assert_eq!(result.literal_cost(), 2);
        assert!(solver.last_document.borrow().starts_with(".i 3\n.o 1\n.ilb A B C\n.ob Z\n"));
    }

    #[test]
    fn test_conflicting_flags_fail_before_solver() {
        let config = EspressoConfig {
            exact: true,
            fast: true,
            ..Default::default()
        };
        let solver = Canned::new(SolverResponse::success(""));
        assert!(matches!(
            Minimizer::new(&solver, config),
            Err(Error::ConflictingFlags { .. })
        ));
        assert_eq!(solver.calls.get(), 0);
    }

    #[test]
    fn test_output_set_without_on_rows_is_rejected() {
        let solver = Canned::new(SolverResponse::success("-1 0\n"));
        for set in ["d", "r", "dr"] {
            let config = EspressoConfig {
                output_set: set.parse().unwrap(),
                ..Default::default()
            };
            match Minimizer::new(&solver, config) {
                Err(Error::InvalidOptionValue { name, value }) => {
                    assert_eq!(name, "output");
                    assert_eq!(value, set);
                }
                other => panic!("unexpected {:?}", other.map(|m| m.config().clone())),
            }
        }
        assert_eq!(solver.calls.get(), 0);

        let config = EspressoConfig {
            output_set: "fr".parse().unwrap(),
            ..Default::default()
        };
        assert!(Minimizer::new(&solver, config).is_ok());
    }

    #[test]
    fn test_reported_failure_and_malformed_output_are_distinct() {
        let failing = Canned::new(SolverResponse::failure(ExitState::Code(1), "syntax error"));
        let err = Minimizer::new(&failing, EspressoConfig::default())
            .unwrap()
            .minimize_table(&table())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SolverReportedFailure {
                kind: SolverFailureKind::Logic,
                ..
            }
        ));

        let garbled = Canned::new(SolverResponse::success("10 1\n"));
        let err = Minimizer::new(&garbled, EspressoConfig::default())
            .unwrap()
            .minimize_table(&table())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResult { .. }));
    }

    #[test]
    fn test_transport_failure() {
        struct Broken;
        impl Solver for Broken {
            fn invoke(&self, _: &str, _: &EspressoConfig) -> io::Result<SolverResponse> {
                Err(io::Error::new(io::ErrorKind::NotFound, "no solver"))
            }
        }
        let err = Minimizer::new(Broken, EspressoConfig::default())
            .unwrap()
            .minimize_table(&table())
            .unwrap_err();
        assert!(matches!(err, Error::SolverTransportFailure(_)));
    }

    #[test]
    fn test_vector_keeps_only_on_rows() {
        // The solver also reported an OFF row; it must not become a term
        let solver = Canned::new(SolverResponse::success("-1 1\n-0 0\n"));
        let m = Minimizer::new(&solver, EspressoConfig::default()).unwrap();
        let tt: TruthVector = "0101".parse().unwrap();
        let result = m
            .minimize_vector_named(&tt, Some(&["a", "b"][..]), Some("f"), DcPolicy::Consume)
            .unwrap();
        assert_eq!(result.patterns().num_rows(), 1);
        assert_eq!(result.expression().to_string(), "f = b");
        assert_eq!(result.minimized().to_string(), "0101");
        assert!(result.raw_output().is_some());
    }

    #[test]
    fn test_zero_variable_vector_skips_solver() {
        let solver = Canned::new(SolverResponse::success(""));
        let m = Minimizer::new(&solver, EspressoConfig::default()).unwrap();

        let one: TruthVector = "1".parse().unwrap();
        let result = m.minimize_vector(&one, DcPolicy::Consume).unwrap();
        assert_eq!(result.expression().to_string(), "y0 = 1");
        assert_eq!(result.coverage(), &[vec![0]]);
        assert!(result.raw_output().is_none());

        let zero: TruthVector = "0".parse().unwrap();
        let result = m.minimize_vector(&zero, DcPolicy::Consume).unwrap();
        assert_eq!(result.expression().to_string(), "y0 = 0");
        assert_eq!(solver.calls.get(), 0);
    }
}
