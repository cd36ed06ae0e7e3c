//! Validated truth tables
//!
//! A [`TruthTable`] is the decoded, name-resolved pair of independent and
//! dependent matrices. Building one runs every check the cover-set writer
//! relies on, so once a table exists it can always be serialised.

use std::sync::Arc;

use crate::codec::{
    decode_dependent, decode_independent, DependentMatrix, IndependentMatrix, RawMatrix, Role,
};
use crate::error::Error;
use crate::names::{resolve_names, validate_names};

/// A truth table over canonical codes with named columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    inputs: IndependentMatrix,
    outputs: DependentMatrix,
    input_labels: Vec<Arc<str>>,
    output_labels: Vec<Arc<str>>,
}

impl TruthTable {
    /// Decode raw data and resolve names into a validated table
    ///
    /// Missing name lists are generated (`x0..`, `y0..`).
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_truthtable::codec::RawMatrix;
    /// use espresso_truthtable::TruthTable;
    ///
    /// let table = TruthTable::from_raw(
    ///     &RawMatrix::from_strings(&["00", "01", "1-"]),
    ///     &RawMatrix::from_strings(&["0", "1", "1"]),
    ///     Some(&["a", "b"][..]),
    ///     Some(&["f"][..]),
    /// ).unwrap();
    /// assert_eq!(table.num_inputs(), 2);
    /// assert_eq!(table.output_labels()[0].as_ref(), "f");
    /// ```
    pub fn from_raw<S: AsRef<str>>(
        independent: &RawMatrix,
        dependent: &RawMatrix,
        input_names: Option<&[S]>,
        output_names: Option<&[S]>,
    ) -> Result<Self, Error> {
        let inputs = decode_independent(independent)?;
        let outputs = decode_dependent(dependent)?;
        Self::check_shape(&inputs, &outputs)?;
        let (input_labels, output_labels) =
            resolve_names(input_names, inputs.cols(), output_names, outputs.cols())?;
        Ok(TruthTable {
            inputs,
            outputs,
            input_labels,
            output_labels,
        })
    }

    /// Build a table from already-decoded matrices and explicit names
    pub fn new(
        inputs: IndependentMatrix,
        outputs: DependentMatrix,
        input_labels: Vec<Arc<str>>,
        output_labels: Vec<Arc<str>>,
    ) -> Result<Self, Error> {
        Self::check_shape(&inputs, &outputs)?;
        for (role, labels, cols) in [
            (Role::Independent, &input_labels, inputs.cols()),
            (Role::Dependent, &output_labels, outputs.cols()),
        ] {
            if labels.len() != cols {
                return Err(Error::LabelCountMismatch {
                    role,
                    expected: cols,
                    actual: labels.len(),
                });
            }
        }
        validate_names(&input_labels, &output_labels)?;
        Ok(TruthTable {
            inputs,
            outputs,
            input_labels,
            output_labels,
        })
    }

    fn check_shape(inputs: &IndependentMatrix, outputs: &DependentMatrix) -> Result<(), Error> {
        if inputs.rows() != outputs.rows() {
            return Err(Error::RowCountMismatch {
                independent: inputs.rows(),
                dependent: outputs.rows(),
            });
        }
        if inputs.rows() == 0 || inputs.cols() == 0 || outputs.cols() == 0 {
            return Err(Error::EmptyTable);
        }
        Ok(())
    }

    /// Independent codes
    pub fn inputs(&self) -> &IndependentMatrix {
        &self.inputs
    }

    /// Dependent codes
    pub fn outputs(&self) -> &DependentMatrix {
        &self.outputs
    }

    /// Number of independent columns
    pub fn num_inputs(&self) -> usize {
        self.inputs.cols()
    }

    /// Number of dependent columns
    pub fn num_outputs(&self) -> usize {
        self.outputs.cols()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.inputs.rows()
    }

    /// Independent column names
    pub fn input_labels(&self) -> &[Arc<str>] {
        &self.input_labels
    }

    /// Dependent column names
    pub fn output_labels(&self) -> &[Arc<str>] {
        &self.output_labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DependentCode;

    const NONE: Option<&[&str]> = None;

    #[test]
    fn test_from_raw_generates_names() {
        let table = TruthTable::from_raw(
            &RawMatrix::from_strings(&["0", "1"]),
            &RawMatrix::Int(vec![vec![3], vec![4]]),
            NONE,
            NONE,
        )
        .unwrap();
        assert_eq!(table.input_labels()[0].as_ref(), "x0");
        assert_eq!(table.output_labels()[0].as_ref(), "y0");
        assert_eq!(table.outputs().get(0, 0), DependentCode::False);
        assert_eq!(table.outputs().get(1, 0), DependentCode::True);
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = TruthTable::from_raw(
            &RawMatrix::from_strings(&["0", "1"]),
            &RawMatrix::from_strings(&["1"]),
            NONE,
            NONE,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::RowCountMismatch {
                independent: 2,
                dependent: 1
            }
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        let empty: [&str; 0] = [];
        let err = TruthTable::from_raw(
            &RawMatrix::from_strings(&empty),
            &RawMatrix::from_strings(&empty),
            NONE,
            NONE,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }

    #[test]
    fn test_decode_errors_come_first() {
        let err = TruthTable::from_raw(
            &RawMatrix::from_strings(&["0", "x"]),
            &RawMatrix::from_strings(&["1"]),
            NONE,
            NONE,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_new_checks_label_count() {
        let inputs = decode_independent(&RawMatrix::from_strings(&["01"])).unwrap();
        let outputs = decode_dependent(&RawMatrix::from_strings(&["1"])).unwrap();
        let err = TruthTable::new(inputs, outputs, vec![Arc::from("a")], vec![Arc::from("f")])
            .unwrap_err();
        assert!(matches!(err, Error::LabelCountMismatch { .. }));
    }
}
