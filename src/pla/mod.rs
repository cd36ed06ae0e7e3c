//! Cover-set (PLA) text format support
//!
//! This module serialises a [`TruthTable`] into the line-oriented cover-set
//! format consumed by Espresso and parses the cover the solver prints back.
//!
//! A document looks like this:
//!
//! ```text
//! .i 2
//! .o 1
//! .ilb a b
//! .ob f
//! .p 2
//! 01 1
//! 11 1
//! .d 0
//! .r 2
//! 00 0
//! 10 0
//! .e
//! ```
//!
//! Rows are grouped per occurrence: a row that is ON for one function and
//! don't care for another appears in both the `.p` and the `.d` group.

mod parse;

pub use parse::{parse_reader, parse_result, PatternMatrix};

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::codec::{DependentCode, DependentMatrix, IndependentMatrix};
use crate::error::Error;
use crate::table::TruthTable;

/// One `<inputs> <outputs>` line of a cover-set document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaRow {
    /// Independent characters (`0`, `1`, `2`)
    pub inputs: String,
    /// Dependent characters (`0`, `1`, `2`, `~`)
    pub outputs: String,
}

/// Header and ON/DC/OFF row groups of a cover-set document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaDocument {
    input_labels: Vec<Arc<str>>,
    output_labels: Vec<Arc<str>>,
    on_set: Vec<PlaRow>,
    dc_set: Vec<PlaRow>,
    off_set: Vec<PlaRow>,
}

impl PlaDocument {
    /// Serialise a validated truth table
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_truthtable::codec::RawMatrix;
    /// use espresso_truthtable::pla::PlaDocument;
    /// use espresso_truthtable::TruthTable;
    ///
    /// let table = TruthTable::from_raw(
    ///     &RawMatrix::from_strings(&["01", "1-"]),
    ///     &RawMatrix::from_strings(&["1", "0"]),
    ///     Some(&["a", "b"][..]),
    ///     Some(&["f"][..]),
    /// ).unwrap();
    /// let doc = PlaDocument::from_table(&table);
    /// assert_eq!(
    ///     doc.to_string(),
    ///     ".i 2\n.o 1\n.ilb a b\n.ob f\n.p 1\n01 1\n.d 0\n.r 1\n12 0\n.e\n"
    /// );
    /// ```
    pub fn from_table(table: &TruthTable) -> Self {
        let inputs = table.inputs();
        let outputs = table.outputs();
        let doc = PlaDocument {
            input_labels: table.input_labels().to_vec(),
            output_labels: table.output_labels().to_vec(),
            on_set: select_rows(inputs, outputs, DependentCode::True),
            dc_set: select_rows(inputs, outputs, DependentCode::DontCare),
            off_set: select_rows(inputs, outputs, DependentCode::False),
        };
        log::debug!(
            "cover set: {} inputs, {} outputs, {} on / {} dc / {} off rows",
            doc.num_inputs(),
            doc.num_outputs(),
            doc.on_set.len(),
            doc.dc_set.len(),
            doc.off_set.len()
        );
        doc
    }

    /// Validate matrices and names, then serialise them
    pub fn write(
        inputs: IndependentMatrix,
        outputs: DependentMatrix,
        input_labels: Vec<Arc<str>>,
        output_labels: Vec<Arc<str>>,
    ) -> Result<Self, Error> {
        let table = TruthTable::new(inputs, outputs, input_labels, output_labels)?;
        Ok(Self::from_table(&table))
    }

    /// Number of independent columns
    pub fn num_inputs(&self) -> usize {
        self.input_labels.len()
    }

    /// Number of dependent columns
    pub fn num_outputs(&self) -> usize {
        self.output_labels.len()
    }

    /// Independent names in column order
    pub fn input_labels(&self) -> &[Arc<str>] {
        &self.input_labels
    }

    /// Dependent names in column order
    pub fn output_labels(&self) -> &[Arc<str>] {
        &self.output_labels
    }

    /// Rows with at least one ON output
    pub fn on_set(&self) -> &[PlaRow] {
        &self.on_set
    }

    /// Rows with at least one don't-care output
    pub fn dc_set(&self) -> &[PlaRow] {
        &self.dc_set
    }

    /// Rows with at least one OFF output
    pub fn off_set(&self) -> &[PlaRow] {
        &self.off_set
    }
}

/// Render every row that has `target` in any dependent column
fn select_rows(
    inputs: &IndependentMatrix,
    outputs: &DependentMatrix,
    target: DependentCode,
) -> Vec<PlaRow> {
    inputs
        .iter_rows()
        .zip(outputs.iter_rows())
        .filter(|(_, out)| out.contains(&target))
        .map(|(inp, out)| PlaRow {
            inputs: inp.iter().map(|v| v.pla_char()).collect(),
            outputs: out.iter().map(|v| v.pla_char()).collect(),
        })
        .collect()
}

impl fmt::Display for PlaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".i {}", self.num_inputs())?;
        writeln!(f, ".o {}", self.num_outputs())?;
        writeln!(f, ".ilb {}", join(&self.input_labels))?;
        writeln!(f, ".ob {}", join(&self.output_labels))?;

        for (directive, rows) in [
            (".p", &self.on_set),
            (".d", &self.dc_set),
            (".r", &self.off_set),
        ] {
            writeln!(f, "{} {}", directive, rows.len())?;
            for row in rows {
                writeln!(f, "{} {}", row.inputs, row.outputs)?;
            }
        }

        writeln!(f, ".e")
    }
}

fn join(labels: &[Arc<str>]) -> String {
    labels
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trait for types that can be written out in cover-set format
pub trait PlaWriter {
    /// Write the document to any `Write` implementation
    fn write_pla<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Render the document into a string
    fn to_pla_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_pla(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the document to a file
    ///
    /// Delegates to `write_pla` through a buffered writer.
    fn to_pla_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_pla(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl PlaWriter for PlaDocument {
    fn write_pla<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawMatrix;

    fn table(ind: &[&str], dep: &[&str]) -> TruthTable {
        TruthTable::from_raw(
            &RawMatrix::from_strings(ind),
            &RawMatrix::from_strings(dep),
            None::<&[&str]>,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_header_and_terminator() {
        let doc = PlaDocument::from_table(&table(&["010"], &["1"]));
        let text = doc.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ".i 3");
        assert_eq!(lines[1], ".o 1");
        assert_eq!(lines[2], ".ilb x0 x1 x2");
        assert_eq!(lines[3], ".ob y0");
        assert_eq!(*lines.last().unwrap(), ".e");
    }

    #[test]
    fn test_rows_grouped_per_occurrence() {
        // Row 0 is ON for f0 and DC for f1, so it lands in both groups
        let doc = PlaDocument::from_table(&table(&["00", "01", "1-"], &["12", "00", "~1"]));
        assert_eq!(doc.on_set().len(), 2);
        assert_eq!(doc.dc_set().len(), 1);
        assert_eq!(doc.off_set().len(), 1);
        assert_eq!(doc.on_set()[0].outputs, "12");
        assert_eq!(doc.on_set()[1].inputs, "12");
        assert_eq!(doc.on_set()[1].outputs, "~1");
        assert_eq!(doc.dc_set()[0], doc.on_set()[0]);
        assert_eq!(doc.off_set()[0].inputs, "01");
    }

    #[test]
    fn test_off_only_document_has_empty_on_section() {
        let doc = PlaDocument::from_table(&table(&["0", "1"], &["0", "0"]));
        let text = doc.to_string();
        assert!(text.contains("\n.p 0\n.d 0\n.r 2\n0 0\n1 0\n.e\n"));
    }

    #[test]
    fn test_ignore_rendered_as_tilde() {
        let doc = PlaDocument::from_table(&table(&["0"], &["5"]));
        // An ignore-only row belongs to no group
        assert!(doc.on_set().is_empty() && doc.dc_set().is_empty() && doc.off_set().is_empty());

        let doc = PlaDocument::from_table(&table(&["0"], &["15"]));
        assert_eq!(doc.on_set()[0].outputs, "1~");
    }

    #[test]
    fn test_write_validates_names() {
        let t = table(&["0"], &["1"]);
        let err = PlaDocument::write(
            t.inputs().clone(),
            t.outputs().clone(),
            vec![Arc::from("a")],
            vec![Arc::from("a")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
    }

    #[test]
    fn test_write_pla_matches_display() {
        let doc = PlaDocument::from_table(&table(&["01", "10"], &["1", "-"]));
        let mut buffer = Vec::new();
        doc.write_pla(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), doc.to_string());
        assert_eq!(doc.to_pla_string().unwrap(), doc.to_string());
    }
}
