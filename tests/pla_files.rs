//! Cover-set documents written to and read back from disk

use espresso_truthtable::codec::{DependentCode, IndependentCode, RawMatrix};
use espresso_truthtable::pla::{parse_reader, PlaDocument, PlaWriter};
use espresso_truthtable::TruthTable;
use std::fs::{self, File};
use std::io::BufReader;
use tempfile::NamedTempFile;

fn table() -> TruthTable {
    TruthTable::from_raw(
        &RawMatrix::from_strings(&["00", "01", "1-"]),
        &RawMatrix::from_strings(&["01", "1-", "10"]),
        Some(&["a", "b"][..]),
        Some(&["f", "g"][..]),
    )
    .unwrap()
}

#[test]
fn test_pla_file_roundtrip() -> std::io::Result<()> {
    let doc = PlaDocument::from_table(&table());
    let temp = NamedTempFile::new()?;
    doc.to_pla_file(temp.path())?;

    let text = fs::read_to_string(temp.path())?;
    assert_eq!(text, doc.to_string());
    assert!(text.starts_with(".i 2\n.o 2\n.ilb a b\n.ob f g\n"));
    assert!(text.ends_with(".e\n"));

    // Every grouped row comes back as one pattern row
    let patterns = parse_reader(BufReader::new(File::open(temp.path())?), 2, 2)?;
    let expected = doc.on_set().len() + doc.dc_set().len() + doc.off_set().len();
    assert_eq!(patterns.num_rows(), expected);
    assert_eq!(
        patterns.inputs().row(0),
        &[IndependentCode::False, IndependentCode::False]
    );
    assert_eq!(
        patterns.outputs().row(0),
        &[DependentCode::False, DependentCode::True]
    );
    Ok(())
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.pla");
    let err = PlaDocument::from_table(&table())
        .to_pla_file(&path)
        .unwrap_err();
    assert!(matches!(err, espresso_truthtable::Error::Io(_)));
}

#[test]
fn test_wrong_dimensions_when_reading_back() {
    let doc = PlaDocument::from_table(&table());
    let temp = NamedTempFile::new().unwrap();
    doc.to_pla_file(temp.path()).unwrap();

    let file = BufReader::new(File::open(temp.path()).unwrap());
    let err = parse_reader(file, 3, 2).unwrap_err();
    assert!(matches!(
        err,
        espresso_truthtable::Error::MalformedResult { .. }
    ));
}
