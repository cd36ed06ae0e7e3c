//! Espresso Truth Table - Command Line Interface
//!
//! Minimizes a truth vector given on the command line, or a truth table file
//! with one `<inputs> <outputs>` line per row, through the external
//! `espresso` binary.

use clap::{Args as ClapArgs, Parser};
use espresso_truthtable::codec::RawMatrix;
use espresso_truthtable::names::resolve_names;
use espresso_truthtable::{
    DcPolicy, EspressoConfig, EspressoProcess, Error, Minimizer, OutputSet, PlaDocument,
    PlaWriter, TruthTable, TruthVector,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// Truth table file: one `<inputs> <outputs>` line per row
    #[arg(value_name = "FILE")]
    table: Option<PathBuf>,

    /// Truth vector of 2^N characters from 0, 1 and -
    #[arg(short = 't', long = "vector", value_name = "VALUES")]
    vector: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "espresso-tt")]
#[command(about = "Minimize truth tables into sum-of-products expressions", long_about = None)]
#[command(version)]
struct Args {
    #[command(flatten)]
    input: Input,

    /// Input variable names, comma separated
    #[arg(short = 'i', long = "inputs", value_delimiter = ',')]
    inputs: Option<Vec<String>>,

    /// Output function names, comma separated
    #[arg(short = 'n', long = "outputs", value_delimiter = ',')]
    outputs: Option<Vec<String>>,

    /// Run the solver's consistency check
    #[arg(long)]
    check: bool,

    /// Exact minimization
    #[arg(long, conflicts_with = "fast")]
    exact: bool,

    /// Output phase optimization
    #[arg(long)]
    phase_opt: bool,

    /// Input variable pairing
    #[arg(long)]
    pair_opt: bool,

    /// Single-pass fast heuristic
    #[arg(long)]
    fast: bool,

    /// Sets reported by the solver (f, d, r, fd, fr, dr, fdr)
    #[arg(short = 'o', long = "output", default_value = "f")]
    output_set: OutputSet,

    /// Keep unused don't cares in the minimized vector
    #[arg(long)]
    preserve_dc: bool,

    /// Path of the espresso binary (defaults to $ESPRESSO, then PATH)
    #[arg(long, value_name = "PATH")]
    espresso: Option<PathBuf>,

    /// Print the cover-set document instead of minimizing
    #[arg(long)]
    emit_pla: bool,

    /// Write the cover-set document to a file instead of stdout
    #[arg(short = 'O', long = "out-file", requires = "emit_pla")]
    output_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        2 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    if let Err(e) = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Parse a truth table file, skipping blank lines and `#` comments
fn read_table(path: &Path, args: &Args) -> Result<TruthTable, Error> {
    let text = fs::read_to_string(path)?;
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(i), Some(o), None) => {
                inputs.push(i.to_string());
                outputs.push(o.to_string());
            }
            _ => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("line {}: expected `<inputs> <outputs>`", number + 1),
                )))
            }
        }
    }
    TruthTable::from_raw(
        &RawMatrix::from_strings(&inputs),
        &RawMatrix::from_strings(&outputs),
        args.inputs.as_deref(),
        args.outputs.as_deref(),
    )
}

fn emit(document: &PlaDocument, args: &Args) -> Result<(), Error> {
    match &args.output_file {
        Some(path) => document.to_pla_file(path),
        None => {
            document.write_pla(&mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let config = EspressoConfig {
        check: args.check,
        exact: args.exact,
        phase_opt: args.phase_opt,
        pair_opt: args.pair_opt,
        fast: args.fast,
        output_set: args.output_set,
    };
    let solver = match &args.espresso {
        Some(path) => EspressoProcess::new(path),
        None => EspressoProcess::from_env(),
    };
    let minimizer = Minimizer::new(solver, config)?;

    if let Some(path) = &args.input.table {
        let table = read_table(path, args)?;
        if args.emit_pla {
            return emit(&PlaDocument::from_table(&table), args);
        }
        let result = minimizer.minimize_table(&table)?;
        println!("{}", result.expression());
        println!(
            "cost: {} ({} terms)",
            result.literal_cost(),
            result.term_count()
        );
        return Ok(());
    }

    let vector: TruthVector = args.input.vector.as_deref().unwrap_or_default().parse()?;
    let (input_labels, output_labels) = resolve_names(
        args.inputs.as_deref(),
        vector.num_vars() as usize,
        args.outputs.as_deref(),
        1,
    )?;
    if args.emit_pla {
        let (ind, dep) = vector.to_matrices();
        let table = TruthTable::new(ind, dep, input_labels, output_labels)?;
        return emit(&PlaDocument::from_table(&table), args);
    }

    let policy = if args.preserve_dc {
        DcPolicy::Preserve
    } else {
        DcPolicy::Consume
    };
    let output_name = output_labels.first().map(|name| &**name);
    let result = minimizer.minimize_vector_named(
        &vector,
        Some(&input_labels[..]),
        output_name,
        policy,
    )?;

    println!("{}", result.expression());
    println!("coverage: {:?}", result.coverage());
    println!("minimized: {}", result.minimized());
    println!(
        "cost: {} ({} terms)",
        result.literal_cost(),
        result.term_count()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["espresso-tt", "--espresso", "/nonexistent/espresso"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_vector_output_names_checked_before_solver() {
        for argv in [
            &["-t", "0101", "-n", "f,g"][..],
            &["-t", "0101", "-n", "f,g", "--emit-pla"][..],
        ] {
            match run(&args(argv)) {
                Err(Error::LabelCountMismatch {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, 1);
                    assert_eq!(actual, 2);
                }
                other => panic!("unexpected {:?} for {:?}", other, argv),
            }
        }
    }

    #[test]
    fn test_single_output_name_reaches_solver() {
        // Names are accepted, so the missing binary is what fails
        let err = run(&args(&["-t", "0101", "-i", "a,b", "-n", "f"])).unwrap_err();
        assert!(matches!(err, Error::SolverTransportFailure(_)));
    }
}
