//! Variable name resolution and validation
//!
//! Names are either supplied by the caller or generated with a per-side prefix
//! (`x0, x1, ...` for independent columns, `y0, y1, ...` for dependent ones).
//! Generated names skip anything already taken on either side.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::codec::Role;
use crate::error::{Error, NameError};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Whether `name` can be used as a variable name in a cover-set document
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Generates default names with a fixed prefix, avoiding names already in use
struct NameGenerator<const PREFIX: char> {
    taken: HashSet<Arc<str>>,
}

impl<const PREFIX: char> NameGenerator<PREFIX> {
    fn new(taken: HashSet<Arc<str>>) -> Self {
        Self { taken }
    }

    /// Next free name for `position`: the natural `<prefix><position>`, or the
    /// first free sequential index after it
    fn name_for(&mut self, position: usize) -> Arc<str> {
        let mut n = position;
        loop {
            let candidate: Arc<str> = Arc::from(format!("{}{}", PREFIX, n).as_str());
            if !self.taken.contains(&candidate) {
                self.taken.insert(Arc::clone(&candidate));
                return candidate;
            }
            n += 1;
        }
    }

    fn generate(&mut self, count: usize) -> Vec<Arc<str>> {
        (0..count).map(|i| self.name_for(i)).collect()
    }
}

fn supplied<S: AsRef<str>>(
    names: Option<&[S]>,
    count: usize,
    role: Role,
) -> Result<Option<Vec<Arc<str>>>, Error> {
    match names {
        None => Ok(None),
        Some(names) if names.len() != count => Err(Error::LabelCountMismatch {
            role,
            expected: count,
            actual: names.len(),
        }),
        Some(names) => Ok(Some(
            names.iter().map(|s| Arc::from(s.as_ref().trim())).collect(),
        )),
    }
}

/// Resolve the names for both sides of a table and validate them together
///
/// Supplied names must match the column count of their side. Missing sides
/// get generated names that don't collide with the other side.
pub fn resolve_names<S: AsRef<str>>(
    independent: Option<&[S]>,
    num_independent: usize,
    dependent: Option<&[S]>,
    num_dependent: usize,
) -> Result<(Vec<Arc<str>>, Vec<Arc<str>>), Error> {
    let ind = supplied(independent, num_independent, Role::Independent)?;
    let dep = supplied(dependent, num_dependent, Role::Dependent)?;

    let taken: HashSet<Arc<str>> = ind.iter().chain(dep.iter()).flatten().cloned().collect();
    let ind = match ind {
        Some(names) => names,
        None => NameGenerator::<'x'>::new(taken.clone()).generate(num_independent),
    };
    let dep = match dep {
        Some(names) => names,
        None => {
            let taken = taken.into_iter().chain(ind.iter().cloned()).collect();
            NameGenerator::<'y'>::new(taken).generate(num_dependent)
        }
    };

    validate_names(&ind, &dep)?;
    Ok((ind, dep))
}

/// Check that all names are non-empty identifiers, unique across both sides
pub fn validate_names(independent: &[Arc<str>], dependent: &[Arc<str>]) -> Result<(), NameError> {
    let mut seen = HashSet::new();
    let all = independent
        .iter()
        .enumerate()
        .map(|(i, n)| (Role::Independent, i, n))
        .chain(
            dependent
                .iter()
                .enumerate()
                .map(|(i, n)| (Role::Dependent, i, n)),
        );
    for (role, column, name) in all {
        if name.is_empty() {
            return Err(NameError::Empty { role, column });
        }
        if !is_identifier(name) {
            return Err(NameError::InvalidIdentifier {
                name: Arc::clone(name),
            });
        }
        if !seen.insert(Arc::clone(name)) {
            return Err(NameError::NotUnique {
                name: Arc::clone(name),
            });
        }
    }
    Ok(())
}
