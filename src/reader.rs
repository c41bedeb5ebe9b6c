//! Reader for tab-separated feature matrices.
//!
//! The first line holds the feature names (empty cells are skipped, so the
//! header usually starts with a tab). Every following line holds a segment
//! symbol and one value per feature: `+`, `-`, or `0`/empty for unspecified.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{PhonoclassError, Result};
use crate::feature::{FeatureValue, FeatureVector, MINUS, PLUS, UNSPECIFIED};

lazy_static! {
    static ref FEATURE_VALUE: Regex = Regex::new(r"^[+\-0]?$").unwrap();
}

pub fn read_feature_matrix<P: AsRef<Path>>(path: P) -> Result<Alphabet> {
    let text = fs::read_to_string(path.as_ref())?;
    let alphabet = parse_feature_matrix(&text)?;
    debug!(
        path = %path.as_ref().display(),
        segments = alphabet.n_segments(),
        features = alphabet.n_features(),
        "feature matrix read"
    );
    Ok(alphabet)
}

pub fn parse_feature_matrix(text: &str) -> Result<Alphabet> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(PhonoclassError::EmptyFeatureMatrix);
    };
    let feature_names: Vec<String> = header
        .split('\t')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();

    let mut rows = Vec::new();
    for (line, row) in lines {
        let mut cells = row.split('\t').map(str::trim);
        let symbol = cells.next().unwrap_or_default();
        if symbol.is_empty() {
            return Err(bad_row(line, 1, "missing segment symbol".into()));
        }
        let mut ftrs = FeatureVector::unspecified(feature_names.len());
        for f in 0..feature_names.len() {
            // missing trailing cells count as unspecified
            let cell = cells.next().unwrap_or_default();
            ftrs.set(f, feature_value(cell).ok_or_else(|| {
                bad_row(line, f + 2, format!("invalid value '{}' for feature {}", cell, feature_names[f]))
            })?);
        }
        if cells.any(|cell| !cell.is_empty()) {
            return Err(bad_row(
                line,
                feature_names.len() + 2,
                format!("more values than the {} features", feature_names.len()),
            ));
        }
        rows.push((symbol.to_owned(), ftrs));
    }
    Alphabet::new(feature_names, rows)
}

fn feature_value(cell: &str) -> Option<FeatureValue> {
    if !FEATURE_VALUE.is_match(cell) {
        return None;
    }
    Some(match cell {
        "+" => PLUS,
        "-" => MINUS,
        _ => UNSPECIFIED,
    })
}

fn bad_row(line: usize, col: usize, message: String) -> PhonoclassError {
    PhonoclassError::Parse {
        message,
        line: Some(line),
        col: Some(col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_cells_may_be_empty() {
        let alphabet = parse_feature_matrix("\tvoice\tlabial\np\t-\t+\nb\t+\t+\nt\t-\t0\n").unwrap();
        assert_eq!(alphabet.feature_names(), &["voice".to_string(), "labial".to_string()]);
        assert_eq!(alphabet.n_segments(), 3);
        assert_eq!(*alphabet.row(2), FeatureVector::from(vec![-1, 0]));
        assert_eq!(alphabet.syms().id("b"), Some(1));
    }

    #[test]
    fn short_rows_are_unspecified() {
        let alphabet = parse_feature_matrix("\ta\tb\nx\t+\n\ny\t\t-\n").unwrap();
        assert_eq!(*alphabet.row(0), FeatureVector::from(vec![1, 0]));
        assert_eq!(*alphabet.row(1), FeatureVector::from(vec![0, -1]));
    }

    #[test]
    fn bad_values_report_their_location() {
        match parse_feature_matrix("\ta\tb\nx\t+\t-\ny\t+\tyes\n") {
            Err(PhonoclassError::Parse { line, col, .. }) => {
                assert_eq!(line, Some(3));
                assert_eq!(col, Some(3));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parse_feature_matrix("\ta\nx\t+\t-\n"),
            Err(PhonoclassError::Parse { line: Some(2), .. })
        ));
    }

    #[test]
    fn empty_input_is_an_empty_matrix() {
        assert!(matches!(parse_feature_matrix("\n\n"), Err(PhonoclassError::EmptyFeatureMatrix)));
        assert!(matches!(parse_feature_matrix("\ta\tb\n"), Err(PhonoclassError::EmptyFeatureMatrix)));
    }
}
