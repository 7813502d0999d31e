//! Column presence and header shape.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::DataFrame;
use rapidfuzz::distance::jaro_winkler;
use tabnorm_model::TargetSchema;

use crate::issue::Issue;

/// Minimum Jaro-Winkler similarity for a produced column to be suggested as
/// the intended one.
const CLOSEST_MATCH_THRESHOLD: f64 = 0.8;

pub(crate) fn check(
    schema: &TargetSchema,
    df: &DataFrame,
    columns: &HashSet<&str>,
    strict_columns: bool,
) -> Vec<Issue> {
    let produced: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
    let expected: HashSet<&str> = schema.column_names().collect();
    let unmatched: Vec<&str> = produced
        .iter()
        .copied()
        .filter(|name| !expected.contains(name))
        .collect();

    let mut issues = Vec::new();
    for name in schema.column_names() {
        if !columns.contains(name) {
            issues.push(Issue::MissingColumn {
                column: name.to_string(),
                closest: closest_match(name, &unmatched),
            });
        }
    }

    if strict_columns {
        for name in &unmatched {
            issues.push(Issue::UnexpectedColumn {
                column: (*name).to_string(),
            });
        }
    }

    issues
}

/// Header names that occur more than once, in first-seen order.
pub(crate) fn duplicate_columns(header: &[String]) -> Vec<Issue> {
    let mut counts: BTreeMap<String, (usize, usize, &str)> = BTreeMap::new();
    for (position, name) in header.iter().enumerate() {
        let entry = counts
            .entry(name.clone())
            .or_insert((position, 0, name.as_str()));
        entry.1 += 1;
    }
    let mut duplicates: Vec<(usize, usize, &str)> = counts
        .into_values()
        .filter(|(_, occurrences, _)| *occurrences > 1)
        .collect();
    duplicates.sort_by_key(|(position, _, _)| *position);
    duplicates
        .into_iter()
        .map(|(_, occurrences, name)| Issue::DuplicateColumn {
            column: name.to_string(),
            occurrences,
        })
        .collect()
}

fn closest_match(target: &str, candidates: &[&str]) -> Option<String> {
    let target = normalize(target);
    candidates
        .iter()
        .map(|candidate| {
            let score = jaro_winkler::similarity(target.chars(), normalize(candidate).chars());
            (score, *candidate)
        })
        .filter(|(score, _)| *score >= CLOSEST_MATCH_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| name.to_string())
}

fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect()
}
