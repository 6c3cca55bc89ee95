//! Per-series summary statistics over a filtered view.
//!
//! One series is a (country, indicator) pair restricted to the view's rows, so
//! the year range of the selection bounds what is summarized. Missing cells
//! are counted separately and never enter min/max/mean/median.

use crate::filter::FilteredView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grouping key used in stats: one (country, indicator) series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub country: String,
    pub indicator: String,
}

/// Summary statistics for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute grouped statistics by (country, indicator) for the given indicators.
///
/// Indicators the view's table does not have are ignored. Groups come out
/// sorted by key.
pub fn grouped_summary<S: AsRef<str>>(view: &FilteredView<'_>, indicators: &[S]) -> Vec<Summary> {
    let mut groups: BTreeMap<GroupKey, (Vec<f64>, usize)> = BTreeMap::new();
    let known: Vec<&str> = indicators
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| view.indicators().iter().any(|i| i == s))
        .collect();

    for row in view.rows() {
        for ind in &known {
            let key = GroupKey {
                country: row.country.clone(),
                indicator: ind.to_string(),
            };
            let entry = groups.entry(key).or_default();
            match row.value(ind) {
                Some(v) => entry.0.push(v),
                None => entry.1 += 1,
            }
        }
    }

    let mut out = Vec::new();
    for (key, (mut vals, missing)) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else { None };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary { key, count, missing, min, max, mean, median });
    }
    out
}
