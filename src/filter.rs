//! Country/year filtering of the indicator table.
//!
//! All functions here are pure: they borrow the table, never modify it, and
//! keep rows in table order. An empty result is a valid view, not an error.

use crate::models::{IndicatorRecord, IndicatorTable, SelectionState, YearRange, distinct_countries};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// Rows of the table that match a selection, in table order.
///
/// Serializes as `{"indicators": [...], "rows": [{"country": .., "Year": .., ...}]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView<'a> {
    indicators: &'a [String],
    rows: Vec<&'a IndicatorRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a IndicatorRecord] {
        &self.rows
    }

    /// Indicator columns of the underlying table.
    pub fn indicators(&self) -> &'a [String] {
        self.indicators
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct countries in order of first appearance.
    pub fn countries(&self) -> Vec<&'a str> {
        distinct_countries(self.rows.iter().copied())
    }

    /// Rows belonging to `country`, in view order.
    pub fn rows_for<'s>(&'s self, country: &'s str) -> impl Iterator<Item = &'a IndicatorRecord> + 's {
        self.rows.iter().copied().filter(move |r| r.country == country)
    }

    /// Observed values of `indicator` for `country`, in view order.
    /// Missing cells are skipped.
    pub fn series(&self, country: &str, indicator: &str) -> Vec<f64> {
        self.rows_for(country)
            .filter_map(|r| r.value(indicator))
            .collect()
    }

    /// Like [`series`](Self::series), paired with the year of each value.
    pub fn observations(&self, country: &str, indicator: &str) -> Vec<(i32, f64)> {
        self.rows_for(country)
            .filter_map(|r| r.value(indicator).map(|v| (r.year, v)))
            .collect()
    }

    /// Owned copy of the matching rows.
    pub fn to_records(&self) -> Vec<IndicatorRecord> {
        self.rows.iter().map(|r| (*r).clone()).collect()
    }
}

/// Keep rows whose country is in `countries` and whose year lies in `years`
/// (inclusive on both ends).
pub fn filter<'a, S: AsRef<str>>(
    table: &'a IndicatorTable,
    countries: &[S],
    years: YearRange,
) -> FilteredView<'a> {
    let wanted: HashSet<&str> = countries.iter().map(|c| c.as_ref()).collect();
    let rows: Vec<&IndicatorRecord> = table
        .records()
        .iter()
        .filter(|r| wanted.contains(r.country.as_str()) && years.contains(r.year))
        .collect();
    debug!(
        "filter: {} of {} rows match {} countries in {}",
        rows.len(),
        table.len(),
        wanted.len(),
        years
    );
    FilteredView {
        indicators: table.indicators(),
        rows,
    }
}

/// [`filter`] driven by a [`SelectionState`].
pub fn filter_selection<'a>(table: &'a IndicatorTable, selection: &SelectionState) -> FilteredView<'a> {
    filter(table, &selection.countries, selection.year_range)
}

/// Keep rows of every country whose year lies in `years`. Used for the map.
pub fn filter_years(table: &IndicatorTable, years: YearRange) -> FilteredView<'_> {
    FilteredView {
        indicators: table.indicators(),
        rows: table
            .records()
            .iter()
            .filter(|r| years.contains(r.year))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::read_table_from_reader;

    fn table() -> IndicatorTable {
        let csv = "\
country,Year,GDP Growth
Canada,1999,1.0
Canada,2000,2.0
China,2000,8.0
Canada,2001,
Brazil,2001,3.0
Canada,2002,4.0
";
        read_table_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn inclusive_bounds_and_order() {
        let t = table();
        let v = filter(&t, &["Canada", "Brazil"], YearRange::new(2000, 2002));
        let got: Vec<(&str, i32)> = v.rows().iter().map(|r| (r.country.as_str(), r.year)).collect();
        assert_eq!(
            got,
            vec![("Canada", 2000), ("Canada", 2001), ("Brazil", 2001), ("Canada", 2002)]
        );
        assert_eq!(v.countries(), vec!["Canada", "Brazil"]);
    }

    #[test]
    fn empty_country_set_gives_empty_view() {
        let t = table();
        let none: [&str; 0] = [];
        assert!(filter(&t, &none, YearRange::new(1900, 2100)).is_empty());
    }

    #[test]
    fn unknown_country_gives_empty_view() {
        let t = table();
        assert!(filter(&t, &["Atlantis"], YearRange::default()).is_empty());
    }

    #[test]
    fn series_skips_missing_cells() {
        let t = table();
        let v = filter(&t, &["Canada"], YearRange::new(2000, 2002));
        assert_eq!(v.series("Canada", "GDP Growth"), vec![2.0, 4.0]);
        assert!(v.series("China", "GDP Growth").is_empty());
        assert_eq!(
            v.observations("Canada", "GDP Growth"),
            vec![(2000, 2.0), (2002, 4.0)]
        );
    }

    #[test]
    fn year_only_filter_keeps_all_countries() {
        let t = table();
        let v = filter_years(&t, YearRange::single(2001));
        assert_eq!(v.countries(), vec!["Canada", "Brazil"]);
    }

    #[test]
    fn selection_wrapper_matches_filter() {
        let t = table();
        let sel = SelectionState::new(vec!["China".into()], YearRange::default(), vec![]);
        assert_eq!(
            filter_selection(&t, &sel),
            filter(&t, &["China"], YearRange::default())
        );
    }
}
