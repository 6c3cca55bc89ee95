//! Loading the indicator table and resolving the default country selection.
//!
//! The store is built once per session and then only borrowed: every
//! recomputation of a view works off the same immutable table.
//!
//! ### Example
//! ```no_run
//! use econ_dash::store::DataStore;
//!
//! let store = DataStore::load("data/final_economic_data.csv");
//! for w in store.warnings() {
//!     eprintln!("warning: {w}");
//! }
//! println!("default countries: {:?}", store.default_countries());
//! ```

use crate::error::DataLoadError;
use crate::models::{
    COUNTRY_COLUMN, IndicatorCategory, IndicatorRecord, IndicatorTable, SelectionState,
    YEAR_COLUMN, YearRange,
};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Where the table is read from unless configured otherwise.
pub const DEFAULT_DATA_PATH: &str = "data/final_economic_data.csv";
/// Optional dashboard icon.
pub const DEFAULT_ICON_PATH: &str = "data/icon.webp";

/// Countries selected by default when all three are present.
pub const PREFERRED_COUNTRIES: [&str; 3] = ["Canada", "China", "Brazil"];

/// Cell contents treated as a missing observation (the usual spreadsheet and
/// dataframe export spellings).
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read the indicator table from a CSV file.
///
/// Every column except `country` and `Year` is treated as a numeric indicator.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<IndicatorTable, DataLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let table = read_table_from_reader(file)?;
    debug!(
        "loaded {} rows, {} indicators from {}",
        table.len(),
        table.indicators().len(),
        path.display()
    );
    Ok(table)
}

/// Same as [`read_table`] but from any reader (header row required).
///
/// A repeated (country, Year) pair is skipped with a warning; the first
/// occurrence wins.
pub fn read_table_from_reader<R: Read>(rdr: R) -> Result<IndicatorTable, DataLoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
    let headers = rdr.headers()?.clone();

    let country_idx = headers
        .iter()
        .position(|h| h == COUNTRY_COLUMN)
        .ok_or(DataLoadError::MissingColumn(COUNTRY_COLUMN))?;
    let year_idx = headers
        .iter()
        .position(|h| h == YEAR_COLUMN)
        .ok_or(DataLoadError::MissingColumn(YEAR_COLUMN))?;

    let indicator_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != country_idx && *i != year_idx && !h.is_empty())
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut records = Vec::new();
    for (n, row) in rdr.records().enumerate() {
        let row = row?;
        // 1-based, counting the header line
        let line = n + 2;

        let country = row.get(country_idx).unwrap_or_default().to_string();
        let year_raw = row.get(year_idx).unwrap_or_default();
        let year = parse_year(year_raw).ok_or_else(|| DataLoadError::InvalidYear {
            row: line,
            value: year_raw.to_string(),
        })?;

        if !seen.insert((country.clone(), year)) {
            warn!("row {line}: duplicate entry for {country} {year}, skipped");
            continue;
        }

        let mut values = BTreeMap::new();
        for (idx, name) in &indicator_cols {
            let raw = row.get(*idx).unwrap_or_default();
            let value = parse_cell(raw).map_err(|_| DataLoadError::InvalidValue {
                row: line,
                column: name.clone(),
                value: raw.to_string(),
            })?;
            values.insert(name.clone(), value);
        }
        records.push(IndicatorRecord {
            country,
            year,
            values,
        });
    }

    let indicators = indicator_cols.into_iter().map(|(_, name)| name).collect();
    Ok(IndicatorTable::new(indicators, records))
}

/// Years are integers, but spreadsheet exports sometimes write `2020.0`.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i32)
}

fn parse_cell(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if MISSING_MARKERS.iter().any(|m| *m == s) {
        return Ok(None);
    }
    // any other NaN spelling `f64` accepts (`NAN`, `nAn`, ...) is missing too
    s.parse::<f64>().map(|v| (!v.is_nan()).then_some(v))
}

/// Default country selection.
///
/// If Canada, China and Brazil are all present, exactly those three (in that
/// order); otherwise only the first country of the table. Empty table, empty
/// selection.
pub fn default_countries(table: &IndicatorTable) -> Vec<String> {
    let countries = table.countries();
    if PREFERRED_COUNTRIES.iter().all(|c| countries.contains(c)) {
        PREFERRED_COUNTRIES.iter().map(|c| c.to_string()).collect()
    } else {
        countries.first().map(|c| vec![c.to_string()]).unwrap_or_default()
    }
}

/// Returns a warning if the optional icon asset is missing.
pub fn check_icon<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    if path.is_file() {
        None
    } else {
        let msg = format!(
            "Icon image not found at {}; continuing without it.",
            path.display()
        );
        warn!("{msg}");
        Some(msg)
    }
}

/// The loaded table, its default country selection, and any warnings raised
/// while loading.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    source: Option<PathBuf>,
    table: IndicatorTable,
    default_countries: Vec<String>,
    warnings: Vec<String>,
}

impl DataStore {
    /// Load the table from `path`.
    ///
    /// Never fails: a load error becomes a warning and the store is left with
    /// an empty table and an empty default selection.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match read_table(path) {
            Ok(table) => {
                let mut store = Self::from_table(table);
                store.source = Some(path.to_path_buf());
                store
            }
            Err(err) => {
                let msg = match &err {
                    DataLoadError::NotFound(p) => format!(
                        "Data file not found. Please ensure the file '{}' exists.",
                        p.display()
                    ),
                    other => format!("Could not load data: {other}"),
                };
                warn!("{msg}");
                Self {
                    source: Some(path.to_path_buf()),
                    warnings: vec![msg],
                    ..Self::default()
                }
            }
        }
    }

    /// Wrap an already built table.
    pub fn from_table(table: IndicatorTable) -> Self {
        let default_countries = default_countries(&table);
        Self {
            source: None,
            table,
            default_countries,
            warnings: Vec::new(),
        }
    }

    /// Check the icon asset and record a warning if it is missing.
    pub fn with_icon<P: AsRef<Path>>(mut self, icon: P) -> Self {
        self.warnings.extend(check_icon(icon));
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn table(&self) -> &IndicatorTable {
        &self.table
    }

    pub fn default_countries(&self) -> &[String] {
        &self.default_countries
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Initial selection: default countries, the full slider range and every
    /// known indicator.
    pub fn default_selection(&self) -> SelectionState {
        SelectionState::new(
            self.default_countries.clone(),
            YearRange::default(),
            IndicatorCategory::all_indicators(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
country,Year,GDP Growth,Inflation
India,2020,-6.6,6.2
Canada,2020,-5.0,0.7
Canada,2021,5.0,
China,2021,8.4,NaN
Brazil,2021,4.6,8.3
";

    #[test]
    fn reads_rows_in_order_with_missing_cells() {
        let t = read_table_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(t.indicators(), ["GDP Growth", "Inflation"]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.countries(), vec!["India", "Canada", "China", "Brazil"]);
        assert_eq!(t.records()[2].value("Inflation"), None);
        assert_eq!(t.records()[3].value("Inflation"), None);
        assert_eq!(t.records()[3].value("GDP Growth"), Some(8.4));
    }

    #[test]
    fn duplicate_country_year_keeps_first() {
        let csv = "country,Year,X\nA,2000,1\nA,2000,2\nA,2001,3\n";
        let t = read_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.records()[0].value("X"), Some(1.0));
    }

    #[test]
    fn missing_year_column_is_an_error() {
        let err = read_table_from_reader("country,X\nA,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("Year")));
    }

    #[test]
    fn bad_cells_report_row_and_column() {
        let err = read_table_from_reader("country,Year,X\nA,2000,1\nA,2001,abc\n".as_bytes())
            .unwrap_err();
        match err {
            DataLoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "X");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = read_table_from_reader("country,Year\nA,twenty\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidYear { row: 2, .. }));
    }

    #[test]
    fn missing_markers_and_nan_spellings_are_none() {
        for raw in ["NULL", "null", "#N/A", "n/a", "None", "<NA>", "-nan", "1.#QNAN", "NAN", "nAn"] {
            assert_eq!(parse_cell(raw), Ok(None), "cell `{raw}`");
        }
        assert_eq!(parse_cell("inf"), Ok(Some(f64::INFINITY)));
        assert_eq!(parse_cell("-2.5"), Ok(Some(-2.5)));
        assert!(parse_cell("n.a.").is_err());
    }

    #[test]
    fn float_years_are_accepted() {
        assert_eq!(parse_year("2020.0"), Some(2020));
        assert_eq!(parse_year("2020.5"), None);
    }

    #[test]
    fn defaults_to_preferred_triple_when_all_present() {
        let t = read_table_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(default_countries(&t), vec!["Canada", "China", "Brazil"]);
    }

    #[test]
    fn defaults_to_first_country_otherwise() {
        let csv = "country,Year\nIndia,2000\nJapan,2000\nCanada,2000\n";
        let t = read_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(default_countries(&t), vec!["India"]);
        assert!(default_countries(&IndicatorTable::empty()).is_empty());
    }

    #[test]
    fn missing_file_degrades_to_empty_store() {
        let store = DataStore::load("definitely/not/here.csv");
        assert!(store.table().is_empty());
        assert!(store.default_countries().is_empty());
        assert_eq!(store.warnings().len(), 1);
        assert!(store.warnings()[0].contains("not found"));
    }
}
