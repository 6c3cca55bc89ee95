use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Header of the country column in the source CSV.
pub const COUNTRY_COLUMN: &str = "country";
/// Header of the year column in the source CSV.
pub const YEAR_COLUMN: &str = "Year";

/// First year offered by the year sliders.
pub const SLIDER_MIN_YEAR: i32 = 2000;
/// Last year offered by the year sliders.
pub const SLIDER_MAX_YEAR: i32 = 2023;

/// Inclusive year range like 2000..=2023.
///
/// A reversed range (`min > max`) is valid and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range covering exactly one year.
    pub fn single(year: i32) -> Self {
        Self { min: year, max: year }
    }

    #[inline]
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Parse `YYYY` or `YYYY:YYYY`.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some((a, b)) = s.split_once(':') {
            let min = a.trim().parse::<i32>().ok()?;
            let max = b.trim().parse::<i32>().ok()?;
            Some(Self { min, max })
        } else {
            s.trim().parse::<i32>().ok().map(Self::single)
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: SLIDER_MIN_YEAR,
            max: SLIDER_MAX_YEAR,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}:{}", self.min, self.max)
        }
    }
}

/// One row of the indicator table: a country, a year and its indicator values.
///
/// Serializes as a flat object: `{"country": .., "Year": .., "<indicator>": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl IndicatorRecord {
    /// Value of `indicator` for this row; `None` if the cell is missing or the
    /// column does not exist.
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.values.get(indicator).copied().flatten()
    }
}

/// The loaded dataset. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    indicators: Vec<String>,
    records: Vec<IndicatorRecord>,
}

impl IndicatorTable {
    pub fn new(indicators: Vec<String>, records: Vec<IndicatorRecord>) -> Self {
        Self {
            indicators,
            records,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Indicator column names in header order.
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    /// Rows in file order.
    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_indicator(&self, name: &str) -> bool {
        self.indicators.iter().any(|i| i == name)
    }

    /// Distinct countries in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        distinct_countries(self.records.iter())
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.records.iter().any(|r| r.country == country)
    }
}

pub(crate) fn distinct_countries<'a>(rows: impl Iterator<Item = &'a IndicatorRecord>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    rows.map(|r| r.country.as_str())
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Indicator groups offered by the selection controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorCategory {
    Economic,
    Demographic,
    Social,
}

impl IndicatorCategory {
    pub const ALL: [IndicatorCategory; 3] = [
        IndicatorCategory::Economic,
        IndicatorCategory::Demographic,
        IndicatorCategory::Social,
    ];

    pub fn indicators(self) -> &'static [&'static str] {
        match self {
            IndicatorCategory::Economic => &[
                "GDP Growth",
                "Inflation",
                "Unemployment",
                "Government Debt to GDP",
                "Current Account Balance",
                "Foreign Direct Investment",
                "Consumer Price Index",
            ],
            IndicatorCategory::Demographic => &[
                "Population Growth",
                "Life Expectancy",
                "Poverty Rate",
                "Literacy Rate",
            ],
            IndicatorCategory::Social => &["Gini Coefficient", "Labor Force Participation"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            IndicatorCategory::Economic => "Economic Indicators",
            IndicatorCategory::Demographic => "Demographic Indicators",
            IndicatorCategory::Social => "Social Indicators",
        }
    }

    /// Category an indicator belongs to, if it is one of the known ones.
    pub fn of(indicator: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.indicators().iter().any(|i| *i == indicator))
    }

    /// Every known indicator, grouped by category in display order.
    pub fn all_indicators() -> Vec<String> {
        Self::ALL
            .iter()
            .flat_map(|c| c.indicators().iter().map(|s| s.to_string()))
            .collect()
    }
}

/// The user's current filter choices. Owned by the caller and passed into
/// the core; the library holds no selection state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub countries: Vec<String>,
    pub year_range: YearRange,
    pub indicators: Vec<String>,
}

impl SelectionState {
    /// Build a selection; duplicate countries/indicators are dropped, keeping
    /// the first occurrence.
    pub fn new(countries: Vec<String>, year_range: YearRange, indicators: Vec<String>) -> Self {
        Self {
            countries: dedup(countries),
            year_range,
            indicators: dedup(indicators),
        }
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
