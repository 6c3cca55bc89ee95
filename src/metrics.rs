//! Magnitude formatting and period-over-period deltas for metric cards.

use crate::filter::FilteredView;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Number of card columns in the metric grid.
pub const CARD_COLUMNS: usize = 3;

fn scale(value: f64) -> (f64, &'static str) {
    let a = value.abs();
    if a >= 1.0e12 {
        (value / 1.0e12, "T")
    } else if a >= 1.0e9 {
        (value / 1.0e9, "B")
    } else if a >= 1.0e6 {
        (value / 1.0e6, "M")
    } else {
        (value, "")
    }
}

/// Render a value with a T/B/M suffix and exactly two decimals.
///
/// ```
/// use econ_dash::metrics::format_magnitude;
/// assert_eq!(format_magnitude(1_500_000_000_000.0), "1.50T");
/// assert_eq!(format_magnitude(-5_000_000_000.0), "-5.00B");
/// assert_eq!(format_magnitude(42.5), "42.50");
/// ```
pub fn format_magnitude(value: f64) -> String {
    let (v, suffix) = scale(value);
    format!("{v:.2}{suffix}")
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Like [`format_magnitude`], but with locale-specific digit grouping and
/// decimal separator, e.g. `"1.234,50"` for `de`.
pub fn format_magnitude_locale(value: f64, locale_tag: &str) -> String {
    let (v, suffix) = scale(value);
    if !v.is_finite() {
        return format_magnitude(value);
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}{dec_sep}{frac_part}{suffix}")
}

/// Latest observation and its change against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub latest: f64,
    pub delta: f64,
}

/// Latest value and change over the previous observation.
///
/// A single observation has a delta of zero. An empty series has no result.
pub fn compute_delta(series: &[f64]) -> Option<Delta> {
    let latest = *series.last()?;
    let previous = if series.len() > 1 {
        series[series.len() - 2]
    } else {
        latest
    };
    Some(Delta {
        latest,
        delta: latest - previous,
    })
}

/// Direction marker for a delta. Anything that is not a strict increase,
/// zero included, is shown as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 { Trend::Up } else { Trend::Down }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

/// One card of the metric grid: a country's latest value of an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub country: String,
    pub indicator: String,
    pub label: String,
    /// Year of `latest`; older than the selection's last year when the
    /// newest cells are missing.
    pub year: i32,
    pub latest: f64,
    pub delta: f64,
    pub value_text: String,
    pub delta_text: String,
    pub trend: Trend,
    /// Grid column (0..CARD_COLUMNS).
    pub column: usize,
}

impl MetricCard {
    /// `"▲ 15.00"` style delta label.
    pub fn delta_label(&self) -> String {
        format!("{} {}", self.trend.symbol(), self.delta_text)
    }
}

/// Metric cards for `indicator`, one per selected country with data, in
/// selection order. The grid column follows the country's position in the
/// selection, so a country without data leaves a gap.
///
/// `locale` switches to [`format_magnitude_locale`]; `None` uses [`format_magnitude`].
pub fn metric_cards<S: AsRef<str>>(
    view: &FilteredView<'_>,
    countries: &[S],
    indicator: &str,
    locale: Option<&str>,
) -> Vec<MetricCard> {
    let fmt = |v: f64| match locale {
        Some(tag) => format_magnitude_locale(v, tag),
        None => format_magnitude(v),
    };
    countries
        .iter()
        .enumerate()
        .filter_map(|(i, country)| {
            let country = country.as_ref();
            let obs = view.observations(country, indicator);
            let (year, _) = *obs.last()?;
            let values: Vec<f64> = obs.iter().map(|(_, v)| *v).collect();
            let d = compute_delta(&values)?;
            let trend = Trend::from_delta(d.delta);
            Some(MetricCard {
                country: country.to_string(),
                indicator: indicator.to_string(),
                label: format!("{country} - {indicator}"),
                year,
                latest: d.latest,
                delta: d.delta,
                value_text: fmt(d.latest),
                delta_text: fmt(d.delta),
                trend,
                column: i % CARD_COLUMNS,
            })
        })
        .collect()
}
