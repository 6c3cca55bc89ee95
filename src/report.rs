//! Assembly of the serializable dashboard payload.
//!
//! A [`Dashboard`] is everything a renderer needs for one render cycle: the
//! filtered data table, line-chart series grouped by country, the metric-card
//! grid, the GDP Growth map data, and the warnings to show. Rendering itself
//! is left to the consumer.

use crate::filter::{filter_selection, filter_years};
use crate::metrics::{MetricCard, metric_cards};
use crate::models::{IndicatorCategory, IndicatorRecord, SelectionState, YearRange};
use crate::store::DataStore;
use log::{debug, warn};
use serde::Serialize;

/// Indicator shown on the choropleth map.
pub const MAP_INDICATOR: &str = "GDP Growth";

/// Informational message for a selection without rows.
pub const NO_DATA_WARNING: &str = "No data available for the selected filters.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub country: String,
    pub points: Vec<SeriesPoint>,
}

/// Chart and metric cards of a single indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorPanel {
    pub indicator: String,
    pub chart_title: String,
    pub series: Vec<CountrySeries>,
    pub cards: Vec<MetricCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// `None` for indicators outside the known categories.
    pub category: Option<IndicatorCategory>,
    pub title: String,
    pub panels: Vec<IndicatorPanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub country: String,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub indicator: String,
    pub years: YearRange,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: SelectionState,
    pub table: Vec<IndicatorRecord>,
    pub sections: Vec<Section>,
    pub map: Option<MapData>,
    pub warnings: Vec<String>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Options that do not belong to the selection itself.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    pub map_years: YearRange,
    pub locale: Option<&'a str>,
}

/// Build the dashboard for `selection`.
///
/// An empty selection result is reported as a warning and yields no sections
/// and no map. Selected indicators missing from the table are skipped with a
/// warning.
pub fn build_dashboard(store: &DataStore, selection: &SelectionState, opts: &RenderOptions<'_>) -> Dashboard {
    let table = store.table();
    let view = filter_selection(table, selection);
    let mut warnings: Vec<String> = store.warnings().to_vec();

    if view.is_empty() {
        warnings.push(NO_DATA_WARNING.to_string());
        return Dashboard {
            selection: selection.clone(),
            table: Vec::new(),
            sections: Vec::new(),
            map: None,
            warnings,
        };
    }

    let mut sections: Vec<Section> = Vec::new();
    for ind in &selection.indicators {
        if !table.has_indicator(ind) {
            let msg = format!("Indicator '{ind}' is not in the data; skipped.");
            warn!("{msg}");
            warnings.push(msg);
            continue;
        }
        let category = IndicatorCategory::of(ind);
        let panel = IndicatorPanel {
            indicator: ind.clone(),
            chart_title: format!("{ind} Trends Over Time"),
            series: view
                .countries()
                .into_iter()
                .map(|c| CountrySeries {
                    country: c.to_string(),
                    points: view
                        .rows_for(c)
                        .filter_map(|r| r.value(ind).map(|value| SeriesPoint { year: r.year, value }))
                        .collect(),
                })
                .collect(),
            cards: metric_cards(&view, &selection.countries, ind, opts.locale),
        };
        match sections.iter_mut().find(|s| s.category == category) {
            Some(s) => s.panels.push(panel),
            None => sections.push(Section {
                category,
                title: category
                    .map(|c| c.title())
                    .unwrap_or("Other Indicators")
                    .to_string(),
                panels: vec![panel],
            }),
        }
    }
    // known categories first, in their fixed order
    sections.sort_by_key(|s| s.category.map_or(IndicatorCategory::ALL.len(), |c| c as usize));

    let map = table.has_indicator(MAP_INDICATOR).then(|| {
        let mv = filter_years(table, opts.map_years);
        MapData {
            indicator: MAP_INDICATOR.to_string(),
            years: opts.map_years,
            points: mv
                .rows()
                .iter()
                .filter_map(|r| {
                    r.value(MAP_INDICATOR).map(|value| MapPoint {
                        country: r.country.clone(),
                        year: r.year,
                        value,
                    })
                })
                .collect(),
        }
    });

    debug!(
        "dashboard: {} rows, {} sections, map={}",
        view.len(),
        sections.len(),
        map.is_some()
    );
    Dashboard {
        selection: selection.clone(),
        table: view.to_records(),
        sections,
        map,
        warnings,
    }
}
