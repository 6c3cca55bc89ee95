//! econ_dash
//!
//! The data core of a country-indicator dashboard: load a static CSV of
//! economic, demographic and social indicators once, then filter it by
//! countries and years and derive what a dashboard shows. Pairs with the
//! `econ-dash` CLI.
//!
//! ### Features
//! - Load the indicator table once and resolve the default country selection
//! - Filter by country set and inclusive year range (pure, order-preserving)
//! - Metric cards: latest value, delta and T/B/M magnitude formatting
//! - Serializable dashboard payload (table, chart series, cards, map data)
//! - Grouped summary statistics and CSV/JSON export
//!
//! ### Example
//! ```no_run
//! use econ_dash::{DataStore, YearRange, filter};
//!
//! let store = DataStore::load("data/final_economic_data.csv");
//! let view = filter::filter(store.table(), store.default_countries(), YearRange::new(2010, 2020));
//! econ_dash::storage::save_csv(&view, "selection.csv")?;
//! for card in econ_dash::metrics::metric_cards(&view, store.default_countries(), "Inflation", None) {
//!     println!("{}: {} ({})", card.label, card.value_text, card.delta_label());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::DashboardConfig;
pub use error::{ConfigError, DataLoadError};
pub use filter::FilteredView;
pub use models::{IndicatorCategory, IndicatorRecord, IndicatorTable, SelectionState, YearRange};
pub use store::DataStore;
