use crate::filter::FilteredView;
use crate::models::{COUNTRY_COLUMN, YEAR_COLUMN};
use anyhow::Result;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save a view as CSV: `country`, `Year`, then one column per indicator in
/// table order. Missing values are written as empty cells.
pub fn save_csv<P: AsRef<Path>>(view: &FilteredView<'_>, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec![COUNTRY_COLUMN, YEAR_COLUMN];
    header.extend(view.indicators().iter().map(|s| s.as_str()));
    wtr.write_record(&header)?;
    for r in view.rows() {
        let mut rec = vec![sanitize_cell(&r.country).into_owned(), r.year.to_string()];
        rec.extend(
            view.indicators()
                .iter()
                .map(|i| r.value(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a view's rows as a pretty JSON array of flat records.
pub fn save_json<P: AsRef<Path>>(view: &FilteredView<'_>, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(view.rows())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
