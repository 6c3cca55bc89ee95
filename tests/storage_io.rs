use econ_dash::filter::filter;
use econ_dash::models::YearRange;
use econ_dash::storage;
use econ_dash::store::read_table_from_reader;
use std::fs;
use tempfile::tempdir;

const CSV: &str = "\
country,Year,GDP Growth,Inflation
Canada,2020,-5.0,0.7
Canada,2021,5.0,
Brazil,2021,4.6,8.3
";

#[test]
fn save_csv_and_json() {
    let t = read_table_from_reader(CSV.as_bytes()).unwrap();
    let v = filter(&t, &["Canada"], YearRange::default());
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("view.csv");
    storage::save_csv(&v, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("country,Year,GDP Growth,Inflation"));
    assert_eq!(csv_txt.lines().count(), 1 + v.len());
    assert!(csv_txt.lines().nth(2).unwrap().ends_with(",5,"));

    // the export reads back into an equal table
    let back = econ_dash::store::read_table(&csv_path).unwrap();
    assert_eq!(back.records(), v.to_records().as_slice());

    let json_path = dir.path().join("view.json");
    storage::save_json(&v, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let val: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    let rows = val.as_array().unwrap();
    assert_eq!(rows.len(), v.len());
    assert_eq!(rows[0]["country"], "Canada");
    assert_eq!(rows[0]["Year"], 2020);
    assert!(rows[1]["Inflation"].is_null());
}

// A country name opened in a spreadsheet must not run as a formula, so
// risky leading characters get a single-quote prefix.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let csv = "country,Year,X\n\"=HYPERLINK(\"\"http://evil\"\")\",2020,1\n@foo,2020,2\n";
    let t = read_table_from_reader(csv.as_bytes()).unwrap();
    let v = filter(&t, &["=HYPERLINK(\"http://evil\")", "@foo"], YearRange::default());
    assert_eq!(v.len(), 2);

    let dir = tempdir().unwrap();
    let p = dir.path().join("inj.csv");
    storage::save_csv(&v, &p).unwrap();

    let mut rdr = csv::Reader::from_path(&p).unwrap();
    let cells: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(cells[0], "'=HYPERLINK(\"http://evil\")");
    assert_eq!(cells[1], "'@foo");
}
