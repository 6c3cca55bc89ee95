use econ_dash::filter::filter;
use econ_dash::models::YearRange;
use econ_dash::stats::{GroupKey, grouped_summary};
use econ_dash::store::read_table_from_reader;

#[test]
fn grouped_stats_handle_missing_and_median_even_odd() {
    // (AAA, IND1) with values [1,2,3,4] -> median = (2+3)/2 = 2.5
    // (BBB, IND1) with [10, None, 30] -> missing = 1, median = 20
    let csv = "\
country,Year,IND1
AAA,2018,1
AAA,2019,2
AAA,2020,3
AAA,2021,4
BBB,2018,10
BBB,2019,
BBB,2020,30
";
    let t = read_table_from_reader(csv.as_bytes()).unwrap();
    let v = filter(&t, &["BBB", "AAA"], YearRange::new(2000, 2023));
    let got = grouped_summary(&v, &["IND1"]);
    assert_eq!(got.len(), 2);

    let a = &got[0];
    assert_eq!(
        a.key,
        GroupKey {
            country: "AAA".into(),
            indicator: "IND1".into()
        }
    );
    assert_eq!(a.count, 4);
    assert_eq!(a.missing, 0);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert!((a.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((a.median.unwrap() - 2.5).abs() < 1e-9);

    let b = &got[1];
    assert_eq!(b.key.country, "BBB");
    assert_eq!(b.count, 2);
    assert_eq!(b.missing, 1);
    assert_eq!(b.min, Some(10.0));
    assert_eq!(b.max, Some(30.0));
    assert_eq!(b.mean.unwrap(), 20.0);
    assert_eq!(b.median.unwrap(), 20.0);
}

#[test]
fn stats_respect_year_range() {
    let csv = "country,Year,X\nA,1999,100\nA,2000,1\nA,2001,3\n";
    let t = read_table_from_reader(csv.as_bytes()).unwrap();
    let v = filter(&t, &["A"], YearRange::new(2000, 2001));
    let got = grouped_summary(&v, &["X"]);
    assert_eq!(got[0].max, Some(3.0));
    assert_eq!(got[0].mean, Some(2.0));
}
