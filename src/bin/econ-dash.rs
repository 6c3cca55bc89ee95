use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use econ_dash::report::{RenderOptions, build_dashboard};
use econ_dash::{DashboardConfig, DataStore, IndicatorCategory, SelectionState, YearRange};
use econ_dash::{filter, metrics, stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "econ-dash",
    version,
    about = "Filter, summarize & export country economic indicators for dashboards"
)]
struct Cli {
    /// Indicator CSV (default: data/final_economic_data.csv).
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Optional icon asset; a warning is printed if it is missing.
    #[arg(long, global = true)]
    icon: Option<PathBuf>,
    /// TOML config file (default: ./econ-dash.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries in the data and the default selection.
    Countries,
    /// Print the filtered data table.
    View(SelectionArgs),
    /// Print metric cards (latest value and change) per country and indicator.
    Metrics(MetricsArgs),
    /// Emit the full dashboard payload as JSON.
    Report(ReportArgs),
    /// Save the filtered rows to a file.
    Export(ExportArgs),
    /// Print grouped statistics per country and indicator.
    Summary(SelectionArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategoryArg {
    Economic,
    Demographic,
    Social,
}

impl From<CategoryArg> for IndicatorCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Economic => IndicatorCategory::Economic,
            CategoryArg::Demographic => IndicatorCategory::Demographic,
            CategoryArg::Social => IndicatorCategory::Social,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Countries separated by comma or semicolon (default: Canada, China, Brazil if present).
    #[arg(short, long)]
    countries: Option<String>,
    /// Year (YYYY) or inclusive range (YYYY:YYYY).
    #[arg(short, long)]
    years: Option<String>,
    /// Indicator names separated by comma or semicolon (default: all known indicators).
    #[arg(short, long)]
    indicators: Option<String>,
    /// Restrict indicators to one or more categories.
    #[arg(long, value_enum)]
    category: Vec<CategoryArg>,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    #[command(flatten)]
    selection: SelectionArgs,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    selection: SelectionArgs,
    /// Year or range for the GDP Growth map.
    #[arg(long)]
    map_years: Option<String>,
    /// Locale for number formatting in metric cards.
    #[arg(long)]
    locale: Option<String>,
    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    selection: SelectionArgs,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_years(s: &str) -> Result<YearRange> {
    YearRange::parse(s).ok_or_else(|| anyhow::anyhow!("invalid year '{s}', expected YYYY or YYYY:YYYY"))
}

/// Loaded once per invocation and shared by the subcommands.
struct Session {
    config: DashboardConfig,
    store: DataStore,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let mut config = DashboardConfig::discover(cli.config.as_deref()).context("loading config")?;
        if let Some(p) = &cli.data {
            config.data_path = p.clone();
        }
        if let Some(p) = &cli.icon {
            config.icon_path = p.clone();
        }
        let store = DataStore::load(&config.data_path).with_icon(&config.icon_path);
        for w in store.warnings() {
            eprintln!("warning: {w}");
        }
        Ok(Self { config, store })
    }

    fn selection(&self, args: &SelectionArgs) -> Result<SelectionState> {
        let countries = match &args.countries {
            Some(s) => parse_list(s),
            None => self.store.default_countries().to_vec(),
        };
        let years = match &args.years {
            Some(s) => parse_years(s)?,
            None => self.config.year_range,
        };
        let indicators = match (&args.indicators, args.category.is_empty()) {
            (Some(s), _) => parse_list(s),
            (None, false) => args
                .category
                .iter()
                .flat_map(|c| IndicatorCategory::from(*c).indicators())
                .map(|s| s.to_string())
                .collect(),
            (None, true) => IndicatorCategory::all_indicators(),
        };
        Ok(SelectionState::new(countries, years, indicators))
    }

    fn locale<'a>(&'a self, flag: &'a Option<String>) -> Option<&'a str> {
        flag.as_deref().or(self.config.locale.as_deref())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let session = Session::open(&cli)?;
    match &cli.cmd {
        Command::Countries => cmd_countries(&session),
        Command::View(args) => cmd_view(&session, args),
        Command::Metrics(args) => cmd_metrics(&session, args),
        Command::Report(args) => cmd_report(&session, args),
        Command::Export(args) => cmd_export(&session, args),
        Command::Summary(args) => cmd_summary(&session, args),
    }
}

fn cmd_countries(s: &Session) -> Result<()> {
    let table = s.store.table();
    for c in table.countries() {
        println!("{c}");
    }
    eprintln!(
        "{} countries; default selection: {}",
        table.countries().len(),
        s.store.default_countries().join(", ")
    );
    Ok(())
}

fn cmd_view(s: &Session, args: &SelectionArgs) -> Result<()> {
    let sel = s.selection(args)?;
    let view = filter::filter_selection(s.store.table(), &sel);
    if view.is_empty() {
        eprintln!("warning: {}", econ_dash::report::NO_DATA_WARNING);
        return Ok(());
    }
    let columns: Vec<&String> = sel
        .indicators
        .iter()
        .filter(|i| view.indicators().contains(i))
        .collect();
    let header: Vec<&str> = ["country", "Year"]
        .into_iter()
        .chain(columns.iter().map(|c| c.as_str()))
        .collect();
    println!("{}", header.join("\t"));
    for r in view.rows() {
        let mut line = vec![r.country.clone(), r.year.to_string()];
        line.extend(columns.iter().map(|c| fmt_opt(r.value(c))));
        println!("{}", line.join("\t"));
    }
    eprintln!("{} rows", view.len());
    Ok(())
}

fn cmd_metrics(s: &Session, args: &MetricsArgs) -> Result<()> {
    let sel = s.selection(&args.selection)?;
    let view = filter::filter_selection(s.store.table(), &sel);
    if view.is_empty() {
        eprintln!("warning: {}", econ_dash::report::NO_DATA_WARNING);
        return Ok(());
    }
    let locale = s.locale(&args.locale);
    for ind in sel.indicators.iter().filter(|i| view.indicators().contains(i)) {
        println!("{ind} Performance");
        for card in metrics::metric_cards(&view, &sel.countries, ind, locale) {
            println!("  [{}] {}: {}  {}", card.column + 1, card.label, card.value_text, card.delta_label());
        }
    }
    Ok(())
}

fn cmd_report(s: &Session, args: &ReportArgs) -> Result<()> {
    let sel = s.selection(&args.selection)?;
    let map_years = match &args.map_years {
        Some(y) => parse_years(y)?,
        None => s.config.map_year_range,
    };
    let opts = RenderOptions {
        map_years,
        locale: s.locale(&args.locale),
    };
    let dashboard = build_dashboard(&s.store, &sel, &opts);
    let json = serde_json::to_string_pretty(&dashboard)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote dashboard to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_export(s: &Session, args: &ExportArgs) -> Result<()> {
    let sel = s.selection(&args.selection)?;
    let view = filter::filter_selection(s.store.table(), &sel);
    if view.is_empty() {
        eprintln!("warning: {}", econ_dash::report::NO_DATA_WARNING);
    }
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&view, path)?,
        "json" => storage::save_json(&view, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", view.len(), path.display());
    Ok(())
}

fn cmd_summary(s: &Session, args: &SelectionArgs) -> Result<()> {
    let sel = s.selection(args)?;
    let view = filter::filter_selection(s.store.table(), &sel);
    if view.is_empty() {
        eprintln!("warning: {}", econ_dash::report::NO_DATA_WARNING);
        return Ok(());
    }
    for sum in stats::grouped_summary(&view, &sel.indicators) {
        println!(
            "{} • {}  count={} missing={}  min={} max={} mean={} median={}",
            sum.key.country,
            sum.key.indicator,
            sum.count,
            sum.missing,
            fmt_opt(sum.min),
            fmt_opt(sum.max),
            fmt_opt(sum.mean),
            fmt_opt(sum.median)
        );
    }
    Ok(())
}
