//! insider-lateral - Main binary
//!
//! Ranks insider purchases by how tightly their tickers cluster with peers
//! in return-correlation space, and reports the analytics behind the score.
//!
//! # Inputs
//!
//! - A long-format price CSV (`ticker,date,open,high,low,close,volume`)
//! - Optionally a ticker list restricting the universe
//! - For `screen`, an insider-buy ledger CSV
//! - For `form4`, saved SEC `company_tickers.json` and submissions documents
//!
//! # Output
//!
//! Every subcommand prints JSON to stdout. Logs go to stderr and follow
//! `RUST_LOG`.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use types::{MultiPanel, NaiveDate, Ticker};

use filings::{CikDirectory, FilingRef, recent_form4_filings};
use quant::{LateralEngine, ScreenConfig, ewma_correlation_matrix, screen};
use storage::{CsvPriceStore, InsiderBuyLedger, InsiderBuyProvider, read_tickers};

pub use config::{LateralConfig, MetricKind};

/// insider-lateral - insider buys ranked by neighborhood tightness
#[derive(Parser, Debug)]
#[command(name = "insider-lateral")]
#[command(about = "Rank insider buys by return-correlation neighborhood tightness")]
#[command(version)]
struct Cli {
    /// TOML config file; flags and environment override its values
    #[arg(long, env = "LATERAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Decay span of the pairwise EWMA metric
    #[arg(long, env = "LATERAL_SPAN")]
    span: Option<u32>,

    /// Decay span of the panel correlation matrix
    #[arg(long, env = "LATERAL_PANEL_SPAN")]
    panel_span: Option<u32>,

    /// Similarity metric for distances
    #[arg(long, value_enum, env = "LATERAL_METRIC")]
    metric: Option<MetricKind>,

    /// Neighbors per target
    #[arg(short = 'k', long, env = "LATERAL_NEIGHBORS")]
    neighbors: Option<usize>,

    /// Days added to the latest first-available date
    #[arg(long, env = "LATERAL_START_DATE_PAD_DAYS")]
    start_date_pad_days: Option<u64>,

    /// Sessions after the event in an event window
    #[arg(long, env = "LATERAL_DAYS_FWD")]
    days_fwd: Option<usize>,

    /// Keep pairwise evaluation on one thread
    #[arg(long, env = "LATERAL_FORCE_SEQUENTIAL")]
    force_sequential: Option<bool>,
}

#[derive(Args, Debug)]
struct UniverseArgs {
    /// Long-format price CSV
    #[arg(long, env = "LATERAL_PRICES")]
    prices: PathBuf,

    /// Ticker list restricting the universe (one symbol per row)
    #[arg(long, env = "LATERAL_TICKERS")]
    tickers: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the common start date of the universe
    StartDate {
        #[command(flatten)]
        universe: UniverseArgs,
    },
    /// Print the pairwise distance matrix
    Distances {
        #[command(flatten)]
        universe: UniverseArgs,
    },
    /// Print the panel EWMA correlation matrix
    Correlations {
        #[command(flatten)]
        universe: UniverseArgs,
    },
    /// Print the nearest neighbors of a ticker
    Neighbors {
        #[command(flatten)]
        universe: UniverseArgs,
        /// Target ticker
        #[arg(long)]
        ticker: Ticker,
    },
    /// Print the feature matrix of a ticker's neighborhood
    Features {
        #[command(flatten)]
        universe: UniverseArgs,
        /// Target ticker
        #[arg(long)]
        ticker: Ticker,
    },
    /// Print relative closes of a neighborhood around an event date
    Window {
        #[command(flatten)]
        universe: UniverseArgs,
        /// Target ticker
        #[arg(long)]
        ticker: Ticker,
        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Rank the insider buys of a ledger by neighborhood tightness
    Screen {
        #[command(flatten)]
        universe: UniverseArgs,
        /// Insider-buy ledger CSV
        #[arg(long, env = "LATERAL_LEDGER")]
        ledger: PathBuf,
    },
    /// List Form 4 filings from saved SEC JSON documents
    Form4 {
        /// `company_tickers.json` document
        #[arg(long, env = "LATERAL_COMPANY_TICKERS")]
        company_tickers: PathBuf,
        /// Submissions document of the company (`CIK##########.json`)
        #[arg(long)]
        submissions: PathBuf,
        /// Issuer ticker
        #[arg(long)]
        ticker: Ticker,
        /// Only filings made after this date (YYYY-MM-DD)
        #[arg(long)]
        since: NaiveDate,
    },
}

/// One ranked insider buy.
#[derive(Debug, Serialize)]
struct ScreenRow<'a> {
    rank: usize,
    accession: &'a str,
    ticker: &'a str,
    trade_date: NaiveDate,
    filing_date: NaiveDate,
    insider_types: String,
    cost_of_trade: i64,
    tightness: f64,
    neighbors: &'a [Ticker],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), &cli.overrides)?;
    info!(?config, "configuration");

    match cli.command {
        Commands::StartDate { universe } => {
            let prices = load_universe(&universe)?;
            let engine = LateralEngine::with_options(prices, config.force_sequential)?;
            let (start, ticker) = engine
                .start_date(config.start_date_pad_days)
                .context("universe has no price data")?;
            print_json(&serde_json::json!({ "start_date": start, "set_by": ticker }))
        }
        Commands::Distances { universe } => {
            let mut engine = aligned_engine(&universe, &config)?;
            let matrix = engine.distances(config.metric_type())?;
            print_json(&matrix.to_table())
        }
        Commands::Correlations { universe } => {
            let engine = aligned_engine(&universe, &config)?;
            let matrix = ewma_correlation_matrix(engine.returns(), config.panel_span)?;
            print_json(&matrix.to_table())
        }
        Commands::Neighbors { universe, ticker } => {
            let mut engine = aligned_engine(&universe, &config)?;
            let hood = engine.neighborhood(config.metric_type(), &ticker, config.neighbors)?;
            print_json(&hood)
        }
        Commands::Features { universe, ticker } => {
            let mut engine = aligned_engine(&universe, &config)?;
            let hood = engine.neighborhood(config.metric_type(), &ticker, config.neighbors)?;
            print_json(&engine.features(&hood)?.to_table())
        }
        Commands::Window {
            universe,
            ticker,
            date,
        } => {
            let mut engine = aligned_engine(&universe, &config)?;
            let hood = engine.neighborhood(config.metric_type(), &ticker, config.neighbors)?;
            // The window reads the full history, not just the aligned range.
            let full = LateralEngine::with_options(load_universe(&universe)?, config.force_sequential)?;
            print_json(&full.event_window(&hood, date, config.days_fwd)?)
        }
        Commands::Screen { universe, ledger } => run_screen(&universe, &ledger, &config),
        Commands::Form4 {
            company_tickers,
            submissions,
            ticker,
            since,
        } => run_form4(&company_tickers, &submissions, &ticker, since),
    }
}

/// Defaults, then the config file, then flags and environment.
fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<LateralConfig> {
    let mut config = match path {
        Some(path) => LateralConfig::from_file(path)?,
        None => LateralConfig::default(),
    };
    if let Some(span) = overrides.span {
        config = config.span(span);
    }
    if let Some(span) = overrides.panel_span {
        config = config.panel_span(span);
    }
    if let Some(metric) = overrides.metric {
        config = config.metric(metric);
    }
    if let Some(k) = overrides.neighbors {
        config = config.neighbors(k);
    }
    if let Some(days) = overrides.start_date_pad_days {
        config = config.start_date_pad_days(days);
    }
    if let Some(days) = overrides.days_fwd {
        config = config.days_fwd(days);
    }
    if let Some(force) = overrides.force_sequential {
        config = config.force_sequential(force);
    }
    Ok(config)
}

fn load_universe(args: &UniverseArgs) -> Result<MultiPanel> {
    let store = CsvPriceStore::open(&args.prices)
        .with_context(|| format!("loading prices from {}", args.prices.display()))?;
    match &args.tickers {
        Some(path) => {
            let tickers = read_tickers(path)
                .with_context(|| format!("reading ticker list {}", path.display()))?;
            Ok(store.universe().select(&tickers)?)
        }
        None => Ok(store.universe().clone()),
    }
}

/// Engine over the universe restricted to its common start date.
fn aligned_engine(args: &UniverseArgs, config: &LateralConfig) -> Result<LateralEngine> {
    let prices = load_universe(args)?;
    let full = LateralEngine::with_options(prices, config.force_sequential)?;
    let (start, set_by) = full
        .start_date(config.start_date_pad_days)
        .context("universe has no price data")?;
    info!(%start, %set_by, tickers = full.prices().len(), "common start date");

    let aligned = full.prices().between(start, NaiveDate::MAX);
    Ok(LateralEngine::with_options(aligned, config.force_sequential)?)
}

fn run_screen(universe: &UniverseArgs, ledger_path: &Path, config: &LateralConfig) -> Result<()> {
    let ledger = InsiderBuyLedger::open(ledger_path)
        .with_context(|| format!("opening ledger {}", ledger_path.display()))?;
    let records = ledger.insider_buys()?;

    let mut engine = aligned_engine(universe, config)?;
    let start_date = engine.start_date(0).map(|(start, _)| start);
    let distances = engine.distances(config.metric_type())?;

    let outcome = screen(
        &records,
        distances,
        &ScreenConfig {
            k: config.neighbors,
            start_date,
        },
    );
    if !outcome.skipped.is_empty() {
        warn!(count = outcome.skipped.len(), "insider buys without a neighborhood");
    }
    info!(
        ranked = outcome.candidates.len(),
        before_start = outcome.before_start,
        "screening finished"
    );

    let rows: Vec<ScreenRow<'_>> = outcome
        .candidates
        .iter()
        .enumerate()
        .map(|(i, c)| ScreenRow {
            rank: i + 1,
            accession: c.record.accession.as_str(),
            ticker: &c.record.ticker,
            trade_date: c.record.trade_date,
            filing_date: c.record.filing_date,
            insider_types: c.record.insider_types.to_joined(),
            cost_of_trade: c.record.cost_of_trade(),
            tightness: c.tightness(),
            neighbors: &c.neighborhood.neighbors,
        })
        .collect();
    print_json(&rows)
}

/// One Form 4 filing with its archive locations.
#[derive(Debug, Serialize)]
struct FilingRow<'a> {
    #[serde(flatten)]
    filing: &'a FilingRef,
    xml_url: String,
    txt_url: String,
}

fn run_form4(directory: &Path, submissions: &Path, ticker: &str, since: NaiveDate) -> Result<()> {
    let text = std::fs::read_to_string(directory)
        .with_context(|| format!("reading {}", directory.display()))?;
    let cik = CikDirectory::from_json(&text)?.resolve(ticker)?;

    let text = std::fs::read_to_string(submissions)
        .with_context(|| format!("reading {}", submissions.display()))?;
    let filings = recent_form4_filings(&text, ticker, &cik, since)?;
    info!(%ticker, %cik, count = filings.len(), "form 4 filings");

    let rows: Vec<FilingRow<'_>> = filings
        .iter()
        .map(|f| FilingRow {
            filing: f,
            xml_url: f.xml_url(),
            txt_url: f.txt_url(),
        })
        .collect();
    print_json(&rows)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
