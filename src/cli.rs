//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console::{self, ConsoleJournal};
use crate::adapters::csv_export;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store::JsonFileStore;
use crate::domain::config::JournalConfig;
use crate::domain::error::JournalError;
use crate::domain::filter::TradeFilter;
use crate::domain::metrics::Metrics;
use crate::logging;
use crate::ports::trade_store::TradeStore;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Personal trading journal", version)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu over the journal file
    Journal {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print every recorded trade
    List {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print summary statistics
    Stats {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Write the journal as CSV, optionally filtered
    Export {
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long)]
        strategy: Vec<String>,
        #[arg(long)]
        market: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match build_journal_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    logging::init(&config);

    let result = match cli.command {
        Command::Journal { file } => run_journal(&config, file.as_deref()),
        Command::List { file } => run_list(&config, file.as_deref()),
        Command::Stats { file } => run_stats(&config, file.as_deref()),
        Command::Export {
            file,
            strategy,
            market,
            output,
        } => run_export(&config, file.as_deref(), &strategy, &market, output.as_deref()),
        Command::Serve { listen } => run_serve(&config, listen),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, JournalError> {
    FileConfigAdapter::from_file(path)
}

/// Resolves settings from the optional INI file, falling back to defaults.
pub fn build_journal_config(path: Option<&Path>) -> Result<JournalConfig, JournalError> {
    match path {
        Some(p) => JournalConfig::from_config(&load_config(p)?),
        None => JournalConfig::from_config(&FileConfigAdapter::empty()),
    }
}

/// Opens the journal named on the command line, or the configured one.
pub fn open_store(config: &JournalConfig, file: Option<&Path>) -> Result<JsonFileStore, JournalError> {
    let path = file.unwrap_or(config.journal_path.as_path());
    Ok(JsonFileStore::open(path)?.with_indent(config.json_indent))
}

/// Filter built from repeated `--strategy` / `--market` flags.
pub fn export_filter(strategies: &[String], markets: &[String]) -> Result<TradeFilter, JournalError> {
    let params = strategies
        .iter()
        .map(|s| ("strategy", s.as_str()))
        .chain(markets.iter().map(|m| ("market", m.as_str())));
    TradeFilter::from_params(params)
}

fn run_journal(config: &JournalConfig, file: Option<&Path>) -> Result<(), JournalError> {
    let mut store = open_store(config, file)?;
    tracing::info!(path = %store.path().display(), trades = store.len(), "journal opened");
    let stdin = io::stdin();
    let stdout = io::stdout();
    ConsoleJournal::new(&mut store, stdin.lock(), stdout.lock()).run()
}

fn run_list(config: &JournalConfig, file: Option<&Path>) -> Result<(), JournalError> {
    let store = open_store(config, file)?;
    console::write_trade_list(store.all(), &mut io::stdout().lock())?;
    Ok(())
}

fn run_stats(config: &JournalConfig, file: Option<&Path>) -> Result<(), JournalError> {
    let store = open_store(config, file)?;
    console::write_stats(&Metrics::compute(store.all()), &mut io::stdout().lock())?;
    Ok(())
}

fn run_export(
    config: &JournalConfig,
    file: Option<&Path>,
    strategies: &[String],
    markets: &[String],
    output: Option<&Path>,
) -> Result<(), JournalError> {
    let filter = export_filter(strategies, markets)?;
    let store = open_store(config, file)?;
    let visible = filter.apply(store.all());

    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            csv_export::write_csv(&visible, &mut out)?;
            out.flush()?;
            eprintln!("Exported {} trades to {}", visible.len(), path.display());
        }
        None => csv_export::write_csv(&visible, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(feature = "web")]
fn run_serve(config: &JournalConfig, listen: Option<SocketAddr>) -> Result<(), JournalError> {
    use crate::adapters::chart_svg::ChartSize;
    use crate::adapters::web::{AppState, DashboardSession, build_router};

    let addr = listen.unwrap_or(config.listen);
    let chart_size = ChartSize {
        width: config.chart_width,
        height: config.chart_height,
    };
    let router = build_router(AppState::new(DashboardSession::new(), chart_size));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "dashboard listening");
        eprintln!("Dashboard running at http://{addr}");
        axum::serve(listener, router).await?;
        Ok::<(), JournalError>(())
    })
}

#[cfg(not(feature = "web"))]
fn run_serve(_config: &JournalConfig, _listen: Option<SocketAddr>) -> Result<(), JournalError> {
    Err(JournalError::ConfigInvalid {
        section: "web".to_string(),
        key: "feature".to_string(),
        reason: "tradelog was built without the web feature".to_string(),
    })
}
