//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::chart_csv::write_chart_csv;
use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::engine::compute_chart_indicators;
use crate::domain::error::TickchartError;
use crate::domain::movement::session_movement;
use crate::domain::price::PriceSeries;
use crate::domain::session::resolve_session_window;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "tickchart", about = "Chart data preparation for traded instruments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute chart indicators over a daily history window
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve the latest trading session and its predecessor
    Session {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        /// Reference day (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the stored data range for an instrument
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Chart {
            config,
            code,
            start,
            end,
            output,
        } => run_chart(&config, code.as_deref(), start, end, output.as_ref()),
        Command::Session { config, code, date } => run_session(&config, code.as_deref(), date),
        Command::Info { config, code } => run_info(&config, code.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickchartError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Flag wins over `[instrument] code`; either way the code is uppercased.
pub fn resolve_code(code_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    if let Some(code) = code_override {
        return Some(code.trim().to_uppercase());
    }
    config
        .get_string("instrument", "code")
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
}

/// Resolve the chart window from flags and `[chart]` config keys.
pub fn build_chart_range(
    config: &dyn ConfigPort,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), TickchartError> {
    let start = match start {
        Some(date) => date,
        None => config.get_date("chart", "start_date")?.ok_or_else(|| {
            TickchartError::ConfigMissing {
                section: "chart".into(),
                key: "start_date".into(),
            }
        })?,
    };
    let end = match end {
        Some(date) => date,
        None => config.get_date("chart", "end_date")?.ok_or_else(|| {
            TickchartError::ConfigMissing {
                section: "chart".into(),
                key: "end_date".into(),
            }
        })?,
    };
    if end <= start {
        return Err(TickchartError::ConfigInvalid {
            section: "chart".into(),
            key: "end_date".into(),
            reason: "end_date must fall after start_date".into(),
        });
    }
    Ok((start, end))
}

fn run_chart(
    config_path: &PathBuf,
    code_override: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let Some(code) = resolve_code(code_override, &adapter) else {
        eprintln!("error: no instrument code configured (use --code or set [instrument] code)");
        return ExitCode::from(2);
    };

    let (start, end) = match build_chart_range(&adapter, start, end) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let port = match CsvPriceAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Fetching {} daily bars, {} to {}", code, start, end);
    let series = match port.fetch_daily(&code, start, end) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if series.is_empty() {
        let err = TickchartError::NoData { code };
        eprintln!("error: {err}");
        return (&err).into();
    }

    let indicators = match compute_chart_indicators(&series) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = match output_path {
        Some(path) => File::create(path)
            .map_err(TickchartError::from)
            .and_then(|file| write_chart_csv(file, &series, &indicators)),
        None => write_chart_csv(io::stdout().lock(), &series, &indicators),
    };

    match result {
        Ok(()) => {
            eprintln!("Wrote {} rows for {}", series.len(), series.code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_session(
    config_path: &PathBuf,
    code_override: Option<&str>,
    date_override: Option<NaiveDate>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let Some(code) = resolve_code(code_override, &adapter) else {
        eprintln!("error: no instrument code configured (use --code or set [instrument] code)");
        return ExitCode::from(2);
    };

    let reference = match date_override {
        Some(date) => date,
        None => match adapter.get_date("session", "reference_date") {
            Ok(Some(date)) => date,
            Ok(None) => chrono::Local::now().date_naive(),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    let port = match CsvPriceAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Resolving session for {} as of {}", code, reference);
    let window = resolve_session_window(&port, &code, reference);

    if !window.is_resolved() {
        let err = TickchartError::NoData { code };
        eprintln!("error: {err}");
        return (&err).into();
    }

    print_session("current", &window.current);
    if window.previous.is_empty() {
        eprintln!("no previous session within the probe window");
    } else {
        print_session("previous", &window.previous);
    }

    if let (Some(movement), Some(last), Some(benchmark)) = (
        session_movement(&window),
        window.current.last_close(),
        window.previous.last_close(),
    ) {
        println!(
            "movement: {} ({:+.2} vs previous close {:.2})",
            movement,
            last - benchmark,
            benchmark
        );
    }

    ExitCode::SUCCESS
}

fn print_session(label: &str, session: &PriceSeries) {
    if let (Some(first), Some(last)) = (session.bars.first(), session.bars.last()) {
        println!(
            "{} session {}: {} bars, open {:.2}, last {:.2}",
            label,
            first.day(),
            session.len(),
            first.open,
            last.close
        );
    }
}

fn run_info(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let Some(code) = resolve_code(code_override, &adapter) else {
        eprintln!("error: no instrument code configured (use --code or set [instrument] code)");
        return ExitCode::from(2);
    };

    let port = match CsvPriceAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match port.data_range(&code) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", code, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
