//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReportAdapter;
use crate::domain::config::{build_signal_settings, build_trading_system};
use crate::domain::decision::summarize;
use crate::domain::error::SignalError;
use crate::domain::pipeline::run_signal_pipeline;
use crate::domain::rule::{MARKET_TREND, RSI_VALUE};
use crate::domain::variable::FuzzyVariable;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fuzzysignal", about = "Fuzzy-logic Sell/Hold/Buy signals from daily bars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Label every bar of a symbol and write the decisions as JSON
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a single inference for a trend magnitude and RSI value
    Infer {
        #[arg(long, allow_negative_numbers = true)]
        trend: f64,
        #[arg(long)]
        rsi: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also print each rule's firing strength
        #[arg(long)]
        explain: bool,
    },
    /// Build the fuzzy system from a config and report problems
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the active rule base
    Rules {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Signal {
            config,
            code,
            output,
        } => run_signal(&config, code.as_deref(), output),
        Command::Infer {
            trend,
            rsi,
            config,
            explain,
        } => run_infer(trend, rsi, config.as_deref(), explain),
        Command::Validate { config } => run_validate(&config),
        Command::Rules { config } => run_rules(config.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

fn fail(err: &SignalError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SignalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

/// Built-in system when no config file is given.
fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => load_config(p),
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn run_signal(config_path: &Path, code: Option<&str>, output: Option<PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut settings = match build_signal_settings(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    if let Some(c) = code {
        settings.code = c.trim().to_string();
    }

    let system = match build_trading_system(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    info!(
        rules = system.engine().rules().len(),
        rsi_period = settings.rsi_period,
        "trading system built"
    );

    let data_port = CsvAdapter::new(settings.csv_dir.clone());
    let records = match run_signal_pipeline(&data_port, &system, &settings) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let report = JsonReportAdapter::new(output.clone());
    if let Err(e) = report.write(&records) {
        return fail(&e);
    }
    if let Some(path) = &output {
        eprintln!("Decisions written to {}", path.display());
    }

    let summary = summarize(&records);
    eprintln!("\n{}: {} bars labelled", settings.code, summary.total());
    eprintln!("  Sell: {}", summary.sell);
    eprintln!("  Hold: {}", summary.hold);
    eprintln!("  Buy:  {}", summary.buy);
    ExitCode::SUCCESS
}

pub fn run_infer(trend: f64, rsi: f64, config_path: Option<&Path>, explain: bool) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let system = match build_trading_system(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let (strength, decision) = match system.evaluate(trend, rsi) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if explain {
        let inputs = [(MARKET_TREND, trend), (RSI_VALUE, rsi)];
        match system.engine().firing_strengths(&inputs) {
            Ok(strengths) => {
                for (rule, s) in system.engine().rules().iter().zip(strengths) {
                    println!("{:>6.3}  {}", s, rule);
                }
            }
            Err(e) => return fail(&e),
        }
    }

    println!("strength: {:.4}", strength);
    println!("decision: {}", decision);
    ExitCode::SUCCESS
}

fn describe_variable(variable: &FuzzyVariable) {
    let u = &variable.universe;
    eprintln!(
        "  {} [{}, {}] step {}: {} terms",
        variable.name,
        u.min,
        u.max,
        u.step,
        variable.term_count()
    );
    for (term, mf) in variable.terms() {
        eprintln!("    {} = {}", term, mf);
    }
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let system = match build_trading_system(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    eprintln!("\nVariables:");
    for variable in system.engine().antecedents() {
        describe_variable(variable);
    }
    describe_variable(system.engine().consequent());

    let thresholds = system.thresholds();
    eprintln!(
        "\nDecision: Sell below {}, Buy at or above {}",
        thresholds.sell_below, thresholds.buy_at_or_above
    );
    eprintln!("Trend threshold: {}", system.classifier().threshold_pct);
    eprintln!("Rules: {}", system.engine().rules().len());

    if config.get_string("data", "code").is_some() {
        match build_signal_settings(&config) {
            Ok(s) => eprintln!(
                "Data: {} from {} (RSI period {})",
                s.code,
                s.csv_dir.display(),
                s.rsi_period
            ),
            Err(e) => return fail(&e),
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn run_rules(config_path: Option<&Path>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let system = match build_trading_system(&config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    for (i, rule) in system.engine().rules().iter().enumerate() {
        println!("{:>2}. {}", i + 1, rule);
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let settings = match build_signal_settings(&config) {
            Ok(s) => s,
            Err(e) => return fail(&e),
        };
        let system = match build_trading_system(&config) {
            Ok(s) => s,
            Err(e) => return fail(&e),
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(e) => {
                return fail(&SignalError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("'{}': {}", listen, e),
                });
            }
        };

        let state = AppState {
            data_port: Arc::new(CsvAdapter::new(settings.csv_dir.clone())),
            system: Arc::new(system),
            settings,
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(&SignalError::Io(e)),
        };

        eprintln!("Starting web server on {}", addr);
        let served: std::io::Result<()> = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "listening");
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&SignalError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
