//! CLI definition and dispatch.

use chrono::{Duration, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_export;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::engine::{EngineConfig, PaperEngine};
use crate::domain::error::AdaptraderError;
use crate::domain::ledger::TradeLedger;
use crate::domain::scorer;
use crate::domain::selector::DynamicSelector;
use crate::domain::shell::STRATEGY_SPECS;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "adaptrader", about = "Multi-strategy paper trading orchestrator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run paper-trading cycles across the strategy roster
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 1)]
        cycles: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print per-strategy performance summaries
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Print watch-list recommendations for a strategy
    Recommend {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        strategy: String,
    },
    /// Export the recorded trade history to CSV
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            cycles,
            seed,
        } => run_simulate(&config, cycles, seed),
        Command::Report { config, strategy } => run_report(&config, strategy.as_deref()),
        Command::Recommend { config, strategy } => run_recommend(&config, &strategy),
        Command::Export {
            config,
            output,
            symbols,
        } => run_export(&config, &output, symbols.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AdaptraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_ledger(config: &dyn ConfigPort) -> Result<TradeLedger, ExitCode> {
    let store = JsonStoreAdapter::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(TradeLedger::open(Box::new(store)))
}

pub fn build_engine_config(config: &dyn ConfigPort, seed_override: Option<u64>) -> EngineConfig {
    let defaults = EngineConfig::default();
    EngineConfig {
        starting_capital: config.get_double(
            "engine",
            "starting_capital",
            defaults.starting_capital,
        ),
        seed: seed_override
            .unwrap_or_else(|| config.get_int("engine", "seed", defaults.seed as i64) as u64),
    }
}

fn validated_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = load_config(path)?;
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    Ok(adapter)
}

fn run_simulate(config_path: &PathBuf, cycles: u32, seed: Option<u64>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut ledger = match open_ledger(&adapter) {
        Ok(l) => l,
        Err(code) => return code,
    };
    let engine_config = build_engine_config(&adapter, seed);

    let start = Utc::now().naive_utc();
    let mut engine = PaperEngine::new(&ledger, &engine_config, start);

    eprintln!(
        "Running {} cycle(s) across {} strategies (seed {})",
        cycles,
        STRATEGY_SPECS.len(),
        engine_config.seed,
    );

    for cycle in 0..cycles {
        // Each cycle advances the simulated clock an hour, so long runs
        // cross the daily optimization gate.
        let now: NaiveDateTime = start + Duration::hours(cycle as i64);
        match engine.run_cycle(&mut ledger, now) {
            Ok(report) => {
                eprintln!(
                    "cycle {}: {} signals, {} trades, {} watch lists changed",
                    cycle + 1,
                    report.signals,
                    report.trades,
                    report.watch_lists_changed,
                );
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!(
        "\nFinal account value: ${:.2} ({} trades on record)",
        engine.account_value(),
        ledger.trades().len(),
    );
    ExitCode::SUCCESS
}

fn run_report(config_path: &PathBuf, strategy: Option<&str>) -> ExitCode {
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let ledger = match open_ledger(&adapter) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let names: Vec<&str> = match strategy {
        Some(name) => vec![name],
        None => STRATEGY_SPECS.iter().map(|s| s.name).collect(),
    };

    for name in names {
        match scorer::strategy_summary(&ledger, name) {
            Some(summary) => {
                println!("{name}:");
                println!("  trades:       {}", summary.total_trades);
                println!("  win rate:     {:.1}%", summary.win_rate * 100.0);
                println!("  avg pnl:      {:.3}%", summary.avg_pnl_percent * 100.0);
                println!("  total pnl:    {:.3}%", summary.total_pnl_percent * 100.0);
                println!("  active names: {}", summary.active_stocks);
                if let Some(best) = &summary.best_stock {
                    println!("  best name:    {best}");
                }
            }
            None => println!("{name}: no trades recorded"),
        }
    }

    ExitCode::SUCCESS
}

fn run_recommend(config_path: &PathBuf, strategy: &str) -> ExitCode {
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let ledger = match open_ledger(&adapter) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let engine_config = build_engine_config(&adapter, None);
    let mut selector = DynamicSelector::new(engine_config.seed);

    let target = selector.default_target(strategy);
    let phase = selector.selection_phase(&ledger, strategy, target);
    let recs = selector.recommendations(&ledger, strategy);

    println!("{strategy} ({phase}, data quality {})", recs.data_quality);
    println!("recommended: {}", recs.recommended.join(", "));

    if !recs.performance.is_empty() {
        println!("performance:");
        for (symbol, p) in &recs.performance {
            println!(
                "  {symbol}: {} trades, {:.1}% win rate, score {:.5}",
                p.total_trades,
                p.win_rate * 100.0,
                p.performance_score,
            );
        }
    }

    ExitCode::SUCCESS
}

fn run_export(config_path: &PathBuf, output: &PathBuf, symbols: Option<&str>) -> ExitCode {
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let ledger = match open_ledger(&adapter) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let filter = match symbols.map(parse_symbols).transpose() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: invalid --symbols list: {e}");
            return ExitCode::from(2);
        }
    };

    let trades: Vec<_> = ledger
        .trades()
        .iter()
        .filter(|t| {
            filter
                .as_ref()
                .map_or(true, |symbols| symbols.contains(&t.symbol))
        })
        .collect();

    match csv_export::export_to_path(output, &trades) {
        Ok(()) => {
            eprintln!("Wrote {} trade(s) to {}", trades.len(), output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match validated_config(config_path) {
        Ok(_) => {
            eprintln!("Config validated successfully");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
