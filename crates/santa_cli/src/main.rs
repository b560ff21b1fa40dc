//! `santa` command-line trigger.
//!
//! # Responsibility
//! - Derive the current period from the local calendar and hand it to core.
//! - Print results for operators; all decisions stay in `santa_core`.

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use santa_core::{
    default_log_level, init_logging, load_config, EnsureOutcome, JsonFileStore, ParticipantId,
    Period, PeriodService, SantaConfig,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "santa")]
#[command(about = "Yearly gift-exchange draw")]
struct Cli {
    /// JSON config with exclusion window, permanent exclusions and store path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the store path from the config.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw the period if it has no assignment yet.
    Ensure {
        #[arg(long)]
        period: Option<Period>,
    },
    /// Ensure the period, then print one participant's recipient.
    Recipient {
        participant: ParticipantId,
        #[arg(long)]
        period: Option<Period>,
    },
    /// Print the exclusion set each giver would have for the next draw.
    Exclusions,
    /// Simulate upcoming periods without writing the store.
    Forecast {
        #[arg(long)]
        start: Option<Period>,
        #[arg(long, default_value_t = 3)]
        years: usize,
    },
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    match &cli.command {
        Command::Ensure { period } => {
            let period = resolve_period(*period)?;
            match open_service(&cli)?.ensure_period_assigned(period)? {
                EnsureOutcome::AlreadyAssigned => println!("{period}: already assigned"),
                EnsureOutcome::Committed(assignment) => {
                    println!("{period}: assigned {} participants", assignment.len());
                }
            }
        }
        Command::Recipient {
            participant,
            period,
        } => {
            let period = resolve_period(*period)?;
            let service = open_service(&cli)?;
            service.ensure_period_assigned(period)?;
            let recipient = service.recipient_for(period, participant)?;
            println!("{period}: {participant} gives to {}", recipient.display);
        }
        Command::Exclusions => {
            let table = open_service(&cli)?.exclusions()?;
            for giver in table.roster() {
                let mut excluded: Vec<&str> = table
                    .excluded_for(giver)
                    .into_iter()
                    .flatten()
                    .map(ParticipantId::as_str)
                    .collect();
                excluded.sort_unstable();
                println!(
                    "{giver}: {} candidates, excludes [{}]",
                    table.candidate_count(giver),
                    excluded.join(", ")
                );
            }
        }
        Command::Forecast { start, years } => {
            let start = match start {
                Some(start) => *start,
                None => {
                    let current = current_period()?;
                    current
                        .next()
                        .ok_or_else(|| anyhow!("no period follows {current}"))?
                }
            };
            let forecast = open_service(&cli)?.forecast(start, *years, &mut rand::thread_rng())?;
            for (period, assignment) in forecast {
                println!("{period}:");
                for (giver, receiver) in &assignment {
                    println!("  {giver} -> {receiver}");
                }
            }
        }
        Command::Version => {
            println!("santa_core version={}", santa_core::core_version());
        }
    }

    Ok(())
}

fn open_service(cli: &Cli) -> Result<PeriodService<JsonFileStore>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SantaConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }

    let store = JsonFileStore::new(config.store_path.clone());
    Ok(PeriodService::new(store, config))
}

fn resolve_period(period: Option<Period>) -> Result<Period> {
    match period {
        Some(period) => Ok(period),
        None => current_period(),
    }
}

fn current_period() -> Result<Period> {
    let year = Local::now().year();
    u32::try_from(year)
        .map(Period::new)
        .map_err(|_| anyhow!("local calendar year {year} is not a valid period"))
}
