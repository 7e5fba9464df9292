mod cli;
mod config;
mod error;
mod input;
mod output;
mod watch;

use std::io::{self, BufWriter, Write};

use asterfee::SavingsCalculator;
use clap::Parser;
use cli::Command;
use error::CliError;
use output::{OutputFormat, SavingsView};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    let path = config::schedule_path(cli.schedule);
    let calc = match config::load_schedule(path.as_deref())
        .and_then(|schedule| SavingsCalculator::new(schedule).map_err(CliError::from))
    {
        Ok(calc) => calc,
        Err(e) => {
            tracing::error!(error = %e, "invalid fee schedule");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &calc).await {
        tracing::error!(error = %e, "aster-calc failed");
        std::process::exit(1);
    }

    // A pending stdin read in watch mode would otherwise hold runtime shutdown.
    std::process::exit(0);
}

async fn run(command: Command, calc: &SavingsCalculator) -> Result<(), CliError> {
    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    let mut buf = String::with_capacity(2048);

    match command {
        Command::Savings(args) => {
            let volume = if args.exact {
                args.volume
            } else {
                input::smart_round(args.volume)
            };
            info!(volume, mode = %args.mode, "computing savings");

            let report = calc.compute_savings(volume, args.mode);
            let view = SavingsView::new(
                calc,
                &report,
                args.timeframe,
                args.baseline,
                args.equivalents,
            );
            let format = OutputFormat::from_flags(args.format.json, args.format.tsv);
            output::write_savings(&view, format, &mut buf, &mut writer)?;
        }

        Command::Equivalents(args) => {
            let equivalents = calc.compute_equivalents(args.amount, args.max);
            let format = OutputFormat::from_flags(args.format.json, args.format.tsv);
            output::write_equivalents(args.amount, &equivalents, format, &mut buf, &mut writer)?;
        }

        Command::Tiers(args) => {
            let tiers = calc.resolved_tiers(args.volume);
            let format = OutputFormat::from_flags(args.format.json, args.format.tsv);
            output::write_tiers(&tiers, format, &mut buf, &mut writer)?;
        }

        Command::Watch(args) => {
            let cancel = setup_signal_handlers();
            let initial = watch::Selection {
                volume_usd: if args.exact {
                    args.volume
                } else {
                    input::smart_round(args.volume)
                },
                mode: args.mode,
            };
            let options = watch::RenderOptions {
                timeframe: args.timeframe,
                baseline: args.baseline,
                max_equivalents: args.equivalents,
                format: OutputFormat::from_flags(args.format.json, args.format.tsv),
            };

            info!(volume = initial.volume_usd, mode = %initial.mode, "watch starting");
            let frames = watch::run_watch(
                calc,
                initial,
                tokio::io::stdin(),
                args.exact,
                options,
                &mut writer,
                cancel,
            )
            .await?;
            info!(frames, "watch finished");
        }

        Command::Schedule => {
            writer.write_all(calc.schedule().to_json_pretty()?.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
    }

    Ok(())
}

/// Cancel on SIGINT, and SIGTERM on unix.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("received SIGTERM, shutting down");
                    cancel_clone.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "failed to register SIGTERM handler"),
            }
        });
    }

    cancel
}
