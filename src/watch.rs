//! Interactive savings stream.
//!
//! A reader task turns stdin lines into selection updates and publishes them
//! through a `watch` channel; the render loop recomputes on every change and
//! only ever sees the latest selection.

use std::io::Write;

use asterfee::{BaselineMode, SavingsCalculator, Timeframe, TradingMode};
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::watch;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CliError, InputError};
use crate::input::{parse_watch_line, smart_round, WatchUpdate};
use crate::output::{self, OutputFormat, SavingsView};

const MAX_LINE_LENGTH: usize = 1024;

/// The `(volume, mode)` pair the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub volume_usd: f64,
    pub mode: TradingMode,
}

impl Selection {
    pub fn apply(self, update: WatchUpdate) -> Self {
        Self {
            volume_usd: update.volume_usd.unwrap_or(self.volume_usd),
            mode: update.mode.unwrap_or(self.mode),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub timeframe: Timeframe,
    pub baseline: BaselineMode,
    pub max_equivalents: usize,
    pub format: OutputFormat,
}

/// Read updates line by line until EOF or cancellation.
///
/// Unparseable lines are logged and skipped. Volumes are smart-rounded unless
/// `exact` is set.
pub async fn read_updates<R: AsyncRead + Unpin>(
    reader: R,
    tx: watch::Sender<Selection>,
    exact: bool,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    loop {
        tokio::select! {
            line = lines.next() => {
                match line {
                    Some(Ok(line)) => match parse_watch_line(&line) {
                        Ok(mut update) => {
                            if !exact {
                                update.volume_usd = update.volume_usd.map(smart_round);
                            }
                            tx.send_modify(|s| *s = s.apply(update));
                        }
                        Err(InputError::Empty) => {}
                        Err(e) => warn!(error = %e, "ignoring input line"),
                    },
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        debug!("input closed");
                        return Ok(());
                    }
                }
            }
            _ = cancel.cancelled() => {
                debug!("reader cancelled");
                return Ok(());
            }
        }
    }
}

/// Render the current selection, then again on every change.
///
/// Returns the number of frames written once the sender is gone or on
/// cancellation.
pub async fn render_loop<W: Write>(
    calc: &SavingsCalculator,
    mut rx: watch::Receiver<Selection>,
    options: RenderOptions,
    writer: &mut W,
    cancel: CancellationToken,
) -> Result<u64, CliError> {
    let mut buf = String::with_capacity(2048);
    let mut frames = 0u64;

    let current = *rx.borrow_and_update();
    render(calc, current, options, &mut buf, writer)?;
    frames += 1;

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(frames);
                }
                let current = *rx.borrow_and_update();
                render(calc, current, options, &mut buf, writer)?;
                frames += 1;
            }
            _ = cancel.cancelled() => {
                info!(frames, "watch stopped");
                return Ok(frames);
            }
        }
    }
}

fn render<W: Write>(
    calc: &SavingsCalculator,
    selection: Selection,
    options: RenderOptions,
    buf: &mut String,
    writer: &mut W,
) -> Result<(), CliError> {
    let report = calc.compute_savings(selection.volume_usd, selection.mode);
    let view = SavingsView::new(
        calc,
        &report,
        options.timeframe,
        options.baseline,
        options.max_equivalents,
    );
    output::write_savings(&view, options.format, buf, writer)
}

/// Wire stdin-style input to the render loop and run both until input ends
/// or `cancel` fires.
pub async fn run_watch<R, W>(
    calc: &SavingsCalculator,
    initial: Selection,
    reader: R,
    exact: bool,
    options: RenderOptions,
    writer: &mut W,
    cancel: CancellationToken,
) -> Result<u64, CliError>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let (tx, rx) = watch::channel(initial);
    let (read, frames) = tokio::join!(
        read_updates(reader, tx, exact, cancel.clone()),
        render_loop(calc, rx, options, writer, cancel),
    );
    read?;
    frames
}
