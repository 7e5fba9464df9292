use std::io::Write;

use asterfee::{
    best_savings, select_baseline_savings, BaselineMode, CompetitorCost, Equivalent,
    PlatformFeeDetail, ResolvedTier, SavingsCalculator, SavingsReport, SavingsResult, Timeframe,
};
use serde::Serialize;

use crate::error::CliError;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned table with whole-dollar amounts.
    Text,
    /// One tab-separated row per line, raw floats.
    Tsv,
    /// One JSON document per line.
    Json,
}

impl OutputFormat {
    pub fn from_flags(json: bool, tsv: bool) -> Self {
        if json {
            OutputFormat::Json
        } else if tsv {
            OutputFormat::Tsv
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything one savings render needs: the report plus the figures derived from it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsView<'a> {
    pub platform_name: &'a str,
    #[serde(flatten)]
    pub report: &'a SavingsReport,
    pub timeframe: Timeframe,
    pub baseline_mode: BaselineMode,
    pub baseline_savings_usd: f64,
    pub best: Option<&'a SavingsResult>,
    pub equivalents: Vec<Equivalent>,
}

impl<'a> SavingsView<'a> {
    /// Derive baseline, best competitor and equivalents for a report.
    pub fn new(
        calc: &'a SavingsCalculator,
        report: &'a SavingsReport,
        timeframe: Timeframe,
        baseline_mode: BaselineMode,
        max_equivalents: usize,
    ) -> Self {
        let baseline_savings_usd =
            select_baseline_savings(&report.results, timeframe, baseline_mode);
        Self {
            platform_name: calc.platform_name(),
            report,
            timeframe,
            baseline_mode,
            baseline_savings_usd,
            best: best_savings(&report.results, timeframe),
            equivalents: calc.compute_equivalents(baseline_savings_usd, max_equivalents),
        }
    }
}

/// Write a savings view and flush.
pub fn write_savings<W: Write>(
    view: &SavingsView<'_>,
    format: OutputFormat,
    buf: &mut String,
    writer: &mut W,
) -> Result<(), CliError> {
    buf.clear();
    match format {
        OutputFormat::Json => {
            buf.push_str(&serde_json::to_string(view)?);
            buf.push('\n');
        }
        OutputFormat::Tsv => {
            // competitor \t cost \t monthly \t yearly \t lifetime \t percentage
            for r in &view.report.results {
                buf.push_str(&r.competitor_name);
                for val in [
                    r.competitor_cost_usd,
                    r.monthly_savings_usd,
                    r.yearly_savings_usd,
                    r.lifetime_savings_usd,
                    r.savings_percentage,
                ] {
                    buf.push('\t');
                    format_f64(buf, val);
                }
                buf.push('\n');
            }
        }
        OutputFormat::Text => render_savings_text(view, buf),
    }
    writer.write_all(buf.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn render_savings_text(view: &SavingsView<'_>, buf: &mut String) {
    let report = view.report;
    let platform = &report.platform;

    buf.push_str(view.platform_name);
    buf.push(' ');
    buf.push_str(&platform.mode.to_string());
    buf.push_str(" at ");
    push_usd(buf, report.monthly_volume_usd);
    buf.push_str(" monthly volume\n");

    buf.push_str("Platform fees: ");
    push_usd(buf, platform.total_fees_usd);
    buf.push_str("/month");
    match &platform.detail {
        PlatformFeeDetail::Simple { .. } => {}
        PlatformFeeDetail::Pro {
            vip_tier,
            market_maker_tier,
            ..
        } => {
            buf.push_str(" (");
            buf.push_str(vip_tier);
            if let Some(mm) = market_maker_tier {
                buf.push_str(", ");
                buf.push_str(mm);
            }
            buf.push(')');
        }
    }
    buf.push_str("\n\n");

    let width = report
        .results
        .iter()
        .map(|r| r.competitor_name.len())
        .max()
        .unwrap_or(0)
        .max("Competitor".len());

    push_padded(buf, "Competitor", width);
    buf.push_str("  ");
    push_right(buf, "Cost/month", 14);
    buf.push_str("  ");
    push_right(buf, &format!("Savings ({})", view.timeframe), 18);
    buf.push_str("  ");
    push_right(buf, "%", 7);
    buf.push('\n');

    for r in &report.results {
        push_padded(buf, &r.competitor_name, width);
        buf.push_str("  ");
        push_right(buf, &format_usd(r.competitor_cost_usd), 14);
        buf.push_str("  ");
        push_right(buf, &format_usd(r.savings_for(view.timeframe)), 18);
        buf.push_str("  ");
        push_right(buf, &format_percent(r.savings_percentage), 7);
        buf.push('\n');
    }

    buf.push_str("\nVenues\n");
    for c in &report.competitors {
        push_venue_details(buf, c);
    }

    buf.push_str("\nBaseline (");
    buf.push_str(&view.baseline_mode.to_string());
    buf.push_str("): ");
    push_usd(buf, view.baseline_savings_usd);
    buf.push(' ');
    buf.push_str(&view.timeframe.to_string());
    buf.push('\n');

    if let Some(best) = view.best {
        buf.push_str("Best: ");
        buf.push_str(&best.competitor_name);
        buf.push(' ');
        push_usd(buf, best.savings_for(view.timeframe));
        buf.push('\n');
    }

    if !view.equivalents.is_empty() {
        buf.push_str("That buys: ");
        push_equivalents_inline(buf, &view.equivalents);
        buf.push('\n');
    }
}

/// Write a list of equivalents and flush.
pub fn write_equivalents<W: Write>(
    amount_usd: f64,
    equivalents: &[Equivalent],
    format: OutputFormat,
    buf: &mut String,
    writer: &mut W,
) -> Result<(), CliError> {
    buf.clear();
    match format {
        OutputFormat::Json => {
            buf.push_str(&serde_json::to_string(equivalents)?);
            buf.push('\n');
        }
        OutputFormat::Tsv => {
            for e in equivalents {
                buf.push_str(&e.item.id);
                buf.push('\t');
                format_f64(buf, e.count);
                buf.push('\t');
                format_f64(buf, e.item.unit_price_usd);
                buf.push('\n');
            }
        }
        OutputFormat::Text => {
            push_usd(buf, amount_usd);
            if equivalents.is_empty() {
                buf.push_str(" does not buy anything in the catalog\n");
            } else {
                buf.push_str(" buys: ");
                push_equivalents_inline(buf, equivalents);
                buf.push('\n');
            }
        }
    }
    writer.write_all(buf.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write resolved tiers and flush.
pub fn write_tiers<W: Write>(
    tiers: &[ResolvedTier],
    format: OutputFormat,
    buf: &mut String,
    writer: &mut W,
) -> Result<(), CliError> {
    buf.clear();
    match format {
        OutputFormat::Json => {
            buf.push_str(&serde_json::to_string(tiers)?);
            buf.push('\n');
        }
        OutputFormat::Tsv => {
            // venue \t basis \t effective volume \t tier ("-" when none)
            for t in tiers {
                buf.push_str(&t.venue);
                buf.push('\t');
                buf.push_str(&t.basis.to_string());
                buf.push('\t');
                format_f64(buf, t.effective_volume_usd);
                buf.push('\t');
                buf.push_str(t.tier.as_deref().unwrap_or("-"));
                buf.push('\n');
            }
        }
        OutputFormat::Text => {
            let width = tiers.iter().map(|t| t.venue.len()).max().unwrap_or(0);
            for t in tiers {
                push_padded(buf, &t.venue, width);
                buf.push_str("  ");
                buf.push_str(&t.basis.to_string());
                buf.push_str("  ");
                push_right(buf, &format_usd(t.effective_volume_usd), 16);
                buf.push_str("  ");
                buf.push_str(t.tier.as_deref().unwrap_or("none"));
                buf.push('\n');
            }
        }
    }
    writer.write_all(buf.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// `  GMX: description (maker 0.050%, taker 0.070%, bridge $20/month)`
fn push_venue_details(buf: &mut String, cost: &CompetitorCost) {
    buf.push_str("  ");
    buf.push_str(&cost.name);
    if !cost.description.is_empty() {
        buf.push_str(": ");
        buf.push_str(&cost.description);
    }
    buf.push_str(" (");
    if let Some(maker) = cost.flat_maker_fee {
        buf.push_str(&format!("maker {:.3}%, ", maker * 100.0));
    }
    if let Some(taker) = cost.flat_taker_fee {
        buf.push_str(&format!("taker {:.3}%, ", taker * 100.0));
    }
    buf.push_str("bridge ");
    push_usd(buf, cost.bridge_cost_usd);
    buf.push_str("/month)\n");
}

fn push_equivalents_inline(buf: &mut String, equivalents: &[Equivalent]) {
    for (i, e) in equivalents.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        buf.push_str(&format!("{:.1} x {}", e.count, e.item.label));
    }
}

fn push_padded(buf: &mut String, s: &str, width: usize) {
    buf.push_str(s);
    for _ in s.len()..width {
        buf.push(' ');
    }
}

fn push_right(buf: &mut String, s: &str, width: usize) {
    for _ in s.len()..width {
        buf.push(' ');
    }
    buf.push_str(s);
}

/// Fast f64 formatting via `ryu`.
fn format_f64(buf: &mut String, val: f64) {
    let mut b = ryu::Buffer::new();
    buf.push_str(b.format(val));
}

/// Whole US dollars with thousands separators, e.g. `-$1,234,568`.
pub fn format_usd(val: f64) -> String {
    let mut out = String::with_capacity(16);
    push_usd(&mut out, val);
    out
}

fn push_usd(buf: &mut String, val: f64) {
    let rounded = val.round();
    if rounded < 0.0 {
        buf.push('-');
    }
    buf.push('$');
    push_grouped(buf, rounded.abs() as u64);
}

fn push_grouped(buf: &mut String, val: u64) {
    let digits = val.to_string();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            buf.push(',');
        }
        buf.push(c);
    }
}

/// One decimal place, e.g. `42.5%`.
pub fn format_percent(val: f64) -> String {
    format!("{val:.1}%")
}
