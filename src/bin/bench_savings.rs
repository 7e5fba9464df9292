//! Synthetic microbenchmark: full savings recompute over the builtin schedule
//! Sweeps a fixed set of volumes in both modes, 1M recomputes in total

use std::time::Instant;

use asterfee::{select_baseline_savings, BaselineMode, SavingsCalculator, Timeframe, TradingMode};

const ITERATIONS: u64 = 1_000_000;

const VOLUMES: [f64; 8] = [
    0.0,
    50_000.0,
    1_000_000.0,
    5_000_000.0,
    25_000_000.0,
    100_000_000.0,
    750_000_000.0,
    5_000_000_000.0,
];

fn main() {
    let calc = match SavingsCalculator::builtin() {
        Ok(calc) => calc,
        Err(e) => {
            eprintln!("builtin schedule rejected: {e}");
            std::process::exit(1);
        }
    };

    // Warm up
    for i in 0..10_000 {
        let report = calc.compute_savings(VOLUMES[i % VOLUMES.len()], TradingMode::Pro);
        std::hint::black_box(report);
    }

    let t0 = Instant::now();

    let mut sum: f64 = 0.0;
    for i in 0..ITERATIONS as usize {
        let volume = VOLUMES[i % VOLUMES.len()];
        let mode = if i % 2 == 0 {
            TradingMode::Simple
        } else {
            TradingMode::Pro
        };
        let report = calc.compute_savings(std::hint::black_box(volume), mode);
        sum += select_baseline_savings(&report.results, Timeframe::Yearly, BaselineMode::Closest);
    }

    // Prevent DCE
    std::hint::black_box(sum);

    let elapsed = t0.elapsed();
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let per_iter_ns = elapsed.as_nanos() as f64 / ITERATIONS as f64;
    let throughput = ITERATIONS as f64 / elapsed.as_secs_f64();

    println!("Savings recompute benchmark");
    println!("  Competitors: {}", calc.competitors().len());
    println!("  Iterations: {}", format_with_commas(ITERATIONS));
    println!("  Total time: {:.1} ms", elapsed_ms);
    println!("  Per iteration: {:.0} ns", per_iter_ns);
    println!("  Throughput: {} ops/sec", format_with_commas(throughput as u64));
    println!("  (sum={} to prevent DCE)", sum);
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
