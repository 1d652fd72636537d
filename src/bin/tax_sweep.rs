//! Dense sweep comparing the full and fast bracket evaluators
//!
//! Usage: cargo run --release --bin tax_sweep -- [--bracket data/2021/single_tax.csv]
//!
//! Outputs amount,tax,fast_tax per sample and reports the worst deviation.

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use retire_sim::tax::{load_tax_bracket, presets, TaxBracket};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Sweep amounts through tax and fast_tax")]
struct Args {
    /// Bracket CSV; defaults to the built-in 2021 single-filer table
    #[arg(long)]
    bracket: Option<PathBuf>,
    #[arg(long, default_value_t = 0.0)]
    deduction: f64,
    #[arg(long, default_value_t = 0.0)]
    margin: f64,
    /// Largest amount swept
    #[arg(long, default_value_t = 1_000_000.0)]
    max_amount: f64,
    #[arg(long, default_value_t = 5_000_000)]
    samples: usize,
    #[arg(long, default_value = "tax_sweep_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    amount: f64,
    tax: f64,
    fast_tax: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let bracket: TaxBracket = match &args.bracket {
        Some(path) => load_tax_bracket(path)
            .with_context(|| format!("failed to load bracket from {}", path.display()))?,
        None => presets::single_2021(),
    };

    let samples = args.samples.max(2);
    let step = args.max_amount / (samples - 1) as f64;

    println!("Sweeping {} amounts from $0 to ${:.2}...", samples, args.max_amount);
    let start = Instant::now();

    // Each worker owns its own copy of the bracket
    let results: Vec<Sample> = (0..samples)
        .into_par_iter()
        .map_init(
            || bracket.clone(),
            |local, i| {
                let amount = i as f64 * step;
                Sample {
                    amount,
                    tax: local.tax(amount, args.deduction, args.margin).tax_paid,
                    fast_tax: local.fast_tax(amount, args.deduction, args.margin),
                }
            },
        )
        .collect();

    let elapsed = start.elapsed();
    println!(
        "Sweep complete in {:?} ({:?}/sample)",
        elapsed,
        elapsed / samples as u32
    );

    let worst = results
        .iter()
        .max_by(|a, b| {
            (a.tax - a.fast_tax)
                .abs()
                .total_cmp(&(b.tax - b.fast_tax).abs())
        })
        .copied();

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Amount,Tax,FastTax")?;
    for sample in &results {
        writeln!(writer, "{:.2},{:.6},{:.6}", sample.amount, sample.tax, sample.fast_tax)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    if let Some(worst) = worst {
        println!(
            "Max |tax - fast_tax| = {:.3e} at ${:.2}",
            (worst.tax - worst.fast_tax).abs(),
            worst.amount
        );
    }
    Ok(())
}
