//! Retirement Sim CLI
//!
//! Command-line interface for evaluating tax brackets and solving drawdowns

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use retire_sim::drawdown::{DrawdownMethod, FixedPointOptions, SecantOptions};
use retire_sim::scenario::{DrawdownConfig, ScenarioRunner};
use retire_sim::tax::{load_tax_bracket, presets, ReverseTaxOptions, TaxBracket};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "retire_sim", version, about = "Progressive tax and drawdown calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tax owed on an amount, with the per-range breakdown
    Tax {
        amount: f64,
        #[command(flatten)]
        bracket: BracketArgs,
        /// Other income already occupying the lower ranges
        #[arg(long, default_value_t = 0.0)]
        margin: f64,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Gross amount that leaves NET after tax
    Reverse {
        net: f64,
        #[command(flatten)]
        bracket: BracketArgs,
        #[arg(long, default_value_t = 0.0)]
        margin: f64,
        #[arg(long, default_value_t = retire_sim::tax::DEFAULT_REVERSE_EPSILON)]
        epsilon: f64,
        #[arg(long, default_value_t = retire_sim::tax::DEFAULT_REVERSE_ITERS)]
        iters: usize,
    },
    /// Solve the constant withdrawal that drains a balance and tax each year
    Drawdown {
        /// Balance at retirement
        #[arg(long)]
        starting: f64,
        /// Per-period return rate as a decimal
        #[arg(long)]
        rate: f64,
        /// Number of withdrawal periods
        #[arg(long)]
        years: u32,
        #[arg(long, value_enum, default_value_t = Method::Secant)]
        method: Method,
        /// Iteration budget (defaults to the method's own)
        #[arg(long)]
        iters: Option<usize>,
        /// Tolerance on the ending balance (defaults to the method's own)
        #[arg(long)]
        epsilon: Option<f64>,
        #[command(flatten)]
        bracket: BracketArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct BracketArgs {
    /// Bracket CSV (upper_bound,rate rows); defaults to the built-in 2021 single-filer table
    #[arg(long)]
    bracket: Option<PathBuf>,
    /// Deduction subtracted before evaluation
    #[arg(long, default_value_t = presets::STANDARD_DEDUCTION_2021)]
    deduction: f64,
}

impl BracketArgs {
    fn load(&self) -> Result<TaxBracket> {
        match &self.bracket {
            Some(path) => load_tax_bracket(path)
                .with_context(|| format!("failed to load bracket from {}", path.display())),
            None => Ok(presets::single_2021()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    FixedPoint,
    Secant,
}

impl Method {
    fn with_overrides(self, iters: Option<usize>, epsilon: Option<f64>) -> DrawdownMethod {
        match self {
            Method::FixedPoint => {
                let defaults = FixedPointOptions::default();
                DrawdownMethod::FixedPoint(FixedPointOptions {
                    iters: iters.unwrap_or(defaults.iters),
                    epsilon: epsilon.unwrap_or(defaults.epsilon),
                })
            }
            Method::Secant => {
                let defaults = SecantOptions::default();
                DrawdownMethod::Secant(SecantOptions {
                    iters: iters.unwrap_or(defaults.iters),
                    epsilon: epsilon.unwrap_or(defaults.epsilon),
                })
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Tax {
            amount,
            bracket,
            margin,
            json,
        } => run_tax(amount, &bracket, margin, json),
        Command::Reverse {
            net,
            bracket,
            margin,
            epsilon,
            iters,
        } => run_reverse(net, &bracket, margin, ReverseTaxOptions { epsilon, iters }),
        Command::Drawdown {
            starting,
            rate,
            years,
            method,
            iters,
            epsilon,
            bracket,
            json,
        } => {
            let config = DrawdownConfig {
                starting_amount: starting,
                return_rate: rate,
                years,
                method: method.with_overrides(iters, epsilon),
            };
            run_drawdown(&config, &bracket, json)
        }
    }
}

fn run_tax(amount: f64, args: &BracketArgs, margin: f64, json: bool) -> Result<()> {
    let bracket = args.load()?;
    let result = bracket.tax(amount, args.deduction, margin);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "${:.2} of ${:.2} taxed",
        result.tax_paid,
        result.real_taxable_amount()
    );
    for (range, part) in bracket.ranges().iter().zip(&result.breakdown) {
        println!("  {} = ${:.2}", range, part);
    }
    println!("Effective tax rate: {:.2}%", result.real_effective_tax_rate() * 100.0);
    println!("Remaining: ${:.2}", result.remaining());
    Ok(())
}

fn run_reverse(net: f64, args: &BracketArgs, margin: f64, options: ReverseTaxOptions) -> Result<()> {
    let bracket = args.load()?;
    let solve = bracket.reverse_tax_detailed(net, args.deduction, margin, options);
    let tax = bracket.fast_tax(solve.amount, args.deduction, margin);

    println!("Gross ${:.2} nets ${:.2} (tax ${:.2})", solve.amount, solve.amount - tax, tax);
    if !solve.converged {
        println!(
            "  approximate: no convergence within {} iterations (last residual {:.6})",
            solve.iterations, solve.residual
        );
    }
    Ok(())
}

fn run_drawdown(config: &DrawdownConfig, args: &BracketArgs, json: bool) -> Result<()> {
    let runner = ScenarioRunner::new(args.load()?, args.deduction);
    let schedule = runner.run(config).with_context(|| {
        format!(
            "no constant withdrawal found for starting={}, rate={}, years={}",
            config.starting_amount, config.return_rate, config.years
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    println!("Constant withdrawal: ${:.2}", schedule.distribution);
    println!(
        "{:>5} {:>14} {:>12} {:>10} {:>12} {:>14}",
        "Year", "Start", "Withdrawal", "Tax", "Net", "End"
    );
    println!("{}", "-".repeat(72));
    for year in &schedule.years {
        println!(
            "{:>5} {:>14.2} {:>12.2} {:>10.2} {:>12.2} {:>14.2}",
            year.year,
            year.start_balance,
            year.withdrawal,
            year.tax_paid,
            year.net_income,
            year.end_balance,
        );
    }

    let summary = schedule.summary();
    println!("\nSummary:");
    println!("  Total Withdrawn: ${:.2}", summary.total_withdrawn);
    println!("  Total Tax: ${:.2}", summary.total_tax);
    println!("  Total Net Income: ${:.2}", summary.total_net_income);
    println!("  Final Balance: ${:.2}", summary.final_balance);
    Ok(())
}
