//! Coverage Engine CLI
//!
//! Command-line interface for single and batch coverage calculations

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use coverage_engine::narrative::format_currency;
use coverage_engine::profile::load_requests;
use coverage_engine::{CalculationResult, EngineConfig, ProfileRequest};
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coverage_engine", version, about = "Life insurance needs and premium calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate coverage and premium for one profile
    Calculate(CalculateArgs),
    /// Calculate every profile in a CSV file
    Batch {
        /// Input CSV with one profile per row
        #[arg(long)]
        input: PathBuf,
        /// Write JSON results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the assumption tables the engine would use
    ShowAssumptions,
}

#[derive(Args)]
struct CalculateArgs {
    /// JSON request file; field flags are ignored when given
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long)]
    age: Option<i64>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    smoking: Option<String>,
    #[arg(long)]
    annual_income: Option<f64>,
    #[arg(long)]
    monthly_expenses: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    existing_coverage: f64,
    #[arg(long, default_value_t = 0.0)]
    savings: f64,
    #[arg(long)]
    total_debts: Option<f64>,
    #[arg(long)]
    funeral_costs: Option<f64>,
    #[arg(long, default_value_t = 0)]
    dependents: i64,
    #[arg(long, default_value_t = 0.0)]
    education_fund: f64,
    /// 10, 15, 20, 25, 30 or whole
    #[arg(long)]
    coverage_period: Option<String>,
    #[arg(long)]
    inflation_protection: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

impl CalculateArgs {
    fn request(&self) -> Result<ProfileRequest> {
        if let Some(path) = &self.profile {
            let file = File::open(path)
                .with_context(|| format!("failed to open profile {}", path.display()))?;
            return serde_json::from_reader(file)
                .with_context(|| format!("failed to parse profile {}", path.display()));
        }

        let defaults = ProfileRequest::default();
        Ok(ProfileRequest {
            age: self.age,
            gender: self.gender.clone(),
            smoking: self.smoking.clone(),
            annual_income: self.annual_income,
            monthly_expenses: self.monthly_expenses,
            existing_coverage: self.existing_coverage,
            savings: self.savings,
            total_debts: self.total_debts,
            funeral_costs: self.funeral_costs.unwrap_or(defaults.funeral_costs),
            dependents: self.dependents,
            education_fund: self.education_fund,
            coverage_period: self.coverage_period.clone(),
            inflation_protection: if self.inflation_protection { "yes" } else { "no" }.to_string(),
            ..defaults
        })
    }
}

fn print_summary(result: &CalculationResult) {
    println!("Coverage Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("{:<22} {:>14} {:>14}", "Method", "Amount", "After assets");
    println!("{}", "-".repeat(52));
    for (method, calc) in &result.calculations {
        println!(
            "{:<22} {:>14} {:>14}",
            method.title(),
            format_currency(calc.amount),
            format_currency(calc.adjusted_amount)
        );
    }
    println!();

    println!("{}\n", result.explanation);
    println!("{}\n", result.premium_estimate.explanation);

    println!("Recommendations:");
    for (i, recommendation) in result.recommendations.iter().enumerate() {
        println!("\n{}. {}", i + 1, recommendation.title);
        for line in recommendation.description.lines() {
            println!("   {}", line);
        }
    }

    let sources = &result.data_sources;
    println!(
        "\nRates: base {}, inflation {}, ABI {}, mortality {} (as of {})",
        sources.sources.base_rate,
        sources.sources.inflation,
        sources.sources.abi_rate,
        sources.sources.mortality,
        sources.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env().context("invalid engine settings")?;
    let engine = config.build_engine().with_context(|| {
        format!(
            "failed to load assumptions from {}",
            config.assumptions_dir().display()
        )
    })?;
    let rates = config.rate_provider(Utc::now());

    match cli.command {
        Command::Calculate(args) => {
            let request = args.request()?;
            let result = engine
                .calculate_request(&request, &rates)
                .context("calculation rejected")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
        Command::Batch { input, output } => {
            let requests = load_requests(&input)
                .map_err(|e| anyhow::anyhow!("failed to load {}: {}", input.display(), e))?;

            let rows: Vec<_> = engine
                .calculate_batch(&requests, &rates)
                .into_iter()
                .enumerate()
                .map(|(i, result)| match result {
                    Ok(result) => json!({ "row": i + 1, "result": result }),
                    Err(e) => json!({ "row": i + 1, "error": e.to_string() }),
                })
                .collect();
            let body = serde_json::to_string_pretty(&rows)?;

            match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("unable to create {}", path.display()))?;
                    writeln!(file, "{}", body)?;
                    println!("{} results written to: {}", rows.len(), path.display());
                }
                None => println!("{}", body),
            }
        }
        Command::ShowAssumptions => {
            println!("{}", serde_json::to_string_pretty(engine.assumptions())?);
        }
    }

    Ok(())
}
