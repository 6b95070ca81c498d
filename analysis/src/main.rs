//! Vacancy Analysis
//!
//! Prints skill, salary and experience reports for a collected vacancy file.

use std::path::PathBuf;

use analysis::{experience_salary, load_postings, salary_distribution, skill_frequency};
use clap::Parser;
use common::observability::{LogConfig, init_logging};

/// Summarize vacancies collected by `collector`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Collected file (.csv, .tsv or .json)
    file: PathBuf,

    /// Currency code salaries are compared in
    #[arg(long, default_value = "RUR")]
    currency: String,

    /// How many skills to list
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Salary histogram bucket width
    #[arg(long, default_value_t = 50_000)]
    bucket: i64,

    /// Log events as JSON lines on stderr
    #[arg(long, env = "HH_LOG_JSON")]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(
        LogConfig {
            default_filter: "warn",
            ..LogConfig::default()
        }
        .json(args.log_json),
    )?;

    let postings = load_postings(&args.file)?;
    println!("📂 Loaded {} vacancies from {:?}\n", postings.len(), args.file);

    println!("🛠  Top skills");
    let skills = skill_frequency(&postings);
    if skills.is_empty() {
        println!("   (no key skills; collect with details enabled)");
    }
    for (rank, s) in skills.iter().take(args.top).enumerate() {
        println!("{:>4}. {:<30} {}", rank + 1, s.skill, s.count);
    }

    println!("\n💰 Salaries ({})", args.currency);
    match salary_distribution(&postings, &args.currency, args.bucket) {
        Some(stats) => {
            println!(
                "   count {}  min {:.0}  median {:.0}  mean {:.0}  max {:.0}",
                stats.count, stats.min, stats.median, stats.mean, stats.max
            );
            let widest = stats.histogram.iter().map(|b| b.count).max().unwrap_or(1);
            for bucket in &stats.histogram {
                let bar = "#".repeat(bucket.count * 40 / widest.max(1));
                println!(
                    "   {:>9} - {:<9} {:>5} {}",
                    bucket.lower,
                    bucket.lower.saturating_add(stats.bucket_width),
                    bucket.count,
                    bar
                );
            }
        }
        None => println!("   no salaries in {}", args.currency),
    }

    println!("\n📈 Salary by experience ({})", args.currency);
    let report = experience_salary(&postings, &args.currency);
    for level in &report.levels {
        println!(
            "   {:<14} n={:<5} median {:>9.0}  mean {:>9.0}",
            level.level.label(),
            level.count,
            level.median,
            level.mean
        );
    }
    match report.correlation {
        Some(r) => println!("   correlation (level vs salary): {r:.3}"),
        None => println!("   correlation: not enough data"),
    }

    Ok(())
}
