//! hh.ru Vacancy Collector
//!
//! Collects vacancies matching a keyword and saves them to data/vacancies.csv

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use collector::{Collector, OutputFormat, Query, Settings, collect_to_file};
use common::observability::{LogConfig, init_logging};

/// Collect vacancies from the hh.ru search API into a flat file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Search keyword or phrase
    keyword: String,

    /// Output file [default: data/vacancies.<format>]
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Area id to filter by (1 = Moscow)
    #[arg(long)]
    area: Option<String>,

    /// Results per page (1-100)
    #[arg(long)]
    per_page: Option<u32>,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Skip per-vacancy requests (no key skills, snippet as description)
    #[arg(long)]
    no_details: bool,

    /// Settings file [default: ./hh.toml if present]
    #[arg(long, env = "HH_CONFIG")]
    config: Option<PathBuf>,

    /// Log events as JSON lines on stderr
    #[arg(long, env = "HH_LOG_JSON")]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(LogConfig::default().json(args.log_json))?;

    let mut settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if args.area.is_some() {
        settings.area = args.area;
    }
    if let Some(per_page) = args.per_page {
        settings.per_page = per_page;
    }
    if args.max_pages.is_some() {
        settings.max_pages = args.max_pages;
    }
    if args.no_details {
        settings.fetch_details = false;
    }

    let mut query = Query::new(&args.keyword)?.with_per_page(settings.per_page)?;
    if let Some(area) = &settings.area {
        query = query.with_area(area.as_str());
    }

    let format = args.format;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from("data").join(format!("vacancies.{}", format.ext())));

    println!("🔍 Collecting vacancies for {:?}...", query.keyword());

    let collector = Collector::new(settings.client()?, settings.collect_options());
    let set = collect_to_file(&collector, &query, &out, format)
        .with_context(|| format!("collection for {:?} failed", query.keyword()))?;

    println!("💾 Saved {} vacancies to {:?}", set.len(), out);
    Ok(())
}
