use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, warn};

use salarybench::analysis::{summary, JobFilter};
use salarybench::config::Config;
use salarybench::domain::JobTable;
use salarybench::logging;
use salarybench::observability::metrics;
use salarybench::pipeline::DataPipeline;

/// Smallest group size shown in the category benchmark tables.
const MIN_CATEGORY_POSTINGS: usize = 5;
const MIN_DEMAND_POSTINGS: usize = 10;
const TOP_GROUPS: usize = 15;
const TREND_YEARS_CAP: u32 = 20;

#[derive(Parser)]
#[command(name = "salarybench")]
#[command(about = "Salary benchmarking pipeline for Singapore job postings")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the postings CSV (overrides SALARYBENCH_DATA and config.toml)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Print accumulated Prometheus metrics after the command
    #[arg(long, global = true)]
    show_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and clean the postings file, printing the load report
    Load,
    /// Print salary benchmarks for the cleaned (optionally filtered) table
    Report {
        /// Restrict to one primary category
        #[arg(long)]
        category: Option<String>,
        /// Restrict to one position level
        #[arg(long)]
        position: Option<String>,
        /// Minimum required years of experience
        #[arg(long)]
        min_experience: Option<f64>,
        /// Maximum required years of experience
        #[arg(long)]
        max_experience: Option<f64>,
        /// Minimum average salary (SGD)
        #[arg(long)]
        min_salary: Option<f64>,
        /// Maximum average salary (SGD)
        #[arg(long)]
        max_salary: Option<f64>,
        /// How many top-paying postings to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    if let Err(e) = metrics::init() {
        warn!("Metrics unavailable: {}", e);
    }

    let cli = Cli::parse();
    let config = Config::load_or_default()?;
    let data_path = config.resolve_data_path(cli.data.clone());

    let mut pipeline = DataPipeline::new(config.quality.clone());
    let table = match pipeline.load(&data_path) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load data: {}", e);
            println!("❌ Failed to load data: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Load => print_load_report(&data_path, &table),
        Commands::Report {
            category,
            position,
            min_experience,
            max_experience,
            min_salary,
            max_salary,
            top,
        } => {
            let mut filter = JobFilter::new();
            filter.category = category;
            filter.position_level = position;
            filter.min_experience = min_experience;
            filter.max_experience = max_experience;
            filter.min_salary = min_salary;
            filter.max_salary = max_salary;

            let view = filter.apply(&table.rows);
            if view.len() < table.len() {
                println!(
                    "📊 Showing {} postings out of {} after filters",
                    view.len(),
                    table.len()
                );
            }
            print_report(&view, top);
        }
    }

    if cli.show_metrics {
        match metrics::render() {
            Some(text) => println!("{}", text),
            None => println!("⚠️  Metrics recorder not installed"),
        }
    }

    Ok(())
}

fn print_load_report(path: &std::path::Path, table: &JobTable) {
    let report = &table.report;
    println!("📊 Load results for {}:", path.display());
    println!("   Source rows: {}", report.source_rows);
    println!("   Cleaned rows: {}", table.len());
    println!("   Invalid salary ranges dropped: {}", report.invalid_ranges_dropped);
    println!("   Outliers removed: {}", report.outliers_removed);
    println!(
        "   Cadence filter: {}",
        if report.cadence_filter_applied { "applied" } else { "skipped" }
    );
    println!("   Unknown categories: {}", report.unknown_categories);
    println!("   Unparsed dates: {}", report.unparsed_dates);

    if !report.warnings.is_empty() {
        println!("\n⚠️  Warnings:");
        for warning in &report.warnings {
            println!("   - {}", warning);
        }
    }
}

fn print_report(view: &[&salarybench::JobPosting], top: usize) {
    let Some(headline) = summary::SalarySummary::from_rows(view) else {
        println!("⚠️  No postings match the current filters");
        return;
    };

    println!("💼 Salary benchmarks ({} postings)", headline.count);
    println!("   Median:          ${:>9.0}", headline.median);
    println!("   Mean:            ${:>9.0}", headline.mean);
    println!("   25th percentile: ${:>9.0}", headline.p25);
    println!("   75th percentile: ${:>9.0}", headline.p75);

    println!("\n📈 By position level:");
    for group in summary::by_position_level(view) {
        println!(
            "   {:<28} median ${:>8.0}  mean ${:>8.0}  n={}",
            group.key, group.median_salary, group.mean_salary, group.count
        );
    }

    println!("\n🎯 Top paying categories (min {} postings):", MIN_CATEGORY_POSTINGS);
    for group in summary::by_category(view, MIN_CATEGORY_POSTINGS, TOP_GROUPS) {
        println!(
            "   {:<40} median ${:>8.0}  n={}",
            group.key, group.median_salary, group.count
        );
    }

    println!("\n📐 Experience impact:");
    match summary::experience_correlation(view) {
        Some(r) => println!("   Correlation with salary: {:.3}", r),
        None => println!("   Correlation with salary: n/a"),
    }
    for (bracket, median, count) in summary::bracket_medians(view) {
        println!("   {:<16} median ${:>8.0}  n={}", bracket.label(), median, count);
    }
    println!("\n📅 Salary trend by required experience (≤{}y):", TREND_YEARS_CAP);
    for point in summary::experience_trend(view, TREND_YEARS_CAP) {
        println!(
            "   {:>2}y  median ${:>8.0}  mean ${:>8.0}  n={}",
            point.years, point.median_salary, point.mean_salary, point.count
        );
    }

    if let Some(spread) = summary::salary_spread(view) {
        println!("\n↔️  Salary spread: mean ${:.0}, median ${:.0}", spread.mean_range, spread.median_range);
    }

    println!("\n🔍 Demand vs pay (min {} postings):", MIN_DEMAND_POSTINGS);
    for demand in summary::demand_vs_pay(view, MIN_DEMAND_POSTINGS, 20) {
        println!(
            "   {:<40} {:>5} postings  median ${:>8.0}",
            demand.category, demand.postings, demand.median_salary
        );
    }

    println!("\n🏆 Top {} highest paying postings:", top);
    for row in summary::top_paying(view, top) {
        println!(
            "   ${:>8.0}  {:<44} {} ({})",
            row.salary_average,
            row.title,
            row.primary_category,
            row.company_name.as_deref().unwrap_or("company not listed"),
        );
    }
}
