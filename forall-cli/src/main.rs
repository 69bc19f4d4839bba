use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use forall::{CheckStatus, GlobalConfig, RunDatabase, TestRun};

const DEFAULT_DATABASE: &str = ".forall/runs.json";

#[derive(Parser)]
#[command(name = "forall")]
#[command(about = "Inspect the runs recorded by forall property checks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the run database [default: $FORALL_DATABASE or .forall/runs.json]
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded properties
    List {
        /// Only properties with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusFilter>,

        /// Show seeds and samples
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show the latest run of a property
    Show {
        /// Name of the property
        property: String,

        /// Print the run as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget recorded runs
    Clean {
        /// Name of the property (omit to clean all)
        property: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Count recorded runs per status
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusFilter {
    Successful,
    Failed,
    Aborted,
}

impl StatusFilter {
    fn matches(self, status: CheckStatus) -> bool {
        matches!(
            (self, status),
            (StatusFilter::Successful, CheckStatus::Successful)
                | (StatusFilter::Failed, CheckStatus::Failed)
                | (StatusFilter::Aborted, CheckStatus::Aborted)
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = database_path(cli.database)?;
    let database = RunDatabase::open(&path);

    match cli.command {
        Commands::List { status, verbose } => list_runs(&database, status, verbose),
        Commands::Show { property, json } => show_run(&database, &property, json),
        Commands::Clean { property, yes } => clean_runs(&database, property, yes),
        Commands::Stats => show_stats(&database),
    }
}

/// Explicit path, then `FORALL_DATABASE`, then the default location
fn database_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let global = GlobalConfig::from_env().context("Invalid FORALL_* environment")?;
    Ok(global
        .database
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)))
}

fn colored_status(status: CheckStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        CheckStatus::Successful => text.green(),
        CheckStatus::Failed => text.red(),
        CheckStatus::Aborted => text.yellow(),
    }
}

fn format_time(run: &TestRun) -> String {
    DateTime::<Local>::from(run.recorded_at)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn list_runs(database: &RunDatabase, status: Option<StatusFilter>, verbose: bool) -> Result<()> {
    let runs: Vec<TestRun> = database
        .runs()
        .into_iter()
        .filter(|run| status.is_none_or(|filter| filter.matches(run.status)))
        .collect();

    if runs.is_empty() {
        println!("{}", "No recorded runs found.".green());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} recorded propert{}:", runs.len(), plural_y(runs.len())).bold()
    );
    println!();

    for run in &runs {
        println!(
            "  {} {} {}",
            "●".bright_black(),
            run.property.cyan().bold(),
            colored_status(run.status)
        );
        if verbose {
            println!("      {} seed={}", "→".bright_black(), run.seed);
            if let Some(sample) = &run.sample {
                println!("        {}", format!("Sample: {}", sample).bright_black());
            }
            println!("        {}", format!("Recorded: {}", format_time(run)).bright_black());
        }
    }

    if !verbose {
        println!();
        println!("{}", "Tip: Use --verbose for seeds and samples".bright_black());
    }

    Ok(())
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}

fn show_run(database: &RunDatabase, property: &str, json: bool) -> Result<()> {
    let Some(run) = database.previous_run(property) else {
        bail!("No recorded run for property '{}'", property);
    };

    if json {
        let text = serde_json::to_string_pretty(&run).context("Failed to serialize run")?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", format!("Latest run of '{}':", run.property).bold().cyan());
    println!("  {}: {}", "Status".bold(), colored_status(run.status));
    println!("  {}: {}", "Seed".bold(), run.seed);
    if let Some(sample) = &run.sample {
        println!("  {}: {}", "Sample".bold(), sample);
    }
    println!("  {}: {}", "Recorded".bold(), format_time(&run));

    if run.status == CheckStatus::Failed {
        println!();
        println!(
            "  {}",
            format!("Reproduce: PropertyConfig::default().with_seed(\"{}\")", run.seed)
                .bright_black()
        );
    }

    Ok(())
}

fn clean_runs(database: &RunDatabase, property: Option<String>, yes: bool) -> Result<()> {
    match property {
        Some(property) => {
            if database.previous_run(&property).is_none() {
                println!(
                    "{}",
                    format!("No recorded run for property '{}'", property).yellow()
                );
                return Ok(());
            }

            if !yes && !confirm(&format!("Forget the run of '{}'?", property))? {
                println!("Cancelled.");
                return Ok(());
            }

            database.remove(&property);
            println!("{}", format!("✓ Forgot the run of '{}'", property).green());
        }
        None => {
            let count = database.len();
            if count == 0 {
                println!("{}", "No recorded runs found.".green());
                return Ok(());
            }

            if !yes && !confirm(&format!("Forget ALL {} recorded run(s)?", count))? {
                println!("Cancelled.");
                return Ok(());
            }

            database.clear();
            println!("{}", format!("✓ Forgot {} run(s)", count).green());
        }
    }

    Ok(())
}

fn show_stats(database: &RunDatabase) -> Result<()> {
    let runs = database.runs();
    if runs.is_empty() {
        println!("{}", "No recorded runs found.".green());
        return Ok(());
    }

    let count = |status: CheckStatus| runs.iter().filter(|run| run.status == status).count();

    println!("{}", "Recorded runs".bold().cyan());
    println!("  {}: {}", "Properties".bold(), runs.len());
    for status in [CheckStatus::Successful, CheckStatus::Failed, CheckStatus::Aborted] {
        println!("  {}: {}", colored_status(status), count(status));
    }

    let oldest = runs.iter().min_by_key(|run| run.recorded_at);
    let newest = runs.iter().max_by_key(|run| run.recorded_at);
    if let (Some(oldest), Some(newest)) = (oldest, newest) {
        println!("  {}: {}", "Oldest".bold(), format_time(oldest));
        println!("  {}: {}", "Newest".bold(), format_time(newest));
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
