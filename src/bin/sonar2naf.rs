//! sonar2naf CLI: convert SoNaR fragment directories to NAF.
//!
//! Usage:
//!   sonar2naf convert <input_dir> [output_dir] [--config path] [--jobs n]
//!   sonar2naf inventory <input_dir> [--dry-run]

use clap::{Parser, Subcommand};
use sonar2naf::{
    scan_directory, BatchConverter, BatchReport, ConverterConfig, Inventory, NafDirectorySink,
    ScanOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(
    name = "sonar2naf",
    version,
    about = "Convert SoNaR treebank fragments with PropBank roles to NAF"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every document in a fragment directory
    Convert {
        /// Directory holding the fragment files
        input: PathBuf,
        /// Where NAF files go (defaults to the input directory)
        output: Option<PathBuf>,
        /// Documents converted concurrently
        #[arg(long)]
        jobs: Option<usize>,
        /// Leave non-canonical fragment filenames alone
        #[arg(long)]
        no_normalize: bool,
        /// NAF language tag
        #[arg(long)]
        language: Option<String>,
        /// Print the batch report as JSON instead of summary lines
        #[arg(long)]
        json: bool,
    },
    /// Print the processing plan without converting
    Inventory {
        /// Directory holding the fragment files
        input: PathBuf,
        /// Do not rename fragment files
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ConverterConfig, String> {
    ConverterConfig::load(path).map_err(|e| format!("Failed to load config: {}", e))
}

fn print_report(report: &BatchReport, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| format!("Failed to encode report: {}", e))?;
        println!("{}", text);
        return Ok(());
    }
    for summary in &report.converted {
        println!(
            "{},{},{}",
            summary.name, summary.stats.predicates, summary.stats.roles
        );
    }
    for failure in &report.failed {
        match &failure.fragment {
            Some(fragment) => eprintln!(
                "Error: {} ({}): {}",
                failure.name,
                fragment.display(),
                failure.error
            ),
            None => eprintln!("Error: {}: {}", failure.name, failure.error),
        }
    }
    Ok(())
}

async fn cmd_convert(
    config: ConverterConfig,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> i32 {
    let output = output.unwrap_or(input);
    let sink = match NafDirectorySink::new(output, &config) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Error: cannot use output directory '{}': {}", output.display(), e);
            return 1;
        }
    };
    let converter = BatchConverter::new(config, Arc::new(sink));
    let report = match converter.convert_directory(input).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    info!(missed_roles = report.missed_roles, "roles without a predicate");

    if let Err(e) = print_report(&report, json) {
        eprintln!("Error: {}", e);
        return 1;
    }
    if report.is_success() {
        0
    } else {
        1
    }
}

fn print_inventory(inventory: &Inventory) {
    for rename in &inventory.renames {
        println!(
            "renamed\t{}\t{}",
            rename.from.display(),
            rename.to.display()
        );
    }
    for conflict in &inventory.conflicts {
        println!(
            "conflict\t{}\t{}",
            conflict.from.display(),
            conflict.to.display()
        );
    }
    println!(
        "{:<32}  {:<4}  {:>5}  {:>8}  PATH",
        "DOCUMENT", "SECT", "PARA", "SENTENCE"
    );
    println!("{}", "-".repeat(72));
    for plan in &inventory.documents {
        for fragment in plan.fragments() {
            println!(
                "{:<32}  {:<4}  {:>5}  {:>8}  {}",
                fragment.document,
                fragment.section,
                fragment.paragraph,
                fragment.sentence.to_string(),
                fragment.path.display()
            );
        }
    }
    println!(
        "{} documents, {} fragments, {} skipped",
        inventory.documents.len(),
        inventory.fragment_count(),
        inventory.skipped.len()
    );
}

fn cmd_inventory(config: &ConverterConfig, input: &Path, dry_run: bool) -> i32 {
    let options = ScanOptions {
        normalize: config.normalize_filenames && !dry_run,
    };
    match scan_directory(input, options) {
        Ok(inventory) => {
            print_inventory(&inventory);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Convert {
            input,
            output,
            jobs,
            no_normalize,
            language,
            json,
        } => {
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            if no_normalize {
                config.normalize_filenames = false;
            }
            if let Some(language) = language {
                config.language = language;
            }
            cmd_convert(config, &input, output.as_deref(), json).await
        }
        Commands::Inventory { input, dry_run } => cmd_inventory(&config, &input, dry_run),
    };
    std::process::exit(code);
}
