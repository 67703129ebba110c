//! splitscan CLI: scan Parquet row-group splits batch by batch.

use clap::{Parser, Subcommand};
use splitscan_core::config::ScanConfig;
use splitscan_core::id::BatchSeq;
use splitscan_core::schema::Schema;
use splitscan_io::readers::parquet::{read_parquet_schema, ArrowBatchResolver, ParquetSplitOpener};
use splitscan_io::writers::jsonl::JsonlRowWriter;
use splitscan_io::{DataSourceRef, RowDriver, SplitBatchScanner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "splitscan")]
#[command(version = splitscan_core::VERSION)]
#[command(about = "Batch-oriented split scanner for Parquet files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan files split by split and report every batch
    Scan {
        /// Parquet files (paths or file:// URIs), scanned in the given order
        #[arg(required = true)]
        files: Vec<String>,

        /// Rows per batch (overrides SPLITSCAN_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,

        /// JSON schema file declaring the output columns (defaults to the first file's schema)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Skip batches up to and including this sequence number
        #[arg(long)]
        resume_after: Option<u64>,

        /// Print resolved rows as JSON lines instead of one summary line per batch
        #[arg(long)]
        rows: bool,
    },

    /// Print the output schema derived from a Parquet file
    Schema {
        /// Path to the Parquet file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            files,
            batch_size,
            schema,
            resume_after,
            rows,
        } => {
            let mut config = ScanConfig::from_env();
            apply_overrides(&mut config, batch_size);
            if let Err(e) = run_scan(files, config, schema.as_deref(), resume_after, rows) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Schema { file } => {
            if let Err(e) = print_schema(&file) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn apply_overrides(config: &mut ScanConfig, batch_size: Option<usize>) {
    if let Some(n) = batch_size {
        config.batch_size = n;
    }
}

fn load_schema(
    source: &DataSourceRef,
    schema_path: Option<&Path>,
) -> Result<Schema, Box<dyn std::error::Error>> {
    if let Some(path) = schema_path {
        let text = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    let first = source
        .file_paths()?
        .into_iter()
        .next()
        .ok_or("no input files")?;
    Ok(read_parquet_schema(&first)?)
}

fn run_scan(
    files: Vec<String>,
    config: ScanConfig,
    schema_path: Option<&Path>,
    resume_after: Option<u64>,
    print_rows: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let source = DataSourceRef::from_locations(files);
    let schema = load_schema(&source, schema_path)?;
    tracing::info!(
        version = splitscan_core::VERSION,
        files = source.locations().len(),
        columns = schema.len(),
        batch_size = config.batch_size,
        "starting scan"
    );

    let scanner = SplitBatchScanner::new(source, config, ParquetSplitOpener::new());
    let resolver = ArrowBatchResolver::new(schema.clone())?;
    let mut driver = RowDriver::new(scanner, resolver)
        .resume_after(BatchSeq::new(resume_after.unwrap_or(0)));

    let stdout = std::io::stdout();
    let mut writer = JsonlRowWriter::to_writer(stdout.lock(), &schema);
    let mut total_rows = 0usize;
    while let Some(resolved) = driver.next_resolved()? {
        total_rows += resolved.rows.len();
        if print_rows {
            writer.write_rows(&resolved.rows)?;
        } else {
            println!("batch {} rows {}", resolved.seq.get(), resolved.rows.len());
        }
    }
    writer.flush()?;

    let stats = driver.stats();
    eprintln!(
        "splits {} batches {} rows {}",
        stats.splits_opened, stats.batches_emitted, total_rows
    );
    Ok(())
}

fn print_schema(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let schema = read_parquet_schema(file)?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
