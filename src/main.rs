//! tunesort: rank song records by genre
//!
//! Usage: tunesort <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use tunesort::commands::{CheckCommand, SimilarCommand, SortCommand, SortMode};
use tunesort::config;
use tunesort::dataset::{read_records, read_records_from, DatasetError, OutputFormat};
use tunesort::display::TableWriter;
use tunesort::graph::{Traversal, DEFAULT_NAME_FIELD, DEFAULT_SIMILAR_LIMIT, DEFAULT_START_GENRE};
use tunesort::key::GenreKey;
use tunesort::record::Record;
use tunesort::sort::{PivotStrategy, QuickSorter, TiePlacement};

#[derive(Parser)]
#[command(name = "tunesort")]
#[command(version)]
#[command(
    about = "tunesort: rank song records by genre with merge sort and quick sort",
    long_about = None
)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort a dataset by genre
    Sort {
        /// Input dataset, JSON array or JSON Lines (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file, replaced only after a successful sort (default: stdout).
        /// May be the input file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sorting algorithm: merge|quick|both
        #[arg(short, long, default_value = "merge")]
        algorithm: String,

        /// Field holding the delimited genre tags
        #[arg(long, default_value = "genres")]
        field: String,

        /// Delimiter between genre tags
        #[arg(long, default_value = ", ")]
        delimiter: String,

        /// Quick sort pivot: first|median3|random
        #[arg(long, default_value = "first")]
        pivot: String,

        /// Seed for the random pivot
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Quick sort placement of keys equal to the pivot: before|after
        #[arg(long, default_value = "before")]
        ties: String,

        /// Quick sort partition depth limit
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format: json|jsonl|table
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Rows shown in table format
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print sorting statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Check whether a dataset is already sorted by genre
    Check {
        /// Input dataset, JSON array or JSON Lines (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field holding the delimited genre tags
        #[arg(long, default_value = "genres")]
        field: String,

        /// Delimiter between genre tags
        #[arg(long, default_value = ", ")]
        delimiter: String,
    },

    /// List songs related to a genre by walking the genre graph
    Similar {
        /// Input dataset, JSON array or JSON Lines (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Genre to start from
        #[arg(short, long, default_value = DEFAULT_START_GENRE)]
        start: String,

        /// Breadth-first traversal (default)
        #[arg(long, conflicts_with = "dfs")]
        bfs: bool,

        /// Depth-first traversal
        #[arg(long)]
        dfs: bool,

        /// Maximum number of songs listed
        #[arg(short = 'n', long, default_value_t = DEFAULT_SIMILAR_LIMIT)]
        limit: usize,

        /// Field holding each song's name
        #[arg(long, default_value = DEFAULT_NAME_FIELD)]
        name_field: String,

        /// Field holding the delimited genre tags
        #[arg(long, default_value = "genres")]
        field: String,

        /// Delimiter between genre tags
        #[arg(long, default_value = ", ")]
        delimiter: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .expect("Failed to initialize thread pool");
    }

    let result = match cli.command {
        Commands::Sort {
            input,
            output,
            algorithm,
            field,
            delimiter,
            pivot,
            seed,
            ties,
            max_depth,
            format,
            limit,
            stats,
        } => run_sort(
            input, output, algorithm, field, delimiter, pivot, seed, ties, max_depth, format,
            limit, stats,
        ),

        Commands::Check {
            input,
            field,
            delimiter,
        } => run_check(input, field, delimiter),

        Commands::Similar {
            input,
            start,
            bfs: _,
            dfs,
            limit,
            name_field,
            field,
            delimiter,
        } => {
            let traversal = if dfs {
                Traversal::DepthFirst
            } else {
                Traversal::BreadthFirst
            };
            run_similar(input, start, traversal, limit, name_field, field, delimiter)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load a dataset from a file, or from stdin when no path or `-` is given.
fn load_records(input: Option<PathBuf>) -> Result<Vec<Record>, DatasetError> {
    match input {
        Some(path) if path.to_string_lossy() != "-" => read_records(&path),
        _ => read_records_from(io::stdin().lock()),
    }
}

/// Parse a string option, naming it in the error.
fn parse_option<T>(
    value: &str,
    name: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, DatasetError> {
    parse(value)
        .ok_or_else(|| DatasetError::InvalidFormat(format!("Unknown {}: '{}'", name, value)))
}

#[allow(clippy::too_many_arguments)]
fn run_sort(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    algorithm: String,
    field: String,
    delimiter: String,
    pivot: String,
    seed: u64,
    ties: String,
    max_depth: Option<usize>,
    format: String,
    limit: Option<usize>,
    stats: bool,
) -> Result<(), DatasetError> {
    // Set process-wide defaults before any sorter or writer is built
    if let Some(depth) = max_depth {
        config::set_max_partition_depth(depth);
    }
    if let Some(rows) = limit {
        config::set_display_rows(rows);
    }

    let mode = parse_option(&algorithm, "algorithm", SortMode::from_str)?;
    let format = parse_option(&format, "format", OutputFormat::from_str)?;
    let pivot = parse_option(&pivot, "pivot", PivotStrategy::from_str)?.with_seed(seed);
    let ties = parse_option(&ties, "tie placement", TiePlacement::from_str)?;

    let cmd = SortCommand::new()
        .with_mode(mode)
        .with_format(format)
        .with_extractor(GenreKey::new().with_field(field).with_delimiter(delimiter))
        .with_quick_sorter(QuickSorter::new().with_pivot(pivot).with_ties(ties))
        .with_table(TableWriter::new());

    // The whole input is loaded and sorted before the destination is touched
    let records = load_records(input)?;
    let results = match output {
        Some(path) => cmd.run_to_path(&records, &path)?,
        None => cmd.run(&records, &mut io::stdout().lock())?,
    };

    if stats {
        for result in results {
            eprintln!("Sort stats: {}", result);
        }
    }

    Ok(())
}

fn run_check(input: Option<PathBuf>, field: String, delimiter: String) -> Result<(), DatasetError> {
    let cmd = CheckCommand::new()
        .with_extractor(GenreKey::new().with_field(field).with_delimiter(delimiter));

    let count = match input {
        Some(path) if path.to_string_lossy() != "-" => cmd.run(&path)?,
        _ => cmd.run_reader(io::stdin().lock())?,
    };

    println!("Sorted: {} records", count);
    Ok(())
}

fn run_similar(
    input: Option<PathBuf>,
    start: String,
    traversal: Traversal,
    limit: usize,
    name_field: String,
    field: String,
    delimiter: String,
) -> Result<(), DatasetError> {
    let cmd = SimilarCommand::new()
        .with_start(start)
        .with_traversal(traversal)
        .with_limit(limit)
        .with_name_field(name_field)
        .with_extractor(GenreKey::new().with_field(field).with_delimiter(delimiter));

    let records = load_records(input)?;
    cmd.run(&records, &mut io::stdout().lock())?;
    Ok(())
}
