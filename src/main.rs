//! csvtidy CLI - folder generation and row reordering for CSV files

use clap::{Parser, Subcommand, ValueEnum};
use csvtidy::{
    CsvReorder, DEFAULT_ENCODING, DEFAULT_LANGUAGE_COLUMN, DEFAULT_OUTPUT_PREFIX,
    DEFAULT_SEPARATOR, FolderDeriver, HeaderMapping, HeaderStrategy, ReorderConfig, SortColumn,
    default_output_dir, stdout_dispatch,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

/// CSV utilities: create folders from rows, or reorder rows.
#[derive(Parser, Debug)]
#[command(name = "csvtidy")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create one folder per CSV row, named from selected columns
    Folders(FoldersArgs),
    /// Sort the rows of a CSV file into a new file
    Reorder(ReorderArgs),
}

#[derive(clap::Args, Debug)]
struct FoldersArgs {
    /// Input CSV file
    csv: PathBuf,

    /// Comma-separated header names that make up each folder name
    #[arg(long, required = true)]
    headers: String,

    /// How header names map onto CSV columns
    #[arg(short = 'm', long, default_value = "language")]
    mode: Mode,

    /// Base directory for the folders (default: <csv dir>/generated_folders)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Separator between folder-name parts
    #[arg(short = 's', long, default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Language kept in language mode
    #[arg(short = 'l', long, default_value = "EN")]
    language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Keep rows whose `language` column matches; use headers verbatim
    Language,
    /// Append `_en` to every header except year and size
    Auto,
}

#[derive(clap::Args, Debug)]
struct ReorderArgs {
    /// Input CSV file
    csv: PathBuf,

    /// Sort columns, in priority order; append `:date` to parse as dates
    #[arg(long, required = true, value_delimiter = ',', value_parser = parse_sort_column)]
    sort: Vec<SortColumn>,

    /// Directory for the sorted file (default: the input file's directory)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Sort descending
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Language priority, highest first
    #[arg(long, value_delimiter = ',', default_values = ["EN", "CN"])]
    language_order: Vec<String>,

    /// Column holding the row language
    #[arg(long, default_value = DEFAULT_LANGUAGE_COLUMN)]
    language_column: String,

    /// Group rows by language priority before the sort columns
    #[arg(short = 'L', long)]
    by_language: bool,

    /// Prefix for the output file name
    #[arg(long, default_value = DEFAULT_OUTPUT_PREFIX)]
    prefix: String,

    /// Encoding for reading and writing (`auto` to detect on read)
    #[arg(short = 'e', long, default_value = DEFAULT_ENCODING)]
    encoding: String,
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    let (name, is_date) = match value.rsplit_once(':') {
        Some((name, kind)) if kind.eq_ignore_ascii_case("date") => (name, true),
        Some((name, kind)) if kind.eq_ignore_ascii_case("text") => (name, false),
        _ => (value, false),
    };
    SortColumn::new(name, is_date).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::ERROR
    } else {
        match args.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    if let Err(e) = tracing::dispatcher::set_global_default(stdout_dispatch(level)) {
        eprintln!("Could not install logger: {e}");
    }

    let result = match &args.command {
        Command::Folders(folders) => run_folders(folders),
        Command::Reorder(reorder) => run_reorder(reorder),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_folders(args: &FoldersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let headers = HeaderMapping::parse(&args.headers)?;
    let strategy = match args.mode {
        Mode::Language => HeaderStrategy::language_filter(args.language.as_str()),
        Mode::Auto => HeaderStrategy::AutoSuffix,
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.csv));

    let mut deriver = FolderDeriver::new(strategy, output);
    deriver.separator(args.separator.as_str());
    let report = deriver.derive_from_path(&args.csv, &headers)?;

    println!(
        "Created {} folders in {}",
        report.created.len(),
        deriver.base_path().display()
    );
    if report.skipped_rows > 0 {
        println!("  Skipped rows: {}", report.skipped_rows);
    }
    for failure in &report.failures {
        println!("  Failed: {failure}");
    }
    Ok(())
}

fn run_reorder(args: &ReorderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ReorderConfig::new(args.sort.clone());
    config
        .reverse(args.reverse)
        .language_sorting(args.by_language)
        .language_column(args.language_column.as_str())
        .language_order(args.language_order.iter().map(|l| l.trim().to_string()))
        .output_prefix(args.prefix.as_str())
        .encoding(args.encoding.as_str());

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .csv
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .to_path_buf(),
    };

    let written = CsvReorder::new(config)?.reorder(&args.csv, output_dir)?;
    println!("Wrote {}", written.display());
    Ok(())
}
