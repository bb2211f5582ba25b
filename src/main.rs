use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use maxscores::codec::{self, SpreadsheetCodec};
use maxscores::delimited::CsvCodec;
use maxscores::detect::DetectorConfig;
use maxscores::pattern::{default_exclusion, IdentifierPattern, MatchMode, Preset};
use maxscores::pipeline::{self, Options};
use maxscores::reduce::{Fallback, ReducerConfig, ScoreReducer};
use maxscores::xlsx::writer::DEFAULT_SHEET_NAME;
use maxscores::xlsx::XlsxCodec;

#[derive(Parser)]
#[command(name = "maxscores")]
#[command(about = "Consolidate exam evaluation sheets into one max-score row per USN", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one row per student holding the maximum score of each column
    Consolidate {
        /// Input sheet (xlsx, xlsm, xlsb, xls, ods, csv or tsv)
        input: PathBuf,

        /// Output file (default: maxscores_<input name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "xlsx")]
        format: OutputFormat,

        /// Name of the output worksheet
        #[arg(long, default_value = DEFAULT_SHEET_NAME)]
        sheet_name: String,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Show the detected layout and a preview of the consolidated rows
    Info {
        /// Input sheet to inspect
        input: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,
    },
}

#[derive(Args)]
struct DetectionArgs {
    /// Built-in USN pattern
    #[arg(long, value_enum, default_value = "strict")]
    preset: PresetArg,

    /// Custom USN regex (overrides --preset)
    #[arg(long, env = "MAXSCORES_PATTERN")]
    pattern: Option<String>,

    /// Accept identifiers embedded in longer text, e.g. "USN: 1BY21CS001"
    #[arg(long)]
    embedded: bool,

    /// Regex for column headers to drop (default: evaluator/version columns)
    #[arg(long, conflicts_with = "no_exclude")]
    exclude: Option<String>,

    /// Keep every column
    #[arg(long)]
    no_exclude: bool,

    /// Value for columns with no numeric score in a student's rows
    #[arg(long, value_enum, default_value = "first-seen")]
    fallback: FallbackArg,

    /// Rows scanned for the first USN before widening the search
    #[arg(long, default_value = "20")]
    scan_rows: usize,

    /// Fail if no USN appears within --scan-rows
    #[arg(long)]
    no_full_scan: bool,

    /// Assume header row 1 / column 1 when no USN is found instead of failing
    #[arg(long)]
    lenient: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Strict,
    Loose,
}

#[derive(Clone, Copy, ValueEnum)]
enum FallbackArg {
    FirstSeen,
    Blank,
    Zero,
}

impl DetectionArgs {
    fn to_options(&self) -> Result<Options> {
        let pattern = match &self.pattern {
            Some(p) => IdentifierPattern::new(p).context("Invalid --pattern")?,
            None => IdentifierPattern::preset(match self.preset {
                PresetArg::Strict => Preset::Strict,
                PresetArg::Loose => Preset::Loose,
            }),
        };
        let mode = if self.embedded {
            MatchMode::Embedded
        } else {
            MatchMode::Exact
        };

        let exclude = if self.no_exclude {
            None
        } else {
            match &self.exclude {
                Some(re) => Some(regex::Regex::new(re).context("Invalid --exclude")?),
                None => Some(default_exclusion()),
            }
        };

        Ok(Options {
            pattern: pattern.with_mode(mode),
            detector: DetectorConfig {
                scan_rows: self.scan_rows,
                full_scan: !self.no_full_scan,
                lenient: self.lenient,
            },
            reducer: ReducerConfig {
                exclude,
                fallback: match self.fallback {
                    FallbackArg::FirstSeen => Fallback::FirstSeen,
                    FallbackArg::Blank => Fallback::Blank,
                    FallbackArg::Zero => Fallback::Zero,
                },
            },
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Consolidate {
            input,
            output,
            format,
            sheet_name,
            detection,
        } => {
            let mut options = detection.to_options()?;
            options.sheet_name = sheet_name;
            consolidate(&input, output.as_deref(), format, &options)?;
        }
        Commands::Info { input, detection } => {
            info(&input, &detection.to_options()?)?;
        }
    }

    Ok(())
}

fn input_codec(input: &Path) -> Result<Box<dyn SpreadsheetCodec>> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match codec::codec_for_extension(&ext) {
        Some(codec) => Ok(codec),
        None => anyhow::bail!("Unsupported input format: {}", ext),
    }
}

fn consolidate(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    options: &Options,
) -> Result<()> {
    let reader = input_codec(input)?;
    let writer: Box<dyn SpreadsheetCodec> = match format {
        OutputFormat::Xlsx => Box::new(XlsxCodec),
        OutputFormat::Csv => Box::new(CsvCodec::default()),
    };

    println!("Reading: {}", input.display());
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let original_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let export = pipeline::process(&bytes, original_name, reader.as_ref(), writer.as_ref(), options)
        .context("Failed to consolidate scores")?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(&export.filename),
    };

    println!("Writing {} ({}): {}", export.filename, export.mime_type, output.display());
    fs::write(&output, &export.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Done!");
    Ok(())
}

fn info(input: &Path, options: &Options) -> Result<()> {
    let reader = input_codec(input)?;
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let grid = reader.parse(&bytes).context("Failed to read sheet")?;

    println!("File: {}", input.display());
    println!("Rows: {}, columns: {}", grid.len(), grid.width());
    println!("USN pattern: {}", options.pattern.as_str());
    println!();

    let result = pipeline::consolidate(&grid, options).context("Failed to consolidate scores")?;
    let layout = result.layout;
    println!("Header row: {}", layout.header_row + 1);
    println!(
        "USN column: {} ({})",
        layout.identifier_column + 1,
        result.table.identifier_header()
    );
    println!();

    let reducer = ScoreReducer::new(&options.pattern, &options.reducer);
    let retained = reducer.retained_columns(&layout, &result.headers);
    println!("Columns:");
    for (idx, name) in result.headers.iter().enumerate() {
        let note = if idx == layout.identifier_column {
            "identifier"
        } else if retained.contains(&idx) {
            "kept"
        } else {
            "excluded"
        };
        println!("  {:>3}. {} [{}]", idx + 1, name, note);
    }
    println!();

    let (_, rows) = pipeline::split_at_header(&grid, &layout);
    let grouping = reducer.group_rows(&layout, rows);
    println!("Rows admitted: {}", grouping.admitted);
    println!("Rows skipped: {}", grouping.rejected);
    println!("Students: {}", grouping.groups.len());
    println!();

    let table = &result.table;
    println!("Preview:");
    println!("  {}", table.headers.join(" | "));
    for row in table.rows.iter().take(5) {
        let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        println!("  {} | {}", row.identifier, values.join(" | "));
    }
    if table.rows.len() > 5 {
        println!("  ... and {} more", table.rows.len() - 5);
    }

    Ok(())
}
