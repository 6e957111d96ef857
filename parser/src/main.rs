//! @ai:module:intent CLI entry point for the annotation parser
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on parser, scan, config, output

use anno_parser::{
    output, parse_annotations, parse_annotations_strict, BatchScanner, Error, OutputFormat,
    ScanConfig, ScanResult,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "anno")]
#[command(author, version, about = "Parse @annotations out of doc comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one doc comment and print its annotation table
    Parse {
        /// File holding the comment text; reads stdin when omitted
        file: Option<PathBuf>,

        /// Fail on undecodable embedded values instead of keeping their text
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the annotations of every declaration in a source file
    Extract {
        /// Path to source file
        path: PathBuf,

        #[command(flatten)]
        options: ScanOptions,

        /// Output format
        #[arg(long, short, value_enum, default_value = "json-pretty")]
        format: Format,
    },

    /// Scan a file or directory tree for annotated declarations
    Scan {
        /// Path to file or directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Configuration file (defaults to anno.toml in the scanned directory)
        #[arg(long, short)]
        config: Option<PathBuf>,

        #[command(flatten)]
        options: ScanOptions,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Parse a JSON array of dynamic declarations
    Manifest {
        /// Path to the JSON manifest
        path: PathBuf,

        #[command(flatten)]
        options: ScanOptions,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Args)]
struct ScanOptions {
    /// Fail a declaration on undecodable embedded values
    #[arg(long)]
    strict: bool,

    /// Also report declarations without annotations
    #[arg(long)]
    include_undocumented: bool,

    /// Only keep these annotation names
    #[arg(long, value_delimiter = ',')]
    only: Option<Vec<String>>,
}

impl ScanOptions {
    /// Flags only ever switch behavior on, so they layer over file values.
    fn apply(self, mut config: ScanConfig) -> ScanConfig {
        config.strict_values |= self.strict;
        config.include_undocumented |= self.include_undocumented;
        if self.only.is_some() {
            config.only = self.only;
        }
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("anno_parser=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Parse {
            file,
            strict,
            format,
        } => {
            let doc = read_input(file.as_deref())?;

            let table = if strict {
                match parse_annotations_strict(&doc) {
                    Ok(table) => table,
                    Err(e @ Error::InvalidValue { .. }) => {
                        eprintln!("Error: {}", e);
                        return Ok(ExitCode::from(1));
                    }
                    Err(e) => return Err(e.into()),
                }
            } else {
                parse_annotations(&doc)
            };

            println!("{}", output::format_table(&table, format.into()));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Extract {
            path,
            options,
            format,
        } => {
            let config = options.apply(ScanConfig::default());
            let result = BatchScanner::new(&config)
                .scan_file(&path)
                .with_context(|| format!("Failed to extract {}", path.display()))?;
            Ok(report(&result, format))
        }

        Commands::Scan {
            path,
            config,
            options,
            format,
        } => {
            let config = options.apply(load_config(config.as_deref(), &path)?);
            let scanner = BatchScanner::new(&config);

            let result = if path.is_file() {
                scanner.scan_file(&path)
            } else {
                scanner.scan_directory(&path)
            }
            .with_context(|| format!("Failed to scan {}", path.display()))?;

            Ok(report(&result, format))
        }

        Commands::Manifest {
            path,
            options,
            format,
        } => {
            let config = options.apply(ScanConfig::default());
            let json = read_input(Some(&path))?;
            let result = BatchScanner::new(&config)
                .scan_manifest(&json)
                .with_context(|| format!("Invalid manifest {}", path.display()))?;
            Ok(report(&result, format))
        }
    }
}

fn report(result: &ScanResult, format: Format) -> ExitCode {
    println!("{}", output::format_scan_result(result, format.into()));

    if result.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn load_config(explicit: Option<&Path>, scanned: &Path) -> anyhow::Result<ScanConfig> {
    if let Some(path) = explicit {
        return Ok(ScanConfig::load(path)?);
    }

    let dir = if scanned.is_dir() {
        scanned
    } else {
        scanned.parent().unwrap_or(Path::new("."))
    };
    Ok(ScanConfig::discover(dir)?)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
