use std::error::Error;
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use p2h_catalog::{DatasetLoader, LoadOptions, LoadReport};
use p2h_common::config::{AppConfig, OutputFormat};
use p2h_object_store::{get_object_store, DatasetLocation};
use p2h_schema::{read_schema_from_reader, translate_schema, SchemaDocument};
use p2h_telemetry::telemetry::init_telemetry;

use crate::output::render_statement;

#[derive(Parser)]
#[command(version, name = "parquet2hive")]
#[command(about = "Generate Hive table definitions for versioned Parquet datasets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the statements registering every version of the given datasets
    Load(LoadArgs),
    /// Print the column declarations of a local Parquet file
    Schema {
        /// Path to the Parquet file
        file: PathBuf,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// Dataset locations such as s3://bucket/prefix/dataset
    #[arg(required = true)]
    datasets: Vec<String>,

    /// Only use data files whose directory holds a _SUCCESS marker
    #[arg(long)]
    success_only: bool,

    /// Register at most this many versions, most recent first
    #[arg(long)]
    recent_versions: Option<NonZeroUsize>,

    /// Only register this version, e.g. v2
    #[arg(long)]
    dataset_version: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Sql,
    HiveCli,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Sql => OutputFormat::Sql,
            FormatArg::HiveCli => OutputFormat::HiveCli,
        }
    }
}

pub fn main(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse_from(args);
    let config = AppConfig::load()?;
    init_telemetry(&config.telemetry)?;

    match cli.command {
        Command::Load(args) => run_load(&config, args),
        Command::Schema { file } => run_schema(&file),
    }
}

fn run_load(config: &AppConfig, args: LoadArgs) -> Result<(), Box<dyn Error>> {
    let options = LoadOptions {
        success_only: args.success_only || config.loader.success_only,
        recent_versions: args
            .recent_versions
            .map(NonZeroUsize::get)
            .or(config.loader.recent_versions),
        version: args.dataset_version,
        success_marker_cache_size: config.loader.success_marker_cache_size,
    };
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut failed = 0;
    for dataset in &args.datasets {
        match runtime.block_on(load_dataset(dataset, options.clone())) {
            Ok(report) => {
                for statement in report.statements() {
                    println!("{}", render_statement(statement, format));
                }
                if !report.is_success() {
                    failed += 1;
                }
            }
            Err(e) => {
                error!("Failed to load dataset {dataset}: {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        let total = args.datasets.len();
        return Err(format!("{failed} of {total} dataset(s) failed to load").into());
    }
    Ok(())
}

async fn load_dataset(dataset: &str, options: LoadOptions) -> Result<LoadReport, Box<dyn Error>> {
    let location = DatasetLocation::parse(dataset)?;
    let store = get_object_store(location.store_url())?;
    info!("Loading dataset {location}");
    Ok(DatasetLoader::new(store, location, options).load().await?)
}

fn run_schema(file: &Path) -> Result<(), Box<dyn Error>> {
    let value = read_schema_from_reader(File::open(file)?)?;
    for column in translate_schema(&SchemaDocument::parse(&value)?)? {
        println!("{column}");
    }
    Ok(())
}
