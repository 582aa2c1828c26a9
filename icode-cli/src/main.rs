//! i-Code Measures CLI Entry Point
//!
//! Reads an i-Code report, resolves its results against a project tree
//! and prints the measures the metrics mapper publishes.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icode_core::constants::metrics::CATALOG;
use icode_core::{
    is_metric, read_report, DuplicatePolicy, FileIndex, MapperConfig, MeasureMapper, MeasureStore,
    ProjectFiles, RuleId,
};
use icode_utils::{init_logging, ConfigBuilder, LogLevel, LoggerConfig};
use output::{metrics_table, MeasuresReport, OutputFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration file picked up from the project directory
const PROJECT_CONFIG_FILE: &str = "icode.toml";

#[derive(Parser)]
#[command(name = "icode-measures")]
#[command(about = "Publish i-Code metric results as per-file measures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the metric results of a report onto project files
    Measures {
        /// i-Code report (.xml analysis project or .json check results)
        report: PathBuf,

        /// Project directory the report's file names are relative to
        #[arg(short = 'p', long, default_value = ".")]
        project: PathBuf,

        /// Configuration file path (defaults to icode.toml in the project)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,

        /// What to do when a metric is saved twice for one file
        #[arg(long, value_enum)]
        duplicates: Option<DuplicatePolicy>,

        /// Prefix of the metric keys derived from rule identifiers
        #[arg(long)]
        prefix: Option<String>,

        /// Enable debug logging
        #[arg(short = 'd', long)]
        debug: bool,
    },

    /// Tell whether rule identifiers denote metrics
    Classify {
        /// Rule identifiers such as SH.MET.LineOfCode
        #[arg(required = true)]
        rule_ids: Vec<String>,
    },

    /// List the metrics published with the default prefix
    Metrics {
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Human)]
        output: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Measures {
            report,
            project,
            config,
            output,
            duplicates,
            prefix,
            debug,
        } => {
            let config = resolve_config(&project, config.as_deref(), duplicates, prefix)?;
            let level = if debug { LogLevel::Debug } else { config.log_level };
            init_logging(&LoggerConfig {
                level,
                ..LoggerConfig::default()
            })?;

            run_measures(&report, &project, &config, output)
        }
        Commands::Classify { rule_ids } => {
            icode_utils::logging::basic_config(Some(LogLevel::Warning))?;
            let mapper = MeasureMapper::default();
            for rule_id in rule_ids {
                let id = RuleId::new(rule_id.as_str());
                if !is_metric(&rule_id) {
                    println!("{rule_id}: not a metric");
                } else if let Some(key) = mapper.metric_key(&id) {
                    println!("{rule_id}: metric {key}");
                } else {
                    println!("{rule_id}: metric without a name");
                }
            }
            Ok(())
        }
        Commands::Metrics { output } => {
            match output {
                OutputFormat::Human => print!("{}", metrics_table(CATALOG)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(CATALOG)?),
            }
            Ok(())
        }
    }
}

/// Defaults, then the configuration file, then command-line overrides
fn resolve_config(
    project: &Path,
    config: Option<&Path>,
    duplicates: Option<DuplicatePolicy>,
    prefix: Option<String>,
) -> Result<MapperConfig> {
    let builder = ConfigBuilder::<MapperConfig>::new();
    let builder = match config {
        Some(path) => builder
            .load_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => builder
            .load_optional_file(&project.join(PROJECT_CONFIG_FILE))
            .context("Failed to load project configuration")?,
    };

    let mut overrides = serde_json::Map::new();
    if let Some(policy) = duplicates {
        overrides.insert("duplicate_policy".to_string(), serde_json::to_value(policy)?);
    }
    if let Some(prefix) = prefix {
        overrides.insert("metric_prefix".to_string(), serde_json::Value::String(prefix));
    }

    let config = builder
        .merge_value(serde_json::Value::Object(overrides))?
        .build();
    config.validate()?;
    Ok(config)
}

fn run_measures(
    report: &Path,
    project: &Path,
    config: &MapperConfig,
    output: OutputFormat,
) -> Result<()> {
    let analysis = read_report(report)
        .with_context(|| format!("Failed to read report {}", report.display()))?;
    let results = analysis
        .results()
        .with_context(|| format!("Invalid result in {}", report.display()))?;

    let files = ProjectFiles::scan(project, &config.exclude)
        .with_context(|| format!("Failed to index project {}", project.display()))?;
    info!("Indexed {} project files", files.len());

    let skipped_results = results
        .iter()
        .filter(|result| files.lookup(&result.file_name).is_none())
        .count();
    debug!("{} results refer to files outside the project", skipped_results);

    let mapper = MeasureMapper::new(config);
    let mut store = MeasureStore::with_policy(config.duplicate_policy);
    store
        .commit(mapper.save_measure(&results, &files))
        .context("Failed to save measures")?;
    store
        .commit(mapper.save_extra_measures(&results, &files))
        .context("Failed to save extra measures")?;

    let summary = MeasuresReport::new(report, &store, skipped_results);
    match output {
        OutputFormat::Human => print!("{}", summary.to_human()),
        OutputFormat::Json => println!("{}", summary.to_json()?),
    }
    Ok(())
}
