//! Command-line arguments for the `enrich` binary.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use enrich_core::TargetField;

use crate::config::{CliConfig, LogOutput, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "enrich",
    version,
    about = "Upload a company list, map its columns, and follow the enrichment job",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand; they override the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (ron)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Enrichment server, e.g. http://127.0.0.1:8000
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Where downloaded results are written
    #[arg(long, value_name = "DIR", global = true)]
    pub output: Option<PathBuf>,

    /// Log destination
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogOutput>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn apply_to(&self, config: &mut CliConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(log) = self.log {
            config.log_output = log;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file, submit its column mapping, follow progress, download the result
    Run(RunArgs),
    /// Show a job's status as reported by the server
    Status(JobArgs),
    /// List the jobs the server knows about
    Jobs,
    /// Delete a job and its files on the server
    Delete(JobArgs),
    /// Download a finished job's result
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV or Excel file to enrich
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Override the suggested target of a column, e.g. --map "Pays=country"
    #[arg(long = "map", value_name = "SOURCE=TARGET", value_parser = parse_mapping)]
    pub mappings: Vec<(String, TargetField)>,
}

#[derive(Args, Debug)]
pub struct JobArgs {
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    /// Name of the uploaded file, used to name the result
    #[arg(value_name = "FILENAME")]
    pub filename: String,
}

/// Parse `SOURCE=TARGET`. The last `=` splits, so column names may contain `=`.
pub fn parse_mapping(raw: &str) -> Result<(String, TargetField), String> {
    let (source, target) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SOURCE=TARGET, got {raw:?}"))?;
    if source.is_empty() {
        return Err(format!("missing source column in {raw:?}"));
    }
    let target = target.parse::<TargetField>().map_err(|err| err.to_string())?;
    Ok((source.to_string(), target))
}
