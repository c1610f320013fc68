//! Общие аргументы командной строки

use clap::Args;
use std::path::PathBuf;

use crate::reports::ReportFormat;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Rules configuration file (TOML or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run only these rules (repeatable, e.g. --rule MRG001)
    #[arg(short, long = "rule", value_name = "ID")]
    pub rules: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
