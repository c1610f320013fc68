/*!
# consolidate CLI

Command-line front end of the consolidation analyzer: `check` reports merge
opportunities, `fix` rewrites files in place, `rules` inspects configuration.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use consolidation_analyzer::cli_common::{
    self, collect_sources, CommonArgs, OutputArgs, OutputWriter, RuleArgs,
};
use consolidation_analyzer::reports::{self, AnalysisReport};
use consolidation_analyzer::{
    AnalysisEngine, BuiltinRules, CancellationToken, CodeFixer, Document, RulesConfig,
};

#[derive(Parser)]
#[command(
    name = "consolidate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Finds and fixes statements that can be merged into a simpler form"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Report consolidation opportunities
    Check {
        /// Files or directories (directories are searched for *.cs)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply fixes in place
    Fix {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect rules and configuration
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
}

#[derive(Subcommand)]
enum RulesCommands {
    /// List all rules with their effective state
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show rule details
    Show { rule_id: String },

    /// Create example configuration file
    Init {
        #[arg(short, long, default_value = "consolidate.toml")]
        output: PathBuf,
    },

    /// Validate rules configuration
    Validate {
        #[arg(short, long, default_value = "consolidate.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli_common::init_logging(cli.common.verbose, cli.common.quiet)?;

    match cli.command {
        Commands::Check { paths, rules, output } => check(&paths, &rules, &output, cli.common.quiet),
        Commands::Fix { paths, rules, dry_run } => fix(&paths, &rules, dry_run, cli.common.quiet),
        Commands::Rules { command } => rules_command(command).map(|_| ExitCode::SUCCESS),
    }
}

fn load_config(args: &RuleArgs) -> Result<RulesConfig> {
    let mut config = match &args.config {
        Some(path) => RulesConfig::load_from_file(path)?,
        None => RulesConfig::default(),
    };
    if !args.rules.is_empty() {
        config.restrict_to(&args.rules)?;
    }
    Ok(config)
}

/// Чтение и разбор файлов параллельно; ошибки возвращаются отдельно.
fn load_documents(paths: &[PathBuf]) -> (Vec<Document>, Vec<(String, String)>) {
    let loaded: Vec<_> = paths
        .par_iter()
        .map(|path| (path, Document::from_file(path)))
        .collect();
    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in loaded {
        match result {
            Ok(document) => documents.push(document),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Skipping file: {}", e);
                failures.push((path.display().to_string(), e.to_string()));
            }
        }
    }
    (documents, failures)
}

fn check(paths: &[PathBuf], rule_args: &RuleArgs, output: &OutputArgs, quiet: bool) -> Result<ExitCode> {
    let started = Instant::now();
    let engine = AnalysisEngine::new(load_config(rule_args)?);
    let sources = collect_sources(paths)?;
    let (documents, failures) = load_documents(&sources);

    let results = engine.analyze_documents(&documents, &CancellationToken::new())?;
    let mut report = AnalysisReport::default();
    for (document, diagnostics) in documents.iter().zip(results) {
        report.push(document.display_name(), diagnostics);
    }
    for (file, reason) in failures {
        report.push_failure(file, reason);
    }
    report.sort();

    let mut writer = OutputWriter::open(output.output.as_deref())?;
    let content = reports::generate(&report, output.format, writer.use_colors())?;
    writer.write_str(&content)?;

    if !quiet {
        tracing::info!(
            "Checked {} file(s) in {}",
            report.files_analyzed,
            cli_common::format_duration(started.elapsed())
        );
    }
    Ok(if report.has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn fix(paths: &[PathBuf], rule_args: &RuleArgs, dry_run: bool, quiet: bool) -> Result<ExitCode> {
    let engine = AnalysisEngine::new(load_config(rule_args)?);
    let sources = collect_sources(paths)?;
    let (documents, failures) = load_documents(&sources);
    let token = CancellationToken::new();

    let outcomes: Vec<_> = documents
        .par_iter()
        .map(|document| {
            CodeFixer::new(&engine)
                .fix_families(document, engine.families(), &token)
                .map(|outcome| (document, outcome))
        })
        .collect();

    let mut changed = 0;
    let mut failed = failures.len();
    for outcome in outcomes {
        let (document, outcome) = match outcome {
            Ok(pair) => pair,
            Err(e) => {
                cli_common::print_error(&e.to_string());
                failed += 1;
                continue;
            }
        };
        if outcome.applied == 0 {
            continue;
        }
        changed += 1;
        let name = document.display_name();
        if outcome.exhausted {
            cli_common::print_warning(&format!("{}: iteration limit reached, some fixes left", name));
        }
        if !dry_run {
            if let Some(path) = document.path() {
                write_source(path, outcome.document.text())?;
            }
        }
        if !quiet {
            println!("{} {} ({} fix(es))", if dry_run { "would fix" } else { "fixed" }.green(), name, outcome.applied);
        }
    }
    for (file, reason) in &failures {
        cli_common::print_error(&format!("{}: {}", file, reason));
    }
    if !quiet {
        cli_common::print_success(&format!("{} of {} file(s) changed", changed, documents.len()));
    }
    Ok(if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn write_source(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn rules_command(command: RulesCommands) -> Result<()> {
    match command {
        RulesCommands::List { config } => {
            let config = match config {
                Some(path) => RulesConfig::load_from_file(path)?,
                None => RulesConfig::default(),
            };
            println!("{}", "Available Rules".bold().cyan());
            for descriptor in BuiltinRules::descriptors() {
                let family = descriptor.family;
                let status = if config.is_enabled(family) { "enabled".green() } else { "disabled".red() };
                println!(
                    "  {} {:<8} {:<8} {}",
                    descriptor.id.bold(),
                    status,
                    config.severity(family).to_string(),
                    descriptor.title
                );
            }
        }
        RulesCommands::Show { rule_id } => {
            let descriptor = BuiltinRules::find(&rule_id)
                .with_context(|| format!("Unknown rule '{}'", rule_id))?;
            println!("{} - {}", descriptor.id.bold().cyan(), descriptor.title);
            println!("  Family:   {}", descriptor.family);
            println!("  Category: {}", descriptor.category);
            println!("  Severity: {}", descriptor.default_severity.to_string().yellow());
            println!("  Message:  {}", descriptor.message.dimmed());
            println!("  Fix:      {}", descriptor.help);
            println!("  Triggers: {:?}", descriptor.family.triggers());
        }
        RulesCommands::Init { output } => {
            RulesConfig::default().save_to_file(&output)?;
            cli_common::print_success(&format!("Rules configuration created: {}", output.display()));
        }
        RulesCommands::Validate { config } => {
            let rules_config = RulesConfig::load_from_file(&config)?;
            let warnings = rules_config.validate()?;
            if warnings.is_empty() {
                cli_common::print_success(&format!("{} is valid", config.display()));
            } else {
                for warning in warnings {
                    cli_common::print_warning(&warning);
                }
            }
        }
    }
    Ok(())
}
