//! Общий модуль для CLI
//!
//! Инициализация логирования, поиск исходных файлов, форматирование вывода.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;
pub mod sources;

pub use args::{CommonArgs, OutputArgs, RuleArgs};
pub use output::OutputWriter;
pub use sources::collect_sources;

/// Инициализирует логирование: `RUST_LOG` имеет приоритет над флагами.
pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "ok".green().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "warning".yellow().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error".red().bold(), message);
}

/// Проверяет существование файла или директории
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!("{} does not exist: {}", description, path.display()));
    }
    Ok(())
}

/// Форматирует продолжительность в человекочитаемый вид
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        use std::time::Duration;

        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1250)), "1.250s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn missing_path_is_reported() {
        let err = validate_path(Path::new("/definitely/not/here"), "Input").unwrap_err();
        assert_eq!(err.to_string(), "Input does not exist: /definitely/not/here");
    }
}
