//! Вывод отчёта в stdout или файл

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

pub struct OutputWriter {
    writer: Box<dyn Write>,
    is_terminal: bool,
}

impl OutputWriter {
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let is_terminal = stdout.is_terminal();
        Self { writer: Box::new(stdout), is_terminal }
    }

    pub fn file(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self { writer: Box::new(file), is_terminal: false })
    }

    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::file(path),
            None => Ok(Self::stdout()),
        }
    }

    /// Цвета только для терминала
    pub fn use_colors(&self) -> bool {
        self.is_terminal
    }

    pub fn write_str(&mut self, content: &str) -> Result<()> {
        self.writer.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_writer_appends_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut writer = OutputWriter::open(Some(&path)).unwrap();
        assert!(!writer.use_colors());
        writer.write_str("{}").unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
