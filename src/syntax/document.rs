//! Снимок документа: путь, текст, дерево и номер версии.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::parser::parse;
use super::tree::SyntaxTree;
use crate::core::{read_source_file, Result};

/// Immutable document snapshot. Every edit produces a new snapshot with `version + 1`.
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    tree: Arc<SyntaxTree>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_versioned(text, 0)
    }

    pub fn parse_versioned(text: &str, version: u64) -> Result<Self> {
        let tree = parse(text, version)?;
        Ok(Self { path: None, tree: Arc::new(tree) })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = read_source_file(path)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "parsing source file");
        Ok(Self::parse(&text)?.with_path(path))
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Новый снимок с изменённым текстом (версия + 1).
    pub fn with_text(&self, text: &str) -> Result<Self> {
        let tree = parse(text, self.version() + 1)?;
        Ok(Self { path: self.path.clone(), tree: Arc::new(tree) })
    }

    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }
    pub fn text(&self) -> &str { self.tree.text() }
    pub fn tree(&self) -> &SyntaxTree { &self.tree }
    pub fn version(&self) -> u64 { self.tree.version() }

    /// Имя для отчётов: путь, если известен.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn with_text_bumps_version() {
        let doc = Document::parse("void M() { }").unwrap();
        assert_eq!(doc.version(), 0);
        let next = doc.with_text("void M() { return; }").unwrap();
        assert_eq!(next.version(), 1);
        assert_eq!(doc.text(), "void M() { }");
    }

    #[test]
    fn from_file_keeps_path() {
        let mut file = tempfile::Builder::new().suffix(".cs").tempfile().unwrap();
        write!(file, "int F() => 1;").unwrap();
        let doc = Document::from_file(file.path()).unwrap();
        assert_eq!(doc.path(), Some(file.path()));
        assert!(doc.display_name().ends_with(".cs"));
    }
}
