//! Поиск исходных файлов `*.cs`.

use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::validate_path;

const SOURCE_EXTENSION: &str = "cs";

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(OsStr::new(SOURCE_EXTENSION)))
}

/// Files are taken as given; directories are walked recursively for `*.cs`,
/// skipping `bin`/`obj` build output and hidden directories.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for path in paths {
        validate_path(path, "Input path")?;
        if path.is_file() {
            sources.push(path.clone());
            continue;
        }
        let walker = WalkDir::new(path).follow_links(true).into_iter().filter_entry(|entry| {
            // корень обхода не фильтруем, даже если это "."
            entry.depth() == 0 || !is_skipped_dir(entry.path(), entry.file_type().is_dir())
        });
        for entry in walker.filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_source(entry.path()) {
                sources.push(entry.into_path());
            }
        }
    }
    sources.sort();
    sources.dedup();
    tracing::info!("Found {} source file(s)", sources.len());
    Ok(sources)
}

fn is_skipped_dir(path: &Path, is_dir: bool) -> bool {
    if !is_dir {
        return false;
    }
    match path.file_name().and_then(OsStr::to_str) {
        Some(name) => name.starts_with('.') || name == "bin" || name == "obj",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn walks_directories_for_cs_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/nested")).unwrap();
        std::fs::create_dir_all(root.join("obj")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        for file in ["src/A.cs", "src/nested/B.CS", "src/readme.md", "obj/Gen.cs", ".git/x.cs"] {
            std::fs::write(root.join(file), "").unwrap();
        }

        let found = collect_sources(&[root.to_path_buf()]).unwrap();
        let relative: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(relative, vec!["src/A.cs", "src/nested/B.CS"]);
    }

    #[test]
    fn explicit_files_are_kept_and_missing_paths_fail() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Script.txt");
        std::fs::write(&file, "").unwrap();
        assert_eq!(collect_sources(&[file.clone(), file.clone()]).unwrap(), vec![file]);
        assert!(collect_sources(&[dir.path().join("missing")]).is_err());
    }
}
