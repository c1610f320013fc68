//! Fixture snapshots: every `tests/fixtures/fix/*.cs` fixed with default rules
//! must equal its `*.fixed.cs` neighbour.
//! Set env UPDATE_SNAPSHOTS=1 to regenerate.
use std::{fs, path::Path};
use consolidation_analyzer::{analyze_source, fix_source};

fn fixture_dir() -> &'static str { "tests/fixtures/fix" }

fn is_input(path: &Path) -> bool {
    let name = path.file_name().unwrap().to_string_lossy();
    name.ends_with(".cs") && !name.ends_with(".fixed.cs")
}

#[test]
fn fix_snapshots() {
    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.to_lowercase() == "true").unwrap_or(false);
    let dir = Path::new(fixture_dir());

    let mut checked = 0;
    let mut failures = Vec::new();
    let mut entries: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    entries.sort();
    for path in entries {
        if path.is_dir() || !is_input(&path) { continue; }
        let source = fs::read_to_string(&path).unwrap();
        let fixed = fix_source(&source).unwrap();
        let snap_path = path.with_extension("fixed.cs");
        checked += 1;
        if update {
            fs::write(&snap_path, &fixed).unwrap();
            continue;
        }
        if !snap_path.exists() { failures.push(format!("missing snapshot: {}", snap_path.display())); continue; }
        let expected = fs::read_to_string(&snap_path).unwrap();
        if expected != fixed {
            failures.push(format!("diff in {}\n--- expected\n{}\n--- actual\n{}", snap_path.display(), expected, fixed));
        }
        // исправленный файл больше ничего не предлагает
        let left = analyze_source(&fixed).unwrap();
        if !left.is_empty() {
            failures.push(format!("{} still has {} diagnostic(s)", path.display(), left.len()));
        }
    }
    assert!(checked > 0, "no fixtures in {}", fixture_dir());
    if !failures.is_empty() { panic!("Snapshot mismatches:\n{}", failures.join("\n")); }
}
