/*!
# Consolidation Analyzer

Static analyzer that finds adjacent statements which can be merged into a
simpler equivalent form, reports them with "fade-out" hints and rewrites them
on request. Works on a C#-like statement language.

## Rules

| Id     | Shape                                                     |
|--------|-----------------------------------------------------------|
| MRG001 | `if (a) { if (b) S }` -> `if (a && b) S`                  |
| MRG002 | `var x = E; return x;` -> `return E;`                     |
| MRG003 | `x = E; return x;` -> `return E;`                         |
| MRG004 | `if (c) return true; else return false;` -> `return c;`   |
| MRG005 | blank lines after `{` / before `}`                        |
| MRG006 | `async` + every exit `return await e;` -> return the task |

## Architecture

```text
Consolidation Analyzer
├── core        - errors, spans, line index, file reading
├── syntax      - lexer (logos), parser, arena tree with trivia, typed views
├── semantic    - symbol binding and local type inference
├── analyzer    - classifier, triviality gate, rule families, engine
├── rewrite     - planner, text edits, code fixer
├── diagnostics - descriptors and diagnostics
├── rules       - TOML/YAML rules configuration
└── reports     - text, JSON, SARIF
```

## Usage

```rust
use consolidation_analyzer::{analyze_source, fix_source};

let diagnostics = analyze_source("bool F(bool c) { if (c) return true; return false; }")?;
assert_eq!(diagnostics[0].rule_id, "MRG004");

let fixed = fix_source("bool F(bool c) { if (c) return true; return false; }")?;
assert_eq!(fixed, "bool F(bool c) { return c; }");
# Ok::<(), consolidation_analyzer::ConsolidationError>(())
```
*/

pub mod analyzer;
pub mod cli_common;
pub mod core;
pub mod diagnostics;
pub mod reports;
pub mod rewrite;
pub mod rules;
pub mod semantic;
pub mod syntax;

pub use analyzer::{AnalysisEngine, Candidate, CancellationToken, RuleFamily};
pub use core::{ConsolidationError, PackedSpan, Result};
pub use diagnostics::{Diagnostic, DiagnosticDescriptor, Location, Severity};
pub use reports::{AnalysisReport, ReportFormat};
pub use rewrite::{apply_edit, CodeFixer, Edit, Plan};
pub use rules::{BuiltinRules, RulesConfig};
pub use semantic::SemanticModel;
pub use syntax::{Document, SyntaxTree};

/// Анализ текста с правилами по умолчанию.
pub fn analyze_source(text: &str) -> Result<Vec<Diagnostic>> {
    let document = Document::parse(text)?;
    AnalysisEngine::new(RulesConfig::default()).analyze(&document, &CancellationToken::new())
}

/// Applies every rule until nothing is left to fix and returns the new text.
pub fn fix_source(text: &str) -> Result<String> {
    let engine = AnalysisEngine::new(RulesConfig::default());
    let document = Document::parse(text)?;
    let outcome = CodeFixer::new(&engine).fix_families(&document, engine.families(), &CancellationToken::new())?;
    Ok(outcome.document.text().to_string())
}
