/*!
# Rewrite planning

Turns a validated [`Candidate`] into a [`Plan`]: one text edit plus the spans
an editor should render faded. Plans are always computed against a single
snapshot; a document, model or candidate from another version is rejected with
[`ConsolidationError::StaleSnapshot`].
*/

use serde::Serialize;

use crate::analyzer::context::{Candidate, RuleContext};
use crate::analyzer::RuleFamily;
use crate::core::{ConsolidationError, PackedSpan, Result};
use crate::semantic::SemanticModel;
use crate::syntax::Document;

pub mod fixer;
pub mod text;

pub use fixer::CodeFixer;

/// Single edit produced by a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// Замена текста узла (или смежных узлов) целиком.
    ReplaceNode { span: PackedSpan, text: String },
    /// Literal splice at a byte offset.
    Splice { offset: u32, len: u32, text: String },
}

impl Edit {
    /// Заменяемый диапазон.
    pub fn range(&self) -> PackedSpan {
        match self {
            Edit::ReplaceNode { span, .. } => *span,
            Edit::Splice { offset, len, .. } => PackedSpan::new(*offset, *len),
        }
    }

    pub fn new_text(&self) -> &str {
        match self {
            Edit::ReplaceNode { text, .. } | Edit::Splice { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub family: RuleFamily,
    pub edit: Edit,
    /// Ordered by position.
    pub fade_out: Vec<PackedSpan>,
    pub version: u64,
}

/// Применяет правку к тексту документа.
pub fn apply_edit(text: &str, edit: &Edit) -> Result<String> {
    let range = edit.range();
    let (start, end) = (range.start as usize, range.end() as usize);
    if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(ConsolidationError::invalid_argument(format!(
            "edit range {}..{} is outside of the document ({} bytes)",
            start,
            end,
            text.len()
        )));
    }
    let replacement = edit.new_text();
    let mut out = String::with_capacity(text.len() - (end - start) + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    Ok(out)
}

/// Computes the edit for `candidate`; every input must belong to the same snapshot.
pub fn plan(document: &Document, model: &SemanticModel<'_>, candidate: &Candidate) -> Result<Plan> {
    ConsolidationError::ensure_version(model.version(), document.version())?;
    ConsolidationError::ensure_version(candidate.version, document.version())?;
    let ctx = RuleContext::new(model);
    let plan = candidate.family.plan(&ctx, candidate)?;
    tracing::trace!(
        rule = candidate.family.rule_id(),
        range = ?plan.edit.range(),
        fade_out = plan.fade_out.len(),
        "planned rewrite"
    );
    Ok(plan)
}
