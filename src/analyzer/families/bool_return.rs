//! `if (c) return true; else return false;` -> `return c;`
//!
//! Также вариант без `else`, когда за `if` следует `return` с противоположным литералом.

use super::RuleFamily;
use crate::analyzer::classifier::{classify, is_isolated_if, next_statement, StatementShape};
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::analyzer::trivia::removed_text_is_trivial;
use crate::core::{ConsolidationError, Result};
use crate::rewrite::text::negate;
use crate::rewrite::{Edit, Plan};
use crate::syntax::nodes::IfStatement;
use crate::syntax::NodeId;

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    let statement = IfStatement::cast(tree, anchor)?;
    let condition = statement.condition()?;
    let when_true = classify(tree, ctx.model, statement.statement());

    let (when_false, last) = match statement.else_clause() {
        Some(else_clause) => {
            let else_statement = else_clause.statement()?;
            (classify(tree, ctx.model, Some(else_statement)), else_statement)
        }
        None => {
            if !is_isolated_if(tree, anchor) {
                return None;
            }
            let next = next_statement(tree, anchor)?;
            (classify(tree, ctx.model, Some(next)), next)
        }
    };

    let negate = match (when_true, when_false) {
        (StatementShape::ReturnLiteralTrue, StatementShape::ReturnLiteralFalse) => false,
        (StatementShape::ReturnLiteralFalse, StatementShape::ReturnLiteralTrue) => true,
        _ => return None,
    };

    let span = tree.span(anchor).cover(tree.span(last));
    if !removed_text_is_trivial(tree, span, &[tree.span(condition)]) {
        return None;
    }
    Some(Candidate {
        family: RuleFamily::SimplifyIfToReturn,
        anchor,
        span,
        data: CandidateData::IfToReturn { condition, negate, last },
        version: ctx.version(),
    })
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let tree = ctx.tree;
    let CandidateData::IfToReturn { condition, negate: negated, last } = candidate.data else {
        return Err(ConsolidationError::invalid_argument("if-return plan needs if-return data"));
    };
    let expression = if negated { negate(tree, condition) } else { tree.node_text(condition).to_string() };
    Ok(Plan {
        family: RuleFamily::SimplifyIfToReturn,
        edit: Edit::ReplaceNode {
            span: tree.span(candidate.anchor).cover(tree.span(last)),
            text: format!("return {expression};"),
        },
        fade_out: Vec::new(),
        version: candidate.version,
    })
}
