//! `x = E; return x;` -> `return E;` for locals and by-value parameters not captured by closures.

use super::RuleFamily;
use crate::analyzer::classifier::{classify, next_statement, StatementShape};
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::analyzer::pool::Pooled;
use crate::analyzer::trivia::removed_text_is_trivial;
use crate::analyzer::walkers::CaptureWalker;
use crate::core::{ConsolidationError, Result};
use crate::rewrite::{Edit, Plan};
use crate::syntax::nodes::{AssignmentExpression, ExpressionStatement, ReturnStatement};
use crate::syntax::{NodeId, SyntaxKind};

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    let statement = ExpressionStatement::cast(tree, anchor)?;
    let assignment = AssignmentExpression::cast(tree, statement.expression()?)?;
    if !assignment.is_simple() {
        return None;
    }
    let target = assignment.left()?;
    if tree.kind(target) != SyntaxKind::IdentifierName {
        return None;
    }
    let value = assignment.right()?;
    let symbol = ctx.model.symbol_info(target)?;

    let return_statement = next_statement(tree, anchor)?;
    // ReturnIdentifier уже гарантирует локальную переменную или параметр по значению той же функции
    match classify(tree, ctx.model, Some(return_statement)) {
        StatementShape::ReturnIdentifier(returned) if returned == symbol => {}
        _ => return None,
    }

    let function = ctx.model.containing_function(anchor)?;
    let mut captures = Pooled::<CaptureWalker>::new();
    if captures.is_captured(ctx.model, function, symbol) {
        return None;
    }

    let span = tree.span(anchor).cover(tree.span(return_statement));
    if !removed_text_is_trivial(tree, span, &[tree.span(value)]) {
        return None;
    }
    Some(Candidate {
        family: RuleFamily::MergeAssignmentWithReturn,
        anchor,
        span,
        data: CandidateData::AssignmentReturn { assignment: assignment.id, return_statement },
        version: ctx.version(),
    })
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let tree = ctx.tree;
    let CandidateData::AssignmentReturn { assignment, return_statement } = candidate.data else {
        return Err(ConsolidationError::invalid_argument("assignment-return plan needs assignment-return data"));
    };
    let statement = ExpressionStatement::cast(tree, candidate.anchor)
        .ok_or_else(|| ConsolidationError::invalid_argument("anchor is not an expression statement"))?;
    let assignment = AssignmentExpression::cast(tree, assignment)
        .ok_or_else(|| ConsolidationError::invalid_argument("assignment expression expected"))?;
    let returned = ReturnStatement::cast(tree, return_statement)
        .ok_or_else(|| ConsolidationError::invalid_argument("return statement expected"))?;
    let value = assignment
        .right()
        .ok_or_else(|| ConsolidationError::invalid_argument("assignment has no value"))?;

    let mut fade_out = Vec::new();
    if let Some(target) = assignment.left() {
        fade_out.push(tree.span(target));
    }
    for token in [assignment.operator(), statement.semicolon()].into_iter().flatten() {
        fade_out.push(tree.token_span(token));
    }
    if let Some(expr) = returned.expression() {
        fade_out.push(tree.span(expr));
    }
    fade_out.sort();

    let span = tree.span(candidate.anchor).cover(tree.span(return_statement));
    Ok(Plan {
        family: RuleFamily::MergeAssignmentWithReturn,
        edit: Edit::ReplaceNode { span, text: format!("return {};", tree.node_text(value)) },
        fade_out,
        version: candidate.version,
    })
}
