//! `if (a) { if (b) S }` -> `if (a && b) S`.

use super::RuleFamily;
use crate::analyzer::classifier::{classify, is_simple_if, single_statement, StatementShape};
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::analyzer::trivia::{block_braces_are_trivial, span_is_trivial};
use crate::core::{ConsolidationError, PackedSpan, Result};
use crate::rewrite::text::{line_indent, operand_for_and, reindent};
use crate::rewrite::{Edit, Plan};
use crate::syntax::nodes::{BinaryExpression, IfStatement};
use crate::syntax::{NodeId, SyntaxKind, TokenKind};

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    if !is_simple_if(tree, anchor) {
        return None;
    }
    let outer = IfStatement::cast(tree, anchor)?;
    let outer_statement = outer.statement()?;
    if classify(tree, ctx.model, Some(outer_statement)) != StatementShape::SingleNestedIf {
        return None;
    }
    let inner_id = single_statement(tree, outer_statement)?;
    let inner = IfStatement::cast(tree, inner_id)?;
    let inner_condition = inner.condition()?;
    let is_or = BinaryExpression::cast(tree, inner_condition)
        .is_some_and(|b| b.operator_kind() == Some(TokenKind::BarBar));
    if is_or {
        return None;
    }

    // удаляемый текст: от `)` внешнего if до `)` вложенного
    let outer_close = tree.token_span(outer.close_paren()?);
    let inner_close = tree.token_span(inner.close_paren()?);
    if !span_is_trivial(tree, PackedSpan::from_bounds(outer_close.end(), inner_close.end())) {
        return None;
    }
    if tree.kind(outer_statement) == SyntaxKind::Block && !block_braces_are_trivial(tree, outer_statement) {
        return None;
    }
    // хвост после тела вложенного if тоже удаляется
    let body_end = tree.span(inner.statement()?).end();
    if !span_is_trivial(tree, PackedSpan::from_bounds(body_end, tree.span(outer_statement).end())) {
        return None;
    }

    let header_start = tree.token_span(outer.if_keyword()?).start;
    Some(Candidate {
        family: RuleFamily::MergeNestedIf,
        anchor,
        span: PackedSpan::from_bounds(header_start, inner_close.end()),
        data: CandidateData::NestedIf { inner: inner_id },
        version: ctx.version(),
    })
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let tree = ctx.tree;
    let CandidateData::NestedIf { inner } = candidate.data else {
        return Err(ConsolidationError::invalid_argument("nested-if plan needs nested-if data"));
    };
    let outer = IfStatement::cast(tree, candidate.anchor)
        .ok_or_else(|| ConsolidationError::invalid_argument("anchor is not an if statement"))?;
    let inner_if = IfStatement::cast(tree, inner)
        .ok_or_else(|| ConsolidationError::invalid_argument("nested statement is not an if statement"))?;
    let missing = || ConsolidationError::invalid_argument("if statement is incomplete");

    let left = operand_for_and(tree, outer.condition().ok_or_else(missing)?);
    let right = operand_for_and(tree, inner_if.condition().ok_or_else(missing)?);
    let body = inner_if.statement().ok_or_else(missing)?;

    let text = tree.text();
    let outer_span = tree.span(candidate.anchor);
    let inner_span = tree.span(inner);
    let outer_indent = line_indent(text, outer_span.start);
    let inner_indent = line_indent(text, inner_span.start);
    let same_line = tree.line_of(outer_span.start) == tree.line_of(inner_span.start);
    let delta = if !same_line && inner_indent.starts_with(outer_indent) {
        inner_indent.len() - outer_indent.len()
    } else {
        0
    };
    // хвост вложенного if после `)` сохраняет его переносы и стиль скобок
    let inner_close = inner_if.close_paren().ok_or_else(missing)?;
    let tail = &text[tree.token_span(inner_close).end() as usize..tree.span(body).end() as usize];
    let tail = reindent(tail, delta);

    let mut fade_out = Vec::new();
    if let Some(block) = outer.statement().filter(|s| tree.kind(*s) == SyntaxKind::Block) {
        fade_out.push(tree.token_span(tree.first_token(block)));
        fade_out.push(tree.token_span(tree.last_token(block)));
    }
    for token in [inner_if.if_keyword(), inner_if.open_paren(), inner_if.close_paren()].into_iter().flatten() {
        fade_out.push(tree.token_span(token));
    }
    fade_out.sort();

    Ok(Plan {
        family: RuleFamily::MergeNestedIf,
        edit: Edit::ReplaceNode { span: outer_span, text: format!("if ({left} && {right}){tail}") },
        fade_out,
        version: candidate.version,
    })
}
