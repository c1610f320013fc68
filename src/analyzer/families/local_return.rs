//! `var x = E; return x;` -> `return E;`.

use super::RuleFamily;
use crate::analyzer::classifier::{classify, next_statement, StatementShape};
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::analyzer::trivia::removed_text_is_trivial;
use crate::core::{ConsolidationError, PackedSpan, Result};
use crate::rewrite::{Edit, Plan};
use crate::syntax::nodes::{LocalDeclaration, ReturnStatement, VariableDeclarator};
use crate::syntax::NodeId;

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    if classify(tree, ctx.model, Some(anchor)) != StatementShape::LocalDeclarationSingleVariable {
        return None;
    }
    let declaration = LocalDeclaration::cast(tree, anchor)?;
    let declarator = declaration.declarators().into_iter().next()?;
    let initializer = declarator.initializer()?;
    let symbol = ctx.model.declared_symbol(declarator.id)?;

    let return_statement = next_statement(tree, anchor)?;
    match classify(tree, ctx.model, Some(return_statement)) {
        StatementShape::ReturnIdentifier(returned) if returned == symbol => {}
        _ => return None,
    }

    let span = tree.span(anchor).cover(tree.span(return_statement));
    if !removed_text_is_trivial(tree, span, &[tree.span(initializer)]) {
        return None;
    }
    Some(Candidate {
        family: RuleFamily::MergeLocalDeclarationWithReturn,
        anchor,
        span,
        data: CandidateData::LocalDeclarationReturn { declarator: declarator.id, return_statement },
        version: ctx.version(),
    })
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let tree = ctx.tree;
    let CandidateData::LocalDeclarationReturn { declarator, return_statement } = candidate.data else {
        return Err(ConsolidationError::invalid_argument("local-return plan needs local-return data"));
    };
    let declaration = LocalDeclaration::cast(tree, candidate.anchor)
        .ok_or_else(|| ConsolidationError::invalid_argument("anchor is not a local declaration"))?;
    let declarator = VariableDeclarator::cast(tree, declarator)
        .ok_or_else(|| ConsolidationError::invalid_argument("declarator node expected"))?;
    let returned = ReturnStatement::cast(tree, return_statement)
        .ok_or_else(|| ConsolidationError::invalid_argument("return statement expected"))?;
    let initializer = declarator
        .initializer()
        .ok_or_else(|| ConsolidationError::invalid_argument("declarator has no initializer"))?;

    let mut fade_out: Vec<PackedSpan> = Vec::new();
    if let Some(ty) = declaration.declared_type() {
        fade_out.push(tree.span(ty));
    }
    for token in [declarator.identifier(), declarator.equals_token(), declaration.semicolon()].into_iter().flatten() {
        fade_out.push(tree.token_span(token));
    }
    if let Some(expr) = returned.expression() {
        fade_out.push(tree.span(expr));
    }
    fade_out.sort();

    let span = tree.span(candidate.anchor).cover(tree.span(return_statement));
    Ok(Plan {
        family: RuleFamily::MergeLocalDeclarationWithReturn,
        edit: Edit::ReplaceNode { span, text: format!("return {};", tree.node_text(initializer)) },
        fade_out,
        version: candidate.version,
    })
}
