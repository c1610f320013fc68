/*!
Redundant `async`/`await`: a function whose every exit is `return await e;`
(or whose expression body is a single `await e`) can return the task directly.

Conditions:
- the function carries the `async` modifier;
- the body ends in `return await`, or in an `if`/`else` or a `switch` with a
  `default` section whose branches all end that way;
- those terminal returns hold every `await` and every `return` of the function
  (nested lambdas and local functions are not inspected);
- the removed `async`/`await` keywords and `.ConfigureAwait(..)` calls carry no
  comments;
- the awaited operand, with a trailing `.ConfigureAwait(<bool>)` stripped, has
  exactly the declared return type (lambdas: any task-like type).
*/

use super::RuleFamily;
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::analyzer::pool::Pooled;
use crate::analyzer::trivia::span_is_trivial;
use crate::analyzer::walkers::{AwaitWalker, ReturnWalker};
use crate::core::{ConsolidationError, PackedSpan, Result};
use crate::rewrite::text::remove_ranges;
use crate::rewrite::{Edit, Plan};
use crate::semantic::TypeRef;
use crate::syntax::nodes::{
    bool_literal, AwaitExpression, Block, IfStatement, InvocationExpression, MemberAccess, MethodLike,
    ReturnStatement, SwitchStatement,
};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, TokenId};

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    let function = MethodLike::cast(tree, anchor)?;
    let async_keyword = function.async_keyword()?;

    let mut await_walker = Pooled::<AwaitWalker>::new();
    let awaits = await_walker.collect(tree, anchor).to_vec();
    if awaits.is_empty() {
        return None;
    }

    if let Some(body) = function.block_body() {
        let mut return_walker = Pooled::<ReturnWalker>::new();
        let returns = return_walker.collect(tree, anchor);
        if returns.len() != awaits.len() {
            return None;
        }
        // каждый await обязан стоять в конечном `return await`
        let mut terminal = Vec::new();
        if !collect_terminal_awaits(tree, body, &mut terminal) {
            return None;
        }
        let mut sorted = awaits.clone();
        sorted.sort();
        terminal.sort();
        if terminal != sorted {
            return None;
        }
    } else {
        let body = function.expression_body()?;
        if awaits.len() != 1 || awaits[0] != body {
            return None;
        }
    }

    let declared = match function.return_type() {
        Some(ty) => Some(TypeRef::from_syntax(tree, ty)?),
        None => None,
    };
    for await_expr in &awaits {
        let operand = AwaitExpression::cast(tree, *await_expr)?.operand()?;
        let (task, _) = strip_configure_await(tree, operand);
        let ty = ctx.model.type_of(task)?;
        let matches = match &declared {
            Some(declared) => declared.is_task_like() && *declared == ty,
            None => ty.is_task_like(),
        };
        if !matches {
            return None;
        }
    }

    // удаляемые `async`, `await` и `.ConfigureAwait(..)` не должны нести комментариев
    let (removed, _) = removed_ranges(tree, async_keyword, &awaits).ok()?;
    if !removed.into_iter().all(|range| span_is_trivial(tree, range)) {
        return None;
    }

    Some(Candidate {
        family: RuleFamily::RemoveRedundantAsyncAwait,
        anchor,
        span: tree.token_span(async_keyword),
        data: CandidateData::RedundantAsyncAwait { async_keyword, awaits },
        version: ctx.version(),
    })
}

/// Every path through `stmt` ends in `return await ...`; the awaited
/// expressions of those returns are pushed to `out`.
fn collect_terminal_awaits(tree: &SyntaxTree, stmt: NodeId, out: &mut Vec<NodeId>) -> bool {
    match tree.kind(stmt) {
        SyntaxKind::Block => Block::cast(tree, stmt)
            .and_then(|b| b.statements().last())
            .is_some_and(|last| collect_terminal_awaits(tree, last, out)),
        SyntaxKind::ReturnStatement => {
            match ReturnStatement::cast(tree, stmt).and_then(|r| r.expression()) {
                Some(e) if tree.kind(e) == SyntaxKind::AwaitExpression => {
                    out.push(e);
                    true
                }
                _ => false,
            }
        }
        SyntaxKind::IfStatement => {
            let Some(statement) = IfStatement::cast(tree, stmt) else { return false };
            let Some(otherwise) = statement.else_clause().and_then(|e| e.statement()) else { return false };
            statement.statement().is_some_and(|s| collect_terminal_awaits(tree, s, out))
                && collect_terminal_awaits(tree, otherwise, out)
        }
        SyntaxKind::SwitchStatement => {
            let Some(switch) = SwitchStatement::cast(tree, stmt) else { return false };
            switch.has_default()
                && switch
                    .sections()
                    .all(|section| section.statements().last().is_some_and(|s| collect_terminal_awaits(tree, s, out)))
        }
        _ => false,
    }
}

/// `e.ConfigureAwait(true|false)` -> (`e`, диапазон `.ConfigureAwait(..)`).
fn strip_configure_await(tree: &SyntaxTree, expr: NodeId) -> (NodeId, Option<PackedSpan>) {
    let stripped = InvocationExpression::cast(tree, expr).and_then(|invocation| {
        let access = MemberAccess::cast(tree, invocation.callee()?)?;
        if access.name()? != "ConfigureAwait" {
            return None;
        }
        let arguments = invocation.arguments();
        if arguments.len() != 1 || bool_literal(tree, arguments[0]).is_none() {
            return None;
        }
        let receiver = access.receiver()?;
        Some((receiver, PackedSpan::from_bounds(tree.span(receiver).end(), tree.span(expr).end())))
    });
    match stripped {
        Some((receiver, range)) => (receiver, Some(range)),
        None => (expr, None),
    }
}

/// Удаляемые диапазоны (с хвостовой тривией) и диапазоны затухания.
fn removed_ranges(
    tree: &SyntaxTree,
    async_keyword: TokenId,
    awaits: &[NodeId],
) -> Result<(Vec<PackedSpan>, Vec<PackedSpan>)> {
    let mut removed = vec![tree.token_span_with_trailing(async_keyword)];
    let mut fade_out = vec![tree.token_span(async_keyword)];
    for await_expr in awaits {
        let expr = AwaitExpression::cast(tree, *await_expr)
            .ok_or_else(|| ConsolidationError::invalid_argument("await expression expected"))?;
        let keyword = expr
            .await_keyword()
            .ok_or_else(|| ConsolidationError::invalid_argument("await keyword missing"))?;
        removed.push(tree.token_span_with_trailing(keyword));
        fade_out.push(tree.token_span(keyword));
        if let Some(operand) = expr.operand() {
            if let (_, Some(configure)) = strip_configure_await(tree, operand) {
                removed.push(configure);
                fade_out.push(configure);
            }
        }
    }
    fade_out.sort();
    Ok((removed, fade_out))
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let tree = ctx.tree;
    let CandidateData::RedundantAsyncAwait { async_keyword, awaits } = &candidate.data else {
        return Err(ConsolidationError::invalid_argument("async/await plan needs async/await data"));
    };
    let (removed, fade_out) = removed_ranges(tree, *async_keyword, awaits)?;
    let span = tree.span(candidate.anchor);
    Ok(Plan {
        family: RuleFamily::RemoveRedundantAsyncAwait,
        edit: Edit::ReplaceNode { span, text: remove_ranges(tree.text(), span, &removed) },
        fade_out,
        version: candidate.version,
    })
}
