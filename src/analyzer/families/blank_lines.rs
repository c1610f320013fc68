//! Пустые строки сразу после `{` и сразу перед `}`, а также между `}` и `while` у `do`.

use super::RuleFamily;
use crate::analyzer::context::{Candidate, CandidateData, RuleContext};
use crate::core::{ConsolidationError, PackedSpan, Result};
use crate::rewrite::{Edit, Plan};
use crate::syntax::nodes::{BracedContainer, DoStatement};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, TokenId, TriviaKind, TriviaPiece};

/// Complete lines (ending in an end-of-line) of a trivia list, with a blank flag.
fn trivia_lines(pieces: &[TriviaPiece]) -> Vec<(PackedSpan, bool)> {
    let mut lines = Vec::new();
    let mut start = None;
    let mut blank = true;
    for piece in pieces {
        let line_start = *start.get_or_insert(piece.span.start);
        if piece.kind.is_comment() {
            blank = false;
        }
        if piece.kind == TriviaKind::EndOfLine {
            lines.push((PackedSpan::from_bounds(line_start, piece.span.end()), blank));
            start = None;
            blank = true;
        }
    }
    lines
}

fn ends_line(tree: &SyntaxTree, token: TokenId) -> bool {
    tree.trailing_trivia(token)
        .last()
        .is_some_and(|piece| piece.kind == TriviaKind::EndOfLine)
}

fn cover(lines: &[(PackedSpan, bool)]) -> Option<PackedSpan> {
    let first = lines.first()?.0;
    let last = lines.last()?.0;
    Some(first.cover(last))
}

/// Пустые строки в начале ведущей тривии токена, следующего за `token`.
fn blank_lines_after(tree: &SyntaxTree, token: TokenId) -> Option<PackedSpan> {
    if !ends_line(tree, token) {
        return None;
    }
    let next = tree.next_token(token)?;
    let lines = trivia_lines(tree.leading_trivia(next));
    let run: Vec<_> = lines.into_iter().take_while(|(_, blank)| *blank).collect();
    cover(&run)
}

/// Пустые строки в конце ведущей тривии `token`.
fn blank_lines_before(tree: &SyntaxTree, token: TokenId) -> Option<PackedSpan> {
    let previous = tree.prev_token(token)?;
    if !ends_line(tree, previous) {
        return None;
    }
    let lines = trivia_lines(tree.leading_trivia(token));
    let mut run: Vec<_> = lines.into_iter().rev().take_while(|(_, blank)| *blank).collect();
    run.reverse();
    cover(&run)
}

pub(super) fn find(ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
    let tree = ctx.tree;
    let mut removals = Vec::new();
    if tree.kind(anchor) == SyntaxKind::DoStatement {
        let do_statement = DoStatement::cast(tree, anchor)?;
        let body = do_statement.body().filter(|b| tree.kind(*b) == SyntaxKind::Block)?;
        let close = tree.last_token(body);
        let while_keyword = do_statement.while_keyword()?;
        // `} while (...)` на одной строке не трогаем
        if tree.line_of(tree.token_span(close).start) == tree.line_of(tree.token_span(while_keyword).start) {
            return None;
        }
        removals.extend(blank_lines_after(tree, close));
    } else {
        let container = BracedContainer::cast(tree, anchor)?;
        let open = container.open_brace()?;
        let close = container.close_brace()?;
        removals.extend(blank_lines_after(tree, open));
        if let Some(before) = blank_lines_before(tree, close) {
            // пустой блок: обе проверки видят одни и те же строки
            if !removals.iter().any(|r: &PackedSpan| r.intersects(before)) {
                removals.push(before);
            }
        }
    }
    let span = *removals.first()?;
    Some(Candidate {
        family: RuleFamily::RemoveRedundantBlankLine,
        anchor,
        span,
        data: CandidateData::BlankLines { removals },
        version: ctx.version(),
    })
}

pub(super) fn plan(ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
    let CandidateData::BlankLines { removals } = &candidate.data else {
        return Err(ConsolidationError::invalid_argument("blank-line plan needs blank-line data"));
    };
    let mut removals = removals.clone();
    removals.sort();
    let (Some(first), Some(last)) = (removals.first().copied(), removals.last().copied()) else {
        return Err(ConsolidationError::invalid_argument("blank-line candidate without removals"));
    };
    // одна склейка: сохраняем текст между удаляемыми участками
    let kept = &ctx.tree.text()[first.end() as usize..last.start.max(first.end()) as usize];
    let covered = first.cover(last);
    Ok(Plan {
        family: RuleFamily::RemoveRedundantBlankLine,
        edit: Edit::Splice {
            offset: covered.start,
            len: covered.len,
            text: if removals.len() > 1 { kept.to_string() } else { String::new() },
        },
        fade_out: removals,
        version: candidate.version,
    })
}
