/*!
# Lexer

Splits source text into significant tokens and trivia using `logos`.

Trivia attachment follows the usual convention for trivia-preserving trees:
a token owns as *trailing* trivia everything on its own line up to and including
the first end-of-line; all remaining trivia becomes *leading* trivia of the
next significant token. The synthetic end-of-file token receives whatever is
left at the end of the text.
*/

use logos::Logos;
use std::ops::Range;

use super::kinds::{TokenKind, TriviaKind};
use crate::core::{ConsolidationError, LineIndex, PackedSpan, Result};

/// Фрагмент тривии (пробелы, переводы строк, комментарии).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaPiece {
    pub kind: TriviaKind,
    pub span: PackedSpan,
}

/// Significant token with indices into the shared trivia list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedToken {
    pub kind: TokenKind,
    pub span: PackedSpan,
    pub leading: Range<u32>,
    pub trailing: Range<u32>,
}

#[derive(Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<LexedToken>,
    pub trivia: Vec<TriviaPiece>,
}

pub fn lex(text: &str) -> Result<Lexed> {
    let mut raw: Vec<(TokenKind, PackedSpan)> = Vec::new();
    let mut lexer = TokenKind::lexer(text);
    while let Some(item) = lexer.next() {
        let range = lexer.span();
        let span = PackedSpan::from_bounds(range.start as u32, range.end as u32);
        match item {
            Ok(kind) => raw.push((kind, span)),
            Err(()) => {
                let position = LineIndex::new(text).to_position(span.start);
                let message = if lexer.slice().starts_with("/*") {
                    "unterminated comment".to_string()
                } else {
                    format!("unexpected character '{}'", lexer.slice())
                };
                return Err(ConsolidationError::Parse { message, position });
            }
        }
    }

    let mut out = Lexed::default();
    let mut i = 0;
    while i < raw.len() {
        // ведущая тривия
        let leading_start = out.trivia.len() as u32;
        while let Some(kind) = raw.get(i).and_then(|(k, _)| k.trivia_kind()) {
            out.trivia.push(TriviaPiece { kind, span: raw[i].1 });
            i += 1;
        }
        let leading = leading_start..out.trivia.len() as u32;
        let Some(&(kind, span)) = raw.get(i) else {
            push_end_of_file(&mut out, text, leading);
            return Ok(out);
        };
        i += 1;

        // хвостовая тривия: до первого перевода строки включительно
        let trailing_start = out.trivia.len() as u32;
        while let Some(trivia_kind) = raw.get(i).and_then(|(k, _)| k.trivia_kind()) {
            out.trivia.push(TriviaPiece { kind: trivia_kind, span: raw[i].1 });
            i += 1;
            if trivia_kind == TriviaKind::EndOfLine {
                break;
            }
        }
        let trailing = trailing_start..out.trivia.len() as u32;
        out.tokens.push(LexedToken { kind, span, leading, trailing });
    }
    let at = out.trivia.len() as u32;
    push_end_of_file(&mut out, text, at..at);
    Ok(out)
}

fn push_end_of_file(out: &mut Lexed, text: &str, leading: Range<u32>) {
    let end = text.len() as u32;
    let at = out.trivia.len() as u32;
    out.tokens.push(LexedToken {
        kind: TokenKind::EndOfFile,
        span: PackedSpan::new(end, 0),
        leading,
        trailing: at..at,
    });
}
