/*!
# Syntax

Lexer, arena-backed syntax tree, typed node views and document snapshots for the
analysed C#-like language. Trees are immutable after construction; every edit
produces a new [`Document`] with a higher version.
*/

pub mod document;
pub mod kinds;
pub mod lexer;
pub mod nodes;
pub mod parser;
pub mod tree;
pub mod walk;

pub use document::Document;
pub use kinds::{SyntaxKind, TokenKind, TriviaKind};
pub use lexer::TriviaPiece;
pub use parser::parse;
pub use tree::{NodeId, SyntaxElement, SyntaxTree, TokenId};
pub use walk::{preorder, walk, VisitControl, Visitor};
