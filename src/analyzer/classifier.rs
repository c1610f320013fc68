/*!
# Node Classifier

Maps a statement to one of a closed set of shapes. Pure and total: an absent
node or a node that is not a statement classifies as [`StatementShape::Other`].
A block with exactly one statement classifies as that statement, so
`{ return true; }` and `return true;` are the same shape.
*/

use crate::semantic::{SemanticModel, SymbolId};
use crate::syntax::nodes::{bool_literal, Block, IfStatement, LocalDeclaration, ReturnStatement};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementShape {
    /// Пустой блок или блок из нескольких операторов.
    Block,
    ReturnLiteralTrue,
    ReturnLiteralFalse,
    /// `return x;`, где `x` - локальная переменная или параметр по значению той же функции.
    ReturnIdentifier(SymbolId),
    /// `if` без `else`.
    SingleNestedIf,
    LocalDeclarationSingleVariable,
    /// `return await e;` или `await e;`.
    AwaitTerminal,
    Other,
}

pub fn classify(tree: &SyntaxTree, model: &SemanticModel<'_>, stmt: Option<NodeId>) -> StatementShape {
    let Some(stmt) = stmt else {
        return StatementShape::Other;
    };
    match tree.kind(stmt) {
        SyntaxKind::Block => match single_statement(tree, stmt) {
            Some(inner) if inner != stmt => classify(tree, model, Some(inner)),
            _ => StatementShape::Block,
        },
        SyntaxKind::ReturnStatement => classify_return(tree, model, stmt),
        SyntaxKind::IfStatement if is_simple_if(tree, stmt) => StatementShape::SingleNestedIf,
        SyntaxKind::LocalDeclarationStatement => {
            let Some(decl) = LocalDeclaration::cast(tree, stmt) else {
                return StatementShape::Other;
            };
            let declarators = decl.declarators();
            if !decl.is_const() && declarators.len() == 1 && declarators[0].initializer().is_some() {
                StatementShape::LocalDeclarationSingleVariable
            } else {
                StatementShape::Other
            }
        }
        SyntaxKind::ExpressionStatement => {
            let is_await = tree
                .nth_child_node(stmt, 0)
                .is_some_and(|e| tree.kind(e) == SyntaxKind::AwaitExpression);
            if is_await { StatementShape::AwaitTerminal } else { StatementShape::Other }
        }
        _ => StatementShape::Other,
    }
}

fn classify_return(tree: &SyntaxTree, model: &SemanticModel<'_>, stmt: NodeId) -> StatementShape {
    let Some(expr) = ReturnStatement::cast(tree, stmt).and_then(|r| r.expression()) else {
        return StatementShape::Other;
    };
    match tree.kind(expr) {
        SyntaxKind::LiteralExpression => match bool_literal(tree, expr) {
            Some(true) => StatementShape::ReturnLiteralTrue,
            Some(false) => StatementShape::ReturnLiteralFalse,
            None => StatementShape::Other,
        },
        SyntaxKind::AwaitExpression => StatementShape::AwaitTerminal,
        SyntaxKind::IdentifierName => {
            let Some(symbol) = model.symbol_info(expr) else {
                return StatementShape::Other;
            };
            let info = model.symbol(symbol);
            let same_function = info.container.is_some() && info.container == model.containing_function(stmt);
            if info.is_local_or_value_parameter() && same_function {
                StatementShape::ReturnIdentifier(symbol)
            } else {
                StatementShape::Other
            }
        }
        _ => StatementShape::Other,
    }
}

/// Оператор, если это не блок, или единственный оператор блока.
pub fn single_statement(tree: &SyntaxTree, stmt: NodeId) -> Option<NodeId> {
    match Block::cast(tree, stmt) {
        Some(block) => {
            let mut statements = block.statements();
            let first = statements.next()?;
            statements.next().is_none().then_some(first)
        }
        None => tree.kind(stmt).is_statement().then_some(stmt),
    }
}

/// `if` без `else`, который сам не является `else if`.
pub fn is_simple_if(tree: &SyntaxTree, stmt: NodeId) -> bool {
    IfStatement::cast(tree, stmt).is_some_and(|s| s.else_clause().is_none() && !s.is_else_if())
}

/// `if`, стоящий непосредственно в списке операторов (есть соседи по списку).
pub fn is_isolated_if(tree: &SyntaxTree, stmt: NodeId) -> bool {
    tree.kind(stmt) == SyntaxKind::IfStatement
        && tree.parent(stmt).is_some_and(|p| tree.kind(p).is_statement_list())
}

/// Следующий оператор в том же списке операторов.
pub fn next_statement(tree: &SyntaxTree, stmt: NodeId) -> Option<NodeId> {
    let parent = tree.parent(stmt)?;
    if !tree.kind(parent).is_statement_list() {
        return None;
    }
    tree.next_sibling(stmt).filter(|n| tree.kind(*n).is_statement())
}
