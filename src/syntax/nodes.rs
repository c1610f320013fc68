/*!
# Typed node views

Thin `Copy` wrappers over `(tree, NodeId)` that name the parts of a construct.
A view is obtained with `cast`, which checks the node kind; accessors return
`None` for optional or missing parts instead of failing.
*/

use super::kinds::{SyntaxKind, TokenKind};
use super::tree::{NodeId, SyntaxTree, TokenId};

macro_rules! node_view {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            pub tree: &'a SyntaxTree,
            pub id: NodeId,
        }

        impl<'a> $name<'a> {
            pub fn cast(tree: &'a SyntaxTree, id: NodeId) -> Option<Self> {
                matches!(tree.kind(id), $(SyntaxKind::$kind)|+).then_some(Self { tree, id })
            }

            pub fn text(&self) -> &'a str { self.tree.node_text(self.id) }
        }
    };
}

node_view!(IfStatement, IfStatement);
node_view!(ElseClause, ElseClause);
node_view!(Block, Block);
node_view!(LocalDeclaration, LocalDeclarationStatement);
node_view!(VariableDeclarator, VariableDeclarator);
node_view!(ReturnStatement, ReturnStatement);
node_view!(ExpressionStatement, ExpressionStatement);
node_view!(AssignmentExpression, AssignmentExpression);
node_view!(BinaryExpression, BinaryExpression);
node_view!(AwaitExpression, AwaitExpression);
node_view!(InvocationExpression, InvocationExpression);
node_view!(MemberAccess, MemberAccessExpression);
node_view!(DoStatement, DoStatement);
node_view!(SwitchStatement, SwitchStatement);
node_view!(SwitchSection, SwitchSection);
node_view!(
    /// Method, local function or lambda.
    MethodLike,
    MethodDeclaration | LocalFunctionStatement | LambdaExpression
);
node_view!(
    /// Узлы со списком операторов в фигурных скобках.
    BracedContainer,
    Block | ClassDeclaration | SwitchStatement
);

impl<'a> IfStatement<'a> {
    pub fn if_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::IfKeyword) }
    pub fn open_paren(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::OpenParen) }
    pub fn close_paren(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::CloseParen) }
    pub fn condition(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn statement(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 1) }

    pub fn else_clause(&self) -> Option<ElseClause<'a>> {
        self.tree
            .child_node(self.id, SyntaxKind::ElseClause)
            .and_then(|id| ElseClause::cast(self.tree, id))
    }

    /// `else if`: this if is the statement of an else clause.
    pub fn is_else_if(&self) -> bool {
        self.tree
            .parent(self.id)
            .is_some_and(|p| self.tree.kind(p) == SyntaxKind::ElseClause)
    }
}

impl<'a> ElseClause<'a> {
    pub fn else_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::ElseKeyword) }
    pub fn statement(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
}

impl<'a> Block<'a> {
    pub fn open_brace(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::OpenBrace) }
    pub fn close_brace(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::CloseBrace) }
    pub fn statements(&self) -> impl Iterator<Item = NodeId> + 'a { self.tree.child_nodes(self.id) }
    pub fn statement_count(&self) -> usize { self.statements().count() }
}

impl<'a> BracedContainer<'a> {
    pub fn open_brace(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::OpenBrace) }
    pub fn close_brace(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::CloseBrace) }
}

impl<'a> LocalDeclaration<'a> {
    pub fn const_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::ConstKeyword) }
    pub fn is_const(&self) -> bool { self.const_keyword().is_some() }
    pub fn semicolon(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::Semicolon) }

    fn declaration(&self) -> Option<NodeId> {
        self.tree.child_node(self.id, SyntaxKind::VariableDeclaration)
    }

    pub fn declared_type(&self) -> Option<NodeId> {
        self.declaration().and_then(|d| self.tree.child_node(d, SyntaxKind::Type))
    }

    pub fn declarators(&self) -> Vec<VariableDeclarator<'a>> {
        let tree = self.tree;
        self.declaration()
            .map(|d| {
                tree.child_nodes(d)
                    .filter_map(|n| VariableDeclarator::cast(tree, n))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<'a> VariableDeclarator<'a> {
    pub fn identifier(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::Identifier) }

    pub fn name(&self) -> Option<&'a str> { self.identifier().map(|t| self.tree.token_text(t)) }

    fn equals_value(&self) -> Option<NodeId> { self.tree.child_node(self.id, SyntaxKind::EqualsValueClause) }

    pub fn equals_token(&self) -> Option<TokenId> {
        self.equals_value().and_then(|e| self.tree.child_token(e, TokenKind::Equals))
    }

    pub fn initializer(&self) -> Option<NodeId> {
        self.equals_value().and_then(|e| self.tree.nth_child_node(e, 0))
    }
}

impl<'a> ReturnStatement<'a> {
    pub fn return_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::ReturnKeyword) }
    pub fn expression(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn semicolon(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::Semicolon) }
}

impl<'a> ExpressionStatement<'a> {
    pub fn expression(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn semicolon(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::Semicolon) }
}

impl<'a> AssignmentExpression<'a> {
    pub fn left(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn right(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 1) }

    pub fn operator(&self) -> Option<TokenId> {
        self.tree
            .child_tokens(self.id)
            .find(|t| self.tree.token_kind(*t).is_assignment_operator())
    }

    pub fn is_simple(&self) -> bool {
        self.operator().is_some_and(|t| self.tree.token_kind(t) == TokenKind::Equals)
    }
}

impl<'a> BinaryExpression<'a> {
    pub fn left(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn right(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 1) }
    pub fn operator(&self) -> Option<TokenId> { self.tree.child_tokens(self.id).next() }
    pub fn operator_kind(&self) -> Option<TokenKind> { self.operator().map(|t| self.tree.token_kind(t)) }
}

impl<'a> AwaitExpression<'a> {
    pub fn await_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::AwaitKeyword) }
    pub fn operand(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
}

impl<'a> InvocationExpression<'a> {
    pub fn callee(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }

    pub fn argument_list(&self) -> Option<NodeId> { self.tree.child_node(self.id, SyntaxKind::ArgumentList) }

    pub fn arguments(&self) -> Vec<NodeId> {
        self.argument_list()
            .map(|list| {
                self.tree
                    .child_nodes(list)
                    .filter_map(|arg| self.tree.nth_child_node(arg, 0))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<'a> MemberAccess<'a> {
    pub fn receiver(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn dot(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::Dot) }

    pub fn name(&self) -> Option<&'a str> {
        self.tree.nth_child_node(self.id, 1).map(|n| self.tree.node_text(n))
    }
}

impl<'a> DoStatement<'a> {
    pub fn body(&self) -> Option<NodeId> { self.tree.nth_child_node(self.id, 0) }
    pub fn while_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::WhileKeyword) }
}

impl<'a> SwitchStatement<'a> {
    pub fn sections(&self) -> impl Iterator<Item = SwitchSection<'a>> + 'a {
        let tree = self.tree;
        tree.child_nodes(self.id).filter_map(move |n| SwitchSection::cast(tree, n))
    }

    pub fn has_default(&self) -> bool {
        self.sections().any(|s| s.has_default_label())
    }
}

impl<'a> SwitchSection<'a> {
    pub fn has_default_label(&self) -> bool {
        self.tree.child_node(self.id, SyntaxKind::DefaultSwitchLabel).is_some()
    }

    pub fn statements(&self) -> impl Iterator<Item = NodeId> + 'a {
        let tree = self.tree;
        tree.child_nodes(self.id).filter(move |n| tree.kind(*n).is_statement())
    }
}

impl<'a> MethodLike<'a> {
    pub fn is_lambda(&self) -> bool { self.tree.kind(self.id) == SyntaxKind::LambdaExpression }

    pub fn async_keyword(&self) -> Option<TokenId> { self.tree.child_token(self.id, TokenKind::AsyncKeyword) }

    pub fn name(&self) -> Option<&'a str> {
        self.tree.child_token(self.id, TokenKind::Identifier).map(|t| self.tree.token_text(t))
    }

    /// Declared return type (methods and local functions only).
    pub fn return_type(&self) -> Option<NodeId> { self.tree.child_node(self.id, SyntaxKind::Type) }

    pub fn parameters(&self) -> Vec<NodeId> {
        if let Some(list) = self.tree.child_node(self.id, SyntaxKind::ParameterList) {
            return self.tree.child_nodes(list).collect();
        }
        // `x => ...`
        self.tree.child_node(self.id, SyntaxKind::Parameter).into_iter().collect()
    }

    pub fn block_body(&self) -> Option<NodeId> { self.tree.child_node(self.id, SyntaxKind::Block) }

    /// Тело-выражение: `=> expr` у метода или выражение лямбды.
    pub fn expression_body(&self) -> Option<NodeId> {
        if self.is_lambda() {
            return self
                .tree
                .child_nodes(self.id)
                .last()
                .filter(|n| self.tree.kind(*n).is_expression());
        }
        self.tree
            .child_node(self.id, SyntaxKind::ArrowExpressionClause)
            .and_then(|clause| self.tree.nth_child_node(clause, 0))
    }
}

/// Снимает скобки: `((x))` -> `x`.
pub fn skip_parentheses(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while tree.kind(id) == SyntaxKind::ParenthesizedExpression {
        match tree.nth_child_node(id, 0) {
            Some(inner) => id = inner,
            None => break,
        }
    }
    id
}

/// Значение литерала `true`/`false`, если узел является таким литералом.
pub fn bool_literal(tree: &SyntaxTree, id: NodeId) -> Option<bool> {
    if tree.kind(id) != SyntaxKind::LiteralExpression {
        return None;
    }
    match tree.token_kind(tree.first_token(id)) {
        TokenKind::TrueKeyword => Some(true),
        TokenKind::FalseKeyword => Some(false),
        _ => None,
    }
}

/// Имя идентификатора для `IdentifierName`.
pub fn identifier_text(tree: &SyntaxTree, id: NodeId) -> Option<&str> {
    (tree.kind(id) == SyntaxKind::IdentifierName).then(|| tree.node_text(id))
}
