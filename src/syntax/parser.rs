/*!
# Parser

Recursive descent over the token stream produced by [`lex`](super::lexer::lex).
Ambiguities (local declaration vs. expression, lambda vs. parenthesized
expression, generic type arguments vs. `<`) are resolved by pure lookahead over
token kinds; the parser never backtracks in the builder.

Binary, postfix and assignment expressions are wrapped retroactively with
[`TreeBuilder::start_node_at`].
*/

use std::sync::Arc;

use super::kinds::{SyntaxKind, TokenKind};
use super::lexer::lex;
use super::tree::{SyntaxTree, TreeBuilder};
use crate::core::{ConsolidationError, LineIndex, Result};

/// Разбирает текст в дерево, помечая его номером версии снимка.
pub fn parse(text: &str, version: u64) -> Result<SyntaxTree> {
    let text: Arc<str> = Arc::from(text);
    let lexed = lex(&text)?;
    let mut parser = Parser::new(TreeBuilder::new(text.clone(), lexed));
    parser.compilation_unit()?;
    parser
        .builder
        .finish(version)
        .ok_or_else(|| ConsolidationError::Parse {
            message: "empty syntax tree".to_string(),
            position: crate::core::Position::zero(),
        })
}

struct Parser {
    builder: TreeBuilder,
    kinds: Vec<TokenKind>,
    pos: usize,
}

impl Parser {
    fn new(builder: TreeBuilder) -> Self {
        let kinds = builder.token_kinds();
        Self { builder, kinds, pos: 0 }
    }

    // ---- токенный курсор ----

    fn nth(&self, n: usize) -> TokenKind {
        self.kinds
            .get(self.pos + n)
            .copied()
            .unwrap_or(TokenKind::EndOfFile)
    }

    fn current(&self) -> TokenKind { self.nth(0) }

    fn at(&self, kind: TokenKind) -> bool { self.current() == kind }

    fn kind_at(&self, index: usize) -> TokenKind {
        self.kinds.get(index).copied().unwrap_or(TokenKind::EndOfFile)
    }

    fn bump(&mut self) {
        if self.pos < self.kinds.len() {
            self.builder.bump();
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.current())))
        }
    }

    fn error(&self, message: String) -> ConsolidationError {
        let offset = self.builder.token_start(self.pos);
        let position = LineIndex::new(self.builder.text()).to_position(offset);
        ConsolidationError::Parse { message, position }
    }

    fn node<F>(&mut self, kind: SyntaxKind, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.builder.start_node(kind);
        body(self)?;
        self.builder.finish_node();
        Ok(())
    }

    // ---- объявления ----

    fn compilation_unit(&mut self) -> Result<()> {
        self.builder.start_node(SyntaxKind::CompilationUnit);
        while !self.at(TokenKind::EndOfFile) {
            self.member()?;
        }
        self.bump();
        self.builder.finish_node();
        Ok(())
    }

    fn member(&mut self) -> Result<()> {
        let mut i = self.pos;
        while self.kind_at(i).is_modifier() {
            i += 1;
        }
        if self.kind_at(i) == TokenKind::ClassKeyword {
            self.class_declaration()
        } else {
            self.function(SyntaxKind::MethodDeclaration)
        }
    }

    fn class_declaration(&mut self) -> Result<()> {
        self.node(SyntaxKind::ClassDeclaration, |p| {
            while p.current().is_modifier() {
                p.bump();
            }
            p.expect(TokenKind::ClassKeyword)?;
            p.expect(TokenKind::Identifier)?;
            p.expect(TokenKind::OpenBrace)?;
            while !p.at(TokenKind::CloseBrace) && !p.at(TokenKind::EndOfFile) {
                p.member()?;
            }
            p.expect(TokenKind::CloseBrace)
        })
    }

    /// Метод или локальная функция: модификаторы, тип, имя, параметры, тело.
    fn function(&mut self, kind: SyntaxKind) -> Result<()> {
        self.node(kind, |p| {
            while p.current().is_modifier() {
                p.bump();
            }
            p.type_syntax()?;
            p.expect(TokenKind::Identifier)?;
            p.parameter_list()?;
            p.function_body()
        })
    }

    fn function_body(&mut self) -> Result<()> {
        if self.at(TokenKind::OpenBrace) {
            self.block()
        } else if self.at(TokenKind::FatArrow) {
            self.node(SyntaxKind::ArrowExpressionClause, |p| {
                p.bump();
                p.expression()
            })?;
            self.expect(TokenKind::Semicolon)
        } else {
            Err(self.error(format!("expected method body, found {:?}", self.current())))
        }
    }

    fn parameter_list(&mut self) -> Result<()> {
        self.node(SyntaxKind::ParameterList, |p| {
            p.expect(TokenKind::OpenParen)?;
            if !p.at(TokenKind::CloseParen) {
                p.parameter()?;
                while p.eat(TokenKind::Comma) {
                    p.parameter()?;
                }
            }
            p.expect(TokenKind::CloseParen)
        })
    }

    fn parameter(&mut self) -> Result<()> {
        self.node(SyntaxKind::Parameter, |p| {
            if p.current().is_parameter_modifier() {
                p.bump();
            }
            // нетипизированный параметр лямбды: `(a, b) => ...`
            let untyped = p.at(TokenKind::Identifier)
                && matches!(p.nth(1), TokenKind::Comma | TokenKind::CloseParen);
            if !untyped {
                p.type_syntax()?;
            }
            p.expect(TokenKind::Identifier)
        })
    }

    fn type_syntax(&mut self) -> Result<()> {
        let Some(end) = self.scan_type(self.pos) else {
            return Err(self.error(format!("expected type, found {:?}", self.current())));
        };
        self.node(SyntaxKind::Type, |p| {
            if p.current().is_predefined_type() {
                p.bump();
            } else {
                p.expect(TokenKind::Identifier)?;
                while p.at(TokenKind::Dot) {
                    p.bump();
                    p.expect(TokenKind::Identifier)?;
                }
            }
            if p.pos < end && p.at(TokenKind::LessThan) {
                p.node(SyntaxKind::TypeArgumentList, |p| {
                    p.bump();
                    p.type_syntax()?;
                    while p.eat(TokenKind::Comma) {
                        p.type_syntax()?;
                    }
                    p.expect(TokenKind::GreaterThan)
                })?;
            }
            if p.pos < end && p.at(TokenKind::Question) {
                p.bump();
            }
            while p.pos < end && p.at(TokenKind::OpenBracket) {
                p.bump();
                p.expect(TokenKind::CloseBracket)?;
            }
            Ok(())
        })
    }

    // ---- lookahead ----

    /// Индекс токена сразу за типом, начинающимся в `i`, если там вообще тип.
    fn scan_type(&self, i: usize) -> Option<usize> {
        let mut j = i;
        match self.kind_at(j) {
            k if k.is_predefined_type() => j += 1,
            TokenKind::Identifier => {
                j += 1;
                while self.kind_at(j) == TokenKind::Dot && self.kind_at(j + 1) == TokenKind::Identifier {
                    j += 2;
                }
            }
            _ => return None,
        }
        if self.kind_at(j) == TokenKind::LessThan {
            if let Some(after) = self.scan_type_arguments(j) {
                j = after;
            }
        }
        if self.kind_at(j) == TokenKind::Question {
            j += 1;
        }
        while self.kind_at(j) == TokenKind::OpenBracket && self.kind_at(j + 1) == TokenKind::CloseBracket {
            j += 2;
        }
        Some(j)
    }

    fn scan_type_arguments(&self, open: usize) -> Option<usize> {
        let mut j = self.scan_type(open + 1)?;
        while self.kind_at(j) == TokenKind::Comma {
            j = self.scan_type(j + 1)?;
        }
        (self.kind_at(j) == TokenKind::GreaterThan).then_some(j + 1)
    }

    fn looks_like_local_declaration(&self) -> bool {
        let Some(j) = self.scan_type(self.pos) else {
            return false;
        };
        self.kind_at(j) == TokenKind::Identifier
            && matches!(
                self.kind_at(j + 1),
                TokenKind::Equals | TokenKind::Semicolon | TokenKind::Comma
            )
    }

    fn looks_like_local_function(&self) -> bool {
        let mut i = self.pos;
        while matches!(self.kind_at(i), TokenKind::AsyncKeyword | TokenKind::StaticKeyword) {
            i += 1;
        }
        let Some(j) = self.scan_type(i) else {
            return false;
        };
        self.kind_at(j) == TokenKind::Identifier && self.kind_at(j + 1) == TokenKind::OpenParen
    }

    fn looks_like_lambda(&self) -> bool {
        let mut i = self.pos;
        if self.kind_at(i) == TokenKind::AsyncKeyword {
            i += 1;
        }
        match self.kind_at(i) {
            TokenKind::Identifier => self.kind_at(i + 1) == TokenKind::FatArrow,
            TokenKind::OpenParen => {
                let mut depth = 0usize;
                let mut j = i;
                loop {
                    match self.kind_at(j) {
                        TokenKind::OpenParen => depth += 1,
                        TokenKind::CloseParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self.kind_at(j + 1) == TokenKind::FatArrow;
                            }
                        }
                        TokenKind::EndOfFile | TokenKind::Semicolon | TokenKind::OpenBrace => return false,
                        _ => {}
                    }
                    j += 1;
                }
            }
            _ => false,
        }
    }

    // ---- операторы ----

    fn statement(&mut self) -> Result<()> {
        match self.current() {
            TokenKind::OpenBrace => self.block(),
            TokenKind::Semicolon => self.node(SyntaxKind::EmptyStatement, |p| {
                p.bump();
                Ok(())
            }),
            TokenKind::ReturnKeyword => self.jump_with_expression(SyntaxKind::ReturnStatement),
            TokenKind::ThrowKeyword => self.jump_with_expression(SyntaxKind::ThrowStatement),
            TokenKind::BreakKeyword => self.node(SyntaxKind::BreakStatement, |p| {
                p.bump();
                p.expect(TokenKind::Semicolon)
            }),
            TokenKind::ContinueKeyword => self.node(SyntaxKind::ContinueStatement, |p| {
                p.bump();
                p.expect(TokenKind::Semicolon)
            }),
            TokenKind::IfKeyword => self.if_statement(),
            TokenKind::WhileKeyword => self.node(SyntaxKind::WhileStatement, |p| {
                p.bump();
                p.parenthesized_condition()?;
                p.statement()
            }),
            TokenKind::DoKeyword => self.node(SyntaxKind::DoStatement, |p| {
                p.bump();
                p.statement()?;
                p.expect(TokenKind::WhileKeyword)?;
                p.parenthesized_condition()?;
                p.expect(TokenKind::Semicolon)
            }),
            TokenKind::SwitchKeyword => self.switch_statement(),
            TokenKind::ConstKeyword => self.local_declaration(),
            _ if self.looks_like_local_function() => self.function(SyntaxKind::LocalFunctionStatement),
            _ if self.looks_like_local_declaration() => self.local_declaration(),
            _ => self.node(SyntaxKind::ExpressionStatement, |p| {
                p.expression()?;
                p.expect(TokenKind::Semicolon)
            }),
        }
    }

    fn block(&mut self) -> Result<()> {
        self.node(SyntaxKind::Block, |p| {
            p.expect(TokenKind::OpenBrace)?;
            while !p.at(TokenKind::CloseBrace) && !p.at(TokenKind::EndOfFile) {
                p.statement()?;
            }
            p.expect(TokenKind::CloseBrace)
        })
    }

    fn jump_with_expression(&mut self, kind: SyntaxKind) -> Result<()> {
        self.node(kind, |p| {
            p.bump();
            if !p.at(TokenKind::Semicolon) {
                p.expression()?;
            }
            p.expect(TokenKind::Semicolon)
        })
    }

    fn parenthesized_condition(&mut self) -> Result<()> {
        self.expect(TokenKind::OpenParen)?;
        self.expression()?;
        self.expect(TokenKind::CloseParen)
    }

    fn if_statement(&mut self) -> Result<()> {
        self.node(SyntaxKind::IfStatement, |p| {
            p.expect(TokenKind::IfKeyword)?;
            p.parenthesized_condition()?;
            p.statement()?;
            if p.at(TokenKind::ElseKeyword) {
                p.node(SyntaxKind::ElseClause, |p| {
                    p.bump();
                    p.statement()
                })?;
            }
            Ok(())
        })
    }

    fn switch_statement(&mut self) -> Result<()> {
        self.node(SyntaxKind::SwitchStatement, |p| {
            p.bump();
            p.parenthesized_condition()?;
            p.expect(TokenKind::OpenBrace)?;
            while !p.at(TokenKind::CloseBrace) && !p.at(TokenKind::EndOfFile) {
                p.switch_section()?;
            }
            p.expect(TokenKind::CloseBrace)
        })
    }

    fn at_switch_label(&self) -> bool {
        self.at(TokenKind::CaseKeyword)
            || (self.at(TokenKind::DefaultKeyword) && self.nth(1) == TokenKind::Colon)
    }

    fn switch_section(&mut self) -> Result<()> {
        if !self.at_switch_label() {
            return Err(self.error(format!("expected switch label, found {:?}", self.current())));
        }
        self.node(SyntaxKind::SwitchSection, |p| {
            while p.at_switch_label() {
                if p.at(TokenKind::CaseKeyword) {
                    p.node(SyntaxKind::CaseSwitchLabel, |p| {
                        p.bump();
                        p.expression()?;
                        p.expect(TokenKind::Colon)
                    })?;
                } else {
                    p.node(SyntaxKind::DefaultSwitchLabel, |p| {
                        p.bump();
                        p.expect(TokenKind::Colon)
                    })?;
                }
            }
            while !p.at_switch_label() && !p.at(TokenKind::CloseBrace) && !p.at(TokenKind::EndOfFile) {
                p.statement()?;
            }
            Ok(())
        })
    }

    fn local_declaration(&mut self) -> Result<()> {
        self.node(SyntaxKind::LocalDeclarationStatement, |p| {
            p.eat(TokenKind::ConstKeyword);
            p.node(SyntaxKind::VariableDeclaration, |p| {
                p.type_syntax()?;
                p.variable_declarator()?;
                while p.eat(TokenKind::Comma) {
                    p.variable_declarator()?;
                }
                Ok(())
            })?;
            p.expect(TokenKind::Semicolon)
        })
    }

    fn variable_declarator(&mut self) -> Result<()> {
        self.node(SyntaxKind::VariableDeclarator, |p| {
            p.expect(TokenKind::Identifier)?;
            if p.at(TokenKind::Equals) {
                p.node(SyntaxKind::EqualsValueClause, |p| {
                    p.bump();
                    p.expression()
                })?;
            }
            Ok(())
        })
    }

    // ---- выражения ----

    fn expression(&mut self) -> Result<()> {
        if self.looks_like_lambda() {
            return self.lambda();
        }
        let cp = self.builder.checkpoint();
        self.conditional()?;
        if self.current().is_assignment_operator() {
            self.builder.start_node_at(cp, SyntaxKind::AssignmentExpression);
            self.bump();
            self.expression()?;
            self.builder.finish_node();
        }
        Ok(())
    }

    fn lambda(&mut self) -> Result<()> {
        self.node(SyntaxKind::LambdaExpression, |p| {
            p.eat(TokenKind::AsyncKeyword);
            if p.at(TokenKind::Identifier) {
                p.node(SyntaxKind::Parameter, |p| p.expect(TokenKind::Identifier))?;
            } else {
                p.parameter_list()?;
            }
            p.expect(TokenKind::FatArrow)?;
            if p.at(TokenKind::OpenBrace) {
                p.block()
            } else {
                p.expression()
            }
        })
    }

    fn conditional(&mut self) -> Result<()> {
        let cp = self.builder.checkpoint();
        self.binary(1)?;
        if self.at(TokenKind::Question) {
            self.builder.start_node_at(cp, SyntaxKind::ConditionalExpression);
            self.bump();
            self.expression()?;
            self.expect(TokenKind::Colon)?;
            self.expression()?;
            self.builder.finish_node();
        }
        Ok(())
    }

    /// Precedence climbing; `??` is right-associative, everything else left.
    fn binary(&mut self, min_precedence: u8) -> Result<()> {
        let cp = self.builder.checkpoint();
        self.unary()?;
        while let Some(precedence) = self.current().binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            let right_min = if self.at(TokenKind::QuestionQuestion) { precedence } else { precedence + 1 };
            self.builder.start_node_at(cp, SyntaxKind::BinaryExpression);
            self.bump();
            self.binary(right_min)?;
            self.builder.finish_node();
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<()> {
        match self.current() {
            TokenKind::Exclamation
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => self.node(SyntaxKind::PrefixUnaryExpression, |p| {
                p.bump();
                p.unary()
            }),
            TokenKind::AwaitKeyword => self.node(SyntaxKind::AwaitExpression, |p| {
                p.bump();
                p.unary()
            }),
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<()> {
        let cp = self.builder.checkpoint();
        self.primary()?;
        loop {
            match self.current() {
                TokenKind::Dot => {
                    self.builder.start_node_at(cp, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.node(SyntaxKind::IdentifierName, |p| p.expect(TokenKind::Identifier))?;
                    self.builder.finish_node();
                }
                TokenKind::OpenParen => {
                    self.builder.start_node_at(cp, SyntaxKind::InvocationExpression);
                    self.argument_list(SyntaxKind::ArgumentList, TokenKind::OpenParen, TokenKind::CloseParen)?;
                    self.builder.finish_node();
                }
                TokenKind::OpenBracket => {
                    self.builder.start_node_at(cp, SyntaxKind::ElementAccessExpression);
                    self.argument_list(
                        SyntaxKind::BracketedArgumentList,
                        TokenKind::OpenBracket,
                        TokenKind::CloseBracket,
                    )?;
                    self.builder.finish_node();
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    self.builder.start_node_at(cp, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                    self.builder.finish_node();
                }
                _ => return Ok(()),
            }
        }
    }

    fn argument_list(&mut self, kind: SyntaxKind, open: TokenKind, close: TokenKind) -> Result<()> {
        self.node(kind, |p| {
            p.expect(open)?;
            if !p.at(close) {
                p.argument()?;
                while p.eat(TokenKind::Comma) {
                    p.argument()?;
                }
            }
            p.expect(close)
        })
    }

    fn argument(&mut self) -> Result<()> {
        self.node(SyntaxKind::Argument, |p| {
            if matches!(p.current(), TokenKind::RefKeyword | TokenKind::OutKeyword | TokenKind::InKeyword) {
                p.bump();
            }
            p.expression()
        })
    }

    fn primary(&mut self) -> Result<()> {
        match self.current() {
            TokenKind::Identifier => self.node(SyntaxKind::IdentifierName, |p| {
                p.bump();
                Ok(())
            }),
            k if k.is_literal() => self.node(SyntaxKind::LiteralExpression, |p| {
                p.bump();
                Ok(())
            }),
            k if k.is_predefined_type() => self.node(SyntaxKind::PredefinedType, |p| {
                p.bump();
                Ok(())
            }),
            TokenKind::OpenParen => self.node(SyntaxKind::ParenthesizedExpression, |p| {
                p.bump();
                p.expression()?;
                p.expect(TokenKind::CloseParen)
            }),
            TokenKind::NewKeyword => self.node(SyntaxKind::ObjectCreationExpression, |p| {
                p.bump();
                p.type_syntax()?;
                if p.at(TokenKind::OpenParen) {
                    p.argument_list(SyntaxKind::ArgumentList, TokenKind::OpenParen, TokenKind::CloseParen)?;
                }
                Ok(())
            }),
            other => Err(self.error(format!("expected expression, found {:?}", other))),
        }
    }
}
