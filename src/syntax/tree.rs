//! Неизменяемое дерево синтаксиса на арене.
//!
//! Узлы и токены адресуются через `NodeId` / `TokenId`. Ссылки на родителя служат
//! только для навигации: дерево после построения не изменяется, любая правка
//! порождает новый снимок документа.

use std::ops::Range;
use std::sync::Arc;

use super::kinds::{SyntaxKind, TokenKind};
use super::lexer::{Lexed, TriviaPiece};
use crate::core::{LineIndex, PackedSpan};

/// Устойчивый идентификатор узла внутри одного дерева.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Идентификатор токена; токены хранятся в порядке следования в тексте.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone)]
pub struct TokenData {
    pub kind: TokenKind,
    pub span: PackedSpan,
    pub leading: Range<u32>,
    pub trailing: Range<u32>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub parent: Option<NodeId>,
    pub children: Vec<SyntaxElement>,
    pub first_token: TokenId,
    pub last_token: TokenId,
    /// Значимый диапазон: от начала первого токена до конца последнего.
    pub span: PackedSpan,
    /// Диапазон вместе с ведущей тривией первого и хвостовой тривией последнего токена.
    pub full_span: PackedSpan,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: Arc<str>,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    trivia: Vec<TriviaPiece>,
    root: NodeId,
    version: u64,
    line_index: LineIndex,
}

impl SyntaxTree {
    pub fn text(&self) -> &str { &self.text }
    pub fn root(&self) -> NodeId { self.root }
    pub fn version(&self) -> u64 { self.version }
    pub fn line_index(&self) -> &LineIndex { &self.line_index }
    pub fn node_count(&self) -> usize { self.nodes.len() }

    pub fn node(&self, id: NodeId) -> &NodeData { &self.nodes[id.0 as usize] }
    pub fn kind(&self, id: NodeId) -> SyntaxKind { self.node(id).kind }
    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.node(id).parent }
    pub fn span(&self, id: NodeId) -> PackedSpan { self.node(id).span }
    pub fn full_span(&self, id: NodeId) -> PackedSpan { self.node(id).full_span }
    pub fn children(&self, id: NodeId) -> &[SyntaxElement] { &self.node(id).children }

    pub fn token(&self, id: TokenId) -> &TokenData { &self.tokens[id.0 as usize] }
    pub fn token_kind(&self, id: TokenId) -> TokenKind { self.token(id).kind }
    pub fn token_span(&self, id: TokenId) -> PackedSpan { self.token(id).span }
    pub fn token_text(&self, id: TokenId) -> &str { self.slice(self.token(id).span) }

    pub fn slice(&self, span: PackedSpan) -> &str { &self.text[span.range()] }
    pub fn node_text(&self, id: NodeId) -> &str { self.slice(self.span(id)) }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().filter_map(|el| match el {
            SyntaxElement::Node(n) => Some(*n),
            SyntaxElement::Token(_) => None,
        })
    }

    pub fn child_tokens(&self, id: NodeId) -> impl Iterator<Item = TokenId> + '_ {
        self.children(id).iter().filter_map(|el| match el {
            SyntaxElement::Token(t) => Some(*t),
            SyntaxElement::Node(_) => None,
        })
    }

    /// Первый дочерний токен указанного вида.
    pub fn child_token(&self, id: NodeId, kind: TokenKind) -> Option<TokenId> {
        self.child_tokens(id).find(|t| self.token_kind(*t) == kind)
    }

    pub fn child_node(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.child_nodes(id).find(|n| self.kind(*n) == kind)
    }

    pub fn nth_child_node(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.child_nodes(id).nth(n)
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    pub fn first_token(&self, id: NodeId) -> TokenId { self.node(id).first_token }
    pub fn last_token(&self, id: NodeId) -> TokenId { self.node(id).last_token }

    pub fn prev_token(&self, id: TokenId) -> Option<TokenId> {
        id.0.checked_sub(1).map(TokenId)
    }

    pub fn next_token(&self, id: TokenId) -> Option<TokenId> {
        let next = id.0 + 1;
        ((next as usize) < self.tokens.len()).then_some(TokenId(next))
    }

    pub fn leading_trivia(&self, id: TokenId) -> &[TriviaPiece] {
        let r = &self.token(id).leading;
        &self.trivia[r.start as usize..r.end as usize]
    }

    pub fn trailing_trivia(&self, id: TokenId) -> &[TriviaPiece] {
        let r = &self.token(id).trailing;
        &self.trivia[r.start as usize..r.end as usize]
    }

    /// Token span extended over its trailing trivia.
    pub fn token_span_with_trailing(&self, id: TokenId) -> PackedSpan {
        let span = self.token_span(id);
        match self.trailing_trivia(id).last() {
            Some(last) => PackedSpan::from_bounds(span.start, last.span.end()),
            None => span,
        }
    }

    /// Token span extended over its leading trivia.
    pub fn token_full_start(&self, id: TokenId) -> u32 {
        self.leading_trivia(id)
            .first()
            .map(|t| t.span.start)
            .unwrap_or(self.token_span(id).start)
    }

    /// Trivia pieces intersecting `span`, in text order.
    pub fn trivia_in(&self, span: PackedSpan) -> &[TriviaPiece] {
        let from = self.trivia.partition_point(|t| t.span.end() <= span.start);
        let to = self.trivia.partition_point(|t| t.span.start < span.end());
        &self.trivia[from..to.max(from)]
    }

    /// Следующий узел-сосед в списке детей родителя.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let mut siblings = self.child_nodes(parent).skip_while(|n| *n != id);
        siblings.next();
        siblings.next()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.child_nodes(parent).take_while(|n| *n != id).last()
    }

    pub fn line_of(&self, offset: u32) -> usize { self.line_index.line_of(offset) }

    /// Повторно находит узел по диапазону и виду (для повторного прохода по тому же снимку).
    pub fn find_node(&self, span: PackedSpan, kind: SyntaxKind) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, n)| n.kind == kind && n.span == span)
            .map(|(id, _)| id)
    }

    /// Ближайший предок (или сам узел), удовлетворяющий предикату.
    pub fn ancestor_or_self(&self, id: NodeId, pred: impl Fn(SyntaxKind) -> bool) -> Option<NodeId> {
        std::iter::once(id).chain(self.ancestors(id)).find(|n| pred(self.kind(*n)))
    }
}

/// Позиция в списке детей текущего открытого узла (для `start_node_at`).
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

/// Построитель дерева (nested push/pop стеком).
pub struct TreeBuilder {
    text: Arc<str>,
    tokens: Vec<TokenData>,
    trivia: Vec<TriviaPiece>,
    nodes: Vec<NodeData>,
    stack: Vec<(SyntaxKind, Vec<SyntaxElement>)>,
    cursor: u32,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new(text: Arc<str>, lexed: Lexed) -> Self {
        let tokens = lexed
            .tokens
            .into_iter()
            .map(|t| TokenData { kind: t.kind, span: t.span, leading: t.leading, trailing: t.trailing, parent: None })
            .collect();
        Self { text, tokens, trivia: lexed.trivia, nodes: Vec::new(), stack: Vec::new(), cursor: 0, root: None }
    }

    pub fn token_kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    pub fn token_start(&self, index: usize) -> u32 {
        self.tokens.get(index).map(|t| t.span.start).unwrap_or(self.text.len() as u32)
    }

    pub fn text(&self) -> &str { &self.text }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.stack.push((kind, Vec::new()));
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.stack.last().map(|(_, c)| c.len()).unwrap_or(0))
    }

    /// Оборачивает уже построенных детей (начиная с checkpoint) в новый узел.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let tail = match self.stack.last_mut() {
            Some((_, children)) if checkpoint.0 <= children.len() => children.split_off(checkpoint.0),
            _ => Vec::new(),
        };
        self.stack.push((kind, tail));
    }

    /// Присоединяет следующий токен к текущему узлу.
    pub fn bump(&mut self) {
        let id = TokenId(self.cursor);
        self.cursor += 1;
        if let Some((_, children)) = self.stack.last_mut() {
            children.push(SyntaxElement::Token(id));
        }
    }

    pub fn finish_node(&mut self) -> Option<NodeId> {
        let (kind, children) = self.stack.pop()?;
        let id = NodeId(self.nodes.len() as u32);
        let fallback = TokenId(self.cursor.min(self.tokens.len().saturating_sub(1) as u32));
        let first_token = children.first().map(|el| self.element_first(*el)).unwrap_or(fallback);
        let last_token = children.last().map(|el| self.element_last(*el)).unwrap_or(fallback);
        for el in &children {
            match *el {
                SyntaxElement::Node(n) => self.nodes[n.0 as usize].parent = Some(id),
                SyntaxElement::Token(t) => self.tokens[t.0 as usize].parent = Some(id),
            }
        }
        let (span, full_span) = if children.is_empty() {
            let at = self.tokens[fallback.0 as usize].span.start;
            (PackedSpan::new(at, 0), PackedSpan::new(at, 0))
        } else {
            let first = &self.tokens[first_token.0 as usize];
            let last = &self.tokens[last_token.0 as usize];
            let span = PackedSpan::from_bounds(first.span.start, last.span.end());
            let full_start = first
                .leading
                .clone()
                .next()
                .map(|i| self.trivia[i as usize].span.start)
                .unwrap_or(first.span.start);
            let full_end = last
                .trailing
                .clone()
                .last()
                .map(|i| self.trivia[i as usize].span.end())
                .unwrap_or(last.span.end());
            (span, PackedSpan::from_bounds(full_start, full_end))
        };
        self.nodes.push(NodeData { kind, parent: None, children, first_token, last_token, span, full_span });
        if let Some((_, parent_children)) = self.stack.last_mut() {
            parent_children.push(SyntaxElement::Node(id));
        } else {
            self.root = Some(id);
        }
        Some(id)
    }

    fn element_first(&self, el: SyntaxElement) -> TokenId {
        match el {
            SyntaxElement::Token(t) => t,
            SyntaxElement::Node(n) => self.nodes[n.0 as usize].first_token,
        }
    }

    fn element_last(&self, el: SyntaxElement) -> TokenId {
        match el {
            SyntaxElement::Token(t) => t,
            SyntaxElement::Node(n) => self.nodes[n.0 as usize].last_token,
        }
    }

    pub fn finish(mut self, version: u64) -> Option<SyntaxTree> {
        while !self.stack.is_empty() {
            self.finish_node();
        }
        let root = self.root?;
        let line_index = LineIndex::new(&self.text);
        Some(SyntaxTree {
            text: self.text,
            nodes: self.nodes,
            tokens: self.tokens,
            trivia: self.trivia,
            root,
            version,
            line_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::lex;

    fn build(text: &str) -> SyntaxTree {
        let lexed = lex(text).unwrap();
        let mut b = TreeBuilder::new(Arc::from(text), lexed);
        // CompilationUnit( ExpressionStatement( Binary(a + b) ; ) EOF )
        b.start_node(SyntaxKind::CompilationUnit);
        b.start_node(SyntaxKind::ExpressionStatement);
        let cp = b.checkpoint();
        b.start_node(SyntaxKind::IdentifierName);
        b.bump();
        b.finish_node();
        b.start_node_at(cp, SyntaxKind::BinaryExpression);
        b.bump();
        b.start_node(SyntaxKind::IdentifierName);
        b.bump();
        b.finish_node();
        b.finish_node();
        b.bump();
        b.finish_node();
        b.bump();
        b.finish_node();
        b.finish(0).unwrap()
    }

    #[test]
    fn checkpoint_wraps_left_operand() {
        let tree = build("  a + b; // tail\n");
        let stmt = tree.nth_child_node(tree.root(), 0).unwrap();
        assert_eq!(tree.kind(stmt), SyntaxKind::ExpressionStatement);
        let binary = tree.nth_child_node(stmt, 0).unwrap();
        assert_eq!(tree.kind(binary), SyntaxKind::BinaryExpression);
        assert_eq!(tree.node_text(binary), "a + b");
        assert_eq!(tree.child_nodes(binary).count(), 2);
        assert_eq!(tree.parent(binary), Some(stmt));
    }

    #[test]
    fn spans_and_full_spans() {
        let tree = build("  a + b; // tail\n");
        let stmt = tree.nth_child_node(tree.root(), 0).unwrap();
        assert_eq!(tree.node_text(stmt), "a + b;");
        assert_eq!(tree.full_span(stmt), PackedSpan::from_bounds(0, 17));
        let semi = tree.last_token(stmt);
        assert_eq!(tree.token_kind(semi), TokenKind::Semicolon);
        assert_eq!(tree.token_span_with_trailing(semi).end(), 17);
        assert_eq!(tree.prev_token(semi).map(|t| tree.token_text(t)), Some("b"));
    }

    #[test]
    fn find_node_relocates_by_span() {
        let tree = build("a + b;");
        let binary = tree.find_node(PackedSpan::new(0, 5), SyntaxKind::BinaryExpression);
        assert!(binary.is_some());
        assert!(tree.find_node(PackedSpan::new(0, 5), SyntaxKind::Block).is_none());
    }
}
