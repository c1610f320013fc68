//! Обходчики поддеревьев функции, переиспользуемые через пул.
//!
//! Ни один из них не спускается во вложенные лямбды и локальные функции,
//! кроме `CaptureWalker`, которому нужны именно они.

use super::pool::PooledWalker;
use crate::semantic::{SemanticModel, SymbolId};
use crate::syntax::{walk, NodeId, SyntaxKind, SyntaxTree, VisitControl, Visitor};

/// Собирает выражения `await` функции.
#[derive(Debug, Default)]
pub struct AwaitWalker {
    pub awaits: Vec<NodeId>,
    stop_on_first: bool,
    root: Option<NodeId>,
}

impl AwaitWalker {
    pub fn collect(&mut self, tree: &SyntaxTree, function: NodeId) -> &[NodeId] {
        self.root = Some(function);
        walk(tree, function, self);
        &self.awaits
    }

    pub fn contains_await(&mut self, tree: &SyntaxTree, function: NodeId) -> bool {
        self.stop_on_first = true;
        !self.collect(tree, function).is_empty()
    }
}

impl Visitor for AwaitWalker {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId) -> VisitControl {
        let kind = tree.kind(id);
        if Some(id) != self.root && kind.is_function_like() {
            return VisitControl::SkipChildren;
        }
        if kind == SyntaxKind::AwaitExpression {
            self.awaits.push(id);
            if self.stop_on_first {
                return VisitControl::Stop;
            }
        }
        VisitControl::Continue
    }
}

impl PooledWalker for AwaitWalker {
    fn reset(&mut self) {
        self.awaits.clear();
        self.stop_on_first = false;
        self.root = None;
    }
}

/// Собирает операторы `return` функции.
#[derive(Debug, Default)]
pub struct ReturnWalker {
    pub returns: Vec<NodeId>,
    root: Option<NodeId>,
}

impl ReturnWalker {
    pub fn collect(&mut self, tree: &SyntaxTree, function: NodeId) -> &[NodeId] {
        self.root = Some(function);
        walk(tree, function, self);
        &self.returns
    }
}

impl Visitor for ReturnWalker {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId) -> VisitControl {
        let kind = tree.kind(id);
        if Some(id) != self.root && kind.is_function_like() {
            return VisitControl::SkipChildren;
        }
        if kind == SyntaxKind::ReturnStatement {
            self.returns.push(id);
        }
        // выражения не содержат операторов, кроме тел лямбд
        if kind.is_expression() && kind != SyntaxKind::LambdaExpression {
            return VisitControl::SkipChildren;
        }
        VisitControl::Continue
    }
}

impl PooledWalker for ReturnWalker {
    fn reset(&mut self) {
        self.returns.clear();
        self.root = None;
    }
}

/// Ссылки на символ из вложенных лямбд и локальных функций.
#[derive(Debug, Default)]
pub struct CaptureWalker {
    name: String,
    depth: usize,
    root: Option<NodeId>,
    pub candidates: Vec<NodeId>,
}

impl CaptureWalker {
    /// `true`, если символ используется внутри вложенной функции `function`.
    pub fn is_captured(&mut self, model: &SemanticModel<'_>, function: NodeId, symbol: SymbolId) -> bool {
        let tree = model.tree();
        self.name.clear();
        self.name.push_str(&model.symbol(symbol).name);
        self.root = Some(function);
        walk(tree, function, self);
        self.candidates
            .iter()
            .any(|id| model.symbol_info(*id) == Some(symbol))
    }
}

impl Visitor for CaptureWalker {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId) -> VisitControl {
        let kind = tree.kind(id);
        if Some(id) != self.root && kind.is_function_like() {
            self.depth += 1;
        } else if kind == SyntaxKind::IdentifierName && self.depth > 0 && tree.node_text(id) == self.name {
            self.candidates.push(id);
        }
        VisitControl::Continue
    }

    fn leave(&mut self, tree: &SyntaxTree, id: NodeId) {
        if Some(id) != self.root && tree.kind(id).is_function_like() {
            self.depth -= 1;
        }
    }
}

impl PooledWalker for CaptureWalker {
    fn reset(&mut self) {
        self.name.clear();
        self.depth = 0;
        self.root = None;
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::pool::Pooled;
    use crate::syntax::{parse, preorder};

    fn first(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        preorder(tree, tree.root()).find(|id| tree.kind(*id) == kind).unwrap()
    }

    #[test]
    fn await_walker_skips_nested_functions() {
        let tree = parse(
            "async Task<int> F() { await A(); Func<Task> g = async () => await B(); return await C(); }",
            0,
        )
        .unwrap();
        let method = first(&tree, SyntaxKind::MethodDeclaration);
        let mut walker = Pooled::<AwaitWalker>::new();
        let awaits = walker.collect(&tree, method).to_vec();
        assert_eq!(awaits.len(), 2);
        assert_eq!(tree.node_text(awaits[1]), "await C()");
    }

    #[test]
    fn stop_on_first_short_circuits() {
        let tree = parse("async Task F() { await A(); await B(); }", 0).unwrap();
        let method = first(&tree, SyntaxKind::MethodDeclaration);
        let mut walker = Pooled::<AwaitWalker>::new();
        assert!(walker.contains_await(&tree, method));
        assert_eq!(walker.awaits.len(), 1);
    }

    #[test]
    fn return_walker_ignores_local_function_returns() {
        let tree = parse("int F(bool c) { int G() { return 1; } if (c) return 2; return G(); }", 0).unwrap();
        let method = first(&tree, SyntaxKind::MethodDeclaration);
        let mut walker = Pooled::<ReturnWalker>::new();
        assert_eq!(walker.collect(&tree, method).len(), 2);
    }

    #[test]
    fn capture_walker_finds_lambda_reference() {
        let tree = parse("int F() { int x = 1; Action a = () => Use(x); x = 2; return x; }", 0).unwrap();
        let model = SemanticModel::build(&tree);
        let method = first(&tree, SyntaxKind::MethodDeclaration);
        let declarator = first(&tree, SyntaxKind::VariableDeclarator);
        let x = model.declared_symbol(declarator).unwrap();
        let mut walker = Pooled::<CaptureWalker>::new();
        assert!(walker.is_captured(&model, method, x));

        let tree = parse("int F() { int x = 1; Action a = () => { int x = 3; Use(x); }; return x; }", 0).unwrap();
        let model = SemanticModel::build(&tree);
        let method = first(&tree, SyntaxKind::MethodDeclaration);
        let declarator = first(&tree, SyntaxKind::VariableDeclarator);
        let x = model.declared_symbol(declarator).unwrap();
        let mut walker = Pooled::<CaptureWalker>::new();
        assert!(!walker.is_captured(&model, method, x));
    }
}
