//! Семантическая модель снимка: привязка имён и простой вывод типов.
//!
//! Модель строится одним проходом `Binder` (visitor со стеком областей
//! видимости) после предварительного сбора методов и классов. Модель
//! заимствует дерево и помнит его версию.

use std::collections::HashMap;

use super::symbols::{RefKind, Symbol, SymbolId, SymbolKind};
use super::types::TypeRef;
use crate::syntax::nodes::{skip_parentheses, BinaryExpression, InvocationExpression, MemberAccess};
use crate::syntax::{walk, NodeId, SyntaxKind, SyntaxTree, TokenKind, VisitControl, Visitor};

pub struct SemanticModel<'t> {
    tree: &'t SyntaxTree,
    symbols: Vec<Symbol>,
    declarations: HashMap<NodeId, SymbolId>,
    bindings: HashMap<NodeId, SymbolId>,
    references: HashMap<SymbolId, Vec<NodeId>>,
}

impl<'t> SemanticModel<'t> {
    pub fn build(tree: &'t SyntaxTree) -> Self {
        let mut model = Self {
            tree,
            symbols: Vec::new(),
            declarations: HashMap::new(),
            bindings: HashMap::new(),
            references: HashMap::new(),
        };
        let globals = model.collect_members();
        let mut binder = Binder { model: &mut model, scopes: vec![globals] };
        walk(tree, tree.root(), &mut binder);
        tracing::trace!(
            symbols = model.symbols.len(),
            bindings = model.bindings.len(),
            version = tree.version(),
            "semantic model built"
        );
        model
    }

    pub fn tree(&self) -> &'t SyntaxTree { self.tree }

    /// Версия снимка, по которому построена модель.
    pub fn version(&self) -> u64 { self.tree.version() }

    pub fn symbol(&self, id: SymbolId) -> &Symbol { &self.symbols[id.0 as usize] }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Символ, на который ссылается выражение (идентификатор, возможно в скобках).
    pub fn symbol_info(&self, expr: NodeId) -> Option<SymbolId> {
        let expr = skip_parentheses(self.tree, expr);
        self.bindings.get(&expr).copied()
    }

    /// Символ, объявленный узлом (declarator, parameter, method, class).
    pub fn declared_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.declarations.get(&node).copied()
    }

    pub fn references(&self, symbol: SymbolId) -> &[NodeId] {
        self.references.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ближайшая объемлющая функция (метод, локальная функция или лямбда).
    pub fn containing_function(&self, node: NodeId) -> Option<NodeId> {
        self.tree.ancestors(node).find(|a| self.tree.kind(*a).is_function_like())
    }

    pub fn type_of(&self, expr: NodeId) -> Option<TypeRef> {
        let tree = self.tree;
        match tree.kind(expr) {
            SyntaxKind::LiteralExpression => literal_type(tree, expr),
            SyntaxKind::IdentifierName => {
                let symbol = self.symbol(self.symbol_info(expr)?);
                match symbol.kind {
                    SymbolKind::Method | SymbolKind::LocalFunction | SymbolKind::Class => None,
                    _ => symbol.ty.clone(),
                }
            }
            SyntaxKind::ParenthesizedExpression => self.type_of(tree.nth_child_node(expr, 0)?),
            SyntaxKind::AwaitExpression => self.type_of(tree.nth_child_node(expr, 0)?)?.awaited(),
            SyntaxKind::PrefixUnaryExpression => {
                let operand = tree.nth_child_node(expr, 0)?;
                match tree.token_kind(tree.first_token(expr)) {
                    TokenKind::Exclamation => Some(TypeRef::bool()),
                    _ => self.type_of(operand),
                }
            }
            SyntaxKind::PostfixUnaryExpression => self.type_of(tree.nth_child_node(expr, 0)?),
            SyntaxKind::BinaryExpression => {
                let binary = BinaryExpression::cast(tree, expr)?;
                match binary.operator_kind()? {
                    TokenKind::AmpersandAmpersand
                    | TokenKind::BarBar
                    | TokenKind::EqualsEquals
                    | TokenKind::ExclamationEquals
                    | TokenKind::LessThan
                    | TokenKind::GreaterThan
                    | TokenKind::LessThanEquals
                    | TokenKind::GreaterThanEquals => Some(TypeRef::bool()),
                    _ => self.type_of(binary.left()?),
                }
            }
            SyntaxKind::ConditionalExpression => self.type_of(tree.nth_child_node(expr, 1)?),
            SyntaxKind::AssignmentExpression => self.type_of(tree.nth_child_node(expr, 0)?),
            SyntaxKind::ObjectCreationExpression => {
                TypeRef::from_syntax(tree, tree.child_node(expr, SyntaxKind::Type)?)
            }
            SyntaxKind::MemberAccessExpression => {
                let access = MemberAccess::cast(tree, expr)?;
                let receiver = access.receiver()?;
                match (tree.node_text(receiver), access.name()?) {
                    ("Task", "CompletedTask") => Some(TypeRef::named("Task")),
                    ("ValueTask", "CompletedTask") => Some(TypeRef::named("ValueTask")),
                    _ => None,
                }
            }
            SyntaxKind::InvocationExpression => self.invocation_type(expr),
            _ => None,
        }
    }

    fn invocation_type(&self, expr: NodeId) -> Option<TypeRef> {
        let tree = self.tree;
        let invocation = InvocationExpression::cast(tree, expr)?;
        let callee = invocation.callee()?;
        match tree.kind(callee) {
            SyntaxKind::IdentifierName => {
                let symbol = self.symbol(self.symbol_info(callee)?);
                if symbol.is_callable() { symbol.ty.clone() } else { None }
            }
            SyntaxKind::MemberAccessExpression => {
                let access = MemberAccess::cast(tree, callee)?;
                let receiver = access.receiver()?;
                match access.name()? {
                    "ConfigureAwait" => self.type_of(receiver)?.configured(),
                    "FromResult" if matches!(tree.node_text(receiver), "Task" | "ValueTask") => {
                        let argument = invocation.arguments().into_iter().next()?;
                        let result = self.type_of(argument)?;
                        Some(TypeRef::generic(tree.node_text(receiver), vec![result]))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.declarations.insert(symbol.declaration, id);
        self.symbols.push(symbol);
        id
    }

    /// Методы и классы видны во всём файле независимо от порядка объявления.
    fn collect_members(&mut self) -> HashMap<String, SymbolId> {
        let tree = self.tree;
        let mut globals = HashMap::new();
        for (id, node) in tree.iter_nodes() {
            let kind = match node.kind {
                SyntaxKind::MethodDeclaration => SymbolKind::Method,
                SyntaxKind::ClassDeclaration => SymbolKind::Class,
                _ => continue,
            };
            let Some(name) = tree.child_token(id, TokenKind::Identifier) else { continue };
            let name = tree.token_text(name).to_string();
            let ty = tree
                .child_node(id, SyntaxKind::Type)
                .and_then(|t| TypeRef::from_syntax(tree, t));
            let symbol = self.add_symbol(Symbol { name: name.clone(), kind, declaration: id, container: None, ty });
            globals.entry(name).or_insert(symbol);
        }
        globals
    }
}

fn literal_type(tree: &SyntaxTree, expr: NodeId) -> Option<TypeRef> {
    let token = tree.first_token(expr);
    let name = match tree.token_kind(token) {
        TokenKind::TrueKeyword | TokenKind::FalseKeyword => "bool",
        TokenKind::StringLiteral => "string",
        TokenKind::CharLiteral => "char",
        TokenKind::NumericLiteral => {
            let text = tree.token_text(token);
            match text.chars().last() {
                Some('m' | 'M') => "decimal",
                Some('f' | 'F') => "float",
                Some('d' | 'D') => "double",
                Some('l' | 'L') => "long",
                _ if text.contains('.') => "double",
                _ => "int",
            }
        }
        _ => return None,
    };
    Some(TypeRef::named(name))
}

/// Привязка имён: стек областей видимости поверх обхода дерева.
struct Binder<'m, 't> {
    model: &'m mut SemanticModel<'t>,
    scopes: Vec<HashMap<String, SymbolId>>,
}

impl<'m, 't> Binder<'m, 't> {
    fn declare(&mut self, name: &str, kind: SymbolKind, declaration: NodeId, ty: Option<TypeRef>) {
        let container = self.model.containing_function(declaration);
        let id = self.model.add_symbol(Symbol { name: name.to_string(), kind, declaration, container, ty });
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), id);
        }
    }

    fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn declare_parameter(&mut self, tree: &SyntaxTree, parameter: NodeId) {
        let Some(name) = tree.child_tokens(parameter).filter(|t| tree.token_kind(*t) == TokenKind::Identifier).last() else {
            return;
        };
        let ref_kind = tree
            .child_tokens(parameter)
            .find_map(|t| match tree.token_kind(t) {
                TokenKind::RefKeyword => Some(RefKind::Ref),
                TokenKind::OutKeyword => Some(RefKind::Out),
                TokenKind::InKeyword => Some(RefKind::In),
                TokenKind::ParamsKeyword => Some(RefKind::Params),
                _ => None,
            })
            .unwrap_or(RefKind::None);
        let ty = tree
            .child_node(parameter, SyntaxKind::Type)
            .and_then(|t| TypeRef::from_syntax(tree, t));
        self.declare(tree.token_text(name), SymbolKind::Parameter(ref_kind), parameter, ty);
    }

    fn declare_local(&mut self, tree: &SyntaxTree, declarator: NodeId) {
        let Some(name) = tree.child_token(declarator, TokenKind::Identifier) else { return };
        let declared = tree
            .parent(declarator)
            .and_then(|decl| tree.child_node(decl, SyntaxKind::Type))
            .and_then(|t| TypeRef::from_syntax(tree, t));
        // `var`: тип инициализатора
        let ty = declared.or_else(|| {
            tree.child_node(declarator, SyntaxKind::EqualsValueClause)
                .and_then(|clause| tree.nth_child_node(clause, 0))
                .and_then(|init| self.model.type_of(init))
        });
        self.declare(tree.token_text(name), SymbolKind::Local, declarator, ty);
    }

    /// Имя после точки в `a.Name` не привязывается.
    fn is_member_name(tree: &SyntaxTree, id: NodeId) -> bool {
        tree.parent(id).is_some_and(|p| {
            tree.kind(p) == SyntaxKind::MemberAccessExpression && tree.nth_child_node(p, 1) == Some(id)
        })
    }
}

impl<'m, 't> Visitor for Binder<'m, 't> {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId) -> VisitControl {
        match tree.kind(id) {
            SyntaxKind::LocalFunctionStatement => {
                // имя локальной функции видно в объемлющем блоке
                if let Some(name) = tree.child_token(id, TokenKind::Identifier) {
                    let ty = tree
                        .child_node(id, SyntaxKind::Type)
                        .and_then(|t| TypeRef::from_syntax(tree, t));
                    self.declare(tree.token_text(name), SymbolKind::LocalFunction, id, ty);
                }
                self.scopes.push(HashMap::new());
            }
            SyntaxKind::MethodDeclaration
            | SyntaxKind::LambdaExpression
            | SyntaxKind::Block
            | SyntaxKind::SwitchStatement => self.scopes.push(HashMap::new()),
            SyntaxKind::Parameter => self.declare_parameter(tree, id),
            SyntaxKind::IdentifierName if !Self::is_member_name(tree, id) => {
                if let Some(symbol) = self.lookup(tree.node_text(id)) {
                    self.model.bindings.insert(id, symbol);
                    self.model.references.entry(symbol).or_default().push(id);
                }
            }
            _ => {}
        }
        VisitControl::Continue
    }

    fn leave(&mut self, tree: &SyntaxTree, id: NodeId) {
        match tree.kind(id) {
            SyntaxKind::VariableDeclarator => self.declare_local(tree, id),
            SyntaxKind::MethodDeclaration
            | SyntaxKind::LocalFunctionStatement
            | SyntaxKind::LambdaExpression
            | SyntaxKind::Block
            | SyntaxKind::SwitchStatement => {
                self.scopes.pop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, preorder};

    fn nodes_of(tree: &SyntaxTree, kind: SyntaxKind) -> Vec<NodeId> {
        preorder(tree, tree.root()).filter(|id| tree.kind(*id) == kind).collect()
    }

    fn identifier(tree: &SyntaxTree, name: &str, nth: usize) -> NodeId {
        nodes_of(tree, SyntaxKind::IdentifierName)
            .into_iter()
            .filter(|id| tree.node_text(*id) == name)
            .nth(nth)
            .unwrap()
    }

    #[test]
    fn binds_locals_and_parameters() {
        let tree = parse("int F(int a, ref int b) { int x = a; return x + b; }", 0).unwrap();
        let model = SemanticModel::build(&tree);
        let declarator = nodes_of(&tree, SyntaxKind::VariableDeclarator)[0];
        let x_symbol = model.declared_symbol(declarator).unwrap();
        assert_eq!(model.symbol_info(identifier(&tree, "x", 0)), Some(x_symbol));
        assert_eq!(model.symbol(x_symbol).kind, SymbolKind::Local);

        let b = model.symbol(model.symbol_info(identifier(&tree, "b", 0)).unwrap());
        assert_eq!(b.kind, SymbolKind::Parameter(RefKind::Ref));
        assert!(!b.is_local_or_value_parameter());
        assert_eq!(model.references(x_symbol).len(), 1);
    }

    #[test]
    fn shadowing_in_nested_blocks_and_lambdas() {
        let tree = parse("void M() { int v = 1; G(v); F(v => v); { int w = v; } }", 0).unwrap();
        let model = SemanticModel::build(&tree);
        let outer = model.symbol_info(identifier(&tree, "v", 0)).unwrap();
        let in_lambda = model.symbol_info(identifier(&tree, "v", 1)).unwrap();
        let in_block = model.symbol_info(identifier(&tree, "v", 2)).unwrap();
        assert_ne!(outer, in_lambda);
        assert!(matches!(model.symbol(in_lambda).kind, SymbolKind::Parameter(_)));
        assert_eq!(outer, in_block);
        let lambda = nodes_of(&tree, SyntaxKind::LambdaExpression)[0];
        assert_eq!(model.symbol(in_lambda).container, Some(lambda));
    }

    #[test]
    fn infers_task_types() {
        let tree = parse(
            "async Task<int> G() => 1; Task<int> F() { var t = G(); return Task.FromResult(t.Result); } \
             async Task<int> H() { var r = await G().ConfigureAwait(false); return r; }",
            0,
        )
        .unwrap();
        let model = SemanticModel::build(&tree);
        let t = model.symbol(model.symbol_info(identifier(&tree, "t", 0)).unwrap());
        assert_eq!(t.ty.as_ref().map(|t| t.to_string()).as_deref(), Some("Task<int>"));

        let invocations = nodes_of(&tree, SyntaxKind::InvocationExpression);
        let configured = invocations
            .iter()
            .copied()
            .find(|id| tree.node_text(*id).ends_with("ConfigureAwait(false)"))
            .unwrap();
        assert!(model.type_of(configured).unwrap().is_configured_awaitable());

        let r = model.symbol(model.symbol_info(identifier(&tree, "r", 0)).unwrap());
        assert_eq!(r.ty, Some(TypeRef::named("int")));
    }

    #[test]
    fn literal_and_operator_types() {
        let tree = parse("bool F(int a) => !(a > 1.5) && a == 2;", 0).unwrap();
        let model = SemanticModel::build(&tree);
        let top = nodes_of(&tree, SyntaxKind::BinaryExpression)[0];
        assert_eq!(model.type_of(top), Some(TypeRef::bool()));
        let literal = nodes_of(&tree, SyntaxKind::LiteralExpression)[0];
        assert_eq!(model.type_of(literal), Some(TypeRef::named("double")));
        assert_eq!(model.version(), 0);
    }
}
