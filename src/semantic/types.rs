//! Упрощённые ссылки на типы: имя плюс аргументы обобщения.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        Self { name: normalize(name).to_string(), args: Vec::new() }
    }

    pub fn generic(name: &str, args: Vec<TypeRef>) -> Self {
        Self { name: normalize(name).to_string(), args }
    }

    pub fn bool() -> Self { Self::named("bool") }

    /// Тип из узла `Type`. `var` не является типом и даёт `None`.
    pub fn from_syntax(tree: &SyntaxTree, type_node: NodeId) -> Option<Self> {
        if tree.kind(type_node) != SyntaxKind::Type {
            return None;
        }
        let args: Vec<TypeRef> = tree
            .child_node(type_node, SyntaxKind::TypeArgumentList)
            .map(|list| {
                tree.child_nodes(list)
                    .filter_map(|t| TypeRef::from_syntax(tree, t))
                    .collect()
            })
            .unwrap_or_default();
        let mut name = String::new();
        let mut suffix = String::new();
        for token in tree.child_tokens(type_node) {
            let text = tree.token_text(token);
            match text {
                "." => name.clear(),
                "?" | "[" | "]" => suffix.push_str(text),
                _ => name.push_str(text),
            }
        }
        if name == "var" {
            return None;
        }
        name.push_str(&suffix);
        Some(Self::generic(&name, args))
    }

    pub fn is_void(&self) -> bool { self.name == "void" }

    /// `Task`, `Task<T>`, `ValueTask`, `ValueTask<T>`.
    pub fn is_task_like(&self) -> bool {
        matches!(self.name.as_str(), "Task" | "ValueTask") && self.args.len() <= 1
    }

    pub fn is_configured_awaitable(&self) -> bool {
        matches!(self.name.as_str(), "ConfiguredTaskAwaitable" | "ConfiguredValueTaskAwaitable")
    }

    /// `T` для `Task<T>` / `ValueTask<T>`.
    pub fn task_result(&self) -> Option<&TypeRef> {
        if self.is_task_like() { self.args.first() } else { None }
    }

    /// Результат `await` над значением этого типа; `None` для `Task` без результата.
    pub fn awaited(&self) -> Option<TypeRef> {
        if self.is_task_like() || self.is_configured_awaitable() {
            self.args.first().cloned()
        } else {
            None
        }
    }

    /// Тип, возвращаемый `.ConfigureAwait(..)` для задачи этого типа.
    pub fn configured(&self) -> Option<TypeRef> {
        let name = match self.name.as_str() {
            "Task" => "ConfiguredTaskAwaitable",
            "ValueTask" => "ConfiguredValueTaskAwaitable",
            _ => return None,
        };
        Some(TypeRef::generic(name, self.args.clone()))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Приводит имена CLR-типов к ключевым словам (`Int32` -> `int`).
fn normalize(name: &str) -> &str {
    match name {
        "Int32" => "int",
        "Int64" => "long",
        "Boolean" => "bool",
        "String" => "string",
        "Object" => "object",
        "Double" => "double",
        "Single" => "float",
        "Decimal" => "decimal",
        "Char" => "char",
        "Byte" => "byte",
        "Void" => "void",
        other => other,
    }
}
