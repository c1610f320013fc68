//! Символы: локальные переменные, параметры, методы, локальные функции, классы.

use serde::{Deserialize, Serialize};

use super::types::TypeRef;
use crate::syntax::NodeId;

/// Устойчивый идентификатор символа в пределах одной семантической модели.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Способ передачи параметра.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    None,
    Ref,
    Out,
    In,
    Params,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Local,
    Parameter(RefKind),
    Method,
    LocalFunction,
    Class,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Узел объявления (declarator, parameter, method, class).
    pub declaration: NodeId,
    /// Функция (метод, локальная функция, лямбда), в которой объявлен символ.
    pub container: Option<NodeId>,
    /// Тип переменной/параметра либо возвращаемый тип метода.
    pub ty: Option<TypeRef>,
}

impl Symbol {
    /// Local variable or parameter passed by value.
    pub fn is_local_or_value_parameter(&self) -> bool {
        matches!(self.kind, SymbolKind::Local | SymbolKind::Parameter(RefKind::None))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, SymbolKind::Method | SymbolKind::LocalFunction)
    }
}
