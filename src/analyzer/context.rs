//! Контекст правила и кандидат на слияние.

use crate::core::PackedSpan;
use crate::semantic::SemanticModel;
use crate::syntax::{NodeId, SyntaxTree, TokenId};

use super::families::RuleFamily;

/// То, что видит правило при обратном вызове на узле.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub tree: &'a SyntaxTree,
    pub model: &'a SemanticModel<'a>,
}

impl<'a> RuleContext<'a> {
    pub fn new(model: &'a SemanticModel<'a>) -> Self {
        Self { tree: model.tree(), model }
    }

    pub fn version(&self) -> u64 { self.model.version() }
}

/// Данные, которые нужны планировщику для конкретного семейства.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateData {
    NestedIf {
        inner: NodeId,
    },
    LocalDeclarationReturn {
        declarator: NodeId,
        return_statement: NodeId,
    },
    AssignmentReturn {
        assignment: NodeId,
        return_statement: NodeId,
    },
    IfToReturn {
        condition: NodeId,
        negate: bool,
        /// Последний заменяемый оператор: `return` из else или следующий за if.
        last: NodeId,
    },
    BlankLines {
        removals: Vec<PackedSpan>,
    },
    RedundantAsyncAwait {
        async_keyword: TokenId,
        awaits: Vec<NodeId>,
    },
}

/// Transient match produced by a finder; consumed by reporting or by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub family: RuleFamily,
    pub anchor: NodeId,
    /// Диапазон диагностики.
    pub span: PackedSpan,
    pub data: CandidateData,
    /// Версия снимка, на котором найден кандидат.
    pub version: u64,
}
