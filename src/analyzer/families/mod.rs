/*!
# Rule families

Closed set of consolidation shapes. Each family is triggered by a fixed set of
node kinds and implements `find` (validate a candidate at an anchor node) and
`plan` (compute the edit for a validated candidate). Dispatch is a plain
`match`; families are independent and may report overlapping diagnostics.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

use super::context::{Candidate, CandidateData, RuleContext};
use crate::core::Result;
use crate::rewrite::Plan;
use crate::syntax::nodes::{AssignmentExpression, MethodLike, VariableDeclarator};
use crate::syntax::{NodeId, SyntaxKind};

mod assignment_return;
mod async_await;
mod blank_lines;
mod bool_return;
mod local_return;
mod nested_if;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleFamily {
    MergeNestedIf,
    MergeLocalDeclarationWithReturn,
    MergeAssignmentWithReturn,
    SimplifyIfToReturn,
    RemoveRedundantBlankLine,
    RemoveRedundantAsyncAwait,
}

impl RuleFamily {
    pub const ALL: [RuleFamily; 6] = [
        RuleFamily::MergeNestedIf,
        RuleFamily::MergeLocalDeclarationWithReturn,
        RuleFamily::MergeAssignmentWithReturn,
        RuleFamily::SimplifyIfToReturn,
        RuleFamily::RemoveRedundantBlankLine,
        RuleFamily::RemoveRedundantAsyncAwait,
    ];

    pub fn rule_id(self) -> &'static str {
        match self {
            RuleFamily::MergeNestedIf => "MRG001",
            RuleFamily::MergeLocalDeclarationWithReturn => "MRG002",
            RuleFamily::MergeAssignmentWithReturn => "MRG003",
            RuleFamily::SimplifyIfToReturn => "MRG004",
            RuleFamily::RemoveRedundantBlankLine => "MRG005",
            RuleFamily::RemoveRedundantAsyncAwait => "MRG006",
        }
    }

    pub fn from_rule_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.rule_id().eq_ignore_ascii_case(id))
    }

    /// Виды узлов, на которых вызывается поиск кандидата.
    pub fn triggers(self) -> &'static [SyntaxKind] {
        match self {
            RuleFamily::MergeNestedIf | RuleFamily::SimplifyIfToReturn => &[SyntaxKind::IfStatement],
            RuleFamily::MergeLocalDeclarationWithReturn => &[SyntaxKind::LocalDeclarationStatement],
            RuleFamily::MergeAssignmentWithReturn => &[SyntaxKind::ExpressionStatement],
            RuleFamily::RemoveRedundantBlankLine => &[
                SyntaxKind::Block,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::SwitchStatement,
                SyntaxKind::DoStatement,
            ],
            RuleFamily::RemoveRedundantAsyncAwait => &[
                SyntaxKind::MethodDeclaration,
                SyntaxKind::LocalFunctionStatement,
                SyntaxKind::LambdaExpression,
            ],
        }
    }

    pub fn is_triggered_by(self, kind: SyntaxKind) -> bool {
        self.triggers().contains(&kind)
    }

    pub fn find(self, ctx: &RuleContext<'_>, anchor: NodeId) -> Option<Candidate> {
        if !self.is_triggered_by(ctx.tree.kind(anchor)) {
            return None;
        }
        match self {
            RuleFamily::MergeNestedIf => nested_if::find(ctx, anchor),
            RuleFamily::MergeLocalDeclarationWithReturn => local_return::find(ctx, anchor),
            RuleFamily::MergeAssignmentWithReturn => assignment_return::find(ctx, anchor),
            RuleFamily::SimplifyIfToReturn => bool_return::find(ctx, anchor),
            RuleFamily::RemoveRedundantBlankLine => blank_lines::find(ctx, anchor),
            RuleFamily::RemoveRedundantAsyncAwait => async_await::find(ctx, anchor),
        }
    }

    pub(crate) fn plan(self, ctx: &RuleContext<'_>, candidate: &Candidate) -> Result<Plan> {
        match self {
            RuleFamily::MergeNestedIf => nested_if::plan(ctx, candidate),
            RuleFamily::MergeLocalDeclarationWithReturn => local_return::plan(ctx, candidate),
            RuleFamily::MergeAssignmentWithReturn => assignment_return::plan(ctx, candidate),
            RuleFamily::SimplifyIfToReturn => bool_return::plan(ctx, candidate),
            RuleFamily::RemoveRedundantBlankLine => blank_lines::plan(ctx, candidate),
            RuleFamily::RemoveRedundantAsyncAwait => async_await::plan(ctx, candidate),
        }
    }

    /// Имя для подстановки `{name}` в сообщение диагностики.
    pub fn subject_name(self, ctx: &RuleContext<'_>, candidate: &Candidate) -> Option<String> {
        let tree = ctx.tree;
        match &candidate.data {
            CandidateData::LocalDeclarationReturn { declarator, .. } => {
                VariableDeclarator::cast(tree, *declarator)?.name().map(str::to_string)
            }
            CandidateData::AssignmentReturn { assignment, .. } => {
                let target = AssignmentExpression::cast(tree, *assignment)?.left()?;
                Some(tree.node_text(target).to_string())
            }
            CandidateData::RedundantAsyncAwait { .. } => {
                let function = MethodLike::cast(tree, candidate.anchor)?;
                Some(function.name().unwrap_or("lambda").to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests;
