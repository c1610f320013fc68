//! Обход дерева: visitor с enter/leave и предварительный порядок.

use super::tree::{NodeId, SyntaxTree};

/// Контроль обхода.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    SkipChildren,
    Stop,
}

/// Visitor API (enter/leave). `enter` решает, спускаться ли в детей.
pub trait Visitor {
    fn enter(&mut self, _tree: &SyntaxTree, _id: NodeId) -> VisitControl {
        VisitControl::Continue
    }
    fn leave(&mut self, _tree: &SyntaxTree, _id: NodeId) {}
}

/// Обход с visitor. Возвращает `true`, если обход не был прерван через `Stop`.
pub fn walk<V: Visitor + ?Sized>(tree: &SyntaxTree, root: NodeId, visitor: &mut V) -> bool {
    fn inner<V: Visitor + ?Sized>(tree: &SyntaxTree, id: NodeId, vis: &mut V) -> Option<()> {
        match vis.enter(tree, id) {
            VisitControl::Continue => {
                for child in tree.child_nodes(id) {
                    inner(tree, child, vis)?;
                }
            }
            VisitControl::SkipChildren => {}
            VisitControl::Stop => return None,
        }
        vis.leave(tree, id);
        Some(())
    }
    inner(tree, root, visitor).is_some()
}

/// Узлы поддерева в предварительном порядке (слева направо).
pub fn preorder(tree: &SyntaxTree, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let mut stack = vec![root];
    std::iter::from_fn(move || {
        let id = stack.pop()?;
        let children: Vec<NodeId> = tree.child_nodes(id).collect();
        stack.extend(children.into_iter().rev());
        Some(id)
    })
}
