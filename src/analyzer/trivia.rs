//! Проверка тривии: слияние допустимо только поверх пробелов и переводов строк.
//!
//! Комментарий в удаляемом тексте означает, что исправление его уничтожит,
//! поэтому любая проверка, встретившая комментарий, возвращает `false`.

use crate::core::PackedSpan;
use crate::syntax::nodes::BracedContainer;
use crate::syntax::{NodeId, SyntaxTree, TokenId};

/// `true`, если вся тривия, пересекающая диапазон, состоит из пробелов и переводов строк.
pub fn span_is_trivial(tree: &SyntaxTree, span: PackedSpan) -> bool {
    tree.trivia_in(span)
        .iter()
        .all(|piece| piece.kind.is_whitespace_or_end_of_line())
}

/// Ведущая и хвостовая тривия токена.
pub fn token_trivia_is_trivial(tree: &SyntaxTree, token: TokenId) -> bool {
    tree.leading_trivia(token)
        .iter()
        .chain(tree.trailing_trivia(token))
        .all(|piece| piece.kind.is_whitespace_or_end_of_line())
}

/// Обе фигурные скобки блока проверяются независимо.
pub fn block_braces_are_trivial(tree: &SyntaxTree, block: NodeId) -> bool {
    let Some(container) = BracedContainer::cast(tree, block) else {
        return false;
    };
    match (container.open_brace(), container.close_brace()) {
        (Some(open), Some(close)) => token_trivia_is_trivial(tree, open) && token_trivia_is_trivial(tree, close),
        _ => false,
    }
}

/// Удаляемый текст: `outer` за вычетом сохраняемых поддиапазонов.
pub fn removed_text_is_trivial(tree: &SyntaxTree, outer: PackedSpan, retained: &[PackedSpan]) -> bool {
    let mut retained = retained.to_vec();
    retained.sort();
    let mut cursor = outer.start;
    for keep in retained {
        if !span_is_trivial(tree, PackedSpan::from_bounds(cursor, keep.start)) {
            return false;
        }
        cursor = cursor.max(keep.end());
    }
    span_is_trivial(tree, PackedSpan::from_bounds(cursor, outer.end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, preorder, SyntaxKind};

    fn find(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        preorder(tree, tree.root()).find(|id| tree.kind(*id) == kind).unwrap()
    }

    #[test]
    fn comments_fail_the_gate() {
        let tree = parse("void M() {\n    int x = 1;\n    // keep\n    return x;\n}", 0).unwrap();
        let body = find(&tree, SyntaxKind::Block);
        assert!(!span_is_trivial(&tree, tree.span(body)));
        let decl = find(&tree, SyntaxKind::LocalDeclarationStatement);
        assert!(span_is_trivial(&tree, tree.span(decl)));
    }

    #[test]
    fn braces_checked_independently() {
        let tree = parse("void M() {\n    F();\n} // done\n", 0).unwrap();
        let body = find(&tree, SyntaxKind::Block);
        assert!(!block_braces_are_trivial(&tree, body));
        let open = tree.first_token(body);
        assert!(token_trivia_is_trivial(&tree, open));

        let tree = parse("void M()\n{ /* c */\n    F();\n}\n", 0).unwrap();
        let body = find(&tree, SyntaxKind::Block);
        assert!(!block_braces_are_trivial(&tree, body));
    }

    #[test]
    fn retained_ranges_are_excluded() {
        let tree = parse("bool F() => G(/* arg */ 1) && H();", 0).unwrap();
        let binary = find(&tree, SyntaxKind::BinaryExpression);
        let left = tree.nth_child_node(binary, 0).unwrap();
        assert!(!span_is_trivial(&tree, tree.span(binary)));
        assert!(removed_text_is_trivial(&tree, tree.span(binary), &[tree.span(left)]));
    }
}
