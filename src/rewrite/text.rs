//! Текстовые помощники для построения замен.

use crate::core::PackedSpan;
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, TokenKind};

/// Operand text for `A && B`: parenthesized when it binds looser than `&&`.
pub fn operand_for_and(tree: &SyntaxTree, expr: NodeId) -> String {
    let text = tree.node_text(expr);
    if binds_looser_than_and(tree, expr) {
        format!("({text})")
    } else {
        text.to_string()
    }
}

fn binds_looser_than_and(tree: &SyntaxTree, expr: NodeId) -> bool {
    let and = TokenKind::AmpersandAmpersand.binary_precedence().unwrap_or(u8::MAX);
    match tree.kind(expr) {
        SyntaxKind::BinaryExpression => tree
            .child_tokens(expr)
            .next()
            .and_then(|op| tree.token_kind(op).binary_precedence())
            .is_some_and(|p| p < and),
        SyntaxKind::ConditionalExpression | SyntaxKind::AssignmentExpression | SyntaxKind::LambdaExpression => true,
        _ => false,
    }
}

/// Primary or unary expression: `!` can be prefixed without parentheses.
pub fn is_primary_or_unary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IdentifierName
            | SyntaxKind::PredefinedType
            | SyntaxKind::LiteralExpression
            | SyntaxKind::ParenthesizedExpression
            | SyntaxKind::InvocationExpression
            | SyntaxKind::MemberAccessExpression
            | SyntaxKind::ElementAccessExpression
            | SyntaxKind::ObjectCreationExpression
            | SyntaxKind::PostfixUnaryExpression
            | SyntaxKind::PrefixUnaryExpression
            | SyntaxKind::AwaitExpression
    )
}

/// Синтаксическое отрицание: `!C` или `!(C)`. Уже отрицательное `!x` даёт `!!x` как есть.
pub fn negate(tree: &SyntaxTree, expr: NodeId) -> String {
    let text = tree.node_text(expr);
    if is_primary_or_unary(tree.kind(expr)) {
        format!("!{text}")
    } else {
        format!("!({text})")
    }
}

/// Отступ строки, содержащей `offset` (пробелы и табуляции в начале строки).
pub fn line_indent(text: &str, offset: u32) -> &str {
    let offset = (offset as usize).min(text.len());
    let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Убирает до `delta` пробельных символов в начале каждой строки, кроме первой.
pub fn reindent(text: &str, delta: usize) -> String {
    if delta == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split_inclusive('\n').enumerate() {
        if i == 0 {
            out.push_str(line);
            continue;
        }
        let removable = line
            .bytes()
            .take(delta)
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        out.push_str(&line[removable..]);
    }
    out
}

/// Текст `base` без указанных диапазонов (диапазоны в координатах документа).
pub fn remove_ranges(text: &str, base: PackedSpan, ranges: &[PackedSpan]) -> String {
    let mut ranges: Vec<PackedSpan> = ranges
        .iter()
        .copied()
        .filter(|r| base.contains_span(*r))
        .collect();
    ranges.sort();
    let mut out = String::with_capacity(base.len as usize);
    let mut cursor = base.start;
    for range in ranges {
        if range.start > cursor {
            out.push_str(&text[cursor as usize..range.start as usize]);
        }
        cursor = cursor.max(range.end());
    }
    if cursor < base.end() {
        out.push_str(&text[cursor as usize..base.end() as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, preorder};
    use pretty_assertions::assert_eq;

    fn conditions(text: &str) -> (SyntaxTree, Vec<NodeId>) {
        let tree = parse(text, 0).unwrap();
        let ifs: Vec<_> = preorder(&tree, tree.root())
            .filter(|id| tree.kind(*id) == SyntaxKind::IfStatement)
            .collect();
        let conds = ifs.iter().map(|i| tree.nth_child_node(*i, 0).unwrap()).collect();
        (tree, conds)
    }

    #[test]
    fn and_operands_keep_precedence() {
        let (tree, conds) = conditions("void M() { if (a || b) F(); if (a == b) F(); if (c ? d : e) F(); if (x ?? y) F(); }");
        assert_eq!(operand_for_and(&tree, conds[0]), "(a || b)");
        assert_eq!(operand_for_and(&tree, conds[1]), "a == b");
        assert_eq!(operand_for_and(&tree, conds[2]), "(c ? d : e)");
        assert_eq!(operand_for_and(&tree, conds[3]), "(x ?? y)");
    }

    #[test]
    fn negation_is_syntactic() {
        let (tree, conds) = conditions("void M() { if (ok) F(); if (a > b) F(); if (!done) F(); if (G(x)) F(); }");
        assert_eq!(negate(&tree, conds[0]), "!ok");
        assert_eq!(negate(&tree, conds[1]), "!(a > b)");
        assert_eq!(negate(&tree, conds[2]), "!!done");
        assert_eq!(negate(&tree, conds[3]), "!G(x)");
    }

    #[test]
    fn indentation_helpers() {
        let text = "class C\n{\n    void M()\n\t{ }\n}";
        assert_eq!(line_indent(text, 16), "    ");
        assert_eq!(line_indent(text, 27), "\t");
        assert_eq!(reindent("{\n        F();\n    }", 4), "{\n    F();\n}");
        assert_eq!(reindent("{\n  F();\n}", 4), "{\nF();\n}");
    }

    #[test]
    fn removes_ranges_inside_base() {
        let text = "async Task F() => await G();";
        let base = PackedSpan::new(0, text.len() as u32);
        let out = remove_ranges(text, base, &[PackedSpan::new(18, 6), PackedSpan::new(0, 6)]);
        assert_eq!(out, "Task F() => G();");
    }
}
