use super::*;
use crate::rewrite::apply_edit;
use crate::semantic::SemanticModel;
use crate::syntax::{parse, preorder, SyntaxTree};
use pretty_assertions::assert_eq;

fn find_all(tree: &SyntaxTree, family: RuleFamily) -> Vec<Candidate> {
    let model = SemanticModel::build(tree);
    let ctx = RuleContext::new(&model);
    preorder(tree, tree.root()).filter_map(|id| family.find(&ctx, id)).collect()
}

fn count(source: &str, family: RuleFamily) -> usize {
    let tree = parse(source, 0).unwrap();
    find_all(&tree, family).len()
}

/// Исправление первого кандидата.
fn fix(source: &str, family: RuleFamily) -> String {
    let tree = parse(source, 0).unwrap();
    let model = SemanticModel::build(&tree);
    let ctx = RuleContext::new(&model);
    let candidate = preorder(&tree, tree.root())
        .find_map(|id| family.find(&ctx, id))
        .expect("candidate expected");
    let plan = family.plan(&ctx, &candidate).unwrap();
    apply_edit(tree.text(), &plan.edit).unwrap()
}

fn fade_out_texts(source: &str, family: RuleFamily) -> Vec<String> {
    let tree = parse(source, 0).unwrap();
    let model = SemanticModel::build(&tree);
    let ctx = RuleContext::new(&model);
    let candidate = preorder(&tree, tree.root()).find_map(|id| family.find(&ctx, id)).unwrap();
    let plan = family.plan(&ctx, &candidate).unwrap();
    plan.fade_out.iter().map(|s| tree.slice(*s).to_string()).collect()
}

#[test]
fn rule_ids_are_unique_and_round_trip() {
    for family in RuleFamily::ALL {
        assert_eq!(RuleFamily::from_rule_id(family.rule_id()), Some(family));
    }
    assert_eq!(RuleFamily::from_rule_id("mrg004"), Some(RuleFamily::SimplifyIfToReturn));
    assert_eq!(RuleFamily::from_rule_id("BSL001"), None);
}

#[test]
fn families_ignore_untriggered_kinds() {
    assert!(RuleFamily::MergeNestedIf.is_triggered_by(SyntaxKind::IfStatement));
    assert!(!RuleFamily::MergeNestedIf.is_triggered_by(SyntaxKind::Block));
    assert!(RuleFamily::RemoveRedundantAsyncAwait.is_triggered_by(SyntaxKind::LambdaExpression));
}

#[test]
fn nested_if_merges_conditions() {
    let source = "void M(bool a, bool b) { if (a) { if (b) { Foo(); } } }";
    assert_eq!(count(source, RuleFamily::MergeNestedIf), 1);
    assert_eq!(
        fix(source, RuleFamily::MergeNestedIf),
        "void M(bool a, bool b) { if (a && b) { Foo(); } }"
    );
    assert_eq!(fade_out_texts(source, RuleFamily::MergeNestedIf), vec!["{", "if", "(", ")", "}"]);
}

#[test]
fn nested_if_reindents_body() {
    let source = "void M() {\n    if (a)\n    {\n        if (b)\n        {\n            Foo();\n        }\n    }\n}\n";
    assert_eq!(
        fix(source, RuleFamily::MergeNestedIf),
        "void M() {\n    if (a && b)\n    {\n        Foo();\n    }\n}\n"
    );
}

#[test]
fn nested_if_parenthesizes_or_operand() {
    let source = "void M() { if (a || c) { if (b) Foo(); } }";
    assert_eq!(fix(source, RuleFamily::MergeNestedIf), "void M() { if ((a || c) && b) Foo(); }");
}

#[test]
fn nested_if_rejections() {
    // комментарий между заголовками
    assert_eq!(count("void M() { if (a) { // keep\n if (b) { Foo(); } } }", RuleFamily::MergeNestedIf), 0);
    // вложенное условие с ||
    assert_eq!(count("void M() { if (a) { if (b || c) Foo(); } }", RuleFamily::MergeNestedIf), 0);
    // else у любого из if
    assert_eq!(count("void M() { if (a) { if (b) Foo(); else Bar(); } }", RuleFamily::MergeNestedIf), 0);
    assert_eq!(count("void M() { if (a) { if (b) Foo(); } else Bar(); }", RuleFamily::MergeNestedIf), 0);
    // второй оператор в блоке
    assert_eq!(count("void M() { if (a) { if (b) Foo(); Bar(); } }", RuleFamily::MergeNestedIf), 0);
}

#[test]
fn nested_if_keeps_comment_after_inner_statement() {
    let source = "void M() {\n    if (a)\n    {\n        if (b) F(); // keep me\n    }\n}\n";
    assert_eq!(count(source, RuleFamily::MergeNestedIf), 0);
    let source = "void M() { if (a) { if (b) { F(); } /* keep */ } }";
    assert_eq!(count(source, RuleFamily::MergeNestedIf), 0);
}

#[test]
fn nested_if_fix_is_idempotent() {
    let fixed = fix("void M() { if (a) { if (b) { Foo(); } } }", RuleFamily::MergeNestedIf);
    assert_eq!(count(&fixed, RuleFamily::MergeNestedIf), 0);
}

#[test]
fn local_declaration_merges_into_return() {
    let source = "int F() { var x = G(); return x; }\nint G() => 1;";
    assert_eq!(fix(source, RuleFamily::MergeLocalDeclarationWithReturn), "int F() { return G(); }\nint G() => 1;");
    assert_eq!(
        fade_out_texts(source, RuleFamily::MergeLocalDeclarationWithReturn),
        vec!["var", "x", "=", ";", "x"]
    );
}

#[test]
fn local_declaration_rejections() {
    let family = RuleFamily::MergeLocalDeclarationWithReturn;
    assert_eq!(count("int F() { int x = 1, y = 2; return x; }", family), 0);
    assert_eq!(count("int F(int y) { int x = 1; return y; }", family), 0);
    assert_eq!(count("int F() { const int x = 1; return x; }", family), 0);
    assert_eq!(count("int F() { int x = 1; // note\n return x; }", family), 0);
    assert_eq!(count("int F() { int x; return x; }", family), 0);
}

#[test]
fn assignment_merges_into_return() {
    let source = "int F(int a) { a = G(); return a; }";
    assert_eq!(fix(source, RuleFamily::MergeAssignmentWithReturn), "int F(int a) { return G(); }");
    assert_eq!(fade_out_texts(source, RuleFamily::MergeAssignmentWithReturn), vec!["a", "=", ";", "a"]);
}

#[test]
fn assignment_rejections() {
    let family = RuleFamily::MergeAssignmentWithReturn;
    assert_eq!(count("int F(ref int a) { a = G(); return a; }", family), 0);
    assert_eq!(count("int F(int a) { a += G(); return a; }", family), 0);
    assert_eq!(count("int F() { int x = 0; Action f = () => x++; x = G(); return x; }", family), 0);
}

#[test]
fn if_else_bool_returns_become_condition() {
    let family = RuleFamily::SimplifyIfToReturn;
    assert_eq!(
        fix("bool F(bool c) { if (c) return true; else return false; }", family),
        "bool F(bool c) { return c; }"
    );
    assert_eq!(
        fix("bool F(bool c) { if (c) { return false; } else { return true; } }", family),
        "bool F(bool c) { return !c; }"
    );
}

#[test]
fn trailing_return_variant_negates() {
    let family = RuleFamily::SimplifyIfToReturn;
    assert_eq!(
        fix("bool F(int a, int b) { if (a > b) return false; return true; }", family),
        "bool F(int a, int b) { return !(a > b); }"
    );
    // двойное отрицание остаётся как есть
    assert_eq!(
        fix("bool F(bool c) { if (!c) return false; return true; }", family),
        "bool F(bool c) { return !!c; }"
    );
}

#[test]
fn if_to_return_rejections() {
    let family = RuleFamily::SimplifyIfToReturn;
    assert_eq!(count("bool F(bool c) { if (c) return true; else return true; }", family), 0);
    assert_eq!(count("bool F(bool c) { if (c) return true; G(); return false; }", family), 0);
    assert_eq!(count("bool F(bool c) { if (c) return true; /* why */ return false; }", family), 0);
}

#[test]
fn blank_lines_inside_braces_are_removed() {
    let source = "class C\n{\n\n    void M() { }\n\n}\n";
    assert_eq!(count(source, RuleFamily::RemoveRedundantBlankLine), 1);
    assert_eq!(fix(source, RuleFamily::RemoveRedundantBlankLine), "class C\n{\n    void M() { }\n}\n");
}

#[test]
fn blank_lines_keep_comment_lines() {
    let source = "void M()\n{\n    // header\n\n    G();\n}\n";
    assert_eq!(count(source, RuleFamily::RemoveRedundantBlankLine), 0);
}

#[test]
fn blank_line_before_do_while() {
    let source = "void M() {\n    do\n    {\n        G();\n    }\n\n    while (x);\n}\n";
    assert_eq!(
        fix(source, RuleFamily::RemoveRedundantBlankLine),
        "void M() {\n    do\n    {\n        G();\n    }\n    while (x);\n}\n"
    );
    assert_eq!(count("void M() { do { G(); } while (x); }", RuleFamily::RemoveRedundantBlankLine), 0);
}

#[test]
fn blank_line_fix_is_idempotent() {
    let fixed = fix("void M()\n{\n\n\n    G();\n\n}\n", RuleFamily::RemoveRedundantBlankLine);
    assert_eq!(fixed, "void M()\n{\n    G();\n}\n");
    assert_eq!(count(&fixed, RuleFamily::RemoveRedundantBlankLine), 0);
}

const HELPERS: &str = "\nTask<int> G() => Task.FromResult(1);\nTask H() => Task.CompletedTask;";

#[test]
fn redundant_async_await_is_removed() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let source = format!("async Task<int> F() {{ return await G(); }}{HELPERS}");
    assert_eq!(fix(&source, family), format!("Task<int> F() {{ return G(); }}{HELPERS}"));
    assert_eq!(fade_out_texts(&source, family), vec!["async", "await"]);
}

#[test]
fn configure_await_is_stripped() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let source = format!("async Task<int> F() {{ return await G().ConfigureAwait(false); }}{HELPERS}");
    assert_eq!(fix(&source, family), format!("Task<int> F() {{ return G(); }}{HELPERS}"));
}

#[test]
fn expression_bodied_and_branching_async() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let source = format!("async Task F() => await H();{HELPERS}");
    assert_eq!(fix(&source, family), format!("Task F() => H();{HELPERS}"));

    let branches = format!(
        "async Task<int> F(bool c) {{ if (c) {{ return await G(); }} else {{ return await G(); }} }}{HELPERS}"
    );
    assert_eq!(count(&branches, family), 1);
}

#[test]
fn async_rejections() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    // два await, один return
    assert_eq!(count(&format!("async Task<int> F() {{ await H(); return await G(); }}{HELPERS}"), family), 0);
    // несовпадение типов
    assert_eq!(count(&format!("async Task<long> F() {{ return await G(); }}{HELPERS}"), family), 0);
    // последний оператор не return await
    assert_eq!(count(&format!("async Task F() {{ await H(); G(); }}{HELPERS}"), family), 0);
    // без async
    assert_eq!(count(&format!("Task<int> F() {{ return G(); }}{HELPERS}"), family), 0);
}

#[test]
fn async_fix_is_idempotent() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let fixed = fix(&format!("async Task<int> F() {{ return await G(); }}{HELPERS}"), family);
    assert_eq!(count(&fixed, family), 0);
}

#[test]
fn exhaustive_switch_is_a_terminal_cascade() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let source = format!(
        "async Task<int> F(int k) {{ switch (k) {{ case 1: return await G(); default: return await G(); }} }}{HELPERS}"
    );
    assert_eq!(
        fix(&source, family),
        format!("Task<int> F(int k) {{ switch (k) {{ case 1: return G(); default: return G(); }} }}{HELPERS}")
    );
}

#[test]
fn await_outside_terminal_position_is_kept() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    // ранний return await вне исчерпывающего каскада
    assert_eq!(count(&format!("async Task<int> F(bool a) {{ if (a) return await G(); return await G(); }}{HELPERS}"), family), 0);
    assert_eq!(
        count(&format!("async Task<int> F(bool a) {{ while (a) {{ return await G(); }} return await G(); }}{HELPERS}"), family),
        0
    );
    assert_eq!(
        count(
            &format!(
                "async Task<int> F(int k) {{ switch (k) {{ case 1: return await G(); default: break; }} return await G(); }}{HELPERS}"
            ),
            family
        ),
        0
    );
}

#[test]
fn async_lambda_and_local_function() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    let lambda = format!("void M() {{ Func<Task> f = async () => await H(); }}{HELPERS}");
    assert_eq!(fix(&lambda, family), format!("void M() {{ Func<Task> f = () => H(); }}{HELPERS}"));

    let local = format!("void M() {{ async Task<int> L() {{ return await G(); }} }}{HELPERS}");
    assert_eq!(count(&local, family), 1);
    assert_eq!(fix(&local, family), format!("void M() {{ Task<int> L() {{ return G(); }} }}{HELPERS}"));
}

#[test]
fn comments_on_removed_async_tokens_block_the_fix() {
    let family = RuleFamily::RemoveRedundantAsyncAwait;
    assert_eq!(count(&format!("async Task<int> F() {{ return await // keep me\n        G(); }}{HELPERS}"), family), 0);
    assert_eq!(count(&format!("async /* keep */ Task<int> F() {{ return await G(); }}{HELPERS}"), family), 0);
    assert_eq!(
        count(&format!("async Task<int> F() {{ return await G().ConfigureAwait(/* keep */ false); }}{HELPERS}"), family),
        0
    );
}
