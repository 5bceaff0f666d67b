use super::*;
use crate::ir::{BinOp, Bound, LoopLevel, NodeKind, Param, UnOp};

fn tree(source: &str) -> Node {
    match parse_tree(source) {
        Ok(node) => node,
        Err(diags) => panic!("parse errors: {:?}", diags),
    }
}

fn errors(source: &str) -> Vec<Diagnostic> {
    match parse_tree(source) {
        Ok(node) => panic!("expected errors, parsed {}", node),
        Err(diags) => diags,
    }
}

fn expr(text: &str) -> Expr {
    parse_expr(text, 0).unwrap()
}

#[test]
fn test_constant() {
    let node = tree("Constant(0, [20, 10])");
    match &node.kind {
        NodeKind::Constant { level, values } => {
            assert_eq!(*level, LoopLevel::Loop(0));
            assert_eq!(values, &vec![20, 10]);
        }
        _ => panic!("expected constant"),
    }
}

#[test]
fn test_top_level_spellings() {
    for source in ["Constant(TOP, [1])", "Constant(-1, [1])"] {
        match &tree(source).kind {
            NodeKind::Constant { level, .. } => assert_eq!(*level, LoopLevel::Top),
            _ => panic!("expected constant"),
        }
    }
}

#[test]
fn test_negative_cost_and_trailing_comma() {
    match &tree("Constant(TOP, [5, -2,])").kind {
        NodeKind::Constant { values, .. } => assert_eq!(values, &vec![5, -2]),
        _ => panic!("expected constant"),
    }
}

#[test]
fn test_trailing_comma_in_constructor() {
    let node = tree("Loop(\n  Constant(0, [1],),\n  0,\n  ConstantBound(3),\n)");
    assert!(matches!(node.kind, NodeKind::Loop { .. }));
}

#[test]
fn test_scenario_round_trips_through_display() {
    let source = "Loop(Seq([Constant(0, [20, 10]), Constant(0, [100])]), 0, ParamBound(\"param_0\"))";
    assert_eq!(tree(source).to_string(), source);
}

#[test]
fn test_long_names_and_comments() {
    let source = "// audiobeam\nSequence([\n    Constant(0, [1331, 1321]), # head\n    Loop(Constant(2, [325, 265]), 2, ConstantBound(2)),\n])";
    let node = tree(source);
    match &node.kind {
        NodeKind::Sequence { children } => {
            assert_eq!(children.len(), 2);
            match &children[1].kind {
                NodeKind::Loop { id, bound, .. } => {
                    assert_eq!(*id, 2);
                    assert_eq!(bound, &Bound::literal(2));
                }
                _ => panic!("expected loop"),
            }
        }
        _ => panic!("expected sequence"),
    }
}

#[test]
fn test_param_bound_index_shorthand() {
    match &tree("Loop(Constant(0, [1]), 0, ParamBound(1))").kind {
        NodeKind::Loop { bound, .. } => {
            assert_eq!(bound, &Bound::param(Expr::Param(Param::P1)));
        }
        _ => panic!("expected loop"),
    }
}

#[test]
fn test_alternative_of_three() {
    let node = tree("Alternative([Constant(TOP, [1]), Constant(TOP, [2]), Constant(TOP, [3])])");
    match &node.kind {
        NodeKind::Alternative { right, .. } => {
            assert!(matches!(right.kind, NodeKind::Alternative { .. }));
        }
        _ => panic!("expected alternative"),
    }
    assert_eq!(node.size(), 5);
}

#[test]
fn test_conditional() {
    match &tree("Conditional(\"param_2 >= 4\", Constant(TOP, [7]))").kind {
        NodeKind::Conditional { test, .. } => {
            assert_eq!(
                test,
                &Expr::binary(BinOp::Ge, Expr::Param(Param::P2), Expr::Int(4))
            );
        }
        _ => panic!("expected conditional"),
    }
}

#[test]
fn test_expr_precedence() {
    assert_eq!(
        expr("param_0 + param_1 * 2"),
        Expr::binary(
            BinOp::Add,
            Expr::Param(Param::P0),
            Expr::binary(BinOp::Mul, Expr::Param(Param::P1), Expr::Int(2)),
        )
    );
    assert_eq!(
        expr("param_0 > 1 && param_1 == 0 || param_2"),
        Expr::binary(
            BinOp::Or,
            Expr::binary(
                BinOp::And,
                Expr::binary(BinOp::Gt, Expr::Param(Param::P0), Expr::Int(1)),
                Expr::binary(BinOp::Eq, Expr::Param(Param::P1), Expr::Int(0)),
            ),
            Expr::Param(Param::P2),
        )
    );
}

#[test]
fn test_expr_left_associative() {
    assert_eq!(
        expr("10 - 3 - 2"),
        Expr::binary(
            BinOp::Sub,
            Expr::binary(BinOp::Sub, Expr::Int(10), Expr::Int(3)),
            Expr::Int(2),
        )
    );
}

#[test]
fn test_expr_unary_and_parens() {
    assert_eq!(expr("-4"), Expr::Int(-4));
    assert_eq!(
        expr("!(param_3 - 1)"),
        Expr::Unary(
            UnOp::Not,
            Box::new(Expr::binary(BinOp::Sub, Expr::Param(Param::P3), Expr::Int(1))),
        )
    );
}

#[test]
fn test_expr_trailing_tokens_rejected() {
    assert!(parse_expr("param_0 param_1", 0).is_err());
    assert!(parse_expr("", 0).is_err());
    assert!(parse_expr("(param_0", 0).is_err());
}

#[test]
fn test_unresolved_parameter_points_into_string() {
    let source = "Loop(Constant(0, [1]), 0, ParamBound(\"param_7 + 1\"))";
    let diags = errors(source);
    assert_eq!(diags.len(), 1);
    let start = source.find("param_7").unwrap();
    assert_eq!(diags[0].span.range(), start..start + "param_7".len());
    assert!(diags[0].message.contains("param_7"));
}

#[test]
fn test_param_bound_index_out_of_range() {
    let diags = errors("Loop(Constant(0, [1]), 0, ParamBound(4))");
    assert!(diags[0].message.contains("param_4"));
}

#[test]
fn test_empty_constant_and_sequence_rejected() {
    assert!(errors("Constant(TOP, [])")[0].message.contains("no eta values"));
    assert!(errors("Seq([])")[0].message.contains("no children"));
    assert_eq!(errors("Alt([])").len(), 1);
}

#[test]
fn test_duplicate_loop_id() {
    let diags = errors(
        "Seq([Loop(Constant(1, [1]), 1, ConstantBound(2)), Loop(Constant(1, [1]), 1, ConstantBound(3))])",
    );
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("loop id 1"));
}

#[test]
fn test_bad_level() {
    let diags = errors("Constant(-2, [1])");
    assert!(diags[0].message.contains("invalid loop level"));
    let diags = errors("Constant(4294967296, [1])");
    assert!(diags[0].message.contains("out of range"));
}

#[test]
fn test_missing_pieces_reported() {
    let diags = errors("Loop(Constant(0, [1]), 0)");
    assert!(diags.iter().any(|d| d.message.contains("expected a loop bound")));
    let diags = errors("Constant(TOP, [1]");
    assert!(diags[0].message.contains("expected ')'"));
}

#[test]
fn test_empty_source() {
    let diags = errors("  // nothing here\n");
    assert!(diags[0].message.contains("end of file"));
}

#[test]
fn test_two_roots_rejected() {
    let diags = errors("Constant(TOP, [1]) Constant(TOP, [2])");
    assert!(diags[0].message.contains("after the root node"));
}

#[test]
fn test_nesting_limit() {
    let mut source = String::new();
    for _ in 0..300 {
        source.push_str("Seq([");
    }
    source.push_str("Constant(TOP, [1])");
    for _ in 0..300 {
        source.push_str("])");
    }
    let diags = errors(&source);
    assert!(diags.iter().any(|d| d.message.contains("nesting depth")));
}
