use super::*;
use crate::eval::{evaluate, EtaValues, EvalError, Machine, ParamValues};
use crate::ir::{Bound, Param};

fn constant(level: u32, values: &[i64]) -> Node {
    Node::constant(LoopLevel::Loop(level), values.to_vec())
}

fn top(values: &[i64]) -> Node {
    Node::constant(LoopLevel::Top, values.to_vec())
}

fn param_bound(text: &str) -> Bound {
    Bound::parse_param(text).unwrap()
}

fn params(p0: i64, p1: i64) -> ParamValues {
    ParamValues::new()
        .with(Param::P0, p0)
        .with(Param::P1, p1)
        .with(Param::P2, 2)
        .with(Param::P3, 0)
}

fn run(tree: &Node, values: &ParamValues) -> Result<i64, EvalError> {
    let program = generate_program(tree)?;
    Machine::new(values).run(&program)
}

/// Runs the generated program and reads back every slot of the root.
fn generated_slots(tree: &Node, values: &ParamValues) -> Vec<i64> {
    let mut sink = CodeSink::new();
    let generated = Generator::new(&mut sink).generate(tree).unwrap();
    sink.emit(Stmt::Return(generated.eta[0].clone()));
    let program = sink.finish();
    let mut machine = Machine::new(values);
    machine.run(&program).unwrap();
    generated
        .eta
        .iter()
        .map(|slot| machine.get(slot).unwrap())
        .collect()
}

fn scenario_closed() -> Node {
    Node::sequence(vec![
        constant(0, &[1331, 1321]),
        Node::bounded_loop(constant(2, &[325, 265]), 2, Bound::literal(2)),
    ])
}

fn scenario_param() -> Node {
    Node::bounded_loop(
        Node::sequence(vec![constant(0, &[20, 10]), constant(0, &[100])]),
        0,
        param_bound("param_0"),
    )
}

/// Trees exercising every node kind, flat and nested loops included.
fn sample_trees() -> Vec<Node> {
    vec![
        scenario_closed(),
        scenario_param(),
        // nested: inner loop 1 still varies with loop 0
        Node::bounded_loop(
            Node::bounded_loop(constant(0, &[9, 5, 4]), 1, param_bound("param_1")),
            0,
            param_bound("param_0"),
        ),
        // nested loop left unresolved at the root
        Node::bounded_loop(constant(0, &[9, 5]), 1, param_bound("param_1 + 1")),
        Node::bounded_loop(
            Node::binary_alternative(constant(0, &[10, 1]), constant(0, &[5])),
            0,
            param_bound("param_0"),
        ),
        Node::sequence(vec![
            top(&[3]),
            Node::conditional(
                Expr::parse("param_1 > 2").unwrap(),
                Node::bounded_loop(constant(4, &[8, 6, 6]), 4, param_bound("param_0 * param_2")),
            ),
        ]),
        Node::bounded_loop(
            Node::sequence(vec![
                Node::alternative(vec![
                    constant(0, &[12, 7, 2]),
                    constant(0, &[9, 9]),
                    Node::bounded_loop(constant(0, &[4, 1]), 3, Bound::literal(3)),
                ])
                .unwrap(),
                Node::conditional(
                    Expr::parse("param_0 % 2 == 0 && param_3 == 0").unwrap(),
                    constant(0, &[5, 0]),
                ),
            ]),
            0,
            param_bound("param_1"),
        ),
    ]
}

#[test]
fn test_closed_scenario() {
    let tree = scenario_closed();
    let program = generate_program(&tree).unwrap();
    assert!(program.params.is_empty());
    // 1331 plus the whole inner loop, 325 + 265 * (2 - 1)
    assert_eq!(Machine::new(&ParamValues::new()).run(&program).unwrap(), 1921);
    assert_eq!(
        evaluate(&tree, &ParamValues::new()).unwrap().eta.slots()[0],
        1921
    );
}

#[test]
fn test_param_scenario() {
    let tree = scenario_param();
    let program = generate_program(&tree).unwrap();
    assert_eq!(program.params, vec![Param::P0]);
    let body = EtaValues(vec![120, 110]);
    for (n, expected) in [(0, 0), (1, 120), (5, 560)] {
        let values = ParamValues::new().with(Param::P0, n);
        assert_eq!(Machine::new(&values).run(&program).unwrap(), expected);
        assert_eq!(body.value(n as u64), Ok(expected));
    }
}

#[test]
fn test_generated_matches_reference() {
    for tree in sample_trees() {
        for p0 in 0..=5 {
            for p1 in 0..=5 {
                let values = params(p0, p1);
                let expected = evaluate(&tree, &values).unwrap().eta.0;
                assert_eq!(
                    generated_slots(&tree, &values),
                    expected,
                    "{} at param_0 = {}, param_1 = {}",
                    tree,
                    p0,
                    p1
                );
            }
        }
    }
}

#[test]
fn test_flat_single_slot_is_linear() {
    let tree = Node::bounded_loop(constant(0, &[7]), 0, param_bound("param_0"));
    for n in 0..6 {
        assert_eq!(run(&tree, &params(n, 0)).unwrap(), 7 * n);
    }
}

#[test]
fn test_sequence_is_additive() {
    let a = EtaValues(vec![20, 10]);
    let b = EtaValues(vec![7, 3, 1]);
    let tree = Node::bounded_loop(
        Node::sequence(vec![constant(0, &a.0), constant(0, &b.0)]),
        0,
        param_bound("param_0"),
    );
    for n in 0..8 {
        assert_eq!(
            run(&tree, &params(n, 0)).unwrap(),
            a.value(n as u64).unwrap() + b.value(n as u64).unwrap()
        );
    }
}

#[test]
fn test_alternative_dominates_both_sides() {
    let pairs: [(&[i64], &[i64]); 4] = [
        (&[10, 1], &[5]),
        (&[9, 6], &[8, 7]),
        (&[3, 3], &[10, 1]),
        (&[10, 1], &[9, 8, 7]),
    ];
    for (a, b) in pairs {
        let (left, right) = (EtaValues(a.to_vec()), EtaValues(b.to_vec()));
        assert!(left.is_non_increasing() && right.is_non_increasing());
        let tree = Node::bounded_loop(
            Node::binary_alternative(constant(0, a), constant(0, b)),
            0,
            param_bound("param_0"),
        );
        for n in 0..12 {
            let worst = run(&tree, &params(n, 0)).unwrap();
            let bound = left.value(n as u64).unwrap().max(right.value(n as u64).unwrap());
            assert!(worst >= bound, "{:?} | {:?} at {}: {} < {}", a, b, n, worst, bound);
        }
    }
}

#[test]
fn test_alternative_widths() {
    let mut sink = CodeSink::new();
    let generated = Generator::new(&mut sink)
        .generate(&Node::binary_alternative(top(&[4, 3, 2]), top(&[5, 1])))
        .unwrap();
    assert_eq!(generated.eta.len(), 4);
    assert_eq!(generated.level, LoopLevel::Top);
}

#[test]
fn test_levels() {
    let mut sink = CodeSink::new();
    let mut gen = Generator::new(&mut sink);
    let seq = Node::sequence(vec![top(&[1]), constant(1, &[2]), constant(3, &[3])]);
    assert_eq!(gen.generate(&seq).unwrap().level, LoopLevel::Loop(3));

    let nested = Node::bounded_loop(constant(0, &[1, 1]), 5, Bound::literal(4));
    assert_eq!(gen.generate(&nested).unwrap().level, LoopLevel::Loop(0));

    let flat = Node::bounded_loop(constant(6, &[1, 1]), 6, Bound::literal(4));
    let generated = gen.generate(&flat).unwrap();
    assert_eq!(generated.level, LoopLevel::Top);
    assert_eq!(generated.eta.len(), 1);
}

#[test]
fn test_names_are_deterministic() {
    let first = generate_program(&scenario_closed()).unwrap();
    let second = generate_program(&scenario_closed()).unwrap();
    assert_eq!(first, second);

    let names: Vec<&str> = first.declarations.iter().map(Var::name).collect();
    assert_eq!(
        names,
        vec![
            "cst_1_eta_0",
            "cst_1_eta_1",
            "cst_2_eta_0",
            "cst_2_eta_1",
            "loop_2_bound",
            "loop_2_eta_0",
            "seq_0_eta_0",
            "seq_0_eta_1",
        ]
    );
    assert_eq!(first.result(), Some(&Var::new("seq_0_eta_0")));
}

#[test]
fn test_shared_node_rejected() {
    let leaf = top(&[1]);
    let tree = Node::sequence(vec![leaf.clone(), leaf]);
    assert!(matches!(
        generate_program(&tree),
        Err(GenError::DoubleGeneration(_))
    ));
}

#[test]
fn test_generate_twice_rejected() {
    let tree = top(&[1]);
    let mut sink = CodeSink::new();
    let mut gen = Generator::new(&mut sink);
    assert!(gen.generate(&tree).is_ok());
    assert_eq!(
        gen.generate(&tree).unwrap_err(),
        GenError::DoubleGeneration(tree.id())
    );
}

#[test]
fn test_duplicate_loop_rejected() {
    let tree = Node::sequence(vec![
        Node::bounded_loop(constant(1, &[1]), 1, Bound::literal(2)),
        Node::bounded_loop(constant(1, &[1]), 1, Bound::literal(3)),
    ]);
    assert_eq!(generate_program(&tree).unwrap_err(), GenError::DuplicateLoop(1));
}

#[test]
fn test_body_level_must_not_exceed_loop() {
    let tree = Node::bounded_loop(Node::sequence(vec![constant(7, &[4, 1])]), 3, Bound::literal(2));
    assert_eq!(
        generate_program(&tree).unwrap_err(),
        GenError::LevelOrder {
            loop_id: 3,
            body_level: LoopLevel::Loop(7),
        }
    );

    // a Top body and an outer loop's level are both fine
    let outer = Node::bounded_loop(top(&[2]), 3, Bound::literal(2));
    assert!(generate_program(&outer).is_ok());
    let inner = Node::bounded_loop(constant(1, &[2]), 3, Bound::literal(2));
    assert!(generate_program(&inner).is_ok());
}

#[test]
fn test_empty_inputs_rejected() {
    let empty_seq = Node::sequence(Vec::new());
    assert_eq!(
        generate_program(&empty_seq).unwrap_err(),
        GenError::EmptySequence(empty_seq.id())
    );
    let empty_constant = top(&[]);
    assert_eq!(
        generate_program(&empty_constant).unwrap_err(),
        GenError::EmptyEtaVector(empty_constant.id())
    );
}

#[test]
fn test_conditional_declares_params() {
    let tree = Node::conditional(
        Expr::parse("param_3 != 0").unwrap(),
        Node::bounded_loop(constant(0, &[2]), 0, param_bound("param_1")),
    );
    let program = generate_program(&tree).unwrap();
    assert_eq!(program.params, vec![Param::P1, Param::P3]);
}
