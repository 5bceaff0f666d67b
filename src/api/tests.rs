use super::*;
use crate::parser::parse_tree;

const SCENARIO: &str =
    "Loop(Seq([Constant(0, [20, 10]), Constant(0, [100])]), 0, ParamBound(\"param_0\"))";

#[test]
fn test_compile_default_is_c_eval() {
    let text = compile(SCENARIO, "scenario.cft").unwrap();
    assert!(text.starts_with("/*\n * WCET evaluation function\n"));
    assert!(text.contains("int eval(int param_0) {"));
}

#[test]
fn test_compile_with_options() {
    let options = GenerateOptions {
        function_name: "wcet_toto".to_string(),
        target: "rust".to_string(),
    };
    let text = compile_with_options(SCENARIO, "scenario.cft", &options).unwrap();
    assert!(text.contains("pub fn wcet_toto(param_0: i64) -> i64 {"));
}

#[test]
fn test_compile_reports_parse_errors() {
    let errors = compile("Seq([Constant(TOP, [1]),", "bad.cft").unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|d| d.is_error()));
}

#[test]
fn test_bad_options_rejected() {
    let program = generate_tree(&parse_tree(SCENARIO).unwrap()).unwrap();
    let err = lower_program(&program, &GenerateOptions::for_target("cobol")).unwrap_err();
    assert!(err.message.contains("cobol"));
    let options = GenerateOptions {
        function_name: "two words".to_string(),
        ..GenerateOptions::default()
    };
    let err = lower_program(&program, &options).unwrap_err();
    assert!(err.message.contains("invalid function name"));
}

#[test]
fn test_options_from_project() {
    let project = Project {
        function: Some("wcet".to_string()),
        ..Project::default()
    };
    let options = GenerateOptions::from_project(&project);
    assert_eq!(options.function_name, "wcet");
    assert_eq!(options.target, "c");
}

#[test]
fn test_generation_errors_become_diagnostics() {
    let leaf = Node::constant(LoopLevel::Top, [1]);
    let tree = Node::sequence(vec![leaf.clone(), leaf]);
    let errors = generate_tree(&tree).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("generated twice"));
}

#[test]
fn test_evaluate_tree() {
    let tree = parse_tree(SCENARIO).unwrap();
    let eval = evaluate_tree(&tree, &ParamValues::new().with(Param::P0, 5)).unwrap();
    assert_eq!(eval.result, 560);
    assert_eq!(eval.reference.slots(), &[560]);
    assert_eq!(eval.level, LoopLevel::Top);
}

#[test]
fn test_evaluate_missing_param() {
    let tree = parse_tree(SCENARIO).unwrap();
    let err = evaluate_tree(&tree, &ParamValues::new()).unwrap_err();
    assert!(err.message.contains("param_0"));
    assert_eq!(err.help.as_deref(), Some("pass a value with `-p 0=VALUE`"));
}

#[test]
fn test_evaluate_negative_bound() {
    let tree = parse_tree(SCENARIO).unwrap();
    let err = evaluate_tree(&tree, &ParamValues::new().with(Param::P0, -1)).unwrap_err();
    assert!(err.message.contains("negative bound"));
}

#[test]
fn test_evaluate_overflow_is_an_error() {
    let tree = parse_tree("Loop(Constant(0, [4611686018427387904, 4611686018427387904]), 1, ConstantBound(2))")
        .unwrap();
    let err = evaluate_tree(&tree, &ParamValues::new()).unwrap_err();
    assert!(err.message.contains("overflow"), "{}", err.message);
}

#[test]
fn test_stats() {
    let tree = parse_tree(SCENARIO).unwrap();
    let program = generate_tree(&tree).unwrap();
    let stats = GenerationStats::new(&tree, &program);
    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.params, vec![Param::P0]);
    assert_eq!(stats.declarations, 7);
    // 5 assignments, bound, two guards with one assignment each, return
    assert_eq!(stats.statements, 11);
    assert_eq!(stats.max_depth, 1);
    assert!(stats.format_report().contains("parameters:   param_0"));
}

#[test]
fn test_hash_artifacts() {
    let tree = parse_tree(SCENARIO).unwrap();
    let text = compile(SCENARIO, "scenario.cft").unwrap();
    let a = hash_artifacts(&tree, &text);
    let b = hash_artifacts(&parse_tree(SCENARIO).unwrap(), &text);
    assert_eq!(a, b);
    assert_ne!(a.tree, a.output);
}
