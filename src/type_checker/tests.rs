use std::rc::Rc;

use crate::{
    ast::types::Type,
    check_source,
    errors::errors::{DiagnosticKind, Stage},
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::ScopeIndex,
    CheckedUnit,
};

use super::{control_flow::always_returns, type_checker::TypeChecker};

fn check(source: &str) -> CheckedUnit {
    check_source(source, "test.sc").unwrap()
}

fn semantic(source: &str) -> Vec<(u32, DiagnosticKind)> {
    let unit = check(source);
    for diagnostic in unit.diagnostics.iter() {
        assert_eq!(
            diagnostic.stage(),
            Stage::Semantic,
            "unexpected {:?}",
            diagnostic
        );
    }

    unit.diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.line(), diagnostic.get_kind().clone()))
        .collect()
}

fn assert_clean(source: &str) {
    let diagnostics = semantic(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_literals_and_arithmetic() {
    assert_clean(
        "let a: int = 1 + 2 * 3\n\
         let b: real = 1 + 2.5\n\
         let c: real = -1.5 / 2\n\
         let d: str = 'a' + \"b\"\n\
         let e: bool = not (1 < 2)\n",
    );
}

#[test]
fn test_inferred_type_is_recorded() {
    let unit = check("let a = 1.5 * 2\nlet b = a > 1\n");
    assert!(unit.is_ok(), "{:?}", unit.diagnostics);

    let a = unit.names.get("a").unwrap();
    let b = unit.names.get("b").unwrap();
    assert_eq!(
        unit.symbol_table.get_variable(a).unwrap().inferred_type,
        Some(Type::Real)
    );
    assert_eq!(unit.symbol_table.get_variable(b).unwrap().type_(), Some(Type::Bool));
}

#[test]
fn test_declared_type_mismatch() {
    assert_eq!(
        semantic("let a = 1\nlet b: int = 'x'\n"),
        vec![(
            2,
            DiagnosticKind::TypeMatchError {
                expected: Type::Int,
                received: Type::Str,
            }
        )]
    );
}

#[test]
fn test_no_implicit_widening_on_declaration() {
    assert_eq!(
        semantic("let r: real = 1\n"),
        vec![(
            1,
            DiagnosticKind::TypeMatchError {
                expected: Type::Real,
                received: Type::Int,
            }
        )]
    );
}

#[test]
fn test_assignment_mismatch() {
    assert_eq!(
        semantic("let a: int = 1\na = 'text'\n"),
        vec![(
            2,
            DiagnosticKind::TypeMatchError {
                expected: Type::Int,
                received: Type::Str,
            }
        )]
    );
}

#[test]
fn test_assign_to_constant() {
    assert_eq!(
        semantic("const LIMIT: int = 3\nLIMIT = 4\n"),
        vec![(
            2,
            DiagnosticKind::AssignToConstant {
                name: "LIMIT".to_string()
            }
        )]
    );
}

#[test]
fn test_constant_type_must_match() {
    assert_eq!(
        semantic("const NAME: str = 5\n"),
        vec![(
            1,
            DiagnosticKind::TypeMatchError {
                expected: Type::Str,
                received: Type::Int,
            }
        )]
    );
}

#[test]
fn test_undefined_variable() {
    assert_eq!(
        semantic("let a = b + 1\n"),
        vec![(
            1,
            DiagnosticKind::UndefinedVariable {
                name: "b".to_string()
            }
        )]
    );
}

#[test]
fn test_error_does_not_cascade() {
    // `a` has no type after its bad initializer; its uses stay silent.
    let diagnostics = semantic("let a = 'x' - 1\nlet b = a + 1\nlet c: int = b\n");

    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0],
        (1, DiagnosticKind::BinaryTypeMismatch { .. })
    ));
}

#[test]
fn test_self_reference_in_initializer() {
    assert_eq!(
        semantic("let a = a\n"),
        vec![(
            1,
            DiagnosticKind::TypeNotKnown {
                name: "a".to_string()
            }
        )]
    );
}

#[test]
fn test_shadowed_variable_uses_inner_type() {
    assert_clean("let i = 1\n{\n  let i = 'text'\n  let s: str = i\n}\nlet n: int = i\n");
}

#[test]
fn test_operator_mismatches() {
    let diagnostics = semantic("'a' < 'b'\n1 == 1.0\ntrue and 1\n-'a'\nnot 1\n'a' * 2\n");

    let lines: Vec<u32> = diagnostics.iter().map(|(line, _)| *line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(
        diagnostics[3].1,
        DiagnosticKind::UnaryTypeMismatch {
            operator: "-".to_string(),
            operand: Type::Str,
        }
    );
    assert_eq!(
        diagnostics[2].1,
        DiagnosticKind::BinaryTypeMismatch {
            operator: "and".to_string(),
            left: Type::Bool,
            right: Type::Int,
        }
    );
}

#[test]
fn test_condition_must_be_bool() {
    assert_eq!(
        semantic("if 1 { }\nwhile 'x' { }\n"),
        vec![
            (
                1,
                DiagnosticKind::ConditionNotBool {
                    construct: "if".to_string(),
                    received: Type::Int,
                }
            ),
            (
                2,
                DiagnosticKind::ConditionNotBool {
                    construct: "while".to_string(),
                    received: Type::Str,
                }
            ),
        ]
    );
}

#[test]
fn test_calls_match_exact_overload() {
    let unit = check(
        "def twice(x: int) -> int { return x * 2 }\n\
         def twice(x: str) -> str { return x + x }\n\
         let a = twice(2)\n\
         let b = twice('ab')\n\
         println(a)\n\
         println(b)\n",
    );
    assert!(unit.is_ok(), "{:?}", unit.diagnostics);

    let a = unit.names.get("a").unwrap();
    let b = unit.names.get("b").unwrap();
    assert_eq!(unit.symbol_table.get_variable(a).unwrap().type_(), Some(Type::Int));
    assert_eq!(unit.symbol_table.get_variable(b).unwrap().type_(), Some(Type::Str));
}

#[test]
fn test_no_matching_overload() {
    assert_eq!(
        semantic("def f(a: real) {}\nf(1)\nf(1.0, 'x')\n"),
        vec![
            (
                2,
                DiagnosticKind::NoMatchingOverload {
                    function: "f".to_string(),
                    arguments: "int".to_string(),
                }
            ),
            (
                3,
                DiagnosticKind::NoMatchingOverload {
                    function: "f".to_string(),
                    arguments: "real, str".to_string(),
                }
            ),
        ]
    );
}

#[test]
fn test_calling_a_value() {
    assert_eq!(
        semantic("let a = 1\na()\n(a)(2)\n"),
        vec![(2, DiagnosticKind::NotCallable), (3, DiagnosticKind::NotCallable)]
    );
}

#[test]
fn test_recursion_and_forward_calls() {
    assert_clean(
        "def even(n: int) -> bool {\n\
           if n == 0: return true\n\
           return odd(n - 1)\n\
         }\n\
         def odd(n: int) -> bool {\n\
           if n == 0 { return false } else { return even(n - 1) }\n\
         }\n",
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(
        semantic(
            "return 1\n\
             def a() { return 1 }\n\
             def b() -> int { return }\n\
             def c() -> int { return 'x' }\n\
             def d() { return }\n"
        ),
        vec![
            (1, DiagnosticKind::ReturnOutsideFunction),
            (2, DiagnosticKind::VoidFunctionReturningValue),
            (
                3,
                DiagnosticKind::MissingReturnValue {
                    expected: Type::Int
                }
            ),
            (
                4,
                DiagnosticKind::TypeMatchError {
                    expected: Type::Int,
                    received: Type::Str,
                }
            ),
        ]
    );
}

#[test]
fn test_missing_return_on_some_path() {
    assert_eq!(
        semantic(
            "def sign(n: int) -> int {\n\
               if n < 0 { return -1 }\n\
               elif n > 0 { return 1 }\n\
             }\n"
        ),
        vec![(
            1,
            DiagnosticKind::MissingReturn {
                function: "sign".to_string()
            }
        )]
    );
}

#[test]
fn test_return_inside_loop_does_not_count() {
    let diagnostics = semantic("def f() -> int {\n  while true { return 1 }\n}\n");

    assert!(matches!(
        diagnostics[..],
        [(1, DiagnosticKind::MissingReturn { .. })]
    ));
}

#[test]
fn test_jumps_need_a_loop() {
    assert_eq!(
        semantic(
            "break\n\
             while true {\n\
               if true: continue\n\
               def inner() { break }\n\
               break\n\
             }\n"
        ),
        vec![
            (
                1,
                DiagnosticKind::JumpOutsideLoop {
                    keyword: "break".to_string()
                }
            ),
            (
                4,
                DiagnosticKind::JumpOutsideLoop {
                    keyword: "break".to_string()
                }
            ),
        ]
    );
}

#[test]
fn test_parameters_are_typed() {
    assert_clean(
        "def greet(name: str, times: int) -> str {\n\
           let message = name\n\
           let count: int = times\n\
           return message\n\
         }\n",
    );
}

#[test]
fn test_checker_is_idempotent() {
    let source = "let a = 1\nlet b = a + 'x'\ndef f() -> int { }\nbreak\n";
    let (tokens, _) = tokenize(source, None);
    let mut output = parse(tokens, Rc::new("shell".to_string()));

    let first = {
        let mut checker = TypeChecker::new(&mut output.symbol_table, Rc::new("shell".to_string()));
        checker.check_all(&output.statements).unwrap();
        assert_eq!(checker.diagnostics().len(), 3);
        checker.into_diagnostics()
    };
    let annotated = output.symbol_table.clone();

    let second = {
        let mut checker = TypeChecker::new(&mut output.symbol_table, Rc::new("shell".to_string()));
        checker.check_all(&output.statements).unwrap();
        checker.into_diagnostics()
    };
    assert_eq!(second, first);

    let a = output.names.get("a").unwrap();
    assert_eq!(
        output.symbol_table.get_variable(a),
        annotated.get_variable(a)
    );
    assert_eq!(output.symbol_table.current_scope(), ScopeIndex::ROOT);
}

#[test]
fn test_always_returns() {
    let unit = check("def f() -> int {\n  { return 1 }\n}\n");
    assert!(unit.is_ok(), "{:?}", unit.diagnostics);

    assert!(!always_returns(&[]));
}

#[test]
fn test_reference_before_inner_shadowing_uses_outer_variable() {
    assert_clean("let x: int = 1\n{\n  let y: int = x\n  let x: str = 'a'\n}\n");
    assert_clean("let x = 1\n{\n  let y = x + 1\n  let x = 'a'\n}\n");
    assert_clean("let x = 1\n{\n  x = 2\n  let x = 'a'\n}\n");
}

#[test]
fn test_name_declared_later_is_undefined() {
    assert_eq!(
        semantic("def f() -> int { return later }\nlet later = 1\n"),
        vec![(
            1,
            DiagnosticKind::UndefinedVariable {
                name: "later".to_string()
            }
        )]
    );
}

#[test]
fn test_abandoned_declaration_does_not_cascade() {
    let unit = check("let x\nlet y = x + 1\nlet z: int = x\nprintln(x)\n");

    assert_eq!(unit.diagnostics.len(), 1, "{:?}", unit.diagnostics);
    assert_eq!(
        unit.diagnostics[0].get_kind(),
        &DiagnosticKind::UninitializedVariable {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_continue_outside_loop_is_named() {
    assert_eq!(
        semantic("continue\n"),
        vec![(
            1,
            DiagnosticKind::JumpOutsideLoop {
                keyword: "continue".to_string()
            }
        )]
    );
}
