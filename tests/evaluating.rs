use pretty_assertions::assert_eq;
use proptest::prelude::*;
use qc_rs::{Action, ErrorKind, Evaluator, Result, BUILTIN_FUNCTIONS, BUILTIN_VARIABLES};
use std::collections::HashMap;

fn evaluate(text: &str) -> Result<f64> {
    let mut evaluator = Evaluator::new();
    evaluator.set(text)?;
    evaluator.evaluate()
}

fn failure(text: &str) -> (ErrorKind, usize, usize) {
    let error = evaluate(text).unwrap_err();
    (error.kind, error.start(), error.end())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-12 * expected.abs().max(1.0),
        "{actual} != {expected}"
    );
}

#[test]
fn numeric_literals() {
    assert_eq!(evaluate("42").unwrap(), 42.0);
    assert_eq!(evaluate("1.5e3").unwrap(), 1500.0);
    assert_eq!(evaluate("2E-2").unwrap(), 0.02);
    assert_eq!(evaluate(" 3 ").unwrap(), 3.0);
}

#[test]
fn parentheses_group() {
    assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
    assert_eq!(evaluate("((2))").unwrap(), 2.0);
    assert_eq!(evaluate("2*(3+(4-1))/3").unwrap(), 4.0);
}

#[test]
fn implicit_multiplication() {
    assert_eq!(evaluate("2(3+4)").unwrap(), 14.0);
    assert_eq!(evaluate("2pi").unwrap(), 6.283185307179586);
    assert_eq!(evaluate("(1+1)(2+2)").unwrap(), 8.0);
    assert_close(evaluate("2e").unwrap(), 2.0 * std::f64::consts::E);
    assert_close(evaluate("3 e").unwrap(), 3.0 * std::f64::consts::E);
}

#[test]
fn constants_are_loaded() {
    assert_eq!(evaluate("tau").unwrap(), std::f64::consts::TAU);
    assert_eq!(evaluate("c").unwrap(), 299_792_458.0);
    assert_eq!(evaluate("NA").unwrap(), 6.022_140_76e23);
    assert_close(evaluate("sin(pi/2)").unwrap(), 1.0);
    assert_close(evaluate("log(10, 1000)").unwrap(), 3.0);
}

#[test]
fn unknown_identifiers_are_located() {
    assert_eq!(failure("foo+1"), (ErrorKind::unknown_variable, 0, 2));
    assert_eq!(failure("foo(1)"), (ErrorKind::unknown_function, 0, 2));
    assert_eq!(failure("2 * bar"), (ErrorKind::unknown_variable, 4, 6));
}

#[test]
fn wrong_arity() {
    assert_eq!(failure("max(1)"), (ErrorKind::invalid_argument_count, 0, 2));
    assert_eq!(failure("sqrt(1, 2)"), (ErrorKind::invalid_argument_count, 0, 3));
    assert_eq!(
        evaluate("max(1)").unwrap_err().message(),
        "invalid number of arguments to function"
    );
}

#[test]
fn mismatched_parens_fail_in_set() {
    let mut evaluator = Evaluator::new();
    let error = evaluator.set("(1+2").unwrap_err();
    assert_eq!((error.kind, error.start(), error.end()), (ErrorKind::unmatched_open_paren, 0, 0));
    assert_eq!(error.to_string(), "unmatched '('");

    let error = evaluator.set("1+2)").unwrap_err();
    assert_eq!((error.kind, error.start(), error.end()), (ErrorKind::unmatched_close_paren, 3, 3));
    assert_eq!(error.to_string(), "unmatched ')'");
}

#[test]
fn evaluate_is_repeatable() {
    let mut evaluator = Evaluator::new();
    evaluator.set("max(2, 3) * (1 + pi)").unwrap();
    let tokens = evaluator.tokens().to_vec();

    let first = evaluator.evaluate().unwrap();
    let second = evaluator.evaluate().unwrap();
    assert_eq!(first, second);
    assert_eq!(evaluator.tokens(), tokens.as_slice());
}

#[test]
fn variables_are_read_on_every_evaluation() {
    let mut evaluator = Evaluator::new();
    evaluator.set_variable("x", 5.0);
    evaluator.set("x*2").unwrap();
    assert_eq!(evaluator.evaluate().unwrap(), 10.0);

    evaluator.set_variable("x", 7.0);
    assert_eq!(evaluator.evaluate().unwrap(), 14.0);
    assert_eq!(evaluator.get_variable("x"), Some(7.0));
    assert_eq!(evaluator.get_variable("y"), None);
}

#[test]
fn failed_evaluation_does_not_poison_the_next_one() {
    let mut evaluator = Evaluator::new();
    evaluator.set("1 + x").unwrap();
    assert_eq!(evaluator.evaluate().unwrap_err().kind, ErrorKind::unknown_variable);

    evaluator.set_variable("x", 1.0);
    assert_eq!(evaluator.evaluate().unwrap(), 2.0);
}

#[test]
fn builtins_can_be_overridden() {
    let mut evaluator = Evaluator::new();
    evaluator.register_function("max", |a| a[0] + a[1] + a[2], 3);
    evaluator.set("max(1, 2, 3)").unwrap();
    assert_eq!(evaluator.evaluate().unwrap(), 6.0);

    evaluator.set_variable("pi", 3.0);
    evaluator.set("2pi").unwrap();
    assert_eq!(evaluator.evaluate().unwrap(), 6.0);
}

#[test]
fn expression_assignment_is_visible_to_the_host() {
    let mut evaluator = Evaluator::new();
    evaluator.set("set(r, 2) * pi * r").unwrap();
    assert_close(evaluator.evaluate().unwrap(), 4.0 * std::f64::consts::PI);
    assert_eq!(evaluator.get_variable("r"), Some(2.0));
}

#[test]
fn many_variables_stay_reachable() {
    let mut evaluator = Evaluator::empty();
    let names: Vec<String> = (0..500)
        .map(|i| {
            // letters only: identifiers cannot contain digits
            let mut i: usize = i;
            let mut name = String::from("v");
            loop {
                name.push(char::from(b'a' + (i % 26) as u8));
                i /= 26;
                if i == 0 {
                    break name;
                }
            }
        })
        .collect();

    for (i, name) in names.iter().enumerate() {
        evaluator.set_variable(name, i as f64);
    }
    for (i, name) in names.iter().enumerate() {
        evaluator.set(name).unwrap();
        assert_eq!(evaluator.evaluate().unwrap(), i as f64);
    }
    assert_eq!(evaluator.variables().count(), names.len());
}

#[test]
fn registry_lists_every_builtin() {
    let evaluator = Evaluator::new();
    let functions: HashMap<&str, usize> =
        evaluator.functions().map(|(name, function)| (name, function.arity)).collect();
    assert_eq!(functions.len(), BUILTIN_FUNCTIONS.len());

    for builtin in BUILTIN_FUNCTIONS {
        assert!(!builtin.description.is_empty(), "{} has no description", builtin.name);
        assert_eq!(functions.get(builtin.name), Some(&builtin.arity()), "{}", builtin.name);
    }
    let set = evaluator.get_function("set").unwrap();
    assert!(matches!(set.action, Action::assign));
    assert_eq!(set.arity, 2);

    let variables: HashMap<&str, f64> = evaluator.variables().collect();
    assert_eq!(variables.len(), BUILTIN_VARIABLES.len());
    for builtin in BUILTIN_VARIABLES {
        assert!(!builtin.description.is_empty(), "{} has no description", builtin.name);
        assert_eq!(variables.get(builtin.name), Some(&builtin.value), "{}", builtin.name);
    }
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let text = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(evaluate(&text).unwrap(), 1.0);

    let text = format!("{}1", "-".repeat(depth + 1));
    assert_eq!(evaluate(&text).unwrap(), -1.0);
}

proptest! {
    #[test]
    fn literals_evaluate_to_themselves(value in 0.0f64..1e300) {
        for text in [format!("{value}"), format!("{value:e}"), format!("{value:E}")] {
            prop_assert_eq!(evaluate(&text).unwrap(), value, "{}", text);
        }
    }

    #[test]
    fn negated_literals(value in 0.0f64..1e10) {
        prop_assert_eq!(evaluate(&format!("-{value}")).unwrap(), -value);
    }

    #[test]
    fn sums_match_host_arithmetic(a in -1e6f64..1e6, b in -1e6f64..1e6, c in 1.0f64..1e3) {
        let text = format!("{a} + {b} * {c}");
        prop_assert_eq!(evaluate(&text).unwrap(), a + b * c);
    }
}
