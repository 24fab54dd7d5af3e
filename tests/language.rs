use wavexpr::{EvalError, Expression, ParseError};

fn eval(source: &str) -> f64 {
    eval_with(source, &[])
}

fn eval_with(source: &str, bindings: &[(&str, f64)]) -> f64 {
    let names: Vec<&str> = bindings.iter().map(|(name, _)| *name).collect();
    let values: Vec<f64> = bindings.iter().map(|(_, value)| *value).collect();

    Expression::compile(source, &names)
        .unwrap_or_else(|e| panic!("Formula failed to compile:\n{source}\nError: {e}"))
        .evaluate(&values)
        .unwrap_or_else(|e| panic!("Formula failed to evaluate:\n{source}\nError: {e}"))
}

fn compile_error(source: &str) -> ParseError {
    match Expression::compile(source, &[]) {
        Err(e) => e,
        Ok(_) => panic!("Formula compiled but was expected to fail:\n{source}"),
    }
}

fn eval_error(source: &str) -> EvalError {
    match Expression::compile(source, &[])
        .unwrap_or_else(|e| panic!("Formula failed to compile:\n{source}\nError: {e}"))
        .evaluate(&[])
    {
        Err(e) => e,
        Ok(v) => panic!("Formula evaluated to {v} but was expected to fail:\n{source}"),
    }
}

#[test]
fn constant_arithmetic() {
    assert_eq!(eval("2+3*4"), 14.0);
    assert_eq!(eval("2^10"), 1024.0);
    assert_eq!(eval("2**10"), 1024.0);
    assert_eq!(eval("10%3"), 1.0);
    assert_eq!(eval("(2+3)*4"), 20.0);
    assert_eq!(eval("7-2-1"), 4.0);
    assert_eq!(eval("12/4/3"), 1.0);
}

#[test]
fn power_is_left_associative() {
    assert_eq!(eval("2^3^2"), 64.0);
}

#[test]
fn prefix_operators() {
    assert_eq!(eval("-3+5"), 2.0);
    assert_eq!(eval("-(-3)"), 3.0);
    assert_eq!(eval("+5"), 5.0);
    assert_eq!(eval("2*-3"), -6.0);
    assert_eq!(eval("!1"), 0.0);
    assert_eq!(eval("!0"), 1.0);
    assert_eq!(eval("!-5"), 1.0);
    assert_eq!(eval("~0"), -1.0);
    assert_eq!(eval("~5"), -6.0);
}

#[test]
fn shifts_and_bitwise() {
    assert_eq!(eval("1<<4"), 16.0);
    assert_eq!(eval("256>>4"), 16.0);
    assert_eq!(eval("-8>>1"), -4.0);
    // shifts bind looser than addition
    assert_eq!(eval("1+2<<3"), 24.0);
    assert_eq!(eval("1<<2+3"), 32.0);
}

#[test]
fn comparisons() {
    assert_eq!(eval("1<2"), 1.0);
    assert_eq!(eval("2<=1"), 0.0);
    assert_eq!(eval("2>1"), 1.0);
    assert_eq!(eval("1>=2"), 0.0);
    assert_eq!(eval("3==3"), 1.0);
    assert_eq!(eval("3!=3"), 0.0);
    assert_eq!(eval("1 ~= 1"), 1.0);
}

#[test]
fn logical_operators() {
    assert_eq!(eval("1&&1"), 1.0);
    assert_eq!(eval("1&&0"), 0.0);
    assert_eq!(eval("0||1"), 1.0);
    assert_eq!(eval("0||0"), 0.0);
    // only positive values count as true
    assert_eq!(eval("-1&&1"), 0.0);
    assert_eq!(eval("0.5||0"), 1.0);
}

#[test]
fn logical_operators_short_circuit() {
    // the right side must not run when the left side already decides
    assert_eq!(eval("x=0; 0 && (x=1); x"), 0.0);
    assert_eq!(eval("x=0; 1 || (x=1); x"), 0.0);
    assert_eq!(eval("x=0; 1 && (x=1); x"), 1.0);
}

#[test]
fn named_constants() {
    assert!((eval("pi") - std::f64::consts::PI).abs() < 1e-15);
    assert!((eval("e") - std::f64::consts::E).abs() < 1e-15);
    assert!((eval("sin(pi/2)") - 1.0).abs() < 1e-15);
}

#[test]
fn builtin_functions() {
    assert_eq!(eval("abs(-5)"), 5.0);
    assert_eq!(eval("min(3, 4)"), 3.0);
    assert_eq!(eval("max(3, 4)"), 4.0);
    assert_eq!(eval("sqrt(16)"), 4.0);
    assert_eq!(eval("floor(3.7)"), 3.0);
    assert_eq!(eval("ceil(3.2)"), 4.0);
    assert_eq!(eval("round(2.5)"), 3.0);
    assert_eq!(eval("sgn(-2)"), -1.0);
    assert_eq!(eval("sgn(0)"), 0.0);
    assert_eq!(eval("pow(2, 8)"), 256.0);
    assert_eq!(eval("max(min(5, 3), 2)"), 3.0);
    assert!((eval("atan2(1, 1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    assert!((eval("ln(e)") - 1.0).abs() < 1e-15);
    assert_eq!(eval("log10(1000)"), 3.0);
}

#[test]
fn unknown_function_is_a_compile_error() {
    assert!(matches!(compile_error("quux(1)"),
                     ParseError::UnknownFunction { ref name, arity: 1, position: 0 } if name == "quux"));
    // arity participates in resolution
    assert!(matches!(compile_error("sin(1, 2)"),
                     ParseError::UnknownFunction { arity: 2, .. }));
    assert!(matches!(compile_error("sin()"),
                     ParseError::UnknownFunction { arity: 0, .. }));
}

#[test]
fn variable_round_trip() {
    let expr = Expression::compile("x=5; x+1", &["x"]).unwrap();

    assert_eq!(expr.evaluate(&[0.0]).unwrap(), 6.0);
    assert_eq!(expr.variable("x").unwrap().get(), 5.0);
}

#[test]
fn positional_arguments_route_into_variables() {
    assert_eq!(eval_with("x*y", &[("x", 3.0), ("y", 4.0)]), 12.0);

    let expr = Expression::compile("t*2", &["t"]).unwrap();
    assert_eq!(expr.evaluate(&[1.0]).unwrap(), 2.0);
    assert_eq!(expr.evaluate(&[21.0]).unwrap(), 42.0);
}

#[test]
fn undeclared_parameters_keep_their_value() {
    let expr = Expression::compile("t + offset", &["t", "offset"]).unwrap();

    expr.variable("offset").unwrap().set(100.0);
    // only `t` is passed; `offset` keeps what the host wrote
    assert_eq!(expr.evaluate(&[7.0]).unwrap(), 107.0);
}

#[test]
fn temporaries_spring_into_existence_on_assignment() {
    assert_eq!(eval("tmp = 5; tmp * 2"), 10.0);
    assert_eq!(eval("a = 1; b = a + 1; a + b"), 3.0);
}

#[test]
fn unknown_identifier_reports_name_and_offset() {
    assert!(matches!(compile_error("2 + foo"),
                     ParseError::UnknownVariable { ref name, position: 4 } if name == "foo"));
    assert!(matches!(compile_error("foo"),
                     ParseError::UnknownVariable { ref name, position: 0 } if name == "foo"));
    // only a direct assignment may introduce a name
    assert!(matches!(compile_error("foo += 1"),
                     ParseError::UnknownVariable { .. }));
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(eval_with("x = y = 5; x + y", &[("x", 0.0), ("y", 0.0)]), 10.0);
}

#[test]
fn compound_assignment() {
    assert_eq!(eval("x=1; x+=2; x*=3; x"), 9.0);
    assert_eq!(eval("x=7; x-=2; x"), 5.0);
    assert_eq!(eval("x=7; x/=2; x"), 3.5);
    assert_eq!(eval("x=7; x%=4; x"), 3.0);
    assert_eq!(eval("x=3; x^=2; x"), 9.0);
    // the assignment yields the new value
    assert_eq!(eval("x=1; x+=2"), 3.0);
}

#[test]
fn increment_and_decrement() {
    assert_eq!(eval("x=5; ++x; x"), 6.0);
    assert_eq!(eval("x=5; --x"), 4.0);
    assert_eq!(eval("x=5; ++x + ++x"), 13.0);
}

#[test]
fn invalid_assignment_targets() {
    assert!(matches!(compile_error("3 = 4"), ParseError::InvalidAssignmentTarget { .. }));
    assert!(matches!(compile_error("pi = 3"), ParseError::InvalidAssignmentTarget { .. }));
    assert!(matches!(compile_error("++3"), ParseError::InvalidAssignmentTarget { .. }));
}

#[test]
fn conditionals() {
    assert_eq!(eval("if (1) 2; else 3"), 2.0);
    assert_eq!(eval("if (0) 2; else 3"), 3.0);
    assert_eq!(eval("if (0) 2"), 0.0);
    // only positive conditions take the true path
    assert_eq!(eval("if (-1) 2; else 3"), 3.0);
    assert_eq!(eval("x=10; if (x > 5) { x = 1 } else { x = 2 }; x"), 1.0);
}

#[test]
fn while_loops() {
    assert_eq!(eval("x=0; while (x<5) x=x+1; x"), 5.0);
    // the loop's own value is the last body value
    assert_eq!(eval("i=0; while (i<3) i=i+1"), 3.0);
    assert_eq!(eval("x=0; while (0) x=99; x"), 0.0);
}

#[test]
fn do_while_loops() {
    assert_eq!(eval("x=0; do x=x+1; while (x<5); x"), 5.0);
    // the body runs once even when the condition is false from the start
    assert_eq!(eval("x=0; do x=x+1; while (0); x"), 1.0);
    assert_eq!(eval("x=0; do { x=x+2 } while (x<5); x"), 6.0);
}

#[test]
fn for_loops() {
    assert_eq!(eval("y=0; for (i=0; i<10; i=i+1) y=y+i; y"), 45.0);
    assert_eq!(eval("y=0; for (i=0; i<5; ++i) y=y+1; y"), 5.0);
    assert_eq!(eval("y=1; for (i=0; i<4; ++i) { y = y*2 }; y"), 16.0);
}

#[test]
fn ranged_for_loops() {
    assert_eq!(eval("y=0; for (i=0, 9) y=y+i; y"), 45.0);
    assert_eq!(eval("y=0; for (i=3, 3) y=y+i; y"), 3.0);
    // an empty range never runs the body
    assert_eq!(eval("y=0; for (i=5, 4) y=99; y"), 0.0);
}

#[test]
fn break_and_continue() {
    assert_eq!(eval("x=0; i=0; while (i<10) { i=i+1; if (i>4) break; x=x+1 }; x"),
               4.0);
    assert_eq!(eval("x=0; i=0; while (i<6) { i=i+1; if (i%2) continue; x=x+i }; x"),
               12.0);
    assert_eq!(eval("y=0; for (i=0; i<10; i=i+1) { if (i==5) break; y=y+1 }; y"),
               5.0);
}

#[test]
fn misplaced_break_and_continue_fail_to_compile() {
    assert!(matches!(compile_error("break"),
                     ParseError::MisplacedKeyword { keyword: "break", .. }));
    assert!(matches!(compile_error("continue"),
                     ParseError::MisplacedKeyword { keyword: "continue", .. }));
    // a switch intercepts break but not continue
    assert!(matches!(compile_error("switch (1) { case 1: continue; }"),
                     ParseError::MisplacedKeyword { keyword: "continue", .. }));
}

#[test]
fn loop_iteration_limit() {
    assert!(matches!(eval_error("for (i=0; 1; i=i+1) {}"),
                     EvalError::LoopIterationLimit { .. }));
    assert!(matches!(eval_error("while (1) {}"), EvalError::LoopIterationLimit { .. }));
    assert!(matches!(eval_error("do {} while (1)"), EvalError::LoopIterationLimit { .. }));
    assert!(matches!(eval_error("for (i=0, 500) {}"), EvalError::LoopIterationLimit { .. }));
}

#[test]
fn loop_iteration_limit_is_not_hit_early() {
    // 257 entries complete; the limit only trips on the entry after that
    assert_eq!(eval("n=0; for (i=0; i<257; i=i+1) n=n+1; n"), 257.0);
    assert!(matches!(eval_error("for (i=0; i<258; i=i+1) {}"),
                     EvalError::LoopIterationLimit { .. }));
}

#[test]
fn return_short_circuits() {
    assert_eq!(eval("if (1) return 42; 7"), 42.0);
    assert_eq!(eval("i=0; while (1) { i=i+1; if (i==3) return i }"), 3.0);
    assert_eq!(eval("y=0; for (i=0, 9) { if (i==4) return 100+i; y=y+1 }"), 104.0);
    assert_eq!(eval("return 1+2"), 3.0);
}

#[test]
fn switch_falls_through() {
    let expr = Expression::compile("switch (1) { case 1: x=x+1; case 2: x=x+1; break; case 3: x=x+100; }",
                                   &["x"]).unwrap();

    expr.evaluate(&[0.0]).unwrap();
    assert_eq!(expr.variable("x").unwrap().get(), 2.0);
}

#[test]
fn switch_default_always_runs_last() {
    assert_eq!(eval("switch (5) { case 1: 10; default: 42 }"), 42.0);
    // even after a matched case, the default supplies the result
    assert_eq!(eval("x=0; switch (1) { case 1: x=7; default: x+1 }"), 8.0);
    assert_eq!(eval("switch (5) { case 1: 10 }"), 0.0);
}

#[test]
fn switch_break_yields_zero() {
    assert_eq!(eval("switch (1) { case 1: break; }"), 0.0);
    assert_eq!(eval("x=0; switch (1) { case 1: x=9; break; case 2: x=99; }; x"), 9.0);
}

#[test]
fn continue_passes_through_a_switch_to_the_loop() {
    assert_eq!(eval("x=0; i=0; while (i<4) { i=i+1; switch (i%2) { case 1: continue; } x=x+1 }; x"),
               2.0);
}

#[test]
fn switch_case_labels() {
    // any constant-foldable label works
    assert_eq!(eval("switch (5) { case 2+3: 9 }"), 9.0);
    assert!(matches!(compile_error("switch (1) { case 1: 2; case 1: 3; }"),
                     ParseError::DuplicateCase { .. }));
    assert!(matches!(compile_error("x=1; switch (1) { case x: 2; }"),
                     ParseError::CaseRequiresConstant { .. }));
}

#[test]
fn near_equality() {
    assert_eq!(eval("near(1, 1)"), 1.0);
    assert_eq!(eval("near(123.456, 123.456)"), 1.0);
    // floating rounding error is inside the tolerance
    assert_eq!(eval("0.1 + 0.2 ~= 0.3"), 1.0);
    assert_eq!(eval("near(1, 1 + 1/1000000000)"), 1.0);
    // a real difference is not
    assert_eq!(eval("near(1, 1.001)"), 0.0);
    assert_eq!(eval("1 ~= 2"), 0.0);
}

#[test]
fn assigning_into_a_constant_fails_at_evaluation() {
    let expr = Expression::compile("pi", &["pi"]).unwrap();

    assert!(matches!(expr.evaluate(&[3.0]),
                     Err(EvalError::AssignedToConstant { ref name }) if name == "pi"));
}

#[test]
fn too_many_arguments() {
    let expr = Expression::compile("x", &["x"]).unwrap();

    assert!(matches!(expr.evaluate(&[1.0, 2.0]),
                     Err(EvalError::TooManyArguments { expected: 1, found: 2 })));
}

#[test]
fn variable_handles() {
    // a name that is never declared and never assigned does not compile
    assert!(matches!(Expression::compile("t * length", &["t"]),
                     Err(ParseError::UnknownVariable { ref name, .. }) if name == "length"));

    let expr = Expression::compile("t * length", &["t", "length"]).unwrap();
    expr.variable("length").unwrap().set(100.0);

    assert_eq!(expr.evaluate(&[0.5]).unwrap(), 50.0);
    // constants have no mutable handle
    assert!(expr.variable("pi").is_none());
    assert!(expr.variable("nope").is_none());
}

#[test]
fn empty_and_trivial_programs() {
    assert_eq!(eval(""), 0.0);
    assert_eq!(eval("{}"), 0.0);
    assert_eq!(eval(";"), 0.0);
    assert_eq!(eval("1; 2; 3"), 3.0);
    assert_eq!(eval("{ 1; 2; 3 }"), 3.0);
}

#[test]
fn malformed_input() {
    assert!(matches!(compile_error("2 @ 3"),
                     ParseError::UnrecognizedToken { position: 2, .. }));
    assert!(matches!(compile_error("2 + (3"), ParseError::UnexpectedEndOfInput { .. }));
    assert!(matches!(compile_error("2+3)"), ParseError::ExtraToken { .. }));
    assert!(compile_error("x=1 y=2").to_string().contains("';'"));
    assert!(matches!(compile_error("2 +"), ParseError::MissingExpression { .. }));
    assert!(matches!(compile_error("()"), ParseError::MissingExpression { .. }));
}

#[test]
fn waveform_formula() {
    // the shape this engine exists for: one sample per call
    let expr = Expression::compile("sin(t/24000*2*pi*440) * 100", &["t"]).unwrap();

    let expected = |t: f64| (t / 24000.0 * 2.0 * std::f64::consts::PI * 440.0).sin() * 100.0;

    for t in 0..100 {
        let t = f64::from(t);
        assert!((expr.evaluate(&[t]).unwrap() - expected(t)).abs() < 1e-12);
    }
}
