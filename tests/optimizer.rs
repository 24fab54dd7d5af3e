use wavexpr::Expression;

fn optimized(source: &str, parameters: &[&str]) -> Expression {
    let mut expr = Expression::compile(source, parameters)
        .unwrap_or_else(|e| panic!("Formula failed to compile:\n{source}\nError: {e}"));
    expr.optimize();
    expr
}

fn rendered(source: &str, parameters: &[&str]) -> String {
    optimized(source, parameters).to_string()
}

#[test]
fn constants_fold() {
    assert_eq!(rendered("1+2", &[]), "3");
    assert_eq!(rendered("2*3 + x", &["x"]), "(6 + x)");
    assert_eq!(rendered("sqrt(2+2)", &[]), "2");
    assert_eq!(rendered("sin(0)", &[]), "0");
    assert_eq!(rendered("-(3)", &[]), "-3");
    assert_eq!(rendered("2^10", &[]), "1024");
}

#[test]
fn variables_never_fold() {
    assert_eq!(rendered("x", &["x"]), "x");
    assert_eq!(rendered("x+0", &["x"]), "(x + 0)");
    assert_eq!(rendered("sin(x)", &["x"]), "sin(x)");
}

#[test]
fn dead_branches_disappear() {
    assert_eq!(rendered("if (1) 5; else 7", &[]), "5");
    assert_eq!(rendered("if (0) 5; else 7", &[]), "7");
    assert_eq!(rendered("if (0) 5", &[]), "0");
    // a live condition keeps both branches
    assert_eq!(rendered("if (x) 5; else 7", &["x"]),
               "if (x) { 5 } else { 7 }");
}

#[test]
fn sequences_flatten_and_drop_interior_constants() {
    assert_eq!(rendered("1; 2; x", &["x"]), "x");
    assert_eq!(rendered("x; 3", &["x"]), "seq(x, 3)");
    assert_eq!(rendered("x=1; 2+3; x", &["x"]), "seq((x = 1), x)");
    assert_eq!(rendered("{ { 1; x }; 2 }", &["x"]), "seq(x, 2)");
    assert_eq!(rendered("{}", &[]), "0");
}

#[test]
fn for_loop_with_dead_condition_reduces_to_its_initializer() {
    let expr = optimized("for (i=0; 0; i=i+1) 99", &["i"]);

    assert_eq!(expr.to_string(), "seq((i = 0), 0)");
    assert_eq!(expr.evaluate(&[5.0]).unwrap(), 0.0);
    assert_eq!(expr.variable("i").unwrap().get(), 0.0);
}

#[test]
fn optimize_is_idempotent() {
    let sources: &[(&str, &[&str])] = &[
        ("1+2", &[]),
        ("2*3 + x", &["x"]),
        ("x=1; 2+3; x", &["x"]),
        ("if (1) 5; else x", &["x"]),
        ("if (x) { 1; 2 } else { y }", &["x", "y"]),
        ("for (i=0; 0; i=i+1) 99", &["i"]),
        ("for (i=0; i<x; i=i+1) { y = y + i }", &["i", "x", "y"]),
        ("while (x > 0) { x = x - 1 }", &["x"]),
        ("do { x = x + 1 } while (x < 10)", &["x"]),
        ("for (i=0, 9) x = x + i", &["i", "x"]),
        ("switch (x) { case 1: 1+1; case 2: { y=2; y=3 } break; default: 9 }",
         &["x", "y"]),
        ("return sin(x) * 100", &["x"]),
        ("sin(t/24000*2*pi*440) * 100", &["t"]),
    ];

    for (source, parameters) in sources {
        let mut expr = Expression::compile(source, parameters)
            .unwrap_or_else(|e| panic!("Formula failed to compile:\n{source}\nError: {e}"));

        expr.optimize();
        let once = expr.to_string();

        expr.optimize();
        let twice = expr.to_string();

        assert_eq!(once, twice, "optimize() was not idempotent for: {source}");
    }
}

#[test]
fn optimization_preserves_results() {
    let sources: &[(&str, &[&str])] = &[
        ("sin(t/24000*2*pi*440) * 100", &["t"]),
        ("if (t > 50) t*2; else t/2", &["t"]),
        ("y=0; for (i=0; i<10; i=i+1) y=y+t; y", &["t"]),
        ("switch (t % 3) { case 0: 10; case 1: 20; break; default: t }", &["t"]),
        ("(t << 2) + (t >> 1) + ~t", &["t"]),
        ("t ~= 0.3", &["t"]),
    ];

    for (source, parameters) in sources {
        let plain = Expression::compile(source, parameters).unwrap();
        let folded = optimized(source, parameters);

        for t in 0..100 {
            let t = f64::from(t);
            assert_eq!(plain.evaluate(&[t]).unwrap(),
                       folded.evaluate(&[t]).unwrap(),
                       "optimization changed the result of {source} at t={t}");
        }
    }
}

#[test]
fn optimization_keeps_variable_identity() {
    let mut expr = Expression::compile("x + 1", &["x"]).unwrap();
    expr.optimize();

    // the rebuilt tree still reads through the same slot the host sees
    expr.variable("x").unwrap().set(41.0);
    assert_eq!(expr.evaluate(&[]).unwrap(), 42.0);
    assert_eq!(expr.evaluate(&[4.0]).unwrap(), 5.0);
}

#[test]
fn near_equality_absorbs_folding_error() {
    assert_eq!(rendered("0.1 + 0.2 ~= 0.3", &[]), "1");
}

#[test]
fn switch_cases_stay_aligned_after_flattening() {
    let expr = optimized("switch (x) { case 1: { y=1; y=2 }; case 2: y=y+10; break; case 3: y=99; }",
                         &["x", "y"]);

    // case 1 falls through its spliced statements into case 2
    expr.evaluate(&[1.0, 0.0]).unwrap();
    assert_eq!(expr.variable("y").unwrap().get(), 12.0);

    expr.evaluate(&[2.0, 0.0]).unwrap();
    assert_eq!(expr.variable("y").unwrap().get(), 10.0);

    expr.evaluate(&[3.0, 0.0]).unwrap();
    assert_eq!(expr.variable("y").unwrap().get(), 99.0);
}
