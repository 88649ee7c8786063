//! End-to-end coverage of the calculator against a scripted cell provider.

use gridcalc_eval::{CalcError, Calculator};

fn compute(expr: &str) -> Result<f64, CalcError> {
    Calculator::new().compute(expr)
}

#[test]
fn left_associative_power_tower() {
    assert_eq!(compute("(27 ^ 2) ^ 4").unwrap(), 282429536481.0);
    assert_eq!(compute("27 ^ 2 ^ 4").unwrap(), 282429536481.0);
}

#[test]
fn implicit_multiplication() {
    assert_eq!(compute("3(7+3)").unwrap(), 30.0);
    assert_eq!(compute("3*(7+3)").unwrap(), 30.0);
    assert_eq!(compute("(7+3)3").unwrap(), 30.0);
    assert_eq!(compute("(2+3)(3+1)").unwrap(), 20.0);
}

#[test]
fn division_follows_ieee() {
    assert_eq!(compute("5 / 0").unwrap(), f64::INFINITY);
    assert_eq!(compute("(-30)/0").unwrap(), f64::NEG_INFINITY);
    assert!(compute("0/0").unwrap().is_nan());
}

#[test]
fn comparison_yields_one_or_zero() {
    assert_eq!(compute("2 + 3 = 1 + 4").unwrap(), 1.0);
    assert_eq!(compute("2 + 3 = 1 + 5").unwrap(), 0.0);
    assert_eq!(compute("2 < 3").unwrap(), 1.0);
    assert_eq!(compute("2 >= 3").unwrap(), 0.0);
    assert_eq!(compute("3 >= 3").unwrap(), 1.0);
    assert_eq!(compute("2 != 3").unwrap(), 1.0);
}

#[test]
fn equality_tolerance_is_absolute() {
    assert_eq!(compute("1.000000001 = 1").unwrap(), 1.0);
    assert_eq!(compute("1.001 = 1").unwrap(), 0.0);
}

#[test]
fn leading_dot_literals() {
    assert_eq!(compute(".25 + .25").unwrap(), 0.5);
}

#[test]
fn sign_folding_identities() {
    assert_eq!(compute("--7").unwrap(), 7.0);
    assert_eq!(compute("-+7").unwrap(), -7.0);
    assert_eq!(compute("+-7").unwrap(), -7.0);
    assert_eq!(compute("5--3").unwrap(), 8.0);
    assert_eq!(compute("5+-3").unwrap(), 2.0);
}

#[test]
fn whitespace_never_matters() {
    for (spaced, compact) in [
        ("2 + 3 * 4", "2+3*4"),
        (" ( 27 ^ 2 ) ^ 4 ", "(27^2)^4"),
        ("3 ( 7 + 3 )", "3(7+3)"),
        ("( 7 + 3 ) 3", "(7+3)3"),
    ] {
        let a = compute(spaced);
        let b = compute(compact);
        match (a, b) {
            (Ok(x), Ok(y)) => assert_eq!(x, y, "{spaced:?} vs {compact:?}"),
            (a, b) => panic!("{spaced:?} -> {a:?}, {compact:?} -> {b:?}"),
        }
    }
}

#[test]
fn user_function_over_reduced_arguments() {
    let mut calc = Calculator::new();
    calc.add_function("square", |args| args.double(0) * args.double(0));
    assert_eq!(calc.compute("square((2+3)(3+1)+1)").unwrap(), 441.0);
    assert_eq!(calc.compute("square(4)").unwrap(), 16.0);
}

#[test]
fn custom_operator_binds_loosest() {
    let mut calc = Calculator::new();
    calc.add_operator("$", |a, b| a * 2.0 + b * 3.0);
    assert_eq!(calc.compute("3 $ 2").unwrap(), 12.0);
    assert_eq!(calc.compute("1 + 2 $ 2").unwrap(), 12.0, "lowest precedence");
}

#[test]
fn constants_participate() {
    let mut calc = Calculator::new();
    assert_eq!(calc.compute("pi").unwrap(), 3.14159265358979);
    assert_eq!(calc.compute("2pi").unwrap(), 2.0 * 3.14159265358979);
    assert!((calc.compute("tao - 2pi").unwrap()).abs() < 1e-9);
}

/* ──────────────────── cell-backed scenarios ───────────────────── */

#[test]
fn sum_over_a_relative_range() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|_: &str| Some("123".to_string()));
    calc.set_variable("col", 1.0);
    calc.set_variable("row", 10.0);
    assert_eq!(calc.compute("sum(A1:cell(0,-1))").unwrap(), 123.0 * 9.0);
}

#[test]
fn relative_cell_identity() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|addr: &str| (addr == "C10").then(|| "77".to_string()));
    calc.set_variable("col", 3.0);
    calc.set_variable("row", 10.0);
    // cell(0,0) names exactly the current cell
    assert_eq!(calc.compute("sum(C10:cell(0,0))").unwrap(), 77.0);
}

#[test]
fn range_direction_is_irrelevant() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|_: &str| Some("2".to_string()));
    assert_eq!(
        calc.compute("sum(A1:A9)").unwrap(),
        calc.compute("sum(A9:A1)").unwrap()
    );
    assert_eq!(calc.compute("sum(A1:A9)").unwrap(), 18.0);
}

#[test]
fn countif_with_a_cell_operand() {
    let mut calc = Calculator::new();
    // column A holds its row number
    calc.set_cell_provider(|addr: &str| {
        addr.strip_prefix('A').map(|row| row.to_string())
    });
    calc.set_variable("col", 3.0);
    calc.set_variable("row", 10.0);
    assert_eq!(calc.compute("countif(A1:A10, < A5)").unwrap(), 4.0);
    assert_eq!(calc.compute("countif(A1:A10, > A5)").unwrap(), 5.0);
    assert_eq!(calc.compute("countif(A1:A10, A5)").unwrap(), 1.0);
}

#[test]
fn countif_against_boolean_text() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|addr: &str| {
        let row: u32 = addr.strip_prefix('D')?.parse().ok()?;
        Some(if row % 2 == 0 { "True" } else { "False" }.to_string())
    });
    assert_eq!(calc.compute("countif(D1:D10, true)").unwrap(), 5.0);
    assert_eq!(calc.compute("countif(D1:D10, false)").unwrap(), 5.0);
}

#[test]
fn countif_not_equal() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|addr: &str| {
        addr.strip_prefix('A').map(|row| row.to_string())
    });
    assert_eq!(calc.compute("countif(A1:A10, !5)").unwrap(), 9.0);
}

#[test]
fn lone_cell_reference_inlines_its_value() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|addr: &str| (addr == "B2").then(|| "20".to_string()));
    assert_eq!(calc.compute("B2 / 4").unwrap(), 5.0);
    assert_eq!(calc.compute("b2 / 4").unwrap(), 5.0, "addresses ignore case");
}

#[test]
fn missing_cells_abort_the_computation() {
    let mut calc = Calculator::new();
    // no provider at all
    let err = calc.compute("A1 + 1").unwrap_err();
    assert_eq!(err.to_string(), "invalid parameter at cell A1");

    calc.set_cell_provider(|addr: &str| (addr == "A1").then(|| "1".to_string()));
    let err = calc.compute("sum(A1:A3)").unwrap_err();
    assert_eq!(err.to_string(), "invalid parameter at cell A2");
}

#[test]
fn unbalanced_parens_are_reported() {
    let err = compute("(1 + 2").unwrap_err();
    assert_eq!(err.message(), "no closing bracket");
}

#[test]
fn unknown_names_are_undefined_variables() {
    let err = compute("1 + bogus").unwrap_err();
    assert_eq!(err.message(), "variable bogus is undefined");
}

#[test]
fn malformed_numbers_fail_at_evaluation() {
    let err = compute("1.2.3 + 1").unwrap_err();
    assert_eq!(err.message(), "variable 1.2.3 is undefined");
}

#[test]
fn aggregates_over_ranges() {
    let mut calc = Calculator::new();
    calc.set_cell_provider(|addr: &str| {
        addr.strip_prefix('A').map(|row| row.to_string())
    });
    assert_eq!(calc.compute("average(A1:A9)").unwrap(), 5.0);
    assert_eq!(calc.compute("max(A1:A9) - min(A1:A9)").unwrap(), 8.0);
    assert_eq!(calc.compute("median(A1:A9)").unwrap(), 5.0);
    assert_eq!(calc.compute("range(A1:A9)").unwrap(), 8.0);
    // sample variance of 1..9 is 7.5
    assert!((calc.compute("variance(A1:A9)").unwrap() - 7.5).abs() < 1e-12);
    assert!((calc.compute("stdev(A1:A9)").unwrap() - 7.5f64.sqrt()).abs() < 1e-12);
}
