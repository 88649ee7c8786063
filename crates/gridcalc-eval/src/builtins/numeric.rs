//! Scalar numeric builtins: trigonometry, rounding, powers and friends.

use gridcalc_common::{CalcError, VariantList, VariantTag};
use rustc_hash::FxHashMap;

use crate::function::BuiltinFn;

const ONE_NUMBER: &[VariantTag] = &[VariantTag::Number];
const TWO_NUMBERS: &[VariantTag] = &[VariantTag::Number, VariantTag::Number];

fn unary(args: &VariantList, f: impl Fn(f64) -> f64) -> Result<f64, CalcError> {
    args.assert(ONE_NUMBER)?;
    Ok(f(args.double(0)))
}

fn binary(args: &VariantList, f: impl Fn(f64, f64) -> f64) -> Result<f64, CalcError> {
    args.assert(TWO_NUMBERS)?;
    Ok(f(args.double(0), args.double(1)))
}

fn abs(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::abs)
}

fn acos(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::acos)
}

fn asin(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::asin)
}

fn atan(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::atan)
}

fn atan2(args: &VariantList) -> Result<f64, CalcError> {
    binary(args, f64::atan2)
}

fn ceil(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::ceil)
}

fn cos(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::cos)
}

fn cosh(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::cosh)
}

fn exp(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::exp)
}

fn floor(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::floor)
}

fn ln(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::ln)
}

fn log(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::log10)
}

fn pow(args: &VariantList) -> Result<f64, CalcError> {
    binary(args, f64::powf)
}

/// IEEE 754 remainder: the quotient rounds to the nearest integer, ties to
/// even, unlike the `%` operator's truncating remainder.
fn rem(args: &VariantList) -> Result<f64, CalcError> {
    binary(args, |a, b| a - b * (a / b).round_ties_even())
}

fn root(args: &VariantList) -> Result<f64, CalcError> {
    binary(args, |a, b| a.powf(1.0 / b))
}

/// Half away from zero.
fn round(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::round)
}

fn sign(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, |x| {
        if x > 0.0 {
            1.0
        } else if x < 0.0 {
            -1.0
        } else {
            0.0
        }
    })
}

fn sin(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::sin)
}

fn sinh(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::sinh)
}

fn sqrt(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::sqrt)
}

fn tan(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::tan)
}

fn tanh(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::tanh)
}

fn trunc(args: &VariantList) -> Result<f64, CalcError> {
    unary(args, f64::trunc)
}

pub(crate) fn register(reg: &mut FxHashMap<&'static str, BuiltinFn>) {
    reg.insert("abs", abs);
    reg.insert("acos", acos);
    reg.insert("arccos", acos);
    reg.insert("asin", asin);
    reg.insert("arcsin", asin);
    reg.insert("atan", atan);
    reg.insert("arctan", atan);
    reg.insert("atan2", atan2);
    reg.insert("ceil", ceil);
    reg.insert("ceiling", ceil);
    reg.insert("cos", cos);
    reg.insert("cosh", cosh);
    reg.insert("exp", exp);
    reg.insert("floor", floor);
    reg.insert("ln", ln);
    reg.insert("log", log);
    reg.insert("pow", pow);
    reg.insert("rem", rem);
    reg.insert("root", root);
    reg.insert("round", round);
    reg.insert("sign", sign);
    reg.insert("sin", sin);
    reg.insert("sinh", sinh);
    reg.insert("sqrt", sqrt);
    reg.insert("tan", tan);
    reg.insert("tanh", tanh);
    reg.insert("trunc", trunc);
    reg.insert("truncate", trunc);
}
