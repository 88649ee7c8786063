//! Aggregate builtins over the numeric view of the argument list.
//!
//! All of these operate on `VariantList::to_double_array()`: number
//! arguments plus text arguments that parse as numbers. An empty numeric
//! set is not an error; `sum` answers 0 and the order statistics answer
//! NaN, matching the "no data" reading.

use gridcalc_common::{CalcError, VariantList};
use rustc_hash::FxHashMap;

use crate::function::BuiltinFn;

fn sum(args: &VariantList) -> Result<f64, CalcError> {
    Ok(args.to_double_array().iter().sum())
}

fn average(args: &VariantList) -> Result<f64, CalcError> {
    let xs = args.to_double_array();
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

fn max(args: &VariantList) -> Result<f64, CalcError> {
    Ok(args.to_double_array().into_iter().fold(f64::NAN, f64::max))
}

fn min(args: &VariantList) -> Result<f64, CalcError> {
    Ok(args.to_double_array().into_iter().fold(f64::NAN, f64::min))
}

fn median(args: &VariantList) -> Result<f64, CalcError> {
    let mut xs = args.to_double_array();
    if xs.is_empty() {
        return Ok(f64::NAN);
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = xs.len() / 2;
    if xs.len() % 2 == 1 {
        Ok(xs[mid])
    } else {
        Ok((xs[mid - 1] + xs[mid]) / 2.0)
    }
}

/// Most frequent value; the first seen wins a tie.
fn mode(args: &VariantList) -> Result<f64, CalcError> {
    let xs = args.to_double_array();
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &x in &xs {
        match counts.iter_mut().find(|(seen, _)| *seen == x) {
            Some(entry) => entry.1 += 1,
            None => counts.push((x, 1)),
        }
    }
    let mut best: Option<(f64, usize)> = None;
    for (x, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((x, n));
        }
    }
    Ok(best.map_or(f64::NAN, |(x, _)| x))
}

fn range(args: &VariantList) -> Result<f64, CalcError> {
    let xs = args.to_double_array();
    let hi = xs.iter().copied().fold(f64::NAN, f64::max);
    let lo = xs.iter().copied().fold(f64::NAN, f64::min);
    Ok(hi - lo)
}

/// Sample variance, one-pass Welford update, n−1 denominator.
fn variance(args: &VariantList) -> Result<f64, CalcError> {
    let xs = args.to_double_array();
    if xs.len() < 2 {
        return Ok(0.0);
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in xs.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    Ok(m2 / (xs.len() - 1) as f64)
}

fn stdev(args: &VariantList) -> Result<f64, CalcError> {
    let var = variance(args)?;
    // the one-pass update can leave sub-epsilon noise on constant input
    if var.abs() < f64::EPSILON {
        return Ok(0.0);
    }
    Ok(var.sqrt())
}

pub(crate) fn register(reg: &mut FxHashMap<&'static str, BuiltinFn>) {
    reg.insert("sum", sum);
    reg.insert("average", average);
    reg.insert("max", max);
    reg.insert("min", min);
    reg.insert("median", median);
    reg.insert("mode", mode);
    reg.insert("range", range);
    reg.insert("stdev", stdev);
    reg.insert("variance", variance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_common::Variant;

    fn args(values: &[f64]) -> VariantList {
        values.iter().map(|&v| Variant::Number(v)).collect()
    }

    #[test]
    fn sum_and_average() {
        assert_eq!(sum(&args(&[1.0, 2.0, 3.5])).unwrap(), 6.5);
        assert_eq!(average(&args(&[1.0, 2.0, 3.0])).unwrap(), 2.0);
        assert_eq!(sum(&args(&[])).unwrap(), 0.0);
        assert!(average(&args(&[])).unwrap().is_nan());
    }

    #[test]
    fn numeric_text_counts_too() {
        let mixed: VariantList = vec![
            Variant::Number(1.0),
            Variant::Text("2".into()),
            Variant::Text("n/a".into()),
        ]
        .into();
        assert_eq!(sum(&mixed).unwrap(), 3.0);
        assert_eq!(average(&mixed).unwrap(), 1.5);
    }

    #[test]
    fn extrema_and_range() {
        assert_eq!(max(&args(&[3.0, -1.0, 7.0])).unwrap(), 7.0);
        assert_eq!(min(&args(&[3.0, -1.0, 7.0])).unwrap(), -1.0);
        assert_eq!(range(&args(&[3.0, -1.0, 7.0])).unwrap(), 8.0);
        assert!(max(&args(&[])).unwrap().is_nan());
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&args(&[5.0, 1.0, 3.0])).unwrap(), 3.0);
        assert_eq!(median(&args(&[4.0, 1.0, 3.0, 2.0])).unwrap(), 2.5);
        assert!(median(&args(&[])).unwrap().is_nan());
    }

    #[test]
    fn mode_prefers_first_seen_on_ties() {
        assert_eq!(mode(&args(&[2.0, 1.0, 2.0, 3.0, 3.0])).unwrap(), 2.0);
        assert_eq!(mode(&args(&[9.0])).unwrap(), 9.0);
        assert!(mode(&args(&[])).unwrap().is_nan());
    }

    #[test]
    fn welford_variance_matches_two_pass() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let var = variance(&args(&data)).unwrap();
        assert!((var - 32.0 / 7.0).abs() < 1e-12);
        assert!((stdev(&args(&data)).unwrap() - var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_spread_is_zero() {
        assert_eq!(variance(&args(&[5.0])).unwrap(), 0.0);
        assert_eq!(variance(&args(&[])).unwrap(), 0.0);
        assert_eq!(stdev(&args(&[4.2, 4.2, 4.2, 4.2])).unwrap(), 0.0);
    }
}
