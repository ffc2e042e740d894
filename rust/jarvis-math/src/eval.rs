//! Tree-walking evaluator over the whitelisted function set.
//!
//! Evaluation never leaves `f64`. Results that would escape the reals are
//! reported as [`EvalError::ComplexResult`], infinities produced from finite
//! operands as [`EvalError::Overflow`], and undefined points of a function as
//! [`EvalError::Domain`].

use crate::ast::{BinaryOp, Expr, Function, UnaryOp};
use crate::error::EvalError;
use crate::parser::parse;

/// Largest `n` for which `n!` is representable as a finite `f64`.
const MAX_FACTORIAL: f64 = 170.0;

/// Parse and evaluate a canonical expression.
///
/// # Example
///
/// ```
/// use jarvis_math::evaluate;
///
/// assert_eq!(evaluate("5 * (log10(100) + sqrt(16)) / 2").unwrap(), 15.0);
/// ```
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let expr = parse(expression)?;
    eval(&expr)
}

/// Evaluate an already parsed expression tree.
pub fn eval(expr: &Expr) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Constant(c) => Ok(c.value()),
        Expr::Unary { op, operand } => {
            let value = eval(operand)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Negate => -value,
            })
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, eval(lhs)?, eval(rhs)?),
        Expr::Call { function, args } => {
            let values = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            call(*function, &values)
        }
    }
}

/// Reject non-finite results of an operation whose operands were finite.
fn finite(operation: &str, operands: &[f64], value: f64) -> Result<f64, EvalError> {
    if value.is_nan() {
        return Err(EvalError::domain(operation));
    }
    if value.is_infinite() && operands.iter().all(|x| x.is_finite()) {
        return Err(EvalError::overflow(operation));
    }
    Ok(value)
}

fn is_integral(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0
}

fn binary(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let operation = op.to_string();
    match op {
        BinaryOp::Add => finite(&operation, &[lhs, rhs], lhs + rhs),
        BinaryOp::Subtract => finite(&operation, &[lhs, rhs], lhs - rhs),
        BinaryOp::Multiply => finite(&operation, &[lhs, rhs], lhs * rhs),
        BinaryOp::Divide => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            finite(&operation, &[lhs, rhs], lhs / rhs)
        }
        BinaryOp::Modulo => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            // Floored modulo: the result takes the sign of the divisor.
            let mut remainder = lhs % rhs;
            if remainder != 0.0 && (remainder < 0.0) != (rhs < 0.0) {
                remainder += rhs;
            }
            finite(&operation, &[lhs, rhs], remainder)
        }
        BinaryOp::Power => {
            if lhs == 0.0 && rhs < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            if lhs < 0.0 && !is_integral(rhs) && rhs.is_finite() {
                return Err(EvalError::ComplexResult { operation });
            }
            finite(&operation, &[lhs, rhs], lhs.powf(rhs))
        }
    }
}

fn call(function: Function, args: &[f64]) -> Result<f64, EvalError> {
    let name = function.name();
    let x = args.first().copied().unwrap_or(f64::NAN);
    let y = args.get(1).copied();

    let value = match function {
        Function::Sin | Function::Cos | Function::Tan => {
            if x.is_infinite() {
                return Err(EvalError::domain(name));
            }
            match function {
                Function::Sin => x.sin(),
                Function::Cos => x.cos(),
                _ => x.tan(),
            }
        }
        Function::Asin | Function::Acos => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(EvalError::domain(name));
            }
            if function == Function::Asin {
                x.asin()
            } else {
                x.acos()
            }
        }
        Function::Atan => x.atan(),
        Function::Atan2 => x.atan2(y.unwrap_or(f64::NAN)),
        Function::Degrees => x.to_degrees(),
        Function::Radians => x.to_radians(),
        Function::Hypot => x.hypot(y.unwrap_or(f64::NAN)),

        Function::Sinh => x.sinh(),
        Function::Cosh => x.cosh(),
        Function::Tanh => x.tanh(),
        Function::Asinh => x.asinh(),
        Function::Acosh => {
            if x < 1.0 {
                return Err(EvalError::domain(name));
            }
            x.acosh()
        }
        Function::Atanh => {
            if x.abs() >= 1.0 {
                return Err(EvalError::domain(name));
            }
            x.atanh()
        }

        Function::Exp => x.exp(),
        Function::Log | Function::Ln => {
            if x <= 0.0 {
                return Err(EvalError::domain(name));
            }
            match y {
                Some(base) => {
                    if base <= 0.0 {
                        return Err(EvalError::domain(name));
                    }
                    let denominator = base.ln();
                    if denominator == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    x.ln() / denominator
                }
                None => x.ln(),
            }
        }
        Function::Log10 | Function::Log2 => {
            if x <= 0.0 {
                return Err(EvalError::domain(name));
            }
            if function == Function::Log10 {
                x.log10()
            } else {
                x.log2()
            }
        }

        Function::Pow => {
            let exponent = y.unwrap_or(f64::NAN);
            if (x < 0.0 && !is_integral(exponent)) || (x == 0.0 && exponent < 0.0) {
                return Err(EvalError::domain(name));
            }
            x.powf(exponent)
        }
        Function::Sqrt => {
            if x < 0.0 {
                return Err(EvalError::domain(name));
            }
            x.sqrt()
        }
        Function::Cbrt => x.cbrt(),
        Function::NthRoot => nth_root(x, y.unwrap_or(f64::NAN))?,
        Function::Ldexp => {
            let exponent = y.unwrap_or(f64::NAN);
            if !is_integral(exponent) {
                return Err(EvalError::InvalidArgument {
                    function: name.into(),
                    reason: "exponent must be an integer".into(),
                });
            }
            x * 2f64.powf(exponent)
        }

        Function::Ceil | Function::Floor | Function::Trunc | Function::Int => {
            if x.is_nan() {
                return Err(EvalError::domain(name));
            }
            if x.is_infinite() {
                return Err(EvalError::overflow(name));
            }
            match function {
                Function::Ceil => x.ceil(),
                Function::Floor => x.floor(),
                _ => x.trunc(),
            }
        }
        Function::Fmod => {
            let divisor = y.unwrap_or(f64::NAN);
            if divisor == 0.0 || x.is_infinite() {
                return Err(EvalError::domain(name));
            }
            x % divisor
        }

        Function::Factorial => factorial(x)?,
        Function::Gamma | Function::Lgamma => {
            if x <= 0.0 && is_integral(x) {
                return Err(EvalError::domain(name));
            }
            if function == Function::Gamma {
                libm::tgamma(x)
            } else {
                libm::lgamma(x)
            }
        }
        Function::Erf => libm::erf(x),
        Function::Erfc => libm::erfc(x),

        Function::Abs | Function::Fabs => x.abs(),
        Function::Round => round(x, y)?,
        Function::Float => x,
    };

    finite(name, args, value)
}

fn nth_root(x: f64, n: f64) -> Result<f64, EvalError> {
    if n == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if x < 0.0 {
        // Odd integral roots of negatives stay real; everything else leaves the reals.
        if is_integral(n) && n % 2.0 != 0.0 {
            return Ok(-(-x).powf(1.0 / n));
        }
        return Err(EvalError::ComplexResult {
            operation: Function::NthRoot.name().into(),
        });
    }
    Ok(x.powf(1.0 / n))
}

fn factorial(x: f64) -> Result<f64, EvalError> {
    let name = Function::Factorial.name();
    if !is_integral(x) || x < 0.0 {
        return Err(EvalError::domain(name));
    }
    if x > MAX_FACTORIAL {
        return Err(EvalError::overflow(name));
    }
    Ok((2..=x as u64).fold(1.0, |acc, k| acc * k as f64))
}

/// Round half to even, optionally to `digits` decimal places.
fn round(x: f64, digits: Option<f64>) -> Result<f64, EvalError> {
    let Some(digits) = digits else {
        if x.is_infinite() {
            return Err(EvalError::overflow(Function::Round.name()));
        }
        return Ok(x.round_ties_even());
    };
    if !is_integral(digits) {
        return Err(EvalError::InvalidArgument {
            function: Function::Round.name().into(),
            reason: "number of digits must be an integer".into(),
        });
    }
    let scale = 10f64.powf(digits);
    let scaled = x * scale;
    if !scaled.is_finite() || scale == 0.0 {
        return Ok(x);
    }
    Ok(scaled.round_ties_even() / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(expression: &str, expected: f64) {
        let value = evaluate(expression).unwrap();
        assert!(
            (value - expected).abs() < 1e-9,
            "{expression} = {value}, expected {expected}"
        );
    }

    #[test]
    fn test_basic_arithmetic() {
        approx("5 + 3", 8.0);
        approx("10 - 4", 6.0);
        approx("6 * 7", 42.0);
        approx("100 / 4", 25.0);
        approx("10 % 3", 1.0);
        approx("2**3", 8.0);
    }

    #[test]
    fn test_floored_modulo() {
        approx("-7 % 3", 2.0);
        approx("7 % -3", -2.0);
    }

    #[test]
    fn test_whitelisted_functions() {
        approx("pow(2, 4)", 16.0);
        approx("sqrt(16)", 4.0);
        approx("cbrt(27)", 3.0);
        approx("nth_root(81, 4)", 3.0);
        approx("log10(100)", 2.0);
        approx("ln(e)", 1.0);
        approx("log(8, 2)", 3.0);
        approx("factorial(5)", 120.0);
        approx("abs(-5)", 5.0);
        approx("round(3.14159, 2)", 3.14);
        approx("round(2.5)", 2.0);
        approx("int(-3.7)", -3.0);
        approx("gamma(5)", 24.0);
    }

    #[test]
    fn test_degree_aware_trigonometry() {
        approx("sin(radians(30))", 0.5);
        approx("cos(radians(60))", 0.5);
        approx("tan(radians(45))", 1.0);
        approx("degrees(asin(0.5))", 30.0);
        approx("degrees(acos(0.5))", 60.0);
        approx("degrees(atan(1))", 45.0);
    }

    #[test]
    fn test_compound_expression() {
        approx("5 * (log10(100) + sqrt(16)) / 2", 15.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("10 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("10 % 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("0 ** -1"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("nth_root(8, 0)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(evaluate("exp(1000)"), Err(EvalError::Overflow { .. })));
        assert!(matches!(evaluate("10 ** 400"), Err(EvalError::Overflow { .. })));
        assert!(matches!(evaluate("factorial(171)"), Err(EvalError::Overflow { .. })));
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(evaluate("sqrt(-1)"), Err(EvalError::Domain { .. })));
        assert!(matches!(evaluate("log(0)"), Err(EvalError::Domain { .. })));
        assert!(matches!(evaluate("asin(2)"), Err(EvalError::Domain { .. })));
        assert!(matches!(evaluate("factorial(2.5)"), Err(EvalError::Domain { .. })));
    }

    #[test]
    fn test_complex_results_are_rejected() {
        assert!(matches!(
            evaluate("(-8) ** 0.5"),
            Err(EvalError::ComplexResult { .. })
        ));
        assert!(matches!(
            evaluate("nth_root(-16, 4)"),
            Err(EvalError::ComplexResult { .. })
        ));
    }

    #[test]
    fn test_odd_roots_of_negatives_are_real() {
        approx("cbrt(-8)", -2.0);
        approx("nth_root(-32, 5)", -2.0);
    }
}
