//! Turning evaluation outcomes into spoken answers.

use crate::error::EvalError;
use crate::eval::evaluate;

/// Decimal places kept for non-integral results.
const DECIMAL_PLACES: i32 = 6;

/// Render a number the way it is read back to the user.
///
/// Integral values print without a fractional part (`4`, not `4.0`); anything
/// else is rounded half-to-even to six decimal places.
pub fn format_number(value: f64) -> String {
    // Adding 0.0 folds -0.0 into 0.0.
    if value.fract() == 0.0 {
        return format!("{}", value + 0.0);
    }
    let scale = 10f64.powi(DECIMAL_PLACES);
    let rounded = (value * scale).round_ties_even() / scale;
    format!("{}", rounded + 0.0)
}

/// Evaluate a canonical expression into its formatted numeric string.
pub fn calculate(expression: &str) -> Result<String, EvalError> {
    evaluate(expression).map(format_number)
}

/// Evaluate a canonical expression into the sentence spoken back to the user.
///
/// Failures are logged with the raw expression and the failure detail; the
/// returned sentence only ever carries the category's user-facing message.
pub fn answer(expression: &str) -> String {
    match calculate(expression) {
        Ok(result) => format!("The result is {result}"),
        Err(error) => {
            tracing::warn!(expression, %error, "calculation failed");
            error.user_message().to_string()
        }
    }
}
