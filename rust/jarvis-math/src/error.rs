//! Error types for expression evaluation.

use thiserror::Error;

/// Everything that can go wrong between a canonical expression and a number.
///
/// Each category owns exactly one user-facing message (see
/// [`EvalError::user_message`]); the `Display` form carries the detail that
/// ends up in the logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric result out of range in {operation}")]
    Overflow { operation: String },

    #[error("syntax error: expected {expected}, found {found}")]
    Syntax { expected: String, found: String },

    #[error("name '{name}' is not defined")]
    UnknownName { name: String },

    #[error("invalid call to '{function}': {reason}")]
    InvalidArgument { function: String, reason: String },

    #[error("math domain error in {operation}")]
    Domain { operation: String },

    #[error("result of {operation} is a complex number")]
    ComplexResult { operation: String },
}

impl EvalError {
    pub(crate) fn syntax(expected: impl Into<String>, found: impl Into<String>) -> Self {
        EvalError::Syntax {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn overflow(operation: impl Into<String>) -> Self {
        EvalError::Overflow {
            operation: operation.into(),
        }
    }

    pub(crate) fn domain(operation: impl Into<String>) -> Self {
        EvalError::Domain {
            operation: operation.into(),
        }
    }

    /// The sentence spoken back to the user for this failure.
    ///
    /// Never includes the failing expression or any internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            EvalError::DivisionByZero => "Sorry, I can't divide by zero.",
            EvalError::Overflow { .. } => "The result of the calculation is too large to handle.",
            EvalError::Syntax { .. } => {
                "I couldn't understand the calculation format. Please rephrase."
            }
            EvalError::UnknownName { .. } => {
                "Sorry, I don't know some of the functions or names in that calculation."
            }
            EvalError::InvalidArgument { .. } => {
                "There seems to be a problem with the numbers or functions in your calculation. Please check the format."
            }
            EvalError::ComplexResult { .. } => {
                "The result is a complex number. I can only provide results for real numbers as of now!"
            }
            EvalError::Domain { .. } => {
                "Sorry, an unexpected error occurred while trying to calculate that."
            }
        }
    }
}
