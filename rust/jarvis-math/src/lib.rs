//! # jarvis-math
//!
//! Spoken arithmetic for the Jarvis assistant: a translator that rewrites
//! phrases such as "the square root of 16" into canonical infix notation, and
//! a sandboxed evaluator for that notation.
//!
//! ## Pipeline
//!
//! ```text
//! phrase → translate (regex cascade) → canonical expression
//!   → tokenize → parse (whitelist resolution) → Expr
//!     → eval (tree walk) → f64 → format → "The result is …"
//! ```
//!
//! ## Sandboxing
//!
//! There is no string evaluation anywhere in the crate. Callable names and
//! constants are closed enums ([`ast::Function`], [`ast::Constant`]) resolved
//! at parse time, so a name outside the whitelist can never reach evaluation;
//! it surfaces as [`EvalError::UnknownName`].
//!
//! ## Example
//!
//! ```
//! use jarvis_math::{answer, translate};
//!
//! let expression = translate("what is 5 plus 3");
//! assert_eq!(expression, "5 + 3");
//! assert_eq!(answer(&expression), "The result is 8");
//!
//! assert_eq!(answer("10 / 0"), "Sorry, I can't divide by zero.");
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod format;
pub mod parser;
pub mod tokenizer;
pub mod translate;

pub use error::EvalError;
pub use eval::{eval, evaluate};
pub use format::{answer, calculate, format_number};
pub use parser::parse;
pub use translate::translate;
