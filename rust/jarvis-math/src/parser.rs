//! Recursive-descent parser for canonical expressions.
//!
//! Converts a token stream (from [`crate::tokenizer`]) into an [`Expr`] tree.
//! Precedence and associativity follow conventional calculator rules, with
//! `**` binding tighter than a leading minus (`-2**2` is `-4`):
//!
//! ```text
//! expr    = term (('+' | '-') term)*
//! term    = factor (('*' | '/' | '%') factor)*
//! factor  = ('+' | '-') factor
//!         | power
//! power   = primary ('**' factor)?        → right-associative
//! primary = Number
//!         | Name '(' (expr (',' expr)*)? ')'   → whitelisted call
//!         | Name                               → whitelisted constant
//!         | '(' expr ')'
//! ```
//!
//! Names are resolved while parsing, so an expression that parses is one that
//! only references the whitelist.

use crate::ast::{BinaryOp, Constant, Expr, Function, UnaryOp};
use crate::error::EvalError;
use crate::tokenizer::{Token, tokenize};

/// Deepest nesting of parentheses, calls and signs the parser descends into.
pub const MAX_DEPTH: usize = 256;

/// Longest token stream accepted. Bounds the height of left-leaning operator
/// chains, which grow the tree without nesting.
pub const MAX_TOKENS: usize = 1024;

/// A token-stream parser.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn found(&self) -> String {
        self.peek()
            .map(|t| format!("'{t}'"))
            .unwrap_or("end of input".into())
    }

    fn expect(&mut self, expected: Token) -> Result<(), EvalError> {
        if self.peek() == Some(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(EvalError::syntax(format!("'{expected}'"), self.found()))
        }
    }

    // --- Binary levels ---

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                Some(Token::Percent) => BinaryOp::Modulo,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Every recursive path passes through here, so this is where depth is
    /// counted.
    fn parse_factor(&mut self) -> Result<Expr, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::syntax("expression", "nesting too deep"));
        }
        self.depth += 1;
        let factor = self.parse_signed();
        self.depth -= 1;
        factor
    }

    fn parse_signed(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::unary(UnaryOp::Negate, self.parse_factor()?))
            }
            Some(Token::Plus) => {
                self.advance();
                Ok(Expr::unary(UnaryOp::Plus, self.parse_factor()?))
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&Token::DoubleStar) {
            self.advance();
            let exponent = self.parse_factor()?;
            Ok(Expr::binary(BinaryOp::Power, base, exponent))
        } else {
            Ok(base)
        }
    }

    // --- Atoms ---

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LeftParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RightParen)?;
                Ok(inner)
            }
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::LeftParen) {
                    self.advance();
                    self.parse_call(name)
                } else {
                    resolve_constant(&name)
                }
            }
            Some(other) => Err(EvalError::syntax("operand", format!("'{other}'"))),
            None => Err(EvalError::syntax("operand", "end of input")),
        }
    }

    /// Parse the argument list of a call whose `(` was already consumed.
    fn parse_call(&mut self, name: String) -> Result<Expr, EvalError> {
        let function = resolve_function(&name)?;

        let mut args = Vec::new();
        if self.peek() != Some(&Token::RightParen) {
            args.push(self.parse_expr()?);
            while self.peek() == Some(&Token::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.expect(Token::RightParen)?;

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(EvalError::InvalidArgument {
                function: function.name().into(),
                reason: format!("takes {arity} arguments ({} given)", args.len()),
            });
        }

        Ok(Expr::Call { function, args })
    }
}

fn resolve_function(name: &str) -> Result<Function, EvalError> {
    if let Some(function) = Function::from_name(name) {
        Ok(function)
    } else if Constant::from_name(name).is_some() {
        Err(EvalError::InvalidArgument {
            function: name.into(),
            reason: "a constant is not callable".into(),
        })
    } else {
        Err(EvalError::UnknownName { name: name.into() })
    }
}

fn resolve_constant(name: &str) -> Result<Expr, EvalError> {
    if let Some(constant) = Constant::from_name(name) {
        Ok(Expr::Constant(constant))
    } else if Function::from_name(name).is_some() {
        Err(EvalError::InvalidArgument {
            function: name.into(),
            reason: "used without an argument list".into(),
        })
    } else {
        Err(EvalError::UnknownName { name: name.into() })
    }
}

/// Find the first identifier-shaped run in raw input that is not whitelisted.
///
/// Runs glued to a preceding digit (`2e5`) belong to a number literal and are
/// left to the tokenizer.
fn first_unknown_name(input: &str) -> Option<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let starts_name = (chars[i].is_ascii_alphabetic() || chars[i] == '_')
            && (i == 0 || !(chars[i - 1].is_ascii_alphanumeric() || chars[i - 1] == '.'));
        if !starts_name {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
            i += 1;
        }
        let name: String = chars[start..i].iter().collect::<String>().to_ascii_lowercase();
        if Function::from_name(&name).is_none() && Constant::from_name(&name).is_none() {
            return Some(name);
        }
    }
    None
}

/// Parse a canonical expression into an [`Expr`].
///
/// Every name in the input is checked against the whitelist before any
/// grammar is applied, so an unresolvable name is always reported as
/// [`EvalError::UnknownName`], however the rest of the input is shaped.
///
/// # Example
///
/// ```
/// use jarvis_math::parse;
///
/// let expr = parse("sqrt(16) + 1").unwrap();
/// assert_eq!(expr.to_string(), "(sqrt(16) + 1)");
/// ```
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    if let Some(name) = first_unknown_name(input) {
        return Err(EvalError::UnknownName { name });
    }

    let tokens = tokenize(input)?;
    if tokens.len() > MAX_TOKENS {
        return Err(EvalError::syntax("expression", "too many tokens"));
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    if parser.peek().is_some() {
        return Err(EvalError::syntax("end of expression", parser.found()));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_precedence() {
        let expr = parse("1 + 2 * 3").unwrap();
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn test_left_associative_subtraction() {
        let expr = parse("10 - 4 - 3").unwrap();
        assert_eq!(expr.to_string(), "((10 - 4) - 3)");
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse("2 ** 3 ** 2").unwrap();
        assert_eq!(expr.to_string(), "(2 ** (3 ** 2))");
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        let expr = parse("-2**2").unwrap();
        assert_eq!(expr.to_string(), "-(2 ** 2)");
    }

    #[test]
    fn test_nested_calls() {
        let expr = parse("degrees(asin(0.5))").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                function: Function::Degrees,
                args: vec![Expr::Call {
                    function: Function::Asin,
                    args: vec![Expr::Number(0.5)],
                }],
            }
        );
    }

    #[test]
    fn test_two_argument_call() {
        let expr = parse("log(8, 2)").unwrap();
        assert_eq!(expr.to_string(), "log(8, 2)");
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            parse("system(1)"),
            Err(EvalError::UnknownName {
                name: "system".into()
            })
        );
    }

    #[test]
    fn test_unknown_name_wins_over_syntax() {
        // Unbalanced and ill-formed, but the foreign name is what gets reported.
        assert_eq!(
            parse("1 + + ( os"),
            Err(EvalError::UnknownName { name: "os".into() })
        );
    }

    #[test]
    fn test_unknown_name_wins_over_foreign_characters() {
        assert_eq!(
            parse("__import__('os').system('ls')"),
            Err(EvalError::UnknownName {
                name: "__import__".into()
            })
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert!(matches!(
            parse("sqrt(1, 2)"),
            Err(EvalError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse("atan2(1)"),
            Err(EvalError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_constant_is_not_callable() {
        assert!(matches!(
            parse("pi(2)"),
            Err(EvalError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", "5 +", "(1 + 2", "1 2", "sqrt(4,)", "*3"] {
            assert!(
                matches!(parse(input), Err(EvalError::Syntax { .. })),
                "{input:?} should be a syntax error"
            );
        }
    }

    #[test]
    fn test_nesting_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 50), ")".repeat(MAX_DEPTH + 50));
        assert_eq!(
            parse(&deep),
            Err(EvalError::syntax("expression", "nesting too deep"))
        );

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse(&signs),
            Err(EvalError::syntax("expression", "nesting too deep"))
        );

        let calls = format!("{}1{}", "sqrt(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(matches!(parse(&calls), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_moderate_nesting_still_parses() {
        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&nested), Ok(Expr::Number(1.0)));
    }

    #[test]
    fn test_token_count_is_bounded() {
        let chain = format!("{}1", "1+".repeat(MAX_TOKENS));
        assert_eq!(
            parse(&chain),
            Err(EvalError::syntax("expression", "too many tokens"))
        );

        let within = format!("{}1", "1+".repeat(400));
        assert!(parse(&within).is_ok());
    }
}
