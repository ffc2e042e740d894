//! Expression tree for canonical arithmetic.
//!
//! The tree can only name what these enums enumerate: every callable is a
//! [`Function`] variant and every symbolic constant is a [`Constant`] variant.
//! There is no variant that carries an arbitrary identifier, so a parsed
//! expression cannot refer to anything outside the whitelist.

use std::fmt;

/// A parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Constant(Constant),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Unary { op, operand } => write!(f, "{op}{operand}"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Expr::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negate,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
        };
        write!(f, "{symbol}")
    }
}

/// Symbolic constants an expression may reference by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
    Tau,
}

impl Constant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            "tau" => Some(Constant::Tau),
            _ => None,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Tau => std::f64::consts::TAU,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Pi => write!(f, "pi"),
            Constant::E => write!(f, "e"),
            Constant::Tau => write!(f, "tau"),
        }
    }
}

/// How many arguments a [`Function`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    const fn exactly(n: usize) -> Self {
        Arity { min: n, max: n }
    }

    const fn between(min: usize, max: usize) -> Self {
        Arity { min, max }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "exactly {}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

macro_rules! functions {
    ($($variant:ident => $name:literal, $arity:expr;)*) => {
        /// The closed set of callable functions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Function {
            $($variant,)*
        }

        impl Function {
            /// Every whitelisted function, in declaration order.
            pub const ALL: &'static [Function] = &[$(Function::$variant,)*];

            /// Resolve a callable name. Anything not listed here is unresolvable.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Function::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Function::$variant => $name,)*
                }
            }

            pub fn arity(self) -> Arity {
                match self {
                    $(Function::$variant => $arity,)*
                }
            }
        }
    };
}

functions! {
    // Trigonometric
    Sin => "sin", Arity::exactly(1);
    Cos => "cos", Arity::exactly(1);
    Tan => "tan", Arity::exactly(1);
    Asin => "asin", Arity::exactly(1);
    Acos => "acos", Arity::exactly(1);
    Atan => "atan", Arity::exactly(1);
    Atan2 => "atan2", Arity::exactly(2);
    Degrees => "degrees", Arity::exactly(1);
    Radians => "radians", Arity::exactly(1);
    Hypot => "hypot", Arity::exactly(2);
    // Hyperbolic
    Sinh => "sinh", Arity::exactly(1);
    Cosh => "cosh", Arity::exactly(1);
    Tanh => "tanh", Arity::exactly(1);
    Asinh => "asinh", Arity::exactly(1);
    Acosh => "acosh", Arity::exactly(1);
    Atanh => "atanh", Arity::exactly(1);
    // Logarithmic and exponential
    Exp => "exp", Arity::exactly(1);
    Log => "log", Arity::between(1, 2);
    Ln => "ln", Arity::exactly(1);
    Log10 => "log10", Arity::exactly(1);
    Log2 => "log2", Arity::exactly(1);
    // Power and root
    Pow => "pow", Arity::exactly(2);
    Sqrt => "sqrt", Arity::exactly(1);
    Cbrt => "cbrt", Arity::exactly(1);
    NthRoot => "nth_root", Arity::exactly(2);
    Ldexp => "ldexp", Arity::exactly(2);
    // Rounding and remainders
    Ceil => "ceil", Arity::exactly(1);
    Floor => "floor", Arity::exactly(1);
    Trunc => "trunc", Arity::exactly(1);
    Fmod => "fmod", Arity::exactly(2);
    // Special functions
    Factorial => "factorial", Arity::exactly(1);
    Gamma => "gamma", Arity::exactly(1);
    Lgamma => "lgamma", Arity::exactly(1);
    Erf => "erf", Arity::exactly(1);
    Erfc => "erfc", Arity::exactly(1);
    // Numeric builtins
    Abs => "abs", Arity::exactly(1);
    Fabs => "fabs", Arity::exactly(1);
    Round => "round", Arity::between(1, 2);
    Int => "int", Arity::exactly(1);
    Float => "float", Arity::exactly(1);
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(*function));
        }
    }

    #[test]
    fn test_unknown_names_do_not_resolve() {
        for name in ["eval", "exec", "__import__", "open", "system", "sin_", "Sin"] {
            assert_eq!(Function::from_name(name), None, "{name} resolved");
            assert_eq!(Constant::from_name(name), None, "{name} resolved");
        }
    }

    #[test]
    fn test_display_renders_calls() {
        let expr = Expr::Call {
            function: Function::NthRoot,
            args: vec![Expr::Number(81.0), Expr::Number(4.0)],
        };
        assert_eq!(expr.to_string(), "nth_root(81, 4)");
    }
}
