//! Spoken arithmetic → canonical expression.
//!
//! Translation is an ordered cascade of rewrites over the lowercased phrase.
//! Order matters: the targeted multi-word patterns run before the general
//! substitution table, and inside the table longer phrases come before the
//! phrases they contain ("arcsine of" before "sine of", "cube root of" before
//! "cubed").
//!
//! ```text
//! "what is the 4th root of 81"   → "nth_root(81, 4)"
//! "sine of 30 degrees"           → "sin(radians( 30))"
//! "log base 2 of 8"              → "log(8, 2)"
//! "5 plus 3"                     → "5 + 3"
//! ```
//!
//! The output is not validated here; [`crate::parse`] does that.

use std::sync::LazyLock;

use regex::{Captures, Regex};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("translation patterns are valid regular expressions")
}

/// `"5 factorial"` → `factorial(5)`.
static FACTORIAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"([\d.]+) factorial\b"));

/// `"log base 2 of 8"` → `log(8, 2)`.
static LOG_BASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\blog base ([\d.]+) of ([\d.]+)"));

/// `"the 4th root of 81"` → `nth_root(81, 4)`. The ordinal suffix is ignored.
static NTH_ROOT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\b(?:the )?([\d.]+)(?:st|nd|rd|th) root of ([\d.]+)"));

/// A unit suffix closing the innermost open `radians(` call. A `degrees(`
/// call opened by an inverse trigonometric phrase is captured and kept.
static DEGREES_SUFFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s*\bdegrees?\b(\s*\()?"));

/// Words that carry no arithmetic meaning.
static FILLER: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"\b(?:what's|whats|what is|how much is|the result of|result of|calculate|compute|tell me|please|the|of)\b",
    )
});

/// Anything left that a canonical expression cannot contain.
static FOREIGN: LazyLock<Regex> = LazyLock::new(|| pattern(r"[^a-z0-9\s.+\-*/%(),_]"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));

/// Ordered substitution table, most specific phrase first.
static SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Roots and logarithms
        (r"\bcube root of\b", "cbrt("),
        (r"\bsquare root of\b", "sqrt("),
        (r"\bnatural log(?:arithm)? of\b", "ln("),
        (r"\blog(?:arithm)? of\b", "log10("),
        // Inverse trigonometry answers in degrees
        (r"\b(?:arcsine|arc sine|inverse sine|asin) of\b", "degrees(asin("),
        (r"\b(?:arccosine|arc cosine|inverse cosine|acos) of\b", "degrees(acos("),
        (r"\b(?:arctangent|arc tangent|inverse tangent|atan) of\b", "degrees(atan("),
        // Trigonometry takes degrees
        (r"\b(?:sine|sin) of\b", "sin(radians("),
        (r"\b(?:cosine|cos) of\b", "cos(radians("),
        (r"\b(?:tangent|tan) of\b", "tan(radians("),
        (r"\bfactorial of\b", "factorial("),
        // Word operators
        (r"\s*\bto the power of\b\s*", "**"),
        (r"\s*\bsquared\b", "**2"),
        (r"\s*\bcubed\b", "**3"),
        (r"\bmultiplied by\b", "*"),
        (r"\bdivided by\b", "/"),
        (r"\b(?:modulus|modulo)\b", "%"),
        (r"\bplus\b", "+"),
        (r"\bminus\b", "-"),
        (r"\b(?:times|x)\b", "*"),
        // Constants
        (r"π", "pi"),
    ]
    .into_iter()
    .map(|(source, replacement)| (pattern(source), replacement))
    .collect()
});

/// Append the closing parentheses a phrase left open.
///
/// Only the net count is repaired; a `)` that precedes its `(` is not
/// detected.
pub fn balance_parentheses(expression: &str) -> String {
    let opened = expression.matches('(').count();
    let closed = expression.matches(')').count();
    let mut balanced = expression.to_string();
    if opened > closed {
        balanced.push_str(&")".repeat(opened - closed));
    }
    balanced
}

/// Translate a spoken arithmetic phrase into a canonical expression.
///
/// The same input always produces byte-identical output.
///
/// # Example
///
/// ```
/// use jarvis_math::translate;
///
/// assert_eq!(translate("5 plus 3"), "5 + 3");
/// assert_eq!(translate("the 4th root of 81"), "nth_root(81, 4)");
/// ```
pub fn translate(phrase: &str) -> String {
    let mut text = phrase.to_lowercase();

    // Targeted multi-word patterns.
    text = FACTORIAL_SUFFIX
        .replace_all(&text, "factorial($1)")
        .into_owned();
    text = LOG_BASE.replace_all(&text, "log($2, $1)").into_owned();
    text = NTH_ROOT.replace_all(&text, "nth_root($2, $1)").into_owned();

    for (regex, replacement) in SUBSTITUTIONS.iter() {
        text = regex.replace_all(&text, *replacement).into_owned();
    }

    text = DEGREES_SUFFIX
        .replace_all(&text, |caps: &Captures| {
            if caps.get(1).is_some() {
                caps[0].to_string()
            } else {
                ")".to_string()
            }
        })
        .into_owned();

    text = balance_parentheses(&text);

    text = FILLER.replace_all(&text, "").into_owned();
    text = FOREIGN.replace_all(&text, "").into_owned();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::answer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_operators() {
        assert_eq!(translate("5 plus 3"), "5 + 3");
        assert_eq!(translate("10 minus 4"), "10 - 4");
        assert_eq!(translate("6 times 7"), "6 * 7");
        assert_eq!(translate("6 x 7"), "6 * 7");
        assert_eq!(translate("6 multiplied by 7"), "6 * 7");
        assert_eq!(translate("100 divided by 4"), "100 / 4");
        assert_eq!(translate("10 modulo 3"), "10 % 3");
        assert_eq!(translate("2 to the power of 10"), "2**10");
        assert_eq!(translate("5 squared"), "5**2");
        assert_eq!(translate("3 cubed"), "3**3");
    }

    #[test]
    fn test_special_patterns() {
        assert_eq!(translate("log base 2 of 8"), "log(8, 2)");
        assert_eq!(translate("the 4th root of 81"), "nth_root(81, 4)");
        assert_eq!(translate("the 3rd root of 27"), "nth_root(27, 3)");
        assert_eq!(translate("5 factorial"), "factorial(5)");
    }

    #[test]
    fn test_function_phrases() {
        assert_eq!(translate("square root of 16"), "sqrt( 16)");
        assert_eq!(translate("cube root of 27"), "cbrt( 27)");
        assert_eq!(translate("natural log of e"), "ln( e)");
        assert_eq!(translate("log of 1000"), "log10( 1000)");
        assert_eq!(translate("factorial of 6"), "factorial( 6)");
    }

    #[test]
    fn test_trigonometry_in_degrees() {
        assert_eq!(translate("sine of 30 degrees"), "sin(radians( 30))");
        assert_eq!(translate("cosine of 60"), "cos(radians( 60))");
        assert_eq!(translate("inverse sine of 0.5"), "degrees(asin( 0.5))");
        assert_eq!(translate("arctangent of 1"), "degrees(atan( 1))");
    }

    #[test]
    fn test_fillers_are_stripped() {
        assert_eq!(translate("What is 5 plus 3?"), "5 + 3");
        assert_eq!(translate("calculate 12 divided by 4"), "12 / 4");
        assert_eq!(translate("what's the square root of 16"), "sqrt( 16)");
        assert_eq!(translate("how much is 7 times 6"), "7 * 6");
        assert_eq!(translate("tell me the result of 2 plus 2"), "2 + 2");
    }

    #[test]
    fn test_translation_is_deterministic() {
        let phrase = "what is the sine of 45 degrees plus the 4th root of 16";
        let first = translate(phrase);
        for _ in 0..10 {
            assert_eq!(translate(phrase), first);
        }
    }

    #[test]
    fn test_no_unmatched_opening_parentheses() {
        for phrase in [
            "square root of",
            "sine of cosine of 30",
            "((((1",
            "inverse tangent of square root of 3",
            "log of (2 plus (3",
            "factorial of factorial of 3",
        ] {
            let expression = translate(phrase);
            let opened = expression.matches('(').count();
            let closed = expression.matches(')').count();
            assert!(opened <= closed, "{phrase:?} → {expression:?}");
        }
    }

    #[test]
    fn test_balancing_is_idempotent() {
        let once = balance_parentheses("sqrt(sin(radians(3");
        assert_eq!(once, "sqrt(sin(radians(3)))");
        assert_eq!(balance_parentheses(&once), once);
    }

    #[test]
    fn test_spoken_answers() {
        assert_eq!(answer(&translate("5 plus 3")), "The result is 8");
        assert_eq!(answer(&translate("the 4th root of 81")), "The result is 3");
        assert_eq!(answer(&translate("what is the square root of 16")), "The result is 4");
        assert_eq!(answer(&translate("sine of 30 degrees")), "The result is 0.5");
        assert_eq!(answer(&translate("inverse cosine of 0.5")), "The result is 60");
        assert_eq!(answer(&translate("log base 2 of 8")), "The result is 3");
        assert_eq!(
            answer(&translate("10 divided by 0")),
            "Sorry, I can't divide by zero."
        );
    }
}
