use std::fmt;

use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};

use crate::{
    constants::{MAX_EXPONENT, MAX_EXPRESSION_CHARS, MAX_NESTING},
    parsers::parser,
};

/// Largest number of bits a power result may have before it is rejected.
const MAX_POWER_BITS: u64 = 1 << 20;

/// Why an expression could not be reduced to an exact value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Unparseable {
    /// Nothing to evaluate.
    #[error("The expression is empty.")]
    Empty,
    /// The text is not arithmetic this grader understands.
    #[error("Could not parse `{input}` at offset {offset}: expected {expected}")]
    Syntax {
        /// The text that failed to parse.
        input:    String,
        /// Byte offset of the failure.
        offset:   usize,
        /// What the grammar was looking for.
        expected: String,
    },
    /// A divisor reduced to zero.
    #[error("Division by zero.")]
    DivisionByZero,
    /// A power whose result is not a rational number, e.g. `2^(1/2)`.
    #[error("`{0}` does not have an exact rational value.")]
    Irrational(String),
    /// An exponent too large to expand exactly.
    #[error("The exponent in `{0}` is too large to evaluate exactly.")]
    ExponentTooLarge(String),
    /// The text is longer than any worksheet answer; holds its length.
    #[error(
        "The expression is {0} characters long; at most {max} are evaluated.",
        max = MAX_EXPRESSION_CHARS
    )]
    TooLong(usize),
    /// Parentheses or prefix signs nest too deeply; holds the depth reached.
    #[error("The expression nests {0} levels deep; at most {max} are evaluated.", max = MAX_NESTING)]
    TooDeeplyNested(usize),
}

/// Parsed arithmetic, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An exact literal.
    Number(BigRational),
    /// Unary minus.
    Neg(Box<Expr>),
    /// `a + b`
    Add(Box<Expr>, Box<Expr>),
    /// `a - b`
    Sub(Box<Expr>, Box<Expr>),
    /// `a * b`
    Mul(Box<Expr>, Box<Expr>),
    /// `a / b`
    Div(Box<Expr>, Box<Expr>),
    /// `a ^ b`
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Reads a decimal literal such as `12`, `1.25`, `.5` or `3.` exactly.
    pub fn decimal(text: &str) -> Option<Expr> {
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let numer: BigInt = format!("{whole}{fraction}").parse().ok()?;
        let scale = u32::try_from(fraction.len()).ok()?;
        let denom = BigInt::from(10u32).pow(scale);
        Some(Expr::Number(BigRational::new(numer, denom)))
    }

    /// Reduces the tree to a single exact value.
    pub fn reduce(&self) -> Result<SymbolicValue, Unparseable> {
        let value = match self {
            Expr::Number(n) => n.clone(),
            Expr::Neg(e) => -e.reduce()?.0,
            Expr::Add(a, b) => a.reduce()?.0 + b.reduce()?.0,
            Expr::Sub(a, b) => a.reduce()?.0 - b.reduce()?.0,
            Expr::Mul(a, b) => a.reduce()?.0 * b.reduce()?.0,
            Expr::Div(a, b) => {
                let numer = a.reduce()?.0;
                let denom = b.reduce()?.0;
                if denom.is_zero() {
                    return Err(Unparseable::DivisionByZero);
                }
                numer / denom
            }
            Expr::Pow(base, exponent) => {
                let base = base.reduce()?;
                let exponent = exponent.reduce()?;
                return power(&base, &exponent);
            }
        };
        Ok(SymbolicValue(value))
    }
}

/// Raises `base` to `exponent`, staying exact.
///
/// Fractional exponents are allowed when the root is exact, so `8^(2/3)` is
/// `4` but `2^(1/2)` is [`Unparseable::Irrational`].
fn power(base: &SymbolicValue, exponent: &SymbolicValue) -> Result<SymbolicValue, Unparseable> {
    let describe = || format!("{base}^{exponent}");
    let (p, q) = (exponent.0.numer(), exponent.0.denom());

    if base.0.is_zero() {
        return if p.is_negative() {
            Err(Unparseable::DivisionByZero)
        } else if p.is_zero() {
            Ok(SymbolicValue::from(1))
        } else {
            Ok(SymbolicValue::from(0))
        };
    }

    let p_abs = p
        .abs()
        .to_u32()
        .filter(|p| *p <= MAX_EXPONENT)
        .ok_or_else(|| Unparseable::ExponentTooLarge(describe()))?;
    let q = q
        .to_u32()
        .filter(|q| *q <= MAX_EXPONENT)
        .ok_or_else(|| Unparseable::ExponentTooLarge(describe()))?;

    let root = if q == 1 {
        base.0.clone()
    } else {
        if base.0.is_negative() {
            return Err(Unparseable::Irrational(describe()));
        }
        match (exact_root(base.0.numer(), q), exact_root(base.0.denom(), q)) {
            (Some(numer), Some(denom)) => BigRational::new(numer, denom),
            _ => return Err(Unparseable::Irrational(describe())),
        }
    };

    let bits = (root.numer().bits() + root.denom().bits()).saturating_mul(u64::from(p_abs));
    if bits > MAX_POWER_BITS {
        return Err(Unparseable::ExponentTooLarge(describe()));
    }

    let raised = BigRational::new(root.numer().pow(p_abs), root.denom().pow(p_abs));
    if p.is_negative() {
        Ok(SymbolicValue(raised.recip()))
    } else {
        Ok(SymbolicValue(raised))
    }
}

/// The `n`th root of a non-negative integer, if it is a whole number.
fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    let root = value.nth_root(n);
    (root.pow(n) == *value).then_some(root)
}

/// The exact, reduced value of an arithmetic expression.
///
/// Compare values with [`crate::compare::equivalent`] or `==`; both look at
/// the reduced fraction, never at how it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicValue(BigRational);

impl SymbolicValue {
    /// Wraps an exact rational.
    pub fn new(value: BigRational) -> Self {
        Self(value)
    }

    /// The underlying reduced fraction.
    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    /// Whether the value is a whole number.
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }
}

impl From<i64> for SymbolicValue {
    fn from(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for SymbolicValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Deepest parenthesis nesting or longest run of prefix signs in `expression`.
///
/// Both drive recursion in the parser and in [`Expr::reduce`].
fn nesting_depth(expression: &str) -> usize {
    let (mut parens, mut signs, mut deepest) = (0usize, 0usize, 0usize);
    for c in expression.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            _ => {}
        }
        if matches!(c, '+' | '-' | '−') {
            signs += 1;
        } else {
            signs = 0;
        }
        deepest = deepest.max(parens).max(signs);
    }
    deepest
}

/// Parses `expression` and reduces it to an exact value.
///
/// Inputs longer than [`MAX_EXPRESSION_CHARS`] or nested deeper than
/// [`MAX_NESTING`] are rejected before parsing, so evaluation time and stack
/// use stay bounded.
pub fn evaluate(expression: &str) -> Result<SymbolicValue, Unparseable> {
    if expression.trim().is_empty() {
        return Err(Unparseable::Empty);
    }

    let length = expression.chars().count();
    if length > MAX_EXPRESSION_CHARS {
        return Err(Unparseable::TooLong(length));
    }
    let depth = nesting_depth(expression);
    if depth > MAX_NESTING {
        return Err(Unparseable::TooDeeplyNested(depth));
    }

    parser::expression(expression)
        .map_err(|e| Unparseable::Syntax {
            input:    expression.to_string(),
            offset:   e.location.offset,
            expected: e.expected.to_string(),
        })?
        .reduce()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> String {
        evaluate(s)
            .unwrap_or_else(|e| panic!("{s:?} should evaluate: {e}"))
            .to_string()
    }

    #[test]
    fn respects_precedence_and_associativity() {
        assert_eq!(eval("2+3*4"), "14");
        assert_eq!(eval("(2+3)*4"), "20");
        assert_eq!(eval("10-4-3"), "3");
        assert_eq!(eval("24/4/3"), "2");
        assert_eq!(eval("2^3^2"), "512");
        assert_eq!(eval("2**3"), "8");
        assert_eq!(eval("-2^2"), "-4");
        assert_eq!(eval("2^-1"), "1/2");
        assert_eq!(eval("--3"), "3");
        assert_eq!(eval("+7"), "7");
    }

    #[test]
    fn stays_exact() {
        assert_eq!(eval("1/3+1/3+1/3"), "1");
        assert_eq!(eval("0.1+0.2"), "3/10");
        assert_eq!(eval("6/4"), "3/2");
        assert_eq!(eval(".5"), "1/2");
        assert_eq!(eval("5."), "5");
        assert_eq!(eval("-3/4"), "-3/4");
        assert_eq!(eval("2^100"), "1267650600228229401496703205376");
    }

    #[test]
    fn exact_fractional_powers() {
        assert_eq!(eval("4^(1/2)"), "2");
        assert_eq!(eval("8^(2/3)"), "4");
        assert_eq!(eval("(9/4)^0.5"), "3/2");
        assert_eq!(eval("0^0"), "1");
    }

    #[test]
    fn accepts_printed_operator_glyphs() {
        assert_eq!(eval("3×4"), "12");
        assert_eq!(eval("3·4"), "12");
        assert_eq!(eval("12÷4"), "3");
        assert_eq!(eval("7−2"), "5");
        assert_eq!(eval(" 1 + 2 "), "3");
    }

    #[test]
    fn failures_are_data() {
        assert_eq!(evaluate(""), Err(Unparseable::Empty));
        assert_eq!(evaluate("1/0"), Err(Unparseable::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(Unparseable::DivisionByZero));
        assert_eq!(evaluate("0^-1"), Err(Unparseable::DivisionByZero));
        assert!(matches!(evaluate("2^(1/2)"), Err(Unparseable::Irrational(_))));
        assert!(matches!(evaluate("(-8)^(1/3)"), Err(Unparseable::Irrational(_))));
        assert!(matches!(evaluate("2^99999"), Err(Unparseable::ExponentTooLarge(_))));
        assert!(matches!(evaluate("10^4000^2"), Err(Unparseable::ExponentTooLarge(_))));
        for bad in ["xyz", "2+", "(3", "3)", "2**", "4=4", "1..2", "he11o"] {
            assert!(
                matches!(evaluate(bad), Err(Unparseable::Syntax { .. })),
                "{bad:?} should be a syntax error"
            );
        }
    }

    #[test]
    fn zero_base_ignores_exponent_bounds() {
        assert_eq!(eval("0^(1/5000)"), "0");
        assert_eq!(eval("0^99999"), "0");
        assert_eq!(evaluate("0^-99999"), Err(Unparseable::DivisionByZero));
    }

    #[test]
    fn deep_parentheses_parse_in_linear_time() {
        let started = std::time::Instant::now();
        for depth in [20, 40, 60, MAX_NESTING] {
            let nested = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
            assert_eq!(eval(&nested), "1");
            let unbalanced = format!("{}2", "(".repeat(depth));
            assert!(matches!(evaluate(&unbalanced), Err(Unparseable::Syntax { .. })));
        }
        assert_eq!(eval(&format!("{}2{}^2", "(".repeat(60), ")".repeat(60))), "4");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn oversized_input_is_rejected_without_recursing() {
        let long_sum = vec!["1"; 10_000].join("+");
        assert_eq!(evaluate(&long_sum), Err(Unparseable::TooLong(19_999)));

        let signs = format!("{}1", "-".repeat(10_000));
        assert_eq!(evaluate(&signs), Err(Unparseable::TooLong(10_001)));

        let digits = "9".repeat(100_000);
        assert_eq!(evaluate(&digits), Err(Unparseable::TooLong(100_000)));

        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&nested), Err(Unparseable::TooDeeplyNested(100)));

        let signs = format!("{}1", "-".repeat(MAX_NESTING + 1));
        assert_eq!(evaluate(&signs), Err(Unparseable::TooDeeplyNested(MAX_NESTING + 1)));
    }

    #[test]
    fn longest_accepted_inputs_evaluate() {
        let terms = (MAX_EXPRESSION_CHARS + 1) / 2;
        assert_eq!(eval(&vec!["1"; terms].join("+")), terms.to_string());
        let product = BigInt::from(2).pow(u32::try_from(terms).expect("small"));
        assert_eq!(eval(&vec!["2"; terms].join("*")), product.to_string());
        assert_eq!(eval(&format!("{}7", "-".repeat(MAX_NESTING))), "7");
    }

    #[test]
    fn canonical_output_reevaluates_to_itself() {
        for e in ["4/2", "1/3", "-7/21", "0.125", "2^-3", "-(5)", "100*3"] {
            let value = evaluate(e).expect("parseable");
            assert_eq!(evaluate(&value.to_string()), Ok(value), "round trip of {e:?}");
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        let value = evaluate("10/4").expect("parseable");
        assert_eq!(serde_json::to_string(&value).expect("serialize"), "\"5/2\"");
    }
}
