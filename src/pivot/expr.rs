//! Measure filter expressions.
//!
//! Grammar (whitespace tolerant): `>N`, `>=N`, `<N`, `<=N`, `=N` / `==N`,
//! `!=N` / `!N`, inclusive range `A..B`, negated range `!A..B`. Anything
//! else, including a range with `A > B`, is not an expression and matches
//! every value.

/// A parsed measure expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureExpr {
    Gt(f64),
    Ge(f64),
    Lt(f64),
    Le(f64),
    Eq(f64),
    Ne(f64),
    Between(f64, f64),
    NotBetween(f64, f64),
}

/// Comparison operators, longest first so `>=` wins over `>`.
const OPERATORS: &[(&str, fn(f64) -> MeasureExpr)] = &[
    (">=", MeasureExpr::Ge),
    ("<=", MeasureExpr::Le),
    ("!=", MeasureExpr::Ne),
    ("==", MeasureExpr::Eq),
    (">", MeasureExpr::Gt),
    ("<", MeasureExpr::Lt),
    ("=", MeasureExpr::Eq),
    ("!", MeasureExpr::Ne),
];

impl MeasureExpr {
    /// Parse `expr`, or `None` when it is not a recognised expression.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();

        if let Some((low, high)) = expr.split_once("..") {
            let low = low.trim_start();
            let (negated, low) = match low.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, low),
            };
            let (low, high) = (parse_number(low)?, parse_number(high)?);
            if low > high {
                return None;
            }
            return Some(if negated {
                Self::NotBetween(low, high)
            } else {
                Self::Between(low, high)
            });
        }

        OPERATORS.iter().find_map(|&(op, make)| {
            let operand = expr.strip_prefix(op)?;
            parse_number(operand).map(make)
        })
    }

    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Self::Gt(n) => value > n,
            Self::Ge(n) => value >= n,
            Self::Lt(n) => value < n,
            Self::Le(n) => value <= n,
            Self::Eq(n) => value == n,
            Self::Ne(n) => value != n,
            Self::Between(low, high) => value >= low && value <= high,
            Self::NotBetween(low, high) => !(value >= low && value <= high),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluate `expr` against a measure value.
///
/// A missing (or NaN) value always passes, and so does an expression that
/// does not parse: a broken filter must never hide data.
pub fn match_expr(value: Option<f64>, expr: &str) -> bool {
    match value.filter(|v| !v.is_nan()) {
        Some(v) => MeasureExpr::parse(expr).map_or(true, |e| e.matches(v)),
        None => true,
    }
}
