//! Table cell values.
//!
//! Every cell in the conversion tables is one of:
//!
//! - an exact number (`100`)
//! - a bounded number (`<50`, `>150`) produced by floor/ceiling effects
//! - an inclusive range (`10-20`) where several keys map to one value
//!
//! An empty cell is `None` at the use site (`Option<ParsedNumeric>`), never a
//! fourth variant, so "no data" cannot be confused with a real value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of a bounded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// True value is strictly less than the stored value.
    Lt,
    /// True value is strictly greater than the stored value.
    Gt,
}

impl Bound {
    pub fn symbol(self) -> &'static str {
        match self {
            Bound::Lt => "<",
            Bound::Gt => ">",
        }
    }
}

/// One parsed table cell.
///
/// Serialized structurally so the JSON stays compatible with the table
/// generator: `{"value":100}`, `{"bound":"lt","value":50}`, `{"min":10,"max":20}`.
/// Variant order matters for untagged deserialization: the most specific shape
/// has to be tried first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedNumeric {
    Range { min: f64, max: f64 },
    Bounded { bound: Bound, value: f64 },
    Exact { value: f64 },
}

/// Standard scores (subtest or composite).
pub type ParsedScore = ParsedNumeric;
/// Percentile ranks. Exact or bounded in well-formed tables.
pub type ParsedPercentile = ParsedNumeric;
/// Ages in months. Exact or bounded in well-formed tables.
pub type ParsedAgeMonths = ParsedNumeric;

impl ParsedNumeric {
    pub fn exact(value: f64) -> Self {
        ParsedNumeric::Exact { value }
    }

    pub fn lt(value: f64) -> Self {
        ParsedNumeric::Bounded {
            bound: Bound::Lt,
            value,
        }
    }

    pub fn gt(value: f64) -> Self {
        ParsedNumeric::Bounded {
            bound: Bound::Gt,
            value,
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        ParsedNumeric::Range { min, max }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, ParsedNumeric::Exact { .. })
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, ParsedNumeric::Bounded { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ParsedNumeric::Range { .. })
    }

    /// The bound direction, if this is a bounded value.
    pub fn bound(&self) -> Option<Bound> {
        match self {
            ParsedNumeric::Bounded { bound, .. } => Some(*bound),
            _ => None,
        }
    }

    /// A single representative number.
    ///
    /// Ranges report their lower end (conservative estimate).
    pub fn numeric_value(&self) -> f64 {
        match *self {
            ParsedNumeric::Exact { value } | ParsedNumeric::Bounded { value, .. } => value,
            ParsedNumeric::Range { min, .. } => min,
        }
    }

    /// The value, only when it is exact.
    pub fn exact_value(&self) -> Option<f64> {
        match *self {
            ParsedNumeric::Exact { value } => Some(value),
            _ => None,
        }
    }

    /// Shape-dependent containment test used when a cell is matched against a
    /// lookup key (raw score in A1, sum in D1).
    pub fn contains(&self, x: f64) -> bool {
        match *self {
            ParsedNumeric::Range { min, max } => min <= x && x <= max,
            ParsedNumeric::Bounded {
                bound: Bound::Gt,
                value,
            } => x > value,
            ParsedNumeric::Bounded {
                bound: Bound::Lt,
                value,
            } => x < value,
            ParsedNumeric::Exact { value } => x == value,
        }
    }
}

impl fmt::Display for ParsedNumeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParsedNumeric::Exact { value } => write!(f, "{value}"),
            ParsedNumeric::Bounded { bound, value } => write!(f, "{}{value}", bound.symbol()),
            ParsedNumeric::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

impl FromStr for ParsedNumeric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value(s)?.ok_or_else(|| "Empty value.".to_string())
    }
}

/// Render a cell for display. Empty cells render as the empty string.
pub fn format_value(value: Option<&ParsedNumeric>) -> String {
    value.map(ParsedNumeric::to_string).unwrap_or_default()
}

/// Parse the canonical string form of a cell.
///
/// Accepts `"100"`, `"<50"`, `">150"`, `"10-20"` (an en dash is also accepted
/// as the range separator). Blank input is an empty cell.
pub fn parse_value(s: &str) -> Result<Option<ParsedNumeric>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = s.strip_prefix('<') {
        return parse_number(rest).map(|v| Some(ParsedNumeric::lt(v)));
    }
    if let Some(rest) = s.strip_prefix('>') {
        return parse_number(rest).map(|v| Some(ParsedNumeric::gt(v)));
    }

    // Skip the first char so a leading minus sign is not mistaken for a separator.
    let sep = s
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-' || *c == '\u{2013}');
    if let Some((idx, c)) = sep {
        let min = parse_number(&s[..idx])?;
        let max = parse_number(&s[idx + c.len_utf8()..])?;
        if min > max {
            return Err(format!("Invalid range '{s}': min exceeds max."));
        }
        return Ok(Some(ParsedNumeric::range(min, max)));
    }

    parse_number(s).map(|v| Some(ParsedNumeric::exact(v)))
}

fn parse_number(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite number '{s}'."))
    }
}
