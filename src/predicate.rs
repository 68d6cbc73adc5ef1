//! Boolean filter expressions over column comparisons.
//!
//! A [`Predicate`] is a plain expression tree so a query-layer adapter can
//! translate it mechanically. It is built fresh for every page request and
//! never mutated afterwards.

use crate::{Record, Value};
use ::std::cmp::Ordering;
use ::std::fmt;
use ::std::ops::Not;

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    #[display(fmt = "<")]
    Lt,
    #[display(fmt = "<=")]
    LtEq,
    #[display(fmt = "=")]
    Eq,
    #[display(fmt = ">")]
    Gt,
    #[display(fmt = ">=")]
    GtEq,
}

impl CompareOp {
    /// Whether `lhs <op> rhs` holds, given `lhs.cmp(rhs)`.
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering.is_lt(),
            Self::LtEq => ordering.is_le(),
            Self::Eq => ordering.is_eq(),
            Self::Gt => ordering.is_gt(),
            Self::GtEq => ordering.is_ge(),
        }
    }

    /// Mirror the comparison: `<` becomes `>`, `<=` becomes `>=`.
    pub fn opposite(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::LtEq => Self::GtEq,
            Self::Eq => Self::Eq,
            Self::Gt => Self::Lt,
            Self::GtEq => Self::LtEq,
        }
    }

    /// Widen a strict comparison to include equality.
    pub fn inclusive(self) -> Self {
        match self {
            Self::Lt => Self::LtEq,
            Self::Gt => Self::GtEq,
            op => op,
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Self::Lt | Self::Gt)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Compare { column: String, op: CompareOp, value: Value },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare { column: column.into(), op, value: value.into() }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn and(self, rhs: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Predicate) -> Self {
        Self::Or(Box::new(self), Box::new(rhs))
    }

    /// Whether `record` passes this filter. Only a definite `true` passes,
    /// so a record lacking a compared column behaves like a SQL `NULL`.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.truth(record) == Some(true)
    }

    /// Three-valued (Kleene) evaluation. `None` is unknown: a comparison on
    /// a missing column, and anything that depends on it.
    pub fn truth<R: Record + ?Sized>(&self, record: &R) -> Option<bool> {
        match self {
            Self::Compare { column, op, value } => record.value(column).map(|actual| op.matches(actual.cmp(value))),
            Self::And(lhs, rhs) => match (lhs.truth(record), rhs.truth(record)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Self::Or(lhs, rhs) => match (lhs.truth(record), rhs.truth(record)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            Self::Not(inner) => inner.truth(record).map(|truth| !truth),
        }
    }

    /// Number of comparison leaves.
    pub fn comparisons(&self) -> usize {
        match self {
            Self::Compare { .. } => 1,
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => lhs.comparisons() + rhs.comparisons(),
            Self::Not(inner) => inner.comparisons(),
        }
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { column, op, value } => write!(f, "{column} {op} {value}"),
            Self::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} OR {rhs})"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Row;

    #[test]
    fn test_compare_op_matches() {
        assert!(CompareOp::Gt.matches(Ordering::Greater));
        assert!(!CompareOp::Gt.matches(Ordering::Equal));
        assert!(CompareOp::GtEq.matches(Ordering::Equal));
        assert!(CompareOp::LtEq.matches(Ordering::Less));
        assert!(!CompareOp::Eq.matches(Ordering::Less));
    }

    #[test]
    fn test_compare_op_transforms() {
        assert_eq!(CompareOp::Gt.opposite(), CompareOp::Lt);
        assert_eq!(CompareOp::LtEq.opposite(), CompareOp::GtEq);
        assert_eq!(CompareOp::Lt.inclusive(), CompareOp::LtEq);
        assert_eq!(CompareOp::GtEq.inclusive(), CompareOp::GtEq);
        assert!(CompareOp::Gt.is_strict());
        assert!(!CompareOp::Eq.is_strict());
    }

    #[test]
    fn test_evaluate() {
        let row = Row::new().with("score", 7).with("id", 3);

        assert!(Predicate::compare("score", CompareOp::Gt, 5).evaluate(&row));
        assert!(!Predicate::compare("score", CompareOp::Lt, 5).evaluate(&row));
        assert!(Predicate::equals("score", 7).and(Predicate::equals("id", 3)).evaluate(&row));
        assert!(Predicate::equals("score", 1).or(Predicate::equals("id", 3)).evaluate(&row));
        assert!((!Predicate::equals("id", 4)).evaluate(&row));
        assert!(!Predicate::equals("missing", 7).evaluate(&row));
    }

    #[test]
    fn test_missing_column_is_unknown() {
        let row = Row::new().with("score", 7);
        let missing = Predicate::equals("rank", 1);

        assert_eq!(missing.truth(&row), None);
        assert_eq!((!missing.clone()).truth(&row), None);
        assert!(!(!missing.clone()).evaluate(&row));
        assert_eq!(missing.clone().and(Predicate::equals("score", 0)).truth(&row), Some(false));
        assert_eq!(missing.clone().and(Predicate::equals("score", 7)).truth(&row), None);
        assert_eq!(missing.clone().or(Predicate::equals("score", 7)).truth(&row), Some(true));
        assert_eq!(missing.or(Predicate::equals("score", 0)).truth(&row), None);
    }

    #[test]
    fn test_display() {
        let predicate = Predicate::compare("created_at", CompareOp::LtEq, "2024-01-01")
            .and(!Predicate::equals("created_at", "2024-01-01").and(Predicate::compare("id", CompareOp::GtEq, 9)));
        assert_eq!(
            predicate.to_string(),
            "(created_at <= '2024-01-01' AND NOT (created_at = '2024-01-01' AND id >= 9))"
        );
        assert_eq!(predicate.comparisons(), 3);
    }
}
