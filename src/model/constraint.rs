//! Linear rows over decisions.
//!
//! Every row has strictly positive integer coefficients, which makes
//! [`LinearConstraint::is_contradiction`] a simple bound check.

use std::fmt;

use super::decision::DecisionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Exact headcount per shift.
    Coverage,
    /// Caller-forced assignment.
    Pin,
    /// Two intersecting shifts for one employee.
    NoOverlap,
    /// Two shifts closer than the minimum rest for one employee.
    Rest,
    /// Worked minutes per employee.
    WeeklyCap,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::Coverage => "coverage",
            ConstraintKind::Pin => "pin",
            ConstraintKind::NoOverlap => "no-overlap",
            ConstraintKind::Rest => "rest",
            ConstraintKind::WeeklyCap => "weekly-cap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Equal,
    AtMost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub decision: DecisionId,
    pub coefficient: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<Term>,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn new(kind: ConstraintKind, terms: Vec<Term>, sense: Sense, rhs: i64) -> Self {
        debug_assert!(
            terms.iter().all(|t| t.coefficient > 0),
            "called `LinearConstraint::new` with a non-positive coefficient"
        );
        Self {
            kind,
            terms,
            sense,
            rhs,
        }
    }

    /// Sum of unit terms `== rhs`.
    pub fn exactly(kind: ConstraintKind, decisions: &[DecisionId], rhs: i64) -> Self {
        let terms = decisions
            .iter()
            .map(|&decision| Term {
                decision,
                coefficient: 1,
            })
            .collect();
        Self::new(kind, terms, Sense::Equal, rhs)
    }

    /// Sum of unit terms `<= rhs`.
    pub fn at_most(kind: ConstraintKind, decisions: &[DecisionId], rhs: i64) -> Self {
        let terms = decisions
            .iter()
            .map(|&decision| Term {
                decision,
                coefficient: 1,
            })
            .collect();
        Self::new(kind, terms, Sense::AtMost, rhs)
    }

    /// Left-hand side under a full assignment.
    pub fn lhs(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|t| values[t.decision.get()])
            .map(|t| t.coefficient)
            .sum()
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Equal => lhs == self.rhs,
            Sense::AtMost => lhs <= self.rhs,
        }
    }

    /// True if no assignment can satisfy this row.
    pub fn is_contradiction(&self) -> bool {
        let max: i64 = self.terms.iter().map(|t| t.coefficient).sum();
        match self.sense {
            Sense::Equal => self.rhs < 0 || max < self.rhs,
            Sense::AtMost => self.rhs < 0,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.kind.as_str())?;
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if t.coefficient == 1 {
                write!(f, "{}", t.decision)?;
            } else {
                write!(f, "{}*{}", t.coefficient, t.decision)?;
            }
        }
        let op = match self.sense {
            Sense::Equal => "==",
            Sense::AtMost => "<=",
        };
        write!(f, " {} {}", op, self.rhs)
    }
}
