//! Predicates over label sequences
//!
//! A [`Predicate`] is a pure boolean test over an ordered sequence of labels,
//! typically a walked path or the steps executed so far in a scenario.
//!
//! Two primitives:
//! - [`Predicate::contains`]: the labels occur as one contiguous run
//! - [`Predicate::newer`]: the last occurrence of one label follows the last
//!   occurrence of another
//!
//! and three combinators: [`negate`](Predicate::negate),
//! [`and`](Predicate::and), [`or`](Predicate::or). The `!`, `&` and `|`
//! operators are sugar for the same combinators.
//!
//! # Example
//!
//! ```rust
//! use gentest_core::Predicate;
//!
//! let p = Predicate::contains(["A", "B"]) & Predicate::contains(["C", "D"]);
//! assert!(p.matches(&["A", "B", "C", "D"]));
//! assert!(!p.matches(&["A", "B"]));
//!
//! let n = Predicate::newer("A", "B");
//! assert!(!n.matches(&["A", "Z", "B", "J", "A"]));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// Boolean test over a sequence of labels
///
/// Serialized externally tagged, e.g. `{"contains": ["A", "B"]}` or
/// `{"not": {"newer": {"older": "A", "newer": "B"}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate<L> {
    /// The labels occur as a contiguous run
    Contains(Vec<L>),

    /// `newer` occurs, and `older` is either absent or last seen before the
    /// last `newer`
    Newer {
        /// Label that must not be the most recent of the two
        older: L,
        /// Label that must be present and most recent
        newer: L,
    },

    /// Inner predicate does not match
    Not(Box<Predicate<L>>),

    /// Both predicates match
    And(Box<Predicate<L>>, Box<Predicate<L>>),

    /// At least one predicate matches
    Or(Box<Predicate<L>>, Box<Predicate<L>>),
}

impl<L> Predicate<L> {
    /// Contiguous-run containment
    ///
    /// An empty run is contained in every sequence.
    #[must_use]
    pub fn contains(run: impl IntoIterator<Item = L>) -> Self {
        Self::Contains(run.into_iter().collect())
    }

    /// Recency: `newer` is the more recently established of the two
    #[must_use]
    pub fn newer(older: L, newer: L) -> Self {
        Self::Newer { older, newer }
    }

    /// Logical negation
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Logical conjunction; the two matches need not be adjacent
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Logical disjunction
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Every label mentioned, in order of appearance, repeats included
    #[must_use]
    pub fn labels(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_labels(&mut out);
        out
    }

    fn collect_labels<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            Self::Contains(run) => out.extend(run),
            Self::Newer { older, newer } => {
                out.push(older);
                out.push(newer);
            }
            Self::Not(inner) => inner.collect_labels(out),
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_labels(out);
                right.collect_labels(out);
            }
        }
    }
}

impl<L: PartialEq> Predicate<L> {
    /// Evaluate against `sequence`
    ///
    /// Both operands of `And`/`Or` are always evaluated.
    #[must_use]
    pub fn matches(&self, sequence: &[L]) -> bool {
        match self {
            Self::Contains(run) => contains_run(sequence, run),
            Self::Newer { older, newer } => is_newer(sequence, older, newer),
            Self::Not(inner) => !inner.matches(sequence),
            Self::And(left, right) => {
                let l = left.matches(sequence);
                let r = right.matches(sequence);
                l && r
            }
            Self::Or(left, right) => {
                let l = left.matches(sequence);
                let r = right.matches(sequence);
                l || r
            }
        }
    }

    /// Evaluate every predicate of `all` against `sequence`
    #[must_use]
    pub fn all_match<'a>(all: impl IntoIterator<Item = &'a Self>, sequence: &[L]) -> bool
    where
        L: 'a,
    {
        all.into_iter().all(|p| p.matches(sequence))
    }
}

fn contains_run<L: PartialEq>(sequence: &[L], run: &[L]) -> bool {
    if run.is_empty() {
        return true;
    }
    sequence.windows(run.len()).any(|window| window == run)
}

fn is_newer<L: PartialEq>(sequence: &[L], older: &L, newer: &L) -> bool {
    let Some(last_newer) = sequence.iter().rposition(|l| l == newer) else {
        return false;
    };
    sequence
        .iter()
        .rposition(|l| l == older)
        .map_or(true, |last_older| last_older < last_newer)
}

impl<L> Not for Predicate<L> {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}

impl<L> BitAnd for Predicate<L> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<L> BitOr for Predicate<L> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl<L: fmt::Display> fmt::Display for Predicate<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(run) => {
                f.write_str("contains(")?;
                for (i, label) in run.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{label}")?;
                }
                f.write_str(")")
            }
            Self::Newer { older, newer } => write!(f, "newer({older}, {newer})"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::And(left, right) => write!(f, "({left} & {right})"),
            Self::Or(left, right) => write!(f, "({left} | {right})"),
        }
    }
}
