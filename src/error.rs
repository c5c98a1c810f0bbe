//! Crate-wide error types.
//!
//! The engine distinguishes three error classes (see the component design
//! notes): input violations surface as [`ScoreError`] from score constructors;
//! layout advisories are non-fatal annotations carried on engraved elements
//! (see [`crate::layout::types::LayoutAdvisory`]), never a `Result`; internal
//! invariant violations are bugs, not caller input, and are raised with
//! [`assert_invariant`] rather than returned.

use std::fmt;

/// A precondition failure raised by a score-model constructor.
///
/// Mirrors the host domain's plain `DomainError` convention: a small closed
/// set of cases with a hand-rolled `Display`, no `thiserror` machinery needed
/// for validation this simple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// A duration's numerator or denominator was not representable (e.g.
    /// denominator zero, or an overflow during reduction).
    InvalidDuration(String),
    /// A dot count was negative.
    NegativeDotCount(i8),
    /// A tuplet ratio had a non-positive actual or normal count.
    InvalidTupletRatio { actual: i32, normal: i32 },
    /// A structural field failed basic range validation.
    ValidationError(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(msg) => write!(f, "invalid duration: {msg}"),
            Self::NegativeDotCount(d) => write!(f, "negative dot count: {d}"),
            Self::InvalidTupletRatio { actual, normal } => write!(
                f,
                "invalid tuplet ratio: actual={actual}, normal={normal} (both must be positive)"
            ),
            Self::ValidationError(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Raised when the engine detects a bug, not a caller mistake: an empty
/// column list with positive width, inconsistent staff counts, a broken
/// back-pointer in the breaking DP. These are process-observable assertion
/// failures, not part of the public error-handling contract.
#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("empty column list but natural width is {width}")]
    EmptyColumnsPositiveWidth { width: f64 },
    #[error("inconsistent staff count: part {part_index} expected {expected}, found {found}")]
    InconsistentStaffCount {
        part_index: usize,
        expected: usize,
        found: usize,
    },
    #[error("broken back-pointer in breaking DP at index {index}")]
    BrokenBackPointer { index: usize },
}

/// Panics with a descriptive message. Used at the handful of points the
/// specification calls out as "internal invariant violations" rather than
/// recoverable conditions.
pub fn assert_invariant(violation: InvariantViolation) -> ! {
    panic!("engraver-core internal invariant violation: {violation}");
}
