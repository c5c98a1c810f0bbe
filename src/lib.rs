//! Music-notation engraving engine.
//!
//! Consumes a structured [`score`] and produces an immutable, fully positioned
//! [`layout::types::EngravedScore`]. The engine does no drawing and no I/O;
//! callers feed it a score value tree plus a [`layout::LayoutContext`] and get
//! back absolute geometry for a downstream renderer or exporter to consume.

pub mod error;
pub mod rational;
pub mod score;
pub mod units;

pub mod layout;

pub use error::{InvariantViolation, ScoreError};
pub use layout::{layout, LayoutConfig, LayoutContext};
pub use rational::Rational;
pub use score::Score;
