//! Layout engine: converts a [`crate::score::Score`] into a deterministic
//! hierarchical spatial model expressed in points. Systems are the primary
//! breaking boundary; every glyph, stem and barline is given an absolute
//! position so a renderer never has to reason about music notation itself.
//!
//! Submodules each own one stage of the pipeline: [`spacing`] and
//! [`breaking`] handle the horizontal axis, [`vertical`] and [`orchestral`]
//! the vertical/cross-staff axis, [`positioner`] and [`metrics`] turn score
//! elements into glyphs, [`collision`] resolves overlaps the other stages
//! leave behind, and [`engine`] wires all of it into the single
//! [`layout`] entry point.

pub mod breaking;
pub mod collision;
pub mod engine;
pub mod metrics;
pub mod orchestral;
pub mod positioner;
pub mod spacing;
pub mod types;
pub mod vertical;

pub use engine::{layout, LayoutConfig, LayoutContext};
pub use types::{
    AdvisoryKind, BarlineConnection, BeamGroup, Credit, Element, EngravedScore, Glyph, GroupSymbol,
    Grouping, LayoutAdvisory, Measure, Page, Point, Rect, SecondaryBeam, Staff, StemDirection,
    System, SystemBarline,
};
