//! The engraved model: the engine's sole output surface.
//!
//! `EngravedScore` is an immutable tree, fully materialized by one `layout()`
//! call and read-only afterward. Coordinates are in points, top-left origin,
//! local to the immediately enclosing frame -- a child's position never
//! crosses a frame boundary without an explicit translation.

use serde::{Serialize, Serializer};

use crate::units::ScalingContext;

/// Rounds to 6 decimal places on serialization so repeated runs over
/// identical input produce byte-identical JSON, per the determinism
/// requirement in the concurrency & resource model.
fn round_f64<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64((value * 1_000_000.0).round() / 1_000_000.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    #[serde(serialize_with = "round_f64")]
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: top-left corner plus width/height. Used both as
/// a frame (local coordinate origin for children) and as a bounding box
/// (hit-testing/collision extent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    #[serde(serialize_with = "round_f64")]
    pub y: f64,
    #[serde(serialize_with = "round_f64")]
    pub width: f64,
    #[serde(serialize_with = "round_f64")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    pub fn top(&self) -> f64 {
        self.y
    }
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }
}

/// A tagged visual grouping of staves: a brace/bracket/line/square connector
/// plus the barline-connection topology drawn through the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupSymbol {
    Brace,
    Bracket,
    Line,
    Square,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarlineConnection {
    None,
    Connected,
    Mensurstrich,
}

#[derive(Debug, Clone, Serialize)]
pub struct Grouping {
    pub symbol: GroupSymbol,
    pub top_staff_index: usize,
    pub bottom_staff_index: usize,
    #[serde(serialize_with = "round_f64")]
    pub x: f64,
    pub barline_connection: BarlineConnection,
    pub full_name_label: Option<String>,
    pub short_name_label: Option<String>,
}

/// A single vertical barline segment drawn as part of a system's
/// barline-connection topology.
#[derive(Debug, Clone, Serialize)]
pub struct SystemBarline {
    pub x: f64,
    pub top_y: f64,
    pub bottom_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StemDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecondaryBeam {
    pub start: Point,
    pub end: Point,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct BeamGroup {
    pub primary_start: Point,
    pub primary_end: Point,
    #[serde(serialize_with = "round_f64")]
    pub thickness: f64,
    #[serde(serialize_with = "round_f64")]
    pub slope: f64,
    pub stem_direction: StemDirection,
    pub secondary_beams: Vec<SecondaryBeam>,
}

/// One placed glyph or mark, with its absolute bounding box within the
/// measure's local frame.
#[derive(Debug, Clone, Serialize)]
pub struct Glyph {
    pub glyph_name: String,
    pub position: Point,
    pub bounding_box: Rect,
}

#[derive(Debug, Clone, Serialize)]
pub struct StemGeometry {
    pub start: Point,
    pub end: Point,
    pub direction: StemDirection,
}

/// A tagged, exhaustively-matched element placed within a measure.
#[derive(Debug, Clone, Serialize)]
pub enum Element {
    Note {
        glyph: Glyph,
        stem: Option<StemGeometry>,
        accidental: Option<Glyph>,
        dots: Vec<Glyph>,
    },
    Chord {
        notes: Vec<Glyph>,
        stem: Option<StemGeometry>,
        accidentals: Vec<Glyph>,
    },
    Rest {
        glyph: Glyph,
    },
    Clef {
        glyph: Glyph,
    },
    KeySignature {
        glyphs: Vec<Glyph>,
    },
    TimeSignature {
        glyphs: Vec<Glyph>,
    },
    Barline {
        x: f64,
        top_y: f64,
        bottom_y: f64,
    },
    Direction {
        text: String,
        position: Point,
    },
}

impl Element {
    pub fn bounding_box(&self) -> Rect {
        match self {
            Element::Note { glyph, .. } => glyph.bounding_box,
            Element::Chord { notes, .. } => union_rects(notes.iter().map(|g| g.bounding_box)),
            Element::Rest { glyph } => glyph.bounding_box,
            Element::Clef { glyph } => glyph.bounding_box,
            Element::KeySignature { glyphs } | Element::TimeSignature { glyphs } => {
                union_rects(glyphs.iter().map(|g| g.bounding_box))
            }
            Element::Barline { x, top_y, bottom_y } => Rect::new(*x, *top_y, 0.0, bottom_y - top_y),
            Element::Direction { position, .. } => Rect::new(position.x, position.y, 0.0, 0.0),
        }
    }
}

fn union_rects(mut rects: impl Iterator<Item = Rect>) -> Rect {
    let first = rects.next().unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    rects.fold(first, |acc, r| {
        let x = acc.left().min(r.left());
        let y = acc.top().min(r.top());
        let right = acc.right().max(r.right());
        let bottom = acc.bottom().max(r.bottom());
        Rect::new(x, y, right - x, bottom - y)
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Measure {
    pub number: usize,
    pub frame: Rect,
    pub left_barline_x: f64,
    pub right_barline_x: f64,
    /// Indexed by staff number within the part; each entry is that staff's
    /// elements in rhythmic order.
    pub elements_by_staff: Vec<Vec<Element>>,
    pub beam_groups: Vec<BeamGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Staff {
    pub part_index: usize,
    pub staff_number: u8,
    pub frame: Rect,
    pub center_line_y: f64,
    pub line_count: u8,
    pub staff_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvisoryKind {
    OverWideMeasure,
    UnresolvedCollision,
    BreakHintConflict,
}

/// A non-fatal annotation attached to an engraved element. Layout advisories
/// are never routed through `Result` -- `layout()` never fails -- they are
/// carried alongside the element they describe so a caller can surface them.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutAdvisory {
    pub kind: AdvisoryKind,
    pub message: String,
    pub measure_number: Option<usize>,
    pub part_index: Option<usize>,
    pub staff_number: Option<u8>,
}

impl LayoutAdvisory {
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            measure_number: None,
            part_index: None,
            staff_number: None,
        }
    }

    pub fn with_measure(mut self, measure_number: usize) -> Self {
        self.measure_number = Some(measure_number);
        self
    }

    pub fn with_part(mut self, part_index: usize) -> Self {
        self.part_index = Some(part_index);
        self
    }

    pub fn with_staff(mut self, staff_number: u8) -> Self {
        self.staff_number = Some(staff_number);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct System {
    pub frame: Rect,
    pub staves: Vec<Staff>,
    pub measures: Vec<Measure>,
    pub system_barlines: Vec<SystemBarline>,
    pub groupings: Vec<Grouping>,
    pub measure_range: (usize, usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct Credit {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub number: usize,
    pub frame: Rect,
    pub credits: Vec<Credit>,
    pub systems: Vec<System>,
}

/// The full, immutable output of one `layout()` call.
#[derive(Debug, Clone, Serialize)]
pub struct EngravedScore {
    pub pages: Vec<Page>,
    pub scaling: ScalingContext,
    pub advisories: Vec<LayoutAdvisory>,
}

impl EngravedScore {
    pub fn empty(scaling: ScalingContext) -> Self {
        Self {
            pages: Vec::new(),
            scaling,
            advisories: Vec::new(),
        }
    }
}

// `ScalingContext` lives in `crate::units` and is not `Serialize` by default;
// the engraved model needs it in its own output, so provide the impl here
// rather than pull a serde dependency into the otherwise-pure units module.
impl Serialize for crate::units::ScalingContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ScalingContext", 4)?;
        s.serialize_field("millimeters_per_staff_space", &self.millimeters_per_staff_space)?;
        s.serialize_field("tenths_per_staff_space", &self.tenths_per_staff_space)?;
        s.serialize_field("staff_height_points", &self.staff_height_points)?;
        s.serialize_field("lines_per_staff", &self.lines_per_staff)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_intersect_when_overlapping() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(3.0, 3.0, 5.0, 5.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn rects_do_not_intersect_when_separate() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(50.0, 50.0, 5.0, 5.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn touching_edges_do_not_count_as_intersecting() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(5.0, 0.0, 5.0, 5.0);
        assert!(!a.intersects(&b));
    }
}
