//! Glyph metrics provider: the one port the engine consumes.
//!
//! Treated strictly as an injected interface (construction-time dependency),
//! never a process-wide singleton, so tests can substitute a deterministic
//! fake without touching any global state -- the redesign this specification
//! calls for in place of the host crate's `once_cell::sync::Lazy` global font
//! table.

use std::collections::HashMap;

/// A named point on a glyph, in staff spaces relative to the glyph's origin,
/// used to attach stems, articulations and similar child geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    StemUpSE,
    StemDownNW,
    StemUpNW,
    StemDownSW,
    OpticalCenter,
    NoteheadOrigin,
    CutOutNE,
    CutOutNW,
    CutOutSE,
    CutOutSW,
    NumeralTop,
    NumeralBottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffSpacePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBoundingBox {
    /// South-west (bottom-left) corner, staff spaces, relative to origin.
    pub sw: StaffSpacePoint,
    /// North-east (top-right) corner, staff spaces, relative to origin.
    pub ne: StaffSpacePoint,
}

impl GlyphBoundingBox {
    pub fn width(&self) -> f64 {
        self.ne.x - self.sw.x
    }
    pub fn height(&self) -> f64 {
        self.ne.y - self.sw.y
    }
}

/// Read-only interface to glyph geometry, safe to call concurrently from
/// multiple `layout()` invocations since it never mutates state.
pub trait GlyphMetricsProvider: Send + Sync {
    fn bounding_box(&self, glyph_name: &str) -> GlyphBoundingBox;
    fn advance_width(&self, glyph_name: &str) -> f64;
    fn anchor(&self, glyph_name: &str, anchor: AnchorKind) -> Option<StaffSpacePoint>;
}

/// The one-staff-space default rectangle used when a glyph has no known
/// metrics -- the fallback the error-handling design calls for rather than a
/// failure.
const DEFAULT_BBOX: GlyphBoundingBox = GlyphBoundingBox {
    sw: StaffSpacePoint { x: 0.0, y: 0.0 },
    ne: StaffSpacePoint { x: 1.0, y: 1.0 },
};

/// A small embedded table of common SMuFL glyph metrics (noteheads, clefs,
/// flags, accidentals) in staff spaces. This is the crate's one concrete
/// provider: loading real font metadata (e.g. Bravura's metadata JSON) is an
/// external font-loading concern this specification scopes out, so the table
/// here stands in as a reasonable, self-contained default rather than a
/// fabricated asset file.
pub struct DefaultGlyphMetrics {
    font_name: String,
    boxes: HashMap<&'static str, GlyphBoundingBox>,
    anchors: HashMap<(&'static str, AnchorKind), StaffSpacePoint>,
}

impl DefaultGlyphMetrics {
    /// `font_name` is the opaque font identifier from [`crate::layout::engine::LayoutConfig`].
    /// This provider's table is a fixed built-in stand-in rather than a
    /// loaded font, so the name is not used to select the table -- only
    /// carried through for diagnostics, as a real font-backed provider
    /// would use it to pick a metadata file.
    pub fn new(font_name: impl Into<String>) -> Self {
        let font_name = font_name.into();
        let mut boxes = HashMap::new();
        boxes.insert(
            "noteheadBlack",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: -0.6, y: -0.5 },
                ne: StaffSpacePoint { x: 0.6, y: 0.5 },
            },
        );
        boxes.insert(
            "noteheadHalf",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: -0.6, y: -0.5 },
                ne: StaffSpacePoint { x: 0.6, y: 0.5 },
            },
        );
        boxes.insert(
            "noteheadWhole",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: -0.7, y: -0.5 },
                ne: StaffSpacePoint { x: 0.7, y: 0.5 },
            },
        );
        boxes.insert(
            "gClef",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -2.0 },
                ne: StaffSpacePoint { x: 2.6, y: 3.0 },
            },
        );
        boxes.insert(
            "fClef",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -1.0 },
                ne: StaffSpacePoint { x: 2.4, y: 2.0 },
            },
        );
        boxes.insert(
            "accidentalSharp",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -1.0 },
                ne: StaffSpacePoint { x: 0.8, y: 1.0 },
            },
        );
        boxes.insert(
            "accidentalFlat",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -0.8 },
                ne: StaffSpacePoint { x: 0.7, y: 1.2 },
            },
        );
        boxes.insert(
            "flag8thUp",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -2.8 },
                ne: StaffSpacePoint { x: 0.9, y: 0.0 },
            },
        );
        boxes.insert(
            "restQuarter",
            GlyphBoundingBox {
                sw: StaffSpacePoint { x: 0.0, y: -1.5 },
                ne: StaffSpacePoint { x: 0.9, y: 1.5 },
            },
        );

        let mut anchors = HashMap::new();
        anchors.insert(
            ("noteheadBlack", AnchorKind::StemUpSE),
            StaffSpacePoint { x: 0.6, y: -0.1 },
        );
        anchors.insert(
            ("noteheadBlack", AnchorKind::StemDownNW),
            StaffSpacePoint { x: -0.6, y: 0.1 },
        );
        anchors.insert(
            ("noteheadHalf", AnchorKind::StemUpSE),
            StaffSpacePoint { x: 0.6, y: -0.1 },
        );
        anchors.insert(
            ("noteheadHalf", AnchorKind::StemDownNW),
            StaffSpacePoint { x: -0.6, y: 0.1 },
        );

        Self { font_name, boxes, anchors }
    }
}

impl Default for DefaultGlyphMetrics {
    fn default() -> Self {
        Self::new("Bravura")
    }
}

impl GlyphMetricsProvider for DefaultGlyphMetrics {
    fn bounding_box(&self, glyph_name: &str) -> GlyphBoundingBox {
        self.boxes.get(glyph_name).copied().unwrap_or_else(|| {
            log::debug!(
                "no metrics for glyph '{glyph_name}' in font '{}', falling back to one staff space",
                self.font_name
            );
            DEFAULT_BBOX
        })
    }

    fn advance_width(&self, glyph_name: &str) -> f64 {
        self.bounding_box(glyph_name).width()
    }

    fn anchor(&self, glyph_name: &str, anchor: AnchorKind) -> Option<StaffSpacePoint> {
        self.anchors.get(&(glyph_name, anchor)).copied()
    }
}

/// Returns one fixed rectangle/anchor for every glyph, regardless of name --
/// the deterministic fake the design notes require for tests that must not
/// depend on any particular font's metrics.
pub struct FixedGlyphMetrics {
    pub bbox: GlyphBoundingBox,
}

impl Default for FixedGlyphMetrics {
    fn default() -> Self {
        Self { bbox: DEFAULT_BBOX }
    }
}

impl GlyphMetricsProvider for FixedGlyphMetrics {
    fn bounding_box(&self, _glyph_name: &str) -> GlyphBoundingBox {
        self.bbox
    }

    fn advance_width(&self, _glyph_name: &str) -> f64 {
        self.bbox.width()
    }

    fn anchor(&self, _glyph_name: &str, anchor: AnchorKind) -> Option<StaffSpacePoint> {
        match anchor {
            AnchorKind::StemUpSE => Some(StaffSpacePoint { x: self.bbox.ne.x, y: 0.0 }),
            AnchorKind::StemDownNW => Some(StaffSpacePoint { x: self.bbox.sw.x, y: 0.0 }),
            _ => None,
        }
    }
}
