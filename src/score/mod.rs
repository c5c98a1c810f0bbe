//! The input score value tree: `Score -> [Part] -> [Measure] -> [MeasureElement]`.
//!
//! This is a plain value tree, not an aggregate with identity or mutation
//! guards: the engine consumes it by shared reference and never mutates it.
//! There is no repository, no persistence port and no generated id — every
//! addressable unit (part, staff, measure) is addressed by its position in
//! the tree, matching the engraved model's `partIndex`/`staffNumber`
//! addressing.

pub mod attributes;
pub mod note;

use crate::rational::Rational;
pub use attributes::{Attributes, Barline, BarlineStyle, Clef, Direction, Harmony, KeySignature, Placement, TimeSignature};
pub use note::{
    AccidentalDisplay, BeamLevel, BeamRole, GraceInfo, Lyric, MeasureElement, Note, NoteheadInfo,
    NoteheadShape, Pitch, Rest, StemDirection, Step, TieRole, Tuplet,
};

/// One ordered measure within a part.
#[derive(Debug, Clone, Default)]
pub struct Measure {
    pub elements: Vec<MeasureElement>,
}

impl Measure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: MeasureElement) {
        self.elements.push(element);
    }

    /// The attributes block this measure opens with, if any (the first
    /// `Attributes` element, conventionally emitted before any rhythmic
    /// content).
    pub fn leading_attributes(&self) -> Option<&Attributes> {
        self.elements.iter().find_map(|e| match e {
            MeasureElement::Attributes(a) => Some(a),
            _ => None,
        })
    }

    /// Computes the rhythmic position (in quarter notes, relative to the
    /// measure start) of every duration-bearing element, honoring
    /// `Backup`/`Forward` voice-cursor movement and the chord-tone invariant
    /// that chord tones share the time cursor of the preceding non-chord
    /// note. Returns one entry per element in source order; elements with no
    /// duration (direction, attributes, …) get the cursor position at the
    /// time they were encountered.
    pub fn rhythmic_positions(&self) -> Vec<Rational> {
        let mut cursor = Rational::ZERO;
        let mut positions = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                MeasureElement::Note(n) if n.is_chord_tone => {
                    // Chord tones sit at the cursor position established by
                    // the preceding non-chord note; the cursor itself does
                    // not advance again for them.
                    positions.push(cursor_before_last_advance(&positions, cursor));
                }
                MeasureElement::Backup(d) => {
                    positions.push(cursor);
                    cursor = cursor - *d;
                }
                _ => {
                    positions.push(cursor);
                    if let Some(d) = element.duration_in_quarters() {
                        cursor = cursor + d;
                    }
                }
            }
        }
        positions
    }
}

/// Chord tones record the position their preceding non-chord note was
/// placed at, which is simply the last pushed position (the non-chord note
/// immediately before a run of chord tones advances the cursor after it is
/// pushed, so "the position just pushed" is exactly right for every chord
/// tone that follows it).
fn cursor_before_last_advance(positions: &[Rational], fallback: Rational) -> Rational {
    *positions.last().unwrap_or(&fallback)
}

/// A named instrumental or vocal part, carrying its ordered measures.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub abbreviation: Option<String>,
    pub staff_count: u8,
    /// Overrides family inference (see orchestral layout) when the caller
    /// already knows the part's family; `None` falls back to substring
    /// matching on `name`.
    pub family_override: Option<Family>,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(name: impl Into<String>, staff_count: u8) -> Self {
        Self {
            name: name.into(),
            abbreviation: None,
            staff_count,
            family_override: None,
            measures: Vec::new(),
        }
    }
}

/// Instrument family, used to compute bracket groupings in the orchestral
/// layout component. Precedence when inferring from a name is fixed:
/// voices, keyboards, percussion, woodwinds, brass, strings, other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Voices,
    Keyboards,
    Percussion,
    Woodwinds,
    Brass,
    Strings,
    Other,
}

impl Family {
    /// Substring-match a part name against the family table, in the fixed
    /// precedence order voices > keyboards > percussion > woodwinds > brass >
    /// strings > other. Ambiguous names (e.g. "Bass" matching both a voice
    /// part and a string instrument) resolve to the first match in this
    /// order, exactly as specified — a data-driven lookup table would read
    /// cleaner but is not what is specified.
    pub fn infer(part_name: &str) -> Family {
        let name = part_name.to_lowercase();
        const VOICES: &[&str] = &["soprano", "alto", "tenor", "bass", "choir", "voice", "baritone"];
        const KEYBOARDS: &[&str] = &["piano", "organ", "harpsichord", "celesta", "keyboard"];
        const PERCUSSION: &[&str] = &["drum", "timpani", "cymbal", "percussion", "marimba", "xylophone", "snare"];
        const WOODWINDS: &[&str] = &["flute", "oboe", "clarinet", "bassoon", "piccolo", "english horn", "saxophone"];
        const BRASS: &[&str] = &["trumpet", "horn", "trombone", "tuba", "cornet", "euphonium"];
        const STRINGS: &[&str] = &["violin", "viola", "cello", "contrabass", "harp", "guitar"];

        for table in [
            (VOICES, Family::Voices),
            (KEYBOARDS, Family::Keyboards),
            (PERCUSSION, Family::Percussion),
            (WOODWINDS, Family::Woodwinds),
            (BRASS, Family::Brass),
            (STRINGS, Family::Strings),
        ] {
            if table.0.iter().any(|needle| name.contains(needle)) {
                return table.1;
            }
        }
        Family::Other
    }
}

/// The root of the input value tree.
#[derive(Debug, Clone, Default)]
pub struct Score {
    pub parts: Vec<Part>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Number of measures in the longest part; parts are expected to agree on
    /// measure count but the engine tolerates ragged input by treating
    /// missing measures as empty.
    pub fn measure_count(&self) -> usize {
        self.parts.iter().map(|p| p.measures.len()).max().unwrap_or(0)
    }
}
