//! Notes, rests and the tagged `MeasureElement` variant that holds them.

use crate::error::ScoreError;
use crate::rational::{BaseDuration, Rational};
use crate::score::attributes::{Attributes, Barline, Direction, Harmony};

/// Written pitch (distinct from MIDI pitch): diatonic step, alteration in
/// semitones, octave. The engraving engine needs the written spelling, not a
/// MIDI number, to choose a staff position and accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub step: Step,
    pub alter: i8,
    pub octave: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Pitch {
    /// Diatonic staff position relative to middle C, counted in staff steps
    /// (one per line or space). Used by the positioner to map pitch to a
    /// vertical offset without going through MIDI numbers.
    pub fn diatonic_offset_from_middle_c(&self) -> i32 {
        let step_index = match self.step {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        };
        (self.octave as i32 - 4) * 7 + step_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccidentalDisplay {
    /// No accidental glyph should be drawn (implied by key signature / prior
    /// note in the measure).
    Hidden,
    /// Draw the accidental implied by `Pitch::alter`.
    Shown,
    /// Force a courtesy accidental even though it would not otherwise print.
    Courtesy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemDirection {
    Up,
    Down,
    Double,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteheadInfo {
    pub shape: NoteheadShape,
    pub parenthesized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteheadShape {
    Normal,
    Diamond,
    X,
    Slash,
    None,
}

impl Default for NoteheadInfo {
    fn default() -> Self {
        Self {
            shape: NoteheadShape::Normal,
            parenthesized: false,
        }
    }
}

/// Per-beam-level role of a note within a beam group, mirroring the beam
/// state machine used by the host layout engine's beaming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamRole {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}

/// A beam annotation at one level (1 = 8th beam, 2 = 16th beam, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamLevel {
    pub level: u8,
    pub role: BeamRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieRole {
    Start,
    Stop,
    StartAndStop,
}

/// Tuplet ratio: `actual` notes occupy the time of `normal` notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuplet {
    pub actual: i32,
    pub normal: i32,
}

impl Tuplet {
    pub const NONE: Tuplet = Tuplet { actual: 1, normal: 1 };

    pub fn new(actual: i32, normal: i32) -> Result<Self, ScoreError> {
        if actual <= 0 || normal <= 0 {
            return Err(ScoreError::InvalidTupletRatio { actual, normal });
        }
        Ok(Self { actual, normal })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceInfo {
    pub slash: bool,
}

#[derive(Debug, Clone)]
pub struct Lyric {
    pub text: String,
    pub verse: u8,
}

/// A single pitched (or chord-tone) sounding event.
#[derive(Debug, Clone)]
pub struct Note {
    pub base_duration: BaseDuration,
    pub dots: u8,
    pub tuplet: Tuplet,
    pub voice: u8,
    pub staff: u8,
    pub pitch: Pitch,
    pub is_chord_tone: bool,
    pub grace: Option<GraceInfo>,
    pub stem_direction: StemDirection,
    pub notehead: NoteheadInfo,
    pub beams: Vec<BeamLevel>,
    pub tie: Option<TieRole>,
    pub accidental: AccidentalDisplay,
    pub lyrics: Vec<Lyric>,
    pub print_object: bool,
}

impl Note {
    pub fn new(
        base_duration: BaseDuration,
        dots: u8,
        voice: u8,
        staff: u8,
        pitch: Pitch,
    ) -> Result<Self, ScoreError> {
        Ok(Self {
            base_duration,
            dots,
            tuplet: Tuplet::NONE,
            voice,
            staff,
            pitch,
            is_chord_tone: false,
            grace: None,
            stem_direction: StemDirection::None,
            notehead: NoteheadInfo::default(),
            beams: Vec::new(),
            tie: None,
            accidental: AccidentalDisplay::Hidden,
            lyrics: Vec::new(),
            print_object: true,
        })
    }

    pub fn with_tuplet(mut self, tuplet: Tuplet) -> Self {
        self.tuplet = tuplet;
        self
    }

    pub fn with_beams(mut self, beams: Vec<BeamLevel>) -> Self {
        self.beams = beams;
        self
    }

    pub fn with_stem_direction(mut self, direction: StemDirection) -> Self {
        self.stem_direction = direction;
        self
    }

    pub fn as_chord_tone(mut self) -> Self {
        self.is_chord_tone = true;
        self
    }

    /// Exact duration in quarter notes, accounting for dots and tuplet ratio.
    pub fn duration_in_quarters(&self) -> Rational {
        crate::rational::duration_in_quarters(
            self.base_duration,
            self.dots,
            self.tuplet.actual,
            self.tuplet.normal,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Rest {
    pub base_duration: BaseDuration,
    pub dots: u8,
    pub tuplet: Tuplet,
    pub voice: u8,
    pub staff: u8,
    /// A full-measure rest prints as a rectangle centered in the measure
    /// regardless of the nominal base duration.
    pub is_full_measure: bool,
}

impl Rest {
    pub fn new(base_duration: BaseDuration, dots: u8, voice: u8, staff: u8) -> Self {
        Self {
            base_duration,
            dots,
            tuplet: Tuplet::NONE,
            voice,
            staff,
            is_full_measure: false,
        }
    }

    pub fn duration_in_quarters(&self) -> Rational {
        crate::rational::duration_in_quarters(
            self.base_duration,
            self.dots,
            self.tuplet.actual,
            self.tuplet.normal,
        )
    }
}

/// One entry in a measure's ordered element list.
///
/// A closed, exhaustively-matched sum type — never extended via inheritance.
#[derive(Debug, Clone)]
pub enum MeasureElement {
    Note(Note),
    Rest(Rest),
    /// Move the time cursor backward by a duration (polyphonic voice
    /// interleaving within one staff, MusicXML-style).
    Backup(Rational),
    /// Move the time cursor forward without sounding content (explicit gap
    /// marking for a voice/staff).
    Forward {
        duration: Rational,
        voice: u8,
        staff: u8,
    },
    Direction(Direction),
    Attributes(Attributes),
    Harmony(Harmony),
    Barline(Barline),
    /// Whether this element should be rendered at all (print-object="no").
    PrintHint { visible: bool },
    /// Playback hint (tempo in sounding beats-per-minute); carried through
    /// without interpretation — audio is an explicit non-goal.
    SoundHint { tempo_bpm: Option<f64> },
}

impl MeasureElement {
    /// Rhythmic position occupied, for voice/staff-scoped elements that
    /// advance the time cursor. `None` for elements with no duration.
    pub fn duration_in_quarters(&self) -> Option<Rational> {
        match self {
            MeasureElement::Note(n) if !n.is_chord_tone => Some(n.duration_in_quarters()),
            MeasureElement::Note(_) => Some(Rational::ZERO),
            MeasureElement::Rest(r) => Some(r.duration_in_quarters()),
            MeasureElement::Forward { duration, .. } => Some(*duration),
            _ => None,
        }
    }

    pub fn voice(&self) -> Option<u8> {
        match self {
            MeasureElement::Note(n) => Some(n.voice),
            MeasureElement::Rest(r) => Some(r.voice),
            MeasureElement::Forward { voice, .. } => Some(*voice),
            _ => None,
        }
    }

    pub fn staff(&self) -> Option<u8> {
        match self {
            MeasureElement::Note(n) => Some(n.staff),
            MeasureElement::Rest(r) => Some(r.staff),
            MeasureElement::Forward { staff, .. } => Some(*staff),
            _ => None,
        }
    }
}
