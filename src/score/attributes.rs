//! Value objects and attribute/direction content shared by measure elements.

use crate::error::ScoreError;

/// Musical clef types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
    Percussion,
}

/// Key signature represented as sharps (positive) / flats (negative) count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature(i8);

impl KeySignature {
    pub fn new(sharps: i8) -> Result<Self, ScoreError> {
        if !(-7..=7).contains(&sharps) {
            return Err(ScoreError::ValidationError(
                "key signature must be in range -7 (flats) to 7 (sharps)".to_string(),
            ));
        }
        Ok(Self(sharps))
    }

    pub fn sharps(&self) -> i8 {
        self.0
    }
}

/// A notated meter, as printed (not necessarily the true beat count — see
/// `beat_divisor` for compound meters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, ScoreError> {
        if numerator == 0 || denominator == 0 {
            return Err(ScoreError::ValidationError(
                "time signature numerator and denominator must be positive".to_string(),
            ));
        }
        Ok(Self { numerator, denominator })
    }
}

/// The structural attributes a measure may open with. Mirrors the
/// `MeasureElement::Attributes` case: clef/key/time/divisions/staves/transpose
/// are all optional since a measure need not restate any of them.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    pub divisions: Option<u32>,
    pub clef: Option<Clef>,
    pub key_signature: Option<KeySignature>,
    pub time_signature: Option<TimeSignature>,
    pub staves: Option<u8>,
    pub transpose_semitones: Option<i8>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.divisions.is_none()
            && self.clef.is_none()
            && self.key_signature.is_none()
            && self.time_signature.is_none()
            && self.staves.is_none()
            && self.transpose_semitones.is_none()
    }
}

/// A free-text or symbolic direction (tempo marking, dynamic text, rehearsal
/// mark, …). The engine only needs enough to place a label; interpretation of
/// the direction's musical meaning is an external collaborator's concern.
#[derive(Debug, Clone)]
pub struct Direction {
    pub text: String,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// A chord symbol; the engine positions its text but does not interpret its
/// harmonic content.
#[derive(Debug, Clone)]
pub struct Harmony {
    pub text: String,
}

/// Barline style and optional repeat marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barline {
    pub style: BarlineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarlineStyle {
    Regular,
    Double,
    Final,
    RepeatStart,
    RepeatEnd,
}
