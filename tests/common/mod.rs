//! Shared score-building helpers for integration tests.

use engraver_core::rational::BaseDuration;
use engraver_core::score::attributes::{Attributes, Clef, KeySignature, TimeSignature};
use engraver_core::score::note::{BeamLevel, BeamRole};
use engraver_core::score::{Measure, MeasureElement, Note, Part, Pitch, Score, Step};

pub fn pitch(step: Step, octave: i8) -> Pitch {
    Pitch { step, alter: 0, octave }
}

pub fn quarter_note(voice: u8, staff: u8, step: Step, octave: i8) -> Note {
    Note::new(BaseDuration::Quarter, 0, voice, staff, pitch(step, octave)).unwrap()
}

pub fn eighth_note(voice: u8, staff: u8, step: Step, octave: i8) -> Note {
    Note::new(BaseDuration::Eighth, 0, voice, staff, pitch(step, octave)).unwrap()
}

/// One 4/4 measure: an unbeamed quarter note, a beamed eighth-note pair, an
/// unbeamed quarter note, then a two-note chord on the last beat. Exercises a
/// staff that mixes beamed and unbeamed notes (beam-to-position alignment)
/// and chord consolidation in the same part.
pub fn mixed_beam_and_chord_part(name: &str) -> Part {
    let mut part = Part::new(name, 1);
    let mut measure = Measure::new();
    measure.push(MeasureElement::Attributes(Attributes {
        divisions: Some(2),
        clef: Some(Clef::Treble),
        key_signature: Some(KeySignature::new(0).unwrap()),
        time_signature: Some(TimeSignature::new(4, 4).unwrap()),
        staves: None,
        transpose_semitones: None,
    }));
    measure.push(MeasureElement::Note(quarter_note(1, 1, Step::C, 4)));
    measure.push(MeasureElement::Note(
        eighth_note(1, 1, Step::D, 4).with_beams(vec![BeamLevel { level: 1, role: BeamRole::Begin }]),
    ));
    measure.push(MeasureElement::Note(
        eighth_note(1, 1, Step::E, 4).with_beams(vec![BeamLevel { level: 1, role: BeamRole::End }]),
    ));
    measure.push(MeasureElement::Note(quarter_note(1, 1, Step::F, 4)));
    measure.push(MeasureElement::Note(quarter_note(1, 1, Step::G, 4)));
    measure.push(MeasureElement::Note(quarter_note(1, 1, Step::B, 4).as_chord_tone()));
    part.measures.push(measure);
    part
}

/// A single part with `measure_count` measures of four quarter notes each,
/// the first measure carrying a clef/key/time attributes block.
pub fn single_staff_part(name: &str, measure_count: usize) -> Part {
    let mut part = Part::new(name, 1);
    for m in 0..measure_count {
        let mut measure = Measure::new();
        if m == 0 {
            measure.push(MeasureElement::Attributes(Attributes {
                divisions: Some(2),
                clef: Some(Clef::Treble),
                key_signature: Some(KeySignature::new(0).unwrap()),
                time_signature: Some(TimeSignature::new(4, 4).unwrap()),
                staves: None,
                transpose_semitones: None,
            }));
        }
        for _ in 0..4 {
            measure.push(MeasureElement::Note(quarter_note(1, 1, Step::C, 4)));
        }
        part.measures.push(measure);
    }
    part
}

pub fn grand_staff_piano_part(measure_count: usize) -> Part {
    let mut part = Part::new("Piano", 2);
    for m in 0..measure_count {
        let mut measure = Measure::new();
        if m == 0 {
            measure.push(MeasureElement::Attributes(Attributes {
                divisions: Some(2),
                clef: Some(Clef::Treble),
                key_signature: Some(KeySignature::new(0).unwrap()),
                time_signature: Some(TimeSignature::new(4, 4).unwrap()),
                staves: Some(2),
                transpose_semitones: None,
            }));
        }
        measure.push(MeasureElement::Note(quarter_note(1, 1, Step::C, 5)));
        measure.push(MeasureElement::Note(quarter_note(1, 1, Step::E, 5)));
        measure.push(MeasureElement::Note(quarter_note(2, 2, Step::C, 3)));
        measure.push(MeasureElement::Note(quarter_note(2, 2, Step::G, 2)));
        part.measures.push(measure);
    }
    part
}

pub fn percussion_drum_score() -> Score {
    let mut part = Part::new("Snare Drum", 1);

    let mut first = Measure::new();
    first.push(MeasureElement::Attributes(Attributes {
        divisions: Some(2),
        clef: Some(Clef::Percussion),
        key_signature: None,
        time_signature: Some(TimeSignature::new(4, 4).unwrap()),
        staves: None,
        transpose_semitones: None,
    }));
    for _ in 0..4 {
        first.push(MeasureElement::Note(quarter_note(1, 1, Step::C, 4)));
    }

    let mut second = Measure::new();
    for _ in 0..4 {
        second.push(MeasureElement::Note(quarter_note(1, 1, Step::C, 4)));
    }

    part.measures.push(first);
    part.measures.push(second);

    let mut score = Score::new();
    score.add_part(part);
    score
}
