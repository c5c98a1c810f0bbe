//! Glyph positioning: maps a score's notes, rests, clefs, key/time
//! signatures and barlines onto absolute [`Element`]s within a measure's
//! local frame, given x-positions already chosen by [`crate::layout::spacing`]
//! and a vertical reference already chosen by [`crate::layout::vertical`].
//!
//! Generalizes the host crate's pitch-to-y mapping (a MIDI-number,
//! clef-string table) into a diatonic, clef-typed version driven by
//! [`crate::score::note::Pitch`] and [`crate::score::attributes::Clef`], and
//! replaces its hardcoded font-size scale factor with [`ScalingContext`].

use crate::layout::metrics::{AnchorKind, GlyphMetricsProvider};
use crate::layout::types::{Element, Glyph, Point, Rect, StemDirection, StemGeometry};
use crate::score::attributes::{Clef, KeySignature, TimeSignature};
use crate::score::note::{AccidentalDisplay, BeamRole, Note, NoteheadShape, Rest};
use crate::rational::BaseDuration;
use crate::units::ScalingContext;

/// Default stem length in staff spaces, measured from the notehead anchor.
const STEM_LENGTH_STAFF_SPACES: f64 = 3.5;

/// Diatonic offset (in half-line steps, i.e. staff positions) of the note
/// that sits on the staff's center line, for each clef. Positive values sit
/// above middle C.
fn clef_center_line_offset(clef: Clef) -> i32 {
    match clef {
        Clef::Treble => 6,    // B4
        Clef::Bass => -6,     // D3
        Clef::Alto => 0,      // C4
        Clef::Tenor => -2,    // A3
        Clef::Percussion => 0,
    }
}

/// Vertical position of a pitch within its staff, in staff spaces relative
/// to the center line (negative = above, positive = below, top-left-origin
/// convention: "above" is a smaller y).
pub fn staff_position_in_spaces(pitch: &crate::score::note::Pitch, clef: Clef) -> f64 {
    let offset = pitch.diatonic_offset_from_middle_c() - clef_center_line_offset(clef);
    -(offset as f64) * 0.5
}

fn notehead_glyph_name(duration: BaseDuration, shape: NoteheadShape) -> &'static str {
    if shape == NoteheadShape::X {
        return "noteheadX";
    }
    if shape == NoteheadShape::Diamond {
        return "noteheadDiamondBlack";
    }
    if shape == NoteheadShape::Slash {
        return "noteheadSlashHorizontalEnds";
    }
    match duration {
        BaseDuration::Whole | BaseDuration::Breve | BaseDuration::Maxima => "noteheadWhole",
        BaseDuration::Half => "noteheadHalf",
        _ => "noteheadBlack",
    }
}

fn accidental_glyph_name(alter: i8) -> Option<&'static str> {
    match alter {
        0 => None,
        1 => Some("accidentalSharp"),
        -1 => Some("accidentalFlat"),
        2 => Some("accidentalDoubleSharp"),
        -2 => Some("accidentalDoubleFlat"),
        _ => Some("accidentalNatural"),
    }
}

fn clef_glyph_name(clef: Clef) -> &'static str {
    match clef {
        Clef::Treble => "gClef",
        Clef::Bass => "fClef",
        Clef::Alto | Clef::Tenor => "cClef",
        Clef::Percussion => "unpitchedPercussionClef1",
    }
}

fn glyph_at(
    glyph_name: &str,
    origin: Point,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> Glyph {
    let bbox = metrics.bounding_box(glyph_name);
    let bounding_box = Rect::new(
        origin.x + scaling.staff_spaces_to_points(bbox.sw.x),
        origin.y - scaling.staff_spaces_to_points(bbox.ne.y),
        scaling.staff_spaces_to_points(bbox.width()),
        scaling.staff_spaces_to_points(bbox.height()),
    );
    Glyph {
        glyph_name: glyph_name.to_string(),
        position: origin,
        bounding_box,
    }
}

/// Chooses the stem direction a voice should use when the note does not
/// specify one explicitly: notes above the center line stem down, at or
/// below stem up -- the conventional default absent an explicit choice.
pub fn default_stem_direction(staff_position_spaces: f64) -> StemDirection {
    if staff_position_spaces < 0.0 {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}

fn stem_geometry(
    notehead_glyph: &str,
    origin: Point,
    points_up: bool,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> StemGeometry {
    let anchor_kind = if points_up { AnchorKind::StemUpSE } else { AnchorKind::StemDownNW };
    let anchor = metrics
        .anchor(notehead_glyph, anchor_kind)
        .unwrap_or(crate::layout::metrics::StaffSpacePoint { x: 0.0, y: 0.0 });
    let start = Point::new(
        origin.x + scaling.staff_spaces_to_points(anchor.x),
        origin.y - scaling.staff_spaces_to_points(anchor.y),
    );
    let length = scaling.staff_spaces_to_points(STEM_LENGTH_STAFF_SPACES);
    let end = if points_up {
        Point::new(start.x, start.y - length)
    } else {
        Point::new(start.x, start.y + length)
    };
    StemGeometry {
        start,
        end,
        direction: if points_up { StemDirection::Up } else { StemDirection::Down },
    }
}

/// Places one note as an [`Element::Note`]. `x` is the note's column
/// x-position (already computed by the spacing engine); `staff_center_y` is
/// the absolute y of the staff's center line within the current frame.
pub fn place_note(
    note: &Note,
    x: f64,
    staff_center_y: f64,
    clef: Clef,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> Element {
    let spaces = staff_position_in_spaces(&note.pitch, clef);
    let y = staff_center_y + scaling.staff_spaces_to_points(spaces);
    let origin = Point::new(x, y);

    let glyph_name = notehead_glyph_name(note.base_duration, note.notehead.shape);
    let glyph = glyph_at(glyph_name, origin, scaling, metrics);

    let stem = match note.stem_direction {
        StemDirection2::Up => Some(stem_geometry(glyph_name, origin, true, scaling, metrics)),
        StemDirection2::Down => Some(stem_geometry(glyph_name, origin, false, scaling, metrics)),
        StemDirection2::None => None,
        StemDirection2::Double => Some(stem_geometry(
            glyph_name,
            origin,
            matches!(default_stem_direction(spaces), StemDirection::Up),
            scaling,
            metrics,
        )),
    };

    let accidental = if note.accidental != AccidentalDisplay::Hidden {
        accidental_glyph_name(note.pitch.alter).map(|name| {
            let acc_bbox = metrics.bounding_box(name);
            let gap = scaling.staff_spaces_to_points(0.2);
            let acc_origin = Point::new(origin.x - scaling.staff_spaces_to_points(acc_bbox.width()) - gap, origin.y);
            glyph_at(name, acc_origin, scaling, metrics)
        })
    } else {
        None
    };

    let dots = (0..note.dots)
        .map(|i| {
            let dot_gap = scaling.staff_spaces_to_points(0.35 + 0.3 * i as f64);
            glyph_at("augmentationDot", Point::new(origin.x + dot_gap, origin.y), scaling, metrics)
        })
        .collect();

    Element::Note { glyph, stem, accidental, dots }
}

/// Places a chord: several notes sharing one rhythmic position and voice,
/// consolidated into one [`Element::Chord`] with one shared stem. `notes[0]`
/// is the chord's primary (non-chord-tone) note, whose stem direction governs
/// the whole chord.
pub fn place_chord(
    notes: &[&Note],
    x: f64,
    staff_center_y: f64,
    clef: Clef,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> Element {
    let origins: Vec<Point> = notes
        .iter()
        .map(|n| {
            let spaces = staff_position_in_spaces(&n.pitch, clef);
            Point::new(x, staff_center_y + scaling.staff_spaces_to_points(spaces))
        })
        .collect();

    let note_glyphs: Vec<Glyph> = notes
        .iter()
        .zip(origins.iter())
        .map(|(n, &origin)| {
            let glyph_name = notehead_glyph_name(n.base_duration, n.notehead.shape);
            glyph_at(glyph_name, origin, scaling, metrics)
        })
        .collect();

    let primary = notes[0];
    let primary_glyph_name = notehead_glyph_name(primary.base_duration, primary.notehead.shape);
    let primary_spaces = staff_position_in_spaces(&primary.pitch, clef);
    let stem = match primary.stem_direction {
        StemDirection2::Up => Some(chord_stem_geometry(primary_glyph_name, &origins, true, scaling, metrics)),
        StemDirection2::Down => Some(chord_stem_geometry(primary_glyph_name, &origins, false, scaling, metrics)),
        StemDirection2::None => None,
        StemDirection2::Double => Some(chord_stem_geometry(
            primary_glyph_name,
            &origins,
            matches!(default_stem_direction(primary_spaces), StemDirection::Up),
            scaling,
            metrics,
        )),
    };

    let accidentals: Vec<Glyph> = notes
        .iter()
        .zip(origins.iter())
        .filter(|(n, _)| n.accidental != AccidentalDisplay::Hidden)
        .filter_map(|(n, &origin)| {
            accidental_glyph_name(n.pitch.alter).map(|name| {
                let acc_bbox = metrics.bounding_box(name);
                let gap = scaling.staff_spaces_to_points(0.2);
                let acc_origin = Point::new(origin.x - scaling.staff_spaces_to_points(acc_bbox.width()) - gap, origin.y);
                glyph_at(name, acc_origin, scaling, metrics)
            })
        })
        .collect();

    Element::Chord { notes: note_glyphs, stem, accidentals }
}

/// A chord's stem anchors on the notehead furthest from the stem's tip (the
/// bottom notehead for a stem pointing up, the top one pointing down) and
/// extends past the opposite extreme by the usual stem length, so the single
/// stem visually touches every notehead in between.
fn chord_stem_geometry(
    notehead_glyph: &str,
    origins: &[Point],
    points_up: bool,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> StemGeometry {
    let anchor_kind = if points_up { AnchorKind::StemUpSE } else { AnchorKind::StemDownNW };
    let anchor_origin = if points_up {
        origins.iter().copied().fold(origins[0], |a, b| if b.y > a.y { b } else { a })
    } else {
        origins.iter().copied().fold(origins[0], |a, b| if b.y < a.y { b } else { a })
    };
    let far_origin = if points_up {
        origins.iter().copied().fold(origins[0], |a, b| if b.y < a.y { b } else { a })
    } else {
        origins.iter().copied().fold(origins[0], |a, b| if b.y > a.y { b } else { a })
    };

    let anchor = metrics
        .anchor(notehead_glyph, anchor_kind)
        .unwrap_or(crate::layout::metrics::StaffSpacePoint { x: 0.0, y: 0.0 });
    let start = Point::new(
        anchor_origin.x + scaling.staff_spaces_to_points(anchor.x),
        anchor_origin.y - scaling.staff_spaces_to_points(anchor.y),
    );
    let length = scaling.staff_spaces_to_points(STEM_LENGTH_STAFF_SPACES);
    let end = if points_up {
        Point::new(start.x, (far_origin.y - length).min(start.y - length))
    } else {
        Point::new(start.x, (far_origin.y + length).max(start.y + length))
    };
    StemGeometry {
        start,
        end,
        direction: if points_up { StemDirection::Up } else { StemDirection::Down },
    }
}

// `score::note::StemDirection` re-exported under a local alias to keep the
// match above legible next to `layout::types::StemDirection` (the engraved,
// two-valued variant).
use crate::score::note::StemDirection as StemDirection2;

/// Places a rest. Full-measure rests are centered on the measure's frame by
/// the caller (the positioner only supplies the glyph).
pub fn place_rest(rest: &Rest, x: f64, staff_center_y: f64, scaling: &ScalingContext, metrics: &dyn GlyphMetricsProvider) -> Element {
    let glyph_name = match rest.base_duration {
        BaseDuration::Whole | BaseDuration::Breve | BaseDuration::Maxima => "restWhole",
        BaseDuration::Half => "restHalf",
        BaseDuration::Quarter => "restQuarter",
        BaseDuration::Eighth => "rest8th",
        BaseDuration::Sixteenth => "rest16th",
        _ => "restQuarter",
    };
    let glyph = glyph_at(glyph_name, Point::new(x, staff_center_y), scaling, metrics);
    Element::Rest { glyph }
}

pub fn place_clef(clef: Clef, x: f64, staff_center_y: f64, scaling: &ScalingContext, metrics: &dyn GlyphMetricsProvider) -> Element {
    let glyph = glyph_at(clef_glyph_name(clef), Point::new(x, staff_center_y), scaling, metrics);
    Element::Clef { glyph }
}

/// Places a key signature as a row of accidental glyphs at fixed line/space
/// positions for the active clef, in the canonical sharp/flat order.
pub fn place_key_signature(
    key: KeySignature,
    clef: Clef,
    x: f64,
    staff_center_y: f64,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> Element {
    const SHARP_ORDER: [(crate::score::note::Step, i8); 7] = [
        (crate::score::note::Step::F, 5),
        (crate::score::note::Step::C, 5),
        (crate::score::note::Step::G, 5),
        (crate::score::note::Step::D, 5),
        (crate::score::note::Step::A, 4),
        (crate::score::note::Step::E, 5),
        (crate::score::note::Step::B, 4),
    ];
    const FLAT_ORDER: [(crate::score::note::Step, i8); 7] = [
        (crate::score::note::Step::B, 4),
        (crate::score::note::Step::E, 5),
        (crate::score::note::Step::A, 4),
        (crate::score::note::Step::D, 5),
        (crate::score::note::Step::G, 4),
        (crate::score::note::Step::C, 5),
        (crate::score::note::Step::F, 4),
    ];

    let sharps = key.sharps();
    let count = sharps.unsigned_abs() as usize;
    let (order, glyph_name) = if sharps > 0 {
        (&SHARP_ORDER[..count.min(7)], "accidentalSharp")
    } else {
        (&FLAT_ORDER[..count.min(7)], "accidentalFlat")
    };

    let advance = scaling.staff_spaces_to_points(0.75);
    let glyphs = order
        .iter()
        .enumerate()
        .map(|(i, &(step, octave))| {
            let pitch = crate::score::note::Pitch { step, alter: 0, octave };
            let spaces = staff_position_in_spaces(&pitch, clef);
            let y = staff_center_y + scaling.staff_spaces_to_points(spaces);
            glyph_at(glyph_name, Point::new(x + i as f64 * advance, y), scaling, metrics)
        })
        .collect();

    Element::KeySignature { glyphs }
}

pub fn place_time_signature(
    time: TimeSignature,
    x: f64,
    staff_center_y: f64,
    scaling: &ScalingContext,
    metrics: &dyn GlyphMetricsProvider,
) -> Element {
    let numeral_half_height = scaling.staff_spaces_to_points(1.0);
    let numerator_name = format!("timeSig{}", time.numerator);
    let denominator_name = format!("timeSig{}", time.denominator);
    let glyphs = vec![
        glyph_at(&numerator_name, Point::new(x, staff_center_y - numeral_half_height), scaling, metrics),
        glyph_at(&denominator_name, Point::new(x, staff_center_y + numeral_half_height), scaling, metrics),
    ];
    Element::TimeSignature { glyphs }
}

pub fn place_barline(x: f64, top_y: f64, bottom_y: f64) -> Element {
    Element::Barline { x, top_y, bottom_y }
}

/// Groups consecutive beamed notes (matching `beams` entries at the given
/// level whose role sequence is `Begin ..= End`) into a [`crate::layout::types::BeamGroup`].
/// `notes` are `(note, placed_origin)` pairs already in rhythmic order within
/// one voice/staff.
pub fn build_beam_groups(
    notes: &[(&Note, Point)],
    level: u8,
    stem_direction: StemDirection,
    thickness_points: f64,
) -> Vec<crate::layout::types::BeamGroup> {
    let mut groups = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, (note, _)) in notes.iter().enumerate() {
        let role = note.beams.iter().find(|b| b.level == level).map(|b| b.role);
        match role {
            Some(BeamRole::Begin) => run_start = Some(i),
            Some(BeamRole::End) => {
                if let Some(start) = run_start.take() {
                    groups.push(beam_group_from_run(notes, start, i, stem_direction, thickness_points));
                }
            }
            _ => {}
        }
    }

    groups
}

fn beam_group_from_run(
    notes: &[(&Note, Point)],
    start: usize,
    end: usize,
    stem_direction: StemDirection,
    thickness_points: f64,
) -> crate::layout::types::BeamGroup {
    let (_, start_point) = notes[start];
    let (_, end_point) = notes[end];
    let slope = if (end_point.x - start_point.x).abs() > f64::EPSILON {
        (end_point.y - start_point.y) / (end_point.x - start_point.x)
    } else {
        0.0
    };
    crate::layout::types::BeamGroup {
        primary_start: start_point,
        primary_end: end_point,
        thickness: thickness_points,
        slope,
        stem_direction,
        secondary_beams: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FixedGlyphMetrics;
    use crate::score::note::{Pitch, Step};

    #[test]
    fn middle_line_pitch_sits_at_zero_offset() {
        assert_eq!(staff_position_in_spaces(&Pitch { step: Step::B, alter: 0, octave: 4 }, Clef::Treble), 0.0);
    }

    #[test]
    fn higher_pitch_moves_upward() {
        let lower = staff_position_in_spaces(&Pitch { step: Step::C, alter: 0, octave: 4 }, Clef::Treble);
        let higher = staff_position_in_spaces(&Pitch { step: Step::C, alter: 0, octave: 5 }, Clef::Treble);
        assert!(higher < lower);
    }

    #[test]
    fn place_note_stays_within_a_reasonable_frame() {
        let scaling = ScalingContext::default();
        let metrics = FixedGlyphMetrics::default();
        let note = Note::new(BaseDuration::Quarter, 0, 1, 1, Pitch { step: Step::C, alter: 0, octave: 4 })
            .unwrap()
            .with_stem_direction(crate::score::note::StemDirection::Up);
        let element = place_note(&note, 50.0, 100.0, Clef::Treble, &scaling, &metrics);
        match element {
            Element::Note { glyph, stem, .. } => {
                assert_eq!(glyph.position.x, 50.0);
                assert!(stem.is_some());
            }
            _ => panic!("expected a Note element"),
        }
    }

    #[test]
    fn clef_glyph_uses_expected_name() {
        let scaling = ScalingContext::default();
        let metrics = FixedGlyphMetrics::default();
        let element = place_clef(Clef::Bass, 10.0, 100.0, &scaling, &metrics);
        match element {
            Element::Clef { glyph } => assert_eq!(glyph.glyph_name, "fClef"),
            _ => panic!("expected a Clef element"),
        }
    }

    #[test]
    fn key_signature_emits_one_glyph_per_accidental() {
        let scaling = ScalingContext::default();
        let metrics = FixedGlyphMetrics::default();
        let element = place_key_signature(KeySignature::new(2).unwrap(), Clef::Treble, 10.0, 100.0, &scaling, &metrics);
        if let Element::KeySignature { glyphs } = element {
            assert_eq!(glyphs.len(), 2);
        } else {
            panic!("expected a KeySignature element");
        }
    }
}
