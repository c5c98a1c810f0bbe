//! Contract tests for the individual layout components: the concrete seeded
//! scenarios and universal invariants that do not require a full `Score`.

use engraver_core::layout::breaking::{self, BreakingConfig};
use engraver_core::layout::collision::{self, AccidentalSlot, SpatialHash};
use engraver_core::layout::spacing::{self, Column, MeasureSpacing, SpacingConfig, SpacingElement, SpacingElementKind};
use engraver_core::layout::types::Rect;
use engraver_core::rational::Rational;

#[test]
fn empty_system_break_yields_no_groups() {
    let groups = breaking::greedy_break(&[], 500.0, &BreakingConfig::default());
    assert!(groups.is_empty());
}

#[test]
fn single_fit_greedy_break_keeps_everything_in_one_group() {
    let widths = vec![100.0, 100.0, 100.0];
    let groups = breaking::greedy_break(&widths, 500.0, &BreakingConfig::default());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].start, 0);
    assert_eq!(groups[0].end, 3);
    assert!((groups[0].natural_extent - 300.0).abs() < 1e-9);
}

#[test]
fn justify_stretches_proportionally_with_no_leading_reservation() {
    let spacing = MeasureSpacing {
        columns: vec![
            Column { position: Rational::ZERO, x: 0.0 },
            Column { position: Rational::from_int(1), x: 300.0 },
        ],
        natural_width: 300.0,
        leading_offset: 0.0,
    };
    let result = spacing::justify(&spacing, 450.0, 0.0);
    assert!((result.stretch_ratio - 1.5).abs() < 1e-9);
    assert!((result.adjusted_columns[1].x - 450.0).abs() < 1e-9);
}

#[test]
fn justify_of_natural_width_is_the_identity() {
    let spacing = MeasureSpacing {
        columns: vec![Column { position: Rational::ZERO, x: 0.0 }, Column { position: Rational::from_int(1), x: 120.0 }],
        natural_width: 120.0,
        leading_offset: 0.0,
    };
    let result = spacing::justify(&spacing, 120.0, 0.5);
    assert!((result.stretch_ratio - 1.0).abs() < 1e-9);
    for (original, adjusted) in spacing.columns.iter().zip(result.adjusted_columns.iter()) {
        assert!((original.x - adjusted.x).abs() < 1e-9);
    }
}

#[test]
fn duration_spacing_grows_monotonically_and_sublinearly() {
    let config = SpacingConfig {
        quarter_note_spacing: 30.0,
        spacing_exponent: 0.6,
        minimum_note_spacing: 0.0,
        maximum_note_spacing: 1_000.0,
        clef_width: 0.0,
        key_signature_width: 0.0,
        time_signature_width: 0.0,
        trailing_pad: 0.0,
        right_barline_reservation: 0.0,
    };

    let width_for = |duration: i64| {
        let elements = vec![
            SpacingElement { position: Rational::ZERO, kind: SpacingElementKind::Note },
            SpacingElement { position: Rational::from_int(duration), kind: SpacingElementKind::Note },
        ];
        spacing::compute_measure_spacing(&elements, false, false, false, &config).columns[1].x
    };

    let w1 = width_for(1);
    let w2 = width_for(2);
    let w4 = width_for(4);
    assert!(w1 < w2, "{w1} should be less than {w2}");
    assert!(w2 < w4, "{w2} should be less than {w4}");
}

#[test]
fn accidental_collisions_on_empty_input_is_empty() {
    assert!(collision::resolve_accidental_collisions(&[], 1.2, 0.2).is_empty());
}

#[test]
fn single_accidental_offset_matches_the_spec_formula() {
    let width = 0.8;
    let notehead_width = 1.2;
    let gap = 0.2;
    let slots = vec![AccidentalSlot { bounds: Rect::new(0.0, 0.0, width, 1.0), staff_position: 0 }];
    let offsets = collision::resolve_accidental_collisions(&slots, notehead_width, gap);
    assert_eq!(offsets.len(), 1);
    assert!((offsets[0] - (-(width + notehead_width / 2.0 + gap))).abs() < 1e-9);
}

#[test]
fn two_stacked_accidentals_are_both_negative_and_the_second_is_further_left() {
    let slots = vec![
        AccidentalSlot { bounds: Rect::new(0.0, 0.0, 0.8, 1.0), staff_position: 2 },
        AccidentalSlot { bounds: Rect::new(0.0, 0.9, 0.8, 1.0), staff_position: 0 },
    ];
    let offsets = collision::resolve_accidental_collisions(&slots, 1.2, 0.2);
    assert!(offsets[0] < 0.0);
    assert!(offsets[1] < 0.0);
    assert!(offsets[1].abs() > offsets[0].abs());
}

#[test]
fn spatial_hash_query_finds_nearby_rects_and_excludes_distant_ones() {
    let mut hash = SpatialHash::new(10.0);
    let rects = vec![
        Rect::new(0.0, 0.0, 5.0, 5.0),
        Rect::new(3.0, 3.0, 5.0, 5.0),
        Rect::new(50.0, 50.0, 5.0, 5.0),
    ];
    for (i, r) in rects.iter().enumerate() {
        hash.insert(i, r);
    }
    let found = hash.query(&Rect::new(0.0, 0.0, 5.0, 5.0));
    assert!(found.contains(&0));
    assert!(found.contains(&1));
    assert!(!found.contains(&2));
}
