//! Verifies that running the same score through the layout engine produces
//! byte-identical serialized output every time.

mod common;

use engraver_core::layout::{layout, LayoutContext};
use engraver_core::score::Score;

#[test]
fn layout_is_deterministic_across_repeated_runs() {
    let mut score = Score::new();
    score.add_part(common::single_staff_part("Violin", 6));

    let context = LayoutContext::default();

    let mut serializations = Vec::new();
    for _ in 0..10 {
        let engraved = layout(&score, &context);
        let json = serde_json::to_string(&engraved).expect("engraved score must serialize");
        serializations.push(json);
    }

    let first = &serializations[0];
    for (i, json) in serializations.iter().enumerate() {
        assert_eq!(json, first, "layout output differs on run {i}");
    }
}

#[test]
fn orchestral_layout_is_deterministic_across_repeated_runs() {
    let mut score = Score::new();
    score.add_part(common::grand_staff_piano_part(4));
    score.add_part(common::single_staff_part("Violin I", 4));
    score.add_part(common::single_staff_part("Violin II", 4));

    let context = LayoutContext::default();

    let first = serde_json::to_string(&layout(&score, &context)).unwrap();
    let second = serde_json::to_string(&layout(&score, &context)).unwrap();
    assert_eq!(first, second);
}
