//! Criterion benchmarks for layout engine performance.
//!
//! Builds scores in-code at a few sizes and measures end-to-end `layout()`
//! time, plus the breaking engine's DP path in isolation since it is the
//! component whose cost scales least predictably with input size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engraver_core::layout::breaking::{self, BreakingConfig};
use engraver_core::layout::{layout, LayoutContext};
use engraver_core::rational::BaseDuration;
use engraver_core::score::attributes::{Attributes, Clef, KeySignature, TimeSignature};
use engraver_core::score::{Measure, MeasureElement, Note, Part, Pitch, Score, Step};

fn piano_score(measure_count: usize) -> Score {
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
        for beat in 0..4 {
            let step = [Step::C, Step::E, Step::G, Step::B][beat % 4];
            let treble = Note::new(BaseDuration::Quarter, 0, 1, 1, Pitch { step, alter: 0, octave: 5 }).unwrap();
            let bass = Note::new(BaseDuration::Quarter, 0, 2, 2, Pitch { step, alter: 0, octave: 3 }).unwrap();
            measure.push(MeasureElement::Note(treble));
            measure.push(MeasureElement::Note(bass));
        }
        part.measures.push(measure);
    }
    let mut score = Score::new();
    score.add_part(part);
    score
}

fn bench_layout_50_measures(c: &mut Criterion) {
    let score = piano_score(50);
    let context = LayoutContext::default();
    c.bench_function("layout_50_measures", |b| {
        b.iter(|| layout(black_box(&score), black_box(&context)));
    });
}

fn bench_layout_200_measures(c: &mut Criterion) {
    let score = piano_score(200);
    let context = LayoutContext::default();
    c.bench_function("layout_200_measures", |b| {
        b.iter(|| layout(black_box(&score), black_box(&context)));
    });
}

fn bench_dp_break_1000_measures(c: &mut Criterion) {
    let widths: Vec<f64> = (0..1_000).map(|i| 80.0 + (i % 7) as f64 * 10.0).collect();
    let config = BreakingConfig::default();
    c.bench_function("dp_break_1000_measures", |b| {
        b.iter(|| breaking::dp_break(black_box(&widths), black_box(1400.0), black_box(&[]), black_box(&config)));
    });
}

criterion_group!(benches, bench_layout_50_measures, bench_layout_200_measures, bench_dp_break_1000_measures);
criterion_main!(benches);
