//! Horizontal spacing engine.
//!
//! Given the ordered spacing elements within one measure, computes a column
//! x-position per distinct rhythmic position and the measure's natural
//! width, using a Gourlay/Ross-style power law so spacing grows sub-linearly
//! with duration. Generalizes the host crate's flat
//! `base + duration * factor` note-spacing formula to the column-merging,
//! power-law model this specification requires.

use crate::rational::Rational;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingElementKind {
    Note,
    Rest,
    Attribute,
    Grace,
    ChordTone,
}

/// One element competing for a column, before merging.
#[derive(Debug, Clone, Copy)]
pub struct SpacingElement {
    pub position: Rational,
    pub kind: SpacingElementKind,
}

/// Tunable parameters for the ideal-spacing algorithm, grouped the way the
/// host crate's `SpacingConfig` groups its own tunables.
#[derive(Debug, Clone, Copy)]
pub struct SpacingConfig {
    /// Spacing of a quarter note, in points (typical 30-50).
    pub quarter_note_spacing: f64,
    /// Sub-linear growth exponent in `(0, 1]` (typical 0.6-0.7).
    pub spacing_exponent: f64,
    pub minimum_note_spacing: f64,
    pub maximum_note_spacing: f64,
    pub clef_width: f64,
    pub key_signature_width: f64,
    pub time_signature_width: f64,
    pub trailing_pad: f64,
    pub right_barline_reservation: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            quarter_note_spacing: 40.0,
            spacing_exponent: 0.65,
            minimum_note_spacing: 8.0,
            maximum_note_spacing: 200.0,
            clef_width: 18.0,
            key_signature_width: 8.0,
            time_signature_width: 12.0,
            trailing_pad: 10.0,
            right_barline_reservation: 4.0,
        }
    }
}

/// One distinct rhythmic position within the measure, with its assigned x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub position: Rational,
    pub x: f64,
}

#[derive(Debug, Clone)]
pub struct MeasureSpacing {
    pub columns: Vec<Column>,
    pub natural_width: f64,
    pub leading_offset: f64,
}

/// Leading reservation for start-of-measure attributes, summing only the
/// widths of the attributes actually present.
pub fn leading_offset(has_clef: bool, has_key: bool, has_time: bool, config: &SpacingConfig) -> f64 {
    let mut offset = 0.0;
    if has_clef {
        offset += config.clef_width;
    }
    if has_key {
        offset += config.key_signature_width;
    }
    if has_time {
        offset += config.time_signature_width;
    }
    offset
}

/// Computes columns and natural width for one measure's spacing elements.
///
/// Collapses elements sharing a rhythmic position into one column (chord
/// tones and simultaneous voices merge); spacing between consecutive columns
/// follows `spacing_i = base * duration_gap_i ^ exponent`, clamped to
/// `[minimum, maximum]`; the first column's x equals the leading offset.
pub fn compute_measure_spacing(
    elements: &[SpacingElement],
    has_clef: bool,
    has_key: bool,
    has_time: bool,
    config: &SpacingConfig,
) -> MeasureSpacing {
    let leading = leading_offset(has_clef, has_key, has_time, config);

    if elements.is_empty() {
        return MeasureSpacing {
            columns: Vec::new(),
            natural_width: leading,
            leading_offset: leading,
        };
    }

    // Step 1: collapse by rhythmic position (idempotent merge), preserving
    // first-seen order -- `elements` is already in measure-element order so
    // this is a stable dedup, not a sort.
    let mut distinct_positions: Vec<Rational> = Vec::new();
    for element in elements {
        if distinct_positions.last() != Some(&element.position)
            && !distinct_positions.contains(&element.position)
        {
            distinct_positions.push(element.position);
        }
    }
    distinct_positions.sort();
    distinct_positions.dedup();

    let mut columns = Vec::with_capacity(distinct_positions.len());
    let mut x = leading;
    let mut previous_position: Option<Rational> = None;

    for &position in &distinct_positions {
        if let Some(prev) = previous_position {
            let duration_gap = (position - prev).to_f64().max(0.0);
            let ideal = config.quarter_note_spacing * duration_gap.powf(config.spacing_exponent);
            let clamped = ideal.clamp(config.minimum_note_spacing, config.maximum_note_spacing);
            x += clamped;
        }
        columns.push(Column { position, x });
        previous_position = Some(position);
    }

    let natural_width = x + config.trailing_pad + config.right_barline_reservation;

    MeasureSpacing {
        columns,
        natural_width,
        leading_offset: leading,
    }
}

/// Result of justifying a measure's columns against a target system width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustificationState {
    Stretched,
    Compressed,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct JustificationResult {
    pub adjusted_columns: Vec<Column>,
    pub stretch_ratio: f64,
    pub state: JustificationState,
}

/// Scales the gaps between columns so the measure's total width equals
/// `target`, preserving the leading attribute block unchanged. When
/// compressing, refuses to go below `minimum_compression_ratio` and instead
/// returns the natural widths unchanged.
pub fn justify(
    spacing: &MeasureSpacing,
    target: f64,
    minimum_compression_ratio: f64,
) -> JustificationResult {
    let natural = spacing.natural_width;
    let leading = spacing.leading_offset;

    if spacing.columns.is_empty() || natural <= leading {
        return JustificationResult {
            adjusted_columns: spacing.columns.clone(),
            stretch_ratio: 1.0,
            state: JustificationState::Unchanged,
        };
    }

    let ratio = (target - leading) / (natural - leading);

    if ratio < 1.0 && ratio < minimum_compression_ratio {
        // Compression would violate the floor; leave natural widths as-is.
        return JustificationResult {
            adjusted_columns: spacing.columns.clone(),
            stretch_ratio: 1.0,
            state: JustificationState::Unchanged,
        };
    }

    let adjusted_columns: Vec<Column> = spacing
        .columns
        .iter()
        .map(|c| Column {
            position: c.position,
            x: leading + (c.x - leading) * ratio,
        })
        .collect();

    let state = if ratio > 1.0 {
        JustificationState::Stretched
    } else if ratio < 1.0 {
        JustificationState::Compressed
    } else {
        JustificationState::Unchanged
    };

    JustificationResult {
        adjusted_columns,
        stretch_ratio: ratio,
        state,
    }
}

/// Linearly interpolates the x-position for a rhythmic position that falls
/// between two known columns (or exactly on one).
pub fn interpolate_x(columns: &[Column], position: Rational) -> Option<f64> {
    if columns.is_empty() {
        return None;
    }
    if position <= columns[0].position {
        return Some(columns[0].x);
    }
    if position >= columns[columns.len() - 1].position {
        return Some(columns[columns.len() - 1].x);
    }
    for window in columns.windows(2) {
        let (a, b) = (window[0], window[1]);
        if position >= a.position && position <= b.position {
            let span = (b.position - a.position).to_f64();
            if span == 0.0 {
                return Some(a.x);
            }
            let t = (position - a.position).to_f64() / span;
            return Some(a.x + t * (b.x - a.x));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elt(pos: i64, kind: SpacingElementKind) -> SpacingElement {
        SpacingElement {
            position: Rational::new(pos, 1),
            kind,
        }
    }

    #[test]
    fn empty_input_yields_leading_only_width() {
        let config = SpacingConfig::default();
        let spacing = compute_measure_spacing(&[], false, false, false, &config);
        assert!(spacing.columns.is_empty());
        assert_eq!(spacing.natural_width, 0.0);
    }

    #[test]
    fn duplicate_positions_merge_into_one_column() {
        let config = SpacingConfig::default();
        let elements = vec![
            elt(0, SpacingElementKind::Note),
            elt(0, SpacingElementKind::ChordTone),
            elt(0, SpacingElementKind::ChordTone),
        ];
        let spacing = compute_measure_spacing(&elements, false, false, false, &config);
        assert_eq!(spacing.columns.len(), 1);
    }

    #[test]
    fn first_column_x_equals_leading_offset() {
        let config = SpacingConfig::default();
        let elements = vec![elt(0, SpacingElementKind::Note), elt(1, SpacingElementKind::Note)];
        let spacing = compute_measure_spacing(&elements, true, true, true, &config);
        let leading = leading_offset(true, true, true, &config);
        assert_eq!(spacing.columns[0].x, leading);
        assert_eq!(spacing.leading_offset, leading);
    }

    #[test]
    fn columns_are_monotonically_increasing() {
        let config = SpacingConfig::default();
        let elements = vec![
            elt(0, SpacingElementKind::Note),
            elt(1, SpacingElementKind::Note),
            elt(2, SpacingElementKind::Note),
            elt(3, SpacingElementKind::Note),
        ];
        let spacing = compute_measure_spacing(&elements, false, false, false, &config);
        for window in spacing.columns.windows(2) {
            assert!(window[1].x > window[0].x);
        }
    }

    #[test]
    fn duration_spacing_is_strictly_monotonic_in_gap_size() {
        // width(duration=1) < width(duration=2) < width(duration=4)
        let config = SpacingConfig {
            quarter_note_spacing: 30.0,
            spacing_exponent: 0.6,
            minimum_note_spacing: 0.0,
            maximum_note_spacing: 1000.0,
            ..SpacingConfig::default()
        };
        let gap = |d: f64| config.quarter_note_spacing * d.powf(config.spacing_exponent);
        assert!(gap(1.0) < gap(2.0));
        assert!(gap(2.0) < gap(4.0));
    }

    #[test]
    fn justify_to_natural_width_is_identity() {
        let config = SpacingConfig::default();
        let elements = vec![elt(0, SpacingElementKind::Note), elt(1, SpacingElementKind::Note)];
        let spacing = compute_measure_spacing(&elements, false, false, false, &config);
        let result = justify(&spacing, spacing.natural_width, 0.6);
        for (a, b) in spacing.columns.iter().zip(result.adjusted_columns.iter()) {
            assert!((a.x - b.x).abs() < 1e-9);
        }
    }

    #[test]
    fn proportional_stretch_matches_seeded_scenario() {
        // justify(widths=[100,200], target=450) = [150, 300] (ratio 1.5,
        // no leading reservation).
        let spacing = MeasureSpacing {
            columns: vec![
                Column { position: Rational::ZERO, x: 100.0 },
                Column { position: Rational::from_int(1), x: 300.0 },
            ],
            natural_width: 300.0,
            leading_offset: 0.0,
        };
        let result = justify(&spacing, 450.0, 0.5);
        assert!((result.stretch_ratio - 1.5).abs() < 1e-9);
        assert!((result.adjusted_columns[0].x - 150.0).abs() < 1e-9);
        assert!((result.adjusted_columns[1].x - 450.0).abs() < 1e-9);
        assert_eq!(result.state, JustificationState::Stretched);
    }

    #[test]
    fn compression_below_floor_leaves_natural_widths() {
        let spacing = MeasureSpacing {
            columns: vec![
                Column { position: Rational::ZERO, x: 0.0 },
                Column { position: Rational::from_int(1), x: 300.0 },
            ],
            natural_width: 300.0,
            leading_offset: 0.0,
        };
        // target/natural = 0.1, below a 0.6 floor.
        let result = justify(&spacing, 30.0, 0.6);
        assert_eq!(result.state, JustificationState::Unchanged);
        assert_eq!(result.adjusted_columns[1].x, 300.0);
    }

    #[test]
    fn interpolation_is_linear_between_known_columns() {
        let columns = vec![
            Column { position: Rational::ZERO, x: 0.0 },
            Column { position: Rational::from_int(2), x: 100.0 },
        ];
        let x = interpolate_x(&columns, Rational::from_int(1)).unwrap();
        assert!((x - 50.0).abs() < 1e-9);
    }
}
