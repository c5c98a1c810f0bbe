//! Layout engine: the coordinator that wires spacing, breaking, vertical
//! placement, orchestral grouping, glyph positioning and collision
//! resolution into the crate's one entry point, [`crate::layout::layout`].
//!
//! No direct teacher analog exists as a single module (the host crate
//! inlines this coordination in `layout::compute_layout`); this keeps that
//! shape -- one function walking parts/measures/systems/pages -- but drives
//! it from the typed score model instead of raw JSON.

use crate::layout::breaking::{self, BreakGroup, BreakingConfig};
use crate::layout::collision::{self, AccidentalSlot};
use crate::layout::metrics::GlyphMetricsProvider;
use crate::layout::orchestral::{self, OrchestralConfig, PartStaffRange};
use crate::layout::positioner;
use crate::layout::spacing::{self, Column, MeasureSpacing, SpacingConfig, SpacingElement, SpacingElementKind};
use crate::layout::types::{
    AdvisoryKind, Element, EngravedScore, Grouping, LayoutAdvisory, Measure as EngravedMeasure, Page,
    Rect, Staff as EngravedStaff, System,
};
use crate::layout::vertical::{self, StaffContentExtent, StaffInfo, StaffPlacement, VerticalConfig};
use crate::score::attributes::Clef;
use crate::score::{MeasureElement, Part, Score};
use crate::units::ScalingContext;

/// Every tunable the layout engine needs, grouped the way the component
/// design groups them.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub scaling: ScalingContext,
    pub spacing: SpacingConfig,
    pub breaking: BreakingConfig,
    pub vertical: VerticalConfig,
    pub orchestral: OrchestralConfig,
    /// Usable width for one system, in points.
    pub system_width: f64,
    /// Usable height for one page, in points.
    pub page_height: f64,
    pub page_width: f64,
    pub first_page_top_offset: f64,
    /// The breaking engine's feasible-partition search is exposed here: the
    /// specification leaves greedy-vs-DP as an open, caller-decided choice.
    pub use_dynamic_programming_breaking: bool,
    pub collision_padding: f64,
    pub accidental_notehead_gap: f64,
    pub beam_clearance: f64,
    pub stem_width: f64,
    /// Opaque font identifier, threaded through to the glyph metrics
    /// provider at construction time. The provider decides what, if
    /// anything, to do with it.
    pub font_name: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scaling: ScalingContext::default(),
            spacing: SpacingConfig::default(),
            breaking: BreakingConfig::default(),
            vertical: VerticalConfig::default(),
            orchestral: OrchestralConfig::default(),
            system_width: 1400.0,
            page_height: 2200.0,
            page_width: 1600.0,
            first_page_top_offset: 0.0,
            use_dynamic_programming_breaking: true,
            collision_padding: 2.0,
            accidental_notehead_gap: 2.0,
            beam_clearance: 2.0,
            stem_width: 1.2,
            font_name: "Bravura".to_string(),
        }
    }
}

/// Bundles the layout configuration with the one injected port the engine
/// consumes. Constructed once per caller, reused across `layout()` calls --
/// never a process-wide singleton.
pub struct LayoutContext {
    pub config: LayoutConfig,
    pub metrics: Box<dyn GlyphMetricsProvider>,
}

impl LayoutContext {
    pub fn new(config: LayoutConfig, metrics: Box<dyn GlyphMetricsProvider>) -> Self {
        Self { config, metrics }
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        let config = LayoutConfig::default();
        let metrics = Box::new(crate::layout::metrics::DefaultGlyphMetrics::new(config.font_name.clone()));
        Self::new(config, metrics)
    }
}

struct FlatStaff {
    part_index: usize,
    staff_number: u8,
    starts_new_part: bool,
}

fn flatten_staves(parts: &[Part]) -> Vec<FlatStaff> {
    let mut flat = Vec::new();
    for (part_index, part) in parts.iter().enumerate() {
        for staff_number in 1..=part.staff_count.max(1) {
            flat.push(FlatStaff {
                part_index,
                staff_number,
                starts_new_part: staff_number == 1,
            });
        }
    }
    flat
}

fn staff_flat_index(flat: &[FlatStaff], part_index: usize, staff_number: u8) -> usize {
    flat.iter()
        .position(|s| s.part_index == part_index && s.staff_number == staff_number)
        .unwrap_or(0)
}

/// Gathers every measure's spacing input, one entry per measure index,
/// merging rhythmic positions across every part and staff so all staves in
/// a system share one horizontal grid per measure.
fn collect_measure_spacings(score: &Score, config: &SpacingConfig) -> Vec<(MeasureSpacing, bool, bool, bool)> {
    let measure_count = score.measure_count();
    let mut results = Vec::with_capacity(measure_count);

    for measure_index in 0..measure_count {
        let mut elements = Vec::new();
        let mut has_clef = false;
        let mut has_key = false;
        let mut has_time = false;

        for part in &score.parts {
            let Some(measure) = part.measures.get(measure_index) else { continue };
            if let Some(attrs) = measure.leading_attributes() {
                has_clef |= attrs.clef.is_some();
                has_key |= attrs.key_signature.is_some();
                has_time |= attrs.time_signature.is_some();
            }

            let positions = measure.rhythmic_positions();
            for (element, position) in measure.elements.iter().zip(positions.iter()) {
                let kind = match element {
                    MeasureElement::Note(n) if n.is_chord_tone => SpacingElementKind::ChordTone,
                    MeasureElement::Note(_) => SpacingElementKind::Note,
                    MeasureElement::Rest(_) => SpacingElementKind::Rest,
                    MeasureElement::Attributes(_) => SpacingElementKind::Attribute,
                    _ => continue,
                };
                elements.push(SpacingElement { position: *position, kind });
            }
        }

        let spacing = spacing::compute_measure_spacing(&elements, has_clef, has_key, has_time, config);
        results.push((spacing, has_clef, has_key, has_time));
    }

    results
}

fn advisory_over_wide(measure_number: usize) -> LayoutAdvisory {
    LayoutAdvisory::new(
        AdvisoryKind::OverWideMeasure,
        format!("measure {measure_number} could not be compressed to its target width without violating the compression floor"),
    )
    .with_measure(measure_number)
}

/// Restacks the accidentals carried directly on an `Element::Chord` (several
/// pitches sharing one stem, hence one shared x) against each other, the same
/// way [`restack_run`] stacks accidentals across separate same-x elements.
fn restack_chord_internal_accidentals(elements: &mut [Element], notehead_width_points: f64, gap_points: f64) {
    for element in elements {
        let Element::Chord { notes, accidentals, .. } = element else { continue };
        if accidentals.len() < 2 {
            continue;
        }
        let chord_x = notes.first().map(|g| g.position.x).unwrap_or(0.0);

        let slots: Vec<AccidentalSlot> = accidentals
            .iter()
            .map(|acc| AccidentalSlot {
                bounds: acc.bounding_box,
                staff_position: (-acc.position.y * 1000.0) as i32,
            })
            .collect();
        let local_offsets: Vec<f64> = accidentals.iter().map(|acc| acc.position.x - chord_x).collect();

        let offsets = collision::resolve_accidental_collisions(&slots, notehead_width_points, gap_points);
        for ((acc, &target), &current) in accidentals.iter_mut().zip(offsets.iter()).zip(local_offsets.iter()) {
            let delta = target - current;
            acc.position.x += delta;
            acc.bounding_box.x += delta;
        }
    }
}

/// Restacks any accidentals that collide horizontally within one staff's
/// placed elements (chord members sharing a rhythmic position), using the
/// spatial-stacking policy from [`collision`].
fn restack_chord_accidentals(elements: &mut [Element], notehead_width_points: f64, gap_points: f64) {
    let mut run_start: Option<usize> = None;
    let mut i = 0;
    while i <= elements.len() {
        let current_x = elements.get(i).and_then(|e| match e {
            Element::Note { glyph, .. } => Some(glyph.position.x),
            _ => None,
        });
        let same_as_start = match (run_start, current_x) {
            (Some(start), Some(x)) => match &elements[start] {
                Element::Note { glyph, .. } => (glyph.position.x - x).abs() < 1e-6,
                _ => false,
            },
            _ => false,
        };

        if current_x.is_some() && (run_start.is_none() || same_as_start) {
            if run_start.is_none() {
                run_start = Some(i);
            }
            i += 1;
            continue;
        }

        if let Some(start) = run_start.take() {
            restack_run(elements, start, i, notehead_width_points, gap_points);
        }
        if current_x.is_some() {
            run_start = Some(i);
        }
        i += 1;
    }
}

fn restack_run(elements: &mut [Element], start: usize, end: usize, notehead_width_points: f64, gap_points: f64) {
    let mut slots = Vec::new();
    let mut indices = Vec::new();
    for idx in start..end {
        if let Element::Note { glyph, accidental: Some(acc), .. } = &elements[idx] {
            slots.push(AccidentalSlot {
                bounds: acc.bounding_box,
                staff_position: (-glyph.position.y * 1000.0) as i32,
            });
            indices.push(idx);
        }
    }
    if slots.len() < 2 {
        return;
    }

    let offsets = collision::resolve_accidental_collisions(&slots, notehead_width_points, gap_points);
    for (slot_i, &elem_idx) in indices.iter().enumerate() {
        if let Element::Note { glyph, accidental: Some(acc), .. } = &mut elements[elem_idx] {
            let delta = offsets[slot_i] - (acc.position.x - glyph.position.x);
            acc.position.x += delta;
            acc.bounding_box.x += delta;
        }
    }
}

/// The crate's one entry point: always succeeds, carrying non-fatal
/// problems as advisories on the returned score rather than failing.
pub fn layout(score: &Score, context: &LayoutContext) -> EngravedScore {
    let config = &context.config;
    let metrics = context.metrics.as_ref();

    let mut engraved = EngravedScore::empty(config.scaling);
    if score.parts.is_empty() {
        return engraved;
    }

    let flat_staves = flatten_staves(&score.parts);
    let staff_infos: Vec<StaffInfo> = flat_staves
        .iter()
        .map(|s| StaffInfo {
            part_index: s.part_index,
            staff_number: s.staff_number,
            staff_height: config.scaling.staff_height_points,
            staff_distance_override: None,
            starts_new_part: s.starts_new_part,
        })
        .collect();

    let placed = vertical::place_staves(&staff_infos, 0.0, &config.vertical);
    let extents = vec![StaffContentExtent::default(); placed.len()];
    let staff_placements = vertical::resolve_staff_collisions(placed, &extents, &config.vertical);
    let system_height = staff_placements
        .last()
        .map(|p| p.bottom_y)
        .unwrap_or(config.scaling.staff_height_points)
        + config.vertical.system_distance;

    let part_ranges: Vec<PartStaffRange> = score
        .parts
        .iter()
        .enumerate()
        .map(|(part_index, part)| {
            let start = staff_flat_index(&flat_staves, part_index, 1);
            let end = start + part.staff_count.max(1) as usize;
            PartStaffRange {
                part_index,
                part_name: part.name.clone(),
                part_abbreviation: part.abbreviation.clone(),
                family: part.family_override.unwrap_or_else(|| crate::score::Family::infer(&part.name)),
                staff_start: start,
                staff_end: end,
            }
        })
        .collect();

    let measure_spacings = collect_measure_spacings(score, &config.spacing);
    let widths: Vec<f64> = measure_spacings.iter().map(|(m, ..)| m.natural_width).collect();

    let mut groups = if config.use_dynamic_programming_breaking {
        breaking::dp_break(&widths, config.system_width, &[], &config.breaking)
    } else {
        breaking::greedy_break(&widths, config.system_width, &config.breaking)
    };
    groups = breaking::adjust_first_system(groups, &widths, 0.0, config.system_width);

    let mut current_clef: Vec<Clef> = vec![Clef::Treble; score.parts.len()];
    let mut systems = Vec::new();
    let mut advisories = Vec::new();

    for group in &groups {
        let (system, mut system_advisories) = build_system(
            score,
            group,
            &measure_spacings,
            &staff_placements,
            &part_ranges,
            &flat_staves,
            system_height,
            config,
            metrics,
            &mut current_clef,
            systems.is_empty(),
        );
        advisories.append(&mut system_advisories);
        systems.push(system);
    }

    let system_heights: Vec<f64> = systems.iter().map(|s: &System| s.frame.height).collect();
    let page_groups = breaking::greedy_break(&system_heights, config.page_height, &BreakingConfig::default());

    let mut pages = Vec::with_capacity(page_groups.len());
    for (page_number, page_group) in page_groups.iter().enumerate() {
        let mut y = config.first_page_top_offset;
        let mut page_systems = Vec::new();
        for system in &systems[page_group.start..page_group.end] {
            let mut relocated = system.clone();
            let dy = y - relocated.frame.y;
            translate_system(&mut relocated, dy);
            y = relocated.frame.bottom() + config.vertical.system_distance;
            page_systems.push(relocated);
        }
        pages.push(Page {
            number: page_number + 1,
            frame: Rect::new(0.0, 0.0, config.page_width, config.page_height),
            credits: Vec::new(),
            systems: page_systems,
        });
    }

    engraved.pages = pages;
    engraved.advisories = advisories;
    engraved
}

fn translate_system(system: &mut System, dy: f64) {
    system.frame.y += dy;
    for staff in &mut system.staves {
        staff.frame.y += dy;
        staff.center_line_y += dy;
    }
    for measure in &mut system.measures {
        measure.frame.y += dy;
        for staff_elements in &mut measure.elements_by_staff {
            for element in staff_elements {
                translate_element(element, dy);
            }
        }
        for beam in &mut measure.beam_groups {
            beam.primary_start.y += dy;
            beam.primary_end.y += dy;
        }
    }
    for barline in &mut system.system_barlines {
        barline.top_y += dy;
        barline.bottom_y += dy;
    }
}

fn translate_element(element: &mut Element, dy: f64) {
    match element {
        Element::Note { glyph, stem, accidental, dots } => {
            glyph.position.y += dy;
            glyph.bounding_box.y += dy;
            if let Some(s) = stem {
                s.start.y += dy;
                s.end.y += dy;
            }
            if let Some(a) = accidental {
                a.position.y += dy;
                a.bounding_box.y += dy;
            }
            for d in dots {
                d.position.y += dy;
                d.bounding_box.y += dy;
            }
        }
        Element::Chord { notes, stem, accidentals } => {
            for g in notes.iter_mut().chain(accidentals.iter_mut()) {
                g.position.y += dy;
                g.bounding_box.y += dy;
            }
            if let Some(s) = stem {
                s.start.y += dy;
                s.end.y += dy;
            }
        }
        Element::Rest { glyph } | Element::Clef { glyph } => {
            glyph.position.y += dy;
            glyph.bounding_box.y += dy;
        }
        Element::KeySignature { glyphs } | Element::TimeSignature { glyphs } => {
            for g in glyphs {
                g.position.y += dy;
                g.bounding_box.y += dy;
            }
        }
        Element::Barline { top_y, bottom_y, .. } => {
            *top_y += dy;
            *bottom_y += dy;
        }
        Element::Direction { position, .. } => position.y += dy,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_system(
    score: &Score,
    group: &BreakGroup,
    measure_spacings: &[(MeasureSpacing, bool, bool, bool)],
    staff_placements: &[StaffPlacement],
    part_ranges: &[PartStaffRange],
    flat_staves: &[FlatStaff],
    system_height: f64,
    config: &LayoutConfig,
    metrics: &dyn GlyphMetricsProvider,
    current_clef: &mut [Clef],
    is_first_system_on_page: bool,
) -> (System, Vec<LayoutAdvisory>) {
    let mut advisories = Vec::new();
    let sum_natural: f64 = measure_spacings[group.start..group.end].iter().map(|(m, ..)| m.natural_width).sum();

    let groupings: Vec<Grouping> = orchestral::compute_groupings(part_ranges, staff_placements, is_first_system_on_page, &config.orchestral);
    let left_margin = groupings.iter().map(|g| -g.x).fold(0.0_f64, f64::max);

    let mut measures = Vec::with_capacity(group.end - group.start);
    let mut x_cursor = left_margin;
    let mut boundary_xs = Vec::new();

    for measure_index in group.start..group.end {
        let (natural_spacing, has_clef, has_key, has_time) = &measure_spacings[measure_index];
        let available = config.system_width - left_margin;
        let share = if sum_natural > 0.0 {
            natural_spacing.natural_width / sum_natural * available
        } else {
            available / (group.end - group.start) as f64
        };

        let justification = spacing::justify(natural_spacing, share, config.breaking.minimum_compression_ratio);
        let effective_width = match justification.state {
            crate::layout::spacing::JustificationState::Unchanged if natural_spacing.natural_width > share => {
                advisories.push(advisory_over_wide(measure_index + 1));
                natural_spacing.natural_width
            }
            _ => share.max(natural_spacing.leading_offset),
        };

        let frame = Rect::new(x_cursor, 0.0, effective_width, system_height);
        let elements_by_staff = render_measure(
            score,
            measure_index,
            &justification.adjusted_columns,
            *has_clef,
            *has_key,
            *has_time,
            frame.x,
            staff_placements,
            flat_staves,
            config,
            metrics,
            current_clef,
        );

        let beam_groups = build_measure_beams(score, measure_index, &elements_by_staff, flat_staves, config);

        measures.push(EngravedMeasure {
            number: measure_index + 1,
            frame,
            left_barline_x: frame.x,
            right_barline_x: frame.right(),
            elements_by_staff,
            beam_groups,
        });

        x_cursor = frame.right();
        boundary_xs.push(frame.right());
    }

    let staves: Vec<EngravedStaff> = flat_staves
        .iter()
        .zip(staff_placements.iter())
        .map(|(s, p)| EngravedStaff {
            part_index: s.part_index,
            staff_number: s.staff_number,
            frame: Rect::new(left_margin, p.top_y, config.system_width - left_margin, p.bottom_y - p.top_y),
            center_line_y: p.center_line_y,
            line_count: config.scaling.lines_per_staff,
            staff_height: p.bottom_y - p.top_y,
        })
        .collect();

    let mut system_barlines = Vec::new();
    for &x in &boundary_xs {
        for grouping in &groupings {
            system_barlines.extend(orchestral::barline_segments(grouping, staff_placements, x));
        }
    }

    let system = System {
        frame: Rect::new(0.0, 0.0, config.system_width, system_height),
        staves,
        measures,
        system_barlines,
        groupings,
        measure_range: (group.start, group.end),
    };

    (system, advisories)
}

#[allow(clippy::too_many_arguments)]
fn render_measure(
    score: &Score,
    measure_index: usize,
    columns: &[Column],
    has_clef: bool,
    has_key: bool,
    has_time: bool,
    frame_x: f64,
    staff_placements: &[StaffPlacement],
    flat_staves: &[FlatStaff],
    config: &LayoutConfig,
    metrics: &dyn GlyphMetricsProvider,
    current_clef: &mut [Clef],
) -> Vec<Vec<Element>> {
    let mut by_staff: Vec<Vec<Element>> = vec![Vec::new(); flat_staves.len()];

    for (part_index, part) in score.parts.iter().enumerate() {
        let Some(measure) = part.measures.get(measure_index) else { continue };

        if let Some(attrs) = measure.leading_attributes() {
            if let Some(clef) = attrs.clef {
                current_clef[part_index] = clef;
            }
        }
        let clef = current_clef[part_index];

        let mut leading_x = frame_x;
        if has_clef {
            for staff_number in 1..=part.staff_count.max(1) {
                let idx = staff_flat_index(flat_staves, part_index, staff_number);
                let center_y = staff_placements[idx].center_line_y;
                by_staff[idx].push(positioner::place_clef(clef, leading_x, center_y, &config.scaling, metrics));
            }
            leading_x += config.spacing.clef_width;
        }
        if has_key {
            if let Some(key) = measure.leading_attributes().and_then(|a| a.key_signature) {
                for staff_number in 1..=part.staff_count.max(1) {
                    let idx = staff_flat_index(flat_staves, part_index, staff_number);
                    let center_y = staff_placements[idx].center_line_y;
                    by_staff[idx].push(positioner::place_key_signature(key, clef, leading_x, center_y, &config.scaling, metrics));
                }
            }
            leading_x += config.spacing.key_signature_width;
        }
        if has_time {
            if let Some(time) = measure.leading_attributes().and_then(|a| a.time_signature) {
                for staff_number in 1..=part.staff_count.max(1) {
                    let idx = staff_flat_index(flat_staves, part_index, staff_number);
                    let center_y = staff_placements[idx].center_line_y;
                    by_staff[idx].push(positioner::place_time_signature(time, leading_x, center_y, &config.scaling, metrics));
                }
            }
        }

        // Notes are consolidated into one `Element::Chord` per rhythmic
        // position/voice that carries more than one pitch: a chord-tone note
        // immediately follows its primary note in `measure.elements`
        // (MusicXML-style), sharing staff and voice.
        let positions = measure.rhythmic_positions();
        let mut element_index = 0;
        while element_index < measure.elements.len() {
            let position = positions[element_index];
            let x = frame_x + spacing::interpolate_x(columns, position).unwrap_or(0.0);
            match &measure.elements[element_index] {
                MeasureElement::Note(note) if !note.is_chord_tone => {
                    let mut chord = vec![note];
                    let mut next = element_index + 1;
                    while let Some(MeasureElement::Note(tone)) = measure.elements.get(next) {
                        if tone.is_chord_tone && tone.staff == note.staff && tone.voice == note.voice {
                            chord.push(tone);
                            next += 1;
                        } else {
                            break;
                        }
                    }

                    let idx = staff_flat_index(flat_staves, part_index, note.staff);
                    let center_y = staff_placements[idx].center_line_y;
                    let element = if chord.len() > 1 {
                        positioner::place_chord(&chord, x, center_y, clef, &config.scaling, metrics)
                    } else {
                        positioner::place_note(note, x, center_y, clef, &config.scaling, metrics)
                    };
                    by_staff[idx].push(element);
                    element_index = next;
                }
                MeasureElement::Note(note) => {
                    // A chord tone with no preceding primary note: malformed
                    // input, but still placed rather than dropped.
                    let idx = staff_flat_index(flat_staves, part_index, note.staff);
                    let center_y = staff_placements[idx].center_line_y;
                    by_staff[idx].push(positioner::place_note(note, x, center_y, clef, &config.scaling, metrics));
                    element_index += 1;
                }
                MeasureElement::Rest(rest) => {
                    let idx = staff_flat_index(flat_staves, part_index, rest.staff);
                    let center_y = staff_placements[idx].center_line_y;
                    by_staff[idx].push(positioner::place_rest(rest, x, center_y, &config.scaling, metrics));
                    element_index += 1;
                }
                _ => {
                    element_index += 1;
                }
            }
        }

        for staff_number in 1..=part.staff_count.max(1) {
            let idx = staff_flat_index(flat_staves, part_index, staff_number);
            let width_points = metrics.advance_width("noteheadBlack");
            let notehead_width_points = config.scaling.staff_spaces_to_points(width_points);
            restack_chord_accidentals(&mut by_staff[idx], notehead_width_points, config.accidental_notehead_gap);
            restack_chord_internal_accidentals(&mut by_staff[idx], notehead_width_points, config.accidental_notehead_gap);
        }
    }

    by_staff
}

fn build_measure_beams(
    score: &Score,
    measure_index: usize,
    elements_by_staff: &[Vec<Element>],
    flat_staves: &[FlatStaff],
    config: &LayoutConfig,
) -> Vec<crate::layout::types::BeamGroup> {
    let mut groups = Vec::new();

    for (part_index, part) in score.parts.iter().enumerate() {
        let Some(measure) = part.measures.get(measure_index) else { continue };

        for staff_number in 1..=part.staff_count.max(1) {
            let staff_idx = staff_flat_index(flat_staves, part_index, staff_number);

            // `render_measure` pushes exactly one placed `Element` per
            // primary note (chord tones fold into their primary's
            // `Element::Chord`), in the same staff-filtered order as
            // `measure.elements`. Zip on that shared index space first, then
            // filter to beamed notes -- filtering each side independently
            // before zipping (as before) pairs unrelated notes whenever a
            // staff mixes beamed and unbeamed notes.
            let staff_notes: Vec<&crate::score::note::Note> = measure
                .elements
                .iter()
                .filter_map(|e| match e {
                    MeasureElement::Note(n) if n.staff == staff_number && !n.is_chord_tone => Some(n),
                    _ => None,
                })
                .collect();

            let placed_points: Vec<crate::layout::types::Point> = elements_by_staff[staff_idx]
                .iter()
                .filter_map(|el| match el {
                    Element::Note { glyph, .. } => Some(glyph.position),
                    Element::Chord { notes, .. } => notes.first().map(|g| g.position),
                    _ => None,
                })
                .collect();

            let notes_with_points: Vec<(&crate::score::note::Note, crate::layout::types::Point)> = staff_notes
                .into_iter()
                .zip(placed_points)
                .filter(|(n, _)| !n.beams.is_empty())
                .collect();

            if notes_with_points.is_empty() {
                continue;
            }

            let stem_direction = notes_with_points
                .first()
                .and_then(|(n, _)| match n.stem_direction {
                    crate::score::note::StemDirection::Down => Some(crate::layout::types::StemDirection::Down),
                    _ => Some(crate::layout::types::StemDirection::Up),
                })
                .unwrap_or(crate::layout::types::StemDirection::Up);

            let thickness = config.scaling.staff_spaces_to_points(0.5);
            let level1 = positioner::build_beam_groups(&notes_with_points, 1, stem_direction, thickness);
            groups.extend(level1);
        }
    }

    groups
}
