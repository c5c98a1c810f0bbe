//! Orchestral layout: staff groups, brace/bracket geometry and cross-staff
//! barline-connection topology.
//!
//! Generalizes the host crate's `BracketType` enum and its binary
//! brace-on-staff-count>1 rule into full family inference (see
//! [`crate::score::Family`]), bracket geometry and barline topology.

use crate::layout::types::{BarlineConnection, GroupSymbol, Grouping, SystemBarline};
use crate::layout::vertical::StaffPlacement;
use crate::score::Family;

#[derive(Debug, Clone)]
pub struct PartStaffRange {
    pub part_index: usize,
    pub part_name: String,
    pub part_abbreviation: Option<String>,
    pub family: Family,
    /// Indices into the system's flat staff list.
    pub staff_start: usize,
    pub staff_end: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct OrchestralConfig {
    pub bracket_offset: f64,
    pub family_bracket_offset: f64,
    pub bracket_thickness: f64,
    pub brace_thickness: f64,
}

impl Default for OrchestralConfig {
    fn default() -> Self {
        Self {
            bracket_offset: -10.0,
            family_bracket_offset: -20.0,
            bracket_thickness: 2.0,
            brace_thickness: 4.0,
        }
    }
}

/// Computes every staff group for one system: one brace group per
/// multi-staff part, plus one square-bracket group per family with two or
/// more member staves, drawn further left than part-level brackets.
pub fn compute_groupings(
    parts: &[PartStaffRange],
    staff_placements: &[StaffPlacement],
    is_first_system_on_page: bool,
    config: &OrchestralConfig,
) -> Vec<Grouping> {
    let mut groupings = Vec::new();

    for part in parts {
        let symbol = if part.staff_end - part.staff_start >= 2 {
            GroupSymbol::Brace
        } else {
            GroupSymbol::None
        };
        let connection = if symbol == GroupSymbol::Brace {
            BarlineConnection::Connected
        } else {
            BarlineConnection::None
        };
        groupings.push(Grouping {
            symbol,
            top_staff_index: part.staff_start,
            bottom_staff_index: part.staff_end - 1,
            x: config.bracket_offset,
            barline_connection: connection,
            full_name_label: label_for(part, is_first_system_on_page, true),
            short_name_label: label_for(part, is_first_system_on_page, false),
        });
    }

    for (family, members) in group_by_family(parts) {
        if members.len() < 2 {
            continue;
        }
        let top = members.iter().map(|p| p.staff_start).min().unwrap();
        let bottom = members.iter().map(|p| p.staff_end - 1).max().unwrap();
        groupings.push(Grouping {
            symbol: GroupSymbol::Bracket,
            top_staff_index: top,
            bottom_staff_index: bottom,
            x: config.family_bracket_offset,
            barline_connection: BarlineConnection::None,
            full_name_label: None,
            short_name_label: None,
        });
        let _ = family;
    }

    let _ = staff_placements;
    groupings
}

fn label_for(part: &PartStaffRange, is_first_system: bool, full: bool) -> Option<String> {
    if full {
        if is_first_system {
            Some(part.part_name.clone())
        } else {
            None
        }
    } else if !is_first_system {
        Some(part.part_abbreviation.clone().unwrap_or_else(|| part.part_name.clone()))
    } else {
        None
    }
}

fn group_by_family(parts: &[PartStaffRange]) -> Vec<(Family, Vec<&PartStaffRange>)> {
    let mut order: Vec<Family> = Vec::new();
    let mut buckets: std::collections::HashMap<Family, Vec<&PartStaffRange>> = std::collections::HashMap::new();
    for part in parts {
        buckets.entry(part.family).or_insert_with(|| {
            order.push(part.family);
            Vec::new()
        });
        buckets.get_mut(&part.family).unwrap().push(part);
    }
    order.into_iter().map(|f| (f, buckets.remove(&f).unwrap())).collect()
}

/// `topY = top of first staff in group; bottomY = bottom of last staff`.
pub fn bracket_geometry(grouping: &Grouping, staff_placements: &[StaffPlacement]) -> (f64, f64) {
    let top = staff_placements[grouping.top_staff_index].top_y;
    let bottom = staff_placements[grouping.bottom_staff_index].bottom_y;
    (top, bottom)
}

/// Emits the vertical barline segments for one grouping's chosen connection.
/// `Connected` yields one line spanning the whole group plus one extra
/// segment per between-staff gap; `Mensurstrich` yields only the
/// between-staff segments and nothing across the staff boxes themselves.
pub fn barline_segments(
    grouping: &Grouping,
    staff_placements: &[StaffPlacement],
    x: f64,
) -> Vec<SystemBarline> {
    match grouping.barline_connection {
        BarlineConnection::None => Vec::new(),
        BarlineConnection::Connected => {
            let (top, bottom) = bracket_geometry(grouping, staff_placements);
            let mut segments = vec![SystemBarline { x, top_y: top, bottom_y: bottom }];
            segments.extend(between_staff_segments(grouping, staff_placements, x));
            segments
        }
        BarlineConnection::Mensurstrich => between_staff_segments(grouping, staff_placements, x),
    }
}

fn between_staff_segments(grouping: &Grouping, staff_placements: &[StaffPlacement], x: f64) -> Vec<SystemBarline> {
    (grouping.top_staff_index..grouping.bottom_staff_index)
        .map(|i| SystemBarline {
            x,
            top_y: staff_placements[i].bottom_y,
            bottom_y: staff_placements[i + 1].top_y,
        })
        .collect()
}
