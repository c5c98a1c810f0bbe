//! Vertical spacing engine: staff placement within a system, system
//! placement within a page, and the collision-driven clearance adjustment
//! between adjacent staves.
//!
//! No direct teacher analog exists (the host crate hard-codes a fixed
//! grand-staff offset); this module is new, built in the host's
//! struct-plus-pure-function style.

#[derive(Debug, Clone, Copy)]
pub struct StaffInfo {
    pub part_index: usize,
    pub staff_number: u8,
    pub staff_height: f64,
    /// Overrides `staff_distance` for the gap below this staff, when present.
    pub staff_distance_override: Option<f64>,
    /// True when this staff starts a new part (so `part_distance` applies to
    /// the gap above it instead of `staff_distance`).
    pub starts_new_part: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct VerticalConfig {
    pub staff_distance: f64,
    pub part_distance: f64,
    pub system_distance: f64,
    pub top_system_distance: f64,
    pub minimum_staff_clearance: f64,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            staff_distance: 60.0,
            part_distance: 90.0,
            system_distance: 110.0,
            top_system_distance: 140.0,
            minimum_staff_clearance: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffPlacement {
    pub top_y: f64,
    pub bottom_y: f64,
    pub center_line_y: f64,
}

/// Places staves in order starting at `start_y`, advancing by each staff's
/// height plus the within-part `staff_distance` or cross-part
/// `part_distance`, whichever applies.
pub fn place_staves(staves: &[StaffInfo], start_y: f64, config: &VerticalConfig) -> Vec<StaffPlacement> {
    let mut placements = Vec::with_capacity(staves.len());
    let mut y = start_y;

    for (i, staff) in staves.iter().enumerate() {
        let top = y;
        let bottom = top + staff.staff_height;
        placements.push(StaffPlacement {
            top_y: top,
            bottom_y: bottom,
            center_line_y: (top + bottom) / 2.0,
        });

        if i + 1 < staves.len() {
            let gap = staff.staff_distance_override.unwrap_or(if staves[i + 1].starts_new_part {
                config.part_distance
            } else {
                config.staff_distance
            });
            y = bottom + gap;
        }
    }

    placements
}

/// Per-staff escape extents: how far content (ledger lines, high notes,
/// articulations) protrudes above the staff top (`upper_extent`) and below
/// the staff bottom (`lower_extent`), both as non-negative offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaffContentExtent {
    pub upper_extent: f64,
    pub lower_extent: f64,
}

/// Pushes staff `i+1` (and everything below it) down whenever the escaped
/// content of staff `i` and staff `i+1` would leave less than
/// `minimum_staff_clearance` between them.
pub fn resolve_staff_collisions(
    mut placements: Vec<StaffPlacement>,
    extents: &[StaffContentExtent],
    config: &VerticalConfig,
) -> Vec<StaffPlacement> {
    for i in 0..placements.len().saturating_sub(1) {
        let lower_bound_of_i = placements[i].bottom_y + extents[i].lower_extent;
        let upper_bound_of_next = placements[i + 1].top_y - extents[i + 1].upper_extent;
        let clearance = upper_bound_of_next - lower_bound_of_i;

        if clearance < config.minimum_staff_clearance {
            let deficit = config.minimum_staff_clearance - clearance;
            for placement in placements.iter_mut().skip(i + 1) {
                placement.top_y += deficit;
                placement.bottom_y += deficit;
                placement.center_line_y += deficit;
            }
        }
    }

    placements
}

/// Cumulative y-positions for systems on a page: `top_system_distance` above
/// the first system, `system_distance` between subsequent systems. Only
/// asserts ordering and non-overlap; does not center or vertically justify.
pub fn place_systems(system_heights: &[f64], top_margin: f64, config: &VerticalConfig) -> Vec<f64> {
    let mut ys = Vec::with_capacity(system_heights.len());
    let mut y = top_margin;

    for (i, &height) in system_heights.iter().enumerate() {
        if i == 0 {
            y += config.top_system_distance;
        } else {
            y += config.system_distance;
        }
        ys.push(y);
        y += height;
    }

    ys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(height: f64, new_part: bool) -> StaffInfo {
        StaffInfo {
            part_index: 0,
            staff_number: 0,
            staff_height: height,
            staff_distance_override: None,
            starts_new_part: new_part,
        }
    }

    #[test]
    fn staves_are_placed_in_order_without_overlap() {
        let staves = vec![staff(40.0, false), staff(40.0, false)];
        let config = VerticalConfig::default();
        let placements = place_staves(&staves, 0.0, &config);
        assert!(placements[1].top_y >= placements[0].bottom_y);
    }

    #[test]
    fn cross_part_gap_uses_part_distance() {
        let staves = vec![staff(40.0, false), staff(40.0, true)];
        let config = VerticalConfig::default();
        let placements = place_staves(&staves, 0.0, &config);
        let gap = placements[1].top_y - placements[0].bottom_y;
        assert_eq!(gap, config.part_distance);
    }

    #[test]
    fn collision_resolution_enforces_minimum_clearance() {
        let staves = vec![staff(40.0, false), staff(40.0, false)];
        let config = VerticalConfig::default();
        let placements = place_staves(&staves, 0.0, &config);
        let extents = vec![
            StaffContentExtent { upper_extent: 0.0, lower_extent: 50.0 },
            StaffContentExtent { upper_extent: 0.0, lower_extent: 0.0 },
        ];
        let resolved = resolve_staff_collisions(placements, &extents, &config);
        let lower_bound = resolved[0].bottom_y + extents[0].lower_extent;
        let upper_bound = resolved[1].top_y - extents[1].upper_extent;
        assert!(upper_bound - lower_bound >= config.minimum_staff_clearance - 1e-9);
    }

    #[test]
    fn systems_never_overlap_on_a_page() {
        let heights = vec![100.0, 120.0, 90.0];
        let config = VerticalConfig::default();
        let ys = place_systems(&heights, 50.0, &config);
        for w in ys.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }
}
