//! Collision detector: geometric primitives, a spatial hash index and the
//! domain-specific placement policies built on top of them.
//!
//! Grounded on the host crate's `BoundingBox::{contains,intersects}` for the
//! rectangle primitives, `layout/beams.rs` for beam/notehead intersection and
//! `layout/stems.rs` for stem-length adjustment; the spatial hash and
//! accidental stack are new.

use std::collections::HashMap;

use crate::layout::types::{Point, Rect};

// ---------------------------------------------------------------------
// Geometric primitives
// ---------------------------------------------------------------------

/// Axis-aligned rectangle intersection with optional padding applied to
/// `a` before testing.
pub fn intersects_padded(a: &Rect, b: &Rect, padding: f64) -> bool {
    let padded = Rect::new(a.x - padding, a.y - padding, a.width + 2.0 * padding, a.height + 2.0 * padding);
    padded.intersects(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub axis: Axis,
    pub amount: f64,
}

/// Smallest axial push that separates two overlapping rectangles. Ties
/// break toward the smaller absolute value, horizontal before vertical, per
/// the determinism requirement on collision tie-breaks.
pub fn minimum_translation_displacement(a: &Rect, b: &Rect) -> Option<Displacement> {
    if !a.intersects(b) {
        return None;
    }

    let push_right = b.right() - a.left();
    let push_left = a.right() - b.left();
    let push_down = b.bottom() - a.top();
    let push_up = a.bottom() - b.top();

    let horizontal = push_right.min(push_left);
    let vertical = push_down.min(push_up);

    if horizontal <= vertical {
        let amount = if push_right <= push_left { push_right } else { -push_left };
        Some(Displacement { axis: Axis::Horizontal, amount })
    } else {
        let amount = if push_down <= push_up { push_down } else { -push_up };
        Some(Displacement { axis: Axis::Vertical, amount })
    }
}

pub fn union(a: &Rect, b: &Rect) -> Rect {
    let x = a.left().min(b.left());
    let y = a.top().min(b.top());
    let right = a.right().max(b.right());
    let bottom = a.bottom().max(b.bottom());
    Rect::new(x, y, right - x, bottom - y)
}

pub fn center(r: &Rect) -> Point {
    Point::new(r.x + r.width / 2.0, r.y + r.height / 2.0)
}

pub fn expand(r: &Rect, amount: f64) -> Rect {
    Rect::new(r.x - amount, r.y - amount, r.width + 2.0 * amount, r.height + 2.0 * amount)
}

/// Distance between the closest points of two rectangles; 0 when they
/// overlap.
pub fn closest_point_distance(a: &Rect, b: &Rect) -> f64 {
    let dx = (a.left() - b.right()).max(b.left() - a.right()).max(0.0);
    let dy = (a.top() - b.bottom()).max(b.top() - a.bottom()).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

// ---------------------------------------------------------------------
// Spatial hash
// ---------------------------------------------------------------------

type Cell = (i64, i64);

/// Uniform spatial hash keyed on `(floor(x/cellSize), floor(y/cellSize))`.
/// `query` returns a superset of true collisions -- callers verify with a
/// direct intersection test.
pub struct SpatialHash {
    cell_size: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f64) -> Self {
        Self { cell_size, cells: HashMap::new() }
    }

    fn cell_of(&self, x: f64, y: f64) -> Cell {
        ((x / self.cell_size).floor() as i64, (y / self.cell_size).floor() as i64)
    }

    /// Writes `index` into every cell `rect` overlaps.
    pub fn insert(&mut self, index: usize, rect: &Rect) {
        let (min_cx, min_cy) = self.cell_of(rect.left(), rect.top());
        let (max_cx, max_cy) = self.cell_of(rect.right(), rect.bottom());
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// Union of indices in every cell `query` overlaps, deduplicated.
    pub fn query(&self, query: &Rect) -> Vec<usize> {
        let (min_cx, min_cy) = self.cell_of(query.left(), query.top());
        let (max_cx, max_cy) = self.cell_of(query.right(), query.bottom());
        let mut found = Vec::new();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    for &i in indices {
                        if !found.contains(&i) {
                            found.push(i);
                        }
                    }
                }
            }
        }
        found.sort_unstable();
        found
    }
}

// ---------------------------------------------------------------------
// Domain policies
// ---------------------------------------------------------------------

/// One accidental attached to a chord, before x-offset assignment.
#[derive(Debug, Clone, Copy)]
pub struct AccidentalSlot {
    pub bounds: Rect,
    /// Staff position in half-line steps, higher = higher pitch.
    pub staff_position: i32,
}

/// Assigns per-accidental negative x-offsets so no two overlap vertically
/// within `padding`. Accidentals are placed from the top pitch down; each
/// gets the leftmost x not colliding with any already-placed accidental's
/// vertical extent, and the first accidental is offset by
/// `accidental_width + notehead_width / 2 + gap`.
pub fn resolve_accidental_collisions(
    accidentals: &[AccidentalSlot],
    notehead_width: f64,
    gap: f64,
) -> Vec<f64> {
    if accidentals.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..accidentals.len()).collect();
    order.sort_by(|&a, &b| accidentals[b].staff_position.cmp(&accidentals[a].staff_position));

    let mut offsets = vec![0.0; accidentals.len()];
    let mut placed: Vec<Rect> = Vec::new();

    for &i in &order {
        let slot = &accidentals[i];
        let width = slot.bounds.width.max(0.1);

        let first_offset = -(width + notehead_width / 2.0 + gap);
        let mut x = first_offset;
        loop {
            let candidate = Rect::new(x, slot.bounds.top(), width, slot.bounds.height);
            let collides = placed.iter().any(|r| intersects_padded(&candidate, r, 0.0));
            if !collides {
                break;
            }
            // Step further left, clearing the nearest placed accidental by
            // `gap`, plus its own width.
            let furthest_left = placed.iter().map(|r| r.left()).fold(f64::INFINITY, f64::min);
            if furthest_left.is_finite() {
                x = furthest_left - width - gap;
            } else {
                x -= width + gap;
            }
        }

        offsets[i] = x;
        placed.push(Rect::new(x, slot.bounds.top(), width, slot.bounds.height));
    }

    offsets
}

/// If a proposed stem segment (as a thin rectangle) intersects any obstacle,
/// returns the positive length adjustment needed to clear all of them along
/// the stem's direction (growing away from the notehead).
pub fn stem_clearance_adjustment(stem: &Rect, obstacles: &[Rect], stem_points_up: bool) -> f64 {
    let mut extra = 0.0f64;
    for obstacle in obstacles {
        if !stem.intersects(obstacle) {
            continue;
        }
        let needed = if stem_points_up {
            stem.top() - obstacle.top() + 1.0
        } else {
            obstacle.bottom() - stem.bottom() + 1.0
        };
        extra = extra.max(needed.max(0.0));
    }
    extra
}

/// If the beam's bounding rectangle intersects any notehead in the group,
/// returns the minimum vertical displacement (away from the stems) to clear
/// every notehead.
pub fn beam_clearance_adjustment(beam_bounds: &Rect, noteheads: &[Rect], stem_points_up: bool) -> f64 {
    let mut displacement = 0.0f64;
    for notehead in noteheads {
        if !beam_bounds.intersects(notehead) {
            continue;
        }
        let needed = if stem_points_up {
            beam_bounds.bottom() - notehead.top() + 1.0
        } else {
            notehead.bottom() - beam_bounds.top() + 1.0
        };
        displacement = displacement.max(needed.max(0.0));
    }
    displacement
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackSide {
    Above,
    Below,
}

/// Stacks articulations outward from the note: above stacks with
/// monotonically decreasing y, below with monotonically increasing y, each
/// separated by `gap`, in insertion order.
pub fn stack_articulations(note_bounds: &Rect, count: usize, side: StackSide, gap: f64) -> Vec<f64> {
    (0..count)
        .map(|i| match side {
            StackSide::Above => note_bounds.top() - gap * (i as f64 + 1.0),
            StackSide::Below => note_bounds.bottom() + gap * (i as f64 + 1.0),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicSide {
    Above,
    Below,
}

/// Tries the preferred side first; if it is obstacle-free there, uses it;
/// otherwise tries the opposite side; then nudges outward until a position
/// is free.
pub fn place_dynamic(
    anchor: Point,
    preferred: DynamicSide,
    mark_size: (f64, f64),
    obstacles: &[Rect],
    nudge_step: f64,
    max_nudges: usize,
) -> Point {
    for side in [preferred, opposite(preferred)] {
        let mut offset = 0.0;
        for _ in 0..=max_nudges {
            let candidate = place_at(anchor, side, mark_size, offset);
            if !obstacles.iter().any(|o| o.intersects(&candidate)) {
                return Point::new(candidate.x, candidate.y);
            }
            offset += nudge_step;
        }
    }
    place_at_point(anchor, preferred, mark_size, 0.0)
}

fn opposite(side: DynamicSide) -> DynamicSide {
    match side {
        DynamicSide::Above => DynamicSide::Below,
        DynamicSide::Below => DynamicSide::Above,
    }
}

fn place_at(anchor: Point, side: DynamicSide, size: (f64, f64), offset: f64) -> Rect {
    let y = match side {
        DynamicSide::Above => anchor.y - size.1 - offset,
        DynamicSide::Below => anchor.y + offset,
    };
    Rect::new(anchor.x - size.0 / 2.0, y, size.0, size.1)
}

fn place_at_point(anchor: Point, side: DynamicSide, size: (f64, f64), offset: f64) -> Point {
    let r = place_at(anchor, side, size, offset);
    Point::new(r.x + r.width / 2.0, r.y)
}

/// Samples a quadratic Bezier curve (slur/tie) at fixed parameter intervals
/// and tests each sample against obstacles; on collision, increases the
/// control-point offset away from obstacles and re-tests, bounded by
/// `max_iterations`.
pub fn resolve_curve_collision(
    start: Point,
    end: Point,
    mut control_offset: f64,
    obstacles: &[Rect],
    samples: usize,
    step: f64,
    max_iterations: usize,
) -> f64 {
    for _ in 0..max_iterations {
        let control = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0 - control_offset);
        let mut collided = false;
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let p = quadratic_bezier(start, control, end, t);
            let probe = Rect::new(p.x - 0.5, p.y - 0.5, 1.0, 1.0);
            if obstacles.iter().any(|o| o.intersects(&probe)) {
                collided = true;
                break;
            }
        }
        if !collided {
            return control_offset;
        }
        control_offset += step;
    }
    control_offset
}

fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let x = (1.0 - t).powi(2) * p0.x + 2.0 * (1.0 - t) * t * p1.x + t.powi(2) * p2.x;
    let y = (1.0 - t).powi(2) * p0.y + 2.0 * (1.0 - t) * t * p1.y + t.powi(2) * p2.y;
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_hash_query_is_superset_of_true_collisions() {
        let mut hash = SpatialHash::new(10.0);
        let rects = vec![
            Rect::new(0.0, 0.0, 5.0, 5.0),
            Rect::new(3.0, 3.0, 5.0, 5.0),
            Rect::new(50.0, 50.0, 5.0, 5.0),
        ];
        for (i, r) in rects.iter().enumerate() {
            hash.insert(i, r);
        }
        let query_rect = Rect::new(0.0, 0.0, 5.0, 5.0);
        let found = hash.query(&query_rect);
        assert!(found.contains(&0));
        assert!(found.contains(&1));
        assert!(!found.contains(&2));
    }

    #[test]
    fn resolve_accidental_collisions_on_empty_is_empty() {
        assert!(resolve_accidental_collisions(&[], 1.2, 0.2).is_empty());
    }

    #[test]
    fn single_accidental_offset_matches_formula() {
        let width = 0.8;
        let notehead_width = 1.2;
        let gap = 0.2;
        let slots = vec![AccidentalSlot {
            bounds: Rect::new(0.0, 0.0, width, 1.0),
            staff_position: 0,
        }];
        let offsets = resolve_accidental_collisions(&slots, notehead_width, gap);
        assert_eq!(offsets.len(), 1);
        let expected = -(width + notehead_width / 2.0 + gap);
        assert!((offsets[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn two_stacked_accidentals_both_negative_second_further_left() {
        let slots = vec![
            AccidentalSlot { bounds: Rect::new(0.0, 0.0, 0.8, 1.0), staff_position: 2 },
            AccidentalSlot { bounds: Rect::new(0.0, 0.9, 0.8, 1.0), staff_position: 0 },
        ];
        let offsets = resolve_accidental_collisions(&slots, 1.2, 0.2);
        assert!(offsets[0] < 0.0);
        assert!(offsets[1] < 0.0);
        assert!(offsets[1].abs() > offsets[0].abs());
    }

    #[test]
    fn minimum_translation_prefers_horizontal_on_tie() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let d = minimum_translation_displacement(&a, &b).unwrap();
        assert_eq!(d.axis, Axis::Horizontal);
    }

    #[test]
    fn closest_point_distance_is_zero_when_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(closest_point_distance(&a, &b), 0.0);
    }
}
