//! Coordinate model: staff spaces, tenths and points, and the scaling
//! context that ties them together. Every other component measures length in
//! staff spaces internally and only converts to points at the engraved-model
//! boundary.

/// 40 tenths = 1 staff space, the interchange-format convention.
pub const TENTHS_PER_STAFF_SPACE: f64 = 40.0;

/// 1 inch = 72 points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// The four parameters that tie abstract staff spaces to physical output.
///
/// Invariant: `points_per_staff_space == staff_height_points / (lines_per_staff - 1)`;
/// the three conversion functions below derive from this and nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingContext {
    pub millimeters_per_staff_space: f64,
    pub tenths_per_staff_space: f64,
    pub staff_height_points: f64,
    pub lines_per_staff: u8,
}

impl ScalingContext {
    pub fn new(
        millimeters_per_staff_space: f64,
        staff_height_points: f64,
        lines_per_staff: u8,
    ) -> Self {
        Self {
            millimeters_per_staff_space,
            tenths_per_staff_space: TENTHS_PER_STAFF_SPACE,
            staff_height_points,
            lines_per_staff,
        }
    }

    /// Points per staff space, the single derived constant every conversion
    /// below is built from. Callers never divide by scaling parameters
    /// directly.
    pub fn points_per_staff_space(&self) -> f64 {
        self.staff_height_points / (self.lines_per_staff as f64 - 1.0)
    }

    pub fn staff_spaces_to_points(&self, staff_spaces: f64) -> f64 {
        staff_spaces * self.points_per_staff_space()
    }

    pub fn tenths_to_points(&self, tenths: f64) -> f64 {
        self.staff_spaces_to_points(tenths / self.tenths_per_staff_space)
    }

    pub fn staff_spaces_to_millimeters(&self, staff_spaces: f64) -> f64 {
        staff_spaces * self.millimeters_per_staff_space
    }
}

impl Default for ScalingContext {
    /// 5-line staff at 7mm staff height rendered at 40 points tall — a common
    /// engraving default (quarter-size orchestral score proportions).
    fn default() -> Self {
        Self::new(1.75, 40.0, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_per_staff_space_derives_from_height_and_lines() {
        let ctx = ScalingContext::new(1.75, 40.0, 5);
        assert_eq!(ctx.points_per_staff_space(), 10.0);
    }

    #[test]
    fn tenths_round_trip_through_staff_spaces() {
        let ctx = ScalingContext::new(1.75, 40.0, 5);
        // 40 tenths == 1 staff space == 10 points at this scaling.
        assert_eq!(ctx.tenths_to_points(40.0), ctx.staff_spaces_to_points(1.0));
    }

    #[test]
    fn six_line_staff_has_five_gaps() {
        let ctx = ScalingContext::new(1.75, 50.0, 6);
        assert_eq!(ctx.points_per_staff_space(), 10.0);
    }
}
