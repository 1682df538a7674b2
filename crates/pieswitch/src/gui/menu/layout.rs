//! Slice geometry for the radial menu.
//!
//! Angles are degrees in the usual math orientation (0° points right, 90° up), while points
//! are in window coordinates where `y` grows downward. Slice ranges are left unnormalized
//! (`[-180, 0]` and `[0, 180]` for two entries), so containment is decided on the circle
//! rather than by comparing raw numbers.

use super::{HIT_TOLERANCE, INNER_RADIUS, MENU_SIZE, OUTER_RADIUS, SCREEN_MARGIN};
use piekit::wm::{Point, Rect};

const ANGLE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceAngles {
    pub start: f64,
    pub end: f64,
}

impl SliceAngles {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains_angle(&self, degrees: f64) -> bool {
        let delta = (degrees - self.mid()).to_radians();
        let offset = delta.sin().atan2(delta.cos()).to_degrees().abs();
        offset <= self.width() / 2.0 + ANGLE_EPSILON
    }
}

/// Entry 0 is centred on the top, the rest follow clockwise.
pub fn slice_angles(count: usize) -> Vec<SliceAngles> {
    if count == 0 {
        return Vec::new();
    }

    let width = 360.0 / count as f64;
    (0..count)
        .map(|i| {
            let mid = 90.0 - i as f64 * width;
            SliceAngles {
                start: mid - width / 2.0,
                end: mid + width / 2.0,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionGeometry {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// How far past the outer ring the pointer still counts as on a slice.
    pub tolerance: f64,
}

impl SessionGeometry {
    pub fn new(center: Point) -> Self {
        Self {
            center,
            inner_radius: INNER_RADIUS,
            outer_radius: OUTER_RADIUS,
            tolerance: HIT_TOLERANCE,
        }
    }

    pub fn in_ring(&self, point: Point) -> bool {
        let dist = self.center.distance_to(point);
        dist > self.inner_radius && dist < self.outer_radius + self.tolerance
    }

    pub fn pointer_angle(&self, point: Point) -> f64 {
        let (dx, dy) = (point.x - self.center.x, self.center.y - point.y);
        dy.atan2(dx).to_degrees()
    }
}

/// First slice in index order whose sector holds the point. Boundaries are shared, so the
/// order only settles exact edge hits.
pub fn hit_test(point: Point, geometry: &SessionGeometry, slices: &[SliceAngles]) -> Option<usize> {
    if !geometry.in_ring(point) {
        return None;
    }

    let angle = geometry.pointer_angle(point);
    slices.iter().position(|s| s.contains_angle(angle))
}

/// Centres a `size` square on the pointer, then pushes it back inside `display` so it keeps
/// `margin` from each edge.
pub fn place_bounds(pointer: Point, display: Rect, size: f64, margin: f64) -> Rect {
    let clamp_axis = |pos: f64, min: f64, max: f64| {
        let start = pos - size / 2.0;
        if start < min + margin {
            min + margin
        } else if start + size > max - margin {
            max - size - margin
        } else {
            start
        }
    };

    Rect::new(
        clamp_axis(pointer.x, display.x, display.max_x()),
        clamp_axis(pointer.y, display.y, display.max_y()),
        size,
        size,
    )
}

pub fn session_bounds(pointer: Point, display: Rect) -> Rect {
    place_bounds(pointer, display, MENU_SIZE, SCREEN_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn slices_partition_the_circle() {
        for n in 2..=8 {
            let slices = slice_angles(n);
            assert_eq!(slices.len(), n);

            let total: f64 = slices.iter().map(SliceAngles::width).sum();
            assert_close(total, 360.0);

            for (i, s) in slices.iter().enumerate() {
                assert_close(s.width(), 360.0 / n as f64);
                let next = &slices[(i + 1) % n];
                // each slice begins where the next one (clockwise) ends, modulo a turn
                let gap = (s.start - next.end).to_radians();
                assert!(gap.sin().abs() < 1e-9 && gap.cos() > 0.0);
            }
            assert_close(slices[0].mid(), 90.0);
        }
    }

    #[test]
    fn two_slices_split_top_and_bottom() {
        assert_eq!(
            slice_angles(2),
            vec![
                SliceAngles { start: 0.0, end: 180.0 },
                SliceAngles { start: -180.0, end: 0.0 },
            ]
        );
        assert!(slice_angles(0).is_empty());
    }

    #[test]
    fn containment_wraps_around_the_circle() {
        // five slices: the last one spans [-234, -162], the same wedge as [126, 198]
        let slices = slice_angles(5);
        assert!(slices[4].contains_angle(150.0));
        assert!(slices[4].contains_angle(-210.0));
        assert!(slices[4].contains_angle(190.0));
        assert!(!slices[4].contains_angle(100.0));
    }

    #[test]
    fn hit_test_uses_window_coordinates() {
        let geometry = SessionGeometry::new(Point::new(200.0, 200.0));
        let slices = slice_angles(4);

        assert_eq!(hit_test(Point::new(200.0, 150.0), &geometry, &slices), Some(0)); // up
        assert_eq!(hit_test(Point::new(250.0, 200.0), &geometry, &slices), Some(1)); // right
        assert_eq!(hit_test(Point::new(200.0, 250.0), &geometry, &slices), Some(2)); // down
        assert_eq!(hit_test(Point::new(150.0, 200.0), &geometry, &slices), Some(3)); // left
    }

    #[test]
    fn dead_zone_and_far_points_miss() {
        let geometry = SessionGeometry::new(Point::new(200.0, 200.0));
        let slices = slice_angles(3);

        assert_eq!(hit_test(Point::new(200.0, 200.0), &geometry, &slices), None);
        assert_eq!(hit_test(Point::new(200.0, 185.0), &geometry, &slices), None);
        assert_eq!(hit_test(Point::new(200.0, 70.0), &geometry, &slices), None);
    }

    #[test]
    fn tolerance_keeps_the_ring_sticky() {
        let geometry = SessionGeometry::new(Point::new(200.0, 200.0));
        let slices = slice_angles(3);
        // 120px out: past the visible ring, within the tolerance band
        assert_eq!(hit_test(Point::new(200.0, 80.0), &geometry, &slices), Some(0));
    }

    #[test]
    fn exact_boundaries_go_to_the_lower_index() {
        let geometry = SessionGeometry::new(Point::new(0.0, 0.0));
        let slices = slice_angles(2);
        assert_eq!(hit_test(Point::new(50.0, 0.0), &geometry, &slices), Some(0));
        assert_eq!(hit_test(Point::new(-50.0, 0.0), &geometry, &slices), Some(0));
    }

    #[test]
    fn placement_centres_on_pointer_when_room() {
        let display = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let bounds = place_bounds(Point::new(960.0, 540.0), display, 400.0, 60.0);
        assert_eq!(bounds, Rect::new(760.0, 340.0, 400.0, 400.0));
    }

    #[test]
    fn placement_clamps_to_display_margin() {
        let display = Rect::new(0.0, 0.0, 1920.0, 1080.0);

        let top_left = place_bounds(Point::new(5.0, 5.0), display, 400.0, 60.0);
        assert_eq!((top_left.x, top_left.y), (60.0, 60.0));

        let bottom_right = place_bounds(Point::new(1915.0, 1075.0), display, 400.0, 60.0);
        assert_eq!((bottom_right.x, bottom_right.y), (1460.0, 620.0));
    }
}
