//! Point-in-polygon engine: integer ray-casting with overflow-safe slope
//! comparison (§4.5).

use crate::polygon::CoordsView;

/// A closed ring of vertices, addressable by index. Implemented for
/// [`CoordsView`] (the production path) and for plain slices (tests and
/// ad-hoc callers).
pub trait Ring {
    /// Number of vertices.
    fn len(&self) -> usize;
    /// True if there are no vertices.
    #[allow(dead_code)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The `i`-th vertex.
    fn vertex(&self, i: usize) -> (i32, i32);
}

impl Ring for CoordsView<'_> {
    fn len(&self) -> usize {
        CoordsView::len(self)
    }

    fn vertex(&self, i: usize) -> (i32, i32) {
        self.get(i)
    }
}

impl Ring for [(i32, i32)] {
    fn len(&self) -> usize {
        <[(i32, i32)]>::len(self)
    }

    fn vertex(&self, i: usize) -> (i32, i32) {
        self[i]
    }
}

impl Ring for Vec<(i32, i32)> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn vertex(&self, i: usize) -> (i32, i32) {
        self[i]
    }
}

/// Horizontal-ray (toward +x) crossing-count test, closed-half-open on
/// shared edges so the convention is stable across runs (§8 invariant 6):
/// points exactly on an edge are considered inside.
///
/// Orientation-agnostic: winding order (CW/CCW) never affects the result
/// (§9 "Orientation of polygons").
#[must_use]
pub fn inside_polygon(x: i32, y: i32, ring: &(impl Ring + ?Sized)) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let (mut x_prev, mut y_prev) = ring.vertex(n - 1);
    for i in 0..n {
        let (x_cur, y_cur) = ring.vertex(i);
        let (y1, y2) = (y_prev, y_cur);

        // Edge straddles the ray's y (using XOR so a vertex exactly on the
        // ray is attributed to exactly one of its two edges).
        if (y > y1) != (y > y2) {
            let (x1, x2) = (x_prev, x_cur);

            if x <= x1 && x <= x2 {
                // Edge lies wholly to the right of the point.
                inside = !inside;
            } else if x > x1 && x > x2 {
                // Edge lies wholly to the left: no crossing.
            } else {
                // Straddles the point's x too: compare slopes in 64-bit
                // arithmetic. Per-edge products can reach ~65e17, which
                // overflows i32 but not i64.
                let s1 = i64::from(y2 - y) * i64::from(x2 - x1);
                let s2 = i64::from(y2 - y1) * i64::from(x2 - x);
                let toggles = if y > y1 { s1 <= s2 } else { s1 >= s2 };
                if toggles {
                    inside = !inside;
                }
            }
        }

        x_prev = x_cur;
        y_prev = y_cur;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(i32, i32)> {
        vec![(0, 0), (10, 0), (10, 10), (0, 10)]
    }

    #[test]
    fn point_inside() {
        assert!(inside_polygon(5, 5, &square()));
    }

    #[test]
    fn point_outside() {
        assert!(!inside_polygon(20, 20, &square()));
        assert!(!inside_polygon(-1, 5, &square()));
    }

    #[test]
    fn point_on_edge_is_inside() {
        // The chosen convention treats boundary points as inside (§8
        // invariant 6); this must stay stable across runs.
        assert!(inside_polygon(0, 5, &square()));
        assert!(inside_polygon(5, 0, &square()));
    }

    #[test]
    fn point_on_vertex_is_inside() {
        assert!(inside_polygon(0, 0, &square()));
        assert!(inside_polygon(10, 10, &square()));
    }

    #[test]
    fn orientation_agnostic() {
        let ccw = square();
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(inside_polygon(5, 5, &ccw), inside_polygon(5, 5, &cw));
        assert_eq!(inside_polygon(20, 20, &ccw), inside_polygon(20, 20, &cw));
    }

    #[test]
    fn triangle_non_convex_case() {
        let tri = vec![(0, 0), (10, 0), (0, 10)];
        assert!(inside_polygon(2, 2, &tri));
        assert!(!inside_polygon(8, 8, &tri));
    }

    #[test]
    fn degenerate_ring_is_never_inside() {
        assert!(!inside_polygon(0, 0, &vec![(0, 0), (1, 1)]));
        assert!(!inside_polygon(0, 0, &Vec::<(i32, i32)>::new()));
    }
}
