//! Closed-curve helpers backing the hull outline.
//!
//! The hull is authored as a handful of control points; both the walkability
//! test and the rendered boundary consume the same subdivided outline, so the
//! two can never disagree about the hull shape.

use bevy::prelude::*;

/// Spline tension (0.0 = Catmull-Rom/smooth, 1.0 = linear/sharp).
pub const OUTLINE_TENSION: f32 = 0.25;

/// Subdivides a closed loop of control points with a cardinal spline.
///
/// Each control segment becomes `subdivisions` outline points. Degenerate
/// loops (fewer than 3 points) and zero subdivision counts are returned
/// unchanged.
pub fn subdivide_closed_loop(control: &[Vec2], subdivisions: usize) -> Vec<Vec2> {
    if control.len() < 3 || subdivisions == 0 {
        return control.to_vec();
    }

    let len = control.len();
    let s = (1.0 - OUTLINE_TENSION) / 2.0;
    let mut outline = Vec::with_capacity(len * subdivisions);

    for i in 0..len {
        // Interpolate the segment p1 -> p2, with p0/p3 as tangent controls.
        let p0 = control[(i + len - 1) % len];
        let p1 = control[i];
        let p2 = control[(i + 1) % len];
        let p3 = control[(i + 2) % len];

        for step in 0..subdivisions {
            let t = step as f32 / subdivisions as f32;
            let t2 = t * t;
            let t3 = t2 * t;

            // Cardinal spline basis, grouped per control point.
            let h0 = -s * t3 + 2.0 * s * t2 - s * t;
            let h1 = (2.0 - s) * t3 + (s - 3.0) * t2 + 1.0;
            let h2 = (s - 2.0) * t3 + (3.0 - 2.0 * s) * t2 + s * t;
            let h3 = s * t3 - s * t2;

            outline.push(p0 * h0 + p1 * h1 + p2 * h2 + p3 * h3);
        }
    }

    outline
}

/// Tests whether a point lies inside a closed polygon using ray casting.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;

    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
