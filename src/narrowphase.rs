use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::math::{self, AXIS_EPS};
use crate::types::*;

/// Edge normals (≤ 4), the capsule side axis, and two endpoint axes.
const MAX_AXES: usize = MAX_POLY_VERTS + 3;

/// Narrowphase primitive tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn capsule_polygon(capsule: &Capsule, poly: &[Vec2]) -> Option<Contact> {
        let n = poly.len();
        if n < 3 {
            return None;
        }

        // Gather candidate axes on the stack; large polygons fall back to a Vec.
        let mut stack = [Vec2::ZERO; MAX_AXES];
        let mut heap = Vec::new();
        let mut count = 0usize;
        let mut push = |axis: Vec2| {
            if count < MAX_AXES {
                stack[count] = axis;
            } else {
                heap.push(axis);
            }
            count += 1;
        };

        // Polygon edge normals
        for i in 0..n {
            let edge = poly[(i + 1) % n] - poly[i];
            push(math::normalize_eps(math::perp(edge)));
        }

        // Vertical capsule: its flat sides only ever face along X
        push(Vec2::X);

        // Rounded ends: axis from the closest boundary point to each endpoint
        let (s0, s1) = capsule.segment_endpoints();
        for s in [s0, s1] {
            let cp = math::closest_point_on_polygon_edges(s, poly);
            push(math::normalize_eps(s - cp));
        }

        let axes = stack[..count.min(MAX_AXES)].iter().chain(heap.iter());

        let mut best_overlap = f32::INFINITY;
        let mut best_axis = Vec2::ZERO;
        for &axis in axes {
            if axis.length_squared() < AXIS_EPS {
                continue;
            }
            let overlap = math::interval_overlap(math::project_polygon(poly, axis), capsule.project(axis));
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best_overlap {
                best_overlap = overlap;
                best_axis = axis;
            }
        }
        if !best_overlap.is_finite() {
            return None;
        }

        // Point the normal out of the polygon, toward the capsule.
        if (capsule.center - math::centroid(poly)).dot(best_axis) < 0.0 {
            best_axis = -best_axis;
        }

        Some(Contact {
            normal: best_axis,
            penetration: best_overlap,
        })
    }
}
