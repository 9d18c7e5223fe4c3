use glam::Vec2;

/// Vectors shorter than this are treated as zero (no direction).
pub const AXIS_EPS: f32 = 1e-6;

/// Normalize `v`, returning `Vec2::ZERO` when its length is below [`AXIS_EPS`].
#[inline]
pub fn normalize_eps(v: Vec2) -> Vec2 {
    let len = v.length();
    if len < AXIS_EPS { Vec2::ZERO } else { v / len }
}

/// Left perpendicular `(-y, x)`.
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Closest point to `p` on segment `a..b`. Degenerate segments return `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let denom = ab.length_squared();
    if denom < AXIS_EPS {
        return a;
    }
    let t = clamp((p - a).dot(ab) / denom, 0.0, 1.0);
    a + ab * t
}

/// Closest point to `p` on the closed boundary of `poly` (edges only, the
/// interior is not considered). `poly` must be non-empty.
pub fn closest_point_on_polygon_edges(p: Vec2, poly: &[Vec2]) -> Vec2 {
    let n = poly.len();
    let mut best = poly[0];
    let mut best_d2 = f32::INFINITY;
    for i in 0..n {
        let cp = closest_point_on_segment(p, poly[i], poly[(i + 1) % n]);
        let d2 = (cp - p).length_squared();
        if d2 < best_d2 {
            best_d2 = d2;
            best = cp;
        }
    }
    best
}

/// Project every vertex onto `axis`, returning `(min, max)`.
pub fn project_polygon(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(mn, mx), v| {
        let d = v.dot(axis);
        (mn.min(d), mx.max(d))
    })
}

/// Vertex average. Good enough as an "inside" reference for convex shapes.
pub fn centroid(poly: &[Vec2]) -> Vec2 {
    if poly.is_empty() {
        return Vec2::ZERO;
    }
    poly.iter().copied().sum::<Vec2>() / poly.len() as f32
}

/// 1D interval overlap; `<= 0` means separated (or merely touching).
#[inline]
pub fn interval_overlap(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.1.min(b.1) - a.0.max(b.0)
}
