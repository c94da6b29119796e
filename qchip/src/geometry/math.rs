use super::tolerance::clamp01;

/// Squared distance from `(px,py)` to the segment `(x1,y1)-(x2,y2)` and the
/// clamped projection parameter along it.
pub fn seg_distance_sq(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32) {
    let vx = x2 - x1;
    let vy = y2 - y1;
    let wx = px - x1;
    let wy = py - y1;
    let vv = vx * vx + vy * vy;
    let t = if vv > 0.0 { clamp01((wx * vx + wy * vy) / vv) } else { 0.0 };
    let dx = px - (x1 + t * vx);
    let dy = py - (y1 + t * vy);
    (dx * dx + dy * dy, t)
}

pub fn dist_to_segment(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let (d2, _) = seg_distance_sq(px, py, x1, y1, x2, y2);
    d2.sqrt()
}

#[inline]
pub fn dist_sq(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Inclusive axis-aligned box test.
#[inline]
pub fn point_in_box(x: f32, y: f32, minx: f32, miny: f32, maxx: f32, maxy: f32) -> bool {
    x >= minx && x <= maxx && y >= miny && y <= maxy
}

/// Orders two corners into `(minx, miny, maxx, maxy)`.
#[inline]
pub fn normalize_box(x0: f32, y0: f32, x1: f32, y1: f32) -> (f32, f32, f32, f32) {
    (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}
