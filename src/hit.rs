#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Viewport};
use crate::consts::ROAD_HIT_SLOP_PX;
use crate::doc::{MapDoc, PinId, RoadId};

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Pin(PinId),
    Road(RoadId),
}

/// Test which entity (if any) is under `world_pt`.
///
/// Pins win over roads. Among pins within `pin_radius_px` (screen pixels) the
/// closest one is returned; roads are matched against every segment of their path.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &MapDoc, viewport: &Viewport, pin_radius_px: f64) -> Option<Hit> {
    let pin_radius = viewport.screen_dist_to_world(pin_radius_px);
    let nearest_pin = doc
        .pins()
        .map(|p| (p.id, p.position().distance(world_pt)))
        .filter(|(_, d)| *d <= pin_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    if let Some((id, _)) = nearest_pin {
        return Some(Hit::Pin(id));
    }

    let road_slop = viewport.screen_dist_to_world(ROAD_HIT_SLOP_PX);
    doc.roads()
        .filter_map(|r| {
            let d = r
                .path_points
                .windows(2)
                .map(|seg| distance_to_segment(world_pt, seg[0], seg[1]))
                .fold(f64::INFINITY, f64::min);
            (d <= road_slop).then_some((r.id, d))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(id, _)| Hit::Road(id))
}

/// Whether `world_pt` is within `radius_px` screen pixels of `target`.
#[must_use]
pub fn near(world_pt: Point, target: Point, viewport: &Viewport, radius_px: f64) -> bool {
    world_pt.distance(target) <= viewport.screen_dist_to_world(radius_px)
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
