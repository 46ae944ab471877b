//! Transfer trajectory: a Catmull-Rom spline from launch apogee toward the Moon,
//! sampled by arc length.

use glam::DVec3;
use tozemoon_config::SceneConfig;

use crate::geometry::SceneGeometry;

const TENSION: f64 = 0.2;
const ARC_DIVISIONS: usize = 200;
const TANGENT_DELTA: f64 = 1.0e-4;

/// Smooth curve through fixed control points, queryable by normalized arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPath {
    points: Vec<DVec3>,
    arc_lengths: Vec<f64>,
}

impl TransferPath {
    /// Build the transfer curve for the given scene anchors.
    pub fn for_scene(geometry: &SceneGeometry, scene: &SceneConfig) -> Self {
        let start = geometry.above_site(scene.launch.apogee);
        let site = geometry.site.position;
        let moon = geometry.moon_center;
        Self::through(vec![
            start,
            start + DVec3::new(2.0, -0.2, -4.0),
            start + DVec3::new(5.0, -0.8, -12.0),
            start + DVec3::new(8.5, -2.0, -20.0),
            site.lerp(moon, 0.25) + DVec3::new(0.0, 2.0, -10.0),
            site.lerp(moon, 0.45) + DVec3::new(0.0, 1.0, -20.0),
        ])
    }

    /// Build a curve through arbitrary control points. Fewer than two points yield a
    /// degenerate curve that stays on the first point (or the origin when empty).
    pub fn through(mut points: Vec<DVec3>) -> Self {
        if points.is_empty() {
            points.push(DVec3::ZERO);
        }
        if points.len() == 1 {
            points.push(points[0]);
        }
        let mut path = Self {
            points,
            arc_lengths: Vec::with_capacity(ARC_DIVISIONS + 1),
        };
        path.arc_lengths = path.compute_arc_lengths();
        path
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    /// Total curve length.
    pub fn length(&self) -> f64 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Position at curve parameter `t` in `[0, 1]` (not arc-length uniform).
    pub fn point(&self, t: f64) -> DVec3 {
        let t = tozemoon_core::easing::clamp01(t);
        let l = self.points.len();
        let p = (l - 1) as f64 * t;
        let mut index = p.floor() as usize;
        let mut weight = p - index as f64;
        if index >= l - 1 {
            index = l - 2;
            weight = 1.0;
        }

        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        let p0 = if index > 0 {
            self.points[index - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if index + 2 < l {
            self.points[index + 2]
        } else {
            p2 * 2.0 - p1
        };

        let t0 = (p2 - p0) * TENSION;
        let t1 = (p3 - p1) * TENSION;
        let c2 = p1 * -3.0 + p2 * 3.0 - t0 * 2.0 - t1;
        let c3 = p1 * 2.0 - p2 * 2.0 + t0 + t1;
        p1 + t0 * weight + c2 * (weight * weight) + c3 * (weight * weight * weight)
    }

    /// Position at normalized arc length `u` in `[0, 1]`.
    pub fn point_at(&self, u: f64) -> DVec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at normalized arc length `u`, or `None` where the curve is degenerate.
    pub fn tangent_at(&self, u: f64) -> Option<DVec3> {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).try_normalize()
    }

    fn compute_arc_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for i in 1..=ARC_DIVISIONS {
            let current = self.point(i as f64 / ARC_DIVISIONS as f64);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    /// Map normalized arc length to curve parameter via the length table.
    fn u_to_t(&self, u: f64) -> f64 {
        let u = tozemoon_core::easing::clamp01(u);
        let n = self.arc_lengths.len();
        let total = self.length();
        if total <= f64::EPSILON {
            return u;
        }
        let target = u * total;
        let i = self
            .arc_lengths
            .partition_point(|&len| len <= target)
            .saturating_sub(1);
        if i >= n - 1 {
            return 1.0;
        }
        let before = self.arc_lengths[i];
        let segment = self.arc_lengths[i + 1] - before;
        let fraction = if segment > f64::EPSILON {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f64 + fraction) / (n - 1) as f64
    }
}
