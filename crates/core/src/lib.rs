//! Scene math primitives shared across the ToZeMoon workspace.

/// Progress remapping and scalar interpolation.
pub mod easing {
    /// Linear interpolation between `a` and `b`.
    #[inline]
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Clamp a value into `[0, 1]`, mapping NaN to zero.
    #[inline]
    pub fn clamp01(t: f64) -> f64 {
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }

    /// Quintic smoother-step on `[0, 1]` (zero first and second derivative at both ends).
    #[inline]
    pub fn smootherstep(t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }
}

/// Critically damped smoothing of tracked values toward a moving target.
pub mod damping {
    use glam::DVec3;

    /// Values closer than this to their target snap onto it.
    pub const SNAP_EPSILON: f64 = 0.001;

    /// Rational approximation of `exp(-x)` used by the damper.
    #[inline]
    fn decay(x: f64) -> f64 {
        1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x)
    }

    /// Advance `current` toward `target` over `dt` seconds, carrying `velocity` between calls.
    ///
    /// `smooth_time` is roughly the time needed to close most of the gap. The step never
    /// overshoots the target, and a non-positive or non-finite `dt` leaves `current` untouched.
    pub fn smooth_damp(
        current: f64,
        target: f64,
        velocity: &mut f64,
        smooth_time: f64,
        dt: f64,
    ) -> f64 {
        if !dt.is_finite() || dt <= 0.0 {
            return current;
        }
        if (current - target).abs() <= SNAP_EPSILON {
            return target;
        }
        let smooth_time = smooth_time.max(1.0e-4);
        let omega = 2.0 / smooth_time;
        let t = decay(omega * dt);
        let change = current - target;
        let temp = (*velocity + omega * change) * dt;
        *velocity = (*velocity - omega * temp) * t;
        let mut output = target + (change + temp) * t;

        if (target - current > 0.0) == (output > target) {
            output = target;
            *velocity = 0.0;
        }
        output
    }

    /// A 3D value smoothed component-wise with per-axis velocity.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Damped3 {
        pub value: DVec3,
        pub velocity: DVec3,
    }

    impl Damped3 {
        pub fn new(value: DVec3) -> Self {
            Self {
                value,
                velocity: DVec3::ZERO,
            }
        }

        /// Move the tracked value toward `target` and return the new value.
        pub fn step(&mut self, target: DVec3, smooth_time: f64, dt: f64) -> DVec3 {
            let v = &mut self.velocity;
            self.value.x = smooth_damp(self.value.x, target.x, &mut v.x, smooth_time, dt);
            self.value.y = smooth_damp(self.value.y, target.y, &mut v.y, smooth_time, dt);
            self.value.z = smooth_damp(self.value.z, target.z, &mut v.z, smooth_time, dt);
            self.value
        }
    }
}

/// Sphere and segment helpers for the Earth/Moon scene.
pub mod geometry {
    use glam::DVec3;

    /// A point on a sphere surface together with its outward unit normal.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SurfacePoint {
        pub position: DVec3,
        pub normal: DVec3,
    }

    /// Project a latitude/longitude (degrees) onto a sphere of `radius` centred at `center`.
    ///
    /// Latitude runs along +Y; longitude rotates from +X toward +Z.
    pub fn lat_lon_to_surface(
        radius: f64,
        lat_deg: f64,
        lon_deg: f64,
        center: DVec3,
    ) -> SurfacePoint {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let local = DVec3::new(
            radius * lat.cos() * lon.cos(),
            radius * lat.sin(),
            radius * lat.cos() * lon.sin(),
        );
        SurfacePoint {
            position: center + local,
            normal: local.try_normalize().unwrap_or(DVec3::Y),
        }
    }

    /// Closest point to `point` on the segment `start..end`.
    pub fn closest_point_on_segment(start: DVec3, end: DVec3, point: DVec3) -> DVec3 {
        let d = end - start;
        let len_sq = d.length_squared();
        if len_sq <= f64::EPSILON {
            return start;
        }
        let t = ((point - start).dot(d) / len_sq).clamp(0.0, 1.0);
        start + d * t
    }

    /// Push `point` radially out of the sphere `(center, min_distance)` if it lies inside.
    ///
    /// A point sitting exactly on the centre is pushed along +Y.
    pub fn push_outside_sphere(point: DVec3, center: DVec3, min_distance: f64) -> DVec3 {
        let v = point - center;
        if v.length() >= min_distance {
            return point;
        }
        let dir = v.try_normalize().unwrap_or(DVec3::Y);
        center + dir * min_distance
    }
}
