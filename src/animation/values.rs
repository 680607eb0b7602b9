use glam::Vec3;

/// Values that animation curves can blend between.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Cubic Bezier through control points `p0..p3` at parameter `u` in `[0, 1]`.
    fn interpolate_bezier(p0: Self, p1: Self, p2: Self, p3: Self, u: f32) -> Self;

    /// `false` if any component is NaN or infinite.
    fn is_finite_value(self) -> bool;
}

/// Bernstein weights `(1-u)^3, 3(1-u)^2 u, 3(1-u) u^2, u^3`.
#[inline]
fn bernstein(u: f32) -> [f32; 4] {
    let v = 1.0 - u;
    [v * v * v, 3.0 * v * v * u, 3.0 * v * u * u, u * u * u]
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_bezier(p0: Self, p1: Self, p2: Self, p3: Self, u: f32) -> Self {
        let [b0, b1, b2, b3] = bernstein(u);
        b0 * p0 + b1 * p1 + b2 * p2 + b3 * p3
    }

    fn is_finite_value(self) -> bool {
        self.is_finite()
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_bezier(p0: Self, p1: Self, p2: Self, p3: Self, u: f32) -> Self {
        let [b0, b1, b2, b3] = bernstein(u);
        p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
    }

    fn is_finite_value(self) -> bool {
        self.is_finite()
    }
}
