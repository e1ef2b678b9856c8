//! Hero card tilt.
//!
//! Input samples (pointer position, device orientation, device motion) are
//! normalized to a raw target in `[-1, 1]²`. A damped spring chases that
//! target, and the spring position maps linearly onto the card transform.
//! Non-finite samples are dropped, so every output stays bounded.

/// Stiffness, damping and mass of the smoothing spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

pub const SPRING: SpringConfig = SpringConfig {
    stiffness: 95.0,
    damping: 16.0,
    mass: 0.7,
};

/// Integration step for [`Spring::advance`], in seconds.
const STEP: f64 = 1.0 / 120.0;

/// Longest span integrated in one [`Spring::advance`] call. The spring is
/// settled well within it.
const MAX_SPAN: f64 = 2.0;

/// Distance and speed below which the spring snaps onto its target.
const REST: f64 = 1e-6;

fn clamp_unit(v: f64) -> f64 {
    v.clamp(-1.0, 1.0)
}

/// Linear map of `v ∈ [-1, 1]` onto `[from, to]`.
fn lerp_unit(v: f64, from: f64, to: f64) -> f64 {
    from + (clamp_unit(v) + 1.0) / 2.0 * (to - from)
}

/// Which input stream drives the tilt, chosen from the pointer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltInput {
    /// Fine pointer: mouse position over the window.
    Pointer,
    /// Coarse pointer: device orientation and motion.
    Device,
}

/// One-dimensional damped spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn is_at_rest(&self) -> bool {
        self.position == self.target && self.velocity == 0.0
    }

    /// Advance the simulation by `dt` seconds with semi-implicit Euler steps.
    ///
    /// Spans longer than two seconds are integrated as two seconds. A NaN
    /// span is ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_nan() || self.is_at_rest() {
            return;
        }
        let mut remaining = dt.clamp(0.0, MAX_SPAN);
        while remaining > 0.0 {
            let h = remaining.min(STEP);
            let force = -self.config.stiffness * (self.position - self.target)
                - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.position += self.velocity * h;
            remaining -= h;
        }
        if (self.position - self.target).abs() < REST && self.velocity.abs() < REST {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }
}

/// The transform applied to the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub glare_x: f64,
    pub glare_y: f64,
}

impl TiltTransform {
    pub fn from_unit(x: f64, y: f64) -> Self {
        Self {
            rotate_y: lerp_unit(x, -14.0, 14.0),
            rotate_x: lerp_unit(y, 10.0, -10.0),
            translate_x: lerp_unit(x, -120.0, 120.0),
            translate_y: lerp_unit(y, -60.0, 60.0),
            glare_x: lerp_unit(x, 0.0, 100.0),
            glare_y: lerp_unit(y, 0.0, 100.0),
        }
    }

    pub fn neutral() -> Self {
        Self::from_unit(0.0, 0.0)
    }

    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "translate3d({:.1}px, {:.1}px, 0) rotateX({:.2}deg) rotateY({:.2}deg)",
            self.translate_x, self.translate_y, self.rotate_x, self.rotate_y
        )
    }
}

/// Raw target plus the springs chasing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    x: Spring,
    y: Spring,
}

impl Default for Tilt {
    fn default() -> Self {
        Self {
            x: Spring::new(SPRING),
            y: Spring::new(SPRING),
        }
    }
}

impl Tilt {
    /// Pointer at `(client_x, client_y)` in a `width × height` window.
    /// Samples with an empty window or a non-finite value are ignored.
    pub fn pointer(&mut self, client_x: f64, client_y: f64, width: f64, height: f64) {
        let finite = [client_x, client_y, width, height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || width <= 0.0 || height <= 0.0 {
            return;
        }
        let nx = clamp_unit(client_x / width * 2.0 - 1.0);
        let ny = clamp_unit(client_y / height * 2.0 - 1.0);
        self.x.set_target(clamp_unit(nx * 1.2));
        self.y.set_target(clamp_unit(ny * 1.1));
    }

    /// Device orientation in degrees. A missing or non-finite gamma ignores
    /// the sample; a non-finite beta leaves the vertical target alone.
    pub fn orientation(&mut self, beta: Option<f64>, gamma: Option<f64>) {
        let Some(gamma) = gamma.filter(|g| g.is_finite()) else {
            return;
        };
        self.x.set_target(clamp_unit(gamma / 12.0));
        if let Some(beta) = beta.filter(|b| b.is_finite()) {
            self.y.set_target(clamp_unit((beta - 45.0) / 22.0));
        }
    }

    /// Device acceleration including gravity along x, in m/s². A missing
    /// reading means level; a non-finite one is ignored.
    pub fn motion(&mut self, accel_x: Option<f64>) {
        let accel_x = accel_x.unwrap_or(0.0);
        if !accel_x.is_finite() {
            return;
        }
        self.x.set_target(clamp_unit(accel_x / 3.2));
    }

    /// Pointer left the window, or the listeners were removed.
    pub fn reset(&mut self) {
        self.x.set_target(0.0);
        self.y.set_target(0.0);
    }

    pub fn advance(&mut self, dt: f64) {
        self.x.advance(dt);
        self.y.advance(dt);
    }

    pub fn target(&self) -> (f64, f64) {
        (self.x.target, self.y.target)
    }

    pub fn transform(&self) -> TiltTransform {
        TiltTransform::from_unit(self.x.position(), self.y.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_transform_is_centered() {
        let t = TiltTransform::neutral();
        assert_eq!(t.rotate_x, 0.0);
        assert_eq!(t.rotate_y, 0.0);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.glare_x, 50.0);
    }

    #[test]
    fn extremes_hit_bounds() {
        let t = TiltTransform::from_unit(1.0, 1.0);
        assert_eq!(t.rotate_y, 14.0);
        assert_eq!(t.rotate_x, -10.0);
        assert_eq!(t.translate_x, 120.0);
        assert_eq!(t.translate_y, 60.0);
        assert_eq!((t.glare_x, t.glare_y), (100.0, 100.0));

        let t = TiltTransform::from_unit(-5.0, -5.0);
        assert_eq!(t.rotate_y, -14.0);
        assert_eq!(t.rotate_x, 10.0);
    }

    #[test]
    fn pointer_maps_to_boosted_unit() {
        let mut tilt = Tilt::default();
        tilt.pointer(1000.0, 400.0, 1000.0, 800.0);
        assert_eq!(tilt.target(), (1.0, 0.0));

        tilt.pointer(750.0, 600.0, 1000.0, 800.0);
        let (x, y) = tilt.target();
        assert!((x - 0.6).abs() < 1e-9);
        assert!((y - 0.55).abs() < 1e-9);
    }

    #[test]
    fn pointer_outside_window_is_clamped() {
        let mut tilt = Tilt::default();
        tilt.pointer(-500.0, 5000.0, 1000.0, 800.0);
        assert_eq!(tilt.target(), (-1.0, 1.0));
    }

    #[test]
    fn zero_sized_window_is_ignored() {
        let mut tilt = Tilt::default();
        tilt.pointer(10.0, 10.0, 0.0, 800.0);
        assert_eq!(tilt.target(), (0.0, 0.0));
    }

    #[test]
    fn orientation_mapping() {
        let mut tilt = Tilt::default();
        tilt.orientation(Some(67.0), Some(6.0));
        let (x, y) = tilt.target();
        assert!((x - 0.5).abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);

        // No gamma: sample ignored entirely
        tilt.orientation(Some(0.0), None);
        assert!((tilt.target().1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn motion_mapping() {
        let mut tilt = Tilt::default();
        tilt.motion(Some(-1.6));
        assert!((tilt.target().0 + 0.5).abs() < 1e-9);
        tilt.motion(None);
        assert_eq!(tilt.target().0, 0.0);
    }

    #[test]
    fn spring_settles_on_target() {
        let mut tilt = Tilt::default();
        tilt.pointer(1000.0, 800.0, 1000.0, 800.0);
        tilt.advance(3.0);
        let t = tilt.transform();
        assert!((t.rotate_y - 14.0).abs() < 0.05);
        assert!((t.rotate_x + 10.0).abs() < 0.05);
    }

    #[test]
    fn spring_output_stays_bounded_under_overshoot() {
        let mut tilt = Tilt::default();
        tilt.pointer(1000.0, 800.0, 1000.0, 800.0);
        for _ in 0..300 {
            tilt.advance(0.01);
            let t = tilt.transform();
            assert!(t.rotate_y.abs() <= 14.0);
            assert!(t.translate_y.abs() <= 60.0);
        }
    }

    #[test]
    fn reset_returns_to_neutral() {
        let mut tilt = Tilt::default();
        tilt.pointer(0.0, 0.0, 1000.0, 800.0);
        tilt.advance(1.0);
        tilt.reset();
        tilt.advance(3.0);
        assert!(tilt.transform().rotate_y.abs() < 0.05);
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut tilt = Tilt::default();
        tilt.pointer(750.0, 600.0, 1000.0, 800.0);
        let before = tilt.target();

        tilt.pointer(f64::NAN, 10.0, 1000.0, 800.0);
        tilt.pointer(10.0, f64::INFINITY, 1000.0, 800.0);
        tilt.pointer(10.0, 10.0, f64::INFINITY, 800.0);
        tilt.pointer(10.0, 10.0, 1000.0, f64::NAN);
        tilt.orientation(Some(0.0), Some(f64::NAN));
        tilt.motion(Some(f64::NEG_INFINITY));
        assert_eq!(tilt.target(), before);

        // Finite gamma still applies when only beta is bad
        tilt.orientation(Some(f64::NAN), Some(-6.0));
        assert!((tilt.target().0 + 0.5).abs() < 1e-9);
        assert_eq!(tilt.target().1, before.1);

        tilt.advance(0.5);
        let t = tilt.transform();
        for v in [t.rotate_x, t.rotate_y, t.translate_x, t.translate_y, t.glare_x, t.glare_y] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn huge_span_settles_without_spinning() {
        let mut tilt = Tilt::default();
        tilt.pointer(1000.0, 800.0, 1000.0, 800.0);
        let started = std::time::Instant::now();
        tilt.advance(u64::MAX as f64 / 1000.0);
        tilt.advance(f64::INFINITY);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(tilt.transform(), TiltTransform::from_unit(1.0, 1.0));
    }

    #[test]
    fn spring_snaps_to_rest() {
        let mut spring = Spring::new(SPRING);
        assert!(spring.is_at_rest());
        spring.set_target(0.4);
        assert!(!spring.is_at_rest());
        spring.advance(2.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 0.4);

        spring.advance(f64::NAN);
        assert_eq!(spring.position(), 0.4);
    }

    #[test]
    fn css_output() {
        assert_eq!(
            TiltTransform::neutral().to_css(),
            "translate3d(0.0px, 0.0px, 0) rotateX(0.00deg) rotateY(0.00deg)"
        );
    }
}
