use crate::carousel::config::SpringParams;

/// Largest frame delta fed into the integrator; longer stalls are clamped so
/// a hitching main loop cannot destabilize the solver.
const MAX_FRAME_DELTA_SECONDS: f64 = 0.064;
/// Below these, the spring snaps to its target and reports settled.
const POSITION_EPSILON_PX: f64 = 0.1;
const VELOCITY_EPSILON_PX_PER_S: f64 = 1.0;

/// Damped harmonic oscillator driving the strip offset.
///
/// Stepped with semi-implicit Euler from the widget's frame timer. Purely
/// presentational: retargeting pre-empts the motion in place (position and
/// velocity carry over), so navigation is never blocked by an in-flight
/// animation.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
}

impl Spring {
    pub fn new(position: f64, params: SpringParams) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: position,
            params,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
    }

    /// Retarget without disturbing the current motion.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump to a value with no animation.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < POSITION_EPSILON_PX
            && self.velocity.abs() < VELOCITY_EPSILON_PX_PER_S
    }

    /// Advance the simulation by `dt_seconds`. Returns true once settled,
    /// at which point the position has been snapped exactly onto the target.
    pub fn step(&mut self, dt_seconds: f64) -> bool {
        if self.is_settled() {
            self.snap_to(self.target);
            return true;
        }
        let dt = dt_seconds.clamp(0.0, MAX_FRAME_DELTA_SECONDS);
        if dt <= 0.0 {
            return false;
        }

        let mass = self.params.mass.max(f64::EPSILON);
        let displacement = self.position - self.target;
        let acceleration =
            (-self.params.stiffness * displacement - self.params.damping * self.velocity) / mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        if self.is_settled() {
            self.snap_to(self.target);
            return true;
        }
        false
    }
}
