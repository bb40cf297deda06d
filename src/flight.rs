//! Attitude and position integration, one step per frame.
//!
//! The orientation maps world space into the body frame of the craft, whose
//! axes are x forward, y right and z down. Each frame the control sample is
//! turned into a small body-frame rotation that is composed onto the
//! orientation; the craft then moves along its nose at the current speed. The
//! craft lives inside the cube `[-bound, bound]^3` and is put back at the
//! origin, level and at rest, as soon as it leaves it.

use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Quaternion, Rotation, Rotation3, Vector3,
};

use crate::settings::FlightConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub const NEAR: f32 = 0.001;
pub const FAR: f32 = 1000.0;

/// Vertical field of view, wider when the surface is taller than it is wide.
pub fn fovy(width: u32, height: u32) -> Deg<f32> {
    if height > width { Deg(60.0) } else { Deg(45.0) }
}

/// Perspective projection in wgpu clip space.
pub fn projection(width: u32, height: u32) -> Matrix4<f32> {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    OPENGL_TO_WGPU_MATRIX * cgmath::perspective(fovy(width, height), aspect, NEAR, FAR)
}

/// Body-frame nose direction.
const NOSE: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

fn identity() -> Quaternion<f32> {
    Quaternion::new(1.0, 0.0, 0.0, 0.0)
}

/// One frame of control input.
///
/// Axes are in `[-1, 1]` (triggers in `[0, 1]`) and hold their last value.
/// `accel_delta` is the sum of the button edges seen since the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSample {
    pub roll: f32,
    pub pitch: f32,
    pub head_x: f32,
    pub head_y: f32,
    pub yaw1: f32,
    pub yaw2: f32,
    pub accel_delta: f32,
    /// Return to the initial state before integrating this frame.
    pub reset: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttitudeState {
    pub orientation: Quaternion<f32>,
    pub position: Vector3<f32>,
    pub speed: f32,
    pub acceleration: f32,
    /// Camera-only rotation in degrees, never applied to the craft.
    pub head_yaw: f32,
    pub head_pitch: f32,
}

impl Default for AttitudeState {
    fn default() -> Self {
        Self {
            orientation: identity(),
            position: Vector3::new(0.0, 0.0, 0.0),
            speed: 0.0,
            acceleration: 0.0,
            head_yaw: 0.0,
            head_pitch: 0.0,
        }
    }
}

impl AttitudeState {
    /// Level, at rest, at the origin. Head-look is left alone.
    pub fn reset(&mut self) {
        self.orientation = identity();
        self.position = Vector3::new(0.0, 0.0, 0.0);
        self.speed = 0.0;
        self.acceleration = 0.0;
    }

    /// The nose direction in world space.
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation.conjugate().rotate_vector(NOSE)
    }

    /// World to view: the fixed look-at base, head-look, orientation, then the
    /// negated position.
    pub fn view(&self) -> Matrix4<f32> {
        let base = Matrix4::look_at_rh(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        base * Matrix4::from_angle_z(Deg(self.head_yaw))
            * Matrix4::from_angle_y(Deg(self.head_pitch))
            * Matrix4::from(self.orientation)
            * Matrix4::from_translation(-self.position)
    }

    /// View for geometry attached to the head rather than the world.
    pub fn cockpit_view(&self) -> Matrix4<f32> {
        let base = Matrix4::look_at_rh(
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        base * Matrix4::from_angle_z(Deg(-self.head_yaw)) * Matrix4::from_angle_x(Deg(self.head_pitch))
    }

    fn in_bounds(&self, bound: f32) -> bool {
        let p = self.position;
        [p.x, p.y, p.z].iter().all(|c| (-bound..=bound).contains(c))
    }
}

/// What a step hands to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightFrame {
    pub view: Matrix4<f32>,
    pub cockpit_view: Matrix4<f32>,
    pub forward: Vector3<f32>,
    /// The step ended outside the bounds and the state was reset.
    pub collided: bool,
}

#[derive(Debug)]
pub struct FlightIntegrator {
    config: FlightConfig,
    state: AttitudeState,
}

impl FlightIntegrator {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            config,
            state: AttitudeState::default(),
        }
    }

    pub fn state(&self) -> &AttitudeState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The rotation one frame of `sample` applies in the body frame.
    pub fn increment(&self, sample: &ControlSample) -> Quaternion<f32> {
        let rate = self.config.rate;
        let yaw = rate * (sample.yaw1 - sample.yaw2);
        let pitch = -rate * sample.pitch;
        let roll = -rate * sample.roll;
        Quaternion::from_angle_z(Deg(yaw))
            * Quaternion::from_angle_y(Deg(pitch))
            * Quaternion::from_angle_x(Deg(roll))
    }

    /// Advance one frame.
    pub fn step(&mut self, sample: &ControlSample) -> FlightFrame {
        let config = self.config;
        // The increment goes on the body side of a world-to-body rotation.
        let q = self.increment(sample);

        let state = &mut self.state;
        if sample.reset {
            state.reset();
        }
        state.acceleration += sample.accel_delta;
        state.head_yaw = -config.head_yaw_gain * sample.head_x;
        state.head_pitch = config.head_pitch_gain * sample.head_y;
        state.orientation = (q * state.orientation).normalize();

        let forward = state.forward();
        state.speed = (state.speed + config.accel_gain * state.acceleration).clamp(0.0, config.max_speed);
        state.position += state.speed * forward;

        let collided = !state.in_bounds(config.bound);
        if collided {
            log::debug!("left the bounds at {:?}, resetting", state.position);
            state.reset();
        }

        FlightFrame {
            view: state.view(),
            cockpit_view: state.cockpit_view(),
            forward: state.forward(),
            collided,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Matrix;

    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn should_widen_fov_in_portrait() {
        assert_eq!(fovy(480, 800), Deg(60.0));
        assert_eq!(fovy(800, 480), Deg(45.0));
        assert_eq!(fovy(600, 600), Deg(45.0));
    }

    #[test]
    fn should_look_along_the_nose_at_rest() {
        let state = AttitudeState::default();
        assert_close(state.forward(), Vector3::new(1.0, 0.0, 0.0));
        // The view matrix sends the nose down -z.
        let row = state.view().transpose().z.truncate();
        assert_close(-row, state.forward());
    }
}
