use cgmath::{InnerSpace, Matrix, Vector3};
use popcorn::{
    flight::{AttitudeState, ControlSample, FlightIntegrator},
    settings::FlightConfig,
};

const EPS: f32 = 1e-4;

fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < EPS, "{:?} != {:?}", a, b);
}

fn at_rest(state: &AttitudeState) -> bool {
    let rest = AttitudeState::default();
    state.orientation == rest.orientation
        && state.position == rest.position
        && state.speed == 0.0
        && state.acceleration == 0.0
}

/// Deterministic samples in the ranges the input layer produces.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }

    fn signed(&mut self) -> f32 {
        self.next() * 2.0 - 1.0
    }

    fn sample(&mut self) -> ControlSample {
        ControlSample {
            roll: self.signed(),
            pitch: self.signed(),
            head_x: self.signed(),
            head_y: self.signed(),
            yaw1: self.next(),
            yaw2: self.next(),
            accel_delta: (self.next() * 3.0).floor() - 1.0,
            reset: self.next() < 0.01,
        }
    }
}

#[test]
fn should_keep_state_valid_under_random_input() {
    let config = FlightConfig::default();
    let mut flight = FlightIntegrator::new(config);
    let mut rng = Lcg(7);

    for _ in 0..5000 {
        let frame = flight.step(&rng.sample());
        let state = flight.state();

        assert!((state.orientation.magnitude() - 1.0).abs() < EPS);
        assert!((0.0..=config.max_speed).contains(&state.speed));
        for c in [state.position.x, state.position.y, state.position.z] {
            assert!(c.abs() <= config.bound);
        }
        assert!((frame.forward.magnitude() - 1.0).abs() < EPS);
        if frame.collided {
            assert!(at_rest(state));
        }
    }
}

#[test]
fn should_saturate_speed_and_reset_on_leaving_the_bounds() {
    let config = FlightConfig::default();
    let mut flight = FlightIntegrator::new(config);
    let push = ControlSample {
        accel_delta: 1.0,
        ..ControlSample::default()
    };
    let coast = ControlSample::default();

    flight.step(&push);
    for _ in 1..100 {
        assert!(!flight.step(&coast).collided);
    }
    let state = flight.state();
    assert!((state.speed - config.max_speed).abs() < 1e-7);
    assert_eq!(state.acceleration, 1.0);
    assert!(state.position.x > 0.3 && state.position.x < 0.4);
    assert_close(Vector3::new(0.0, state.position.y, state.position.z), Vector3::new(0.0, 0.0, 0.0));

    let mut frames = 100;
    while !flight.step(&coast).collided {
        frames += 1;
        assert!(frames < 300, "never left the bounds");
    }
    frames += 1;

    assert!((220..=230).contains(&frames), "collided after {} frames", frames);
    assert!(at_rest(flight.state()));
    // the pending acceleration went with the reset
    flight.step(&coast);
    assert_eq!(flight.state().speed, 0.0);
}

#[test]
fn should_roll_about_the_current_nose() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    let yaw = ControlSample {
        yaw1: 1.0,
        ..ControlSample::default()
    };
    for _ in 0..120 {
        flight.step(&yaw);
    }
    let forward = flight.state().forward();
    assert!(forward.x.abs() < EPS, "{:?}", forward);
    assert!((forward.y.abs() - 1.0).abs() < EPS, "{:?}", forward);

    let roll = ControlSample {
        roll: 1.0,
        ..ControlSample::default()
    };
    for _ in 0..60 {
        flight.step(&roll);
    }

    assert_close(flight.state().forward(), forward);
}

#[test]
fn should_cancel_opposing_triggers() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    let both = ControlSample {
        yaw1: 1.0,
        yaw2: 1.0,
        ..ControlSample::default()
    };
    for _ in 0..30 {
        flight.step(&both);
    }
    assert_close(flight.state().forward(), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn should_look_down_the_forward_axis_without_head_look() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    let mut rng = Lcg(42);

    for _ in 0..200 {
        let sample = ControlSample {
            head_x: 0.0,
            head_y: 0.0,
            reset: false,
            ..rng.sample()
        };
        let frame = flight.step(&sample);
        let row = frame.view.transpose().z.truncate();
        assert_close(-row, frame.forward);
    }
}

#[test]
fn should_turn_the_head_without_turning_the_craft() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    let look = ControlSample {
        head_x: 1.0,
        head_y: -0.5,
        ..ControlSample::default()
    };

    let frame = flight.step(&look);

    let state = flight.state();
    assert_eq!(state.head_yaw, -60.0);
    assert_eq!(state.head_pitch, -15.0);
    assert_eq!(state.orientation, AttitudeState::default().orientation);
    assert_close(frame.forward, Vector3::new(1.0, 0.0, 0.0));
    assert_ne!(frame.cockpit_view, AttitudeState::default().cockpit_view());
}

#[test]
fn should_reset_before_integrating_the_frame() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    let wild = ControlSample {
        pitch: 1.0,
        accel_delta: 1.0,
        ..ControlSample::default()
    };
    for _ in 0..20 {
        flight.step(&wild);
    }
    assert!(!at_rest(flight.state()));

    flight.step(&ControlSample {
        reset: true,
        head_x: 0.5,
        ..ControlSample::default()
    });

    let state = flight.state();
    assert!(at_rest(state));
    assert_eq!(state.head_yaw, -30.0);
}

#[test]
fn should_reset_on_request() {
    let mut flight = FlightIntegrator::new(FlightConfig::default());
    flight.step(&ControlSample {
        roll: 1.0,
        accel_delta: 1.0,
        ..ControlSample::default()
    });

    flight.reset();

    assert!(at_rest(flight.state()));
}
