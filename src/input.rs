//! Input events and how they steer the craft.
//!
//! The host delivers a stream of [`InputEvent`]s. [`InputState`] folds them into
//! the [`ControlSample`] the integrator consumes once per frame and watches for
//! the double tap on the cancel key that ends the demo.
//!
//! Without a gamepad the keyboard stands in for one, see [`KeyboardPad`].

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::flight::ControlSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Gamepad axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Left stick horizontal: roll.
    X1,
    /// Left stick vertical: pitch.
    Y1,
    /// Right stick horizontal: head-look.
    X2,
    /// Right stick vertical: head-look.
    Y2,
    LeftTrigger,
    RightTrigger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    X,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyUp(Key),
    KeyDown { key: Key, repeat: bool },
    AxisMove { axis: Axis, value: f32 },
    ButtonUp(Button),
    ButtonDown(Button),
}

/// What the host should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Exit,
}

/// Two presses of the cancel key less than [`EscapeGesture::WINDOW`] apart.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeGesture {
    last: Option<f64>,
}

impl EscapeGesture {
    /// Seconds.
    pub const WINDOW: f64 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press at `now` seconds. Returns true on the second tap.
    pub fn press(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last < Self::WINDOW => true,
            _ => {
                self.last = Some(now);
                false
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    sample: ControlSample,
    escape: EscapeGesture,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `event`, received at `now` seconds, into the pending sample.
    pub fn handle(&mut self, event: &InputEvent, now: f64) -> Signal {
        let sample = &mut self.sample;
        match *event {
            InputEvent::KeyUp(Key::Escape)
            | InputEvent::KeyDown {
                key: Key::Escape,
                repeat: true,
            } => {
                if self.escape.press(now) {
                    log::info!("exit requested");
                    return Signal::Exit;
                }
            }
            InputEvent::KeyUp(_) | InputEvent::KeyDown { .. } => {}
            InputEvent::AxisMove { axis, value } => {
                let slot = match axis {
                    Axis::X1 => &mut sample.roll,
                    Axis::Y1 => &mut sample.pitch,
                    Axis::X2 => &mut sample.head_x,
                    Axis::Y2 => &mut sample.head_y,
                    Axis::LeftTrigger => &mut sample.yaw1,
                    Axis::RightTrigger => &mut sample.yaw2,
                };
                *slot = value;
            }
            InputEvent::ButtonUp(Button::A) => sample.accel_delta += 1.0,
            InputEvent::ButtonUp(Button::B) => sample.accel_delta -= 1.0,
            InputEvent::ButtonUp(Button::X) => {
                // Edges before the reset do not survive it.
                sample.accel_delta = 0.0;
                sample.reset = true;
            }
            InputEvent::ButtonDown(Button::A) => sample.accel_delta -= 1.0,
            InputEvent::ButtonDown(Button::B) => sample.accel_delta += 1.0,
            InputEvent::ButtonDown(Button::X) => {}
        }
        Signal::Continue
    }

    /// The sample for this frame. Axes carry over, edges and resets do not.
    pub fn take_sample(&mut self) -> ControlSample {
        let sample = self.sample;
        self.sample.accel_delta = 0.0;
        self.sample.reset = false;
        sample
    }

    pub fn peek(&self) -> &ControlSample {
        &self.sample
    }
}

/// The two keys driving one stick axis.
#[derive(Clone, Copy, Debug, Default)]
struct KeyPair {
    negative: bool,
    positive: bool,
}

impl KeyPair {
    fn set(&mut self, positive: bool, pressed: bool) {
        if positive {
            self.positive = pressed;
        } else {
            self.negative = pressed;
        }
    }

    fn level(self) -> f32 {
        f32::from(u8::from(self.positive)) - f32::from(u8::from(self.negative))
    }
}

/// The keyboard standing in for a gamepad.
///
/// Arrows drive the left stick, I/J/K/L the right stick and Q/E the triggers.
/// Left Shift is button A, Space is B and R is X. A stick axis reads from both
/// of its keys, so releasing one while the other is held leaves the other in
/// effect.
#[derive(Clone, Debug, Default)]
pub struct KeyboardPad {
    roll: KeyPair,
    pitch: KeyPair,
    head_x: KeyPair,
    head_y: KeyPair,
}

impl KeyboardPad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_event(&mut self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.key(code, event.state == ElementState::Pressed, event.repeat)
    }

    /// Translate a press or release of `code`.
    pub fn key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> Option<InputEvent> {
        let (keys, axis, positive) = match code {
            KeyCode::ArrowLeft => (&mut self.roll, Axis::X1, false),
            KeyCode::ArrowRight => (&mut self.roll, Axis::X1, true),
            KeyCode::ArrowUp => (&mut self.pitch, Axis::Y1, false),
            KeyCode::ArrowDown => (&mut self.pitch, Axis::Y1, true),
            KeyCode::KeyJ => (&mut self.head_x, Axis::X2, false),
            KeyCode::KeyL => (&mut self.head_x, Axis::X2, true),
            KeyCode::KeyI => (&mut self.head_y, Axis::Y2, false),
            KeyCode::KeyK => (&mut self.head_y, Axis::Y2, true),
            _ => return Self::other_key(code, pressed, repeat),
        };
        keys.set(positive, pressed);
        Some(InputEvent::AxisMove {
            axis,
            value: keys.level(),
        })
    }

    fn other_key(code: KeyCode, pressed: bool, repeat: bool) -> Option<InputEvent> {
        let level = if pressed { 1.0 } else { 0.0 };
        let button = |button| match (pressed, repeat) {
            (true, false) => Some(InputEvent::ButtonDown(button)),
            (false, _) => Some(InputEvent::ButtonUp(button)),
            (true, true) => None,
        };

        match code {
            KeyCode::Escape if pressed => Some(InputEvent::KeyDown {
                key: Key::Escape,
                repeat,
            }),
            KeyCode::Escape => Some(InputEvent::KeyUp(Key::Escape)),
            KeyCode::KeyQ => Some(InputEvent::AxisMove {
                axis: Axis::LeftTrigger,
                value: level,
            }),
            KeyCode::KeyE => Some(InputEvent::AxisMove {
                axis: Axis::RightTrigger,
                value: level,
            }),
            KeyCode::ShiftLeft => button(Button::A),
            KeyCode::Space => button(Button::B),
            KeyCode::KeyR => button(Button::X),
            _ => None,
        }
    }
}
