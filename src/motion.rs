use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::camera::Camera;

/// A single camera movement or rotation, as bound to an input key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Motion {
    MoveFront,
    MoveBack,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
}

impl Motion {
    pub const ALL: [Motion; 12] = [
        Motion::MoveFront, Motion::MoveBack,
        Motion::MoveLeft, Motion::MoveRight,
        Motion::MoveUp, Motion::MoveDown,
        Motion::PitchUp, Motion::PitchDown,
        Motion::YawLeft, Motion::YawRight,
        Motion::RollLeft, Motion::RollRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Motion::MoveFront => "move-front",
            Motion::MoveBack => "move-back",
            Motion::MoveLeft => "move-left",
            Motion::MoveRight => "move-right",
            Motion::MoveUp => "move-up",
            Motion::MoveDown => "move-down",
            Motion::PitchUp => "pitch-up",
            Motion::PitchDown => "pitch-down",
            Motion::YawLeft => "yaw-left",
            Motion::YawRight => "yaw-right",
            Motion::RollLeft => "roll-left",
            Motion::RollRight => "roll-right",
        }
    }

    /// Whether this motion turns the camera rather than moving it.
    pub fn is_rotation(&self) -> bool {
        !matches!(self,
            Motion::MoveFront | Motion::MoveBack
            | Motion::MoveLeft | Motion::MoveRight
            | Motion::MoveUp | Motion::MoveDown)
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Motion {
    type Err = String;

    fn from_str(s: &str) -> Result<Motion, String> {
        Motion::ALL.iter()
            .find(|m| m.name() == s)
            .copied()
            .ok_or_else(|| format!("Unrecognized camera motion '{}'.", s))
    }
}

impl Camera {
    /// Applies one motion for `delta_time` seconds of input.
    ///
    /// Movements travel `move_speed * delta_time`, rotations turn by
    /// `rotate_speed * delta_time`.
    pub fn apply(&mut self, motion: Motion, delta_time: f64) {
        let amount = if motion.is_rotation() {
            self.rotate_speed * delta_time
        } else {
            self.move_speed * delta_time
        };
        trace!("Camera {} by {}", motion, amount);

        match motion {
            Motion::MoveFront => self.move_front(amount),
            Motion::MoveBack => self.move_back(amount),
            Motion::MoveLeft => self.move_left(amount),
            Motion::MoveRight => self.move_right(amount),
            Motion::MoveUp => self.move_up(amount),
            Motion::MoveDown => self.move_down(amount),
            Motion::PitchUp => self.pitch_up(amount),
            Motion::PitchDown => self.pitch_down(amount),
            Motion::YawLeft => self.yaw_left(amount),
            Motion::YawRight => self.yaw_right(amount),
            Motion::RollLeft => self.roll_left(amount),
            Motion::RollRight => self.roll_right(amount),
        }
    }
}

/// What a frame loop should do with the current frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameAction {
    /// Render in low resolution; the camera is moving.
    Preview,

    /// Render in full resolution.
    Full,

    /// Keep the previous image.
    Skip,
}

impl FrameAction {
    /// The `low_resolution` argument for `render`, if anything is rendered.
    pub fn low_resolution(&self) -> Option<bool> {
        match self {
            FrameAction::Preview => Some(true),
            FrameAction::Full => Some(false),
            FrameAction::Skip => None,
        }
    }
}

/// Decides per frame between a quick preview, a full render, or nothing.
///
/// The camera renders coarsely while it moves, once in full as soon as it
/// stops, and not again until it moves. The very first frame is full.
#[derive(Clone, Debug, Default)]
pub struct ResolutionPolicy {
    rendered: bool,
    moving: bool,
}

impl ResolutionPolicy {
    pub fn new() -> ResolutionPolicy {
        Default::default()
    }

    /// Advances one frame. `moved` says whether any motion was applied to
    /// the camera during this frame.
    pub fn next_frame(&mut self, moved: bool) -> FrameAction {
        let action = if moved {
            FrameAction::Preview
        } else if self.moving || !self.rendered {
            FrameAction::Full
        } else {
            FrameAction::Skip
        };

        self.moving = moved;
        self.rendered = true;
        action
    }
}

#[test]
fn motion_names_round_trip() {
    for m in Motion::ALL.iter() {
        assert_eq!(m.name().parse::<Motion>(), Ok(*m));
    }

    assert!("jump".parse::<Motion>().is_err());
}

#[test]
fn apply_scales_by_speed_and_time() {
    use crate::vector::Vector3D;

    let mut c = Camera::new(16, 9);
    c.move_speed = 4.0;
    c.rotate_speed = 2.0;

    c.apply(Motion::MoveFront, 0.5);
    assert_eq!(c.position, Vector3D::new(0.0, 0.0, 2.0));

    c.apply(Motion::YawLeft, 0.25);
    assert_eq!(c.yaw, 0.5);

    c.apply(Motion::PitchDown, 0.1);
    assert!((c.pitch + 0.2).abs() < 1e-12);
}

#[test]
fn apply_refreshes_orientation() {
    let mut c = Camera::new(16, 9);
    c.rotate_speed = std::f64::consts::FRAC_PI_2;

    c.apply(Motion::YawLeft, 1.0);

    assert!((c.forward.x - 1.0).abs() < 1e-12);
    assert!(c.forward.z.abs() < 1e-12);
}

#[test]
fn policy_first_frame_is_full() {
    let mut p = ResolutionPolicy::new();

    assert_eq!(p.next_frame(false), FrameAction::Full);
    assert_eq!(p.next_frame(false), FrameAction::Skip);
}

#[test]
fn policy_previews_while_moving_then_renders_once() {
    let mut p = ResolutionPolicy::new();
    p.next_frame(false);

    assert_eq!(p.next_frame(true), FrameAction::Preview);
    assert_eq!(p.next_frame(true), FrameAction::Preview);
    assert_eq!(p.next_frame(false), FrameAction::Full);
    assert_eq!(p.next_frame(false), FrameAction::Skip);
    assert_eq!(p.next_frame(false), FrameAction::Skip);

    assert_eq!(p.next_frame(true), FrameAction::Preview);
    assert_eq!(p.next_frame(false), FrameAction::Full);
}

#[test]
fn action_maps_to_render_argument() {
    assert_eq!(FrameAction::Preview.low_resolution(), Some(true));
    assert_eq!(FrameAction::Full.low_resolution(), Some(false));
    assert_eq!(FrameAction::Skip.low_resolution(), None);
}
