use std::f64::consts::PI;

use crate::vector::Vector3D;
use crate::consts::{ VIEWPORT_WIDTH, VIEWPORT_HEIGHT, VIEWPORT_DISTANCE,
    RAY_T_MIN, RAY_T_MAX, MOVE_SPEED, ROTATE_SPEED, PITCH_RANGE, ROLL_RANGE,
    CANVAS_WIDTH, CANVAS_HEIGHT };

const TWO_PI: f64 = 2.0 * PI;

/// The viewer.
///
/// Holds where the camera is, which way it faces, and the viewport the rays
/// are cast through. The `forward`, `right` and `up` basis is derived from
/// `yaw`, `pitch` and `roll` by `update_orientation`; the rotation mutators
/// below refresh it themselves, so after any of them the basis is a valid
/// orthonormal frame again.
///
/// Construction does not validate anything. A positive size and a sensible
/// ray range are the caller's responsibility.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the framebuffer, in pixels.
    pub width: usize,

    /// The vertical size of the framebuffer, in pixels.
    pub height: usize,

    pub viewport_width: f64,
    pub viewport_height: f64,
    pub viewport_distance: f64,

    pub position: Vector3D,

    /// Ray parameters outside `[ray_t_min, ray_t_max]` are not visible.
    pub ray_t_min: f64,
    pub ray_t_max: f64,

    /// Rotations, in radians.
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,

    pub pitch_range: f64,
    pub roll_range: f64,

    /// World units per second of movement input.
    pub move_speed: f64,

    /// Radians per second of rotation input.
    pub rotate_speed: f64,

    pub forward: Vector3D,
    pub right: Vector3D,
    pub up: Vector3D,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl Camera {
    /// Creates a camera at the origin looking down `+z`.
    pub fn new(width: usize, height: usize) -> Camera {
        let mut camera = Camera {
            width,
            height,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            viewport_distance: VIEWPORT_DISTANCE,
            position: Vector3D::zero(),
            ray_t_min: RAY_T_MIN,
            ray_t_max: RAY_T_MAX,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            pitch_range: PITCH_RANGE,
            roll_range: ROLL_RANGE,
            move_speed: MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            forward: Vector3D::zero(),
            right: Vector3D::zero(),
            up: Vector3D::zero(),
        };

        camera.update_orientation();
        camera
    }

    /// Checks whether a ray parameter lies in `[ray_t_min, ray_t_max]`.
    pub fn in_range(&self, ray_t: f64) -> bool {
        self.ray_t_min <= ray_t && ray_t <= self.ray_t_max
    }

    pub fn move_front(&mut self, amount: f64) {
        self.position = self.position + self.forward * amount;
    }

    pub fn move_back(&mut self, amount: f64) {
        self.position = self.position - self.forward * amount;
    }

    pub fn move_right(&mut self, amount: f64) {
        self.position = self.position + self.right * amount;
    }

    pub fn move_left(&mut self, amount: f64) {
        self.position = self.position - self.right * amount;
    }

    pub fn move_up(&mut self, amount: f64) {
        self.position = self.position + self.up * amount;
    }

    pub fn move_down(&mut self, amount: f64) {
        self.position = self.position - self.up * amount;
    }

    pub fn pitch_up(&mut self, amount: f64) {
        self.pitch = (self.pitch + amount)
            .clamp(-self.pitch_range, self.pitch_range);
        self.update_orientation();
    }

    pub fn pitch_down(&mut self, amount: f64) {
        self.pitch = (self.pitch - amount)
            .clamp(-self.pitch_range, self.pitch_range);
        self.update_orientation();
    }

    /// Turns the camera by increasing `yaw`.
    ///
    /// Once `yaw` passes `2π` it resets to exactly zero; the overshoot is
    /// dropped rather than carried over.
    pub fn yaw_left(&mut self, amount: f64) {
        self.yaw += amount;
        if self.yaw > TWO_PI {
            self.yaw = 0.0;
        }
        self.update_orientation();
    }

    /// Turns the camera by decreasing `yaw`, resetting to zero below `-2π`.
    pub fn yaw_right(&mut self, amount: f64) {
        self.yaw -= amount;
        if self.yaw < -TWO_PI {
            self.yaw = 0.0;
        }
        self.update_orientation();
    }

    /// Rolls counter-clockwise. Only the upper bound is checked here.
    pub fn roll_left(&mut self, amount: f64) {
        self.roll += amount;
        if self.roll > self.roll_range {
            self.roll = self.roll_range;
        }
        self.update_orientation();
    }

    /// Rolls clockwise. Only the lower bound is checked here.
    pub fn roll_right(&mut self, amount: f64) {
        self.roll -= amount;
        if self.roll < -self.roll_range {
            self.roll = -self.roll_range;
        }
        self.update_orientation();
    }

    /// Recomputes `forward`, `right` and `up` from the rotation angles.
    ///
    /// `forward` follows yaw and pitch, `right` is taken against the world
    /// up axis `(0, 1, 0)`, and a non-zero roll then turns `right` and `up`
    /// around `forward`.
    pub fn update_orientation(&mut self) {
        let world_up = Vector3D::new(0.0, 1.0, 0.0);

        self.forward = Vector3D::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ).normalize();
        self.right = self.forward.cross(&world_up).normalize();
        self.up = self.right.cross(&self.forward).normalize();

        if self.roll != 0.0 {
            let (sin, cos) = self.roll.sin_cos();
            let right = self.right * cos + self.up * sin;
            let up = self.up * cos - self.right * sin;

            self.right = right;
            self.up = up;
        }
    }

    /// Maps a pixel offset from the image center onto the viewport plane.
    ///
    /// The result is in camera space: `x` along `right`, `y` along `up` and
    /// `z` along `forward`.
    pub fn canvas_to_viewport(&self, x: i64, y: i64) -> Vector3D {
        Vector3D::new(
            x as f64 * (self.viewport_width / self.width as f64),
            y as f64 * (self.viewport_height / self.height as f64),
            self.viewport_distance,
        )
    }

    /// The world-space ray direction through a viewport point.
    ///
    /// The direction is deliberately left unnormalized; intersection
    /// parameters are measured in multiples of it.
    pub fn ray_direction(&self, viewport: Vector3D) -> Vector3D {
        self.forward * viewport.z + self.right * viewport.x + self.up * viewport.y
    }
}

#[cfg(test)]
fn assert_orthonormal(c: &Camera) {
    use crate::feq;

    assert!(feq(c.forward.magnitude(), 1.0));
    assert!(feq(c.right.magnitude(), 1.0));
    assert!(feq(c.up.magnitude(), 1.0));
    assert!(feq(c.forward.dot(&c.right), 0.0));
    assert!(feq(c.forward.dot(&c.up), 0.0));
    assert!(feq(c.right.dot(&c.up), 0.0));
}

#[test]
fn default_orientation_looks_down_z() {
    let c = Camera::new(100, 50);

    assert_eq!(c.forward, Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.right, Vector3D::new(-1.0, 0.0, 0.0));
    assert_eq!(c.up, Vector3D::new(0.0, 1.0, 0.0));
}

#[test]
fn basis_stays_orthonormal() {
    let mut c = Camera::new(100, 50);

    c.yaw_left(0.7);
    c.pitch_up(0.4);
    c.roll_left(0.3);
    assert_orthonormal(&c);

    c.yaw_right(2.9);
    c.pitch_down(1.1);
    c.roll_right(0.6);
    assert_orthonormal(&c);
}

#[test]
fn roll_turns_right_and_up_around_forward() {
    let mut c = Camera::new(100, 50);
    c.roll_range = PI;
    c.roll_left(PI / 2.0);

    assert_eq!(c.forward, Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.right, Vector3D::new(0.0, 1.0, 0.0));
    assert_eq!(c.up, Vector3D::new(1.0, 0.0, 0.0));
}

#[test]
fn moves_along_basis() {
    let mut c = Camera::new(100, 50);

    c.move_front(2.0);
    assert_eq!(c.position, Vector3D::new(0.0, 0.0, 2.0));
    c.move_back(0.5);
    assert_eq!(c.position, Vector3D::new(0.0, 0.0, 1.5));
    c.move_right(1.0);
    assert_eq!(c.position, Vector3D::new(-1.0, 0.0, 1.5));
    c.move_left(3.0);
    assert_eq!(c.position, Vector3D::new(2.0, 0.0, 1.5));
    c.move_up(1.0);
    c.move_down(0.25);
    assert_eq!(c.position, Vector3D::new(2.0, 0.75, 1.5));
}

#[test]
fn pitch_never_leaves_range() {
    let mut c = Camera::new(100, 50);
    c.pitch_range = 1.0;

    for _ in 0..100 {
        c.pitch_up(0.3);
        assert!(c.pitch <= c.pitch_range);
    }
    assert_eq!(c.pitch, 1.0);

    for _ in 0..100 {
        c.pitch_down(0.3);
        assert!(c.pitch >= -c.pitch_range);
    }
    assert_eq!(c.pitch, -1.0);
}

#[test]
fn yaw_left_wraps_to_zero() {
    let mut c = Camera::new(100, 50);
    c.yaw = TWO_PI - 0.1;

    c.yaw_left(0.05);
    assert!(c.yaw > 6.0);

    // Crossing 2π resets to exactly zero, not to the 0.05 overshoot
    c.yaw_left(0.1);
    assert_eq!(c.yaw, 0.0);
    assert_eq!(c.forward, Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn yaw_right_wraps_to_zero() {
    let mut c = Camera::new(100, 50);
    c.yaw = -TWO_PI + 0.1;

    c.yaw_right(0.3);
    assert_eq!(c.yaw, 0.0);
}

#[test]
fn yaw_wrap_is_one_sided() {
    let mut c = Camera::new(100, 50);

    // Turning left from zero into negative angles never wraps
    c.yaw_right(1.0);
    c.yaw_left(0.5);
    assert_eq!(c.yaw, -0.5);
}

#[test]
fn roll_is_clamped() {
    let mut c = Camera::new(100, 50);
    c.roll_range = 0.5;

    c.roll_left(2.0);
    assert_eq!(c.roll, 0.5);

    c.roll_right(5.0);
    assert_eq!(c.roll, -0.5);
}

#[test]
fn range_is_inclusive() {
    let mut c = Camera::new(100, 50);
    c.ray_t_min = 1.0;
    c.ray_t_max = 10.0;

    assert!(c.in_range(1.0));
    assert!(c.in_range(10.0));
    assert!(c.in_range(5.0));
    assert!(!c.in_range(0.999));
    assert!(!c.in_range(10.001));
}

#[test]
fn viewport_mapping() {
    let c = Camera::new(160, 90);

    assert_eq!(c.canvas_to_viewport(0, 0), Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.canvas_to_viewport(80, -45), Vector3D::new(0.8, -0.45, 1.0));
}

#[test]
fn ray_direction_is_not_normalized() {
    let c = Camera::new(160, 90);
    let d = c.ray_direction(c.canvas_to_viewport(80, 45));

    assert_eq!(d, Vector3D::new(-0.8, 0.45, 1.0));
    assert!(d.magnitude() > 1.0);
}
