// Output parameters
pub const CANVAS_WIDTH: usize = 960;
pub const CANVAS_HEIGHT: usize = 540;
pub const OUT_FILE: &'static str = "./out.ppm";

// Viewport geometry, in world units
pub const VIEWPORT_WIDTH: f64 = 1.6;
pub const VIEWPORT_HEIGHT: f64 = 0.9;
pub const VIEWPORT_DISTANCE: f64 = 1.0;

// Valid ray parameter range
pub const RAY_T_MIN: f64 = 1.0;
pub const RAY_T_MAX: f64 = f64::INFINITY;

// Camera motion, per second of input
pub const MOVE_SPEED: f64 = 2.0;
pub const ROTATE_SPEED: f64 = 1.5;

// Orientation clamps, in radians
pub const PITCH_RANGE: f64 = std::f64::consts::FRAC_PI_2 * 0.99;
pub const ROLL_RANGE: f64 = std::f64::consts::FRAC_PI_4;

// Side length of a sampled block in preview mode
pub const LOW_RESOLUTION_BLOCK_SIZE: usize = 8;

// Spheres without a specular term
pub const NO_SPECULAR: i32 = -1;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;
