pub mod consts;

pub mod vector;
pub mod color;

pub mod camera;
pub mod sphere;
pub mod light;
pub mod scene;

pub mod framebuffer;
pub mod render;
pub mod motion;

use consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
