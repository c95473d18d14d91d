use std::ops::{ Add, Mul };

use crate::feq;

/// A color.
///
/// Represented with linear red-green-blue (RGB) values. Channels are kept
/// unclamped while lighting is applied, and only clamped to `[0.0, 1.0]`
/// when the color is packed into a pixel.
///
/// # Examples
///
/// Dim a color by a light intensity, then pack it:
///
/// ```
/// # use raytracer::color::Color;
/// let dimmed = Color::red() * 0.5;
/// assert_eq!(dimmed, Color::rgb(0.5, 0.0, 0.0));
/// assert_eq!(dimmed.to_pixel(), 0xFF7F0000);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    pub fn red() -> Color {
        Color::rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Color {
        Color::rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Color {
        Color::rgb(0.0, 0.0, 1.0)
    }

    pub fn yellow() -> Color {
        Color::rgb(1.0, 1.0, 0.0)
    }

    pub fn cyan() -> Color {
        Color::rgb(0.0, 1.0, 1.0)
    }

    pub fn magenta() -> Color {
        Color::rgb(1.0, 0.0, 1.0)
    }

    /// Unpacks an opaque ARGB pixel (`0xAARRGGBB`) into a color.
    ///
    /// The alpha lane is ignored.
    pub fn from_argb(pixel: u32) -> Color {
        let lane = |shift: u32| ((pixel >> shift) & 0xFF) as f64 / 255.0;

        Color::rgb(lane(16), lane(8), lane(0))
    }

    /// Compares two colors component-wise.
    ///
    /// An `epsilon` of zero (or less) compares exactly.
    pub fn equal(&self, other: &Color, epsilon: f64) -> bool {
        if epsilon <= 0.0 {
            return self.r == other.r && self.g == other.g && self.b == other.b;
        }

        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
    }

    /// Clamps every channel into `[0.0, 1.0]`.
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Packs a color into an opaque ARGB pixel, `0xFFRRGGBB`.
    ///
    /// The color is clamped first, and each channel is floored into an 8-bit
    /// lane. The layout is what the display surface expects, so it must not
    /// change.
    pub fn to_pixel(&self) -> u32 {
        let c = self.clamp();

        let r = (c.r * 255.0) as u32;
        let g = (c.g * 255.0) as u32;
        let b = (c.b * 255.0) as u32;

        (0xFF << 24) | (r << 16) | (g << 8) | b
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// This is how a lighting intensity is applied to a surface color.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
    assert_eq!(2.0 * c1, c2);
}

#[test]
fn clamp_out_of_range() {
    let c = Color::rgb(1.7, -0.2, 0.5);

    assert!(c.clamp().equal(&Color::rgb(1.0, 0.0, 0.5), 0.0));
}

#[test]
fn pixel_is_opaque_argb() {
    assert_eq!(Color::black().to_pixel(), 0xFF000000);
    assert_eq!(Color::white().to_pixel(), 0xFFFFFFFF);
    assert_eq!(Color::red().to_pixel(), 0xFFFF0000);
    assert_eq!(Color::green().to_pixel(), 0xFF00FF00);
    assert_eq!(Color::blue().to_pixel(), 0xFF0000FF);
}

#[test]
fn pixel_clamps_and_floors() {
    // 0.5 * 255 = 127.5 floors to 0x7F
    let c = Color::rgb(3.0, 0.5, -1.0);

    assert_eq!(c.to_pixel(), 0xFFFF7F00);
}

#[test]
fn argb_unpacks_lanes() {
    assert_eq!(Color::from_argb(0xFFFF00FF), Color::magenta());
    assert_eq!(Color::from_argb(0xFFFF00FF).to_pixel(), 0xFFFF00FF);
    assert_eq!(Color::from_argb(0xFF000000), Color::black());
}

#[test]
fn equal_tolerance() {
    let a = Color::rgb(0.5, 0.5, 0.5);
    let b = Color::rgb(0.5, 0.52, 0.5);

    assert!(!a.equal(&b, 0.0));
    assert!(a.equal(&b, 0.05));
}
