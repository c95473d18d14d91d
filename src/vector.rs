use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A three dimensional vector.
///
/// Used for points, directions and surface normals alike. Every operation
/// returns a new vector; a `Vector3D` is never changed in place.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

/// Partial equality on two vectors, within `FEQ_EPSILON` per component.
///
/// Use `Vector3D::equal` to pick the tolerance explicitly.
impl PartialEq for Vector3D {
    fn eq(&self, other: &Vector3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(v: [f64; 3]) -> Vector3D {
        Vector3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D { x, y, z }
    }

    pub fn zero() -> Vector3D {
        Vector3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales a vector to unit length.
    ///
    /// The zero vector has no direction, so it normalizes to itself instead
    /// of dividing by zero.
    ///
    /// ```
    /// # use raytracer::vector::Vector3D;
    /// assert_eq!(Vector3D::new(4.0, 0.0, 0.0).normalize(),
    ///     Vector3D::new(1.0, 0.0, 0.0));
    /// assert_eq!(Vector3D::zero().normalize(), Vector3D::zero());
    /// ```
    pub fn normalize(&self) -> Vector3D {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Vector3D::zero();
        }

        *self * (1.0 / mag)
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    /// Right-handed cross product.
    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflects a vector across a normal.
    ///
    /// `normal` must be unit length.
    pub fn reflect(&self, normal: &Vector3D) -> Vector3D {
        *self - (*normal * 2.0 * self.dot(normal))
    }

    /// Compares two vectors component-wise.
    ///
    /// With an `epsilon` of zero the comparison is exact, otherwise every
    /// component difference must be at most `epsilon`.
    pub fn equal(&self, other: &Vector3D, epsilon: f64) -> bool {
        if epsilon == 0.0 {
            return self.x == other.x && self.y == other.y && self.z == other.z;
        }

        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z
        }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use raytracer::vector::Vector3D;
///
/// let v = Vector3D::new(1.0, 2.0, 3.0);
///
/// // (notice how the scalar is on the right)
/// assert_eq!(v * 5.0, Vector3D::new(5.0, 10.0, 15.0));
/// ```
impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        other * self
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3D::new(3.0, -2.0, 5.0);
    let a2 = Vector3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vector3D::new(3.0, 2.0, 1.0);
    let p2 = Vector3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3D::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3D::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Vector3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3D::new(1.0, 2.0, 3.0);
    let e = Vector3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
    assert!(feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn normalize_is_idempotent() {
    let vs = [
        Vector3D::new(1.0, 2.0, 3.0),
        Vector3D::new(-0.001, 500.0, 7.25),
        Vector3D::new(0.0, 0.0, -9.0),
    ];

    for v in vs.iter() {
        assert_eq!(v.normalize().normalize(), v.normalize());
    }
}

#[test]
fn normalize_zero() {
    let n = Vector3D::zero().normalize();

    assert!(n.equal(&Vector3D::zero(), 0.0));
    assert!(!n.x.is_nan());
}

#[test]
fn dot_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vector3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3D::new(1.0, -2.0, 1.0));

    let x = Vector3D::new(1.0, 0.0, 0.0);
    let y = Vector3D::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(&y), Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Vector3D::new(1.0, -1.0, 0.0);
    let n = Vector3D::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Vector3D::new(1.0, 1.0, 0.0));
}

#[test]
fn reflect_twice_is_identity() {
    let v = Vector3D::new(0.3, -2.0, 1.5);
    let n = Vector3D::new(1.0, 1.0, -1.0).normalize();

    assert_eq!(v.reflect(&n).reflect(&n), v);
}

#[test]
fn equal_exact_and_tolerant() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(1.0, 2.0, 3.05);

    assert!(a.equal(&a, 0.0));
    assert!(!a.equal(&b, 0.0));
    assert!(a.equal(&b, 0.1));
    assert!(!a.equal(&b, 0.01));
}
