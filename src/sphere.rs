use crate::vector::Vector3D;
use crate::color::Color;
use crate::camera::Camera;
use crate::consts::NO_SPECULAR;

/// A sphere in the scene.
///
/// Emissive spheres (`is_light_source`) skip lighting entirely and always
/// show their full color. A negative `specular` exponent disables the
/// specular highlight.
///
/// The radius is expected to be positive; nothing here checks it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3D,
    pub radius: f64,
    pub color: Color,
    pub is_light_source: bool,
    pub specular: i32,
}

impl Sphere {
    /// Creates a plain, non-emissive sphere without a specular term.
    pub fn new(center: Vector3D, radius: f64, color: Color) -> Sphere {
        Sphere {
            center,
            radius,
            color,
            is_light_source: false,
            specular: NO_SPECULAR,
        }
    }

    /// Creates a sphere which glows at full intensity.
    pub fn emissive(center: Vector3D, radius: f64, color: Color) -> Sphere {
        Sphere { is_light_source: true, ..Sphere::new(center, radius, color) }
    }

    /// The outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Vector3D) -> Vector3D {
        (point - self.center).normalize()
    }
}

/// The two ray parameters where a ray crosses a sphere.
///
/// `t1` is the root with the `+sqrt` branch, `t2` the one with `-sqrt`, so
/// for a forward-facing direction `t2 <= t1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereIntersections {
    pub t1: f64,
    pub t2: f64,
}

/// Intersects a ray from the camera position with a sphere.
///
/// The direction is used as given, without normalizing, so the returned
/// parameters are multiples of `direction` and `origin + direction * t` is
/// the point on the sphere.
///
/// A miss returns `camera.ray_t_max` for both parameters. That value is
/// inside the camera range (the range is inclusive), but the nearest-hit
/// search starts from `ray_t_max` and only accepts strictly smaller values,
/// so the sentinel is never chosen.
///
/// ```
/// # use raytracer::camera::Camera;
/// # use raytracer::color::Color;
/// # use raytracer::vector::Vector3D;
/// # use raytracer::sphere::{ Sphere, intersect };
/// let camera = Camera::new(16, 9);
/// let sphere = Sphere::new(Vector3D::new(0.0, 0.0, 3.0), 1.0, Color::red());
///
/// let is = intersect(&camera, &sphere, Vector3D::new(0.0, 0.0, 1.0));
/// assert_eq!((is.t1, is.t2), (4.0, 2.0));
/// ```
pub fn intersect(camera: &Camera, sphere: &Sphere, direction: Vector3D)
    -> SphereIntersections {
    let oc = camera.position - sphere.center;

    let a = direction.dot(&direction);
    let b = 2.0 * oc.dot(&direction);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return SphereIntersections {
            t1: camera.ray_t_max,
            t2: camera.ray_t_max,
        };
    }

    let root = discriminant.sqrt();
    SphereIntersections {
        t1: (-b + root) / (2.0 * a),
        t2: (-b - root) / (2.0 * a),
    }
}

#[cfg(test)]
fn unit_sphere_at(center: Vector3D) -> Sphere {
    Sphere::new(center, 1.0, Color::white())
}

#[test]
fn ray_through_center() {
    let c = Camera::new(16, 9);
    let s = unit_sphere_at(Vector3D::new(0.0, 0.0, 5.0));
    let is = intersect(&c, &s, Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(is.t1, 6.0);
    assert_eq!(is.t2, 4.0);
}

#[test]
fn ray_tangent() {
    let c = Camera::new(16, 9);
    let s = unit_sphere_at(Vector3D::new(0.0, 1.0, 5.0));
    let is = intersect(&c, &s, Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(is.t1, 5.0);
    assert_eq!(is.t2, 5.0);
}

#[test]
fn ray_misses_with_far_clip_sentinel() {
    let mut c = Camera::new(16, 9);
    c.ray_t_max = 100.0;
    let s = unit_sphere_at(Vector3D::new(0.0, 2.0, 5.0));
    let is = intersect(&c, &s, Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(is, SphereIntersections { t1: 100.0, t2: 100.0 });

    // The sentinel sits on the inclusive boundary of the range
    assert!(c.in_range(is.t1));
}

#[test]
fn ray_from_inside() {
    let c = Camera::new(16, 9);
    for radius in [0.5, 1.0, 20.0].iter() {
        let s = Sphere::new(Vector3D::zero(), *radius, Color::white());
        let is = intersect(&c, &s, Vector3D::new(0.3, -1.0, 0.2));

        assert!(is.t1 > 0.0);
        assert!(is.t2 < 0.0);
        assert!((is.t1 + is.t2).abs() < 1e-9);
    }
}

#[test]
fn sphere_behind_ray() {
    let c = Camera::new(16, 9);
    let s = unit_sphere_at(Vector3D::new(0.0, 0.0, -5.0));
    let is = intersect(&c, &s, Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(is.t1, -4.0);
    assert_eq!(is.t2, -6.0);
}

#[test]
fn parameters_scale_with_direction_length() {
    let c = Camera::new(16, 9);
    let s = unit_sphere_at(Vector3D::new(0.0, 0.0, 5.0));
    let is = intersect(&c, &s, Vector3D::new(0.0, 0.0, 2.0));

    assert_eq!(is.t1, 3.0);
    assert_eq!(is.t2, 2.0);

    // Reconstructing the hit with the same direction lands on the surface
    let d = Vector3D::new(0.0, 0.0, 2.0);
    assert_eq!(c.position + d * is.t2, Vector3D::new(0.0, 0.0, 4.0));
}

#[test]
fn normal_points_outward() {
    let s = Sphere::new(Vector3D::new(1.0, 0.0, 0.0), 2.0, Color::white());

    assert_eq!(s.normal_at(Vector3D::new(3.0, 0.0, 0.0)),
        Vector3D::new(1.0, 0.0, 0.0));
    assert_eq!(s.normal_at(Vector3D::new(1.0, -2.0, 0.0)),
        Vector3D::new(0.0, -1.0, 0.0));
}
