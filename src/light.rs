use serde::{ Serialize, Deserialize };

use crate::vector::Vector3D;
use crate::scene::Scene;

/// How a light illuminates a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Uniform everywhere. The light's position is ignored.
    Ambient,

    /// Radiates from the light's position.
    Point,

    /// Arrives from infinitely far away; the light's position is read as a
    /// direction towards the light.
    Directional,
}

/// A light source.
///
/// For directional lights `position` holds a direction, which is kept as
/// given and only normalized when lighting is computed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub intensity: f64,
    pub kind: LightKind,
    pub position: Vector3D,
}

impl Light {
    pub fn ambient(intensity: f64) -> Light {
        Light { intensity, kind: LightKind::Ambient, position: Vector3D::zero() }
    }

    pub fn point(intensity: f64, position: Vector3D) -> Light {
        Light { intensity, kind: LightKind::Point, position }
    }

    pub fn directional(intensity: f64, direction: Vector3D) -> Light {
        Light { intensity, kind: LightKind::Directional, position: direction }
    }

    /// The unnormalized vector from `point` towards the light, if the light
    /// has a direction at all.
    fn direction_from(&self, point: Vector3D) -> Option<Vector3D> {
        match self.kind {
            LightKind::Ambient => None,
            LightKind::Point => Some(self.position - point),
            LightKind::Directional => Some(self.position),
        }
    }
}

/// Parameters for the specular highlight.
///
/// `view` points from the surface back towards the eye.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Specular {
    pub view: Vector3D,
    pub exponent: i32,
}

/// Calculates the light intensity arriving at a point.
///
/// Every light in the scene contributes. Ambient lights add their intensity
/// as is. Point and directional lights add a diffuse term when they face the
/// surface:
///
/// `intensity * dot(normal, normalize(l)) / (|normal| * |l|)`
///
/// where `l` is the unnormalized vector towards the light. Since `l` is also
/// normalized in the dot product, the contribution falls off with `1 / |l|`.
///
/// The result is not clamped and may exceed one.
///
/// ```
/// # use raytracer::color::Color;
/// # use raytracer::light::{ Light, compute_lighting };
/// # use raytracer::scene::Scene;
/// # use raytracer::vector::Vector3D;
/// let mut scene = Scene::new(Color::black());
/// scene.lights.push(Light::ambient(0.2));
/// scene.lights.push(Light::directional(0.6, Vector3D::new(0.0, 1.0, 0.0)));
///
/// let up = Vector3D::new(0.0, 1.0, 0.0);
/// let i = compute_lighting(&scene, Vector3D::zero(), up);
/// assert!((i - 0.8).abs() < 1e-9);
/// ```
pub fn compute_lighting(scene: &Scene, point: Vector3D, normal: Vector3D) -> f64 {
    accumulate(scene, point, normal, None)
}

/// Like `compute_lighting`, with an added specular term per light.
///
/// A negative exponent disables the term, which makes this identical to
/// `compute_lighting`. Otherwise each point or directional light adds
/// `intensity * cos(r, view) ^ exponent` when the reflected light direction
/// `r` leans towards the viewer.
pub fn compute_lighting_specular(scene: &Scene, point: Vector3D, normal: Vector3D,
    specular: Specular) -> f64 {
    if specular.exponent < 0 {
        return accumulate(scene, point, normal, None);
    }

    accumulate(scene, point, normal, Some(specular))
}

fn accumulate(scene: &Scene, point: Vector3D, normal: Vector3D,
    specular: Option<Specular>) -> f64 {
    let mut intensity = 0.0;

    for light in scene.lights.iter() {
        let lightv = match light.direction_from(point) {
            None => {
                intensity += light.intensity;
                continue;
            },
            Some(v) => v,
        };

        // Diffuse
        let n_dot_l = normal.dot(&lightv.normalize());
        if n_dot_l > 0.0 {
            intensity += light.intensity * n_dot_l
                / (normal.magnitude() * lightv.magnitude());
        }

        // Specular
        if let Some(Specular { view, exponent }) = specular {
            let reflectv = normal * 2.0 * normal.dot(&lightv) - lightv;
            let r_dot_v = reflectv.dot(&view);
            if r_dot_v > 0.0 {
                let cos = r_dot_v / (reflectv.magnitude() * view.magnitude());
                intensity += light.intensity * cos.powi(exponent);
            }
        }
    }

    intensity
}

#[cfg(test)]
fn scene_with(lights: Vec<Light>) -> Scene {
    use crate::color::Color;

    let mut scene = Scene::new(Color::black());
    scene.lights = lights;
    scene
}

#[test]
fn no_lights_is_dark() {
    let scene = scene_with(vec![]);
    let n = Vector3D::new(0.0, 0.0, -1.0);

    assert_eq!(compute_lighting(&scene, Vector3D::zero(), n), 0.0);
}

#[test]
fn ambient_lights_add_up() {
    let scene = scene_with(vec![Light::ambient(0.25), Light::ambient(1.0)]);
    let n = Vector3D::new(0.0, 0.0, -1.0);

    // Facing away from nothing in particular, still fully ambient lit
    assert_eq!(compute_lighting(&scene, Vector3D::zero(), n), 1.25);
}

#[test]
fn point_light_attenuates_with_distance() {
    let n = Vector3D::new(0.0, 0.0, -1.0);

    let near = scene_with(vec![Light::point(1.0, Vector3D::new(0.0, 0.0, -1.0))]);
    assert!((compute_lighting(&near, Vector3D::zero(), n) - 1.0).abs() < 1e-9);

    let far = scene_with(vec![Light::point(1.0, Vector3D::new(0.0, 0.0, -4.0))]);
    assert!((compute_lighting(&far, Vector3D::zero(), n) - 0.25).abs() < 1e-9);
}

#[test]
fn point_light_at_an_angle() {
    let n = Vector3D::new(0.0, 1.0, 0.0);
    let scene = scene_with(vec![Light::point(1.0, Vector3D::new(1.0, 1.0, 0.0))]);
    let expected = (0.5f64).sqrt() / 2.0f64.sqrt();

    assert!((compute_lighting(&scene, Vector3D::zero(), n) - expected).abs() < 1e-9);
}

#[test]
fn light_behind_surface_contributes_nothing() {
    let n = Vector3D::new(0.0, 0.0, -1.0);
    let scene = scene_with(vec![
        Light::point(1.0, Vector3D::new(0.0, 0.0, 10.0)),
        Light::directional(1.0, Vector3D::new(0.0, 0.0, 1.0)),
    ]);

    assert_eq!(compute_lighting(&scene, Vector3D::zero(), n), 0.0);
}

#[test]
fn directional_light_is_not_normalized_at_rest() {
    let n = Vector3D::new(0.0, 1.0, 0.0);
    let unit = scene_with(vec![Light::directional(0.8, Vector3D::new(0.0, 1.0, 0.0))]);
    let long = scene_with(vec![Light::directional(0.8, Vector3D::new(0.0, 2.0, 0.0))]);

    assert!((compute_lighting(&unit, Vector3D::zero(), n) - 0.8).abs() < 1e-9);
    assert!((compute_lighting(&long, Vector3D::zero(), n) - 0.4).abs() < 1e-9);

    // The light does not depend on where the point is
    let elsewhere = Vector3D::new(100.0, -3.0, 7.0);
    assert!((compute_lighting(&unit, elsewhere, n) - 0.8).abs() < 1e-9);
}

#[test]
fn result_is_unclamped() {
    let n = Vector3D::new(0.0, 1.0, 0.0);
    let scene = scene_with(vec![
        Light::ambient(0.7),
        Light::directional(0.9, Vector3D::new(0.0, 1.0, 0.0)),
    ]);

    assert!((compute_lighting(&scene, Vector3D::zero(), n) - 1.6).abs() < 1e-9);
}

#[test]
fn negative_exponent_has_no_highlight() {
    let n = Vector3D::new(0.0, 0.0, -1.0);
    let scene = scene_with(vec![Light::directional(1.0, Vector3D::new(0.0, 0.0, -1.0))]);
    let specular = Specular { view: Vector3D::new(0.0, 0.0, -1.0), exponent: -1 };

    assert_eq!(
        compute_lighting_specular(&scene, Vector3D::zero(), n, specular),
        compute_lighting(&scene, Vector3D::zero(), n)
    );
}

#[test]
fn highlight_when_eye_on_reflection() {
    let n = Vector3D::new(0.0, 0.0, -1.0);
    let scene = scene_with(vec![Light::directional(0.5, Vector3D::new(0.0, 0.0, -1.0))]);
    let specular = Specular { view: Vector3D::new(0.0, 0.0, -3.0), exponent: 10 };

    // Diffuse 0.5 plus a full highlight of 0.5
    let i = compute_lighting_specular(&scene, Vector3D::zero(), n, specular);
    assert!((i - 1.0).abs() < 1e-9);
}

#[test]
fn highlight_fades_off_axis() {
    let n = Vector3D::new(0.0, 1.0, 0.0);
    let scene = scene_with(vec![Light::directional(1.0, Vector3D::new(1.0, 1.0, 0.0))]);
    let view = Vector3D::new(0.0, 1.0, 0.0);

    let sharp = compute_lighting_specular(&scene, Vector3D::zero(), n,
        Specular { view, exponent: 100 });
    let dull = compute_lighting_specular(&scene, Vector3D::zero(), n,
        Specular { view, exponent: 1 });

    assert!(sharp < dull);
}
