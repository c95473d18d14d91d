use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use anyhow::{ ensure, Context, Error, Result };
use log::{ debug, info };
use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, NO_SPECULAR };
use crate::light::{ Light, LightKind };
use crate::sphere::Sphere;
use crate::vector::Vector3D;

/// Everything that can be seen or lights what is seen.
///
/// The order of `spheres` decides which sphere wins when two are hit at
/// exactly the same distance: the earlier one. A `Vec` keeps insertion order,
/// so push spheres in the order they should take precedence.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub background: Color,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(background: Color) -> Scene {
        Scene { spheres: Vec::new(), lights: Vec::new(), background }
    }

    /// The default scene: three colored spheres resting on a huge yellow
    /// ground sphere, dimly lit by ambient light.
    pub fn classic() -> Scene {
        let mut scene = Scene::new(Color::from_argb(0xFF000000));

        scene.spheres = vec![
            Sphere::new(Vector3D::new(0.0, -1.0, 3.0), 1.0, Color::red()),
            Sphere::new(Vector3D::new(2.0, 0.0, 4.0), 1.0, Color::blue()),
            Sphere::new(Vector3D::new(-2.0, 0.0, 4.0), 1.0, Color::green()),
            Sphere::new(Vector3D::new(0.0, -5001.0, 0.0), 5000.0, Color::yellow()),
        ];
        scene.lights = vec![Light::ambient(0.2)];

        scene
    }
}

/// A scene together with the camera looking at it.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    pub scene: Scene,
    pub camera: Camera,
}

impl SceneDescription {
    /// The classic scene, viewed from two units behind the origin.
    pub fn classic(width: usize, height: usize) -> SceneDescription {
        let mut camera = Camera::new(width, height);
        camera.position = Vector3D::new(0.0, 0.0, -2.0);

        SceneDescription { scene: Scene::classic(), camera }
    }

    /// Reads a scene description from a JSON file.
    pub fn load(path: &Path) -> Result<SceneDescription> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        let description = SceneDescription::parse(&text)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))?;

        info!("Loaded {} spheres and {} lights from {}",
            description.scene.spheres.len(),
            description.scene.lights.len(),
            path.display());

        Ok(description)
    }

    /// Parses a scene description from JSON text.
    ///
    /// Besides malformed JSON, this rejects an image size whose pixel count
    /// overflows, and negative pitch or roll ranges.
    pub fn parse(text: &str) -> Result<SceneDescription> {
        let scene_json: SceneJson = serde_json::from_str(text)?;
        SceneDescription::try_from(scene_json)
    }
}

impl TryFrom<SceneJson> for SceneDescription {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<SceneDescription> {
        let camera_json = scene_json.camera;
        let width = camera_json.width.unwrap_or(CANVAS_WIDTH);
        let height = camera_json.height.unwrap_or(CANVAS_HEIGHT);
        ensure!(width.checked_mul(height).is_some(),
            "Image size {}x{} is too large", width, height);

        for (name, range) in [("pitch_range", camera_json.pitch_range),
            ("roll_range", camera_json.roll_range)].iter() {
            if let Some(v) = range {
                ensure!(*v >= 0.0, "Camera {} must not be negative, got {}", name, v);
            }
        }

        let mut camera = Camera::new(width, height);

        if let Some(position) = camera_json.position {
            camera.position = position.into();
        }
        if let Some(v) = camera_json.viewport_width { camera.viewport_width = v; }
        if let Some(v) = camera_json.viewport_height { camera.viewport_height = v; }
        if let Some(v) = camera_json.viewport_distance { camera.viewport_distance = v; }
        if let Some(v) = camera_json.ray_t_min { camera.ray_t_min = v; }
        if let Some(v) = camera_json.ray_t_max { camera.ray_t_max = v; }
        if let Some(v) = camera_json.pitch_range { camera.pitch_range = v; }
        if let Some(v) = camera_json.roll_range { camera.roll_range = v; }
        if let Some(v) = camera_json.move_speed { camera.move_speed = v; }
        if let Some(v) = camera_json.rotate_speed { camera.rotate_speed = v; }

        camera.yaw = camera_json.yaw.unwrap_or(0.0);
        camera.pitch = camera_json.pitch.unwrap_or(0.0)
            .clamp(-camera.pitch_range, camera.pitch_range);
        camera.roll = camera_json.roll.unwrap_or(0.0)
            .clamp(-camera.roll_range, camera.roll_range);
        camera.update_orientation();
        debug!("Scene camera: {:?}", camera);

        let mut scene = Scene::new(scene_json.background.into());
        scene.spheres = scene_json.spheres.into_iter().map(|s| s.into()).collect();
        scene.lights = scene_json.lights.into_iter().map(|l| l.into()).collect();

        Ok(SceneDescription { scene, camera })
    }
}

#[derive(Serialize, Deserialize)]
struct SceneJson {
    #[serde(default)]
    camera: CameraJson,

    #[serde(default)]
    background: [f64; 3],

    #[serde(default)]
    spheres: Vec<SphereJson>,

    #[serde(default)]
    lights: Vec<LightJson>,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct CameraJson {
    width: Option<usize>,
    height: Option<usize>,

    position: Option<[f64; 3]>,
    yaw: Option<f64>,
    pitch: Option<f64>,
    roll: Option<f64>,

    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    viewport_distance: Option<f64>,

    ray_t_min: Option<f64>,
    ray_t_max: Option<f64>,

    pitch_range: Option<f64>,
    roll_range: Option<f64>,

    move_speed: Option<f64>,
    rotate_speed: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize)]
struct SphereJson {
    center: [f64; 3],
    radius: f64,
    color: [f64; 3],

    #[serde(default)]
    light_source: bool,

    #[serde(default = "no_specular")]
    specular: i32,
}

fn no_specular() -> i32 {
    NO_SPECULAR
}

impl From<SphereJson> for Sphere {
    fn from(sphere_json: SphereJson) -> Sphere {
        Sphere {
            center: sphere_json.center.into(),
            radius: sphere_json.radius,
            color: sphere_json.color.into(),
            is_light_source: sphere_json.light_source,
            specular: sphere_json.specular,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct LightJson {
    kind: LightKind,
    intensity: f64,

    /// A position for point lights, a direction for directional lights.
    #[serde(default)]
    position: [f64; 3],
}

impl From<LightJson> for Light {
    fn from(light_json: LightJson) -> Light {
        Light {
            intensity: light_json.intensity,
            kind: light_json.kind,
            position: light_json.position.into(),
        }
    }
}

#[test]
fn classic_scene_contents() {
    let scene = Scene::classic();

    assert_eq!(scene.spheres.len(), 4);
    assert_eq!(scene.spheres[3].radius, 5000.0);
    assert_eq!(scene.lights, vec![Light::ambient(0.2)]);
    assert_eq!(scene.background, Color::black());
}

#[test]
fn parse_full_description() {
    let text = r#"{
        "camera": {
            "width": 320,
            "height": 180,
            "position": [0.0, 1.0, -5.0],
            "ray_t_max": 1000.0
        },
        "background": [0.1, 0.2, 0.3],
        "spheres": [
            { "center": [0.0, 0.0, 3.0], "radius": 1.0, "color": [1.0, 0.0, 0.0] },
            { "center": [2.0, 0.0, 4.0], "radius": 0.5, "color": [1.0, 1.0, 1.0],
              "light_source": true, "specular": 50 }
        ],
        "lights": [
            { "kind": "ambient", "intensity": 0.2 },
            { "kind": "point", "intensity": 0.6, "position": [2.0, 1.0, 0.0] },
            { "kind": "directional", "intensity": 0.2, "position": [1.0, 4.0, 4.0] }
        ]
    }"#;

    let d = SceneDescription::parse(text).unwrap();

    assert_eq!(d.camera.width, 320);
    assert_eq!(d.camera.height, 180);
    assert_eq!(d.camera.position, Vector3D::new(0.0, 1.0, -5.0));
    assert_eq!(d.camera.ray_t_max, 1000.0);
    assert_eq!(d.scene.background, Color::rgb(0.1, 0.2, 0.3));

    assert_eq!(d.scene.spheres[0].specular, NO_SPECULAR);
    assert!(!d.scene.spheres[0].is_light_source);
    assert!(d.scene.spheres[1].is_light_source);
    assert_eq!(d.scene.spheres[1].specular, 50);

    assert_eq!(d.scene.lights[0], Light::ambient(0.2));
    assert_eq!(d.scene.lights[1], Light::point(0.6, Vector3D::new(2.0, 1.0, 0.0)));
    assert_eq!(d.scene.lights[2].kind, LightKind::Directional);
}

#[test]
fn parse_minimal_description() {
    let d = SceneDescription::parse("{}").unwrap();

    assert_eq!(d.camera, Camera::default());
    assert!(d.scene.spheres.is_empty());
    assert!(d.scene.lights.is_empty());
    assert_eq!(d.scene.background, Color::black());
}

#[test]
fn parse_rejects_unknown_light_kind() {
    let text = r#"{ "lights": [ { "kind": "spot", "intensity": 1.0 } ] }"#;

    assert!(SceneDescription::parse(text).is_err());
}

#[test]
fn parse_rejects_negative_ranges() {
    let pitch = r#"{ "camera": { "pitch_range": -0.5 } }"#;
    let roll = r#"{ "camera": { "roll_range": -0.1, "roll": 0.2 } }"#;

    let err = SceneDescription::parse(pitch).unwrap_err();
    assert!(err.to_string().contains("pitch_range"));
    assert!(SceneDescription::parse(roll).is_err());

    // Zero is a valid, if locked, range
    let locked = r#"{ "camera": { "pitch_range": 0.0, "pitch": 1.0 } }"#;
    assert_eq!(SceneDescription::parse(locked).unwrap().camera.pitch, 0.0);
}

#[test]
fn parse_rejects_overflowing_size() {
    let text = format!(r#"{{ "camera": {{ "width": {}, "height": 2 }} }}"#, usize::MAX);

    assert!(SceneDescription::parse(&text).is_err());
}

#[test]
fn load_reports_missing_file() {
    let err = SceneDescription::load(Path::new("./does/not/exist.json"))
        .unwrap_err();

    assert!(err.to_string().contains("Failed to read scene file"));
}

#[test]
fn shipped_scene_loads() {
    let d = SceneDescription::load(Path::new("scenes/lit.json")).unwrap();

    assert_eq!(d.scene.spheres.len(), 5);
    assert_eq!(d.scene.lights.len(), 3);
    assert_eq!(d.camera.position, Vector3D::new(0.0, 0.0, -2.0));
}
