use log::debug;

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::LOW_RESOLUTION_BLOCK_SIZE;
use crate::framebuffer::Framebuffer;
use crate::light::{ compute_lighting_specular, Specular };
use crate::scene::Scene;
use crate::sphere::{ Sphere, intersect };
use crate::vector::Vector3D;

/// The nearest sphere a ray hits, and where along the ray.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Sphere,
}

/// Counters for a finished render pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Primary rays cast, one per sampled pixel.
    pub rays: usize,
}

/// Finds the closest sphere along a ray from the camera.
///
/// A parameter is accepted when it lies in the camera range and is strictly
/// smaller than the best one so far, which starts at `ray_t_max`. Ties go to
/// whichever was seen first: earlier spheres before later ones, and `t1`
/// before `t2` within a sphere.
pub fn closest_intersection<'a>(scene: &'a Scene, camera: &Camera,
    direction: Vector3D) -> Option<Intersection<'a>> {
    let mut closest_t = camera.ray_t_max;
    let mut closest: Option<&Sphere> = None;

    for sphere in scene.spheres.iter() {
        let is = intersect(camera, sphere, direction);

        for t in [is.t1, is.t2].iter() {
            if camera.in_range(*t) && *t < closest_t {
                closest_t = *t;
                closest = Some(sphere);
            }
        }
    }

    closest.map(|what| Intersection { t: closest_t, what })
}

/// Determines the color seen along a ray from the camera.
pub fn trace_ray(scene: &Scene, camera: &Camera, direction: Vector3D) -> Color {
    let hit = match closest_intersection(scene, camera, direction) {
        None => return scene.background,
        Some(i) => i,
    };

    let sphere = hit.what;
    if sphere.is_light_source {
        return sphere.color;
    }

    let point = camera.position + direction * hit.t;
    let normal = sphere.normal_at(point);
    let specular = Specular { view: -direction, exponent: sphere.specular };

    sphere.color * compute_lighting_specular(scene, point, normal, specular)
}

/// Renders a scene into a framebuffer.
///
/// With `low_resolution` set, one ray is cast per
/// `LOW_RESOLUTION_BLOCK_SIZE` square block and its color is
/// copied over the whole block, for a quick preview while the camera moves.
pub fn render(scene: &Scene, camera: &Camera, framebuffer: &mut Framebuffer,
    low_resolution: bool) -> RenderStats {
    let block_size = if low_resolution { LOW_RESOLUTION_BLOCK_SIZE } else { 1 };

    render_blocks(scene, camera, framebuffer, block_size)
}

/// Renders a scene, casting one ray per `block_size` square of pixels.
///
/// Blocks are aligned to the top left corner of the framebuffer. The ray for
/// the block at screen position `(sx, sy)` goes through the viewport point
/// `x = sx - width / 2`, `y = height / 2 - sy`, so screen `x` grows with the
/// camera's `right` axis and screen `y` grows against its `up` axis. Screen
/// center is the ray straight along `forward`.
///
/// Pixels falling outside the framebuffer are dropped. The caller should
/// clear the framebuffer to the background beforehand if it is not covered
/// by the camera's size.
pub fn render_blocks(scene: &Scene, camera: &Camera, framebuffer: &mut Framebuffer,
    block_size: usize) -> RenderStats {
    let step = block_size.max(1);
    let half_width = (camera.width / 2) as i64;
    let half_height = (camera.height / 2) as i64;

    let mut stats = RenderStats::default();
    for sy in (0..camera.height).step_by(step) {
        for sx in (0..camera.width).step_by(step) {
            let x = sx as i64 - half_width;
            let y = half_height - sy as i64;

            let direction = camera.ray_direction(camera.canvas_to_viewport(x, y));
            let color = trace_ray(scene, camera, direction);
            stats.rays += 1;

            framebuffer.fill_block(sx, sy, step, color.to_pixel());
        }
    }

    debug!("Rendered {}x{} with block size {} ({} rays)",
        camera.width, camera.height, step, stats.rays);
    stats
}

#[cfg(test)]
use crate::light::Light;

#[cfg(test)]
const W: usize = 64;

#[cfg(test)]
const H: usize = 36;

#[cfg(test)]
fn single_sphere_scene(sphere: Sphere, lights: Vec<Light>) -> Scene {
    let mut scene = Scene::new(Color::black());
    scene.spheres.push(sphere);
    scene.lights = lights;
    scene
}

#[cfg(test)]
fn orange() -> Color {
    Color::rgb(1.0, 0.6, 0.2)
}

#[cfg(test)]
fn rendered(scene: &Scene, camera: &Camera, low_resolution: bool) -> Framebuffer {
    let mut fb = Framebuffer::new(camera.width, camera.height,
        Color::magenta().to_pixel());
    render(scene, camera, &mut fb, low_resolution);
    fb
}

#[cfg(test)]
fn corners(fb: &Framebuffer) -> Vec<u32> {
    vec![
        fb.read_pixel(0, 0).unwrap(),
        fb.read_pixel(fb.width - 1, 0).unwrap(),
        fb.read_pixel(0, fb.height - 1).unwrap(),
        fb.read_pixel(fb.width - 1, fb.height - 1).unwrap(),
    ]
}

#[test]
fn ambient_lit_sphere_in_center() {
    let sphere = Sphere::new(Vector3D::new(0.0, 0.0, 3.0), 1.0, orange());
    let scene = single_sphere_scene(sphere, vec![Light::ambient(1.0)]);
    let camera = Camera::new(W, H);

    let fb = rendered(&scene, &camera, false);

    assert_eq!(fb.read_pixel(W / 2, H / 2), Some(orange().to_pixel()));
    for pixel in corners(&fb) {
        assert_eq!(pixel, Color::black().to_pixel());
    }
}

#[test]
fn ambient_intensity_scales_color() {
    let sphere = Sphere::new(Vector3D::new(0.0, 0.0, 3.0), 1.0, Color::white());
    let scene = single_sphere_scene(sphere, vec![Light::ambient(0.5)]);
    let camera = Camera::new(W, H);

    let fb = rendered(&scene, &camera, false);

    assert_eq!(fb.read_pixel(W / 2, H / 2), Some(0xFF7F7F7F));
}

#[test]
fn emissive_sphere_ignores_lights() {
    let sphere = Sphere::emissive(Vector3D::new(0.0, 0.0, 3.0), 1.0, orange());
    let camera = Camera::new(W, H);

    let dark = single_sphere_scene(sphere, vec![]);
    let fb = rendered(&dark, &camera, false);
    assert_eq!(fb.read_pixel(W / 2, H / 2), Some(orange().to_pixel()));

    let bright = single_sphere_scene(sphere, vec![Light::ambient(3.0)]);
    let fb = rendered(&bright, &camera, false);
    assert_eq!(fb.read_pixel(W / 2, H / 2), Some(orange().to_pixel()));
}

#[test]
fn looking_away_shows_only_background() {
    let sphere = Sphere::emissive(Vector3D::new(0.0, 0.0, 3.0), 1.0, orange());
    let mut scene = single_sphere_scene(sphere, vec![Light::ambient(1.0)]);
    scene.background = Color::rgb(0.0, 0.0, 0.4);

    let mut camera = Camera::new(W, H);
    camera.yaw_left(std::f64::consts::PI);

    let fb = rendered(&scene, &camera, false);

    let background = scene.background.to_pixel();
    assert!(fb.pixels().iter().all(|p| *p == background));
}

#[test]
fn every_pixel_is_written() {
    let scene = Scene::new(Color::blue());
    let camera = Camera::new(W + 3, H + 5);

    for low_resolution in [false, true].iter() {
        let fb = rendered(&scene, &camera, *low_resolution);
        assert!(fb.pixels().iter().all(|p| *p == Color::blue().to_pixel()));
    }
}

#[test]
fn screen_x_follows_right_axis() {
    // The camera's right axis is world -x when looking down +z
    let left = Sphere::emissive(Vector3D::new(1.5, 0.0, 4.0), 0.5, Color::red());
    let right = Sphere::emissive(Vector3D::new(-1.5, 0.0, 4.0), 0.5, Color::green());
    let mut scene = Scene::new(Color::black());
    scene.spheres = vec![left, right];

    let camera = Camera::new(W, H);
    let fb = rendered(&scene, &camera, false);

    // Offsets of 1.5 / 4 * (64 / 1.6) = 15 pixels either side of center
    assert_eq!(fb.read_pixel(W / 2 - 15, H / 2), Some(Color::red().to_pixel()));
    assert_eq!(fb.read_pixel(W / 2 + 15, H / 2), Some(Color::green().to_pixel()));
}

#[test]
fn screen_y_is_flipped() {
    let above = Sphere::emissive(Vector3D::new(0.0, 0.75, 4.0), 0.4, Color::red());
    let below = Sphere::emissive(Vector3D::new(0.0, -0.75, 4.0), 0.4, Color::green());
    let mut scene = Scene::new(Color::black());
    scene.spheres = vec![above, below];

    let camera = Camera::new(W, H);
    let fb = rendered(&scene, &camera, false);

    // Offsets of 0.75 / 4 * (36 / 0.9) = 7.5 pixels above and below center
    assert_eq!(fb.read_pixel(W / 2, H / 2 - 7), Some(Color::red().to_pixel()));
    assert_eq!(fb.read_pixel(W / 2, H / 2 + 8), Some(Color::green().to_pixel()));
}

#[test]
fn nearer_sphere_wins() {
    let far = Sphere::emissive(Vector3D::new(0.0, 0.0, 10.0), 3.0, Color::red());
    let near = Sphere::emissive(Vector3D::new(0.0, 0.0, 4.0), 1.0, Color::green());
    let mut scene = Scene::new(Color::black());
    scene.spheres = vec![far, near];

    let camera = Camera::new(W, H);
    let hit = closest_intersection(&scene, &camera, Vector3D::new(0.0, 0.0, 1.0))
        .unwrap();

    assert_eq!(hit.t, 3.0);
    assert_eq!(hit.what.color, Color::green());
}

#[test]
fn exact_tie_goes_to_first_sphere() {
    let first = Sphere::emissive(Vector3D::new(0.0, 0.0, 4.0), 1.0, Color::red());
    let second = Sphere::emissive(Vector3D::new(0.0, 0.0, 4.0), 1.0, Color::green());
    let mut scene = Scene::new(Color::black());
    scene.spheres = vec![first, second];

    let camera = Camera::new(W, H);
    let hit = closest_intersection(&scene, &camera, Vector3D::new(0.0, 0.0, 1.0))
        .unwrap();

    assert!(std::ptr::eq(hit.what, &scene.spheres[0]));
}

#[test]
fn hits_closer_than_t_min_are_clipped() {
    // Camera sits inside the sphere; t2 is behind, t1 is 0.5 in front
    let sphere = Sphere::emissive(Vector3D::zero(), 0.5, Color::red());
    let scene = single_sphere_scene(sphere, vec![]);
    let camera = Camera::new(W, H);

    assert!(closest_intersection(&scene, &camera, Vector3D::new(0.0, 0.0, 1.0))
        .is_none());
}

#[test]
fn miss_sentinel_is_never_a_hit() {
    let sphere = Sphere::new(Vector3D::new(0.0, 5.0, 4.0), 1.0, Color::red());
    let scene = single_sphere_scene(sphere, vec![Light::ambient(1.0)]);
    let d = Vector3D::new(0.0, 0.0, 1.0);

    let mut camera = Camera::new(W, H);
    assert!(closest_intersection(&scene, &camera, d).is_none());

    camera.ray_t_max = 50.0;
    assert!(closest_intersection(&scene, &camera, d).is_none());
}

#[test]
fn hits_beyond_t_max_are_clipped() {
    let sphere = Sphere::emissive(Vector3D::new(0.0, 0.0, 10.0), 1.0, Color::red());
    let scene = single_sphere_scene(sphere, vec![]);
    let d = Vector3D::new(0.0, 0.0, 1.0);

    let mut camera = Camera::new(W, H);
    camera.ray_t_max = 8.0;
    assert!(closest_intersection(&scene, &camera, d).is_none());

    camera.ray_t_max = 10.0;
    assert_eq!(closest_intersection(&scene, &camera, d).unwrap().t, 9.0);
}

#[test]
fn directional_light_shades_facing_side() {
    let sphere = Sphere::new(Vector3D::new(0.0, 0.0, 3.0), 1.0, Color::white());
    let light = Light::directional(1.0, Vector3D::new(0.0, 0.0, -1.0));
    let scene = single_sphere_scene(sphere, vec![light]);
    let camera = Camera::new(W, H);

    // Straight on: the normal faces the light
    let center = trace_ray(&scene, &camera, Vector3D::new(0.0, 0.0, 1.0));
    assert_eq!(center, Color::white());

    // Near the rim the normal turns away and it gets darker
    let rim = trace_ray(&scene, &camera, Vector3D::new(0.3, 0.0, 1.0));
    assert!(rim.r < 1.0 && rim.r > 0.0);
}

#[test]
fn hit_point_uses_unnormalized_direction() {
    let sphere = Sphere::new(Vector3D::new(0.0, 0.0, 3.0), 1.0, Color::white());
    let light = Light::point(1.0, Vector3D::new(0.0, 0.0, 1.0));
    let scene = single_sphere_scene(sphere, vec![light]);
    let camera = Camera::new(W, H);

    // Hit at (0, 0, 2) whichever length the direction has; the light sits
    // one unit in front of it along the normal
    let short = trace_ray(&scene, &camera, Vector3D::new(0.0, 0.0, 1.0));
    let long = trace_ray(&scene, &camera, Vector3D::new(0.0, 0.0, 2.0));
    assert_eq!(short, Color::white());
    assert_eq!(long, Color::white());
}

#[test]
fn preview_blocks_are_uniform_and_aligned() {
    let k = LOW_RESOLUTION_BLOCK_SIZE;
    let scene = crate::scene::SceneDescription::classic(W, H);
    let fb = rendered(&scene.scene, &scene.camera, true);

    for y in 0..H {
        for x in 0..W {
            let corner = fb.read_pixel(x - x % k, y - y % k);
            assert_eq!(fb.read_pixel(x, y), corner);
        }
    }

    // The classic scene shows more than one color
    let first = fb.pixels()[0];
    assert!(fb.pixels().iter().any(|p| *p != first));
}

#[test]
fn preview_casts_fewer_rays() {
    let scene = Scene::classic();
    let camera = Camera::new(W, H);
    let mut fb = Framebuffer::new(W, H, 0);

    let full = render(&scene, &camera, &mut fb, false);
    let preview = render(&scene, &camera, &mut fb, true);

    assert_eq!(full.rays, W * H);
    assert_eq!(preview.rays, (W / 8) * ((H + 7) / 8));
    assert!(preview.rays < full.rays);
}

#[test]
fn arbitrary_block_size() {
    let scene = Scene::classic();
    let camera = Camera::new(10, 10);
    let mut fb = Framebuffer::new(10, 10, 0);

    assert_eq!(render_blocks(&scene, &camera, &mut fb, 3).rays, 16);
    assert_eq!(render_blocks(&scene, &camera, &mut fb, 0).rays, 100);
}
