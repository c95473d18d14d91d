use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raytracer::framebuffer::Framebuffer;
use raytracer::render::render;
use raytracer::scene::SceneDescription;

fn criterion_benchmark(c: &mut Criterion) {
    let SceneDescription { scene, camera } = SceneDescription::classic(320, 180);
    let mut framebuffer = Framebuffer::new(camera.width, camera.height, 0);

    c.bench_function("classic scene 320x180", |b| b.iter(||
        render(black_box(&scene), black_box(&camera), &mut framebuffer, false)));

    c.bench_function("classic scene 320x180 preview", |b| b.iter(||
        render(black_box(&scene), black_box(&camera), &mut framebuffer, true)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
