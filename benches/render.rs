use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{UVec2, Vec3};
use mirror_room::backend::triangle::moller_trumbore_intersect;
use mirror_room::backend::{BackendScene, CpuDevice, Device};
use mirror_room::loaders::MeshData;
use mirror_room::math::Ray;
use mirror_room::{RenderConfig, Scene};
use std::f32::consts::PI;

/// Generate random unit vector for ray directions
fn random_unit_vector(seed: u32) -> Vec3 {
    let theta = (seed as f32 * 0.123456) % (2.0 * PI);
    let phi = (seed as f32 * 0.789012) % PI;
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

/// Flat grid of `n * n` quads in the XY plane, two triangles each
fn grid_mesh(n: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            vertices.push([x as f32 / n as f32, y as f32 / n as f32, 0.0]);
        }
    }
    for y in 0..n {
        for x in 0..n {
            let i = y * (n + 1) + x;
            faces.push([i, i + 1, i + n + 1]);
            faces.push([i + 1, i + n + 2, i + n + 1]);
        }
    }
    MeshData::new(vertices, faces)
}

fn bench_triangle_hit(c: &mut Criterion) {
    let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::NEG_Z);
    let (v0, v1, v2) = (Vec3::ZERO, Vec3::X, Vec3::Y);

    c.bench_function("triangle_hit", |b| {
        b.iter(|| black_box(moller_trumbore_intersect(black_box(&ray), f32::INFINITY, v0, v1, v2)))
    });
}

fn bench_bvh_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_queries");

    for n in [8u32, 32, 128] {
        let mesh = grid_mesh(n);
        let device = CpuDevice::new();
        let vertices: Vec<Vec3> = mesh.vertices.iter().copied().map(Vec3::from_array).collect();
        let geometry = device.new_geometry(&vertices, &mesh.faces).unwrap();
        let mut scene = device.new_scene().unwrap();
        scene.attach(&geometry).unwrap();
        scene.commit().unwrap();

        let origin = Vec3::new(0.5, 0.5, 0.5);
        group.bench_with_input(BenchmarkId::new("intersect", mesh.face_count()), &scene, |b, scene| {
            b.iter(|| {
                let mut hits = 0;
                for i in 0..100 {
                    if scene.intersect(&Ray::new(origin, random_unit_vector(i))).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
        group.bench_with_input(BenchmarkId::new("occluded", mesh.face_count()), &scene, |b, scene| {
            b.iter(|| {
                let mut blocked = 0;
                for i in 0..100 {
                    if scene.occluded(&Ray::new(origin, random_unit_vector(i))) {
                        blocked += 1;
                    }
                }
                black_box(blocked)
            })
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let config = RenderConfig {
        width: 160,
        height: 120,
        max_rays_per_second: f64::MAX,
        ..Default::default()
    };
    let mut scene = Scene::new(config).unwrap();
    scene.set_main_mesh(&MeshData::cube()).unwrap();

    c.bench_function("frame_160x120_cube", |b| {
        b.iter(|| black_box(scene.render().unwrap().total_rays))
    });

    scene.set_size(UVec2::new(640, 480));
    let mut group = c.benchmark_group("frame_640x480");
    group.sample_size(10);
    group.bench_function("cube", |b| b.iter(|| black_box(scene.render().unwrap().total_rays)));
    group.finish();
}

criterion_group!(benches, bench_triangle_hit, bench_bvh_queries, bench_frame);
criterion_main!(benches);
