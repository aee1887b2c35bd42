//! Benchmarks for the native engine operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remesh_core::{Point3f, PolygonMesh};
use remesh_engine::{MeshEngine, NativeEngine};

fn generate_grid_mesh(size: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(
                x as f32,
                y as f32,
                (fx.sin() * fy.sin()) * 2.0,
            ));
        }
    }
    let mut faces = Vec::with_capacity((size - 1) * (size - 1));
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let a = y * size + x;
            faces.push(vec![a, a + 1, a + 1 + size, a + size]);
        }
    }
    PolygonMesh::from_vertices_and_faces(vertices, faces)
}

fn bench_collapse(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let sizes = [10, 20, 40];
    let ratios = [0.3f32, 0.5, 0.7];

    let mut group = c.benchmark_group("collapse");
    for &size in &sizes {
        let mesh = generate_grid_mesh(size);
        let face_count = mesh.face_count();

        for &keep in &ratios {
            group.bench_with_input(
                BenchmarkId::new("quadric", format!("{}f_k{}", face_count, (keep * 100.0) as u32)),
                &(&mesh, keep),
                |b, &(mesh, keep)| {
                    b.iter(|| {
                        let result = engine.collapse(black_box(mesh), keep, None).unwrap();
                        black_box(result);
                    });
                },
            );
            group.bench_with_input(
                BenchmarkId::new("sharp", format!("{}f_k{}", face_count, (keep * 100.0) as u32)),
                &(&mesh, keep),
                |b, &(mesh, keep)| {
                    let angle = Some(15f32.to_radians());
                    b.iter(|| {
                        let result = engine.collapse(black_box(mesh), keep, angle).unwrap();
                        black_box(result);
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_topology_ops(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let mut group = c.benchmark_group("topology");

    for &size in &[10usize, 20] {
        let mesh = generate_grid_mesh(size);
        let fine = engine.subdivide(&mesh, 1).unwrap();
        let label = format!("{}f", fine.face_count());

        group.bench_with_input(BenchmarkId::new("subdivide", &label), &mesh, |b, mesh| {
            b.iter(|| black_box(engine.subdivide(black_box(mesh), 1).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("unsubdivide", &label), &fine, |b, fine| {
            b.iter(|| black_box(engine.unsubdivide(black_box(fine), 1).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("dissolve", &label), &fine, |b, fine| {
            let angle = 5f32.to_radians();
            b.iter(|| black_box(engine.dissolve(black_box(fine), angle, false).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("edge_split", &label), &fine, |b, fine| {
            let angle = 30f32.to_radians();
            b.iter(|| black_box(engine.edge_split(black_box(fine), angle).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_collapse, bench_topology_ops);
criterion_main!(benches);
