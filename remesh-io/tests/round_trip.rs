//! Export a reduced mesh, import it again and analyze it

use remesh_core::{Point3f, PolygonMesh, Shading};
use remesh_decimation::{MeshAnalyzer, ReductionController};
use remesh_engine::NativeEngine;
use remesh_io::{export_mesh, import_merged, import_mesh};
use std::fs;

fn wavy_grid(n: usize) -> PolygonMesh {
    let size = n + 1;
    let mut mesh = PolygonMesh::new().with_name("wavy");
    for y in 0..size {
        for x in 0..size {
            let z = ((x as f32) * 0.6).sin() * ((y as f32) * 0.4).cos();
            mesh.add_vertex(Point3f::new(x as f32, y as f32, z));
        }
    }
    for y in 0..n {
        for x in 0..n {
            let tl = y * size + x;
            mesh.add_face(vec![tl, tl + 1, tl + size]);
            mesh.add_face(vec![tl + 1, tl + size + 1, tl + size]);
        }
    }
    mesh
}

#[test]
fn reduced_mesh_survives_export_and_import() {
    let engine = NativeEngine::new();
    let controller = ReductionController::new(&engine);
    let mut mesh = wavy_grid(10);

    let outcome = controller.reduce(&mut mesh, 0.5);
    assert!(outcome.overall_success);

    let path = std::env::temp_dir().join("remesh_round_trip_reduced.obj");
    export_mesh(&path, &mesh).unwrap();

    let reloaded = import_merged(&path).unwrap();
    assert_eq!(reloaded.name, "wavy");
    assert_eq!(reloaded.face_count(), outcome.final_faces);

    // Must not raise, and sees the same topology
    let before = MeshAnalyzer::metrics(&mesh).unwrap();
    let after = MeshAnalyzer::metrics(&reloaded).unwrap();
    assert_eq!(before.face_count, after.face_count);
    assert_eq!(MeshAnalyzer::analyze(&mesh), MeshAnalyzer::analyze(&reloaded));

    let text = fs::read_to_string(&path).unwrap();
    if mesh.shading == Shading::Smooth {
        assert!(text.contains("\ns 1\n"));
    }

    let _ = fs::remove_file(path);
}

#[test]
fn polygons_are_preserved() {
    let mut mesh = PolygonMesh::new().with_name("pentagon");
    for i in 0..5 {
        let a = i as f32 * std::f32::consts::TAU / 5.0;
        mesh.add_vertex(Point3f::new(a.cos(), a.sin(), 0.0));
    }
    mesh.add_face(vec![0, 1, 2, 3, 4]);

    let path = std::env::temp_dir().join("remesh_round_trip_pentagon.obj");
    export_mesh(&path, &mesh).unwrap();
    let meshes = import_mesh(&path).unwrap();

    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].faces, mesh.faces);
    for (a, b) in mesh.vertices.iter().zip(&meshes[0].vertices) {
        approx::assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        approx::assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
    }

    let _ = fs::remove_file(path);
}
