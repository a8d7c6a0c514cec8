//! Mesh generators shared by the unit tests.

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

pub(crate) type MeshData = (Vec<Point3<f64>>, Vec<[usize; 3]>);

/// Flat `(n+1)×(n+1)` grid in the `z = 0` plane with unit spacing.
pub(crate) fn flat_grid(n: usize) -> MeshData {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = j * (n + 1) + i + 1;
            let v01 = (j + 1) * (n + 1) + i;
            let v11 = (j + 1) * (n + 1) + i + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

/// Unit icosphere with outward winding. Level 0 has 12 vertices, level 1 has 42.
pub(crate) fn icosphere(subdivisions: usize) -> MeshData {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = 1.0 / (1.0 + phi * phi).sqrt();

    let mut vertices = vec![
        Point3::new(-1.0, phi, 0.0) * scale,
        Point3::new(1.0, phi, 0.0) * scale,
        Point3::new(-1.0, -phi, 0.0) * scale,
        Point3::new(1.0, -phi, 0.0) * scale,
        Point3::new(0.0, -1.0, phi) * scale,
        Point3::new(0.0, 1.0, phi) * scale,
        Point3::new(0.0, -1.0, -phi) * scale,
        Point3::new(0.0, 1.0, -phi) * scale,
        Point3::new(phi, 0.0, -1.0) * scale,
        Point3::new(phi, 0.0, 1.0) * scale,
        Point3::new(-phi, 0.0, -1.0) * scale,
        Point3::new(-phi, 0.0, 1.0) * scale,
    ];

    let mut faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut new_faces = Vec::with_capacity(faces.len() * 4);
        let mut edge_midpoints: HashMap<(usize, usize), usize> = HashMap::new();

        for face in &faces {
            let mut mids = [0usize; 3];

            for i in 0..3 {
                let v0 = face[i];
                let v1 = face[(i + 1) % 3];
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };

                mids[i] = *edge_midpoints.entry(key).or_insert_with(|| {
                    let mid = (vertices[v0].coords + vertices[v1].coords) / 2.0;
                    vertices.push(Point3::from(mid.normalize()));
                    vertices.len() - 1
                });
            }

            new_faces.push([face[0], mids[0], mids[2]]);
            new_faces.push([face[1], mids[1], mids[0]]);
            new_faces.push([face[2], mids[2], mids[1]]);
            new_faces.push([mids[0], mids[1], mids[2]]);
        }

        faces = new_faces;
    }

    (vertices, faces)
}

/// Icosphere stretched by `axes`.
pub(crate) fn ellipsoid(subdivisions: usize, axes: Vector3<f64>) -> MeshData {
    let (vertices, faces) = icosphere(subdivisions);
    let vertices = vertices
        .into_iter()
        .map(|p| Point3::from(p.coords.component_mul(&axes)))
        .collect();
    (vertices, faces)
}

/// Open unit-radius cylinder around the Z axis, `segments` around and
/// `rows` quads high, with outward winding. Vertex `(i, j)` has index
/// `j * segments + i`.
pub(crate) fn cylinder(segments: usize, rows: usize, row_height: f64) -> MeshData {
    let mut vertices = Vec::with_capacity(segments * (rows + 1));
    for j in 0..=rows {
        for i in 0..segments {
            let theta = 2.0 * PI * i as f64 / segments as f64;
            vertices.push(Point3::new(theta.cos(), theta.sin(), j as f64 * row_height));
        }
    }

    let index = |i: usize, j: usize| j * segments + (i % segments);
    let mut faces = Vec::with_capacity(2 * segments * rows);
    for j in 0..rows {
        for i in 0..segments {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }

    (vertices, faces)
}

/// Deterministic pseudo-random value in `[-1, 1)` for index `i`.
pub(crate) fn hash_noise(i: usize) -> f64 {
    let x = ((i as f64 + 1.0) * 12.9898).sin() * 43758.5453;
    2.0 * (x - x.floor()) - 1.0
}

#[test]
fn test_fixture_sizes() {
    let (v, f) = icosphere(1);
    assert_eq!((v.len(), f.len()), (42, 80));
    let (v, f) = icosphere(2);
    assert_eq!((v.len(), f.len()), (162, 320));
    let (v, f) = flat_grid(2);
    assert_eq!((v.len(), f.len()), (9, 8));
    let (v, f) = cylinder(24, 6, 0.3);
    assert_eq!((v.len(), f.len()), (24 * 7, 24 * 6 * 2));
    assert!((0..100).map(hash_noise).all(|x| (-1.0..1.0).contains(&x)));
}
