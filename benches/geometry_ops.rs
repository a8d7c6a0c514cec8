//! Benchmarks for curvature estimation and smoothing.

use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use weingarten::prelude::{Geometry, GeometryConfig};

type MeshData = (Vec<Point3<f64>>, Vec<[usize; 3]>);

fn create_grid_mesh(n: usize) -> MeshData {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    // Gently curved so the tensors are not all zero
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 / n as f64, j as f64 / n as f64);
            vertices.push(Point3::new(x, y, 0.25 * (x * x - y * y)));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_icosphere(subdivisions: usize) -> MeshData {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<Point3<f64>> = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::from(nalgebra::Vector3::new(x, y, z).normalize()))
    .collect();

    let mut faces = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);
        for face in &faces {
            let mut mids = [0usize; 3];
            for i in 0..3 {
                let (a, b) = (face[i], face[(i + 1) % 3]);
                let key = (a.min(b), a.max(b));
                mids[i] = *midpoints.entry(key).or_insert_with(|| {
                    let mid = (vertices[a].coords + vertices[b].coords).normalize();
                    vertices.push(Point3::from(mid));
                    vertices.len() - 1
                });
            }
            next.push([face[0], mids[0], mids[2]]);
            next.push([face[1], mids[1], mids[0]]);
            next.push([face[2], mids[2], mids[1]]);
            next.push([mids[0], mids[1], mids[2]]);
        }
        faces = next;
    }

    (vertices, faces)
}

fn bench_build(c: &mut Criterion) {
    let (vertices, faces) = create_icosphere(4);

    c.bench_function("build_icosphere_4", |b| {
        b.iter(|| Geometry::build(&vertices, &faces).unwrap());
    });

    c.bench_function("build_icosphere_4_sequential", |b| {
        let config = GeometryConfig::default().sequential();
        b.iter(|| Geometry::build_with_config(&vertices, &faces, config.clone()).unwrap());
    });

    let (vertices, faces) = create_grid_mesh(100);
    c.bench_function("build_grid_100x100", |b| {
        b.iter(|| Geometry::build(&vertices, &faces).unwrap());
    });
}

fn bench_smooth(c: &mut Criterion) {
    let (vertices, faces) = create_icosphere(3);
    let geometry = Geometry::build(&vertices, &faces).unwrap();

    c.bench_function("smooth_icosphere_3", |b| {
        b.iter(|| {
            let mut g = geometry.clone();
            g.smooth().unwrap();
            g
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let (vertices, faces) = create_icosphere(4);
    let geometry = Geometry::build(&vertices, &faces).unwrap();

    c.bench_function("frequencies", |b| {
        b.iter(|| geometry.frequencies());
    });

    c.bench_function("render_buffers", |b| {
        b.iter(|| geometry.render_buffers());
    });
}

criterion_group!(benches, bench_build, bench_smooth, bench_queries);
criterion_main!(benches);
