//! Property-based tests for curvature estimation.
//!
//! These tests use proptest to generate random meshes, triangles and tensors
//! and verify invariants that must hold for every input.
//!
//! Run with: cargo test --test proptest_geometry

use std::collections::HashMap;

use nalgebra::{Point3, Vector2, Vector3};
use proptest::prelude::*;
use weingarten::algo::voronoi::{mixed_voronoi_weights, triangle_area};
use weingarten::geometry::TangentBasis;
use weingarten::prelude::{CurvatureTensor, Frame, Geometry, GeometryConfig};

// =============================================================================
// Strategies
// =============================================================================

type MeshData = (Vec<Point3<f64>>, Vec<[usize; 3]>);

/// Generate a random point in a bounded range.
fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Generate a mesh with valid indices but otherwise arbitrary faces,
/// including repeated indices and non-manifold fans.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = MeshData> {
    (3..=max_vertices).prop_flat_map(move |n| {
        let vertices = prop::collection::vec(arb_point(), n);
        let faces = prop::collection::vec(prop::array::uniform3(0..n), 1..=max_faces);
        (vertices, faces)
    })
}

/// Unit icosphere, two subdivisions (162 vertices).
fn icosphere() -> MeshData {
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
    .map(|&[x, y, z]| Point3::from(Vector3::new(x, y, z).normalize()))
    .collect();

    let mut faces = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..2 {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);
        for face in &faces {
            let mut mids = [0usize; 3];
            for i in 0..3 {
                let (a, b) = (face[i], face[(i + 1) % 3]);
                mids[i] = *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
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

/// Icosphere with each vertex moved radially by up to ±10%.
fn arb_bumpy_sphere() -> impl Strategy<Value = MeshData> {
    prop::collection::vec(-0.1..0.1f64, 162).prop_map(|offsets| {
        let (vertices, faces) = icosphere();
        let vertices = vertices
            .iter()
            .zip(&offsets)
            .map(|(p, dr)| Point3::from(p.coords * (1.0 + dr)))
            .collect();
        (vertices, faces)
    })
}

// =============================================================================
// Property Tests: Robustness
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Arbitrary index soup builds under the sentinel policy and yields
    /// ordered, finite curvatures.
    #[test]
    fn proptest_random_mesh_builds(mesh in arb_mesh(30, 40)) {
        let (vertices, faces) = mesh;
        let geometry = Geometry::build(&vertices, &faces).unwrap();

        prop_assert_eq!(geometry.curvatures().len(), vertices.len());
        for c in geometry.curvatures() {
            prop_assert!(c.k1.is_finite() && c.k2.is_finite());
            prop_assert!(c.k1 >= c.k2, "k1 {} < k2 {}", c.k1, c.k2);
        }
        for v in geometry.vertex_ids() {
            prop_assert!(geometry.vertex_frame(v).is_orthonormal(1e-9));
        }
    }

    /// Parallel and sequential evaluation agree exactly.
    #[test]
    fn proptest_parallel_matches_sequential(mesh in arb_mesh(30, 40)) {
        let (vertices, faces) = mesh;
        let parallel = Geometry::build(&vertices, &faces).unwrap();
        let sequential =
            Geometry::build_with_config(&vertices, &faces, GeometryConfig::default().sequential()).unwrap();

        prop_assert_eq!(parallel.curvatures(), sequential.curvatures());
        prop_assert_eq!(parallel.c_tensors(), sequential.c_tensors());
        prop_assert_eq!(parallel.degeneracies(), sequential.degeneracies());
    }
}

// =============================================================================
// Property Tests: Curvature Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Bumpy spheres are clean input: no degeneracies, ordered curvatures and
    /// extrema that bound every vertex.
    #[test]
    fn proptest_bumpy_sphere_invariants(mesh in arb_bumpy_sphere()) {
        let (vertices, faces) = mesh;
        let geometry = Geometry::build(&vertices, &faces).unwrap();
        prop_assert!(geometry.degeneracies().is_empty());

        let extrema = geometry.frequencies();
        for c in geometry.curvatures() {
            prop_assert!(c.k1 >= c.k2);
            prop_assert!(c.gaussian() >= extrema.min_gaussian && c.gaussian() <= extrema.max_gaussian);
            prop_assert!(c.mean() >= extrema.min_mean && c.mean() <= extrema.max_mean);
        }

        for v in geometry.vertex_ids() {
            let frame = geometry.vertex_frame(v);
            let c = geometry.curvature(v);
            prop_assert!(c.t1.dot(&frame.w).abs() < 1e-9);
            prop_assert!(c.t1.dot(&c.t2).abs() < 1e-9);
        }
    }

    /// Smoothing keeps the mesh well-formed.
    #[test]
    fn proptest_smoothing_keeps_sphere_valid(mesh in arb_bumpy_sphere()) {
        let (vertices, faces) = mesh;
        let mut geometry = Geometry::build(&vertices, &faces).unwrap();
        geometry.smooth().unwrap();

        prop_assert_eq!(geometry.num_vertices(), vertices.len());
        for p in geometry.positions() {
            prop_assert!(p.coords.iter().all(|x| x.is_finite()));
        }
        for c in geometry.curvatures() {
            prop_assert!(c.k1 >= c.k2);
        }
    }
}

// =============================================================================
// Property Tests: Building Blocks
// =============================================================================

proptest! {
    /// Mixed Voronoi weights are non-negative and partition the triangle area.
    #[test]
    fn proptest_voronoi_weights_sum_to_area(p0 in arb_point(), p1 in arb_point(), p2 in arb_point()) {
        if let Some(weights) = mixed_voronoi_weights(&p0, &p1, &p2) {
            let area = triangle_area(&p0, &p1, &p2);
            let longest = [(p1 - p0).norm_squared(), (p2 - p1).norm_squared(), (p0 - p2).norm_squared()]
                .into_iter()
                .fold(0.0, f64::max);

            let total: f64 = weights.iter().sum();
            prop_assert!((total - area).abs() <= 1e-9 * longest, "sum {} area {}", total, area);
            prop_assert!(weights.iter().all(|&w| w >= -1e-9 * longest));
        }
    }

    /// Any non-zero normal completes to a right-handed orthonormal frame.
    #[test]
    fn proptest_frame_from_normal(n in prop::array::uniform3(-1.0..1.0f64)) {
        let normal = Vector3::new(n[0], n[1], n[2]);
        prop_assume!(normal.norm() > 1e-3);

        let frame = Frame::from_normal(&normal).unwrap();
        prop_assert!(frame.is_orthonormal(1e-12));
        prop_assert!((frame.u.cross(&frame.v) - frame.w).norm() < 1e-12);
        prop_assert!((frame.w - normal.normalize()).norm() < 1e-12);
    }

    /// Rotating the tangent basis changes the tensor but not its eigenvalues.
    #[test]
    fn proptest_transport_preserves_eigenvalues(
        e in -10.0..10.0f64,
        f in -10.0..10.0f64,
        g in -10.0..10.0f64,
        angle in 0.0..std::f64::consts::TAU,
    ) {
        let tensor = CurvatureTensor::symmetric(e, f, g);
        let (s, c) = angle.sin_cos();
        let basis = TangentBasis {
            a: Vector2::new(c, s),
            b: Vector2::new(-s, c),
        };

        let before = tensor.principal().unwrap();
        let after = tensor.transported(&basis).principal().unwrap();
        let tolerance = 1e-9 * (1.0 + e.abs() + f.abs() + g.abs());
        prop_assert!((before.k1 - after.k1).abs() < tolerance);
        prop_assert!((before.k2 - after.k2).abs() < tolerance);
    }
}
