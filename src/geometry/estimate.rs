//! The estimation pipeline run by `build` and after every smoothing pass.
//!
//! Stages, each a per-element map followed by an in-order pass that reports
//! degeneracies:
//!
//! 1. face frames and mixed Voronoi weights
//! 2. vertex normals and frames
//! 3. face curvature tensors
//! 4. vertex curvature tensors and principal curvatures
//! 5. face C-tensors
//! 6. vertex C-tensors
//!
//! Elements that failed an earlier stage are skipped by the later ones.

use nalgebra::Point3;
use tracing::{debug, instrument, warn};

use crate::algo::curvature::{
    average_vertex_tensor, fit_face_tensor, principal_curvature, vertex_normal, PrincipalCurvature,
};
use crate::algo::derivative::{average_vertex_c_tensor, fit_face_c_tensor};
use crate::algo::map_indices;
use crate::algo::voronoi::mixed_voronoi_weights;
use crate::config::{DegeneracyPolicy, GeometryConfig};
use crate::error::{Degeneracy, DegeneracyKind, Result};
use crate::mesh::{FaceId, Topology, VertexId};

use super::frame::Frame;
use super::tensor::{CTensor, CurvatureTensor};

/// Collects degeneracies according to the configured policy.
#[derive(Debug)]
pub(crate) struct DegeneracyLog {
    policy: DegeneracyPolicy,
    found: Vec<Degeneracy>,
}

impl DegeneracyLog {
    pub(crate) fn new(policy: DegeneracyPolicy) -> Self {
        Self {
            policy,
            found: Vec::new(),
        }
    }

    /// Record a degeneracy, or turn it into an error under [`DegeneracyPolicy::Fail`].
    pub(crate) fn report(&mut self, degeneracy: Degeneracy) -> Result<()> {
        match self.policy {
            DegeneracyPolicy::Fail => Err(degeneracy.into()),
            DegeneracyPolicy::Sentinel => {
                warn!(element = %degeneracy.element, kind = %degeneracy.kind, "degenerate element replaced by sentinel");
                self.found.push(degeneracy);
                Ok(())
            }
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Degeneracy> {
        self.found
    }
}

/// Result of one element in one stage.
enum Outcome<T> {
    Valid(T),
    /// An input from an earlier stage was degenerate; already reported.
    Skipped,
    Degenerate(DegeneracyKind),
}

impl<T> From<std::result::Result<T, DegeneracyKind>> for Outcome<T> {
    fn from(r: std::result::Result<T, DegeneracyKind>) -> Self {
        match r {
            Ok(value) => Outcome::Valid(value),
            Err(kind) => Outcome::Degenerate(kind),
        }
    }
}

/// Unpack a stage's outcomes in element order, reporting degeneracies and
/// filling in sentinels. Returns the values and a per-element validity mask.
fn resolve<T>(
    outcomes: Vec<Outcome<T>>,
    degeneracy: fn(usize, DegeneracyKind) -> Degeneracy,
    sentinel: impl Fn(usize) -> T,
    log: &mut DegeneracyLog,
) -> Result<(Vec<T>, Vec<bool>)> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut valid = Vec::with_capacity(outcomes.len());

    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Outcome::Valid(value) => {
                values.push(value);
                valid.push(true);
            }
            Outcome::Skipped => {
                values.push(sentinel(i));
                valid.push(false);
            }
            Outcome::Degenerate(kind) => {
                log.report(degeneracy(i, kind))?;
                values.push(sentinel(i));
                valid.push(false);
            }
        }
    }

    Ok((values, valid))
}

fn face_degeneracy(i: usize, kind: DegeneracyKind) -> Degeneracy {
    Degeneracy::face(FaceId::new(i), kind)
}

fn vertex_degeneracy(i: usize, kind: DegeneracyKind) -> Degeneracy {
    Degeneracy::vertex(VertexId::new(i), kind)
}

/// Everything derived from positions.
#[derive(Debug, Clone)]
pub(crate) struct Estimate {
    pub face_frames: Vec<Frame>,
    pub face_weights: Vec<[f64; 3]>,
    pub face_tensors: Vec<CurvatureTensor>,
    pub face_c_tensors: Vec<CTensor>,
    pub vertex_frames: Vec<Frame>,
    pub vertex_tensors: Vec<CurvatureTensor>,
    pub curvatures: Vec<PrincipalCurvature>,
    pub c_tensors: Vec<CTensor>,
}

/// Weight of vertex `v` in face `face`.
#[inline]
fn corner_weight(face: &[usize; 3], weights: &[f64; 3], v: usize) -> f64 {
    face.iter().position(|&x| x == v).map_or(0.0, |corner| weights[corner])
}

/// Run the full estimation pipeline.
#[instrument(skip_all, fields(vertices = positions.len(), faces = faces.len()))]
pub(crate) fn estimate(
    positions: &[Point3<f64>],
    faces: &[[usize; 3]],
    topology: &Topology,
    config: &GeometryConfig,
    log: &mut DegeneracyLog,
) -> Result<Estimate> {
    let nv = positions.len();
    let nf = faces.len();
    let parallel = config.parallel;
    let threshold = config.parallel_threshold;

    // Face frames and weights
    let outcomes = map_indices(nf, parallel, |fi| -> Outcome<(Frame, [f64; 3])> {
        let [a, b, c] = faces[fi];
        let (p0, p1, p2) = (&positions[a], &positions[b], &positions[c]);
        Frame::from_triangle(p0, p1, p2)
            .zip(mixed_voronoi_weights(p0, p1, p2))
            .ok_or(DegeneracyKind::ZeroArea)
            .into()
    });
    let (face_geometry, face_ok) = resolve(outcomes, face_degeneracy, |_| (Frame::canonical(), [0.0; 3]), log)?;
    let (face_frames, face_weights): (Vec<Frame>, Vec<[f64; 3]>) = face_geometry.into_iter().unzip();
    debug!("face frames done");

    // Vertex frames
    let outcomes = map_indices(nv, parallel, |vi| {
        let incident = topology.vertex_faces(VertexId::new(vi));
        if incident.is_empty() {
            return Outcome::Degenerate(DegeneracyKind::IsolatedVertex);
        }
        let corners = incident
            .iter()
            .map(|f| f.index())
            .filter(|&fi| face_ok[fi])
            .filter_map(|fi| {
                let face = &faces[fi];
                let corner = face.iter().position(|&x| x == vi)?;
                let p = &positions[vi];
                let a = positions[face[(corner + 1) % 3]] - p;
                let b = positions[face[(corner + 2) % 3]] - p;
                Some((a, b))
            });
        vertex_normal(corners)
            .and_then(|n| Frame::from_normal(&n))
            .ok_or(DegeneracyKind::VanishingNormal)
            .into()
    });
    let (vertex_frames, vertex_ok) = resolve(outcomes, vertex_degeneracy, |_| Frame::canonical(), log)?;
    debug!("vertex frames done");

    // Face curvature tensors
    let outcomes = map_indices(nf, parallel, |fi| {
        let face = &faces[fi];
        if !face_ok[fi] || face.iter().any(|&v| !vertex_ok[v]) {
            return Outcome::Skipped;
        }
        let [a, b, c] = *face;
        fit_face_tensor(
            &face_frames[fi],
            [&positions[a], &positions[b], &positions[c]],
            [&vertex_frames[a].w, &vertex_frames[b].w, &vertex_frames[c].w],
        )
        .ok_or(DegeneracyKind::SingularFit)
        .into()
    });
    let (face_tensors, tensor_ok) = resolve(outcomes, face_degeneracy, |_| CurvatureTensor::zeros(), log)?;
    debug!("face tensors done");

    // Vertex curvature
    let outcomes = map_indices(nv, parallel, |vi| {
        if !vertex_ok[vi] {
            return Outcome::Skipped;
        }
        let frame = &vertex_frames[vi];
        let contributions = topology
            .vertex_faces(VertexId::new(vi))
            .iter()
            .map(|f| f.index())
            .filter(|&fi| tensor_ok[fi])
            .map(|fi| {
                let weight = corner_weight(&faces[fi], &face_weights[fi], vi);
                (face_frames[fi], face_tensors[fi], weight)
            });

        let Some(tensor) = average_vertex_tensor(frame, contributions, threshold) else {
            return Outcome::Degenerate(DegeneracyKind::ZeroWeight);
        };
        match principal_curvature(frame, &tensor) {
            Some(curvature) => Outcome::Valid((tensor, curvature)),
            None => Outcome::Degenerate(DegeneracyKind::NumericInstability),
        }
    });
    let (vertex_curvature, curvature_ok) = resolve(
        outcomes,
        vertex_degeneracy,
        |vi| (CurvatureTensor::zeros(), PrincipalCurvature::flat(&vertex_frames[vi])),
        log,
    )?;
    let (vertex_tensors, curvatures): (Vec<CurvatureTensor>, Vec<PrincipalCurvature>) =
        vertex_curvature.into_iter().unzip();
    debug!("vertex curvature done");

    // Face C-tensors
    let outcomes = map_indices(nf, parallel, |fi| {
        let face = &faces[fi];
        if !tensor_ok[fi] || face.iter().any(|&v| !curvature_ok[v]) {
            return Outcome::Skipped;
        }
        let [a, b, c] = *face;
        fit_face_c_tensor(
            &face_frames[fi],
            [&positions[a], &positions[b], &positions[c]],
            [&vertex_frames[a], &vertex_frames[b], &vertex_frames[c]],
            [&vertex_tensors[a], &vertex_tensors[b], &vertex_tensors[c]],
            threshold,
        )
        .ok_or(DegeneracyKind::SingularFit)
        .into()
    });
    let (face_c_tensors, c_ok) = resolve(outcomes, face_degeneracy, |_| CTensor::zeros(), log)?;

    // Vertex C-tensors. A vertex whose faces all lack a C-tensor keeps the zero tensor;
    // the reason was reported on the faces.
    let c_tensors = map_indices(nv, parallel, |vi| {
        if !curvature_ok[vi] {
            return CTensor::zeros();
        }
        let contributions = topology
            .vertex_faces(VertexId::new(vi))
            .iter()
            .map(|f| f.index())
            .filter(|&fi| c_ok[fi])
            .map(|fi| {
                let weight = corner_weight(&faces[fi], &face_weights[fi], vi);
                (face_frames[fi], face_c_tensors[fi], weight)
            });
        average_vertex_c_tensor(&vertex_frames[vi], contributions, threshold)
    });
    debug!("c-tensors done");

    Ok(Estimate {
        face_frames,
        face_weights,
        face_tensors,
        face_c_tensors,
        vertex_frames,
        vertex_tensors,
        curvatures,
        c_tensors,
    })
}
