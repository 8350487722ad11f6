//! Removal of interior vertices on locally flat mesh patches.
//!
//! ## **Algorithm**
//! Vertices are visited from the highest index down. For each one the fan of
//! incident triangles (the *patch*) is checked and, if every check passes,
//! replaced by an ear-clipped triangulation of its perimeter ring that no
//! longer references the vertex:
//!
//! 1. **Circulation**: the fan must close into a single ring of triangles.
//! 2. **Manifoldness**: every perimeter edge has at most one face across it,
//!    and that face is not part of the patch.
//! 3. **Flatness**: the vertex and its ring lie within `dist` of the
//!    least-squares plane through the ring.
//! 4. **Alignment**: every patch face normal is within `angle` of the
//!    area-weighted patch normal.
//! 5. **Ear clipping**: scanning the ring in alternating directions, accept
//!    the first ear that is not degenerate, keeps every edge on at most two
//!    faces, faces along the patch normal, contains no other ring vertex and
//!    does not leave a zero-area remainder.
//! 6. **Commit**: the patch faces are emptied in place (so other face indices
//!    stay valid) and the new faces appended.
//!
//! A vertex failing any step is left untouched. The emptied faces and the
//! removed vertices are garbage-collected once every vertex has been visited.

use crate::contour::vector_area_of;
use crate::errors::{GeometryError, Result};
use crate::float_types::{PI, Real, tolerance};
use crate::geometry::Plane;
use crate::mesh::adjacency::{CirculatorFailure, CirculatorRecord};
use crate::mesh::{MeshIndex, SurfaceMesh, edge_key, face_edges};
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;

/// Why a single vertex was not removed.
///
/// Messages are deliberately free of indices so that identical causes tally together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimplifyFailure {
    #[error(transparent)]
    Circulation(#[from] CirculatorFailure),
    #[error("perimeter edge is shared by more than two faces")]
    NonManifoldEdge,
    #[error("patch wraps around onto its own faces")]
    PinchedPatch,
    #[error("patch is not flat within tolerance")]
    NotFlat,
    #[error("patch normal is degenerate")]
    DegenerateNormal,
    #[error("face normal deviates from patch normal")]
    NormalMisaligned,
    #[error("ear clipping met coincident vertices")]
    DegenerateEar,
    #[error("ear clipping found no acceptable ear")]
    EarClippingStalled,
    #[error("replacement face count does not match patch")]
    FaceCountMismatch,
    #[error("patch plane could not be fit")]
    DegeneratePatch,
}

impl SimplifyFailure {
    /// `true` for conditions that merely disqualify a vertex (boundary,
    /// non-manifold, degenerate or curved neighbourhoods), `false` for failures
    /// of the re-triangulation itself.
    pub const fn is_skip(&self) -> bool {
        matches!(
            self,
            SimplifyFailure::Circulation(_)
                | SimplifyFailure::NonManifoldEdge
                | SimplifyFailure::PinchedPatch
                | SimplifyFailure::NotFlat
                | SimplifyFailure::DegenerateNormal
                | SimplifyFailure::NormalMisaligned
                | SimplifyFailure::DegeneratePatch
        )
    }
}

/// Summary of one [`SurfaceMesh::simplify_inner_triangles`] run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplificationReport {
    pub removed_vertices: usize,
    /// Vertices disqualified by topology, flatness or alignment
    pub skipped_vertices: usize,
    /// Re-triangulation failures, tallied by message
    pub failures: BTreeMap<String, usize>,
}

impl SimplificationReport {
    pub fn failure_count(&self) -> usize {
        self.failures.values().sum()
    }
}

/// A vetted replacement for the fan around `vertex`.
struct VertexRemoval {
    vertex: usize,
    old_faces: Vec<usize>,
    new_faces: Vec<[usize; 3]>,
}

/// Read-only state shared by every ear test of one patch.
struct EarContext<'a> {
    positions: &'a [Point3<Real>],
    normal: Vector3<Real>,
    plane: Plane,
    cos_min: Real,
}

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Remove interior vertices of flat, manifold patches and re-triangulate
    /// their perimeter with fewer, larger triangles.
    ///
    /// - `dist`: maximum distance of the vertex and its ring from the ring's
    ///   least-squares plane
    /// - `angle`: maximum angle (radians) between any patch face normal, or any
    ///   replacement triangle normal, and the patch's area-weighted normal.
    ///   Angles above π are treated as π.
    ///
    /// Boundary and non-manifold vertices are never removed, no edge ends up
    /// on more than two faces, and no face is flipped. Per-vertex failures are
    /// tallied in the returned report; only mismatched attribute arrays,
    /// out-of-range indices, invalid parameters and broken internal
    /// bookkeeping are errors. Vertices left without faces and faces left
    /// empty are removed before returning, which renumbers the vertices.
    pub fn simplify_inner_triangles(&mut self, dist: Real, angle: Real) -> Result<SimplificationReport> {
        self.validate_attribute_arrays()?;
        if !(dist.is_finite() && dist > 0.0) {
            return Err(GeometryError::InvalidArgument(format!(
                "flatness distance must be positive and finite, got {dist}"
            )));
        }
        if !(angle.is_finite() && angle >= 0.0) {
            return Err(GeometryError::InvalidArgument(format!(
                "alignment angle must be non-negative and finite, got {angle}"
            )));
        }
        self.check_face_indices()?;

        self.recreate_involved_face_index();
        let cos_min = angle.min(PI).cos();
        let mut report = SimplificationReport::default();

        for vertex in (0..self.vertices.len()).rev() {
            match self.plan_vertex_removal(vertex, dist, cos_min) {
                Ok(removal) => {
                    self.commit_vertex_removal(removal)?;
                    report.removed_vertices += 1;
                },
                Err(failure) if failure.is_skip() => report.skipped_vertices += 1,
                Err(failure) => {
                    debug!("Vertex {vertex} not simplified: {failure}");
                    *report.failures.entry(failure.to_string()).or_insert(0) += 1;
                },
            }
        }

        info!(
            "Simplification removed {} vertices ({} skipped, {} failed)",
            report.removed_vertices,
            report.skipped_vertices,
            report.failure_count()
        );
        for (message, count) in &report.failures {
            warn!("{count} vertices could not be simplified: {message}");
        }

        self.involved_faces.clear();
        self.remove_disconnected_vertices()?;
        self.remove_degenerate_faces();
        Ok(report)
    }

    /// Run every check for `vertex` and compute its replacement faces without
    /// touching the mesh.
    fn plan_vertex_removal(&self, vertex: usize, dist: Real, cos_min: Real) -> std::result::Result<VertexRemoval, SimplifyFailure> {
        let mut circulator = self.circulate(vertex)?;
        self.populate_opposite_faces(&mut circulator);

        let old_faces = circulator.faces();
        let patch: HashSet<usize> = old_faces.iter().copied().collect();
        check_perimeter(&circulator.records, &patch)?;

        let ring = circulator.ring();
        let mut edge_counts = self.nearby_edge_counts(&ring, &patch);

        // flatness
        let ring_points: Vec<Point3<Real>> = ring.iter().map(|&v| self.vertices[v]).collect();
        let fit = Plane::orthogonal_regression(&ring_points).map_err(|_| SimplifyFailure::DegeneratePatch)?;
        let centre = self.vertices[vertex];
        if fit.distance(&centre) >= dist || ring_points.iter().any(|p| fit.distance(p) >= dist) {
            return Err(SimplifyFailure::NotFlat);
        }

        // alignment
        let face_points: Vec<Vec<Point3<Real>>> = old_faces
            .iter()
            .map(|&f| self.face_points(f).ok_or(SimplifyFailure::Circulation(CirculatorFailure::StaleIndex)))
            .collect::<std::result::Result<_, _>>()?;
        let weighted: Vector3<Real> = face_points.iter().map(|pts| vector_area_of(pts)).sum();
        let len = weighted.norm();
        if !(len.is_finite() && len > tolerance()) {
            return Err(SimplifyFailure::DegenerateNormal);
        }
        let normal = weighted / len;
        for pts in &face_points {
            let va = vector_area_of(pts);
            let va_len = va.norm();
            if !(va_len.is_finite() && va_len > tolerance()) {
                return Err(SimplifyFailure::DegenerateNormal);
            }
            if (va / va_len).dot(&normal) < cos_min {
                return Err(SimplifyFailure::NormalMisaligned);
            }
        }

        let context = EarContext {
            positions: &self.vertices,
            normal,
            plane: Plane::new(normal, centre),
            cos_min,
        };
        let new_faces = clip_ears(ring, &mut edge_counts, &context)?;
        if new_faces.len() + 2 != old_faces.len() {
            return Err(SimplifyFailure::FaceCountMismatch);
        }

        Ok(VertexRemoval {
            vertex,
            old_faces,
            new_faces,
        })
    }

    /// Edge multiplicities of every face touching the ring, excluding the patch itself.
    fn nearby_edge_counts(&self, ring: &[usize], patch: &HashSet<usize>) -> HashMap<(usize, usize), usize> {
        let mut visited = HashSet::new();
        let mut counts = HashMap::new();
        for &v in ring {
            for &f in self.faces_around(v) {
                if patch.contains(&f) || !visited.insert(f) {
                    continue;
                }
                for (a, b) in face_edges(&self.faces[f]) {
                    *counts.entry(edge_key(a, b)).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Swap the patch for its replacement, keeping `involved_faces` current.
    fn commit_vertex_removal(&mut self, removal: VertexRemoval) -> Result<()> {
        for tri in &removal.new_faces {
            let f = self.faces.len();
            let face = tri
                .iter()
                .map(|&v| I::from_usize(v))
                .collect::<Option<Vec<I>>>()
                .ok_or_else(|| GeometryError::Logic("replacement face index does not fit the index type".to_string()))?;
            self.faces.push(face);
            for &v in tri {
                self.involved_faces
                    .get_mut(v)
                    .ok_or_else(|| GeometryError::Logic(format!("vertex {v} missing from the involved face index")))?
                    .push(f);
            }
        }

        for &f in &removal.old_faces {
            let old = std::mem::take(&mut self.faces[f]);
            for v in old {
                if let Some(list) = self.involved_faces.get_mut(v.to_usize()) {
                    list.retain(|&x| x != f);
                }
            }
        }

        if !self.faces_around(removal.vertex).is_empty() {
            return Err(GeometryError::Logic(format!(
                "vertex {} is still referenced after its faces were removed",
                removal.vertex
            )));
        }
        Ok(())
    }
}

/// Every perimeter edge must have at most one face across it, and that face
/// must lie outside the patch.
fn check_perimeter(records: &[CirculatorRecord], patch: &HashSet<usize>) -> std::result::Result<(), SimplifyFailure> {
    for record in records {
        if record.opp_faces.len() > 1 {
            return Err(SimplifyFailure::NonManifoldEdge);
        }
        if record.opp_faces.iter().any(|f| patch.contains(f)) {
            return Err(SimplifyFailure::PinchedPatch);
        }
    }
    Ok(())
}

/// Ear-clip `ring` into `ring.len() - 2` triangles, updating `edge_counts`
/// with every accepted triangle.
fn clip_ears(
    mut ring: Vec<usize>,
    edge_counts: &mut HashMap<(usize, usize), usize>,
    context: &EarContext,
) -> std::result::Result<Vec<[usize; 3]>, SimplifyFailure> {
    let mut faces = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut forward = true;

    while ring.len() >= 3 {
        let m = ring.len();
        let order: Vec<usize> = if forward {
            (0..m).collect()
        } else {
            (0..m).rev().collect()
        };
        forward = !forward;

        let mut accepted = None;
        for i in order {
            let ear = [ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]];
            if ear_is_acceptable(&ring, i, ear, edge_counts, context)? {
                accepted = Some((i, ear));
                break;
            }
        }
        let Some((i, ear)) = accepted else {
            return Err(SimplifyFailure::EarClippingStalled);
        };

        for (a, b) in [(ear[0], ear[1]), (ear[1], ear[2]), (ear[2], ear[0])] {
            *edge_counts.entry(edge_key(a, b)).or_insert(0) += 1;
        }
        faces.push(ear);
        ring.remove(i);
    }
    Ok(faces)
}

/// Whether the ear `[prev, curr, next]` centred at ring position `i` may be cut.
fn ear_is_acceptable(
    ring: &[usize],
    i: usize,
    ear: [usize; 3],
    edge_counts: &HashMap<(usize, usize), usize>,
    context: &EarContext,
) -> std::result::Result<bool, SimplifyFailure> {
    let [a, b, c] = ear.map(|v| context.positions[v]);
    if a == b || b == c || c == a {
        return Err(SimplifyFailure::DegenerateEar);
    }

    let cross = (b - a).cross(&(c - a));
    let doubled_area = cross.norm();
    if doubled_area * 0.5 < tolerance() {
        return Ok(false);
    }

    let over_full = |(x, y): (usize, usize)| edge_counts.get(&edge_key(x, y)).copied().unwrap_or(0) >= 2;
    if [(ear[0], ear[1]), (ear[1], ear[2]), (ear[2], ear[0])].into_iter().any(over_full) {
        return Ok(false);
    }

    let alignment = (cross / doubled_area).dot(&context.normal);
    if alignment <= 0.0 || alignment < context.cos_min {
        return Ok(false);
    }

    let corners = [a, b, c].map(|p| context.plane.project_to_2d(&p));
    let blocked = ring
        .iter()
        .filter(|v| !ear.contains(*v))
        .map(|&v| context.positions[v])
        .filter(|p| *p != a && *p != b && *p != c)
        .any(|p| strictly_inside(context.plane.project_to_2d(&p), corners));
    if blocked {
        return Ok(false);
    }

    if ring.len() > 3 {
        let remaining: Vec<Point3<Real>> = ring
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i)
            .map(|(_, &v)| context.positions[v])
            .collect();
        if vector_area_of(&remaining).norm() < tolerance() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Strict 2D point-in-triangle test; points on an edge are outside.
fn strictly_inside(p: (Real, Real), [a, b, c]: [(Real, Real); 3]) -> bool {
    let side = |(x0, y0): (Real, Real), (x1, y1): (Real, Real)| (x1 - x0) * (p.1 - y0) - (y1 - y0) * (p.0 - x0);
    let (d0, d1, d2) = (side(a, b), side(b, c), side(c, a));
    (d0 > 0.0 && d1 > 0.0 && d2 > 0.0) || (d0 < 0.0 && d1 < 0.0 && d2 < 0.0)
}
