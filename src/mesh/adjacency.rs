//! Vertex→face adjacency and the per-vertex face circulator.

use crate::mesh::{MeshIndex, SurfaceMesh};

/// One face of the fan around a vertex.
///
/// `curr_vert` and `next_vert` are the face's two other vertices in the order
/// the face winds around the centre vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirculatorRecord {
    pub curr_vert: usize,
    pub next_vert: usize,
    pub face: usize,
    /// Faces other than `face` that share the perimeter edge `(curr_vert, next_vert)`
    pub opp_faces: Vec<usize>,
}

/// The closed ring of faces around one interior, manifold vertex.
#[derive(Debug, Clone)]
pub struct Circulator {
    pub vertex: usize,
    /// Chained so that each record's `next_vert` is the following record's `curr_vert`
    pub records: Vec<CirculatorRecord>,
}

impl Circulator {
    /// Perimeter vertices in ring order.
    pub fn ring(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.curr_vert).collect()
    }

    /// Faces of the fan in ring order.
    pub fn faces(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.face).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Why a vertex has no closed circulator.
///
/// None of these are errors for the mesh as a whole: they mark boundary or
/// non-manifold vertices that algorithms needing a closed fan must skip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CirculatorFailure {
    #[error("vertex has fewer than 3 incident faces")]
    TooFewFaces,
    #[error("incident face is not a triangle")]
    NonTriangularFace,
    #[error("incident face repeats a vertex")]
    DegenerateFace,
    #[error("involved face index is stale")]
    StaleIndex,
    #[error("fan around vertex does not close into a single ring")]
    OpenFan,
    #[error("fan around vertex visits a neighbour twice")]
    RepeatedNeighbour,
}

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Rebuild `involved_faces` from scratch from the current `faces`.
    ///
    /// Indices past the end of `vertices` are ignored; run
    /// [`SurfaceMesh::check_face_indices`] first if that matters.
    pub fn recreate_involved_face_index(&mut self) {
        let mut involved = vec![Vec::new(); self.vertices.len()];
        for (f, face) in self.faces.iter().enumerate() {
            for v in face {
                if let Some(list) = involved.get_mut(v.to_usize()) {
                    if list.last() != Some(&f) {
                        list.push(f);
                    }
                }
            }
        }
        self.involved_faces = involved;
    }

    /// Whether `involved_faces` exactly describes the current faces.
    pub fn involved_face_index_is_fresh(&self) -> bool {
        if self.involved_faces.len() != self.vertices.len() {
            return false;
        }
        let forward = self.faces.iter().enumerate().all(|(f, face)| {
            face.iter().all(|v| {
                self.involved_faces
                    .get(v.to_usize())
                    .is_some_and(|list| list.contains(&f))
            })
        });
        let backward = self.involved_faces.iter().enumerate().all(|(v, list)| {
            list.iter().all(|&f| {
                self.faces
                    .get(f)
                    .is_some_and(|face| face.iter().any(|i| i.to_usize() == v))
            })
        });
        forward && backward
    }

    /// Faces currently listed as touching vertex `v` (empty if the index is not built).
    pub fn faces_around(&self, v: usize) -> &[usize] {
        self.involved_faces.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Build the circulator of vertex `vertex` from the involved-face index.
    ///
    /// Each incident triangle `(vertex, a, b)` contributes the record `a → b`.
    /// Records are chained greedily by matching one record's `next_vert` to
    /// another's `curr_vert`; a record that only matches backwards (an
    /// inconsistently wound neighbour) is flipped. The vertex is interior and
    /// manifold only if the chain closes and uses every record.
    pub fn circulate(&self, vertex: usize) -> Result<Circulator, CirculatorFailure> {
        let incident = self.faces_around(vertex);
        if incident.len() < 3 {
            return Err(CirculatorFailure::TooFewFaces);
        }

        let mut pending = Vec::with_capacity(incident.len());
        for &f in incident {
            let face = self.faces.get(f).ok_or(CirculatorFailure::StaleIndex)?;
            if face.len() != 3 {
                return Err(CirculatorFailure::NonTriangularFace);
            }
            let pos = face
                .iter()
                .position(|i| i.to_usize() == vertex)
                .ok_or(CirculatorFailure::StaleIndex)?;
            let curr_vert = face[(pos + 1) % 3].to_usize();
            let next_vert = face[(pos + 2) % 3].to_usize();
            if curr_vert == vertex || next_vert == vertex || curr_vert == next_vert {
                return Err(CirculatorFailure::DegenerateFace);
            }
            pending.push(CirculatorRecord {
                curr_vert,
                next_vert,
                face: f,
                opp_faces: Vec::new(),
            });
        }

        let mut records = vec![pending.remove(0)];
        loop {
            let (head, tail) = match (records.first(), records.last()) {
                (Some(h), Some(t)) => (h.curr_vert, t.next_vert),
                _ => return Err(CirculatorFailure::OpenFan),
            };
            if tail == head {
                break;
            }
            if let Some(k) = pending.iter().position(|r| r.curr_vert == tail) {
                records.push(pending.remove(k));
            } else if let Some(k) = pending.iter().position(|r| r.next_vert == tail) {
                let mut r = pending.remove(k);
                std::mem::swap(&mut r.curr_vert, &mut r.next_vert);
                records.push(r);
            } else {
                return Err(CirculatorFailure::OpenFan);
            }
        }
        if !pending.is_empty() {
            // closed early: several fans meet at this vertex
            return Err(CirculatorFailure::OpenFan);
        }

        let mut seen: Vec<usize> = records.iter().map(|r| r.curr_vert).collect();
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return Err(CirculatorFailure::RepeatedNeighbour);
        }

        Ok(Circulator { vertex, records })
    }

    /// Fill each record's `opp_faces` with the other faces sharing its perimeter edge.
    ///
    /// No opposite face means a boundary edge, one is an ordinary manifold
    /// edge, more than one is a non-manifold edge.
    pub fn populate_opposite_faces(&self, circulator: &mut Circulator) {
        for record in &mut circulator.records {
            let along_next = self.faces_around(record.next_vert);
            record.opp_faces = self
                .faces_around(record.curr_vert)
                .iter()
                .copied()
                .filter(|&f| f != record.face && along_next.contains(&f))
                .collect();
        }
    }
}
