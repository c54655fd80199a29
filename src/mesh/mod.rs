pub mod face;
pub mod half_edge;
pub mod vertex;

pub use face::{FaceData, FaceId};
pub use half_edge::{HalfEdgeData, HalfEdgeId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::MeshError;
use crate::math::{Point3, TOLERANCE};

/// Arena that owns the quad-mesh topology.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation. Faces are
/// rectangles; their boundaries are cycles of four half-edges linked to the
/// opposite half-edge of the adjacent face where one exists.
#[derive(Debug, Default)]
pub struct QuadMesh {
    vertices: SlotMap<VertexId, VertexData>,
    half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    /// Directed edge (origin, destination) → half-edge, for twin stitching.
    edge_map: HashMap<(VertexId, VertexId), HalfEdgeId>,
    /// Faces consumed by rim extrusion, awaiting an external removal sweep.
    pending_removal: Vec<FaceId>,
}

impl QuadMesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Creation primitives ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Creates a rectangular face from four corner vertices in winding order.
    ///
    /// The face normal is computed from the corner positions. Twin links are
    /// established with the first opposite half-edge found on each edge;
    /// half-edges duplicating an already-registered direction (rim geometry
    /// laid over faces pending removal) are created without a twin.
    ///
    /// # Errors
    ///
    /// Returns an error if a corner vertex is not in the mesh or the corners
    /// are collinear or coincident.
    pub fn add_rect(&mut self, corners: [VertexId; 4]) -> Result<FaceId, MeshError> {
        let p0 = self.vertex(corners[0])?.point;
        let p1 = self.vertex(corners[1])?.point;
        let p3 = self.vertex(corners[3])?.point;

        let normal = (p1 - p0).cross(&(p3 - p0));
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(MeshError::DegenerateFace);
        }
        let normal = normal / len;

        let face = self.faces.insert(FaceData {
            normal,
            half_edge: HalfEdgeId::default(),
        });

        let edges: Vec<HalfEdgeId> = corners
            .iter()
            .map(|&vertex| {
                self.half_edges.insert(HalfEdgeData {
                    vertex,
                    face,
                    next: HalfEdgeId::default(),
                    prev: HalfEdgeId::default(),
                    twin: None,
                })
            })
            .collect();

        for i in 0..4 {
            let next = edges[(i + 1) % 4];
            let prev = edges[(i + 3) % 4];
            let he = &mut self.half_edges[edges[i]];
            he.next = next;
            he.prev = prev;
        }
        self.faces[face].half_edge = edges[0];

        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            if let Some(&opposite) = self.edge_map.get(&(b, a)) {
                if self.half_edges[opposite].twin.is_none() {
                    self.half_edges[opposite].twin = Some(edges[i]);
                    self.half_edges[edges[i]].twin = Some(opposite);
                }
            }
            self.edge_map.entry((a, b)).or_insert(edges[i]);
        }

        Ok(face)
    }

    // --- Entity accessors ---

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, MeshError> {
        self.vertices
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("vertex".into()))
    }

    /// Returns a reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData, MeshError> {
        self.half_edges
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("half-edge".into()))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, MeshError> {
        self.faces
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("face".into()))
    }

    // --- Navigation queries ---

    /// The following half-edge in the same face boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-edge is not in the mesh.
    pub fn next(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshError> {
        Ok(self.half_edge(id)?.next)
    }

    /// The preceding half-edge in the same face boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-edge is not in the mesh.
    pub fn prev(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshError> {
        Ok(self.half_edge(id)?.prev)
    }

    /// The opposite half-edge across the shared edge.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BoundaryEdge`] if the edge has no adjacent face.
    pub fn twin(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshError> {
        self.half_edge(id)?.twin.ok_or(MeshError::BoundaryEdge)
    }

    /// The face on the other side of the given half-edge's edge.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BoundaryEdge`] if the edge has no adjacent face.
    pub fn neighbor_face(&self, id: HalfEdgeId) -> Result<FaceId, MeshError> {
        let twin = self.twin(id)?;
        Ok(self.half_edge(twin)?.face)
    }

    /// The position of the vertex this half-edge starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-edge or its vertex is not in the mesh.
    pub fn origin(&self, id: HalfEdgeId) -> Result<Point3, MeshError> {
        let vertex = self.half_edge(id)?.vertex;
        Ok(self.vertex(vertex)?.point)
    }

    /// Steps a band frame to the corresponding frame of the next face in the
    /// chain, crossing the shared edge ahead of the frame.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BoundaryEdge`] if there is no next face.
    pub fn next_frame(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshError> {
        self.next(self.twin(self.next(id)?)?)
    }

    /// Steps a band frame to the corresponding frame of the previous face in
    /// the chain, crossing the shared edge behind the frame.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BoundaryEdge`] if there is no previous face.
    pub fn prev_frame(&self, id: HalfEdgeId) -> Result<HalfEdgeId, MeshError> {
        self.prev(self.twin(self.prev(id)?)?)
    }

    // --- Removal collector ---

    /// Marks a face as consumed; an external sweep deletes it later.
    pub fn mark_for_removal(&mut self, face: FaceId) {
        self.pending_removal.push(face);
    }

    /// Faces consumed so far, in visit order.
    #[must_use]
    pub fn pending_removal(&self) -> &[FaceId] {
        &self.pending_removal
    }

    // --- Introspection ---

    /// Number of faces in the mesh, including faces pending removal.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices in the mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &VertexData> {
        self.vertices.values()
    }
}
