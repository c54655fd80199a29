use super::{FaceId, VertexId};

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in the quad mesh.
    pub struct HalfEdgeId;
}

/// One directed edge of a face boundary cycle.
///
/// Each face owns one half-edge per corner; the half-edge of the adjacent
/// face running the same edge in the opposite direction is its `twin`.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdgeData {
    /// The vertex this half-edge starts from.
    pub vertex: VertexId,
    /// The face whose boundary this half-edge belongs to.
    pub face: FaceId,
    /// The following half-edge in the face's boundary cycle.
    pub next: HalfEdgeId,
    /// The preceding half-edge in the face's boundary cycle.
    pub prev: HalfEdgeId,
    /// The opposite half-edge across the shared edge, if any.
    pub twin: Option<HalfEdgeId>,
}
