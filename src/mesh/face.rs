use crate::math::Vector3;

use super::half_edge::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the quad mesh.
    pub struct FaceId;
}

/// Data associated with a rectangular mesh face.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The unit normal of the face.
    pub normal: Vector3,
    /// The half-edge starting at the first corner the face was built from.
    pub half_edge: HalfEdgeId,
}
