use crate::error::Result;
use crate::mesh::{FaceId, HalfEdgeId, QuadMesh};
use crate::operations::RimExtrude;

use super::Band;

/// Direction of a join hint, relative to the requesting face's frame.
///
/// `Right` and `Left` point along the face's bottom edge; `Top` and `Bottom`
/// point across it. The direction determines which topological neighbor the
/// request establishes adjacency with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDirection {
    Right,
    Left,
    Top,
    Bottom,
}

impl JoinDirection {
    /// `true` when the hint points toward the start (`end1`) side of a chain,
    /// i.e. the requesting face sits on the finishing side of the adjacency.
    #[must_use]
    pub fn toward_start(self) -> bool {
        matches!(self, Self::Left | Self::Bottom)
    }
}

/// Geometry-producing operation attached to a band.
///
/// Rim extrusion is the only operation exercised today; further kinds slot in
/// as additional variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinOperator {
    /// Extrudes the band into a rim offset by `depth` along the face normals:
    /// an inset for `depth > 0`, an outward offset for `depth < 0`.
    Rim { depth: f64 },
}

impl JoinOperator {
    /// The signed offset depth carried by the operator.
    #[must_use]
    pub fn depth(&self) -> f64 {
        match self {
            Self::Rim { depth } => *depth,
        }
    }

    /// Emits the geometry for a finalized band. Invoked exactly once per band
    /// that carries an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the band's chain cannot be walked in the mesh.
    pub fn execute_join(&self, band: &Band, mesh: &mut QuadMesh) -> Result<()> {
        match self {
            Self::Rim { depth } => RimExtrude::new(band, *depth).execute(mesh),
        }
    }
}

/// One observed adjacency that may belong to a band: a face, the direction of
/// its neighbor, and an optional operator to attach to the resulting band.
#[derive(Debug, Clone, Copy)]
pub struct JoinRequest {
    /// The requesting face.
    pub face: FaceId,
    /// The face's frame: its half-edge along the bottom of the rectangle.
    pub frame: HalfEdgeId,
    /// Where the neighbor sits relative to the frame.
    pub direction: JoinDirection,
    /// Operator to attach, if the request carries one.
    pub operator: Option<JoinOperator>,
}
