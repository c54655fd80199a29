use thiserror::Error;

use crate::mesh::FaceId;

/// Top-level error type for the rimjoin crate.
#[derive(Debug, Error)]
pub enum RimjoinError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Band(#[from] BandError),
}

/// Errors related to the quad-mesh topology.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("half-edge has no twin: the edge lies on the mesh boundary")]
    BoundaryEdge,

    #[error("degenerate rectangle: corners are collinear or coincident")]
    DegenerateFace,
}

/// Errors related to band construction.
///
/// These surface violated caller contracts; band construction aborts rather
/// than silently corrupting the end indices.
#[derive(Debug, Error)]
pub enum BandError {
    #[error("face {0:?} is already an end of another open band")]
    ChainConflict(FaceId),
}

/// Convenience type alias for results using [`RimjoinError`].
pub type Result<T> = std::result::Result<T, RimjoinError>;
