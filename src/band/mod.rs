pub mod join;
pub mod registry;

pub use join::{JoinDirection, JoinOperator, JoinRequest};
pub use registry::BandRegistry;

use crate::mesh::{FaceId, HalfEdgeId};

slotmap::new_key_type! {
    /// Unique identifier for a band in the registry.
    pub struct BandId;
}

/// A contiguous, directed chain of adjacent rectangular faces destined to
/// receive one continuous inset/offset rim.
///
/// While open, `end1` and `end2` are the two distinct boundary faces of the
/// chain. A band that turns out to loop back on itself is closed exactly once
/// and never mutated again.
#[derive(Debug, Clone)]
pub struct Band {
    /// The starting face of the chain.
    pub end1: FaceId,
    /// The finishing face of the chain.
    pub end2: FaceId,
    /// Frame of the current `end1`: the half-edge along the bottom of the
    /// starting face, kept in step with every start-side extension.
    pub start: HalfEdgeId,
    /// Geometry operation attached to the band, if any.
    pub operator: Option<JoinOperator>,
    /// Whether the chain loops back on itself.
    pub closed: bool,
}

impl Band {
    /// Creates a new open band spanning two faces.
    #[must_use]
    pub fn new(
        end1: FaceId,
        end2: FaceId,
        start: HalfEdgeId,
        operator: Option<JoinOperator>,
    ) -> Self {
        Self {
            end1,
            end2,
            start,
            operator,
            closed: false,
        }
    }

    /// Assigns `operator` only if the band has none yet. The first assigned
    /// operator is never overwritten, and `None` never clears one.
    pub fn adopt_operator(&mut self, operator: Option<JoinOperator>) {
        if self.operator.is_none() {
            self.operator = operator;
        }
    }
}
