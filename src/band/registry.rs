use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{BandError, Result};
use crate::mesh::{FaceId, QuadMesh};

use super::{Band, BandId, JoinDirection, JoinOperator, JoinRequest};

/// Incrementally assembles join requests into bands of contiguous faces.
///
/// Requests arrive one at a time, in face-discovery order. Each request
/// either starts a new band, extends an open band on one of its ends, merges
/// two open bands, closes a band into a ring, or merely propagates an
/// operator. Open bands are indexed by both of their end faces; closed bands
/// leave the indices and are held until [`BandRegistry::finalize`].
#[derive(Debug, Default)]
pub struct BandRegistry {
    bands: SlotMap<BandId, Band>,
    /// Open bands keyed by their starting face.
    ends1: HashMap<FaceId, BandId>,
    /// Open bands keyed by their finishing face.
    ends2: HashMap<FaceId, BandId>,
    closed: Vec<BandId>,
    /// Original requests by face, kept as geometric context for consumers
    /// that later learn the face belongs to a band.
    requests: HashMap<FaceId, JoinRequest>,
}

impl BandRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one join request against the current set of open bands.
    ///
    /// # Errors
    ///
    /// Returns an error if the hinted neighbor cannot be resolved in the mesh
    /// (a boundary edge), or if an extension would land a band end on a face
    /// that is already an end of another open band. Both are violated caller
    /// contracts; the registry must not be used further after either.
    pub fn process(&mut self, mesh: &QuadMesh, request: JoinRequest) -> Result<()> {
        let JoinRequest {
            face,
            frame,
            direction,
            operator,
        } = request;

        let neighbor_edge = match direction {
            JoinDirection::Right => mesh.next(frame)?,
            JoinDirection::Left => mesh.prev(frame)?,
            JoinDirection::Top => mesh.next(mesh.next(frame)?)?,
            JoinDirection::Bottom => frame,
        };
        let neighbor = mesh.neighbor_face(neighbor_edge)?;

        self.requests.insert(face, request);

        if let Some(&id) = self.ends1.get(&face) {
            if direction.toward_start() {
                if neighbor == self.bands[id].end2 {
                    self.close(id);
                } else if let Some(&other) = self.ends2.get(&neighbor) {
                    self.merge(other, id);
                } else {
                    self.extend_start(mesh, id, neighbor, operator)?;
                }
            } else {
                // Two faces pointing at each other across an edge that
                // already anchors this band's start; only the operator can
                // propagate.
                self.bands[id].adopt_operator(operator);
            }
        } else if let Some(&id) = self.ends2.get(&face) {
            if direction.toward_start() {
                self.bands[id].adopt_operator(operator);
            } else if neighbor == self.bands[id].end1 {
                self.close(id);
            } else if let Some(&other) = self.ends1.get(&neighbor) {
                self.merge(id, other);
            } else {
                self.extend_end(id, neighbor, operator)?;
            }
        } else if let Some(&id) = self.ends1.get(&neighbor) {
            self.extend_start(mesh, id, face, operator)?;
        } else if let Some(&id) = self.ends2.get(&neighbor) {
            self.extend_end(id, face, operator)?;
        } else {
            // Start a new band spanning the request's two faces.
            let (end1, end2, start) = if direction.toward_start() {
                // TODO: rewind start frames across top/bottom joins; bands
                // chained vertically currently reuse the sideways frame step.
                (neighbor, face, mesh.prev_frame(frame)?)
            } else {
                (face, neighbor, frame)
            };
            let id = self.bands.insert(Band::new(end1, end2, start, operator));
            self.ends1.insert(end1, id);
            self.ends2.insert(end2, id);
        }

        Ok(())
    }

    /// Runs every band's operator: closed bands first, then the bands still
    /// open. Bands without an operator are skipped; a merged-away or closed
    /// band no longer occupies a live index slot, so nothing runs twice.
    ///
    /// All requests must have been processed before this is called.
    ///
    /// # Errors
    ///
    /// Returns an error if a band's chain cannot be walked in the mesh.
    pub fn finalize(&mut self, mesh: &mut QuadMesh) -> Result<()> {
        for &id in &self.closed {
            let band = &self.bands[id];
            if let Some(operator) = band.operator {
                operator.execute_join(band, mesh)?;
            }
        }
        let open: Vec<BandId> = self.ends1.values().copied().collect();
        for id in open {
            let band = &self.bands[id];
            if let Some(operator) = band.operator {
                operator.execute_join(band, mesh)?;
            }
        }
        Ok(())
    }

    // --- Introspection ---

    /// Number of bands still open.
    #[must_use]
    pub fn open_band_count(&self) -> usize {
        self.ends1.len()
    }

    /// Number of bands closed into rings.
    #[must_use]
    pub fn closed_band_count(&self) -> usize {
        self.closed.len()
    }

    /// Iterates over the bands still open.
    pub fn open_bands(&self) -> impl Iterator<Item = &Band> {
        self.ends1.values().map(|&id| &self.bands[id])
    }

    /// Iterates over the bands closed into rings.
    pub fn closed_bands(&self) -> impl Iterator<Item = &Band> {
        self.closed.iter().map(|&id| &self.bands[id])
    }

    /// The original join request recorded for a face, if any.
    #[must_use]
    pub fn request(&self, face: FaceId) -> Option<&JoinRequest> {
        self.requests.get(&face)
    }

    // --- Band mutations ---

    fn close(&mut self, id: BandId) {
        let band = &mut self.bands[id];
        band.closed = true;
        let (end1, end2) = (band.end1, band.end2);
        self.ends1.remove(&end1);
        self.ends2.remove(&end2);
        self.closed.push(id);
    }

    /// Merges two open bands; `keep` continues, `absorbed` is discarded.
    fn merge(&mut self, keep: BandId, absorbed: BandId) {
        let old_end2 = self.bands[keep].end2;
        self.ends2.remove(&old_end2);
        if let Some(gone) = self.bands.remove(absorbed) {
            self.ends1.remove(&gone.end1);
            self.ends2.insert(gone.end2, keep);
            let band = &mut self.bands[keep];
            band.end2 = gone.end2;
            band.adopt_operator(gone.operator);
        }
    }

    /// Extends a band on its start side to `face`, rewinding the start frame
    /// so it keeps denoting the frame of the current `end1`.
    fn extend_start(
        &mut self,
        mesh: &QuadMesh,
        id: BandId,
        face: FaceId,
        operator: Option<JoinOperator>,
    ) -> Result<()> {
        let old = self.bands[id].end1;
        self.ends1.remove(&old);
        if self.ends1.insert(face, id).is_some() {
            return Err(BandError::ChainConflict(face).into());
        }
        let start = mesh.prev_frame(self.bands[id].start)?;
        let band = &mut self.bands[id];
        band.end1 = face;
        band.start = start;
        band.adopt_operator(operator);
        Ok(())
    }

    /// Extends a band on its finishing side to `face`.
    fn extend_end(
        &mut self,
        id: BandId,
        face: FaceId,
        operator: Option<JoinOperator>,
    ) -> Result<()> {
        let old = self.bands[id].end2;
        self.ends2.remove(&old);
        if self.ends2.insert(face, id).is_some() {
            return Err(BandError::ChainConflict(face).into());
        }
        let band = &mut self.bands[id];
        band.end2 = face;
        band.adopt_operator(operator);
        Ok(())
    }
}
