use crate::band::Band;
use crate::error::Result;
use crate::math::mitered_inset;
use crate::mesh::QuadMesh;

/// Extrudes a band of rectangular faces into a rim offset by `depth` along
/// the face normals: an inset for `depth > 0`, an outward offset for
/// `depth < 0`.
///
/// The walk runs face by face from `end1` to `end2`. At every chain corner it
/// creates a lower/upper pair of offset vertices, mitred where the chain
/// turns, and emits a side-wall rectangle plus a lower and an upper cap per
/// step, so the new geometry tiles a continuous ribbon. Open bands are
/// bootstrapped by extruding the boundary frames straight along their normals
/// and capped at both ends; closed bands mitre the starting corner against
/// the wrap-around neighbor and reuse that vertex pair to close the ring.
///
/// Every visited face is appended to the mesh's pending-removal list; the
/// extruder itself never deletes faces.
///
/// Consecutive chain edges must not be collinear (see
/// [`mitered_inset`](crate::math::mitered_inset)).
pub struct RimExtrude<'a> {
    band: &'a Band,
    depth: f64,
}

impl<'a> RimExtrude<'a> {
    /// Creates a new `RimExtrude` operation.
    #[must_use]
    pub fn new(band: &'a Band, depth: f64) -> Self {
        Self { band, depth }
    }

    /// Executes the extrusion, creating the rim geometry in the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the band's chain cannot be walked in the mesh
    /// (a missing twin link or a stale entity ID).
    #[allow(clippy::too_many_lines)]
    pub fn execute(&self, mesh: &mut QuadMesh) -> Result<()> {
        let band = self.band;
        let depth = self.depth;

        let mut frame = band.start;
        let mut normal = mesh.face(mesh.half_edge(frame)?.face)?.normal;
        // Lower corner at the start of the frame and its neighbor ahead.
        let start_corner = mesh.origin(frame)?;
        let mut corner = mesh.origin(mesh.next(frame)?)?;
        let mut dir_in = (corner - start_corner).normalize();
        // Vector along the height of the band.
        let axis = mesh.origin(mesh.prev(frame)?)? - start_corner;

        let first_lower;
        let first_upper;
        let mut prev_lower;
        let mut prev_upper;
        if band.closed {
            // No boundary to bootstrap from: mitre the starting corner
            // against the wrap-around neighbor instead.
            let wrap = mesh.prev_frame(frame)?;
            let wrap_normal = mesh.face(mesh.half_edge(wrap)?.face)?.normal;
            let wrap_dir = (start_corner - mesh.origin(wrap)?).normalize();
            let inset = mitered_inset(
                &start_corner,
                &wrap_dir,
                &dir_in,
                depth,
                depth,
                &wrap_normal,
                &axis,
            );
            first_lower = mesh.add_vertex(inset);
            first_upper = mesh.add_vertex(inset + axis);
            prev_lower = first_lower;
            prev_upper = first_upper;
        } else {
            // Extrude the boundary frame straight along its normal; there is
            // no predecessor edge to mitre against.
            let inset = start_corner + normal * depth;
            first_lower = mesh.add_vertex(inset);
            first_upper = mesh.add_vertex(inset + axis);
            prev_lower = first_lower;
            prev_upper = first_upper;
            // Starting cap.
            let lower_left = mesh.half_edge(frame)?.vertex;
            let upper_left = mesh.half_edge(mesh.prev(frame)?)?.vertex;
            mesh.add_rect([lower_left, first_lower, first_upper, upper_left])?;
        }

        loop {
            let face = mesh.half_edge(frame)?.face;
            mesh.mark_for_removal(face);
            if face == band.end2 {
                break;
            }
            let step = frame;
            frame = mesh.next_frame(frame)?;

            let ahead = mesh.origin(mesh.next(frame)?)?;
            let dir_out = (ahead - corner).normalize();
            let inset = mitered_inset(&corner, &dir_in, &dir_out, depth, depth, &normal, &axis);
            let lower = mesh.add_vertex(inset);
            let upper = mesh.add_vertex(inset + axis);

            // Side wall.
            mesh.add_rect([prev_lower, lower, upper, prev_upper])?;
            // Lower cap.
            let step_next = mesh.next(step)?;
            let lower_left = mesh.half_edge(step)?.vertex;
            let lower_right = mesh.half_edge(step_next)?.vertex;
            mesh.add_rect([lower_left, lower_right, lower, prev_lower])?;
            // Upper cap.
            let upper_right = mesh.half_edge(mesh.next(step_next)?)?.vertex;
            let upper_left = mesh.half_edge(mesh.prev(step)?)?.vertex;
            mesh.add_rect([upper_right, upper_left, prev_upper, upper])?;

            dir_in = dir_out;
            corner = ahead;
            prev_lower = lower;
            prev_upper = upper;
            normal = mesh.face(mesh.half_edge(frame)?.face)?.normal;
        }

        // `frame` now denotes end2.
        let last_lower;
        let last_upper;
        if band.closed {
            // The bootstrap pair doubles as the closing pair; the first cap
            // already closes the ring.
            last_lower = first_lower;
            last_upper = first_upper;
        } else {
            let inset = corner + normal * depth;
            last_lower = mesh.add_vertex(inset);
            last_upper = mesh.add_vertex(inset + axis);
            // Closing cap.
            let edge = mesh.next(frame)?;
            let lower_right = mesh.half_edge(edge)?.vertex;
            let upper_right = mesh.half_edge(mesh.next(edge)?)?.vertex;
            mesh.add_rect([last_lower, lower_right, upper_right, last_upper])?;
        }

        // Final side wall and caps against the end2 frame.
        mesh.add_rect([prev_lower, last_lower, last_upper, prev_upper])?;
        let end_next = mesh.next(frame)?;
        let lower_left = mesh.half_edge(frame)?.vertex;
        let lower_right = mesh.half_edge(end_next)?.vertex;
        mesh.add_rect([lower_left, lower_right, last_lower, prev_lower])?;
        let upper_right = mesh.half_edge(mesh.next(end_next)?)?.vertex;
        let upper_left = mesh.half_edge(mesh.prev(frame)?)?.vertex;
        mesh.add_rect([upper_right, upper_left, prev_upper, last_upper])?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::band::{BandRegistry, JoinDirection, JoinOperator, JoinRequest};
    use crate::math::Point3;
    use crate::mesh::{FaceId, HalfEdgeId};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Unit-height walls along a footprint polyline in the XY plane. With
    /// `closed` the last point connects back to the first. Returns each face
    /// with its frame (bottom half-edge).
    fn wall_path(
        mesh: &mut QuadMesh,
        points: &[[f64; 2]],
        closed: bool,
    ) -> Vec<(FaceId, HalfEdgeId)> {
        let n = points.len();
        let bottoms: Vec<_> = points
            .iter()
            .map(|q| mesh.add_vertex(p(q[0], q[1], 0.0)))
            .collect();
        let tops: Vec<_> = points
            .iter()
            .map(|q| mesh.add_vertex(p(q[0], q[1], 1.0)))
            .collect();
        let count = if closed { n } else { n - 1 };
        (0..count)
            .map(|i| {
                let j = (i + 1) % n;
                let face = mesh
                    .add_rect([bottoms[i], bottoms[j], tops[j], tops[i]])
                    .unwrap();
                (face, mesh.face(face).unwrap().half_edge)
            })
            .collect()
    }

    fn join_all(
        mesh: &QuadMesh,
        walls: &[(FaceId, HalfEdgeId)],
        count: usize,
        depth: f64,
    ) -> BandRegistry {
        let mut registry = BandRegistry::new();
        for (i, &(face, frame)) in walls.iter().take(count).enumerate() {
            let operator = (i == 0).then_some(JoinOperator::Rim { depth });
            registry
                .process(
                    mesh,
                    JoinRequest {
                        face,
                        frame,
                        direction: JoinDirection::Right,
                        operator,
                    },
                )
                .unwrap();
        }
        registry
    }

    fn has_vertex_at(mesh: &QuadMesh, at: Point3) -> bool {
        mesh.vertices().any(|v| (v.point - at).norm() < 1e-9)
    }

    // ── open bands ──

    #[test]
    fn open_band_emits_a_linear_number_of_quads() {
        // Staircase of 3 walls: every interior corner turns.
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [2.0, 1.0]], false);
        let mut registry = join_all(&mesh, &walls, 2, 0.1);

        let faces_before = mesh.face_count();
        let verts_before = mesh.vertex_count();
        registry.finalize(&mut mesh).unwrap();

        // 3 quads per interior step, a start cap, a closing cap, and the
        // final side wall with its two caps.
        assert_eq!(mesh.face_count() - faces_before, 3 * (3 - 1) + 5);
        // One lower/upper pair per chain corner.
        assert_eq!(mesh.vertex_count() - verts_before, 2 * (3 + 1));
        assert_eq!(
            mesh.pending_removal(),
            &[walls[0].0, walls[1].0, walls[2].0]
        );
    }

    #[test]
    fn quad_count_does_not_depend_on_curvature() {
        // A longer zigzag: 5 walls, mixed convex and concave turns.
        let mut mesh = QuadMesh::new();
        let walls = wall_path(
            &mut mesh,
            &[
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [2.0, 1.0],
                [2.0, 0.0],
                [3.0, 0.0],
            ],
            false,
        );
        let mut registry = join_all(&mesh, &walls, 4, 0.1);

        let faces_before = mesh.face_count();
        registry.finalize(&mut mesh).unwrap();

        assert_eq!(mesh.face_count() - faces_before, 3 * (5 - 1) + 5);
    }

    #[test]
    fn convex_corner_vertex_is_mitred() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], false);
        let mut registry = join_all(&mesh, &walls, 1, 0.1);
        registry.finalize(&mut mesh).unwrap();

        // The first wall faces -Y, the second +X; the corner offset lands
        // depth * sqrt(2) from the original corner along the bisector.
        assert!(has_vertex_at(&mesh, p(1.1, -0.1, 0.0)));
        assert!(has_vertex_at(&mesh, p(1.1, -0.1, 1.0)));
    }

    #[test]
    fn concave_corner_mitres_to_the_inside() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, -1.0]], false);
        let mut registry = join_all(&mesh, &walls, 1, 0.1);
        registry.finalize(&mut mesh).unwrap();

        assert!(has_vertex_at(&mesh, p(0.9, -0.1, 0.0)));
    }

    #[test]
    fn open_band_ends_extrude_straight_along_their_normals() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], false);
        let mut registry = join_all(&mesh, &walls, 1, 0.1);
        registry.finalize(&mut mesh).unwrap();

        // end1 corner pushed along the first wall's -Y normal.
        assert!(has_vertex_at(&mesh, p(0.0, -0.1, 0.0)));
        // end2 corner pushed along the second wall's +X normal.
        assert!(has_vertex_at(&mesh, p(1.1, 1.0, 0.0)));
    }

    #[test]
    fn negative_depth_offsets_outward() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], false);
        let mut registry = join_all(&mesh, &walls, 1, -0.1);
        registry.finalize(&mut mesh).unwrap();

        assert!(has_vertex_at(&mesh, p(0.9, 0.1, 0.0)));
    }

    // ── closed bands ──

    #[test]
    fn closed_ring_reuses_the_bootstrap_pair() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(
            &mut mesh,
            &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            true,
        );
        let mut registry = join_all(&mesh, &walls, 4, 0.1);
        assert_eq!(registry.closed_band_count(), 1);

        let faces_before = mesh.face_count();
        let verts_before = mesh.vertex_count();
        registry.finalize(&mut mesh).unwrap();

        // One side wall, one lower and one upper cap per face; no extra
        // boundary caps and no duplicated closing vertices.
        assert_eq!(mesh.face_count() - faces_before, 3 * 4);
        assert_eq!(mesh.vertex_count() - verts_before, 2 * 4);
        assert_eq!(mesh.pending_removal().len(), 4);
    }

    #[test]
    fn closed_ring_corners_are_mitred_against_the_wrap_around() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(
            &mut mesh,
            &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            true,
        );
        let mut registry = join_all(&mesh, &walls, 4, 0.1);
        registry.finalize(&mut mesh).unwrap();

        // All four offset corners, including the bootstrap one at the origin,
        // which is mitred against the ring's last wall.
        assert!(has_vertex_at(&mesh, p(-0.1, -0.1, 0.0)));
        assert!(has_vertex_at(&mesh, p(1.1, -0.1, 0.0)));
        assert!(has_vertex_at(&mesh, p(1.1, 1.1, 0.0)));
        assert!(has_vertex_at(&mesh, p(-0.1, 1.1, 0.0)));
    }

    // ── finalize behavior ──

    #[test]
    fn bands_without_an_operator_are_skipped() {
        let mut mesh = QuadMesh::new();
        let walls = wall_path(&mut mesh, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], false);
        let mut registry = BandRegistry::new();
        registry
            .process(
                &mesh,
                JoinRequest {
                    face: walls[0].0,
                    frame: walls[0].1,
                    direction: JoinDirection::Right,
                    operator: None,
                },
            )
            .unwrap();

        let faces_before = mesh.face_count();
        registry.finalize(&mut mesh).unwrap();

        assert_eq!(mesh.face_count(), faces_before);
        assert!(mesh.pending_removal().is_empty());
    }

    #[test]
    fn operator_depth_is_exposed() {
        let operator = JoinOperator::Rim { depth: -0.25 };
        assert!((operator.depth() + 0.25).abs() < f64::EPSILON);
    }
}
