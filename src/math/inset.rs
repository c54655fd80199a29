use super::{Point3, Vector3};

/// Computes the mitred inset (`depth > 0`) or outward offset (`depth < 0`)
/// counterpart of a band corner vertex.
///
/// `vec1` is the unit direction of the edge entering the corner, `vec2` the
/// unit direction of the edge leaving it, `normal` the normal of the incoming
/// face and `axis` the band's height direction. The turn is convex when
/// `cross(vec1, vec2) · axis > 0` and concave otherwise; the sign of the
/// mitring sine flips accordingly so the offset lands on the correct side.
///
/// `depth1` applies along the normal, `depth2` along the mitre; band rim
/// extrusion passes the same depth for both.
///
/// Collinear `vec1`/`vec2` (a straight step or a 180° turn) make the mitring
/// denominator vanish. That case is a caller precondition and is not guarded
/// here: consecutive band edges must not be collinear.
#[must_use]
pub fn mitered_inset(
    vert: &Point3,
    vec1: &Vector3,
    vec2: &Vector3,
    depth1: f64,
    depth2: f64,
    normal: &Vector3,
    axis: &Vector3,
) -> Point3 {
    let cross = vec1.cross(vec2);
    // sine of the angle between -vec1 and vec2, negative for concave turns
    let mut sin = cross.norm();
    if cross.dot(axis) < 0.0 {
        sin = -sin;
    }
    // cosine of the angle between -vec1 and vec2
    let cos = -vec1.dot(vec2);
    vert + normal * depth1 + vec1 * ((depth1 + depth2 * cos) / sin)
}
