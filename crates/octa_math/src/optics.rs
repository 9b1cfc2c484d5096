use crate::Vec3;

/// Direction returned by [`refract`] on total internal reflection.
pub const TOTAL_INTERNAL_REFLECTION: Vec3 = Vec3::X;

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Bend `incident` through a surface by Snell's law.
///
/// `eta_t` is the index of refraction on the far side of the surface and
/// `eta_i` the one the ray travels in. A ray leaving the surface from the
/// inside (incident along the normal) swaps the two media and flips the
/// normal.
pub fn refract(incident: Vec3, normal: Vec3, eta_t: f32, eta_i: f32) -> Vec3 {
    let cos_i = -incident.dot(normal).clamp(-1.0, 1.0);
    if cos_i < 0.0 {
        return refract(incident, -normal, eta_i, eta_t);
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        TOTAL_INTERNAL_REFLECTION
    } else {
        incident * eta + normal * (eta * cos_i - k.sqrt())
    }
}
