//! The Coulomb-like force law shared by particles, pumps and gate sensing.

use crate::Vec2;

/// Force on a charge at `r1` from a charge at `r2`:
/// `normalize(r1 - r2) * charge / |r1 - r2|^2`.
///
/// Positive `charge` pushes `r1` away from `r2`. Separations shorter than
/// `min_separation` (including coincident or non-finite positions) yield
/// [`Vec2::ZERO`], so the result is always finite.
#[inline]
pub fn coulomb(r1: Vec2, r2: Vec2, charge: f32, min_separation: f32) -> Vec2 {
    let d = r1 - r2;
    let dist_sq = d.length_squared();
    // NaN compares false, so it is rejected here too
    if !(dist_sq >= min_separation * min_separation) || dist_sq == 0.0 {
        return Vec2::ZERO;
    }
    d.normalize_or_zero() * (charge / dist_sq)
}

/// Clamp each component of `v` independently to `[-limit, limit]`.
#[inline]
pub fn clamp_axes(v: Vec2, limit: f32) -> Vec2 {
    v.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}

/// Sum of clamped pairwise forces on particle `index` from every other active
/// particle.
///
/// Reads only `positions` and `active`, so it can run for all particles at
/// once against a frozen snapshot.
pub fn pairwise_force(
    index: usize,
    positions: &[Vec2],
    active: &[bool],
    charge: f32,
    limit: f32,
    min_separation: f32,
) -> Vec2 {
    let p = positions[index];
    let mut total = Vec2::ZERO;
    for (j, (&other, &alive)) in positions.iter().zip(active).enumerate() {
        if j == index || !alive {
            continue;
        }
        total += clamp_axes(coulomb(p, other, charge, min_separation), limit);
    }
    total
}
