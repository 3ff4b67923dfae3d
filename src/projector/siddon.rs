//! Ray / voxel-grid intersection after Siddon.
//!
//! A ray is parametrised as P(α) = source + α·(pixel − source) with
//! α ∈ [0, 1]. `traverse` enumerates, in ascending order, the α at which the
//! ray crosses any orthogonal grid plane, clipped to the part of the ray
//! inside the voxel box; `deposit` walks consecutive α pairs and accumulates
//! each segment's contribution into the voxel containing its midpoint.

/// Fill `scratch.merged` with the ascending plane-crossing parameters of
/// `ray` within the voxel box, bracketed by the entry and exit parameters.
///
/// Returns the (entry, exit) pair, or `None` when the ray misses the box —
/// including rays running parallel to an axis outside the box's slab on that
/// axis. A ray parallel to an axis *inside* the slab is fine: that axis
/// simply contributes no crossings.
pub fn traverse(ray: &Ray, fov: &FOV, scratch: &mut Scratch)
                -> Option<(Lengthf64, Lengthf64)>
{
    let source = ray.source;
    let delta = ray.delta();
    let parallel = [delta.x == 0.0, delta.y == 0.0, delta.z == 0.0];

    // Entry and exit of the ray into the box: on each non-parallel axis the
    // crossings of the two outermost planes bound the α interval; the box
    // interval is the intersection of the per-axis ones, clipped to [0, 1].
    let mut alpha_min: Lengthf64 = 0.0;
    let mut alpha_max: Lengthf64 = 1.0;
    for a in 0..3 {
        if parallel[a] {
            if source[a] < fov.first_plane(a) || source[a] > fov.last_plane(a) {
                return None; // runs alongside the box without entering it
            }
            continue;
        }
        let to_first = (fov.first_plane(a) - source[a]) / delta[a];
        let to_last  = (fov.last_plane(a)  - source[a]) / delta[a];
        alpha_min = alpha_min.max(to_first.min(to_last));
        alpha_max = alpha_max.min(to_first.max(to_last));
    }
    if alpha_min >= alpha_max {
        return None;
    }

    for a in 0..3 {
        scratch.axis[a].clear();
        if parallel[a] {
            continue;
        }

        // Indices of the planes crossed strictly inside (αmin, αmax). For a
        // ray moving towards lower coordinates the roles of entry and exit
        // swap, hence (lo, hi).
        let (lo, hi) = if delta[a] >= 0.0 { (alpha_min, alpha_max) }
                       else               { (alpha_max, alpha_min) };
        let n_planes = fov.n_planes()[a] as isize;
        let min_index = n_planes
            - ((fov.last_plane(a) - lo * delta[a] - source[a]) / fov.voxel_size[a])
              .ceil() as isize;
        let max_index =
              ((source[a] + hi * delta[a] - fov.first_plane(a)) / fov.voxel_size[a])
              .floor() as isize;
        let min_index = min_index.clamp(0, n_planes) as usize;
        let max_index = max_index.clamp(0, n_planes) as usize;
        if min_index >= max_index {
            continue;
        }

        // Only the first crossing needs a division; the spacing between
        // consecutive crossings of one axis is constant along the ray, which
        // also keeps the list monotonic by construction.
        let (entry_plane, step) = if delta[a] > 0.0 {
            (min_index,  fov.voxel_size[a] / delta[a])
        } else {
            (max_index, -fov.voxel_size[a] / delta[a])
        };
        let mut alpha = (fov.plane_position(a, entry_plane) - source[a]) / delta[a];
        for _ in 0..(max_index - min_index) {
            scratch.axis[a].push(alpha);
            alpha += step;
        }
    }

    scratch.merged.clear();
    scratch.merged.push(alpha_min);
    merge_three(&scratch.axis, &mut scratch.merged);
    // Incrementally computed crossings can land an ulp outside the bounding
    // interval; pin them back so the list stays non-decreasing.
    for value in &mut scratch.merged[1..] {
        *value = value.clamp(alpha_min, alpha_max);
    }
    scratch.merged.push(alpha_max);

    Some((alpha_min, alpha_max))
}

/// Merge the three ascending per-axis lists into one ascending list. Each
/// input is already sorted, so a three-way head comparison suffices.
fn merge_three(axes: &[Vec<Lengthf64>; 3], merged: &mut Vec<Lengthf64>) {
    let [ax, ay, az] = axes;
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < ax.len() || j < ay.len() || k < az.len() {
        let x = ax.get(i).copied().unwrap_or(Lengthf64::INFINITY);
        let y = ay.get(j).copied().unwrap_or(Lengthf64::INFINITY);
        let z = az.get(k).copied().unwrap_or(Lengthf64::INFINITY);
        if x <= y && x <= z {
            merged.push(x);
            i += 1;
        } else if y <= z {
            merged.push(y);
            j += 1;
        } else {
            merged.push(z);
            k += 1;
        }
    }
}

/// Accumulate one ray's contributions into `volume`.
///
/// For each consecutive α pair the segment length is `‖delta‖·Δα`; the voxel
/// is the one containing the segment midpoint; the deposited value is the
/// normalised pixel value times the segment length normalised by the total
/// source-to-detector distance. Midpoints that round onto the box boundary
/// are clamped back inside.
pub fn deposit(ray: &Ray, alphas: &[Lengthf64], fov: &FOV,
               pixel_value: Intensityf64, normalisation: Lengthf64,
               volume: &mut [Absorptionf64])
{
    let source = ray.source;
    let delta = ray.delta();
    let length = ray.length();

    for pair in alphas.windows(2) {
        let (previous, next) = (pair[0], pair[1]);
        if next <= previous {
            continue; // zero-length segment from an α tie between axes
        }
        let segment = length * (next - previous);
        let mid = (next + previous) / 2.0;

        let vx = voxel_at(source.x + mid * delta.x, fov, 0);
        let vy = voxel_at(source.y + mid * delta.y, fov, 1);
        let vz = voxel_at(source.z + mid * delta.z, fov, 2);
        let voxel_index = voxel3_to_1([vx, vy, vz], fov.n);

        volume[voxel_index] += pixel_value * segment / normalisation;
    }
}

#[inline(always)]
fn voxel_at(position: Lengthf64, fov: &FOV, axis: usize) -> usize {
    let i = ((position - fov.first_plane(axis)) / fov.voxel_size[axis]).floor() as isize;
    i.clamp(0, fov.n[axis] as isize - 1) as usize
}

// ----- imports ----------------------------------------------------------------------
use crate::{Absorptionf64, FOV, Intensityf64, Lengthf64, Ray};
use crate::index::voxel3_to_1;

use super::Scratch;
