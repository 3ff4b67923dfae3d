pub use siddon::{deposit, traverse};

pub mod siddon;

use crate::{FOV, Lengthf64};

/// Per-worker buffers for the plane-crossing parameters of a single ray.
///
/// Sized once from the FOV and reused for every ray the worker traces:
/// allocating them anew for each ray would put an allocation in the innermost
/// loop of the reconstruction.
pub struct Scratch {
    /// Crossing parameters of the planes orthogonal to each axis, ascending
    axis: [Vec<Lengthf64>; 3],
    /// Ascending union of the three per-axis lists, bracketed by the
    /// parameters at which the ray enters and leaves the voxel box
    pub merged: Vec<Lengthf64>,
}

impl Scratch {
    pub fn for_fov(fov: &FOV) -> Self {
        let [px, py, pz] = fov.n_planes();
        Self {
            axis: [Vec::with_capacity(px),
                   Vec::with_capacity(py),
                   Vec::with_capacity(pz)],
            merged: Vec::with_capacity(px + py + pz + 2),
        }
    }
}
