/// The size and granularity of the field of view (FOV) in which volumes are
/// reconstructed: a box of voxels centred on the origin.

use crate::{BoxDim_u, Index3_u, Lengthf64, Point};

#[derive(Clone, Copy, Debug)]
pub struct FOV {
    pub n: BoxDim_u,
    pub voxel_size: [Lengthf64; 3],
    pub half_width: [Lengthf64; 3],
}

impl FOV {

    pub fn new(
        full_size: (Lengthf64, Lengthf64, Lengthf64),
        (nx, ny, nz): (usize, usize, usize),
    ) -> Self {
        let (dx, dy, dz) = full_size;
        let half_width = [dx / 2.0, dy / 2.0, dz / 2.0];
        let n = [nx, ny, nz];
        let voxel_size = [dx / nx as Lengthf64,
                          dy / ny as Lengthf64,
                          dz / nz as Lengthf64];
        Self { n, voxel_size, half_width }
    }

    pub fn n_planes(&self) -> [usize; 3] {
        let [nx, ny, nz] = self.n;
        [nx + 1, ny + 1, nz + 1]
    }

    /// Position of the lowest grid plane orthogonal to `axis`
    pub fn first_plane(&self, axis: usize) -> Lengthf64 {
        -self.half_width[axis]
    }

    /// Position of the highest grid plane orthogonal to `axis`
    pub fn last_plane(&self, axis: usize) -> Lengthf64 {
        self.half_width[axis]
    }

    pub fn plane_position(&self, axis: usize, plane_index: usize) -> Lengthf64 {
        self.first_plane(axis) + plane_index as Lengthf64 * self.voxel_size[axis]
    }

    /// Find centre of voxel with given 3D index
    pub fn voxel_centre(&self, i: Index3_u) -> Point {
        let s = self.voxel_size;
        Point::new((i[0] as Lengthf64 + 0.5) * s[0] - self.half_width[0],
                   (i[1] as Lengthf64 + 0.5) * s[1] - self.half_width[1],
                   (i[2] as Lengthf64 + 0.5) * s[2] - self.half_width[2])
    }

}
