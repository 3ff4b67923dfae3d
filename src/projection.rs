use crate::{Anglef64, Intensityf64};

/// One 2D image taken at a fixed source angle, as delivered by the readers.
///
/// `pixels` holds `n_side_pixels²` samples in row-major order; rows run along
/// the detector's z axis, columns along its in-plane axis. `min_val` and
/// `max_val` are the sample range declared by the container (`max_val` is
/// strictly greater than `min_val` for any projection a reader hands out).
#[derive(Clone, Debug)]
pub struct Projection {
    /// Position of this projection in the angular sweep, derived from `angle`
    pub index: usize,
    /// Source angle in degrees, normalised into [-360, 360]
    pub angle: Anglef64,
    pub n_side_pixels: usize,
    pub min_val: Intensityf64,
    pub max_val: Intensityf64,
    pub pixels: Vec<Intensityf64>,
}

impl Projection {
    /// Sample at `pixel_index`, rescaled into [0, 1]
    pub fn normalised(&self, pixel_index: usize) -> Intensityf64 {
        (self.pixels[pixel_index] - self.min_val) / (self.max_val - self.min_val)
    }
}

use core::fmt;
impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<projection {} at {:7.2} deg, {}x{} pixels in [{}, {}]>",
               self.index, self.angle, self.n_side_pixels, self.n_side_pixels,
               self.min_val, self.max_val)
    }
}
