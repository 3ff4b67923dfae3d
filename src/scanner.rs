/// The scan geometry: where the source and the detector sit, and at which
/// angles projections were taken.
///
/// The tables of sines and cosines are built once at construction and never
/// change, so a `&Scanner` can be shared freely between worker threads.

use crate::{Anglef64, Lengthf64, Point, Projection};

#[derive(Clone, Debug)]
pub struct Scanner {
    /// Detector pixel edge length
    pub pixel_size: Lengthf64,
    /// Distance from the volume centre to the source
    pub dos: Lengthf64,
    /// Distance from the volume centre to the detector
    pub dod: Lengthf64,
    /// Total angular sweep, in degrees
    pub aperture: Anglef64,
    /// Angular spacing between projections, in degrees
    pub step: Anglef64,
    sin_table: Vec<f64>,
    cos_table: Vec<f64>,
}

impl Scanner {

    pub fn new(pixel_size: Lengthf64, dos: Lengthf64, dod: Lengthf64,
               aperture: Anglef64, step: Anglef64) -> Self {
        assert!(step > 0.0, "angular step must be positive");
        let n_projections = (aperture / step).round() as usize + 1;
        let mut sin_table = Vec::with_capacity(n_projections);
        let mut cos_table = Vec::with_capacity(n_projections);
        for i in 0..n_projections {
            let theta = (aperture / 2.0 + i as Anglef64 * step).to_radians();
            sin_table.push(theta.sin());
            cos_table.push(theta.cos());
        }
        Self { pixel_size, dos, dod, aperture, step, sin_table, cos_table }
    }

    /// Number of projections in the angular sweep
    pub fn n_projections(&self) -> usize { self.sin_table.len() }

    /// Where the X-ray source sits for the given projection.
    ///
    /// The source is perpendicular to the centre of the detector, so z = 0.
    pub fn source_position(&self, projection_index: usize) -> Point {
        Point::new(-self.sin_table[projection_index] * self.dos,
                    self.cos_table[projection_index] * self.dos,
                    0.0)
    }

    /// Centre of the detector pixel at (`row`, `col`) for this projection.
    pub fn pixel_position(&self, projection: &Projection, row: usize, col: usize) -> Point {
        // Distance from the centre of the detector to the centre of the
        // first pixel, along either detector axis.
        let half = projection.n_side_pixels as Lengthf64 * self.pixel_size / 2.0
                 - self.pixel_size / 2.0;
        let sin = self.sin_table[projection.index];
        let cos = self.cos_table[projection.index];
        let along = -half + col as Lengthf64 * self.pixel_size;

        Point::new( self.dod * sin + cos * along,
                   -self.dod * cos + sin * along,
                   -half + row as Lengthf64 * self.pixel_size)
    }

}

/// Which slot of the angular sweep a projection taken at `angle` (degrees,
/// already normalised into [-360, 360]) belongs to.
pub fn index_for_angle(angle: Anglef64, n_projections: usize) -> usize {
    let index = ((angle + 180.0) / 360.0 * n_projections as f64).floor() as isize;
    index.rem_euclid(n_projections as isize) as usize
}
