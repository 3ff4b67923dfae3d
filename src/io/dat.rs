/// Reader for the binary projection container: a little-endian header
/// `(i32 n_projections, i32 width, f64 max, f64 min)` followed, per
/// projection, by `f64 angle` and `width²` `f64` samples.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::{Error, Projection};
use super::{ReadProjection, SweepTracker, MAX_SIDE_PIXELS};

pub struct DatReader<R: Read> {
    input: R,
    path: PathBuf,
    width: usize,
    min_val: f64,
    max_val: f64,
    projections_in_file: usize,
    read_so_far: usize,
    sweep: SweepTracker,
}

impl<R: Read> DatReader<R> {

    pub fn new(mut input: R, path: PathBuf, n_projections: usize) -> Result<Self, Error> {
        let count = read_i32(&mut input, &path)?;
        let width = read_i32(&mut input, &path)?;
        let max_val = read_f64(&mut input, &path)?;
        let min_val = read_f64(&mut input, &path)?;

        if count < 0 || count as usize != n_projections {
            return Err(Error::malformed(
                &path, format!("file holds {} projections, the sweep needs {}", count, n_projections)));
        }
        if width <= 0 || width as usize > MAX_SIDE_PIXELS {
            return Err(Error::malformed(&path, format!("implausible detector side {}", width)));
        }
        if !(max_val > min_val) {
            return Err(Error::malformed(
                &path, format!("empty sample range [{}, {}]", min_val, max_val)));
        }

        Ok(Self {
            input, path, min_val, max_val,
            width: width as usize,
            projections_in_file: count as usize,
            read_so_far: 0,
            sweep: SweepTracker::new(n_projections),
        })
    }

}

impl<R: Read> ReadProjection for DatReader<R> {

    fn next_projection(&mut self) -> Result<Option<Projection>, Error> {
        if self.read_so_far == self.projections_in_file {
            return Ok(None);
        }

        let angle = read_f64(&mut self.input, &self.path)?;
        let (index, angle) = self.sweep.slot_for(angle, &self.path)?;

        let n_samples = self.width * self.width;
        let mut pixels = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            pixels.push(read_f64(&mut self.input, &self.path)?);
        }

        self.read_so_far += 1;
        Ok(Some(Projection {
            index,
            angle,
            n_side_pixels: self.width,
            min_val: self.min_val,
            max_val: self.max_val,
            pixels,
        }))
    }

}

fn read_i32(input: &mut impl Read, path: &Path) -> Result<i32, Error> {
    let mut bytes = [0; 4];
    input.read_exact(&mut bytes).map_err(|e| Error::read(path, e))?;
    Ok(i32::from_le_bytes(bytes))
}

fn read_f64(input: &mut impl Read, path: &Path) -> Result<f64, Error> {
    let mut bytes = [0; 8];
    input.read_exact(&mut bytes).map_err(|e| Error::read(path, e))?;
    Ok(f64::from_le_bytes(bytes))
}
