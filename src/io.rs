use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{Error, Projection};

pub mod dat;
pub mod nrrd;
pub mod pgm;
pub mod raw;

/// A source of projections. Readers hand out projections one at a time, in
/// file order; `Ok(None)` marks the end of the stream.
pub trait ReadProjection {
    fn next_projection(&mut self) -> Result<Option<Projection>, Error>;
}

impl<R: ReadProjection + ?Sized> ReadProjection for Box<R> {
    fn next_projection(&mut self) -> Result<Option<Projection>, Error> {
        (**self).next_projection()
    }
}

/// Projection container format, deduced from the file suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat { Pgm, Dat }

/// Volume container format, deduced from the file suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat { Nrrd, Raw }

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match extension_of(path).as_deref() {
            Some("pgm") => Ok(Self::Pgm),
            Some("dat") => Ok(Self::Dat),
            _ => Err(Error::UnsupportedFormat { path: path.to_owned(), expected: ".pgm or .dat" }),
        }
    }
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match extension_of(path).as_deref() {
            Some("nrrd") => Ok(Self::Nrrd),
            Some("raw") => Ok(Self::Raw),
            _ => Err(Error::UnsupportedFormat { path: path.to_owned(), expected: ".nrrd or .raw" }),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

// Detector sides beyond this are taken as header corruption rather than an
// instruction to allocate gigabytes of pixel buffer.
pub(crate) const MAX_SIDE_PIXELS: usize = 32_768;

/// Validates angles coming out of a container and assigns each projection
/// its slot in the angular sweep, rejecting collisions.
pub(crate) struct SweepTracker {
    seen: Vec<bool>,
}

impl SweepTracker {
    pub(crate) fn new(n_projections: usize) -> Self {
        Self { seen: vec![false; n_projections] }
    }

    /// Check `angle` (degrees) and derive the sweep slot of its projection.
    /// Returns the slot and the angle normalised modulo 360.
    pub(crate) fn slot_for(&mut self, angle: f64, path: &Path) -> Result<(usize, f64), Error> {
        if !angle.is_finite() || !(-360.0..=360.0).contains(&angle) {
            return Err(Error::malformed(path, format!("angle {} out of [-360, 360]", angle)));
        }
        let angle = angle % 360.0;
        let index = crate::scanner::index_for_angle(angle, self.seen.len());
        if std::mem::replace(&mut self.seen[index], true) {
            return Err(Error::malformed(
                path, format!("two projections map to the same sweep slot {}", index)));
        }
        Ok((index, angle))
    }
}

/// Open the projection stream at `path`, picking the reader by suffix.
/// `n_projections` is the expected length of the angular sweep: the stream
/// must contain exactly that many projections.
pub fn open(path: &Path, n_projections: usize)
            -> Result<Box<dyn ReadProjection + Send>, Error> {
    let format = InputFormat::from_path(path)?;
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    let input = BufReader::new(file);
    Ok(match format {
        InputFormat::Pgm => Box::new(pgm::PgmReader::new(input, path.to_owned(), n_projections)?),
        InputFormat::Dat => Box::new(dat::DatReader::new(input, path.to_owned(), n_projections)?),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn formats_follow_the_file_suffix() {
        assert_eq!(InputFormat::from_path(Path::new("scan.pgm")).unwrap(), InputFormat::Pgm);
        assert_eq!(InputFormat::from_path(Path::new("scan.DAT")).unwrap(), InputFormat::Dat);
        assert!(InputFormat::from_path(Path::new("scan.tiff")).is_err());
        assert!(InputFormat::from_path(Path::new("scan")).is_err());
        assert_eq!(OutputFormat::from_path(&PathBuf::from("out.nrrd")).unwrap(), OutputFormat::Nrrd);
        assert_eq!(OutputFormat::from_path(&PathBuf::from("out.raw")).unwrap(), OutputFormat::Raw);
        assert!(OutputFormat::from_path(&PathBuf::from("out.nii")).is_err());
    }
}
