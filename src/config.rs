//! Configuration file parser for the scan geometry
//!
//! Every section and field is optional; the defaults reproduce the reference
//! scanner (100 µm voxels in a 100 mm cube, 85 µm pixels, a 90° sweep in 15°
//! steps, detector at 150 mm and source at 600 mm from the centre).

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::{Anglef64, FOV, Lengthf64};
use crate::io::nrrd::Encoding;
use crate::scanner::Scanner;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Extent and granularity of the voxel grid
    #[serde(default)]
    pub grid: Grid,

    /// Detector pixel pitch and the angular sweep
    #[serde(default)]
    pub detector: Detector,

    /// Output encoding options
    #[serde(default)]
    pub output: Output,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Grid {

    /// Voxel edge lengths along x, y, z, in µm
    #[serde(default = "default_voxel_size")]
    pub voxel_size: (Lengthf64, Lengthf64, Lengthf64),

    /// Scale the scan down for benchmarking: the cube edge becomes
    /// `work_units · voxel_size.0 · 125/294`, with the detector at 1.5 and
    /// the source at 6 cube edges from the centre.
    #[serde(default)]
    pub work_units: Option<f64>,
}

impl Default for Grid {
    fn default() -> Self {
        Self { voxel_size: default_voxel_size(), work_units: None }
    }
}

fn default_voxel_size() -> (Lengthf64, Lengthf64, Lengthf64) { (100.0, 100.0, 100.0) }

impl Grid {

    /// Edge length of the cubic region covered by the voxel grid
    pub fn matrix_size(&self) -> Lengthf64 {
        match self.work_units {
            Some(units) => (units * self.voxel_size.0 * 125.0 / 294.0).trunc(),
            None => 100_000.0,
        }
    }

    /// Distance from the volume centre to the detector
    pub fn dod(&self) -> Lengthf64 { (1.5 * self.matrix_size()).trunc() }

    /// Distance from the volume centre to the source
    pub fn dos(&self) -> Lengthf64 { (6.0 * self.matrix_size()).trunc() }

    pub fn n_voxels(&self) -> [usize; 3] {
        let m = self.matrix_size();
        let (x, y, z) = self.voxel_size;
        [(m / x) as usize, (m / y) as usize, (m / z) as usize]
    }

    pub fn fov(&self) -> FOV {
        let [nx, ny, nz] = self.n_voxels();
        let (x, y, z) = self.voxel_size;
        FOV::new((x * nx as Lengthf64, y * ny as Lengthf64, z * nz as Lengthf64),
                 (nx, ny, nz))
    }

}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Detector {

    /// Detector pixel edge length in µm
    #[serde(default = "default_pixel_size")]
    pub pixel_size: Lengthf64,

    /// Total angular sweep in degrees
    #[serde(default = "default_aperture")]
    pub aperture: Anglef64,

    /// Angular spacing between projections in degrees
    #[serde(default = "default_step")]
    pub step: Anglef64,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            pixel_size: default_pixel_size(),
            aperture: default_aperture(),
            step: default_step(),
        }
    }
}

fn default_pixel_size() -> Lengthf64 { 85.0 }
fn default_aperture() -> Anglef64 { 90.0 }
fn default_step() -> Anglef64 { 15.0 }

impl Detector {
    pub fn scanner(&self, grid: &Grid) -> Scanner {
        let steps = self.aperture / self.step;
        assert!((steps - steps.round()).abs() < 1e-9,
                "angular step {} must divide the aperture {}", self.step, self.aperture);
        Scanner::new(self.pixel_size, grid.dos(), grid.dod(), self.aperture, self.step)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Output {

    /// Payload encoding for NRRD output: "binary" or "ascii"
    #[serde(default = "default_format")]
    pub format: Encoding,
}

impl Default for Output {
    fn default() -> Self { Self { format: default_format() } }
}

fn default_format() -> Encoding { Encoding::Raw }

pub fn read_config_file(path: PathBuf) -> Config {
    let config: String = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Couldn't read config file `{:?}`", path));
    toml::from_str(&config)
        .unwrap_or_else(|e| panic!("Couldn't parse config file `{:?}`: {}", path, e))
}
