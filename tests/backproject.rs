//! End-to-end reconstruction scenarios, driven through an in-memory
//! projection source so no files are involved.

use float_eq::assert_float_eq;
#[allow(unused)] use pretty_assertions::assert_eq;

use conebeam::backproject::backproject;
use conebeam::io::ReadProjection;
use conebeam::scanner::Scanner;
use conebeam::{Error, FOV, Projection, Volume};

/// Hands out pre-built projections one at a time, like the file readers do.
struct VecSource(std::vec::IntoIter<Projection>);

impl VecSource {
    fn new(projections: Vec<Projection>) -> Self {
        Self(projections.into_iter())
    }
}

impl ReadProjection for VecSource {
    fn next_projection(&mut self) -> Result<Option<Projection>, Error> {
        Ok(self.0.next())
    }
}

/// One projection per sweep slot, every pixel at the same value.
fn uniform_projections(scanner: &Scanner, n_side: usize, value: f64, max_val: f64)
                       -> Vec<Projection> {
    (0..scanner.n_projections())
        .map(|index| Projection {
            index,
            angle: 0.0, // reconstruction only looks at the slot
            n_side_pixels: n_side,
            min_val: 0.0,
            max_val,
            pixels: vec![value; n_side * n_side],
        })
        .collect()
}

/// Reference scanner scaled down to a 100 µm cube of 10³ voxels: detector
/// and source at the reference 1.5 and 6 cube edges from the centre, and a
/// detector wide enough to cover the whole cube from every angle.
fn small_scanner(aperture: f64, step: f64) -> (Scanner, FOV) {
    let scanner = Scanner::new(10.0, 600.0, 150.0, aperture, step);
    let fov = FOV::new((100.0, 100.0, 100.0), (10, 10, 10));
    (scanner, fov)
}

const N_SIDE: usize = 32;

fn reconstruct(scanner: &Scanner, fov: FOV, projections: Vec<Projection>) -> Volume {
    backproject(VecSource::new(projections), scanner, fov, || ()).unwrap()
}

// --------------------------------------------------------------------------------

#[test]
fn minimum_valued_projections_leave_the_volume_empty() {
    let (scanner, fov) = small_scanner(90.0, 15.0);
    let projections = uniform_projections(&scanner, N_SIDE, 0.0, 255.0);
    let volume = reconstruct(&scanner, fov, projections);
    assert!(volume.data.iter().all(|v| *v == 0.0));
}

#[test]
fn saturated_projections_fill_every_interior_voxel() {
    let (scanner, fov) = small_scanner(90.0, 15.0);
    let projections = uniform_projections(&scanner, N_SIDE, 255.0, 255.0);
    let volume = reconstruct(&scanner, fov, projections);

    assert!(volume.data.iter().all(|v| *v >= 0.0));
    for x in 1..9 {
        for y in 1..9 {
            for z in 1..9 {
                assert!(volume[[x, y, z]] > 0.0,
                        "interior voxel ({x} {y} {z}) was never crossed");
            }
        }
    }
}

#[test]
fn single_ray_through_the_centre_voxel() {
    // One 1x1 projection at angle zero: the single ray runs along the y
    // axis and crosses the one 100 µm voxel; the deposited value is the
    // segment length over the source-to-detector distance.
    let scanner = Scanner::new(85.0, 600.0, 150.0, 0.0, 15.0);
    let fov = FOV::new((100.0, 100.0, 100.0), (1, 1, 1));
    let projection = Projection {
        index: 0,
        angle: 0.0,
        n_side_pixels: 1,
        min_val: 0.0,
        max_val: 255.0,
        pixels: vec![255.0],
    };
    let volume = reconstruct(&scanner, fov, vec![projection]);
    assert_eq!(volume.data.len(), 1);
    assert_float_eq!(volume[0], 100.0 / 750.0, rel <= 1e-12);
}

#[test]
fn mirrored_projections_give_a_mirrored_volume() {
    // A 90 degree sweep in one 90 degree step puts the two sources at 45
    // and 135 degrees, mirror images across the y = 0 plane, so uniform
    // projections must reconstruct a volume symmetric in y.
    let (scanner, fov) = small_scanner(90.0, 90.0);
    let projections = uniform_projections(&scanner, N_SIDE, 200.0, 255.0);
    let volume = reconstruct(&scanner, fov, projections);

    let [nx, ny, nz] = fov.n;
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let a = volume[[x, y, z]];
                let b = volume[[x, ny - 1 - y, z]];
                assert_float_eq!(a, b, abs <= 1e-15, rel <= 1e-6);
            }
        }
    }
}

#[test]
fn single_threaded_runs_are_reproducible() {
    let (scanner, fov) = small_scanner(90.0, 15.0);
    let projections = uniform_projections(&scanner, N_SIDE, 123.0, 255.0);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let run = || {
        pool.install(|| reconstruct(&scanner, fov, projections.clone()))
    };
    let first = run();
    let second = run();
    assert_eq!(first.data, second.data);
}

#[test]
fn parallel_and_serial_sums_agree() {
    let (scanner, fov) = small_scanner(90.0, 15.0);
    let projections = uniform_projections(&scanner, N_SIDE, 200.0, 255.0);

    let sum_with = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        let volume = pool.install(|| reconstruct(&scanner, fov, projections.clone()));
        volume.data.iter().sum::<f64>()
    };

    let serial = sum_with(1);
    let parallel = sum_with(4);
    assert!(serial > 0.0);
    assert_float_eq!(parallel, serial, rel <= 1e-9);
}

// --------------------------------------------------------------------------------

/// Yields a few good projections, then fails like a truncated file.
struct FailingSource {
    good: std::vec::IntoIter<Projection>,
}

impl ReadProjection for FailingSource {
    fn next_projection(&mut self) -> Result<Option<Projection>, Error> {
        match self.good.next() {
            Some(projection) => Ok(Some(projection)),
            None => Err(Error::read(
                std::path::Path::new("broken.dat"),
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof,
                                    "unexpected end of projection data"))),
        }
    }
}

#[test]
fn a_failing_reader_surfaces_its_error() {
    let (scanner, fov) = small_scanner(90.0, 15.0);
    let mut projections = uniform_projections(&scanner, N_SIDE, 200.0, 255.0);
    projections.truncate(3);
    let source = FailingSource { good: projections.into_iter() };
    let result = backproject(source, &scanner, fov, || ());
    assert!(matches!(result, Err(Error::Read { .. })));
}
