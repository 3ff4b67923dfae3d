use std::sync::Mutex;

#[cfg(not(feature = "serial"))]
use rayon::prelude::*;

use crate::{Error, FOV, Projection, Ray, Volume, VolumeData};
use crate::io::ReadProjection;
use crate::projector::{deposit, traverse, Scratch};
use crate::scanner::Scanner;

/// Reconstruct a volume by backprojecting every projection the reader hands
/// out, one ray per detector pixel.
///
/// Projections are pulled from the reader inside a single-reader critical
/// section; each worker accumulates into its own shadow volume and the
/// shadows are summed at the end, so no voxel update ever races another.
/// The result is deterministic up to the floating-point associativity of
/// that final sum (and bit-reproducible with the `serial` feature, which
/// replaces the parallel fold with a sequential one).
///
/// The first reader error stops further reading; projections already handed
/// out are finished and the error is returned once the workers drain.
pub fn backproject<R, F>(reader: R, scanner: &Scanner, fov: FOV, on_projection: F)
                         -> Result<Volume, Error>
where
    R: ReadProjection + Send,
    F: Fn() + Sync,
{
    let n_projections = scanner.n_projections();
    let reader = Mutex::new(reader);
    let failure = Mutex::new(None);

    // Closure preparing the state needed by `fold`: will be called by
    // `fold` at the start of every thread that is launched.
    let initial_state = || FoldState {
        volume: Volume::zeros_buffer(fov),
        scratch: Scratch::for_fov(&fov),
    };

    let step = |mut state: FoldState, _slot: usize| {
        if let Some(projection) = next_projection(&reader, &failure) {
            backproject_one(&projection, scanner, &fov, &mut state.volume, &mut state.scratch);
            on_projection();
        }
        state
    };

    // Choose between serial and parallel iteration over the sweep. In the
    // parallel case the shadow volumes built on each thread must be summed.
    #[cfg(not(feature = "serial"))]
    let data = (0..n_projections).into_par_iter()
        .fold(initial_state, step)
        .map(|state| state.volume)
        .reduce(|| Volume::zeros_buffer(fov), elementwise_add);

    #[cfg(feature = "serial")]
    let data = (0..n_projections).fold(initial_state(), step).volume;

    match failure.into_inner().unwrap() {
        Some(error) => Err(error),
        None => Ok(Volume::new(fov, data)),
    }
}

// State threaded through the fold: one shadow volume per worker, plus the
// reusable ray-crossing buffers.
struct FoldState {
    volume: VolumeData,
    scratch: Scratch,
}

fn next_projection<R: ReadProjection>(reader: &Mutex<R>, failure: &Mutex<Option<Error>>)
                                      -> Option<Projection> {
    let mut reader = reader.lock().unwrap();
    if failure.lock().unwrap().is_some() {
        return None; // a previous read failed: stop consuming the stream
    }
    match reader.next_projection() {
        Ok(next) => next,
        Err(error) => {
            *failure.lock().unwrap() = Some(error);
            None
        }
    }
}

/// Backproject a single projection into `volume`: one ray per detector
/// pixel, from the projection's source position through the pixel centre.
/// Rays that miss the volume are skipped.
pub fn backproject_one(projection: &Projection, scanner: &Scanner, fov: &FOV,
                       volume: &mut [f64], scratch: &mut Scratch) {
    let source = scanner.source_position(projection.index);
    let normalisation = scanner.dos + scanner.dod;

    for row in 0..projection.n_side_pixels {
        for col in 0..projection.n_side_pixels {
            let pixel = scanner.pixel_position(projection, row, col);
            let ray = Ray::new(source, pixel);
            if traverse(&ray, fov, scratch).is_none() {
                continue;
            }
            let pixel_index = row * projection.n_side_pixels + col;
            let value = projection.normalised(pixel_index);
            deposit(&ray, &scratch.merged, fov, value, normalisation, volume);
        }
    }
}

pub fn elementwise_add(a: VolumeData, b: VolumeData) -> VolumeData {
    a.iter().zip(b.iter()).map(|(l, r)| l + r).collect()
}
