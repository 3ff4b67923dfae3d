pub use crate::{
    error::Error,
    fov::FOV,
    index::{BoxDim_u, Index1_u, Index3_u},
    projection::Projection,
    ray::Ray,
    volume::{Volume, VolumeData},
};

/// Units which are simply type aliases for `f64` rather than having a typed
/// quantity implementation. All lengths are micrometres; angles are degrees
/// unless a function says otherwise. Plain floats keep the numerics simple,
/// but we still want some clues in the source as to what they represent.
pub type Lengthf64     = f64;
pub type Anglef64      = f64;
pub type Intensityf64  = f64;
pub type Absorptionf64 = f64;

pub type Point  = nalgebra::Point3<Lengthf64>;
pub type Vector = nalgebra::Vector3<Lengthf64>;
