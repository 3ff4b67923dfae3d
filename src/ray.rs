use crate::{Lengthf64, Point, Vector};

/// A single X-ray path: the line joining the source to the centre of one
/// detector pixel.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub source: Point,
    pub pixel: Point,
}

impl Ray {
    pub fn new(source: Point, pixel: Point) -> Self { Self { source, pixel } }

    /// Direction deltas from source to pixel
    pub fn delta(&self) -> Vector { self.pixel - self.source }

    /// Euclidean distance between source and pixel
    pub fn length(&self) -> Lengthf64 { self.delta().norm() }
}

use core::fmt;
impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (s, p) = (self.source, self.pixel);
        write!(f, "<ray ({:9.1} {:9.1} {:9.1}) -> ({:9.1} {:9.1} {:9.1}) /{:9.1}>",
               s.x, s.y, s.z, p.x, p.y, p.z, self.length())
    }
}
