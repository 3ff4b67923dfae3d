/// NRRD volume writer: a textual NRRD0005 header describing the grid,
/// followed by the voxel array in the fixed disk layout (x fastest, then z,
/// then y — so the size/spacing/min lists are ordered x z y, fastest first).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Volume};

/// How the voxel array is encoded after the header. The configuration calls
/// these `ascii` and `binary`; NRRD calls the binary one `raw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Ascii,
    #[serde(rename = "binary")]
    Raw,
}

pub fn write(volume: &Volume, path: &Path, encoding: Encoding) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::write(path, e))?;
    let mut out = BufWriter::new(file);
    write_volume(volume, &mut out, encoding).map_err(|e| Error::write(path, e))
}

fn write_volume(volume: &Volume, out: &mut impl Write, encoding: Encoding)
                -> std::io::Result<()> {
    let fov = &volume.fov;
    let [nx, ny, nz] = fov.n;
    let s = fov.voxel_size;

    writeln!(out, "NRRD0005")?;
    writeln!(out, "# Complete NRRD file format specification at:")?;
    writeln!(out, "# http://teem.sourceforge.net/nrrd/format.html")?;
    writeln!(out, "type: double")?;
    writeln!(out, "dimension: 3")?;
    writeln!(out, "sizes: {} {} {}", nx, nz, ny)?;
    writeln!(out, "spacings: {} {} {}", s[0], s[2], s[1])?;
    writeln!(out, "axis mins: {} {} {}",
             fov.first_plane(0), fov.first_plane(2), fov.first_plane(1))?;
    writeln!(out, "endian: little")?;
    writeln!(out, "encoding: {}",
             match encoding { Encoding::Raw => "raw", Encoding::Ascii => "ascii" })?;
    writeln!(out)?; // blank line separates header from data

    match encoding {
        Encoding::Raw => {
            for v in &volume.data {
                out.write_all(&v.to_le_bytes())?;
            }
        }
        Encoding::Ascii => {
            for v in &volume.data {
                writeln!(out, "{}", v)?;
            }
        }
    }
    out.flush()
}
