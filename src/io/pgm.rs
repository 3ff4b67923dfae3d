/// Reader for the text projection container: a PGM raster whose height is
/// `width × n_projections`, with a `# angle:` comment line introducing each
/// projection's block of whitespace-separated integer samples.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crate::{Error, Projection};
use super::{ReadProjection, SweepTracker, MAX_SIDE_PIXELS};

pub struct PgmReader<R: BufRead> {
    input: R,
    path: PathBuf,
    width: usize,
    max_val: f64,
    projections_in_file: usize,
    read_so_far: usize,
    sweep: SweepTracker,
}

impl<R: BufRead> PgmReader<R> {

    /// Reads and checks the three-line header (`P2` magic, dimensions,
    /// maximum sample value) up front, so a malformed file fails before any
    /// reconstruction work starts.
    pub fn new(mut input: R, path: PathBuf, n_projections: usize) -> Result<Self, Error> {
        let mut tokens: Vec<String> = Vec::with_capacity(4);
        while tokens.len() < 4 {
            let mut line = String::new();
            if read_line(&mut input, &mut line, &path)? == 0 {
                return Err(Error::malformed(&path, "truncated header"));
            }
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            tokens.extend(trimmed.split_whitespace().map(String::from));
        }
        if tokens.len() > 4 {
            return Err(Error::malformed(&path, "unexpected tokens in header"));
        }

        if tokens[0] != "P2" {
            return Err(Error::malformed(&path, format!("bad magic {:?}, expected \"P2\"", tokens[0])));
        }
        let width: usize = tokens[1].parse()
            .map_err(|_| Error::malformed(&path, format!("bad width {:?}", tokens[1])))?;
        let height: usize = tokens[2].parse()
            .map_err(|_| Error::malformed(&path, format!("bad height {:?}", tokens[2])))?;
        let max_val: f64 = tokens[3].parse()
            .map_err(|_| Error::malformed(&path, format!("bad maximum value {:?}", tokens[3])))?;

        if width == 0 || width > MAX_SIDE_PIXELS {
            return Err(Error::malformed(&path, format!("implausible detector side {}", width)));
        }
        if max_val <= 0.0 {
            return Err(Error::malformed(&path, "maximum sample value must be positive"));
        }
        if height % width != 0 {
            return Err(Error::malformed(
                &path, format!("height {} is not a multiple of width {}", height, width)));
        }
        let projections_in_file = height / width;
        if projections_in_file != n_projections {
            return Err(Error::malformed(
                &path,
                format!("file holds {} projections, the sweep needs {}",
                        projections_in_file, n_projections)));
        }

        Ok(Self {
            input, path, width, max_val, projections_in_file,
            read_so_far: 0,
            sweep: SweepTracker::new(n_projections),
        })
    }

    fn find_angle(&mut self) -> Result<f64, Error> {
        loop {
            let mut line = String::new();
            if read_line(&mut self.input, &mut line, &self.path)? == 0 {
                return Err(Error::read(&self.path, unexpected_eof()));
            }
            let trimmed = line.trim();
            if !trimmed.starts_with('#') {
                continue;
            }
            let comment = trimmed.trim_start_matches('#').trim_start();
            if let Some(rest) = comment.strip_prefix("angle:") {
                return rest.trim().parse().map_err(|_| {
                    Error::malformed(&self.path, format!("bad angle {:?}", rest.trim()))
                });
            }
        }
    }

}

impl<R: BufRead> ReadProjection for PgmReader<R> {

    fn next_projection(&mut self) -> Result<Option<Projection>, Error> {
        if self.read_so_far == self.projections_in_file {
            return Ok(None);
        }

        let angle = self.find_angle()?;
        let (index, angle) = self.sweep.slot_for(angle, &self.path)?;

        let n_samples = self.width * self.width;
        let mut pixels = Vec::with_capacity(n_samples);
        while pixels.len() < n_samples {
            let mut line = String::new();
            if read_line(&mut self.input, &mut line, &self.path)? == 0 {
                return Err(Error::read(&self.path, unexpected_eof()));
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                return Err(Error::malformed(&self.path, "comment interrupts sample data"));
            }
            for token in trimmed.split_whitespace() {
                if pixels.len() == n_samples {
                    return Err(Error::malformed(&self.path, "more samples than the header declares"));
                }
                let value: f64 = token.parse()
                    .map_err(|_| Error::malformed(&self.path, format!("bad sample {:?}", token)))?;
                pixels.push(value);
            }
        }

        self.read_so_far += 1;
        Ok(Some(Projection {
            index,
            angle,
            n_side_pixels: self.width,
            min_val: 0.0, // PGM samples start at zero
            max_val: self.max_val,
            pixels,
        }))
    }

}

fn read_line(input: &mut impl BufRead, line: &mut String, path: &Path) -> Result<usize, Error> {
    input.read_line(line).map_err(|e| Error::read(path, e))
}

fn unexpected_eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of projection data")
}

#[cfg(test)]
mod test {
    use super::*;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};
    use std::io::Cursor;

    fn reader(text: &str, n_projections: usize) -> Result<PgmReader<Cursor<Vec<u8>>>, Error> {
        PgmReader::new(Cursor::new(text.as_bytes().to_vec()),
                       PathBuf::from("test.pgm"),
                       n_projections)
    }

    const TWO_PROJECTIONS: &str = "\
P2
2 4
255
# angle: 0.0
1 2
3 4
# angle: -180.0
5 6 7 8
";

    #[test]
    fn reads_every_projection_then_ends() {
        let mut pgm = reader(TWO_PROJECTIONS, 2).unwrap();

        let first = pgm.next_projection().unwrap().unwrap();
        assert_eq!(first.n_side_pixels, 2);
        assert_eq!(first.pixels, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(first.min_val, 0.0);
        assert_eq!(first.max_val, 255.0);
        // slot = floor((0 + 180) / 360 * 2) = 1
        assert_eq!(first.index, 1);

        let second = pgm.next_projection().unwrap().unwrap();
        assert_eq!(second.index, 0);
        assert_eq!(second.pixels, vec![5.0, 6.0, 7.0, 8.0]);

        assert!(pgm.next_projection().unwrap().is_none());
    }

    #[test]
    fn rejects_wrong_magic() {
        let text = TWO_PROJECTIONS.replacen("P2", "P5", 1);
        assert!(matches!(reader(&text, 2), Err(Error::Malformed { .. })));
    }

    #[test]
    fn rejects_projection_count_mismatch() {
        assert!(matches!(reader(TWO_PROJECTIONS, 7), Err(Error::Malformed { .. })));
    }

    #[test]
    fn rejects_out_of_range_angle() {
        let text = TWO_PROJECTIONS.replacen("# angle: 0.0", "# angle: 400.0", 1);
        let mut pgm = reader(&text, 2).unwrap();
        assert!(matches!(pgm.next_projection(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn rejects_angles_landing_on_the_same_slot() {
        let text = TWO_PROJECTIONS.replacen("# angle: -180.0", "# angle: 10.0", 1);
        let mut pgm = reader(&text, 2).unwrap();
        pgm.next_projection().unwrap();
        assert!(matches!(pgm.next_projection(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn truncated_samples_surface_as_a_read_error() {
        let text = "P2\n2 4\n255\n# angle: 0.0\n1 2 3\n";
        let mut pgm = reader(text, 2).unwrap();
        assert!(matches!(pgm.next_projection(), Err(Error::Read { .. })));
    }
}
