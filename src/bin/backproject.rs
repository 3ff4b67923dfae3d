// ----------------------------------- CLI -----------------------------------
use structopt::StructOpt;

use std::path::PathBuf;

#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "backproject",
            about = "Reconstruct a 3D absorption volume from cone-beam X-ray projections")]
pub struct Cli {

    /// Projection stream to read (.pgm or .dat)
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,

    /// Volume file to write (.nrrd or .raw)
    #[structopt(parse(from_os_str))]
    pub output: PathBuf,

    /// TOML file overriding the default scan geometry
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,

    #[cfg(not(feature = "serial"))]
    /// Maximum number of rayon threads
    #[structopt(short = "j", long, default_value = "4")]
    pub num_threads: usize,

}

// --------------------------------------------------------------------------------

use std::error::Error;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use conebeam::backproject::backproject;
use conebeam::config::{read_config_file, Config};
use conebeam::io::{self, nrrd, raw, OutputFormat};

fn main() -> Result<(), Box<dyn Error>> {

    let args = Cli::from_args();

    if args.input == args.output {
        return Err("output file can't be the same as the input file".into());
    }

    let config = match &args.config {
        Some(path) => read_config_file(path.clone()),
        None => Config::default(),
    };

    // Fail on an unusable output path before doing any work
    let output_format = OutputFormat::from_path(&args.output)?;

    let fov = config.grid.fov();
    let scanner = config.detector.scanner(&config.grid);
    let n_projections = scanner.n_projections();

    #[cfg(not(feature = "serial"))]
    // Set the maximum number of threads used by rayon for parallel iteration
    match rayon::ThreadPoolBuilder::new().num_threads(args.num_threads).build_global() {
        Err(e) => eprintln!("{}", e),
        Ok(_) => eprintln!("Using up to {} threads.", args.num_threads),
    }

    // Set up progress reporting and timing
    let mut now = Instant::now();
    let mut report_time = |message: &str| {
        eprintln!("{}: {} ms", message, now.elapsed().as_millis());
        now = Instant::now();
    };

    let reader = io::open(&args.input, n_projections)?;

    let bar = ProgressBar::new(n_projections as u64);
    bar.set_style(ProgressStyle::default_bar()
                  .template("[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")
                  .unwrap());

    let volume = backproject(reader, &scanner, fov, || bar.inc(1))?;
    bar.finish();
    report_time("backprojected all projections");

    match output_format {
        OutputFormat::Nrrd => nrrd::write(&volume, &args.output, config.output.format)?,
        OutputFormat::Raw => {
            raw::write(volume.data.iter().copied(), &args.output)
                .map_err(|e| conebeam::Error::write(&args.output, e))?;
            // The raw dump is headerless: report the grid so an external
            // viewer can reassemble it.
            let [nx, ny, nz] = fov.n;
            eprintln!("wrote {} x {} x {} voxels of {} x {} x {} um (x fastest, then z, then y)",
                      nx, ny, nz, fov.voxel_size[0], fov.voxel_size[1], fov.voxel_size[2]);
        }
    }
    report_time("wrote volume");

    Ok(())
}
