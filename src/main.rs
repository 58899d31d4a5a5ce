use std::path::PathBuf;

use pupil_screening::{
    raster, Config, FilterPlacement, MtfStrategy, Readout, ShiftConvention, Sweep,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pupil-screening",
    about = "Aperture, PSF and MTF of a centrally obstructed circular pupil"
)]
struct Opt {
    /// Number of samples per axis
    #[structopt(short = "n", long, default_value = "1024")]
    grid_size: usize,
    /// Pupil radius
    #[structopt(short = "r", long, default_value = "1")]
    pupil_radius: f64,
    /// Wavelength [m]
    #[structopt(short, long, default_value = "550e-9")]
    wavelength: f64,
    /// Obstruction ratios, overrides the evenly spaced range
    #[structopt(short, long)]
    epsilon: Vec<f64>,
    /// First obstruction ratio of the range
    #[structopt(long, default_value = "0.1")]
    start: f64,
    /// Last obstruction ratio of the range
    #[structopt(long, default_value = "0.8")]
    stop: f64,
    /// Number of obstruction ratios in the range
    #[structopt(long, default_value = "8")]
    count: usize,
    /// De-shift the aperture before the Fourier transform
    #[structopt(long)]
    decentered: bool,
    /// Save the OTF modulus maps instead of the central row profiles
    #[structopt(long)]
    mtf_map: bool,
    /// Grayscale image to simulate through the pupil
    #[structopt(short, long, parse(from_os_str))]
    image: Option<PathBuf>,
    /// Apply the filter to the unshifted image spectrum
    #[structopt(long)]
    unshifted_filter: bool,
    /// Use the modulus instead of the real part of the filtered image
    #[structopt(long)]
    magnitude: bool,
    /// Output directory
    #[structopt(short, long, default_value = "figures", parse(from_os_str))]
    output: PathBuf,
    /// Plot the MTF curves (requires the `plot` feature)
    #[structopt(short, long)]
    plot: bool,
}

#[cfg(feature = "plot")]
fn plot_mtf(sweep: &Sweep, filename: PathBuf) -> anyhow::Result<()> {
    pupil_screening::plot::mtf_curves(sweep, filename).map_err(|e| anyhow::anyhow!("{}", e))
}
#[cfg(not(feature = "plot"))]
fn plot_mtf(_sweep: &Sweep, _filename: PathBuf) -> anyhow::Result<()> {
    log::warn!("MTF plotting requires the `plot` feature");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut config = Config::default()
        .grid_size(opt.grid_size)
        .pupil_radius(opt.pupil_radius)
        .wavelength(opt.wavelength);
    config = if opt.epsilon.is_empty() {
        config.epsilon_range(opt.start, opt.stop, opt.count)
    } else {
        config.epsilon_values(opt.epsilon.clone())
    };
    if opt.decentered {
        config = config.shift(ShiftConvention::Decentered);
    }
    if opt.mtf_map {
        config = config.mtf(MtfStrategy::Magnitude);
    }
    if opt.unshifted_filter {
        config = config.placement(FilterPlacement::Unshifted);
    }
    if opt.magnitude {
        config = config.readout(Readout::Magnitude);
    }
    config.validate_scalars()?;
    log::info!("{:?}", config);

    let mut sweep = Sweep::run(&config);
    for (epsilon, error) in sweep.failures() {
        eprintln!("ε={}: {}", epsilon, error);
    }
    if let Some(path) = &opt.image {
        let image = raster::load_grayscale(path, config.grid_size)?;
        let n = sweep.simulate(&image);
        log::info!("{} simulated images", n);
    }

    sweep.save_figures(&opt.output)?;
    if config.mtf == MtfStrategy::CentralRow {
        sweep.to_csv(opt.output.join("mtf.csv"))?;
    }
    if opt.plot && config.mtf == MtfStrategy::CentralRow {
        plot_mtf(&sweep, opt.output.join("mtf.svg"))?;
    }

    println!("SUMMARY:");
    println!(
        " - pupil radius: {}, wavelength: {:.0}nm, grid: {}x{}",
        config.pupil_radius,
        config.wavelength * 1e9,
        config.grid_size,
        config.grid_size
    );
    println!(" - {:^14} | {:>12}", "CASE", "OPEN SAMPLES");
    for analysis in sweep.analyses() {
        println!(
            " - {:^14} | {:>12}",
            analysis.label(),
            analysis.aperture.transmittance()
        );
    }
    Ok(())
}
