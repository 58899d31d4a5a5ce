//! MTF curves
//!
//! Compares the MTF central row profiles of pupils with increasing obstruction

use pupil_screening::{plot, Config, ShiftConvention, Sweep};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "mtf-curves")]
struct Opt {
    /// Number of samples per axis
    #[structopt(short = "n", long, default_value = "1024")]
    grid_size: usize,
    /// Obstruction ratios
    #[structopt(short, long, default_value = "0.1,0.2,0.3,0.4,0.5,0.6,0.7,0.8", use_delimiter = true)]
    epsilon: Vec<f64>,
    /// SVG file
    #[structopt(short, long, default_value = "mtf.svg")]
    filename: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let config = Config::default()
        .grid_size(opt.grid_size)
        .epsilon_values(opt.epsilon)
        .shift(ShiftConvention::Decentered);
    config.validate_scalars()?;
    let sweep = Sweep::run(&config);
    plot::mtf_curves(&sweep, &opt.filename).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("MTF curves written to {}", opt.filename);
    Ok(())
}
