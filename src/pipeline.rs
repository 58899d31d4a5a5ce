/*!
# Pipeline

[`Analysis`] runs the aperture → OTF → {PSF, MTF} chain for a single
obstruction ratio; [`Sweep`] repeats it for every ratio of a [`Config`]
plus the unobstructed reference, keeping each outcome independently so
that one failure never aborts the others.
*/

use std::{
    collections::HashSet,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
    time::Instant,
};

use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::DMatrix;

use crate::{
    aperture::Aperture,
    config::Config,
    error::{Error, Result},
    figure::{Colormap, Figure, FigureError},
    mtf::Mtf,
    otf::{calculate_otf, calculate_psf},
    raster::{save_gray, RasterError},
    simulation::ImageSimulator,
};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("failed to create output directory {1:?}")]
    CreateDir(#[source] io::Error, PathBuf),
    #[error("failed to write MTF profiles")]
    Csv(#[from] csv::Error),
    #[error("no MTF profile in the sweep")]
    NoProfile,
    #[error("failed to save a figure")]
    Figure(#[from] FigureError),
    #[error("failed to save a simulated image")]
    Raster(#[from] RasterError),
}

/// Fewest decimals, at least 2, that tell the finite obstruction ratios apart
///
/// `None` if no fixed number of decimals up to 17 does
fn label_precision(epsilon_values: &[f64]) -> Option<usize> {
    let finite: Vec<f64> = epsilon_values
        .iter()
        .copied()
        .filter(|e| e.is_finite())
        .collect();
    let n_distinct = finite.iter().map(|e| e.to_bits()).collect::<HashSet<_>>().len();
    (2..=17).find(|&precision| {
        finite
            .iter()
            .map(|e| format!("{:.*}", precision, e))
            .collect::<HashSet<_>>()
            .len()
            == n_distinct
    })
}

/// Results of the pipeline for one obstruction ratio
#[derive(Debug, Clone)]
pub struct Analysis {
    pub epsilon: f64,
    /// decimals of ε in labels and file names, shortest round trip if `None`
    precision: Option<usize>,
    pub aperture: Aperture,
    pub otf: DMatrix<f64>,
    pub psf: DMatrix<f64>,
    pub mtf: Mtf,
    pub simulated: Option<DMatrix<u8>>,
}
impl Analysis {
    pub fn new(config: &Config, epsilon: f64) -> Result<Self> {
        let now = Instant::now();
        let aperture = Aperture::new(config.pupil_radius, epsilon, config.grid_size)?;
        let otf = calculate_otf(&aperture, config.shift)?;
        let psf = calculate_psf(&otf)?;
        let mtf = Mtf::new(&otf, config.mtf)?;
        log::info!(
            "ε={:.2}: {} open samples, analysed in {}ms",
            epsilon,
            aperture.transmittance(),
            now.elapsed().as_millis()
        );
        Ok(Self {
            epsilon,
            precision: label_precision(&config.epsilon_values),
            aperture,
            otf,
            psf,
            mtf,
            simulated: None,
        })
    }
    /// Images `image` through the pupil, the PSF being the filter
    pub fn simulate(&mut self, image: &DMatrix<u8>, simulator: &ImageSimulator) -> Result<()> {
        self.simulated = Some(simulator.simulate(image, &self.psf)?);
        Ok(())
    }
    fn epsilon_to_string(&self) -> String {
        match self.precision {
            Some(precision) => format!("{:.*}", precision, self.epsilon),
            None => self.epsilon.to_string(),
        }
    }
    /// Short label, `unobstructed` for ε=0
    ///
    /// ε is written with enough decimals to be unique within the sweep
    pub fn label(&self) -> String {
        if self.epsilon == 0f64 {
            "unobstructed".to_string()
        } else {
            format!("ε = {}", self.epsilon_to_string())
        }
    }
    fn file_tag(&self) -> String {
        if self.epsilon == 0f64 {
            "unobstructed".to_string()
        } else {
            format!("eps{}", self.epsilon_to_string())
        }
    }
}

/// Pipeline results over the obstruction ratios of a [Config]
#[derive(Debug)]
pub struct Sweep {
    config: Config,
    /// the unobstructed pupil
    pub reference: Result<Analysis>,
    pub cases: Vec<(f64, Result<Analysis>)>,
}
impl Sweep {
    pub fn run(config: &Config) -> Self {
        let analyse = |epsilon: f64| {
            Analysis::new(config, epsilon).map_err(|e| {
                log::warn!("ε={}: {}", epsilon, e);
                e
            })
        };
        Self {
            config: config.clone(),
            reference: analyse(0f64),
            cases: config
                .epsilon_values
                .iter()
                .map(|&epsilon| (epsilon, analyse(epsilon)))
                .collect(),
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn len(&self) -> usize {
        self.cases.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
    /// Successful analyses, the reference first
    pub fn analyses(&self) -> impl Iterator<Item = &Analysis> {
        self.reference
            .iter()
            .chain(self.cases.iter().filter_map(|(_, case)| case.as_ref().ok()))
    }
    fn analyses_mut(&mut self) -> impl Iterator<Item = &mut Analysis> {
        self.reference.iter_mut().chain(
            self.cases
                .iter_mut()
                .filter_map(|(_, case)| case.as_mut().ok()),
        )
    }
    /// Obstruction ratios that failed and why, the reference excluded
    pub fn failures(&self) -> impl Iterator<Item = (f64, &Error)> {
        self.cases
            .iter()
            .filter_map(|(epsilon, case)| case.as_ref().err().map(|e| (*epsilon, e)))
    }
    /// Simulates `image` for every successful analysis
    ///
    /// Returns the number of simulated images; failures are logged and skipped
    pub fn simulate(&mut self, image: &DMatrix<u8>) -> usize {
        let simulator = ImageSimulator::new(self.config.placement, self.config.readout);
        self.analyses_mut()
            .filter_map(|analysis| {
                analysis
                    .simulate(image, &simulator)
                    .map_err(|e| log::warn!("ε={}: image simulation failed: {}", analysis.epsilon, e))
                    .ok()
            })
            .count()
    }
    /// Labels and MTF profiles, the reference first
    pub fn profiles(&self) -> Vec<(String, &[f64])> {
        self.analyses()
            .filter_map(|analysis| analysis.mtf.profile().map(|p| (analysis.label(), p)))
            .collect()
    }
    /// Writes the MTF profiles to a CSV file, one column per obstruction ratio
    pub fn to_csv(&self, filename: impl AsRef<Path>) -> std::result::Result<(), SweepError> {
        let profiles = self.profiles();
        if profiles.is_empty() {
            return Err(SweepError::NoProfile);
        }
        let mut wtr = csv::Writer::from_path(filename)?;
        let mut keys = vec![String::from("frequency index")];
        keys.extend(profiles.iter().map(|(label, _)| format!("MTF {}", label)));
        wtr.write_record(&keys)?;
        let n = profiles.iter().map(|(_, p)| p.len()).max().unwrap_or_default();
        for k in 0..n {
            let mut record = vec![k.to_string()];
            record.extend(
                profiles
                    .iter()
                    .map(|(_, p)| p.get(k).map(|x| x.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
    /// Saves aperture, PSF, MTF maps and simulated images of every analysis
    /// into `dir`
    pub fn save_figures(&self, dir: impl AsRef<Path>) -> std::result::Result<(), SweepError> {
        let dir = dir.as_ref();
        create_dir_all(dir).map_err(|e| SweepError::CreateDir(e, dir.to_path_buf()))?;

        let analyses: Vec<_> = self.analyses().collect();
        let save_pb = ProgressBar::new(analyses.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            save_pb.set_style(style.progress_chars("#>-"));
        }
        save_pb.set_message("Saving figures");

        let extent = self.config.extent();
        for analysis in analyses {
            let tag = analysis.file_tag();
            let label = analysis.label();
            Figure::new(&analysis.aperture)
                .colormap(Colormap::Gray)
                .title(format!("Aperture ({})", label))
                .extent(extent)
                .save_png(dir.join(format!("aperture_{}.png", tag)))?;
            Figure::new(&analysis.psf)
                .colormap(Colormap::Inferno)
                .title(format!("PSF ({})", label))
                .extent(extent)
                .save_png(dir.join(format!("psf_{}.png", tag)))?;
            if let Some(map) = analysis.mtf.map() {
                Figure::new(map)
                    .colormap(Colormap::Cubehelix)
                    .title(format!("MTF ({})", label))
                    .save_png(dir.join(format!("mtf_{}.png", tag)))?;
            }
            if let Some(image) = &analysis.simulated {
                save_gray(image, dir.join(format!("image_{}.png", tag)))?;
            }
            save_pb.inc(1);
        }

        save_pb.finish_with_message("All figures saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aperture::linspace, config::MtfStrategy};

    fn config() -> Config {
        Config::default().grid_size(32).epsilon_range(0.1, 0.7, 4)
    }

    #[test]
    fn sweep_runs_every_ratio() {
        let sweep = Sweep::run(&config());
        assert_eq!(sweep.len(), 4);
        assert!(sweep.reference.is_ok());
        assert_eq!(sweep.analyses().count(), 5);
        assert_eq!(sweep.failures().count(), 0);
        let profiles = sweep.profiles();
        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles[0].0, "unobstructed");
        assert!(profiles.iter().all(|(_, p)| p.len() == 32));
    }

    #[test]
    fn failures_do_not_abort_the_sweep() {
        let sweep = Sweep::run(&config().epsilon_values(vec![0.2, 1.5, f64::NAN, 0.6]));
        assert_eq!(sweep.len(), 4);
        let failed: Vec<_> = sweep.failures().map(|(e, _)| e).collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0], 1.5);
        assert!(sweep
            .failures()
            .all(|(_, e)| matches!(e, Error::InvalidParameter(_))));
        assert_eq!(sweep.analyses().count(), 3);
    }

    #[test]
    fn transmittance_decreases_along_the_sweep() {
        let sweep = Sweep::run(&config());
        let counts: Vec<_> = sweep
            .analyses()
            .map(|a| a.aperture.transmittance())
            .collect();
        assert!(counts.windows(2).all(|w| w[1] <= w[0]), "{:?}", counts);
    }

    #[test]
    fn simulate_every_case() {
        let mut sweep = Sweep::run(&config());
        let image = DMatrix::from_fn(32, 32, |i, j| ((i * 8) ^ (j * 8)) as u8);
        assert_eq!(sweep.simulate(&image), 5);
        assert!(sweep.analyses().all(|a| a.simulated.is_some()));
        // wrong shape: every simulation fails, nothing is stored
        let mut sweep = Sweep::run(&config());
        assert_eq!(sweep.simulate(&DMatrix::zeros(16, 16)), 0);
        assert!(sweep.analyses().all(|a| a.simulated.is_none()));
    }

    #[test]
    fn csv_export() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sweep = Sweep::run(&config());
        let path = std::env::temp_dir().join("pupil-screening_mtf.csv");
        sweep.to_csv(&path)?;
        let mut rdr = csv::Reader::from_path(&path)?;
        assert_eq!(rdr.headers()?.len(), 6);
        assert_eq!(rdr.records().count(), 32);
        Ok(())
    }

    #[test]
    fn csv_needs_profiles() {
        let sweep = Sweep::run(&config().mtf(MtfStrategy::Magnitude));
        let path = std::env::temp_dir().join("pupil-screening_no_mtf.csv");
        assert!(matches!(sweep.to_csv(&path), Err(SweepError::NoProfile)));
    }

    #[test]
    fn precision_separates_close_ratios() {
        assert_eq!(label_precision(&linspace(0.1, 0.8, 8)), Some(2));
        assert_eq!(label_precision(&[0.101, 0.104]), Some(3));
        assert_eq!(label_precision(&[0.2, 0.2, f64::NAN]), Some(2));
        assert_eq!(label_precision(&[1e-20, 2e-20]), None);
    }

    #[test]
    fn close_ratios_keep_their_own_outputs() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sweep = Sweep::run(&config().epsilon_values(vec![0.101, 0.104]));
        let labels: Vec<_> = sweep.analyses().map(|a| a.label()).collect();
        assert_eq!(labels, ["unobstructed", "ε = 0.101", "ε = 0.104"]);

        let dir = std::env::temp_dir().join("pupil-screening_close_ratios");
        sweep.save_figures(&dir)?;
        assert!(dir.join("psf_eps0.101.png").exists());
        assert!(dir.join("psf_eps0.104.png").exists());

        let path = dir.join("mtf.csv");
        sweep.to_csv(&path)?;
        let mut rdr = csv::Reader::from_path(&path)?;
        let headers: HashSet<String> = rdr.headers()?.iter().map(String::from).collect();
        assert_eq!(headers.len(), 4);
        Ok(())
    }

    #[test]
    fn figures() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut sweep = Sweep::run(&config().epsilon_values(vec![0.3]).mtf(MtfStrategy::Magnitude));
        sweep.simulate(&DMatrix::from_element(32, 32, 100u8));
        let dir = std::env::temp_dir().join("pupil-screening_figures");
        sweep.save_figures(&dir)?;
        for name in [
            "aperture_unobstructed.png",
            "psf_eps0.30.png",
            "mtf_eps0.30.png",
            "image_eps0.30.png",
        ] {
            assert!(dir.join(name).exists(), "missing {}", name);
        }
        Ok(())
    }
}
