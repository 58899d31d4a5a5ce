use std::{f64::consts::PI, fmt};

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::{
    aperture::linspace,
    error::{Error, Result},
};

/// Where the aperture origin sits when it is Fourier transformed
#[derive(EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftConvention {
    /// `fftshift(fft2(aperture))`
    #[default]
    Centered,
    /// `fftshift(fft2(ifftshift(aperture)))`
    Decentered,
}
impl fmt::Display for ShiftConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftConvention::Centered => write!(f, "centered"),
            ShiftConvention::Decentered => write!(f, "decentered"),
        }
    }
}

/// MTF extraction strategy
#[derive(EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MtfStrategy {
    /// Central row of the OTF, a 1-D profile
    #[default]
    CentralRow,
    /// Modulus of the whole OTF, a 2-D map for display
    Magnitude,
}
impl fmt::Display for MtfStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MtfStrategy::CentralRow => write!(f, "central-row"),
            MtfStrategy::Magnitude => write!(f, "magnitude"),
        }
    }
}

/// Which spectrum of the image the filter is multiplied with
#[derive(EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPlacement {
    /// The raw `fft2` output, zero frequency in the corner
    Unshifted,
    /// The `fftshift`ed spectrum, zero frequency in the center
    #[default]
    Centered,
}

/// How the complex inverse transform is turned into pixel values
#[derive(EnumIter, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readout {
    #[default]
    Real,
    Magnitude,
}

/// Pipeline parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// pupil radius
    pub pupil_radius: f64,
    /// wavelength [m]
    pub wavelength: f64,
    /// number of samples per axis
    pub grid_size: usize,
    /// obstruction ratios swept, each in `[0,1)`
    pub epsilon_values: Vec<f64>,
    pub shift: ShiftConvention,
    pub mtf: MtfStrategy,
    pub placement: FilterPlacement,
    pub readout: Readout,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            pupil_radius: 1f64,
            wavelength: 550e-9,
            grid_size: 1024,
            epsilon_values: linspace(0.1, 0.8, 8),
            shift: Default::default(),
            mtf: Default::default(),
            placement: Default::default(),
            readout: Default::default(),
        }
    }
}
impl Config {
    pub fn pupil_radius(self, pupil_radius: f64) -> Self {
        Self {
            pupil_radius,
            ..self
        }
    }
    pub fn wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    pub fn grid_size(self, grid_size: usize) -> Self {
        Self { grid_size, ..self }
    }
    pub fn epsilon_values(self, epsilon_values: Vec<f64>) -> Self {
        Self {
            epsilon_values,
            ..self
        }
    }
    /// Sets `n` obstruction ratios evenly spaced in `[start, stop]`
    pub fn epsilon_range(self, start: f64, stop: f64, n: usize) -> Self {
        self.epsilon_values(linspace(start, stop, n))
    }
    pub fn shift(self, shift: ShiftConvention) -> Self {
        Self { shift, ..self }
    }
    pub fn mtf(self, mtf: MtfStrategy) -> Self {
        Self { mtf, ..self }
    }
    pub fn placement(self, placement: FilterPlacement) -> Self {
        Self { placement, ..self }
    }
    pub fn readout(self, readout: Readout) -> Self {
        Self { readout, ..self }
    }
    /// Checks the pupil radius, the wavelength and the grid size
    ///
    /// Obstruction ratios are left to each analysis of a sweep
    pub fn validate_scalars(&self) -> Result<()> {
        if !(self.pupil_radius.is_finite() && self.pupil_radius > 0f64) {
            return Err(Error::invalid(format!(
                "pupil radius must be positive, found {}",
                self.pupil_radius
            )));
        }
        if !(self.wavelength.is_finite() && self.wavelength > 0f64) {
            return Err(Error::invalid(format!(
                "wavelength must be positive, found {}",
                self.wavelength
            )));
        }
        if self.grid_size < 2 {
            return Err(Error::invalid(format!(
                "grid size must be at least 2, found {}",
                self.grid_size
            )));
        }
        Ok(())
    }
    /// Checks every parameter range
    pub fn validate(&self) -> Result<()> {
        self.validate_scalars()?;
        if let Some(epsilon) = self
            .epsilon_values
            .iter()
            .find(|e| !(e.is_finite() && (0f64..1f64).contains(*e)))
        {
            return Err(Error::invalid(format!(
                "obstruction ratio must be in [0,1), found {}",
                epsilon
            )));
        }
        Ok(())
    }
    /// Wavenumber `2π/λ` [rad/m]
    pub fn wavenumber(&self) -> f64 {
        2f64 * PI / self.wavelength
    }
    /// Distance between two grid samples
    pub fn sample_spacing(&self) -> f64 {
        2f64 * self.pupil_radius / self.grid_size as f64
    }
    /// Display extent `[x_min, x_max, y_min, y_max]` of the pupil plane
    pub fn extent(&self) -> [f64; 4] {
        let r = self.pupil_radius;
        [-r, r, -r, r]
    }
}
