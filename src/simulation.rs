//! Image formation through the screened pupil
//!
//! The image spectrum is multiplied by a real filter (an OTF or a PSF grid)
//! and transformed back to pixel values.

use nalgebra::DMatrix;

use crate::{
    config::{FilterPlacement, Readout},
    error::{Error, Result},
    fft::{complexify, fft2, fftshift, ifft2, ifftshift},
};

/// Filter and readout settings of the image simulation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageSimulator {
    pub placement: FilterPlacement,
    pub readout: Readout,
}
impl ImageSimulator {
    pub fn new(placement: FilterPlacement, readout: Readout) -> Self {
        Self { placement, readout }
    }
    /// Filters a grayscale image
    ///
    /// The filter must have the same shape as the image, otherwise
    /// [Error::ShapeMismatch] is returned
    pub fn simulate(&self, image: &DMatrix<u8>, filter: &DMatrix<f64>) -> Result<DMatrix<u8>> {
        Error::same_shape(image.shape(), filter.shape())?;
        let spectrum = fft2(&complexify(&image.map(f64::from)));
        let field = match self.placement {
            FilterPlacement::Unshifted => ifft2(&spectrum.zip_map(filter, |z, f| z * f)),
            FilterPlacement::Centered => {
                let filtered = fftshift(&spectrum).zip_map(filter, |z, f| z * f);
                ifft2(&ifftshift(&filtered))
            }
        };
        Ok(field.map(|z| {
            let value = match self.readout {
                Readout::Real => z.re,
                Readout::Magnitude => z.norm(),
            };
            to_pixel(value)
        }))
    }
}

/// Rounds and clips to the 8-bit range
fn to_pixel(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.round().clamp(0f64, 255f64) as u8
    }
}
