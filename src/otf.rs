//! Optical and point spread transfer functions
//!
//! The OTF is the peak normalized squared modulus of the aperture spectrum and
//! the PSF the peak normalized squared modulus of the inverse transform of the
//! OTF. Both have the zero frequency (resp. origin) at the grid center.
//! Squaring the modulus drops the phase, so `calculate_psf` is not an inverse
//! of `calculate_otf`.

use nalgebra::DMatrix;

use crate::{
    config::ShiftConvention,
    error::{Error, Result},
    fft::{complexify, fft2, fftshift, ifft2, ifftshift},
};

/// Largest value of a grid, `-∞` if empty
pub fn peak<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    values.into_iter().cloned().fold(f64::NEG_INFINITY, f64::max)
}

/// Divides a grid by its largest value
///
/// Fails with [Error::DegenerateInput] if there is no finite positive peak
pub fn normalize_peak(mut grid: DMatrix<f64>, what: &'static str) -> Result<DMatrix<f64>> {
    let max_value = peak(grid.iter());
    if !(max_value.is_finite() && max_value > 0f64) {
        return Err(Error::DegenerateInput(what));
    }
    grid /= max_value;
    Ok(grid)
}

/// Optical transfer function of an aperture
pub fn calculate_otf(aperture: &DMatrix<f64>, shift: ShiftConvention) -> Result<DMatrix<f64>> {
    let field = match shift {
        ShiftConvention::Centered => complexify(aperture),
        ShiftConvention::Decentered => complexify(&ifftshift(aperture)),
    };
    let spectrum = fftshift(&fft2(&field));
    normalize_peak(spectrum.map(|z| z.norm_sqr()), "aperture")
}

/// Point spread function from an optical transfer function
pub fn calculate_psf(otf: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let field = fftshift(&ifft2(&ifftshift(&complexify(otf))));
    normalize_peak(field.map(|z| z.norm_sqr()), "OTF")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aperture::Aperture;
    use rand::Rng;
    use strum::IntoEnumIterator;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn argmax(grid: &DMatrix<f64>) -> (usize, usize) {
        grid.iamax_full()
    }

    #[test]
    fn unit_peak_at_zero_frequency() -> TestResult {
        let aperture = Aperture::new(1., 0.3, 64)?;
        for shift in ShiftConvention::iter() {
            let otf = calculate_otf(&aperture, shift)?;
            assert_eq!(otf.shape(), (64, 64));
            assert_eq!(peak(otf.iter()), 1.);
            assert_eq!(argmax(&otf), (32, 32));
            assert_eq!(otf[(32, 32)], 1.);
            let n_peak = otf.iter().filter(|&&x| x > 1. - 1e-9).count();
            assert_eq!(n_peak, 1, "{} convention", shift);
            assert!(otf.iter().all(|&x| (0f64..=1f64).contains(&x)));
        }
        Ok(())
    }

    #[test]
    fn all_zero_aperture_is_degenerate() {
        let aperture = DMatrix::<f64>::zeros(3, 3);
        for shift in ShiftConvention::iter() {
            assert_eq!(
                calculate_otf(&aperture, shift),
                Err(Error::DegenerateInput("aperture"))
            );
        }
        assert_eq!(
            calculate_otf(&DMatrix::<f64>::zeros(0, 0), ShiftConvention::Centered),
            Err(Error::DegenerateInput("aperture"))
        );
    }

    #[test]
    fn all_zero_otf_is_degenerate() {
        assert_eq!(
            calculate_psf(&DMatrix::<f64>::zeros(8, 8)),
            Err(Error::DegenerateInput("OTF"))
        );
    }

    #[test]
    fn shift_conventions_agree_on_symmetric_pupils() -> TestResult {
        let aperture = Aperture::new(1., 0.4, 32)?;
        let centered = calculate_otf(&aperture, ShiftConvention::Centered)?;
        let decentered = calculate_otf(&aperture, ShiftConvention::Decentered)?;
        let diff = (centered - decentered).amax();
        assert!(diff < 1e-9, "max difference: {}", diff);
        Ok(())
    }

    #[test]
    fn shift_conventions_on_asymmetric_masks() -> TestResult {
        // the squared modulus is invariant to the input roll, only the phase differs
        let mut rng = rand::thread_rng();
        let mut mask = DMatrix::from_fn(17, 17, |_, _| if rng.gen::<f64>() > 0.6 { 1. } else { 0. });
        mask[(3, 5)] = 1.;
        let mask = Aperture::from_mask(mask);
        assert!(mask.transmittance() > 0);
        let centered = calculate_otf(&mask, ShiftConvention::Centered)?;
        let decentered = calculate_otf(&mask, ShiftConvention::Decentered)?;
        assert!((centered - decentered).amax() < 1e-9);
        Ok(())
    }

    #[test]
    fn psf_has_unit_peak() -> TestResult {
        let aperture = Aperture::new(1., 0.3, 64)?;
        let otf = calculate_otf(&aperture, ShiftConvention::Centered)?;
        let psf = calculate_psf(&otf)?;
        assert_eq!(psf.shape(), (64, 64));
        assert_eq!(peak(psf.iter()), 1.);
        assert!(psf.iter().all(|&x| (0f64..=1f64).contains(&x)));
        // the OTF is real and non negative: its transform peaks at the origin
        assert_eq!(argmax(&psf), (32, 32));
        Ok(())
    }

    #[test]
    fn psf_origin_on_odd_grids() -> TestResult {
        let aperture = Aperture::new(1., 0.3, 33)?;
        let otf = calculate_otf(&aperture, ShiftConvention::Centered)?;
        assert_eq!(argmax(&otf), (16, 16));
        let psf = calculate_psf(&otf)?;
        assert_eq!(psf.shape(), (33, 33));
        assert_eq!(argmax(&psf), (16, 16));
        assert_eq!(psf[(16, 16)], 1.);
        Ok(())
    }

    #[test]
    fn otf_of_psf_is_not_a_round_trip() -> TestResult {
        let aperture = Aperture::new(1., 0.5, 32)?;
        let otf = calculate_otf(&aperture, ShiftConvention::Centered)?;
        let psf = calculate_psf(&otf)?;
        let otf_again = calculate_otf(&psf, ShiftConvention::Centered)?;
        assert_eq!(peak(otf_again.iter()), 1.);
        assert!((otf_again - otf).amax() > 1e-3);
        Ok(())
    }
}
