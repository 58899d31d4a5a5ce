//! Pupil masks
//!
//! A circular pupil of radius `r` sampled on a `n×n` grid spanning `[-r,r]`
//! along both axes, with an optional concentric obstruction of radius `εr`.

use std::ops::Deref;

use nalgebra::DMatrix;

use crate::error::{Error, Result};

/// `n` evenly spaced samples over `[start, stop]`, both ends included
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Binary transmittance grid: 1 is open, 0 is blocked
#[derive(Debug, Clone, PartialEq)]
pub struct Aperture {
    /// pupil radius
    pub pupil_radius: f64,
    /// obstruction ratio
    pub epsilon: f64,
    mask: DMatrix<f64>,
}
impl Deref for Aperture {
    type Target = DMatrix<f64>;

    fn deref(&self) -> &Self::Target {
        &self.mask
    }
}
impl Aperture {
    /// Builds the screened pupil mask
    ///
    /// Fails with [Error::InvalidParameter] if the radius is not positive,
    /// if `epsilon` is not in `[0,1)` or if `grid_size < 2`
    pub fn new(pupil_radius: f64, epsilon: f64, grid_size: usize) -> Result<Self> {
        if !(pupil_radius.is_finite() && pupil_radius > 0f64) {
            return Err(Error::invalid(format!(
                "pupil radius must be positive, found {}",
                pupil_radius
            )));
        }
        if !(epsilon.is_finite() && (0f64..1f64).contains(&epsilon)) {
            return Err(Error::invalid(format!(
                "obstruction ratio must be in [0,1), found {}",
                epsilon
            )));
        }
        if grid_size < 2 {
            return Err(Error::invalid(format!(
                "grid size must be at least 2, found {}",
                grid_size
            )));
        }
        let axis = linspace(-pupil_radius, pupil_radius, grid_size);
        let obstruction_radius = epsilon * pupil_radius;
        // ε=0 leaves the center sample of odd grids open
        let mask = DMatrix::from_fn(grid_size, grid_size, |i, j| {
            let r = axis[j].hypot(axis[i]);
            if r > pupil_radius || (epsilon > 0f64 && r <= obstruction_radius) {
                0f64
            } else {
                1f64
            }
        });
        log::debug!(
            "aperture r={} ε={:.3} on {}x{} grid",
            pupil_radius,
            epsilon,
            grid_size,
            grid_size
        );
        Ok(Self {
            pupil_radius,
            epsilon,
            mask,
        })
    }
    /// Wraps an arbitrary transmittance grid
    pub fn from_mask(mask: DMatrix<f64>) -> Self {
        Self {
            pupil_radius: 0f64,
            epsilon: 0f64,
            mask,
        }
    }
    /// Number of open cells
    pub fn transmittance(&self) -> usize {
        self.mask.iter().filter(|&&x| x > 0f64).count()
    }
}
