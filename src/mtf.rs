use nalgebra::DMatrix;

use crate::{
    config::MtfStrategy,
    error::{Error, Result},
    otf::{normalize_peak, peak},
};

/// Modulation transfer function
#[derive(Debug, Clone, PartialEq)]
pub enum Mtf {
    /// 1-D profile through the zero frequency
    Profile(Vec<f64>),
    /// 2-D modulus map
    Map(DMatrix<f64>),
}
impl Mtf {
    /// Extracts the MTF from an OTF according to `strategy`
    pub fn new(otf: &DMatrix<f64>, strategy: MtfStrategy) -> Result<Self> {
        Ok(match strategy {
            MtfStrategy::CentralRow => Mtf::Profile(central_row(otf)?),
            MtfStrategy::Magnitude => Mtf::Map(magnitude(otf)?),
        })
    }
    pub fn profile(&self) -> Option<&[f64]> {
        match self {
            Mtf::Profile(profile) => Some(profile.as_slice()),
            Mtf::Map(_) => None,
        }
    }
    pub fn map(&self) -> Option<&DMatrix<f64>> {
        match self {
            Mtf::Profile(_) => None,
            Mtf::Map(map) => Some(map),
        }
    }
}

/// Central row of the OTF normalized to a unit peak
pub fn central_row(otf: &DMatrix<f64>) -> Result<Vec<f64>> {
    if otf.nrows() == 0 {
        return Err(Error::DegenerateInput("OTF"));
    }
    let row: Vec<f64> = otf.row(otf.nrows() / 2).iter().cloned().collect();
    let max_value = peak(row.iter());
    if !(max_value.is_finite() && max_value > 0f64) {
        return Err(Error::DegenerateInput("OTF central row"));
    }
    Ok(row.into_iter().map(|x| x / max_value).collect())
}

/// Modulus of the whole OTF normalized to a unit peak
pub fn magnitude(otf: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    normalize_peak(otf.abs(), "OTF")
}
