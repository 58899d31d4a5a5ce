/*!
# Figures

A [`Figure`] is a 2-D grid together with the hints needed to display it:
a colormap, a title and the extent of the plane the grid samples.
Figures are rendered to RGB PNG files, the grid being min/max scaled
into the colormap. The PNG holds the pixels only, the title and the extent
are reported by [`Figure::caption`] which is logged when the file is saved.
*/

use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageError, Rgb};
use itertools::iproduct;
use nalgebra::DMatrix;

#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("failed to create image buffer")]
    Image,
    #[error("failed to save figure to png file {1:?}")]
    Save(#[source] ImageError, PathBuf),
}
type Result<T> = std::result::Result<T, FigureError>;

/// Colormaps
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// black to white
    Gray,
    #[default]
    Viridis,
    Inferno,
    Cubehelix,
}
impl Colormap {
    /// RGB color of a value in `[0,1]`
    pub fn eval(&self, value: f64) -> [u8; 3] {
        let color = match self {
            Colormap::Gray => colorous::GREYS.eval_continuous(1f64 - value),
            Colormap::Viridis => colorous::VIRIDIS.eval_continuous(value),
            Colormap::Inferno => colorous::INFERNO.eval_continuous(value),
            Colormap::Cubehelix => colorous::CUBEHELIX.eval_continuous(value),
        };
        [color.r, color.g, color.b]
    }
}

/// Minimum and maximum values of a grid
pub fn find_extrema(data: &DMatrix<f64>) -> (f64, f64) {
    data.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
            (min.min(x), max.max(x))
        })
}

/// A grid and its display hints
#[derive(Debug, Clone)]
pub struct Figure<'a> {
    pub data: &'a DMatrix<f64>,
    pub colormap: Colormap,
    pub title: String,
    /// `[x_min, x_max, y_min, y_max]`
    pub extent: Option<[f64; 4]>,
}
impl<'a> Figure<'a> {
    pub fn new(data: &'a DMatrix<f64>) -> Self {
        Self {
            data,
            colormap: Default::default(),
            title: String::new(),
            extent: None,
        }
    }
    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }
    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = title.to_string();
        self
    }
    pub fn extent(mut self, extent: [f64; 4]) -> Self {
        self.extent = Some(extent);
        self
    }
    /// Title followed by the plane extent, if any
    pub fn caption(&self) -> String {
        match self.extent {
            Some([x_min, x_max, y_min, y_max]) => format!(
                "{} [{}, {}]x[{}, {}]",
                self.title, x_min, x_max, y_min, y_max
            )
            .trim_start()
            .to_string(),
            None => self.title.clone(),
        }
    }
    /// Min/max scales the grid and applies the colormap, row major
    fn to_rgb(&self) -> Vec<u8> {
        let (min_val, max_val) = find_extrema(self.data);
        let range = max_val - min_val;
        let (n_row, n_col) = self.data.shape();
        iproduct!(0..n_row, 0..n_col)
            .flat_map(|(i, j)| {
                let value = if range > 0f64 {
                    (self.data[(i, j)] - min_val) / range
                } else {
                    0.5f64
                };
                self.colormap.eval(value)
            })
            .collect()
    }
    /// Saves the figure as a PNG image
    pub fn save_png(&self, filename: impl AsRef<Path>) -> Result<()> {
        let filename = filename.as_ref();
        let (n_row, n_col) = self.data.shape();
        let image =
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(n_col as u32, n_row as u32, self.to_rgb())
                .ok_or(FigureError::Image)?;
        image
            .save(filename)
            .map_err(|e| FigureError::Save(e, filename.to_path_buf()))?;
        log::info!("{} saved to {:?}", self.caption(), filename);
        Ok(())
    }
}
