//! Grayscale raster images in and out of [DMatrix] grids

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, GrayImage, ImageError};
use nalgebra::DMatrix;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to load image {1:?}")]
    Load(#[source] ImageError, PathBuf),
    #[error("failed to save image {1:?}")]
    Save(#[source] ImageError, PathBuf),
    #[error("failed to create image buffer")]
    Buffer,
}
type Result<T> = std::result::Result<T, RasterError>;

/// Loads an image as 8-bit luma resampled to `grid_size×grid_size`
pub fn load_grayscale(path: impl AsRef<Path>, grid_size: usize) -> Result<DMatrix<u8>> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| RasterError::Load(e, path.to_path_buf()))?
        .into_luma8();
    log::info!(
        "loaded {:?} ({}x{}), resampling to {}x{}",
        path,
        image.width(),
        image.height(),
        grid_size,
        grid_size
    );
    Ok(resample(&image, grid_size))
}

/// Resizes a grayscale image to a square grid
pub fn resample(image: &GrayImage, grid_size: usize) -> DMatrix<u8> {
    let n = grid_size as u32;
    let resized = if image.dimensions() == (n, n) {
        image.clone()
    } else {
        image::imageops::resize(image, n, n, FilterType::CatmullRom)
    };
    to_grid(&resized)
}

/// Row `i`, column `j` of the grid is pixel `(x=j, y=i)`
pub fn to_grid(image: &GrayImage) -> DMatrix<u8> {
    let (width, height) = image.dimensions();
    DMatrix::from_fn(height as usize, width as usize, |i, j| {
        image.get_pixel(j as u32, i as u32).0[0]
    })
}

pub fn to_image(grid: &DMatrix<u8>) -> Result<GrayImage> {
    let (height, width) = grid.shape();
    // the grid is column major, the image buffer row major
    let raw: Vec<u8> = grid.transpose().as_slice().to_vec();
    GrayImage::from_raw(width as u32, height as u32, raw).ok_or(RasterError::Buffer)
}

/// Saves a grid as an 8-bit grayscale image
pub fn save_gray(grid: &DMatrix<u8>, filename: impl AsRef<Path>) -> Result<()> {
    let filename = filename.as_ref();
    to_image(grid)?
        .save(filename)
        .map_err(|e| RasterError::Save(e, filename.to_path_buf()))
}
