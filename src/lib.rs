/*!
# Pupil screening

Image quality of a circular pupil with a concentric central obstruction of
radius `εR`, `R` being the pupil radius and `ε` the obstruction (screening)
ratio.

## Key Components

- [`Aperture`] - binary pupil mask on a `n×n` grid spanning `[-R,R]²`
- [`calculate_otf`] - peak normalized `|FFT(aperture)|²`, zero frequency at the grid center
- [`calculate_psf`] - peak normalized `|IFFT(OTF)|²`
- [`Mtf`] - central row profile or modulus map of the OTF
- [`ImageSimulator`] - filters a grayscale image with an OTF or PSF grid
- [`Sweep`] - the whole chain for each `ε` of a [`Config`], plus the unobstructed reference

## Usage

```rust,no_run
use pupil_screening::{Config, Sweep};

let config = Config::default().grid_size(256).epsilon_range(0.1, 0.8, 8);
let sweep = Sweep::run(&config);
sweep.to_csv("mtf.csv")?;
sweep.save_figures("figures")?;
# Ok::<(), pupil_screening::SweepError>(())
```
*/

pub mod aperture;
pub mod config;
pub mod error;
pub mod fft;
pub mod figure;
pub mod mtf;
pub mod otf;
pub mod pipeline;
#[cfg(feature = "plot")]
pub mod plot;
pub mod raster;
pub mod simulation;

pub use aperture::{linspace, Aperture};
pub use config::{Config, FilterPlacement, MtfStrategy, Readout, ShiftConvention};
pub use error::{Error, Result};
pub use figure::{Colormap, Figure, FigureError};
pub use mtf::Mtf;
pub use otf::{calculate_otf, calculate_psf};
pub use pipeline::{Analysis, Sweep, SweepError};
pub use raster::RasterError;
pub use simulation::ImageSimulator;
