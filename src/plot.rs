//! MTF comparison chart

use std::{error::Error, path::Path};

use plotters::prelude::*;

use crate::pipeline::Sweep;

/// Plots the MTF profiles of a sweep into a SVG file
///
/// The unobstructed reference is drawn in black, the obstructed pupils with
/// the TABLEAU10 palette
pub fn mtf_curves(sweep: &Sweep, filename: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let profiles = sweep.profiles();
    if profiles.is_empty() {
        return Err("no MTF profile to plot".into());
    }
    let n = profiles.iter().map(|(_, p)| p.len()).max().unwrap_or_default();

    let plot = SVGBackend::new(filename.as_ref(), (1200, 640)).into_drawing_area();
    plot.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&plot)
        .caption("Modulation transfer function", ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(0f64..n as f64, 0f64..1.05f64)?;
    chart
        .configure_mesh()
        .x_desc("Spatial frequency [sample]")
        .y_desc("Modulation")
        .draw()?;

    let mut colors = colorous::TABLEAU10.iter().cycle();
    for (key, values) in profiles {
        let rgb = if key == "unobstructed" {
            BLACK
        } else {
            let color = colors.next().copied().unwrap_or(colorous::Color { r: 0, g: 0, b: 0 });
            RGBColor(color.r, color.g, color.b)
        };
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(k, &y)| (k as f64, y)),
                &rgb,
            ))?
            .label(key)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    plot.present()?;
    log::info!("MTF curves saved to {:?}", filename.as_ref());
    Ok(())
}
