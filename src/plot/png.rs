//! PNG chart rendering via Plotters.
//!
//! One series per file: a line through the return points with a faint
//! zero-rate guide, elapsed years on X and percent on Y. Styling stays
//! minimal; anything fancier belongs in a real frontend.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{ReturnPoint, SeriesKind};
use crate::error::AppError;
use crate::math::year_fraction;

/// Render a return series to a PNG file.
pub fn render_series_png(
    path: &Path,
    points: &[ReturnPoint],
    kind: SeriesKind,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "No return points to chart."));
    }

    let start_date = points[0].date;
    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (year_fraction(start_date, p.date), p.rate * 100.0))
        .collect();

    let x_max = xy
        .iter()
        .fold(0.0_f64, |m, &(x, _)| m.max(x))
        .max(1.0 / 365.0);

    let (mut y_min, mut y_max) = xy
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    // Keep the zero line in frame and give the series some headroom.
    y_min = y_min.min(0.0);
    y_max = y_max.max(0.0);
    let pad = ((y_max - y_min) * 0.05).max(0.1);
    y_min -= pad;
    y_max += pad;

    let root = BitMapBackend::new(path, (width.max(200), height.max(150))).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(kind.title(), ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Years since start")
        .y_desc(kind.axis_label())
        .draw()
        .map_err(draw_err)?;

    let zero_style = BLACK.mix(0.3);
    chart
        .draw_series(LineSeries::new([(0.0, 0.0), (x_max, 0.0)], &zero_style))
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(xy.iter().copied(), &BLUE))
        .map_err(draw_err)?;
    chart
        .draw_series(xy.iter().map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())))
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_err(e: impl std::fmt::Display) -> AppError {
    AppError::new(2, format!("Failed to render chart: {e}"))
}
