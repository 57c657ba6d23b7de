use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::debug;

use crate::models::ChartPoint;
use crate::services::format_service::format_bid;

/// Margin reserved on every side for axes and labels
pub const PADDING: f64 = 30.0;
pub const AXIS_ALPHA: f64 = 0.6;
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Sem dados suficientes.";
const MESSAGE_ANCHOR: (f64, f64) = (20.0, 40.0);
/// Horizontal gap between the min and max labels
const LABEL_SPACING: f64 = 120.0;
const FONT_SIZE: f64 = 12.0;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart backend error: {0}")]
    Backend(String),
    #[error("chart output error: {0}")]
    Io(String),
}

/// The drawing operations the line chart needs, in canvas terms
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (f64, f64);
    fn clear(&mut self) -> Result<(), ChartError>;
    /// Stroke an open path through `path` with the given opacity
    fn stroke(&mut self, path: &[(f64, f64)], alpha: f64) -> Result<(), ChartError>;
    /// Draw text with its baseline starting at (x, y)
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), ChartError>;
}

/// Linear mapping from (index, bid) to surface pixels
#[derive(Debug, Clone, Copy)]
pub struct Scale {
    pub width: f64,
    pub height: f64,
    pub count: usize,
    pub min_y: f64,
    pub max_y: f64,
    pub range_y: f64,
}

impl Scale {
    /// Only valid for two or more points
    pub fn fit(points: &[ChartPoint], width: f64, height: f64) -> Self {
        // a single NaN bid poisons both bounds
        let (min_y, max_y) = if points.iter().any(|p| p.bid.is_nan()) {
            (f64::NAN, f64::NAN)
        } else {
            (
                points.iter().map(|p| p.bid).fold(f64::INFINITY, f64::min),
                points.iter().map(|p| p.bid).fold(f64::NEG_INFINITY, f64::max),
            )
        };
        // flat or NaN range
        let spread = max_y - min_y;
        let range_y = if spread == 0.0 || spread.is_nan() { 1.0 } else { spread };

        Self {
            width,
            height,
            count: points.len(),
            min_y,
            max_y,
            range_y,
        }
    }

    pub fn x(&self, index: usize) -> f64 {
        let fraction = index as f64 / (self.count - 1) as f64;
        PADDING + fraction * (self.width - PADDING * 2.0)
    }

    pub fn y(&self, value: f64) -> f64 {
        (self.height - PADDING) - ((value - self.min_y) / self.range_y) * (self.height - PADDING * 2.0)
    }
}

/// Draw the bid history as a single polyline with axes and min/max labels
pub fn draw_line_chart<S: Surface + ?Sized>(surface: &mut S, points: &[ChartPoint]) -> Result<(), ChartError> {
    surface.clear()?;

    if points.len() < 2 {
        debug!("Only {} chart point(s), drawing placeholder", points.len());
        return surface.fill_text(INSUFFICIENT_DATA_MESSAGE, MESSAGE_ANCHOR.0, MESSAGE_ANCHOR.1);
    }

    let (width, height) = surface.size();
    let scale = Scale::fit(points, width, height);

    // axes
    surface.stroke(
        &[
            (PADDING, PADDING),
            (PADDING, height - PADDING),
            (width - PADDING, height - PADDING),
        ],
        AXIS_ALPHA,
    )?;

    let line: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (scale.x(i), scale.y(p.bid)))
        .collect();
    surface.stroke(&line, 1.0)?;

    surface.fill_text(&format!("min {}", format_bid(scale.min_y)), PADDING, PADDING - 10.0)?;
    surface.fill_text(
        &format!("max {}", format_bid(scale.max_y)),
        PADDING + LABEL_SPACING,
        PADDING - 10.0,
    )?;

    Ok(())
}

/// A `Surface` over a plotters drawing area
pub struct PlottersSurface<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
}

impl<DB: DrawingBackend> PlottersSurface<DB> {
    pub fn new(backend: DB) -> Self {
        Self {
            area: backend.into_drawing_area(),
        }
    }

    /// Flush everything drawn so far to the backend
    pub fn finish(self) -> Result<(), ChartError> {
        self.area
            .present()
            .map_err(|e| ChartError::Backend(format!("Failed to render chart: {}", e)))
    }
}

fn to_pixel((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

impl<DB: DrawingBackend> Surface for PlottersSurface<DB> {
    fn size(&self) -> (f64, f64) {
        let (w, h) = self.area.dim_in_pixel();
        (w as f64, h as f64)
    }

    fn clear(&mut self) -> Result<(), ChartError> {
        self.area
            .fill(&WHITE)
            .map_err(|e| ChartError::Backend(format!("Failed to fill canvas: {}", e)))
    }

    fn stroke(&mut self, path: &[(f64, f64)], alpha: f64) -> Result<(), ChartError> {
        let pixels: Vec<(i32, i32)> = path.iter().copied().map(to_pixel).collect();
        self.area
            .draw(&PathElement::new(pixels, BLACK.mix(alpha).stroke_width(1)))
            .map_err(|e| ChartError::Backend(format!("Failed to draw line: {}", e)))
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), ChartError> {
        let style = ("sans-serif", FONT_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        self.area
            .draw(&Text::new(text.to_string(), to_pixel((x, y)), style))
            .map_err(|e| ChartError::Backend(format!("Failed to draw text: {}", e)))
    }
}

/// True for paths that should be written as SVG rather than PNG
pub fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Make sure the directory of an output file exists
pub fn prepare_output(path: &Path) -> Result<(), ChartError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ChartError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    Ok(())
}
