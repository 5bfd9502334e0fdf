//! Chart rendering
//!
//! The orchestrator talks to a [`Visualizer`]; [`PngVisualizer`] draws plain
//! pixel charts with the `image` crate and writes one PNG per call. Charts
//! carry no text: the file name names the column, and the terminal report
//! prints the numbers behind each chart.

mod category_rate;
mod heatmap;
mod histogram;

pub use category_rate::render_rate_chart;
pub use heatmap::{correlation_color, render_heatmap};
pub use histogram::{histogram_counts, render_bar_chart, DEFAULT_BINS};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use polars::prelude::*;
use tracing::debug;

use crate::error::{EdaError, Result};
use crate::pipeline::{
    compare_categories, correlation_matrix, has_column, target_rate_by_category, values::present_floats, values::string_values,
    ColumnKind,
};

/// Common color definitions
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const DARK_GRAY: Rgb<u8> = Rgb([60, 60, 60]);
    pub const LIGHT_GRAY: Rgb<u8> = Rgb([220, 220, 220]);
    pub const BLUE: Rgb<u8> = Rgb([33, 150, 243]);
    pub const RED: Rgb<u8> = Rgb([229, 57, 53]);
    pub const ORANGE: Rgb<u8> = Rgb([255, 152, 0]);
}

/// Image configuration
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub background: Rgb<u8>,
    pub axis_color: Rgb<u8>,
    pub bar_color: Rgb<u8>,
    pub highlight_color: Rgb<u8>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            margin: 24,
            background: colors::WHITE,
            axis_color: colors::DARK_GRAY,
            bar_color: colors::BLUE,
            highlight_color: colors::ORANGE,
        }
    }
}

impl ImageConfig {
    /// Square canvas, used for the heatmap
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
            ..Default::default()
        }
    }

    /// Blank canvas of the configured size
    pub fn canvas(&self) -> RgbImage {
        RgbImage::from_pixel(self.width, self.height, self.background)
    }

    /// Plot area as (x, y, width, height) inside the margins
    pub fn plot_area(&self) -> (u32, u32, u32, u32) {
        let w = self.width.saturating_sub(2 * self.margin).max(1);
        let h = self.height.saturating_sub(2 * self.margin).max(1);
        (self.margin, self.margin, w, h)
    }
}

/// Helper function to draw a filled rectangle
pub fn draw_filled_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let img_width = img.width();
    let img_height = img.height();

    for dy in 0..height {
        for dx in 0..width {
            let px = x + dx;
            let py = y + dy;
            if px < img_width && py < img_height {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Helper function to draw a vertical line
pub fn draw_vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32, color: Rgb<u8>) {
    let (start, end) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    if x < img.width() && img.height() > 0 {
        for y in start..=end.min(img.height() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Helper function to draw a horizontal line
pub fn draw_horizontal_line(img: &mut RgbImage, y: u32, x1: u32, x2: u32, color: Rgb<u8>) {
    let (start, end) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    if y < img.height() && img.width() > 0 {
        for x in start..=end.min(img.width() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Left and bottom axes around the plot area
pub fn draw_axes(img: &mut RgbImage, config: &ImageConfig) {
    let (x, y, w, h) = config.plot_area();
    draw_vertical_line(img, x, y, y + h, config.axis_color);
    draw_horizontal_line(img, y + h, x, x + w, config.axis_color);
}

/// Interpolate between two colors
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    Rgb([
        ((1.0 - t) * c1.0[0] as f64 + t * c2.0[0] as f64) as u8,
        ((1.0 - t) * c1.0[1] as f64 + t * c2.0[1] as f64) as u8,
        ((1.0 - t) * c1.0[2] as f64 + t * c2.0[2] as f64) as u8,
    ])
}

/// Column name made safe for a file name
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn save_png(img: &RgbImage, out_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(file_name);
    img.save(&path).map_err(|source| EdaError::Image {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "chart written");
    Ok(path)
}

/// Chart rendering collaborator used by the orchestrator.
///
/// Each call writes exactly one image file and returns its path.
pub trait Visualizer {
    /// Histogram of a numeric column or category counts of a categorical one
    /// -> `<out_dir>/<column>_distribution.png`
    fn plot_distribution(&self, df: &DataFrame, column: &str, out_dir: &Path) -> Result<PathBuf>;

    /// Correlation heatmap of the numeric columns
    /// -> `<out_dir>/correlation_heatmap.png`
    fn plot_correlation_heatmap(&self, df: &DataFrame, out_dir: &Path) -> Result<PathBuf>;

    /// Target event rate per category
    /// -> `<out_dir>/<column>_<target>_rate.png`
    fn plot_target_rate(&self, df: &DataFrame, column: &str, target: &str, out_dir: &Path) -> Result<PathBuf>;
}

/// Visualizer that renders PNG files
#[derive(Debug, Clone, Default)]
pub struct PngVisualizer {
    pub config: ImageConfig,
    /// Histogram bin count for numeric columns
    pub bins: usize,
}

impl PngVisualizer {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            bins: DEFAULT_BINS,
        }
    }

    fn bins(&self) -> usize {
        if self.bins == 0 {
            DEFAULT_BINS
        } else {
            self.bins
        }
    }
}

impl Visualizer for PngVisualizer {
    fn plot_distribution(&self, df: &DataFrame, column: &str, out_dir: &Path) -> Result<PathBuf> {
        if !has_column(df, column) {
            return Err(EdaError::missing_column(df, column));
        }
        let col = df.column(column)?;

        let counts: Vec<usize> = match ColumnKind::of(col) {
            ColumnKind::Numeric => histogram_counts(&present_floats(col)?, self.bins()),
            _ => {
                let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
                for value in string_values(col)?.into_iter().flatten() {
                    *by_category.entry(value).or_insert(0) += 1;
                }
                let mut ordered: Vec<(String, usize)> = by_category.into_iter().collect();
                ordered.sort_by(|a, b| compare_categories(&a.0, &b.0));
                ordered.into_iter().map(|(_, count)| count).collect()
            }
        };

        let img = render_bar_chart(&counts, &self.config);
        save_png(&img, out_dir, &format!("{}_distribution.png", file_stem(column)))
    }

    fn plot_correlation_heatmap(&self, df: &DataFrame, out_dir: &Path) -> Result<PathBuf> {
        let matrix = correlation_matrix(df)?;
        let side = self.config.width.min(self.config.height);
        let img = render_heatmap(&matrix, &ImageConfig::square(side));
        save_png(&img, out_dir, "correlation_heatmap.png")
    }

    fn plot_target_rate(&self, df: &DataFrame, column: &str, target: &str, out_dir: &Path) -> Result<PathBuf> {
        let rates = target_rate_by_category(df, column, target)?;
        let img = render_rate_chart(&rates, &self.config);
        save_png(
            &img,
            out_dir,
            &format!("{}_{}_rate.png", file_stem(column), file_stem(target)),
        )
    }
}
