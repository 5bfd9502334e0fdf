//! Histogram and bar chart rendering

use image::RgbImage;

use super::{draw_axes, draw_filled_rect, ImageConfig};

/// Equal-width bins used for numeric distributions
pub const DEFAULT_BINS: usize = 20;

/// Count values into `bins` equal-width bins spanning min..=max.
///
/// The maximum lands in the last bin. A constant column puts every value in
/// the first bin; no values gives all-zero counts.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<usize> {
    let bins = bins.max(1);
    let mut counts = vec![0usize; bins];

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if finite.is_empty() {
        return counts;
    }

    let width = (max - min) / bins as f64;
    for v in finite {
        let idx = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    counts
}

/// One bar per count, scaled to the tallest bar
pub fn render_bar_chart(counts: &[usize], config: &ImageConfig) -> RgbImage {
    let mut img = config.canvas();
    draw_axes(&mut img, config);

    let max_count = counts.iter().copied().max().unwrap_or(0);
    if counts.is_empty() || max_count == 0 {
        return img;
    }

    let (x0, y0, w, h) = config.plot_area();
    let slot = w as f64 / counts.len() as f64;
    let gap = if slot >= 4.0 { 1 } else { 0 };

    for (i, &count) in counts.iter().enumerate() {
        let bar_h = ((count as f64 / max_count as f64) * (h - 1) as f64).round() as u32;
        if bar_h == 0 {
            continue;
        }
        let x = x0 + 1 + (i as f64 * slot) as u32;
        let bar_w = (slot as u32).saturating_sub(gap).max(1);
        draw_filled_rect(&mut img, x, y0 + h - bar_h, bar_w, bar_h, config.bar_color);
    }

    img
}
