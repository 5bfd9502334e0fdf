//! Target rate per category bar chart

use image::RgbImage;

use super::{draw_axes, draw_filled_rect, draw_horizontal_line, ImageConfig};
use crate::pipeline::CategoryRate;

/// Bars of event rate on a fixed 0..1 scale, with a reference line at the
/// overall rate
pub fn render_rate_chart(rates: &[CategoryRate], config: &ImageConfig) -> RgbImage {
    let mut img = config.canvas();
    draw_axes(&mut img, config);

    if rates.is_empty() {
        return img;
    }

    let (x0, y0, w, h) = config.plot_area();
    let slot = w as f64 / rates.len() as f64;
    let usable = (h - 1) as f64;

    for (i, rate) in rates.iter().enumerate() {
        let bar_h = (rate.rate.clamp(0.0, 1.0) * usable).round() as u32;
        if bar_h == 0 {
            continue;
        }
        let x = x0 + 1 + (i as f64 * slot) as u32;
        let bar_w = ((slot * 0.8) as u32).max(1);
        draw_filled_rect(&mut img, x, y0 + h - bar_h, bar_w, bar_h, config.bar_color);
    }

    let total: usize = rates.iter().map(|r| r.count).sum();
    let events: usize = rates.iter().map(|r| r.events).sum();
    if total > 0 {
        let overall = events as f64 / total as f64;
        let y = y0 + h - (overall * usable).round() as u32;
        draw_horizontal_line(&mut img, y, x0 + 1, x0 + w, config.highlight_color);
    }

    img
}
