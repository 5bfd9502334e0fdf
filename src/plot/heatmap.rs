//! Diverging heatmap of a correlation matrix

use image::{Rgb, RgbImage};

use super::{colors, draw_filled_rect, interpolate_color, ImageConfig};
use crate::pipeline::CorrelationMatrix;

/// Map a coefficient in [-1, 1] to blue (negative), white (zero) or red (positive)
pub fn correlation_color(r: f64) -> Rgb<u8> {
    if r.is_nan() {
        return colors::LIGHT_GRAY;
    }
    let r = r.clamp(-1.0, 1.0);
    if r < 0.0 {
        interpolate_color(colors::WHITE, colors::BLUE, -r)
    } else {
        interpolate_color(colors::WHITE, colors::RED, r)
    }
}

/// One square cell per matrix entry; row 0 at the top
pub fn render_heatmap(matrix: &CorrelationMatrix, config: &ImageConfig) -> RgbImage {
    let mut img = config.canvas();

    let n = matrix.len();
    if n == 0 {
        return img;
    }

    let (x0, y0, w, h) = config.plot_area();
    let cell_w = w as f64 / n as f64;
    let cell_h = h as f64 / n as f64;

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let x = x0 + (j as f64 * cell_w) as u32;
            let y = y0 + (i as f64 * cell_h) as u32;
            let cw = (cell_w.ceil() as u32).max(1);
            let ch = (cell_h.ceil() as u32).max(1);
            draw_filled_rect(&mut img, x, y, cw, ch, correlation_color(value));
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_color_endpoints() {
        assert_eq!(correlation_color(0.0), colors::WHITE);
        assert_eq!(correlation_color(1.0), colors::RED);
        assert_eq!(correlation_color(-1.0), colors::BLUE);
        assert_eq!(correlation_color(f64::NAN), colors::LIGHT_GRAY);
    }

    #[test]
    fn test_heatmap_diagonal_is_red() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".into(), "b".into()],
            values: vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
            observations: 10,
        };
        let config = ImageConfig::square(100);
        let img = render_heatmap(&matrix, &config);

        let (x0, y0, w, h) = config.plot_area();
        assert_eq!(*img.get_pixel(x0 + 1, y0 + 1), colors::RED);
        assert_eq!(*img.get_pixel(x0 + w - 2, y0 + 1), colors::BLUE);
        assert_eq!(*img.get_pixel(x0 + w - 2, y0 + h - 2), colors::RED);
    }
}
