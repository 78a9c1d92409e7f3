//! Save a region of a screenshot as a PNG, used by the stats tab's
//! "save plot" action.

use egui::{ColorImage, Rect};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Crop `image` to `rect` (in points) and write it as a PNG.
pub fn save_region_png(
    image: &ColorImage,
    rect: Rect,
    pixels_per_point: f32,
    path: &Path,
) -> Result<(), image::ImageError> {
    let [img_w, img_h] = image.size;
    let clamp_x = |v: f32| (v * pixels_per_point).round().clamp(0.0, img_w as f32) as usize;
    let clamp_y = |v: f32| (v * pixels_per_point).round().clamp(0.0, img_h as f32) as usize;
    let (x0, y0) = (clamp_x(rect.min.x), clamp_y(rect.min.y));
    let (x1, y1) = (clamp_x(rect.max.x), clamp_y(rect.max.y));
    let width = x1.saturating_sub(x0).max(1) as u32;
    let height = y1.saturating_sub(y0).max(1) as u32;

    let out = RgbaImage::from_fn(width, height, |x, y| {
        let px = image.pixels[(y0 + y as usize) * img_w + x0 + x as usize];
        Rgba(px.to_array())
    });
    out.save(path)
}
