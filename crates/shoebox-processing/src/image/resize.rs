use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Largest size with the source aspect ratio that fits inside
/// `max_width x max_height`. Never larger than the source.
pub fn fit_within(orig_width: u32, orig_height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if orig_width == 0 || orig_height == 0 {
        return (orig_width, orig_height);
    }
    if orig_width <= max_width && orig_height <= max_height {
        return (orig_width, orig_height);
    }

    let scale = (max_width as f64 / orig_width as f64).min(max_height as f64 / orig_height as f64);
    let width = ((orig_width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let height = ((orig_height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (width, height)
}

/// Select appropriate filter type based on resize ratio
pub fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Shrink `img` to fit inside the bounds, preserving aspect ratio.
pub fn resize_to_fit(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let (width, height) = fit_within(orig_width, orig_height, max_width, max_height);
    if (width, height) == (orig_width, orig_height) {
        return img;
    }
    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}
