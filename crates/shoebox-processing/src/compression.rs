use anyhow::{anyhow, Result};
use image::{DynamicImage, GenericImageView};

/// JPEG encoder backed by mozjpeg
pub struct JpegEncoder;

impl JpegEncoder {
    /// Encode `img` as a progressive, optimized JPEG at `quality` (0-100).
    pub fn encode(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        if quality > 100 {
            return Err(anyhow!("Invalid JPEG quality: {}", quality));
        }
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("Cannot encode an empty image"));
        }
        let rgb_img = img.to_rgb8();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }
}
