use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::Path;

use super::pixel_source::{DecodedImage, PixelSource};

/// Decode an image file into packed RGB.
///
/// Alpha and higher bit depths are dropped by the RGB8 conversion, so the
/// result always reports 3 channels.
pub fn open(path: &Path) -> Result<DecodedImage> {
    let img = image::open(path).with_context(|| format!("Failed to decode image {:?}", path))?;
    let color = img.color();
    let decoded = from_dynamic(img)?;
    log::debug!(
        "decoded {:?}: {}x{} {:?}",
        path,
        decoded.width(),
        decoded.height(),
        color
    );
    Ok(decoded)
}

pub fn from_dynamic(img: DynamicImage) -> Result<DecodedImage> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(DecodedImage::new(rgb.into_raw(), width, height)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_from_dynamic_drops_alpha() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([255, 0, 0, 10]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let decoded = from_dynamic(DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.channels(), 3);
        assert_eq!(decoded.pixel_at(0, 0), [255, 0, 0]);
        assert_eq!(decoded.pixel_at(1, 0), [0, 0, 255]);
    }
}
