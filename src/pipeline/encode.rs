//! Image encoding: rendered `DynamicImage` → PNG / JPEG / WebP bytes.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Output format for rasterised pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    /// Lossless WebP.
    Webp,
}

impl ImageFormat {
    /// File extension used for archive entries.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encode a page image.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
/// `jpeg_quality` (1–100) is ignored by the lossless formats.
pub fn encode_image(
    img: &DynamicImage,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)?;
        }
        ImageFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::WebP)?;
        }
    }
    debug!("Encoded image → {} bytes {}", buf.len(), format);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn encode_png() {
        let data = encode_image(&red_square(), ImageFormat::Png, 92).expect("encode should succeed");
        assert_eq!(image::guess_format(&data).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn encode_jpeg_drops_alpha() {
        let data = encode_image(&red_square(), ImageFormat::Jpeg, 92).expect("encode should succeed");
        assert_eq!(image::guess_format(&data).unwrap(), image::ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn encode_webp() {
        let data = encode_image(&red_square(), ImageFormat::Webp, 92).expect("encode should succeed");
        assert_eq!(image::guess_format(&data).unwrap(), image::ImageFormat::WebP);
    }

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Webp.mime_type(), "image/webp");
    }
}
