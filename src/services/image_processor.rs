// src/services/image_processor.rs
use crate::errors::VisionRankError;
use base64::{Engine as _, engine::general_purpose};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};
use std::io::Cursor;

const MAX_DIMENSION: u32 = 4096;
const DEFAULT_MIME: &str = "image/jpeg";

/// Turns uploaded files into the data URLs stored on profiles.
pub struct ImageProcessor {
    max_size: u32,
}

impl ImageProcessor {
    pub fn new(max_size: u32) -> Self {
        Self { max_size }
    }

    /// Validates, downsizes and encodes one upload. The bytes are decoded
    /// once; uploads that already fit are stored as sent.
    pub fn prepare_upload(&self, data: &[u8]) -> Result<String, VisionRankError> {
        let img = image::load_from_memory(data).map_err(|e| {
            VisionRankError::ImageProcessing(format!("Invalid image format: {}", e))
        })?;

        let (width, height) = img.dimensions();
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(VisionRankError::ImageProcessing(format!(
                "Image is {}x{}, limit is {}x{}",
                width, height, MAX_DIMENSION, MAX_DIMENSION
            )));
        }

        Ok(match self.shrink_to_fit(&img)? {
            Some(png) => to_data_url(&png),
            None => to_data_url(data),
        })
    }

    /// PNG bytes of `img` scaled so its longest side is `max_size`, or `None`
    /// when it already fits.
    fn shrink_to_fit(&self, img: &DynamicImage) -> Result<Option<Vec<u8>>, VisionRankError> {
        let (width, height) = img.dimensions();
        let longest = width.max(height);
        if longest <= self.max_size {
            return Ok(None);
        }

        let scale = self.max_size as f32 / longest as f32;
        let side = |len: u32| ((len as f32 * scale) as u32).max(1);
        let thumbnail = img.resize(side(width), side(height), FilterType::Lanczos3);

        let mut png = Vec::new();
        thumbnail
            .write_to(&mut Cursor::new(&mut png), ImgFormat::Png)
            .map_err(|e| VisionRankError::ImageProcessing(format!("PNG encoding failed: {}", e)))?;

        Ok(Some(png))
    }
}

/// Encodes bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(data: &[u8]) -> String {
    let mime = image::guess_format(data)
        .ok()
        .and_then(mime_for)
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(data))
}

/// Splits a data URL into its MIME type and base64 payload. Input without a
/// data URL header is treated as a bare JPEG payload.
pub fn split_data_url(image: &str) -> (&str, &str) {
    match image.split_once(',') {
        Some((header, payload)) if !payload.is_empty() => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|h| h.split(';').next())
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MIME);
            (mime, payload)
        }
        _ => (DEFAULT_MIME, image),
    }
}

fn mime_for(format: ImgFormat) -> Option<&'static str> {
    match format {
        ImgFormat::Png => Some("image/png"),
        ImgFormat::Jpeg => Some("image/jpeg"),
        ImgFormat::Gif => Some("image/gif"),
        ImgFormat::WebP => Some("image/webp"),
        ImgFormat::Bmp => Some("image/bmp"),
        ImgFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 10, 10]));
        let mut output = Vec::new();
        img.write_to(&mut Cursor::new(&mut output), ImgFormat::Png)
            .unwrap();
        output
    }

    fn decode_data_url(url: &str) -> DynamicImage {
        let bytes = general_purpose::STANDARD
            .decode(split_data_url(url).1)
            .unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn rejects_non_image_bytes() {
        let processor = ImageProcessor::new(2048);
        assert!(matches!(
            processor.prepare_upload(b"definitely not a picture"),
            Err(VisionRankError::ImageProcessing(_))
        ));
    }

    #[test]
    fn rejects_oversized_images() {
        let processor = ImageProcessor::new(2048);
        assert!(matches!(
            processor.prepare_upload(&png(MAX_DIMENSION + 1, 1)),
            Err(VisionRankError::ImageProcessing(_))
        ));
    }

    #[test]
    fn keeps_small_images_untouched() {
        let processor = ImageProcessor::new(64);
        let data = png(8, 4);
        assert_eq!(processor.prepare_upload(&data).unwrap(), to_data_url(&data));
    }

    #[test]
    fn downsizes_preserving_aspect_ratio() {
        let processor = ImageProcessor::new(16);
        let url = processor.prepare_upload(&png(64, 32)).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).dimensions(), (16, 8));
    }

    #[test]
    fn unknown_bytes_get_generic_mime() {
        assert!(to_data_url(b"xyz").starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn splits_data_urls_and_bare_payloads() {
        assert_eq!(
            split_data_url("data:image/png;base64,QUJD"),
            ("image/png", "QUJD")
        );
        assert_eq!(split_data_url("QUJD"), ("image/jpeg", "QUJD"));
        assert_eq!(split_data_url("data:;base64,QUJD"), ("image/jpeg", "QUJD"));
    }
}
