use std::io::Cursor;

use crate::imaging::domain::image_probe::{ImageDecodeError, ImageProbe};

/// Reads dimensions from the encoded header via the `image` crate without
/// decoding any pixel data.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderImageProbe;

impl HeaderImageProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ImageProbe for HeaderImageProbe {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImageDecodeError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageDecodeError::Unreadable(Box::new(e)))?;
        if reader.format().is_none() {
            return Err(ImageDecodeError::UnknownFormat);
        }

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ImageDecodeError::Unreadable(Box::new(e)))?;
        if width == 0 || height == 0 {
            return Err(ImageDecodeError::Empty { width, height });
        }
        Ok((width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[rstest]
    #[case::png(image::ImageFormat::Png)]
    #[case::jpeg(image::ImageFormat::Jpeg)]
    #[case::bmp(image::ImageFormat::Bmp)]
    fn test_reads_dimensions(#[case] format: image::ImageFormat) {
        let bytes = encode(120, 80, format);
        assert_eq!(HeaderImageProbe::new().dimensions(&bytes).unwrap(), (120, 80));
    }

    #[test]
    fn test_area_is_width_times_height() {
        let bytes = encode(30, 20, image::ImageFormat::Png);
        assert_eq!(HeaderImageProbe::new().area(&bytes).unwrap(), 600);
    }

    #[test]
    fn test_unknown_bytes_are_rejected() {
        let result = HeaderImageProbe::new().dimensions(b"definitely not an image");
        assert!(matches!(result, Err(ImageDecodeError::UnknownFormat)));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(HeaderImageProbe::new().dimensions(&[]).is_err());
    }

    #[test]
    fn test_truncated_png_is_unreadable() {
        let bytes = encode(30, 20, image::ImageFormat::Png);
        let result = HeaderImageProbe::new().dimensions(&bytes[..12]);
        assert!(matches!(result, Err(ImageDecodeError::Unreadable(_))));
    }
}
