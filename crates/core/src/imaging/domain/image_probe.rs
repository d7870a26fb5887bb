use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("unreadable image: {0}")]
    Unreadable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Domain interface for learning an image's pixel dimensions.
///
/// Only the size matters for ratio computation, so implementations are free
/// to stop after the header.
pub trait ImageProbe: Send + Sync {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImageDecodeError>;

    fn area(&self, bytes: &[u8]) -> Result<u64, ImageDecodeError> {
        let (width, height) = self.dimensions(bytes)?;
        Ok(width as u64 * height as u64)
    }
}
