use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_service_error::FaceServiceError;

/// Domain interface for face detection on an encoded image.
///
/// Shared across analysis workers, hence `&self` and `Sync`.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &[u8]) -> Result<Vec<DetectedFace>, FaceServiceError>;
}
