use thiserror::Error;

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face::Face;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_service_error::FaceServiceError;
use crate::imaging::domain::image_probe::{ImageDecodeError, ImageProbe};

/// Handle to a photo within its batch. Faces carry this instead of a
/// reference so the photo/face graph has no ownership cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(usize);

impl PhotoId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("could not decode {photo}: {source}")]
    Decode {
        photo: String,
        #[source]
        source: ImageDecodeError,
    },
    #[error("face detection failed for {photo}: {source}")]
    Remote {
        photo: String,
        #[source]
        source: FaceServiceError,
    },
    #[error("{photo} has already been analyzed")]
    AlreadyAnalyzed { photo: String },
}

/// Pixel area and detected faces, always set together.
#[derive(Debug, Clone)]
struct Analysis {
    area: u64,
    faces: Vec<Face>,
}

/// One uploaded image and, once analyzed, the faces found in it.
#[derive(Debug, Clone)]
pub struct Photo {
    id: PhotoId,
    name: String,
    bytes: Option<Vec<u8>>,
    analysis: Option<Analysis>,
}

impl Photo {
    pub fn new(id: PhotoId, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id,
            name: name.into(),
            bytes: Some(bytes),
            analysis: None,
        }
    }

    /// Builds an already analyzed photo from a detect response.
    pub fn from_detections(
        id: PhotoId,
        name: impl Into<String>,
        area: u64,
        detections: Vec<DetectedFace>,
    ) -> Result<Self, FaceServiceError> {
        Ok(Self {
            id,
            name: name.into(),
            bytes: None,
            analysis: Some(Analysis {
                area,
                faces: index_faces(id, detections)?,
            }),
        })
    }

    /// Decodes the image size, then asks the detector for faces.
    ///
    /// The encoded bytes are released once detection succeeds. A photo is
    /// analyzed exactly once.
    pub fn analyze(
        &mut self,
        probe: &dyn ImageProbe,
        detector: &dyn FaceDetector,
    ) -> Result<(), AnalyzeError> {
        let bytes = match (&self.analysis, &self.bytes) {
            (None, Some(bytes)) => bytes,
            _ => {
                return Err(AnalyzeError::AlreadyAnalyzed {
                    photo: self.name.clone(),
                })
            }
        };

        let area = probe.area(bytes).map_err(|source| AnalyzeError::Decode {
            photo: self.name.clone(),
            source,
        })?;

        let faces = detector
            .detect(bytes)
            .and_then(|detections| index_faces(self.id, detections))
            .map_err(|source| AnalyzeError::Remote {
                photo: self.name.clone(),
                source,
            })?;

        log::debug!("{}: {} face(s), {} px", self.name, faces.len(), area);
        self.analysis = Some(Analysis { area, faces });
        self.bytes = None;
        Ok(())
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }

    /// Pixel area, or `None` before analysis.
    pub fn area(&self) -> Option<u64> {
        self.analysis.as_ref().map(|a| a.area)
    }

    /// Faces in detection order. Empty before analysis.
    pub fn faces(&self) -> &[Face] {
        self.analysis
            .as_ref()
            .map(|a| a.faces.as_slice())
            .unwrap_or_default()
    }

    pub fn face(&self, id: &str) -> Option<&Face> {
        self.faces().iter().find(|f| f.id() == id)
    }

    /// True when this photo holds the face under the face's own identity.
    pub fn contains(&self, face: &Face) -> bool {
        face.photo() == self.id && self.face(face.id()).is_some()
    }
}

/// Converts detections to faces keyed by identity. A repeated identity
/// replaces the earlier entry in place.
fn index_faces(photo: PhotoId, detections: Vec<DetectedFace>) -> Result<Vec<Face>, FaceServiceError> {
    let mut faces: Vec<Face> = Vec::with_capacity(detections.len());
    for detected in detections {
        let face = Face::from_detection(detected, photo)?;
        match faces.iter_mut().find(|f| f.id() == face.id()) {
            Some(existing) => *existing = face,
            None => faces.push(face),
        }
    }
    Ok(faces)
}
