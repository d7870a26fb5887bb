use serde_json::{Map, Value};

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_service_error::FaceServiceError;
use crate::detection::domain::photo::PhotoId;

/// One detected person within one photo.
///
/// Refers to its photo by [`PhotoId`]; resolve it through a
/// [`PhotoBatch`](crate::detection::domain::photo_batch::PhotoBatch).
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    id: String,
    photo: PhotoId,
    age: f64,
    gender: String,
    area: u64,
    attributes: Map<String, Value>,
}

impl Face {
    pub fn new(
        id: impl Into<String>,
        photo: PhotoId,
        age: f64,
        gender: impl Into<String>,
        area: u64,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            photo,
            age,
            gender: gender.into(),
            area,
            attributes,
        }
    }

    /// Builds a face from a detect response entry. `age` and `gender` must
    /// be present since they were requested.
    pub fn from_detection(detected: DetectedFace, photo: PhotoId) -> Result<Self, FaceServiceError> {
        let age = detected
            .face_attributes
            .get("age")
            .and_then(Value::as_f64)
            .ok_or_else(|| FaceServiceError::MissingAttribute {
                face_id: detected.face_id.clone(),
                attribute: "age",
            })?;
        let gender = detected
            .face_attributes
            .get("gender")
            .and_then(Value::as_str)
            .ok_or_else(|| FaceServiceError::MissingAttribute {
                face_id: detected.face_id.clone(),
                attribute: "gender",
            })?
            .to_string();

        Ok(Self {
            area: detected.face_rectangle.area(),
            id: detected.face_id,
            photo,
            age,
            gender,
            attributes: detected.face_attributes,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn photo(&self) -> PhotoId {
        self.photo
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Bounding-box area in pixels.
    pub fn area(&self) -> u64 {
        self.area
    }

    /// Every attribute the service returned, including ones not modelled here.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}
