use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the detect response, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub face_id: String,
    pub face_rectangle: FaceRectangle,
    #[serde(default)]
    pub face_attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_landmarks: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRectangle {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
