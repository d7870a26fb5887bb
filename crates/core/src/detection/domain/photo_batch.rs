use crate::detection::domain::face::Face;
use crate::detection::domain::photo::{Photo, PhotoId};

/// The analyzed photos of one request, in input order.
///
/// Resolves the [`PhotoId`] handles that faces carry.
#[derive(Debug, Clone, Default)]
pub struct PhotoBatch {
    photos: Vec<Photo>,
}

impl PhotoBatch {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        match self.photos.get(id.index()) {
            Some(photo) if photo.id() == id => Some(photo),
            _ => self.photos.iter().find(|p| p.id() == id),
        }
    }

    /// All faces, flattened in photo order then detection order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.photos.iter().flat_map(|p| p.faces())
    }

    /// Face area over photo area, or `None` when the photo cannot be
    /// resolved or has no area.
    pub fn ratio(&self, face: &Face) -> Option<f64> {
        let area = self.photo(face.photo())?.area()?;
        if area == 0 {
            return None;
        }
        Some(face.area() as f64 / area as f64)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detected_face::{DetectedFace, FaceRectangle};
    use approx::assert_relative_eq;
    use serde_json::json;

    fn detection(id: &str, width: u32, height: u32) -> DetectedFace {
        DetectedFace {
            face_id: id.into(),
            face_rectangle: FaceRectangle {
                top: 0,
                left: 0,
                width,
                height,
            },
            face_attributes: json!({"age": 50, "gender": "male"})
                .as_object()
                .cloned()
                .unwrap(),
            face_landmarks: None,
        }
    }

    fn analyzed(index: usize, area: u64, faces: Vec<DetectedFace>) -> Photo {
        Photo::from_detections(PhotoId::new(index), format!("p{index}.png"), area, faces).unwrap()
    }

    #[test]
    fn test_faces_are_flattened_in_input_order() {
        let batch = PhotoBatch::new(vec![
            analyzed(0, 100, vec![detection("a", 1, 1), detection("b", 1, 1)]),
            analyzed(1, 100, vec![]),
            analyzed(2, 100, vec![detection("c", 1, 1)]),
        ]);

        let ids: Vec<&str> = batch.faces().map(Face::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ratio_divides_face_area_by_photo_area() {
        let batch = PhotoBatch::new(vec![analyzed(0, 1000, vec![detection("a", 10, 30)])]);
        let face = batch.faces().next().unwrap();
        assert_relative_eq!(batch.ratio(face).unwrap(), 0.3);
    }

    #[test]
    fn test_ratio_for_unknown_photo_is_none() {
        let batch = PhotoBatch::new(vec![analyzed(0, 1000, vec![])]);
        let orphan = analyzed(5, 1000, vec![detection("a", 1, 1)]);
        assert!(batch.ratio(&orphan.faces()[0]).is_none());
    }

    #[test]
    fn test_ratio_for_zero_area_photo_is_none() {
        let batch = PhotoBatch::new(vec![analyzed(0, 0, vec![detection("a", 1, 1)])]);
        let face = batch.faces().next().unwrap();
        assert!(batch.ratio(face).is_none());
    }

    #[test]
    fn test_photo_lookup_tolerates_reordering() {
        let batch = PhotoBatch::new(vec![analyzed(1, 10, vec![]), analyzed(0, 20, vec![])]);
        assert_eq!(batch.photo(PhotoId::new(0)).unwrap().area(), Some(20));
        assert_eq!(batch.photo(PhotoId::new(1)).unwrap().area(), Some(10));
        assert!(batch.photo(PhotoId::new(2)).is_none());
    }
}
