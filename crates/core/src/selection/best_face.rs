use crate::detection::domain::face::Face;
use crate::detection::domain::photo_batch::PhotoBatch;

/// Picks the face covering the largest share of its photo.
///
/// Scans left to right keeping the first strictly greater ratio, so ties
/// go to the earliest face. The running best starts at zero: a face with
/// zero area never wins. Faces whose photo cannot be resolved are skipped.
pub fn best_face<'a>(faces: &[&'a Face], batch: &PhotoBatch) -> Option<&'a Face> {
    let mut best_ratio = 0.0;
    let mut best = None;

    for &face in faces {
        let Some(ratio) = batch.ratio(face) else {
            log::warn!(
                "Skipping face {}: photo {:?} has no known area",
                face.id(),
                face.photo()
            );
            continue;
        };
        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(face);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detected_face::{DetectedFace, FaceRectangle};
    use crate::detection::domain::photo::{Photo, PhotoId};
    use rstest::rstest;
    use serde_json::json;

    fn detection(id: &str, area: u32) -> DetectedFace {
        DetectedFace {
            face_id: id.into(),
            face_rectangle: FaceRectangle {
                top: 0,
                left: 0,
                width: area,
                height: 1,
            },
            face_attributes: json!({"age": 20, "gender": "female"})
                .as_object()
                .cloned()
                .unwrap(),
            face_landmarks: None,
        }
    }

    /// One photo per `(photo_area, [(face_id, face_area)])` entry.
    fn batch(photos: &[(u64, &[(&str, u32)])]) -> PhotoBatch {
        PhotoBatch::new(
            photos
                .iter()
                .enumerate()
                .map(|(i, (area, faces))| {
                    let detections = faces.iter().map(|(id, a)| detection(id, *a)).collect();
                    Photo::from_detections(PhotoId::new(i), format!("p{i}"), *area, detections).unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_no_faces_yields_none() {
        let batch = batch(&[]);
        assert!(best_face(&[], &batch).is_none());
    }

    #[test]
    fn test_picks_largest_ratio() {
        let batch = batch(&[(1000, &[("a", 100), ("b", 500)])]);
        let faces: Vec<&Face> = batch.faces().collect();

        assert_eq!(best_face(&faces, &batch).unwrap().id(), "b");
    }

    #[test]
    fn test_equal_ratios_keep_first() {
        let batch = batch(&[(1000, &[("a", 100), ("b", 100)])]);
        let faces: Vec<&Face> = batch.faces().collect();

        assert_eq!(best_face(&faces, &batch).unwrap().id(), "a");
    }

    #[test]
    fn test_ratio_beats_raw_area_across_photos() {
        // a: 200/10000 = 0.02, b: 100/1000 = 0.1
        let batch = batch(&[(10_000, &[("a", 200)]), (1000, &[("b", 100)])]);
        let faces: Vec<&Face> = batch.faces().collect();

        assert_eq!(best_face(&faces, &batch).unwrap().id(), "b");
    }

    #[test]
    fn test_zero_area_face_is_never_chosen() {
        let batch = batch(&[(1000, &[("a", 0)])]);
        let faces: Vec<&Face> = batch.faces().collect();

        assert!(best_face(&faces, &batch).is_none());
    }

    #[test]
    fn test_unresolvable_face_is_skipped() {
        let batch = batch(&[(1000, &[("a", 10)])]);
        let orphan_photo = Photo::from_detections(PhotoId::new(9), "orphan", 10, vec![detection("z", 9)])
            .unwrap();
        let faces: Vec<&Face> = vec![&orphan_photo.faces()[0], batch.faces().next().unwrap()];

        assert_eq!(best_face(&faces, &batch).unwrap().id(), "a");
    }

    #[rstest]
    #[case::ascending(&[("a", 1), ("b", 2), ("c", 3)], "c")]
    #[case::descending(&[("a", 3), ("b", 2), ("c", 1)], "a")]
    #[case::peak_in_middle(&[("a", 1), ("b", 5), ("c", 5)], "b")]
    fn test_scan_order(#[case] faces: &[(&str, u32)], #[case] expected: &str) {
        let batch = batch(&[(100, faces)]);
        let all: Vec<&Face> = batch.faces().collect();

        assert_eq!(all.len(), faces.len());
        assert_eq!(best_face(&all, &batch).unwrap().id(), expected);
    }
}
