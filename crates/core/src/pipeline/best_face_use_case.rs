use std::sync::Arc;

use crate::detection::domain::face::Face;
use crate::detection::domain::face_grouper::FaceGrouper;
use crate::detection::domain::photo::{Photo, PhotoId};
use crate::detection::domain::photo_batch::PhotoBatch;
use crate::pipeline::analysis_executor::{AnalysisExecutor, PhotoAnalyzer};
use crate::pipeline::pipeline_error::PipelineError;
use crate::selection::best_face::best_face;
use crate::selection::most_common_face::common_faces;

/// One uploaded file: display name plus encoded image bytes.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The chosen face with the photo it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BestFace {
    pub face: Face,
    pub photo_name: String,
    pub ratio: f64,
}

/// Finds the best photo of the person who appears most often in a batch.
///
/// Photos are analyzed by the executor, grouped remotely, and the face with
/// the largest face-to-photo area ratio within the most common group wins.
pub struct BestFaceUseCase {
    analyzer: PhotoAnalyzer,
    grouper: Arc<dyn FaceGrouper>,
    executor: Box<dyn AnalysisExecutor>,
}

impl BestFaceUseCase {
    pub fn new(
        analyzer: PhotoAnalyzer,
        grouper: Arc<dyn FaceGrouper>,
        executor: Box<dyn AnalysisExecutor>,
    ) -> Self {
        Self {
            analyzer,
            grouper,
            executor,
        }
    }

    /// Returns `Ok(None)` for an empty batch or when no face is found.
    pub fn execute(&self, files: Vec<PhotoFile>) -> Result<Option<BestFace>, PipelineError> {
        if files.is_empty() {
            return Ok(None);
        }

        log::info!("Analyzing batch of {} photo(s)", files.len());
        let photos: Vec<Photo> = files
            .into_iter()
            .enumerate()
            .map(|(i, file)| Photo::new(PhotoId::new(i), file.name, file.bytes))
            .collect();

        let batch = PhotoBatch::new(self.executor.analyze_all(photos, &self.analyzer)?);

        let candidates =
            common_faces(&batch, self.grouper.as_ref()).map_err(PipelineError::Grouping)?;

        let Some(face) = best_face(&candidates, &batch) else {
            log::info!("No face found in {} photo(s)", batch.len());
            return Ok(None);
        };

        let photo_name = batch
            .photo(face.photo())
            .map(|p| p.name().to_string())
            .unwrap_or_default();
        let ratio = batch.ratio(face).unwrap_or_default();
        log::info!(
            "Best face {} in {photo_name} (ratio {ratio:.4}) out of {} candidate(s)",
            face.id(),
            candidates.len()
        );

        Ok(Some(BestFace {
            face: face.clone(),
            photo_name,
            ratio,
        }))
    }
}
