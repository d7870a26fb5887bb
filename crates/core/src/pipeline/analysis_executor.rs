use std::sync::Arc;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::photo::{AnalyzeError, Photo};
use crate::imaging::domain::image_probe::ImageProbe;
use crate::pipeline::pipeline_error::PipelineError;

/// Everything a worker needs to analyze one photo. Cheap to clone.
#[derive(Clone)]
pub struct PhotoAnalyzer {
    probe: Arc<dyn ImageProbe>,
    detector: Arc<dyn FaceDetector>,
}

impl PhotoAnalyzer {
    pub fn new(probe: Arc<dyn ImageProbe>, detector: Arc<dyn FaceDetector>) -> Self {
        Self { probe, detector }
    }

    pub fn analyze(&self, photo: &mut Photo) -> Result<(), AnalyzeError> {
        photo.analyze(&*self.probe, &*self.detector)
    }
}

/// Abstracts how a batch of photos gets analyzed.
///
/// Implementations must return the photos in input order, all analyzed,
/// or fail the whole batch.
pub trait AnalysisExecutor: Send + Sync {
    fn analyze_all(
        &self,
        photos: Vec<Photo>,
        analyzer: &PhotoAnalyzer,
    ) -> Result<Vec<Photo>, PipelineError>;
}
