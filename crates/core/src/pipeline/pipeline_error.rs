use std::time::Duration;

use thiserror::Error;

use crate::detection::domain::face_service_error::FaceServiceError;
use crate::detection::domain::photo::AnalyzeError;

/// Fatal failures of a batch. Any one of them aborts the whole request;
/// there is no partial result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
    #[error("face grouping failed: {0}")]
    Grouping(#[source] FaceServiceError),
    #[error("analysis of {photo} did not finish within {}s", .after.as_secs_f64())]
    Timeout { photo: String, after: Duration },
    #[error("analysis worker for {photo} exited without a result")]
    WorkerLost { photo: String },
}
