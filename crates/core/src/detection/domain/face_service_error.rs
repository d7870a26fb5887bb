use thiserror::Error;

/// Failure talking to the remote face service. Always fatal for the
/// request that triggered it; nothing is retried.
#[derive(Error, Debug)]
pub enum FaceServiceError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{operation} returned HTTP {status} ({code}): {message}")]
    Status {
        operation: &'static str,
        status: u16,
        code: String,
        message: String,
    },
    #[error("{operation} returned an unreadable body: {source}")]
    Body {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("face {face_id} is missing attribute '{attribute}'")]
    MissingAttribute {
        face_id: String,
        attribute: &'static str,
    },
}
