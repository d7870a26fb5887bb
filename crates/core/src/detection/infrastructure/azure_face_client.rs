use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_grouper::{FaceGrouper, FaceGrouping};
use crate::detection::domain::face_service_error::FaceServiceError;
use crate::shared::config::FaceApiConfig;
use crate::shared::constants::{DETECT_ATTRIBUTES, SUBSCRIPTION_KEY_HEADER};

const DETECT: &str = "detect";
const GROUP: &str = "group";

/// Blocking client for an Azure Face API compatible service.
///
/// One instance serves both detection and grouping and is safe to share
/// between analysis workers.
pub struct AzureFaceClient {
    http: Client,
    api_key: String,
    detect_url: Url,
    group_url: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupRequest<'a> {
    face_ids: &'a [String],
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl AzureFaceClient {
    pub fn new(config: &FaceApiConfig) -> Result<Self, FaceServiceError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| transport(DETECT, e))?;
        let detect_url = config
            .base_url()
            .join(DETECT)
            .map_err(|e| transport(DETECT, e))?;
        let group_url = config
            .base_url()
            .join(GROUP)
            .map_err(|e| transport(GROUP, e))?;

        Ok(Self {
            http,
            api_key: config.api_key().to_string(),
            detect_url,
            group_url,
        })
    }

    fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, FaceServiceError> {
        let response = request
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| transport(operation, e))?;

        let status = response.status();
        let body = response.text().map_err(|e| transport(operation, e))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.code, envelope.error.message),
                Err(_) => (
                    status.canonical_reason().unwrap_or("Unknown").to_string(),
                    body,
                ),
            };
            return Err(FaceServiceError::Status {
                operation,
                status: status.as_u16(),
                code,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| FaceServiceError::Body { operation, source })
    }
}

impl FaceDetector for AzureFaceClient {
    fn detect(&self, image: &[u8]) -> Result<Vec<DetectedFace>, FaceServiceError> {
        log::debug!("detect: {} bytes", image.len());
        let attributes = DETECT_ATTRIBUTES.join(",");
        let request = self
            .http
            .post(self.detect_url.clone())
            .query(&[
                ("returnFaceId", "true"),
                ("returnFaceLandmarks", "true"),
                ("returnFaceAttributes", attributes.as_str()),
            ])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());
        self.send(DETECT, request)
    }
}

impl FaceGrouper for AzureFaceClient {
    fn group(&self, face_ids: &[String]) -> Result<FaceGrouping, FaceServiceError> {
        log::debug!("group: {} face ids", face_ids.len());
        let request = self
            .http
            .post(self.group_url.clone())
            .json(&GroupRequest { face_ids });
        self.send(GROUP, request)
    }
}

fn transport<E>(operation: &'static str, error: E) -> FaceServiceError
where
    E: std::error::Error + Send + Sync + 'static,
{
    FaceServiceError::Transport {
        operation,
        source: Box::new(error),
    }
}
