use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::pipeline::best_face_use_case::{BestFace, BestFaceUseCase, PhotoFile};
use crate::pipeline::pipeline_error::PipelineError;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("please send at least 1 picture")]
    NoFiles,
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl SubmitError {
    /// True when the caller sent a bad request rather than the batch failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoFiles | Self::Io { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Found(BestFace),
    NotFound,
}

impl SubmitOutcome {
    /// The chosen face's attributes, optionally with its photo and ratio.
    /// `NotFound` renders as JSON `null`.
    pub fn to_json(&self, include_photo: bool) -> Value {
        let SubmitOutcome::Found(best) = self else {
            return Value::Null;
        };
        let mut body: Map<String, Value> = best.face.attributes().clone();
        if include_photo {
            body.insert("photo".into(), Value::from(best.photo_name.clone()));
            body.insert("ratio".into(), Value::from(best.ratio));
        }
        Value::Object(body)
    }
}

/// Inbound boundary: accepts uploaded files and answers with the best face.
pub struct SubmitBatch {
    use_case: BestFaceUseCase,
}

impl SubmitBatch {
    pub fn new(use_case: BestFaceUseCase) -> Self {
        Self { use_case }
    }

    /// Rejects an empty upload or a path that is not a regular file, before any
    /// remote work is configured.
    pub fn validate(paths: &[PathBuf]) -> Result<(), SubmitError> {
        if paths.is_empty() {
            return Err(SubmitError::NoFiles);
        }
        if let Some(bad) = paths.iter().find(|p| !p.is_file()) {
            let source = if bad.exists() {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file")
            } else {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
            };
            return Err(SubmitError::Io {
                path: bad.clone(),
                source,
            });
        }
        Ok(())
    }

    pub fn submit_paths(&self, paths: &[PathBuf]) -> Result<SubmitOutcome, SubmitError> {
        Self::validate(paths)?;
        let files = paths
            .iter()
            .map(|path| read_file(path))
            .collect::<Result<Vec<_>, _>>()?;
        self.submit(files)
    }

    pub fn submit(&self, files: Vec<PhotoFile>) -> Result<SubmitOutcome, SubmitError> {
        if files.is_empty() {
            return Err(SubmitError::NoFiles);
        }
        Ok(match self.use_case.execute(files)? {
            Some(best) => SubmitOutcome::Found(best),
            None => SubmitOutcome::NotFound,
        })
    }
}

fn read_file(path: &Path) -> Result<PhotoFile, SubmitError> {
    let bytes = fs::read(path).map_err(|source| SubmitError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PhotoFile::new(name, bytes))
}
