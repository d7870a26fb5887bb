use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::detection::domain::photo::{AnalyzeError, Photo};
use crate::pipeline::analysis_executor::{AnalysisExecutor, PhotoAnalyzer};
use crate::pipeline::pipeline_error::PipelineError;
use crate::shared::config::PipelineSettings;
use crate::shared::constants::{DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_POOL_SIZE};

struct Job {
    photo: Photo,
    reply: Sender<Result<Photo, AnalyzeError>>,
}

/// Analyzes photos on a worker pool created for each batch.
///
/// Layout: `queue → N workers → one reply channel per photo → caller`
///
/// The caller waits on replies in input order, each bounded by `timeout`.
/// On the first failure the batch is cancelled: queued jobs are dropped
/// unstarted and the workers are detached. An in-flight remote call keeps
/// running until the HTTP client's own timeout ends it.
pub struct ThreadedAnalysisExecutor {
    pool_size: usize,
    timeout: Duration,
}

impl ThreadedAnalysisExecutor {
    pub fn new(pool_size: usize, timeout: Duration) -> Self {
        Self {
            pool_size: pool_size.max(1),
            timeout,
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.pool_size, settings.analysis_timeout)
    }
}

impl Default for ThreadedAnalysisExecutor {
    fn default() -> Self {
        Self::new(
            DEFAULT_POOL_SIZE,
            Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        )
    }
}

impl AnalysisExecutor for ThreadedAnalysisExecutor {
    fn analyze_all(
        &self,
        photos: Vec<Photo>,
        analyzer: &PhotoAnalyzer,
    ) -> Result<Vec<Photo>, PipelineError> {
        if photos.is_empty() {
            return Ok(photos);
        }

        let workers = self.pool_size.min(photos.len());
        log::debug!("Analyzing {} photo(s) on {workers} worker(s)", photos.len());

        let cancelled = Arc::new(AtomicBool::new(false));
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();

        let handles: Vec<JoinHandle<()>> = (0..workers)
            .map(|_| spawn_worker(job_rx.clone(), analyzer.clone(), cancelled.clone()))
            .collect();
        drop(job_rx);

        let mut pending = Vec::with_capacity(photos.len());
        for photo in photos {
            let (reply, result_rx) = crossbeam_channel::bounded(1);
            pending.push((photo.name().to_string(), result_rx));
            // If every worker is gone the reply sender drops with the job
            // and the caller sees a disconnect for this photo.
            let _ = job_tx.send(Job { photo, reply });
        }
        drop(job_tx);

        match collect_results(pending, self.timeout, &cancelled) {
            Ok(analyzed) => {
                for handle in handles {
                    let _ = handle.join();
                }
                Ok(analyzed)
            }
            Err(e) => {
                log::warn!("Cancelling batch: {e}");
                Err(e)
            }
        }
    }
}

fn spawn_worker(
    jobs: Receiver<Job>,
    analyzer: PhotoAnalyzer,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for job in jobs {
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            let Job { mut photo, reply } = job;
            let result = analyzer.analyze(&mut photo).map(|()| photo);
            // Raised before replying so no worker picks up another job.
            if result.is_err() {
                cancelled.store(true, Ordering::SeqCst);
            }
            if reply.send(result).is_err() {
                break;
            }
        }
    })
}

/// Receives every reply in input order, each within its own `timeout`.
///
/// On the first failure `cancelled` is raised while the remaining reply
/// receivers are still alive.
fn collect_results(
    pending: Vec<(String, Receiver<Result<Photo, AnalyzeError>>)>,
    timeout: Duration,
    cancelled: &AtomicBool,
) -> Result<Vec<Photo>, PipelineError> {
    let mut analyzed = Vec::with_capacity(pending.len());
    for (name, result_rx) in pending {
        let failure = match result_rx.recv_timeout(timeout) {
            Ok(Ok(photo)) => {
                analyzed.push(photo);
                continue;
            }
            Ok(Err(e)) => PipelineError::Analyze(e),
            Err(RecvTimeoutError::Timeout) => PipelineError::Timeout {
                photo: name,
                after: timeout,
            },
            Err(RecvTimeoutError::Disconnected) => PipelineError::WorkerLost { photo: name },
        };
        cancelled.store(true, Ordering::SeqCst);
        return Err(failure);
    }
    Ok(analyzed)
}
