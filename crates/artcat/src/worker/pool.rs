use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};

use crate::error::{BatchError, OcrError};
use crate::processor::OcrExtractor;
use crate::record::{ExtractionResult, ImageRecord};

/// Upper bound on concurrent OCR workers.
pub const MAX_WORKERS: usize = 8;

type JobOutcome = Result<ExtractionResult, BatchError>;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_workers: usize,
    /// Longest wait for the next completed extraction. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS,
            timeout: None,
        }
    }
}

/// Fans OCR out over a short-lived pool of worker threads.
///
/// Every image is queued up front and workers pull from the shared queue one
/// image at a time. Results come back in completion order; callers that need
/// a stable order must sort (the layout engine sorts by name).
pub struct BatchExtractor {
    extractor: OcrExtractor,
    config: BatchConfig,
}

impl BatchExtractor {
    pub fn new(extractor: OcrExtractor) -> Self {
        Self::with_config(extractor, BatchConfig::default())
    }

    pub fn with_config(extractor: OcrExtractor, config: BatchConfig) -> Self {
        Self { extractor, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// `min(max_workers, image_count)`, zero only for an empty batch.
    pub fn worker_count_for(&self, image_count: usize) -> usize {
        self.config.max_workers.max(1).min(image_count)
    }

    /// Extracts text from every image. The first failure aborts the batch and
    /// no results are returned.
    pub fn extract_batch(
        &self,
        images: Vec<ImageRecord>,
    ) -> Result<Vec<ExtractionResult>, BatchError> {
        if images.is_empty() {
            debug!("Empty batch, no workers started");
            return Ok(Vec::new());
        }

        let total = images.len();
        let worker_count = self.worker_count_for(total);
        let _span = tracing::info_span!("worker.batch", images = total, workers = worker_count)
            .entered();

        // Both channels hold the whole batch so neither side ever blocks on send
        let (job_sender, job_receiver) = bounded::<ImageRecord>(total);
        let (result_sender, result_receiver) = bounded::<JobOutcome>(total);
        let cancelled = Arc::new(AtomicBool::new(false));

        for image in images {
            job_sender
                .send(image)
                .map_err(|_| BatchError::ChannelClosed)?;
        }
        drop(job_sender);

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let cancel_flag = Arc::clone(&cancelled);
            let extractor = self.extractor.clone();

            let spawned = thread::Builder::new()
                .name(format!("artcat-ocr-{}", worker_id))
                .spawn(move || run_worker(worker_id, extractor, job_rx, result_tx, cancel_flag));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    cancelled.store(true, Ordering::Relaxed);
                    join_workers(workers);
                    return Err(BatchError::WorkerSpawn(e.to_string()));
                }
            }
        }
        drop(result_sender);

        info!(
            "Extracting text from {} images with {} workers",
            total, worker_count
        );

        match self.collect(&result_receiver, total) {
            Ok(results) => {
                join_workers(workers);
                info!("Extracted text from {} images", results.len());
                Ok(results)
            }
            Err(BatchError::Timeout { waited }) => {
                // A stuck engine call cannot be interrupted; leave its thread behind
                cancelled.store(true, Ordering::Relaxed);
                warn!(
                    "Batch timed out after {:?}, detaching {} workers",
                    waited,
                    workers.len()
                );
                Err(BatchError::Timeout { waited })
            }
            Err(e) => {
                cancelled.store(true, Ordering::Relaxed);
                join_workers(workers);
                error!("Batch aborted: {}", e);
                Err(e)
            }
        }
    }

    fn collect(
        &self,
        results: &Receiver<JobOutcome>,
        total: usize,
    ) -> Result<Vec<ExtractionResult>, BatchError> {
        let mut collected = Vec::with_capacity(total);

        while collected.len() < total {
            let outcome = match self.config.timeout {
                Some(timeout) => results.recv_timeout(timeout).map_err(|e| match e {
                    RecvTimeoutError::Timeout => BatchError::Timeout { waited: timeout },
                    RecvTimeoutError::Disconnected => BatchError::ChannelClosed,
                })?,
                None => results.recv().map_err(|_| BatchError::ChannelClosed)?,
            };
            collected.push(outcome?);
        }

        Ok(collected)
    }
}

/// Runs a batch with the default pool settings.
pub fn extract_batch(
    extractor: &OcrExtractor,
    images: Vec<ImageRecord>,
) -> Result<Vec<ExtractionResult>, BatchError> {
    BatchExtractor::new(extractor.clone()).extract_batch(images)
}

fn run_worker(
    worker_id: usize,
    extractor: OcrExtractor,
    job_receiver: Receiver<ImageRecord>,
    result_sender: Sender<JobOutcome>,
    cancelled: Arc<AtomicBool>,
) {
    debug!("Worker {} started", worker_id);

    for record in job_receiver.iter() {
        if cancelled.load(Ordering::Relaxed) {
            debug!("Worker {} received cancel signal", worker_id);
            break;
        }

        debug!("Worker {} extracting {}", worker_id, record.name);

        let extracted = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(&record.raw_bytes)))
            .unwrap_or_else(|payload| {
                error!("Worker {} panicked on {}", worker_id, record.name);
                Err(OcrError::Engine(format!(
                    "OCR engine panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        let outcome = match extracted {
            Ok(text) => Ok(ExtractionResult::from_record(record, text)),
            Err(source) => Err(BatchError::Extraction {
                name: record.name,
                source,
            }),
        };

        if result_sender.send(outcome).is_err() {
            debug!("Worker {} result channel closed", worker_id);
            break;
        }
    }

    debug!("Worker {} stopped", worker_id);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn join_workers(workers: Vec<JoinHandle<()>>) {
    for (i, worker) in workers.into_iter().enumerate() {
        if let Err(e) = worker.join() {
            error!("Worker {} panicked: {:?}", i, e);
        }
    }
}
