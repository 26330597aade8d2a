use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::frame::Frame;
use crate::gesture::DetectedHand;

use super::{DetectorError, HandDetector};

/// Runs blocking detections off the async runtime, at most `workers` at once.
#[derive(Clone)]
pub struct DetectorPool {
    detector: Arc<dyn HandDetector>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl DetectorPool {
    pub fn new(detector: Arc<dyn HandDetector>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            detector,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn in_flight(&self) -> usize {
        self.workers - self.permits.available_permits()
    }

    pub async fn detect(&self, frame: Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DetectorError::Unavailable)?;
        let detector = self.detector.clone();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            detector.detect(&frame)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, detector = self.detector.name(), "Detector worker failed");
            DetectorError::Unavailable
        })?
    }
}
