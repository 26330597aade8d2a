use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::Config;
use crate::detector::{DetectorError, DetectorPool, HandDetector};
use crate::frame::{Frame, FrameError};
use crate::gesture::{ClassificationError, DetectedHand, GestureClassifier, GestureOutcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Frame(_) => "INVALID_FRAME",
            PipelineError::Detector(DetectorError::Timeout) => "DETECTOR_TIMEOUT",
            PipelineError::Detector(DetectorError::Unavailable) => "DETECTOR_UNAVAILABLE",
            PipelineError::Detector(_) => "DETECTOR_ERROR",
        }
    }
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    frames_received: AtomicU64,
    frames_classified: AtomicU64,
    no_hand: AtomicU64,
    handedness_mismatch: AtomicU64,
    frame_errors: AtomicU64,
    detector_errors: AtomicU64,
    frames_dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub frames_received: u64,
    pub frames_classified: u64,
    pub no_hand: u64,
    pub handedness_mismatch: u64,
    pub frame_errors: u64,
    pub detector_errors: u64,
    pub frames_dropped: u64,
}

impl PipelineStats {
    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_classified: self.frames_classified.load(Ordering::Relaxed),
            no_hand: self.no_hand.load(Ordering::Relaxed),
            handedness_mismatch: self.handedness_mismatch.load(Ordering::Relaxed),
            frame_errors: self.frame_errors.load(Ordering::Relaxed),
            detector_errors: self.detector_errors.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// 单帧处理流程：解码 -> 检测（工作池）-> 分类
pub struct FramePipeline {
    classifier: GestureClassifier,
    pool: DetectorPool,
    max_frame_bytes: usize,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(classifier: GestureClassifier, pool: DetectorPool, max_frame_bytes: usize) -> Self {
        Self {
            classifier,
            pool,
            max_frame_bytes,
            stats: PipelineStats::default(),
        }
    }

    pub fn from_config(config: &Config, detector: Arc<dyn HandDetector>) -> Self {
        Self::new(
            GestureClassifier::new(config.target_handedness),
            DetectorPool::new(detector, config.detector.workers),
            config.limits.max_frame_bytes,
        )
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn pool(&self) -> &DetectorPool {
        &self.pool
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn record_dropped(&self) {
        PipelineStats::bump(&self.stats.frames_dropped);
    }

    /// Decodes, detects and classifies one transport-encoded frame.
    /// "No hand" and handedness mismatch come back as `GestureOutcome`s.
    pub async fn process(&self, raw: &str) -> Result<GestureOutcome, PipelineError> {
        PipelineStats::bump(&self.stats.frames_received);
        let start = Instant::now();

        let frame = Frame::from_data_url(raw, self.max_frame_bytes).map_err(|e| {
            PipelineStats::bump(&self.stats.frame_errors);
            tracing::debug!(error = %e, "Rejected frame");
            e
        })?;
        let frame_bytes = frame.len();

        let hands = self.pool.detect(frame).await.map_err(|e| {
            PipelineStats::bump(&self.stats.detector_errors);
            tracing::warn!(error = %e, detector = self.pool.detector_name(), "Hand detection failed");
            e
        })?;

        let outcome = self.classify_landmarks(&hands);
        tracing::debug!(
            frame_bytes,
            hands = hands.len(),
            detected = outcome.is_detected(),
            latency_ms = %start.elapsed().as_millis(),
            "Frame processed"
        );
        Ok(outcome)
    }

    /// Classification only, for hosts that run detection themselves.
    pub fn classify_landmarks(&self, hands: &[DetectedHand]) -> GestureOutcome {
        let result = self.classifier.classify(hands);
        match &result {
            Ok(_) => PipelineStats::bump(&self.stats.frames_classified),
            Err(ClassificationError::NoHandDetected) => PipelineStats::bump(&self.stats.no_hand),
            Err(ClassificationError::HandednessMismatch { .. }) => {
                PipelineStats::bump(&self.stats.handedness_mismatch)
            }
        }
        GestureOutcome::from(result)
    }
}
