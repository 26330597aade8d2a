//! Hand landmark detection capability.
//!
//! The landmark model is external. Implementations of [`HandDetector`] are
//! blocking and only ever run on a [`DetectorPool`] worker.

pub mod mock;
pub mod pool;
pub mod remote;

use std::sync::Arc;

use crate::config::DetectorConfig;
use crate::frame::Frame;
use crate::gesture::DetectedHand;

pub use mock::MockDetector;
pub use pool::DetectorPool;
pub use remote::RemoteDetector;

pub trait HandDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns every hand found in the frame, in detector order. An empty
    /// list means no hand was found.
    fn detect(&self, frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectorError {
    #[error("detector request timed out")]
    Timeout,
    #[error("detector network error: {0}")]
    Network(String),
    #[error("detector api error: status={status}, message={message}")]
    Api { status: u16, message: String },
    #[error("detector returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("detector unavailable")]
    Unavailable,
}

/// Validate detector configuration at startup.
/// Panics on combinations that cannot serve any frame.
pub fn validate_config(config: &DetectorConfig) {
    if config.workers == 0 {
        panic!("Invalid detector configuration: DETECTOR_WORKERS must be at least 1.");
    }
    if !config.mock && config.url.trim().is_empty() {
        panic!(
            "Invalid detector configuration: DETECTOR_MOCK=false requires DETECTOR_URL. \
             Set DETECTOR_URL or DETECTOR_MOCK=true."
        );
    }
}

/// Must be called from within a tokio runtime when the remote detector is
/// selected, since it captures the current runtime handle.
pub fn build_detector(config: &DetectorConfig) -> Arc<dyn HandDetector> {
    if config.mock {
        tracing::warn!("Using mock hand detector; every frame yields a canned right hand");
        Arc::new(MockDetector::new())
    } else {
        tracing::info!(url = %config.url, "Using remote hand detector");
        Arc::new(RemoteDetector::new(config))
    }
}
