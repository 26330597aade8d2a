use std::time::Duration;

use serde::Deserialize;
use tokio::runtime::Handle;

use crate::config::DetectorConfig;
use crate::frame::Frame;
use crate::gesture::DetectedHand;

use super::{DetectorError, HandDetector};

/// Landmark service reached over HTTP.
///
/// The frame bytes are posted as-is with the frame's mime type; the service
/// answers `{"hands":[{"handedness":"Right","landmarks":[{"x":..,"y":..}, ...]}]}`.
#[derive(Debug, Clone)]
pub struct RemoteDetector {
    config: DetectorConfig,
    client: reqwest::Client,
    runtime: Handle,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    hands: Vec<DetectedHand>,
}

impl RemoteDetector {
    /// Captures the current tokio runtime; `detect` blocks on it from a
    /// worker thread.
    pub fn new(config: &DetectorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
            runtime: Handle::current(),
        }
    }

    async fn request(&self, frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        let response = self
            .client
            .post(&self.config.url)
            .query(&[
                ("maxHands", self.config.max_hands.to_string()),
                ("minDetectionConfidence", self.config.min_confidence.to_string()),
                ("flip", self.config.flip_horizontal.to_string()),
            ])
            .header(reqwest::header::CONTENT_TYPE, frame.format().mime())
            .body(frame.bytes().to_vec())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DetectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        let parsed: DetectResponse = serde_json::from_slice(&body)
            .map_err(|e| DetectorError::InvalidResponse(e.to_string()))?;

        // maxHands 只是给服务端的提示，返回的手全部交给分类器
        Ok(parsed.hands)
    }
}

fn map_transport_error(e: reqwest::Error) -> DetectorError {
    if e.is_timeout() {
        DetectorError::Timeout
    } else {
        DetectorError::Network(e.to_string())
    }
}

impl HandDetector for RemoteDetector {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn detect(&self, frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        self.runtime.block_on(self.request(frame))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    use super::*;
    use crate::detector::DetectorPool;
    use crate::gesture::{GestureClassifier, GestureOutcome, Handedness};
    use crate::pipeline::FramePipeline;

    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/detect")
    }

    fn hand_json(handedness: &str) -> serde_json::Value {
        let points: Vec<_> = (0..21)
            .map(|_| serde_json::json!({ "x": 0.5, "y": 0.5, "z": 0.0 }))
            .collect();
        serde_json::json!({ "handedness": handedness, "landmarks": points })
    }

    fn test_frame() -> Frame {
        Frame::from_data_url(&STANDARD.encode([0xFF_u8, 0xD8, 0xFF, 0xDB]), 64).unwrap()
    }

    fn remote_config(url: String, max_hands: usize) -> DetectorConfig {
        DetectorConfig {
            mock: false,
            url,
            timeout_secs: 2,
            max_hands,
            ..DetectorConfig::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn parses_hands_and_forwards_options() {
        let app = Router::new().route(
            "/detect",
            post(
                |Query(params): Query<std::collections::HashMap<String, String>>| async move {
                    assert_eq!(params.get("flip").map(String::as_str), Some("true"));
                    assert_eq!(params.get("maxHands").map(String::as_str), Some("1"));
                    Json(serde_json::json!({ "hands": [hand_json("Left"), hand_json("Right")] }))
                },
            ),
        );
        let url = spawn_service(app).await;

        let detector = Arc::new(RemoteDetector::new(&remote_config(url, 1)));
        let pool = DetectorPool::new(detector, 1);
        let hands = pool.detect(test_frame()).await.unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].handedness, Handedness::Left);
        assert_eq!(hands[1].handedness, Handedness::Right);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn right_hand_after_left_is_classified() {
        let app = Router::new().route(
            "/detect",
            post(|| async {
                Json(serde_json::json!({ "hands": [hand_json("Left"), hand_json("Right")] }))
            }),
        );
        let url = spawn_service(app).await;

        let detector = Arc::new(RemoteDetector::new(&remote_config(url, 1)));
        let pipeline = FramePipeline::new(
            GestureClassifier::default(),
            DetectorPool::new(detector, 1),
            1024,
        );
        let jpeg = format!("data:image/jpeg;base64,{}", STANDARD.encode([0xFF_u8, 0xD8, 0xFF, 0xDB]));
        match pipeline.process(&jpeg).await.unwrap() {
            GestureOutcome::Detected(result) => assert_eq!(result.handedness, Handedness::Right),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn maps_error_status_and_bad_payload() {
        let app = Router::new()
            .route(
                "/detect",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
            )
            .route(
                "/short",
                post(|| async {
                    Json(serde_json::json!({ "hands": [{ "handedness": "Right", "landmarks": [] }] }))
                }),
            );
        let url = spawn_service(app).await;

        let detector = Arc::new(RemoteDetector::new(&remote_config(url.clone(), 2)));
        let pool = DetectorPool::new(detector, 1);
        let err = pool.detect(test_frame()).await.unwrap_err();
        assert_eq!(
            err,
            DetectorError::Api {
                status: 503,
                message: "model loading".to_string()
            }
        );

        let short_url = url.replace("/detect", "/short");
        let detector = Arc::new(RemoteDetector::new(&remote_config(short_url, 2)));
        let pool = DetectorPool::new(detector, 1);
        let err = pool.detect(test_frame()).await.unwrap_err();
        assert!(matches!(err, DetectorError::InvalidResponse(msg) if msg.contains("expected 21")));
    }
}
