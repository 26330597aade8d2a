use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use hand_gesture_server::detector::{DetectorError, HandDetector};
use hand_gesture_server::frame::Frame;
use hand_gesture_server::gesture::{DetectedHand, HandLandmarkSet, Handedness, Landmark};

pub const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];

/// Detector stub returning a fixed answer for every frame.
pub struct StubDetector(pub Result<Vec<DetectedHand>, DetectorError>);

impl HandDetector for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&self, _frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        self.0.clone()
    }
}

/// Detector that blocks its worker for `delay` before answering.
pub struct DelayedDetector {
    pub delay: Duration,
    pub hands: Vec<DetectedHand>,
}

impl HandDetector for DelayedDetector {
    fn name(&self) -> &'static str {
        "delayed"
    }

    fn detect(&self, _frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        std::thread::sleep(self.delay);
        Ok(self.hands.clone())
    }
}

pub fn jpeg_data_url() -> String {
    let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}

/// MCPs at y=0.6; listed tips raised to 0.3, the rest curled to 0.8.
pub fn hand_points(up: &[usize], thumb_left: bool) -> Vec<(f32, f32)> {
    let mut points = vec![(0.5_f32, 0.6_f32); 21];
    for tip in FINGER_TIPS {
        points[tip].1 = if up.contains(&tip) { 0.3 } else { 0.8 };
    }
    points[4].0 = if thumb_left { 0.3 } else { 0.7 };
    points
}

pub fn landmark_set(up: &[usize], thumb_left: bool) -> HandLandmarkSet {
    let points: Vec<Landmark> = hand_points(up, thumb_left)
        .into_iter()
        .map(|(x, y)| Landmark::new(x, y))
        .collect();
    HandLandmarkSet::try_from(points).expect("21 landmarks")
}

pub fn detected(up: &[usize], thumb_left: bool, handedness: Handedness) -> DetectedHand {
    DetectedHand::new(landmark_set(up, thumb_left), handedness)
}

pub fn hand_json(up: &[usize], thumb_left: bool, handedness: &str) -> Value {
    let landmarks: Vec<Value> = hand_points(up, thumb_left)
        .into_iter()
        .map(|(x, y)| json!({ "x": x, "y": y }))
        .collect();
    json!({ "handedness": handedness, "landmarks": landmarks })
}
