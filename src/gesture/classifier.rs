use serde::{Deserialize, Serialize};

use super::landmarks::{DetectedHand, HandLandmarkSet, Handedness};
use super::rules;

/// 目标手的五项手势判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureResult {
    pub handedness: Handedness,
    pub all_fingers_open: bool,
    pub victory_sign: bool,
    pub index_finger_up: bool,
    pub thumb_left: bool,
    pub pinky_up: bool,
}

impl GestureResult {
    /// Evaluates every predicate; none short-circuits another.
    pub fn evaluate(hand: &HandLandmarkSet, handedness: Handedness) -> Self {
        Self {
            handedness,
            all_fingers_open: rules::all_fingers_open(hand),
            victory_sign: rules::victory_sign(hand),
            index_finger_up: rules::index_finger_up(hand),
            thumb_left: rules::thumb_left(hand),
            pinky_up: rules::pinky_up(hand),
        }
    }
}

/// Expected per-frame outcomes, returned as values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("no hand detected")]
    NoHandDetected,
    #[error("{} hand not detected", .target.as_lowercase())]
    HandednessMismatch { target: Handedness },
}

/// Flat wire record: either the five flags or a single `error` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GestureOutcome {
    Detected(GestureResult),
    Failed { error: String },
}

impl GestureOutcome {
    pub fn is_detected(&self) -> bool {
        matches!(self, GestureOutcome::Detected(_))
    }
}

impl From<Result<GestureResult, ClassificationError>> for GestureOutcome {
    fn from(value: Result<GestureResult, ClassificationError>) -> Self {
        match value {
            Ok(result) => GestureOutcome::Detected(result),
            Err(e) => GestureOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureClassifier {
    target: Handedness,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(Handedness::Right)
    }
}

impl GestureClassifier {
    pub fn new(target: Handedness) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Handedness {
        self.target
    }

    /// Picks the first hand carrying the target label, in detector order, and
    /// evaluates it. Later hands with the same label are ignored.
    pub fn classify(&self, hands: &[DetectedHand]) -> Result<GestureResult, ClassificationError> {
        if hands.is_empty() {
            return Err(ClassificationError::NoHandDetected);
        }

        hands
            .iter()
            .find(|hand| hand.handedness == self.target)
            .map(|hand| GestureResult::evaluate(&hand.landmarks, hand.handedness))
            .ok_or(ClassificationError::HandednessMismatch {
                target: self.target,
            })
    }
}
