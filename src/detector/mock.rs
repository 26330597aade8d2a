use crate::frame::Frame;
use crate::gesture::landmarks::{
    INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP,
    RING_TIP, THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::gesture::{DetectedHand, HandLandmarkSet, Handedness, Landmark};

use super::{DetectorError, HandDetector};

/// Development detector: ignores pixels and reports one open right palm with
/// the thumb pointing left.
#[derive(Debug, Clone)]
pub struct MockDetector {
    hand: DetectedHand,
}

impl MockDetector {
    pub fn new() -> Self {
        Self {
            hand: DetectedHand::new(open_right_palm(), Handedness::Right),
        }
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn detect(&self, _frame: &Frame) -> Result<Vec<DetectedHand>, DetectorError> {
        Ok(vec![self.hand.clone()])
    }
}

fn open_right_palm() -> HandLandmarkSet {
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    points[WRIST] = Landmark::new(0.50, 0.90);

    points[THUMB_CMC] = Landmark::new(0.42, 0.84);
    points[THUMB_MCP] = Landmark::new(0.36, 0.76);
    points[THUMB_IP] = Landmark::new(0.31, 0.70);
    points[THUMB_TIP] = Landmark::new(0.27, 0.65);

    // 四指：掌指关节在 y=0.60，逐节向上到指尖
    let fingers = [
        (INDEX_MCP, INDEX_TIP, 0.44),
        (MIDDLE_MCP, MIDDLE_TIP, 0.50),
        (RING_MCP, RING_TIP, 0.56),
        (PINKY_MCP, PINKY_TIP, 0.62),
    ];
    for (mcp, tip, x) in fingers {
        for (step, idx) in (mcp..=tip).enumerate() {
            points[idx] = Landmark::new(x, 0.60 - 0.08 * step as f32);
        }
    }

    HandLandmarkSet::new(points)
}
