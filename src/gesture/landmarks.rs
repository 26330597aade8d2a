use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

/// Offset from a fingertip back to its MCP joint (index..pinky only).
pub const TIP_TO_MCP: usize = 3;

pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// 单个关键点，归一化图像坐标，原点左上角，y 向下增长
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkSetError {
    #[error("expected 21 landmarks, got {0}")]
    WrongLength(usize),
}

/// Exactly 21 landmarks in detector order. Indices carry anatomical meaning,
/// so the set is never reordered or edited after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarkSet([Landmark; LANDMARK_COUNT]);

impl HandLandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }

    /// # Panics
    ///
    /// Panics if `index >= LANDMARK_COUNT`; use [`HandLandmarkSet::get`] for
    /// untrusted indices.
    pub fn point(&self, index: usize) -> Landmark {
        self.0[index]
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.0.get(index).copied()
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    /// Fingertip strictly above its MCP joint (smaller y).
    /// Always false for anything but `INDEX_TIP`..`PINKY_TIP`.
    pub fn finger_up(&self, tip: usize) -> bool {
        self.tip_and_mcp(tip).is_some_and(|(tip, mcp)| tip.y < mcp.y)
    }

    /// Fingertip strictly below its MCP joint (larger y).
    /// Always false for anything but `INDEX_TIP`..`PINKY_TIP`.
    pub fn finger_down(&self, tip: usize) -> bool {
        self.tip_and_mcp(tip).is_some_and(|(tip, mcp)| tip.y > mcp.y)
    }

    fn tip_and_mcp(&self, tip: usize) -> Option<(Landmark, Landmark)> {
        if !FINGER_TIPS.contains(&tip) {
            return None;
        }
        Some((self.0[tip], self.0[tip - TIP_TO_MCP]))
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarkSet {
    type Error = LandmarkSetError;

    fn try_from(value: Vec<Landmark>) -> Result<Self, Self::Error> {
        let len = value.len();
        let points: [Landmark; LANDMARK_COUNT] = value
            .try_into()
            .map_err(|_| LandmarkSetError::WrongLength(len))?;
        Ok(Self(points))
    }
}

impl From<HandLandmarkSet> for Vec<Landmark> {
    fn from(value: HandLandmarkSet) -> Self {
        value.0.to_vec()
    }
}

/// 左右手标签，由检测器给出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(alias = "left", alias = "LEFT")]
    Left,
    #[serde(alias = "right", alias = "RIGHT")]
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }

    pub fn as_lowercase(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            other => Err(format!("unknown handedness '{other}'")),
        }
    }
}

/// One hand as reported by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    pub handedness: Handedness,
    pub landmarks: HandLandmarkSet,
}

impl DetectedHand {
    pub fn new(landmarks: HandLandmarkSet, handedness: Handedness) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }
}
