//! Geometric gesture predicates over one hand.
//!
//! All comparisons are strict and use raw normalized coordinates in whatever
//! orientation the detector produced. Equal coordinates never count as "up".

use super::landmarks::{
    HandLandmarkSet, FINGER_TIPS, INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_MCP, THUMB_TIP,
};

const CURLED_FOR_POINTING: [usize; 3] = [MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// 四指指尖均高于各自掌指关节
pub fn all_fingers_open(hand: &HandLandmarkSet) -> bool {
    FINGER_TIPS.iter().all(|&tip| hand.finger_up(tip))
}

/// Index and middle up. Ring and pinky are not inspected.
pub fn victory_sign(hand: &HandLandmarkSet) -> bool {
    hand.finger_up(INDEX_TIP) && hand.finger_up(MIDDLE_TIP)
}

pub fn index_finger_up(hand: &HandLandmarkSet) -> bool {
    hand.finger_up(INDEX_TIP) && CURLED_FOR_POINTING.iter().all(|&tip| hand.finger_down(tip))
}

pub fn thumb_left(hand: &HandLandmarkSet) -> bool {
    hand.point(THUMB_TIP).x < hand.point(THUMB_MCP).x
}

pub fn pinky_up(hand: &HandLandmarkSet) -> bool {
    hand.finger_up(PINKY_TIP)
}
