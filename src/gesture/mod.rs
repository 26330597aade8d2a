//! 手势分类核心
//!
//! 纯函数模块：输入单帧检测到的手部关键点，输出五个布尔手势判定。
//!
//! ## 模块
//! - `landmarks`: 21 点手部关键点集合与左右手标签
//! - `rules`: 基于关键点坐标的几何判定
//! - `classifier`: 目标手选择与结果组装

pub mod classifier;
pub mod landmarks;
pub mod rules;

pub use classifier::{ClassificationError, GestureClassifier, GestureOutcome, GestureResult};
pub use landmarks::{DetectedHand, HandLandmarkSet, Handedness, Landmark, LandmarkSetError};
