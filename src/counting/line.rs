// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 计数线位置策略
//! Counting line placement, resolved once from the first frame

use serde::{Deserialize, Serialize};

/// 计数线位置策略 (水平线, 只使用 y 坐标)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LineStrategy {
    /// 画面垂直中点: floor(height / 2)
    #[default]
    HalfHeight,
    /// 按高度比例: floor(height * value), value ∈ [0, 1]
    Ratio { value: f32 },
    /// 固定像素位置
    Fixed { y: i32 },
}

impl LineStrategy {
    /// 根据帧高度计算计数线 y 坐标
    pub fn resolve(&self, frame_height: u32) -> i32 {
        match *self {
            Self::HalfHeight => (frame_height / 2) as i32,
            Self::Ratio { value } => (frame_height as f32 * value).floor() as i32,
            Self::Fixed { y } => y,
        }
    }
}

impl std::fmt::Display for LineStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfHeight => write!(f, "画面中线"),
            Self::Ratio { value } => write!(f, "高度比例 {:.2}", value),
            Self::Fixed { y } => write!(f, "固定 y={}", y),
        }
    }
}
