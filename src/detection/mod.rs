// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 检测数据 (Detection Data)
///
/// 外部检测+跟踪模型的输出格式
/// - Detection:       单个跟踪框
/// - FrameDetections: 单帧的全部检测结果
pub mod types;

pub use types::{Detection, FrameDetections, TrackId, TrackPoint};
