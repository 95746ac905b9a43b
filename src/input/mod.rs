// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 检测输入系统 (Detection Input System)
///
/// 独立工作线程,负责读取外部跟踪器的逐帧输出
/// - DetectionReader: JSON Lines 解码 (每行一帧)
/// - spawn_reader:    读取线程 + 有界队列
pub mod reader;

pub use reader::{spawn_reader, DetectionReader};
