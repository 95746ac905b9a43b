// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 计数流水线 (Counting Pipeline)
///
/// 双线程架构,通过有界队列通信:
/// - Reader:  检测结果读取 (独立线程, 见 input 模块)
/// - Session: 越线计数 (帧循环线程, 独占计数器状态)
pub mod session;

pub use session::{CountingSession, FrameReport};
