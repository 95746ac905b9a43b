// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod counter_config; // 计数器配置参数
pub mod counting; // 越线计数
pub mod detection; // 检测数据结构
pub mod input; // 检测输入系统
pub mod pipeline; // 计数会话
pub mod report; // 结果汇总

pub use crate::counter_config::CounterConfig;
pub use crate::counting::{
    CountSnapshot, CrossingCounter, CrossingEvent, Direction, LineStrategy,
};
pub use crate::detection::{Detection, FrameDetections, TrackId, TrackPoint};
pub use crate::pipeline::{CountingSession, FrameReport};
pub use crate::report::SessionSummary;

/// 生成本地时间字符串 (用于输出文件名)
pub fn gen_time_string(delimiter: &str) -> String {
    let t_now = chrono::Local::now();
    let fmt = format!(
        "%Y{}%m{}%d{}%H{}%M{}%S{}%3f",
        delimiter, delimiter, delimiter, delimiter, delimiter, delimiter
    );
    t_now.format(&fmt).to_string()
}
