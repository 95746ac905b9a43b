// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 越线计数系统 (Line Crossing Counting)
///
/// - LineStrategy:    计数线位置策略
/// - CrossingCounter: 轨迹记录 + 越线判定 + 去重计数
pub mod counter;
pub mod line;

pub use counter::{
    CountSnapshot, CrossingCounter, CrossingEvent, Direction, DEFAULT_HISTORY_WINDOW,
};
pub use line::LineStrategy;
