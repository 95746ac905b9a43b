// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 越线计数器
//! Line-crossing counter: per-track position history, directional crossing
//! detection, one count per track id per session.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::detection::{TrackId, TrackPoint};

/// 默认轨迹窗口长度 (每个目标保留最近30个点)
pub const DEFAULT_HISTORY_WINDOW: usize = 30;

// ========== 越线事件 ==========

/// 越线方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// 从上往下穿过计数线
    Entered,
    /// 从下往上穿过计数线
    Exited,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entered => write!(f, "entered"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// 越线事件 (每个跟踪ID整个会话内最多产生一次)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub track_id: TrackId,
    pub direction: Direction,
    /// 事件发生所在帧
    pub frame: u64,
    /// 事件发生后的累计值
    pub entries: u64,
    pub exits: u64,
}

/// 计数快照 (供叠加显示使用)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSnapshot {
    pub entries: u64,
    pub exits: u64,
    pub occupancy: i64,
}

// ========== 轨迹历史 ==========

/// 单个目标的有界轨迹
#[derive(Clone, Debug, Default)]
struct TrackHistory {
    points: VecDeque<TrackPoint>,
    /// 最后一次观测到的帧序号
    last_seen: u64,
}

// ========== 计数器 ==========

/// 越线计数器
///
/// 两阶段生命周期: 计数线未设置 → 已设置 (单向, 会话内不可重置)。
/// 计数线未设置前 `observe` 不做任何事情。
#[derive(Clone, Debug)]
pub struct CrossingCounter {
    /// 计数线 y 坐标
    line: Option<i32>,

    /// 轨迹窗口长度
    history_window: usize,

    /// 每个跟踪ID的轨迹
    histories: HashMap<TrackId, TrackHistory>,

    /// 已计数的跟踪ID
    counted: HashSet<TrackId>,

    entries: u64,
    exits: u64,

    /// 当前帧序号 (由会话推进)
    frame: u64,
}

impl Default for CrossingCounter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl CrossingCounter {
    /// 创建计数器
    ///
    /// # 参数
    /// - `history_window`: 每个目标保留的轨迹点数 (至少为2才可能触发越线)
    pub fn new(history_window: usize) -> Self {
        Self {
            line: None,
            history_window: history_window.max(1),
            histories: HashMap::new(),
            counted: HashSet::new(),
            entries: 0,
            exits: 0,
            frame: 0,
        }
    }

    /// 以帧高度的一半设置计数线, 已设置时保持不变
    pub fn set_line(&mut self, frame_height: u32) -> i32 {
        self.establish_line((frame_height / 2) as i32)
    }

    /// 设置计数线 y 坐标, 第一次调用生效, 之后的调用返回已有值
    pub fn establish_line(&mut self, y: i32) -> i32 {
        *self.line.get_or_insert_with(|| {
            debug!(line_y = y, "counting line established");
            y
        })
    }

    /// 推进帧时钟 (用于轨迹过期清理)
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// 记录一次观测并判定是否越线
    ///
    /// 返回本次触发的越线事件 (若有)
    pub fn observe(&mut self, track_id: TrackId, position: TrackPoint) -> Option<CrossingEvent> {
        let line = self.line?;

        let history = self.histories.entry(track_id).or_default();
        history.points.push_back(position);
        if history.points.len() > self.history_window {
            history.points.pop_front();
        }
        history.last_seen = self.frame;

        let len = history.points.len();
        if len < 2 {
            return None;
        }
        if self.counted.contains(&track_id) {
            return None;
        }

        let y_prev = history.points[len - 2].y;
        let y_curr = position.y;
        let line = line as f32;

        let direction = if y_prev < line && y_curr >= line {
            self.entries += 1;
            Direction::Entered
        } else if y_prev > line && y_curr <= line {
            self.exits += 1;
            Direction::Exited
        } else {
            return None;
        };
        self.counted.insert(track_id);

        let event = CrossingEvent {
            track_id,
            direction,
            frame: self.frame,
            entries: self.entries,
            exits: self.exits,
        };
        match direction {
            Direction::Entered => info!(
                track_id,
                entries = self.entries,
                "🚶 目标 {} 进入 (entered), 累计进入: {}",
                track_id,
                self.entries
            ),
            Direction::Exited => info!(
                track_id,
                exits = self.exits,
                "🚶 目标 {} 离开 (exited), 累计离开: {}",
                track_id,
                self.exits
            ),
        }
        Some(event)
    }

    /// 清理超过 `max_idle` 帧未出现的目标轨迹, 已计数集合不受影响
    ///
    /// 返回被清理的轨迹数
    pub fn prune_idle(&mut self, current_frame: u64, max_idle: u64) -> usize {
        let before = self.histories.len();
        self.histories
            .retain(|_, h| current_frame.saturating_sub(h.last_seen) <= max_idle);
        let removed = before - self.histories.len();
        if removed > 0 {
            debug!(removed, current_frame, "idle track histories pruned");
        }
        removed
    }

    pub fn line(&self) -> Option<i32> {
        self.line
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn exits(&self) -> u64 {
        self.exits
    }

    /// 当前场内人数 (进入 - 离开, 不截断为0)
    pub fn occupancy(&self) -> i64 {
        self.entries as i64 - self.exits as i64
    }

    pub fn snapshot(&self) -> CountSnapshot {
        CountSnapshot {
            entries: self.entries,
            exits: self.exits,
            occupancy: self.occupancy(),
        }
    }

    pub fn is_counted(&self, track_id: TrackId) -> bool {
        self.counted.contains(&track_id)
    }

    pub fn counted_len(&self) -> usize {
        self.counted.len()
    }

    /// 获取目标轨迹 (从旧到新)
    pub fn history(&self, track_id: TrackId) -> Option<&VecDeque<TrackPoint>> {
        self.histories.get(&track_id).map(|h| &h.points)
    }

    /// 当前保留轨迹的目标数
    pub fn track_count(&self) -> usize {
        self.histories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(y: f32) -> TrackPoint {
        TrackPoint::new(50.0, y)
    }

    fn counter_at(line: i32) -> CrossingCounter {
        let mut c = CrossingCounter::default();
        c.establish_line(line);
        c
    }

    #[test]
    fn test_set_line_first_call_wins() {
        let mut c = CrossingCounter::default();
        assert_eq!(c.line(), None);
        assert_eq!(c.set_line(201), 100);
        assert_eq!(c.set_line(1080), 100);
        assert_eq!(c.establish_line(7), 100);
        assert_eq!(c.line(), Some(100));
    }

    #[test]
    fn test_observe_before_line_is_noop() {
        let mut c = CrossingCounter::default();
        assert!(c.observe(1, pt(50.0)).is_none());
        assert!(c.observe(1, pt(150.0)).is_none());
        assert_eq!(c.track_count(), 0);
        assert!(c.history(1).is_none());

        c.set_line(200);
        // 设置计数线后第一条观测只建立轨迹
        assert!(c.observe(1, pt(150.0)).is_none());
        assert_eq!(c.history(1).unwrap().len(), 1);
    }

    #[test]
    fn test_downward_crossing_counts_entry() {
        let mut c = counter_at(100);
        assert!(c.observe(1, pt(50.0)).is_none());
        let event = c.observe(1, pt(150.0)).unwrap();

        assert_eq!(event.track_id, 1);
        assert_eq!(event.direction, Direction::Entered);
        assert_eq!(event.entries, 1);
        assert_eq!(c.entries(), 1);
        assert_eq!(c.exits(), 0);
        assert!(c.is_counted(1));
    }

    #[test]
    fn test_upward_crossing_counts_exit() {
        let mut c = counter_at(100);
        assert!(c.observe(2, pt(150.0)).is_none());
        assert_eq!(c.exits(), 0);

        let event = c.observe(2, pt(50.0)).unwrap();
        assert_eq!(event.direction, Direction::Exited);
        assert_eq!(c.exits(), 1);
        assert_eq!(c.entries(), 0);
        assert_eq!(c.occupancy(), -1);
    }

    #[test]
    fn test_track_counted_only_once() {
        let mut c = counter_at(100);
        c.observe(3, pt(150.0));
        assert!(c.observe(3, pt(50.0)).is_some());
        assert!(c.observe(3, pt(150.0)).is_none());
        assert!(c.observe(3, pt(50.0)).is_none());

        assert_eq!(c.exits(), 1);
        assert_eq!(c.entries(), 0);
        assert_eq!(c.counted_len(), 1);
    }

    #[test]
    fn test_landing_on_line_counts() {
        let mut c = counter_at(100);
        c.observe(1, pt(99.0));
        assert_eq!(c.observe(1, pt(100.0)).unwrap().direction, Direction::Entered);

        c.observe(2, pt(101.0));
        assert_eq!(c.observe(2, pt(100.0)).unwrap().direction, Direction::Exited);
    }

    #[test]
    fn test_previous_sample_on_line_fires_nothing() {
        let mut c = counter_at(100);
        c.observe(1, pt(100.0));
        assert!(c.observe(1, pt(180.0)).is_none());

        c.observe(2, pt(100.0));
        assert!(c.observe(2, pt(20.0)).is_none());
        assert_eq!(c.snapshot(), CountSnapshot::default());
    }

    #[test]
    fn test_large_jump_still_counts() {
        let mut c = counter_at(100);
        c.observe(5, pt(0.0));
        assert!(c.observe(5, pt(1000.0)).is_some());
        assert_eq!(c.entries(), 1);
    }

    #[test]
    fn test_staying_on_one_side_never_counts() {
        let mut c = counter_at(100);
        for y in [10.0, 40.0, 70.0, 99.0, 60.0] {
            assert!(c.observe(9, pt(y)).is_none());
        }
        assert!(!c.is_counted(9));
    }

    #[test]
    fn test_history_window_evicts_oldest() {
        let mut c = counter_at(10_000);
        for i in 0..31 {
            c.observe(4, pt(i as f32));
        }
        let history = c.history(4).unwrap();
        assert_eq!(history.len(), DEFAULT_HISTORY_WINDOW);
        assert_eq!(history.front().unwrap().y, 1.0);
        assert_eq!(history.back().unwrap().y, 30.0);
    }

    #[test]
    fn test_history_bounded_for_every_track() {
        let mut c = counter_at(100);
        for frame in 0..100u64 {
            c.set_frame(frame);
            for id in 0..5u32 {
                let y = ((frame * 7 + id as u64 * 13) % 200) as f32;
                c.observe(id, pt(y));
            }
        }
        for id in 0..5u32 {
            assert!(c.history(id).unwrap().len() <= DEFAULT_HISTORY_WINDOW);
        }
    }

    #[test]
    fn test_each_track_counts_at_most_once_and_totals_monotonic() {
        let mut c = counter_at(100);
        let mut per_track: HashMap<TrackId, u32> = HashMap::new();
        let (mut last_in, mut last_out) = (0, 0);

        for frame in 0..60u64 {
            for id in 0..4u32 {
                // 来回穿越计数线
                let y = if (frame + id as u64) % 2 == 0 { 50.0 } else { 150.0 };
                if let Some(event) = c.observe(id, pt(y)) {
                    *per_track.entry(event.track_id).or_default() += 1;
                }
                assert!(c.entries() >= last_in);
                assert!(c.exits() >= last_out);
                last_in = c.entries();
                last_out = c.exits();
            }
        }

        assert!(per_track.values().all(|&n| n == 1));
        assert_eq!(c.entries() + c.exits(), 4);
        assert_eq!(c.counted_len(), 4);
    }

    #[test]
    fn test_small_window() {
        let mut c = CrossingCounter::new(2);
        c.set_line(200);
        c.observe(1, pt(10.0));
        c.observe(1, pt(20.0));
        c.observe(1, pt(30.0));
        assert_eq!(c.history(1).unwrap().len(), 2);
        assert_eq!(c.history_window(), 2);
    }

    #[test]
    fn test_prune_idle_keeps_counted_set() {
        let mut c = counter_at(100);
        c.set_frame(0);
        c.observe(1, pt(50.0));
        c.set_frame(1);
        c.observe(1, pt(150.0));
        c.observe(2, pt(10.0));

        c.set_frame(10);
        c.observe(2, pt(20.0));

        assert_eq!(c.prune_idle(10, 5), 1);
        assert!(c.history(1).is_none());
        assert!(c.history(2).is_some());
        assert!(c.is_counted(1));

        // 重新出现的已计数目标不会再次计数
        c.observe(1, pt(50.0));
        c.observe(1, pt(150.0));
        assert_eq!(c.entries(), 1);
    }
}
