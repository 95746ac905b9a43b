// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 计数会话 (Counting Session)
//! 职责: 接收 FrameDetections → 过滤检测 → 越线计数 → 生成 FrameReport

use std::time::Instant;

use crossbeam_channel::{select, Receiver};
use serde::Serialize;
use tracing::{debug, info};

use crate::counter_config::CounterConfig;
use crate::counting::{CrossingCounter, CrossingEvent};
use crate::detection::{Detection, FrameDetections};
use crate::report::SessionSummary;

/// 单帧处理结果 (计数会话 → 显示/日志模块)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub line_y: i32,
    pub entries: u64,
    pub exits: u64,
    pub occupancy: i64,
    /// 本帧触发的越线事件
    pub events: Vec<CrossingEvent>,
    /// 当前保留轨迹的目标数
    pub active_tracks: usize,
}

/// 计数会话, 每个视频流一个, 独占一个计数器
pub struct CountingSession {
    config: CounterConfig,
    counter: CrossingCounter,

    // 统计
    frames: u64,
    rejected: u64,
    filtered: u64,
    events: Vec<CrossingEvent>,
}

impl CountingSession {
    pub fn new(config: CounterConfig) -> Self {
        let counter = CrossingCounter::new(config.history_window);
        Self {
            config,
            counter,
            frames: 0,
            rejected: 0,
            filtered: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn counter(&self) -> &CrossingCounter {
        &self.counter
    }

    /// 处理单帧检测结果
    pub fn process_frame(&mut self, frame: &FrameDetections) -> FrameReport {
        // 1. 第一帧确定计数线, 之后保持不变
        let line_y = match self.counter.line() {
            Some(y) => y,
            None => {
                let y = self
                    .counter
                    .establish_line(self.config.line.resolve(frame.height));
                info!(
                    "📏 计数线: y={} ({}, 帧 {}x{})",
                    y, self.config.line, frame.width, frame.height
                );
                y
            }
        };

        // 2. 推进帧时钟
        self.counter.set_frame(frame.index);
        self.frames += 1;

        // 3. 逐个检测更新轨迹
        let mut events = Vec::new();
        for det in &frame.detections {
            let Some(track_id) = det.track_id else {
                self.rejected += 1;
                continue;
            };
            if !self.accepts(det) {
                self.filtered += 1;
                continue;
            }
            if let Some(event) = self.counter.observe(track_id, det.anchor()) {
                events.push(event);
            }
        }

        // 4. 清理长时间未出现的目标轨迹
        if let Some(ttl) = self.config.history_ttl_frames {
            self.counter.prune_idle(frame.index, ttl);
        }

        self.events.extend(events.iter().cloned());
        let snapshot = self.counter.snapshot();
        FrameReport {
            frame: frame.index,
            line_y,
            entries: snapshot.entries,
            exits: snapshot.exits,
            occupancy: snapshot.occupancy,
            events,
            active_tracks: self.counter.track_count(),
        }
    }

    /// 置信度与类别过滤
    fn accepts(&self, det: &Detection) -> bool {
        if det.confidence < self.config.min_confidence {
            return false;
        }
        match (self.config.class_filter, det.class_id) {
            (Some(wanted), Some(class_id)) => wanted == class_id,
            _ => true,
        }
    }

    /// 帧循环: 按到达顺序处理, 直到输入结束或收到停止信号
    ///
    /// 停止信号只在帧与帧之间检查, 不会中断正在处理的帧
    pub fn run<T>(
        &mut self,
        frames: &Receiver<FrameDetections>,
        stop: &Receiver<T>,
    ) -> SessionSummary {
        info!("🔍 计数模块启动");
        let start = Instant::now();

        loop {
            select! {
                recv(stop) -> _ => {
                    info!("⏹️  收到停止信号");
                    break;
                }
                recv(frames) -> msg => {
                    match msg {
                        Ok(frame) => {
                            let report = self.process_frame(&frame);
                            debug!(
                                frame = report.frame,
                                entries = report.entries,
                                exits = report.exits,
                                active_tracks = report.active_tracks,
                                "frame processed"
                            );
                        }
                        Err(_) => {
                            info!("📭 输入结束");
                            break;
                        }
                    }
                }
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            info!(
                "⏱️  处理 {} 帧, 耗时 {:.2}s ({:.1} FPS)",
                self.frames,
                elapsed,
                self.frames as f64 / elapsed
            );
        }
        self.summary()
    }

    /// 当前会话汇总
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames: self.frames,
            entries: self.counter.entries(),
            exits: self.counter.exits(),
            occupancy: self.counter.occupancy(),
            counted_tracks: self.counter.counted_len(),
            rejected: self.rejected,
            filtered: self.filtered,
            line_y: self.counter.line(),
            events: self.events.clone(),
        }
    }
}
