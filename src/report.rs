// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 会话结果汇总
//! Session summary: final counts, printed and optionally saved as JSON

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::counting::CrossingEvent;
use crate::gen_time_string;

/// 会话汇总
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// 已处理帧数
    pub frames: u64,
    pub entries: u64,
    pub exits: u64,
    /// 当前场内人数 (进入 - 离开)
    pub occupancy: i64,
    /// 已计数的目标数
    pub counted_tracks: usize,
    /// 缺少跟踪ID被拒绝的检测数
    pub rejected: u64,
    /// 因置信度/类别被过滤的检测数
    pub filtered: u64,
    /// 计数线 y 坐标 (未收到任何帧时为 None)
    pub line_y: Option<i32>,
    /// 全部越线事件 (按发生顺序)
    pub events: Vec<CrossingEvent>,
}

impl SessionSummary {
    /// 打印最终结果
    pub fn print(&self) {
        println!("\n{}", "=".repeat(60));
        println!("📊 最终结果:");
        println!("🚶‍♂️ 进入人数: {}", self.entries);
        println!("🚶‍♀️ 离开人数: {}", self.exits);
        println!("👥 当前场内人数: {}", self.occupancy);
        println!(
            "🎞️  处理帧数: {} | 拒绝检测: {} | 过滤检测: {}",
            self.frames, self.rejected, self.filtered
        );
        println!("{}", "=".repeat(60));
    }

    /// 保存为 `summary_<时间戳>.json`, 返回文件路径
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

        let path = dir.join(format!("summary_{}.json", gen_time_string("")));
        let json = serde_json::to_string_pretty(self).context("serialize summary")?;
        fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;

        info!("💾 结果已保存到 {}", path.display());
        Ok(path)
    }
}
