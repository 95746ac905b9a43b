// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 计数器配置 - 通过JSON文件调整参数

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::counting::{LineStrategy, DEFAULT_HISTORY_WINDOW};

/// 计数器参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    // === 计数参数 ===
    pub history_window: usize, // 每个目标保留的轨迹点数
    pub line: LineStrategy,    // 计数线位置策略

    // === 检测过滤 ===
    pub min_confidence: f32,       // 最低置信度 (低于此值的检测不参与计数)
    pub class_filter: Option<u32>, // 只统计指定类别 (COCO 0 = person), None 不过滤

    // === 资源 ===
    pub history_ttl_frames: Option<u64>, // 目标消失超过N帧后清理轨迹, None 永不清理
    pub channel_capacity: usize,         // 读取线程 → 计数线程 队列长度
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            line: LineStrategy::HalfHeight,

            min_confidence: 0.0,
            class_filter: None,

            history_ttl_frames: None,
            channel_capacity: 60,
        }
    }
}

impl CounterConfig {
    /// 从JSON文件加载配置
    ///
    /// 文件不存在时写入默认配置; 解析失败或参数非法时使用默认值
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    info!("✅ 配置已从 {} 加载", path.display());
                    config
                }
                Err(e) => {
                    warn!("⚠️  配置文件解析失败: {:#}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    warn!("❌ 保存配置失败: {:#}", e);
                }
                config
            }
        }
    }

    /// 解析并校验JSON配置
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, json).with_context(|| format!("write config {}", path.display()))?;
        info!("💾 配置已保存到 {}", path.display());
        Ok(())
    }

    /// 参数校验
    pub fn validate(&self) -> Result<()> {
        if self.history_window < 2 {
            bail!(
                "history_window must be at least 2, got {}",
                self.history_window
            );
        }
        if let LineStrategy::Ratio { value } = self.line {
            if !(0.0..=1.0).contains(&value) {
                bail!("line ratio must be within [0, 1], got {}", value);
            }
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            bail!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            );
        }
        if self.channel_capacity == 0 {
            bail!("channel_capacity must be positive");
        }
        Ok(())
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        println!("\n🎛️  当前计数器配置:");
        println!("  轨迹窗口: {}", self.history_window);
        println!("  计数线: {}", self.line);
        println!("  最低置信度: {:.2}", self.min_confidence);
        match self.class_filter {
            Some(class_id) => println!("  类别过滤: {}", class_id),
            None => println!("  类别过滤: 无"),
        }
        match self.history_ttl_frames {
            Some(ttl) => println!("  轨迹过期: {} 帧\n", ttl),
            None => println!("  轨迹过期: 永不\n"),
        }
    }
}
