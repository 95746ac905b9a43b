// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 检测结果读取器 (JSON Lines, 每行一帧)
//! 职责: 读取跟踪器输出 → 解码 FrameDetections → 发送到计数线程

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver};
use tracing::{info, warn};

use crate::detection::FrameDetections;

/// JSON Lines 检测读取器
pub struct DetectionReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl DetectionReader<BufReader<File>> {
    /// 打开检测结果文件
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("open detection file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> DetectionReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for DetectionReader<R> {
    type Item = Result<FrameDetections>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(
                        Err::<FrameDetections, _>(e)
                            .with_context(|| format!("read line {}", self.line_no)),
                    )
                }
            };
            // 跳过空行
            if line.trim().is_empty() {
                continue;
            }
            let line_no = self.line_no;
            return Some(
                serde_json::from_str(&line)
                    .with_context(|| format!("malformed frame at line {}", line_no)),
            );
        }
    }
}

/// 启动读取线程, 通过有界队列发送帧
///
/// 格式错误的行记录警告并跳过; 文件读完后队列关闭
pub fn spawn_reader(
    path: impl Into<PathBuf>,
    capacity: usize,
) -> Result<(Receiver<FrameDetections>, JoinHandle<u64>)> {
    let path = path.into();
    let reader = DetectionReader::open(&path)?;
    let (tx, rx) = bounded::<FrameDetections>(capacity);

    let handle = thread::Builder::new()
        .name("detection-reader".into())
        .spawn(move || {
            info!("🎬 开始读取检测结果: {}", path.display());
            let mut sent = 0u64;
            for frame in reader {
                match frame {
                    Ok(frame) => {
                        // 接收端已关闭 (会话停止)
                        if tx.send(frame).is_err() {
                            break;
                        }
                        sent += 1;
                    }
                    Err(e) => warn!("⚠️  跳过无效帧: {:#}", e),
                }
            }
            info!("📭 检测结果读取完毕, 共 {} 帧", sent);
            sent
        })
        .context("spawn reader thread")?;

    Ok((rx, handle))
}
