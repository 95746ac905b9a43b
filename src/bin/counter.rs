// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! People Counter - 越线人数统计
//! 读取外部检测+跟踪模型的逐帧输出 (JSON Lines), 统计穿越计数线的进入/离开人数
//!
//! 主程序入口 - 直接运行: cargo run --bin people-counter -- --input detections.jsonl

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{after, never};
use people_counter::input::spawn_reader;
use people_counter::{CounterConfig, CountingSession, LineStrategy};
use tracing::{info, warn};

/// 越线计数程序
#[derive(Parser, Debug)]
#[command(author, version, about = "越线人数统计 (People line-crossing counter)", long_about = None)]
struct Args {
    /// 检测结果文件 (JSON Lines, 每行一帧)
    #[arg(short, long)]
    input: PathBuf,

    /// 配置文件路径 (不存在时自动创建)
    #[arg(short, long, default_value = "counter_config.json")]
    config: PathBuf,

    /// 结果保存目录 (不指定则不保存)
    #[arg(short, long)]
    summary_dir: Option<PathBuf>,

    /// 运行时长(秒), 到时后停止计数
    #[arg(short, long)]
    duration: Option<u64>,

    /// 覆盖配置: 固定计数线位置 (像素)
    #[arg(long)]
    line_y: Option<i32>,

    /// 覆盖配置: 轨迹窗口长度
    #[arg(long)]
    window: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "people_counter=info".into()),
        )
        .init();

    let args = Args::parse();

    // 加载配置 + 命令行覆盖
    let mut config = CounterConfig::load(&args.config);
    if let Some(y) = args.line_y {
        config.line = LineStrategy::Fixed { y };
    }
    if let Some(window) = args.window {
        config.history_window = window;
    }
    config.validate().context("invalid counter configuration")?;
    config.print_summary();

    println!("📹 输入: {}", args.input.display());
    if let Some(secs) = args.duration {
        println!("⏱️  运行时长: {}s", secs);
    }
    println!();

    // 读取线程 → 计数线程
    let (frames, reader) = spawn_reader(&args.input, config.channel_capacity)?;

    let mut session = CountingSession::new(config);
    let summary = match args.duration {
        Some(secs) => session.run(&frames, &after(Duration::from_secs(secs))),
        None => session.run(&frames, &never::<()>()),
    };

    // 停止后关闭队列, 读取线程随之退出
    drop(frames);
    match reader.join() {
        Ok(sent) => info!("✅ 读取线程退出, 已发送 {} 帧", sent),
        Err(_) => warn!("❌ 读取线程异常退出"),
    }

    summary.print();

    if let Some(dir) = &args.summary_dir {
        let path = summary.save(dir).context("failed to save summary")?;
        println!("📁 结果文件: {}", path.display());
    }

    Ok(())
}
