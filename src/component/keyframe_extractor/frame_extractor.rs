//! 關鍵幀擷取
//!
//! 每個時間點各跑一次 ffmpeg，輸出原始解析度的高品質 JPEG。
//! 單一幀失敗只記錄並跳過，不會中斷其餘幀的擷取。

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 單一幀的擷取任務
#[derive(Debug, Clone)]
pub struct FrameTask {
    pub video_path: PathBuf,
    pub timestamp: f64,
    pub output_path: PathBuf,
    /// 1 起算的幀編號，同時用於檔名與報告
    pub index: usize,
}

/// 單一幀的擷取結果
#[derive(Debug)]
pub struct FrameResult {
    pub output_path: PathBuf,
    pub timestamp: f64,
    pub index: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

/// 建立擷取任務列表（`frame_001.jpg` 起）
#[must_use]
pub fn create_frame_tasks(
    video_path: &Path,
    timestamps: &[f64],
    output_dir: &Path,
) -> Vec<FrameTask> {
    timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| FrameTask {
            video_path: video_path.to_path_buf(),
            timestamp,
            output_path: output_dir.join(format!("frame_{:03}.jpg", i + 1)),
            index: i + 1,
        })
        .collect()
}

/// 擷取單一幀（使用兩段式 seek 加速）
///
/// 兩段式 seek：
/// 1. `-ss` 在 `-i` 前：快速跳轉到最近的關鍵幀
/// 2. `-ss` 在 `-i` 後：精準解碼到目標時間點
#[must_use]
pub fn extract_frame(task: &FrameTask) -> FrameResult {
    match extract_frame_inner(task) {
        Ok(()) => FrameResult {
            output_path: task.output_path.clone(),
            timestamp: task.timestamp,
            index: task.index,
            success: true,
            error_message: None,
        },
        Err(e) => FrameResult {
            output_path: task.output_path.clone(),
            timestamp: task.timestamp,
            index: task.index,
            success: false,
            error_message: Some(e.to_string()),
        },
    }
}

fn extract_frame_inner(task: &FrameTask) -> Result<()> {
    let t0 = (task.timestamp - SEEK_MARGIN).max(0.0);
    let delta = task.timestamp - t0;

    debug!(
        "擷取幀 {}: timestamp={:.2}s, seek={t0:.3}s+{delta:.3}s",
        task.index, task.timestamp
    );

    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    if t0 > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{t0:.3}"));
    }

    args.push("-i".to_string());
    args.push(task.video_path.to_string_lossy().to_string());

    if delta > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{delta:.3}"));
    }

    args.extend([
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-sn".to_string(),
        "-dn".to_string(),
        "-threads".to_string(),
        "1".to_string(),
        "-q:v".to_string(),
        "2".to_string(),
        "-y".to_string(),
        task.output_path.to_string_lossy().to_string(),
    ]);

    let output = Command::new("ffmpeg")
        .args(&args)
        .output()
        .with_context(|| format!("無法執行 ffmpeg 擷取幀: {}", task.video_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg 擷取幀失敗: {}", stderr.trim());
    }

    if !task.output_path.exists() {
        anyhow::bail!("幀檔案未建立: {}", task.output_path.display());
    }

    Ok(())
}

/// 平行擷取所有幀
///
/// 每個 ffmpeg 程序限制單執行緒以避免 CPU 過度訂閱；
/// 收到中斷訊號後，尚未開始的任務直接標記失敗。
pub fn extract_frames_parallel(
    tasks: Vec<FrameTask>,
    shutdown_signal: &Arc<AtomicBool>,
) -> Vec<FrameResult> {
    let progress_bar = ProgressBar::new(tasks.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    progress_bar.set_message("擷取幀中...");

    let mut results: Vec<FrameResult> = tasks
        .par_iter()
        .map(|task| {
            if shutdown_signal.load(Ordering::SeqCst) {
                return FrameResult {
                    output_path: task.output_path.clone(),
                    timestamp: task.timestamp,
                    index: task.index,
                    success: false,
                    error_message: Some("操作已取消".to_string()),
                };
            }

            let result = extract_frame(task);
            progress_bar.inc(1);

            if let Some(msg) = result.error_message.as_ref().filter(|_| !result.success) {
                error!("幀擷取失敗 [{:.2}s]: {msg}", task.timestamp);
            }

            result
        })
        .collect();

    progress_bar.finish_and_clear();

    results.sort_by_key(|r| r.index);
    results
}
