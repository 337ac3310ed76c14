use anyhow::{Context, Result};
use console::style;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::frame_extractor::{FrameResult, create_frame_tasks, extract_frames_parallel};
use super::scene_filter::effective_threshold;
use super::sidecar::{KeyframeReport, write_report};
use super::strategy::{Strategy, compute_timestamps};
use crate::tools::{
    SceneChange, detect_scene_changes, ensure_directory_exists, ensure_ffmpeg_available,
    format_timestamp, get_video_info, validate_file_exists,
};

/// 擷取參數
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub video_path: PathBuf,
    /// 未指定時輸出到影片旁的 `.keyframes/<檔名>/`
    pub output_dir: Option<PathBuf>,
    pub strategy: Strategy,
    pub threshold: f64,
}

/// 擷取結果摘要
#[derive(Debug)]
pub struct ExtractionSummary {
    pub planned: usize,
    pub extracted: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
}

/// 關鍵幀擷取器
///
/// 五階段流程：
/// A. 取得影片資訊（ffprobe）
/// B. 場景變換偵測（scene 濾鏡，interval 策略跳過）
/// C. 依策略計算時間點
/// D. 平行擷取幀
/// E. 寫出 JSON 報告與摘要
pub struct KeyframeExtractor {
    options: ExtractionOptions,
    shutdown_signal: Arc<AtomicBool>,
}

impl KeyframeExtractor {
    #[must_use]
    pub const fn new(options: ExtractionOptions, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            options,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<ExtractionSummary> {
        let video_path = &self.options.video_path;
        validate_file_exists(video_path)?;
        ensure_ffmpeg_available()?;

        let output_dir = self
            .options
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(video_path));

        println!(
            "{} {}",
            style("🎬 處理:").cyan().bold(),
            style(
                video_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            )
            .bold()
        );

        // Stage A: 取得影片資訊
        print!("  {} 讀取影片資訊...", style("A").dim());
        let video_info = get_video_info(video_path)
            .with_context(|| format!("無法讀取影片資訊: {}", video_path.display()))?;
        let duration = video_info.duration_seconds;
        println!(
            " {} ({duration:.1}s), {}, 策略: {}",
            format_timestamp(duration),
            video_info.resolution(),
            self.options.strategy
        );

        // Stage B: 場景變換偵測（依策略）
        let scene_changes = self.detect_scenes_if_needed(duration);

        // Stage C: 計算時間點
        print!("  {} 計算取樣時間點...", style("C").dim());
        let timestamps = compute_timestamps(
            self.options.strategy,
            duration,
            &scene_changes,
            self.options.threshold,
        );
        println!(" {} 個時間點", timestamps.len());

        // Stage D: 平行擷取幀
        ensure_directory_exists(&output_dir)?;
        println!("  {} 擷取 {} 個關鍵幀...", style("D").dim(), timestamps.len());
        let tasks = create_frame_tasks(video_path, &timestamps, &output_dir);
        let results = extract_frames_parallel(tasks, &self.shutdown_signal);

        let extracted = results.iter().filter(|r| r.success).count();
        let failed = results.len() - extracted;
        if failed > 0 {
            println!(
                "  {} {failed} 個幀擷取失敗，已跳過",
                style("⚠").yellow()
            );
        }

        // Stage E: 寫出報告
        let scene_threshold = if self.options.strategy.needs_scene_detection() {
            Some(effective_threshold(duration, self.options.threshold))
        } else {
            None
        };
        let report = KeyframeReport::new(
            video_path,
            &video_info,
            self.options.strategy,
            scene_threshold,
            &results,
        );
        let report_path = write_report(&output_dir, &report)?;

        self.print_summary(&results, duration, &output_dir, &report_path);

        info!(
            "關鍵幀擷取完成 - 成功: {extracted}, 失敗: {failed}, 輸出: {}",
            output_dir.display()
        );

        Ok(ExtractionSummary {
            planned: results.len(),
            extracted,
            failed,
            output_dir,
            report_path,
        })
    }

    fn detect_scenes_if_needed(&self, duration: f64) -> Vec<SceneChange> {
        if !self.options.strategy.needs_scene_detection() {
            return Vec::new();
        }

        let threshold = effective_threshold(duration, self.options.threshold);
        print!(
            "  {} 偵測場景變換 (閾值 {threshold:.2})...",
            style("B").dim()
        );
        let scene_changes = detect_scene_changes(&self.options.video_path, duration, threshold);
        println!(" 找到 {} 個變換點", scene_changes.len());

        if scene_changes.is_empty() {
            warn!("沒有可用的場景訊號，改用備援取樣");
        }

        scene_changes
    }

    fn print_summary(
        &self,
        results: &[FrameResult],
        duration: f64,
        output_dir: &Path,
        report_path: &Path,
    ) {
        let extracted: Vec<&FrameResult> = results.iter().filter(|r| r.success).collect();

        println!();
        println!(
            "  {} 已擷取 {} 個關鍵幀到: {}",
            style("✓").green(),
            extracted.len(),
            output_dir.display()
        );
        println!("  {} 報告: {}", style("📝").dim(), report_path.display());
        println!();

        println!("  {:<4} {:<12} {:<20}", "#", "時間", "檔案");
        for frame in &extracted {
            let file_name = frame
                .output_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy();
            println!(
                "  {:<4} {:<12} {file_name:<20}",
                frame.index,
                format_timestamp(frame.timestamp)
            );
        }

        // 取樣密度統計
        if extracted.len() >= 2 {
            let gaps: Vec<f64> = extracted
                .windows(2)
                .map(|pair| pair[1].timestamp - pair[0].timestamp)
                .collect();
            let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
            let min_gap = gaps.iter().copied().fold(f64::INFINITY, f64::min);
            let max_gap = gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let coverage = extracted[extracted.len() - 1].timestamp - extracted[0].timestamp;

            println!();
            println!("  取樣密度:");
            println!("    平均間隔: {avg_gap:.1}s");
            println!("    最小間隔: {min_gap:.1}s");
            println!("    最大間隔: {max_gap:.1}s");
            if duration > 0.0 {
                println!(
                    "    覆蓋範圍: {coverage:.1}s / {duration:.1}s ({:.0}%)",
                    coverage / duration * 100.0
                );
            }
        }
    }
}

/// 預設輸出資料夾：影片旁的 `.keyframes/<檔名>/`
fn default_output_dir(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());

    video_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(".keyframes")
        .join(stem)
}
