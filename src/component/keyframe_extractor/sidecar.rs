//! 擷取結果的 JSON 附屬檔
//!
//! 每次執行寫出一次 `keyframes_info.json`，描述來源、策略、有效閾值
//! 與最終的幀列表，供後續流程（或人工檢視）使用。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::frame_extractor::FrameResult;
use super::strategy::Strategy;
use crate::tools::{VideoInfo, format_timestamp};

/// 附屬檔名稱
pub const REPORT_FILE_NAME: &str = "keyframes_info.json";

/// 報告中的單幀紀錄
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub timestamp_seconds: f64,
    pub timestamp_formatted: String,
    pub path: String,
}

/// 報告用的影片描述欄位
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: f64,
}

/// 單次執行的完整報告
#[derive(Debug, Serialize)]
pub struct KeyframeReport {
    pub source_video: String,
    pub duration_seconds: f64,
    pub extraction_strategy: String,
    /// interval 策略沒有場景閾值，輸出 null
    pub scene_threshold: Option<f64>,
    pub frame_count: usize,
    pub video_metadata: VideoMetadata,
    pub frames: Vec<FrameRecord>,
}

impl KeyframeReport {
    /// 以擷取結果建立報告；失敗的幀不列入
    #[must_use]
    pub fn new(
        source: &Path,
        info: &VideoInfo,
        strategy: Strategy,
        scene_threshold: Option<f64>,
        results: &[FrameResult],
    ) -> Self {
        let frames: Vec<FrameRecord> = results
            .iter()
            .filter(|r| r.success)
            .map(|r| FrameRecord {
                index: r.index,
                timestamp_seconds: r.timestamp,
                timestamp_formatted: format_timestamp(r.timestamp),
                path: r.output_path.to_string_lossy().to_string(),
            })
            .collect();

        Self {
            source_video: source.to_string_lossy().to_string(),
            duration_seconds: info.duration_seconds,
            extraction_strategy: strategy.to_string(),
            scene_threshold,
            frame_count: frames.len(),
            video_metadata: VideoMetadata {
                codec: info.codec.clone(),
                width: info.width,
                height: info.height,
                frame_rate: info.frame_rate,
            },
            frames,
        }
    }
}

/// 將報告寫入輸出資料夾（單次寫入，不做增量更新）
pub fn write_report(output_dir: &Path, report: &KeyframeReport) -> Result<PathBuf> {
    let path = output_dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json).with_context(|| format!("無法寫入報告: {}", path.display()))?;
    Ok(path)
}
