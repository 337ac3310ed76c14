//! 場景變換訊號整理
//!
//! 將外部偵測器輸出的 (時間點, 分數) 串流整理成乾淨的時間點集合。
//! 偵測器可能已經在上游套用過閾值，這裡仍然防禦性地重新過濾。

use super::sampling::{round2, subsample_evenly};
use crate::tools::SceneChange;

/// 場景時間點數量上限的預設值
pub const DEFAULT_MAX_SCENE_FRAMES: usize = 40;

/// 離片頭片尾的保留邊界（秒），避開黑幀與淡入淡出
const BOUNDARY_MARGIN: f64 = 0.1;

/// 依影片長度調整有效閾值
///
/// 超過五分鐘的影片降低敏感度，避免細微變化灌爆取樣點。
#[must_use]
pub fn effective_threshold(duration: f64, threshold: f64) -> f64 {
    if duration > 300.0 {
        threshold.max(0.35)
    } else {
        threshold
    }
}

/// 整理偵測器訊號為遞增、去重、有上限的時間點集合
///
/// 輸入順序不限；分數未超過有效閾值或太靠近頭尾的點會被丟棄。
/// 長片（> 300 秒）強制以 [`DEFAULT_MAX_SCENE_FRAMES`] 為上限。
#[must_use]
pub fn filter_scene_changes(
    changes: &[SceneChange],
    duration: f64,
    threshold: f64,
    max_frames: usize,
) -> Vec<f64> {
    let threshold = effective_threshold(duration, threshold);

    let mut timestamps: Vec<f64> = changes
        .iter()
        .filter(|change| change.score > threshold)
        .map(|change| change.timestamp)
        .filter(|&t| t > BOUNDARY_MARGIN && t < duration - BOUNDARY_MARGIN)
        .map(round2)
        .collect();

    timestamps.sort_by(f64::total_cmp);
    timestamps.dedup_by(|a, b| (*a - *b).abs() < 0.001);

    let max_frames = if duration > 300.0 {
        DEFAULT_MAX_SCENE_FRAMES
    } else {
        max_frames
    };

    subsample_evenly(timestamps, max_frames)
}
