//! 取樣策略選擇
//!
//! 每次執行固定選用一種策略：
//! - hybrid：場景偵測 + 最低密度網格（預設）
//! - scene：純場景偵測，結果太少時以固定間隔點補足
//! - interval：純固定間隔

use std::fmt;

use clap::ValueEnum;

use super::hybrid_merger::merge_with_density_grid;
use super::interval_planner::plan_interval_timestamps;
use super::scene_filter::{DEFAULT_MAX_SCENE_FRAMES, filter_scene_changes};
use crate::tools::SceneChange;

/// 取樣策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// 場景偵測加最低密度網格，去重後取最有資訊量的組合
    Hybrid,
    /// 純場景變換偵測，適合剪接密集的素材
    Scene,
    /// 依長度固定間隔取樣，幀數可預期
    Interval,
}

impl Strategy {
    /// 此策略是否需要先執行場景偵測
    #[must_use]
    pub const fn needs_scene_detection(self) -> bool {
        !matches!(self, Self::Interval)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Scene => "scene",
            Self::Interval => "interval",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 依策略計算最終時間點序列
///
/// `scene_changes` 為外部偵測器的原始訊號；interval 策略會忽略它。
/// 偵測失敗時呼叫端傳入空訊號即可，策略內部自有備援。
#[must_use]
pub fn compute_timestamps(
    strategy: Strategy,
    duration: f64,
    scene_changes: &[SceneChange],
    threshold: f64,
) -> Vec<f64> {
    match strategy {
        Strategy::Interval => plan_interval_timestamps(duration),
        Strategy::Scene => {
            let timestamps = filter_scene_changes(
                scene_changes,
                duration,
                threshold,
                DEFAULT_MAX_SCENE_FRAMES,
            );
            if timestamps.len() < 2 {
                // 場景太少（常見於單鏡頭素材）：與固定間隔點聯集
                union_exact(&timestamps, &plan_interval_timestamps(duration))
            } else {
                timestamps
            }
        }
        Strategy::Hybrid => {
            let scene_set = filter_scene_changes(
                scene_changes,
                duration,
                threshold,
                DEFAULT_MAX_SCENE_FRAMES,
            );
            merge_with_density_grid(&scene_set, duration)
        }
    }
}

/// 聯集並以兩位小數精度去重，不做鄰近去重
fn union_exact(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut merged: Vec<f64> = a.iter().chain(b).copied().collect();
    merged.sort_by(f64::total_cmp);
    merged.dedup_by(|x, y| (*x - *y).abs() < 0.001);
    merged
}
