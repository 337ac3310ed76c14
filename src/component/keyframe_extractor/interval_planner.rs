//! 固定間隔時間點規劃
//!
//! 根據影片長度自動調整取樣密度：短片每一刻都重要，取樣相對密集；
//! 長片內容冗餘度高，可以放寬間隔。

use super::sampling::{round2, sample_grid, subsample_evenly};

/// 依影片長度規劃固定間隔的時間點
///
/// 長度區間與對應規則：
///
/// | 長度 | 間隔 | 上限 |
/// |---|---|---|
/// | <= 2s | 頭尾兩點 | 2 |
/// | 2-5s | 頭、中、尾三點 | 3 |
/// | 5-30s | 3s | 15 |
/// | 30s-2min | 5s | 25 |
/// | 2-10min | 10s | 30 |
/// | > 10min | 15s | 40 |
#[must_use]
pub fn plan_interval_timestamps(duration: f64) -> Vec<f64> {
    if duration <= 0.0 {
        return vec![0.1];
    }

    // 極短片：只取頭尾
    if duration <= 2.0 {
        return vec![0.1, round2((duration - 0.1).max(0.2))];
    }

    // 短片：頭、中、尾
    if duration < 5.0 {
        return vec![
            0.1,
            round2(duration / 2.0),
            round2((duration - 0.2).max(duration / 2.0 + 0.1)),
        ];
    }

    let (interval, max_frames) = if duration <= 30.0 {
        (3.0, 15)
    } else if duration <= 120.0 {
        (5.0, 25)
    } else if duration <= 600.0 {
        (10.0, 30)
    } else {
        (15.0, 40)
    };

    let mut timestamps = sample_grid(duration, interval);

    // 結尾錨點：確保最後 5% 範圍內有一幀
    let end_anchor = duration - (duration * 0.05).min(1.0);
    if let Some(&last) = timestamps.last() {
        if end_anchor - last > interval * 0.3 {
            timestamps.push(round2(end_anchor));
        }
    }

    let mut timestamps = subsample_evenly(timestamps, max_frames);

    // 保證至少兩幀
    if timestamps.len() < 2 && duration > 1.0 {
        timestamps = vec![0.5, round2((duration - 0.5).max(1.0))];
    }

    timestamps
}
