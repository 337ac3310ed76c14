//! 混合式時間點合併
//!
//! 場景變換點負責抓住剪接與劇烈變化，最低密度網格負責補上慢速運鏡
//! 與漸變光影；兩者聯集後做鄰近去重，重複時偏好場景點。

use std::collections::HashSet;

use super::sampling::{round2, sample_grid, subsample_evenly, timestamp_key};

/// 去重後相鄰時間點的最小間距（秒）
pub const MIN_GAP_SECONDS: f64 = 1.5;

/// 依影片長度選擇最低密度間隔
fn minimum_density_interval(duration: f64) -> f64 {
    if duration < 30.0 {
        4.0
    } else if duration < 120.0 {
        8.0
    } else if duration < 600.0 {
        12.0
    } else {
        20.0
    }
}

/// 最低密度網格：無論偵測結果如何都保底的取樣點
#[must_use]
pub fn minimum_density_grid(duration: f64) -> Vec<f64> {
    sample_grid(duration, minimum_density_interval(duration))
}

/// 合併場景點與最低密度網格
#[must_use]
pub fn merge_with_density_grid(scene_timestamps: &[f64], duration: f64) -> Vec<f64> {
    merge_sets(scene_timestamps, &minimum_density_grid(duration), duration)
}

/// 合併兩組時間點：聯集、頭尾錨點、鄰近去重、上限、保底
///
/// 場景點集合同時作為去重時的偏好依據。
#[must_use]
pub fn merge_sets(scene_timestamps: &[f64], density_grid: &[f64], duration: f64) -> Vec<f64> {
    let mut merged: Vec<f64> = scene_timestamps
        .iter()
        .chain(density_grid)
        .copied()
        .collect();
    merged.sort_by(f64::total_cmp);
    merged.dedup_by(|a, b| (*a - *b).abs() < 0.001);

    // 頭尾錨點：確保開頭一秒內與結尾附近各有一點
    if merged.first().is_some_and(|&first| first > 1.0) {
        merged.insert(0, 0.3);
    }
    let end_anchor = round2(duration - (duration * 0.03).min(0.5));
    if merged
        .last()
        .is_some_and(|&last| end_anchor - last > MIN_GAP_SECONDS)
    {
        merged.push(end_anchor);
    }

    // 錨點插入後重新排序；去重摺疊要求輸入遞增
    merged.sort_by(f64::total_cmp);

    let scene_keys: HashSet<i64> = scene_timestamps
        .iter()
        .map(|&t| timestamp_key(t))
        .collect();
    let deduplicated = dedup_with_scene_preference(&merged, &scene_keys);

    let max_frames = if duration > 300.0 { 40 } else { 30 };
    let mut deduplicated = subsample_evenly(deduplicated, max_frames);

    // 保證至少兩點
    if deduplicated.len() < 2 && duration > 1.0 {
        deduplicated = vec![0.3, round2((duration - 0.5).max(0.6))];
    }

    deduplicated
}

/// 鄰近去重：間距不足 [`MIN_GAP_SECONDS`] 時，場景點可取代剛保留的
/// 非場景點，其餘情況丟棄後來者
///
/// 比較只做單向：不會反過來以較早的場景點抑制後來的場景點。
fn dedup_with_scene_preference(sorted: &[f64], scene_keys: &HashSet<i64>) -> Vec<f64> {
    sorted.iter().fold(Vec::new(), |mut kept, &ts| {
        match kept.last().copied() {
            None => kept.push(ts),
            Some(last) => {
                if ts - last >= MIN_GAP_SECONDS {
                    kept.push(ts);
                } else if scene_keys.contains(&timestamp_key(ts))
                    && !scene_keys.contains(&timestamp_key(last))
                {
                    // 場景點比任意網格點更有敘事意義，就地取代
                    if let Some(slot) = kept.last_mut() {
                        *slot = ts;
                    }
                }
            }
        }
        kept
    })
}
