//! 取樣共用基礎函式
//!
//! 時間點一律以兩位小數為正準精度：產生時即刻捨入，
//! 後續的比較與去重都在這個精度上進行。

/// 捨入到兩位小數（時間點的正準精度）
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 兩位小數精度的整數鍵，用於集合成員判定
#[must_use]
pub fn timestamp_key(timestamp: f64) -> i64 {
    (timestamp * 100.0).round() as i64
}

/// 產生固定間隔的時間點網格
///
/// 從 0.5 秒開始，每 `interval` 秒一點，直到距離結尾 0.3 秒為止。
/// 頭尾的偏移是為了避開黑幀與轉場邊界。
#[must_use]
pub fn sample_grid(duration: f64, interval: f64) -> Vec<f64> {
    let mut timestamps = Vec::new();
    let mut t = 0.5;
    while t < duration - 0.3 {
        timestamps.push(round2(t));
        t += interval;
    }
    timestamps
}

/// 均勻抽取至多 `max_count` 個元素
///
/// 以索引跨步 `floor(i * len / max_count)` 選取，保留原序列的相對間距，
/// 避免隨機抽樣造成的局部聚集。
#[must_use]
pub fn subsample_evenly(timestamps: Vec<f64>, max_count: usize) -> Vec<f64> {
    if max_count == 0 || timestamps.len() <= max_count {
        return timestamps;
    }

    let step = timestamps.len() as f64 / max_count as f64;
    (0..max_count)
        .map(|i| timestamps[(i as f64 * step) as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(3.14159) - 3.14).abs() < 1e-9);
        assert!((round2(9.499) - 9.5).abs() < 1e-9);
        assert!((round2(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_timestamp_key() {
        assert_eq!(timestamp_key(2.0), 200);
        assert_eq!(timestamp_key(2.3), 230);
        assert_eq!(timestamp_key(12.34), 1234);
        // 捨入後的值與其鍵一一對應
        assert_ne!(timestamp_key(2.0), timestamp_key(2.01));
    }

    #[test]
    fn test_sample_grid_basic() {
        let grid = sample_grid(10.0, 3.0);
        assert_eq!(grid, vec![0.5, 3.5, 6.5, 9.5]);
    }

    #[test]
    fn test_sample_grid_respects_end_margin() {
        // 8.5 之後的下一點 12.5 已超出 duration - 0.3
        let grid = sample_grid(10.0, 4.0);
        assert_eq!(grid, vec![0.5, 4.5, 8.5]);
    }

    #[test]
    fn test_sample_grid_empty_for_tiny_duration() {
        assert!(sample_grid(0.0, 3.0).is_empty());
        assert!(sample_grid(0.7, 3.0).is_empty());
    }

    #[test]
    fn test_subsample_evenly_under_limit() {
        let ts = vec![1.0, 2.0, 3.0];
        assert_eq!(subsample_evenly(ts.clone(), 5), ts);
        assert_eq!(subsample_evenly(ts.clone(), 3), ts);
    }

    #[test]
    fn test_subsample_evenly_reduces_count() {
        let ts: Vec<f64> = (0..10).map(f64::from).collect();
        let picked = subsample_evenly(ts, 4);
        // step = 2.5 → 索引 0, 2, 5, 7
        assert_eq!(picked, vec![0.0, 2.0, 5.0, 7.0]);
    }

    #[test]
    fn test_subsample_evenly_keeps_order() {
        let ts: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.5).collect();
        let picked = subsample_evenly(ts, 30);
        assert_eq!(picked.len(), 30);
        for pair in picked.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_subsample_evenly_zero_max() {
        let ts = vec![1.0, 2.0];
        assert_eq!(subsample_evenly(ts.clone(), 0), ts);
    }
}
