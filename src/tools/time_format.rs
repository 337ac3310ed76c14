//! 時間顯示格式

/// 將秒數格式化為 `MM:SS.cc`，超過一小時則為 `HH:MM:SS.cc`
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:05.2}")
    } else {
        format!("{minutes:02}:{secs:05.2}")
    }
}
