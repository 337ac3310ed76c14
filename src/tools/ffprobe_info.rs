//! 以 ffprobe 取得影片資訊
//!
//! 只有影片長度是演算法的輸入，讀不到長度整個流程直接失敗；
//! 其餘欄位（解析度、編碼、幀率）僅供報告使用，缺漏不致命。

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codec: Option<String>,
    pub frame_rate: f64,
}

impl VideoInfo {
    /// 報告用的解析度字串
    #[must_use]
    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => "未知".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {stderr}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout, path)
}

/// 解析 ffprobe 的 JSON 輸出
fn parse_probe_output(json: &str, path: &Path) -> Result<VideoInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).with_context(|| "無法解析 ffprobe 輸出")?;

    // 找到視訊串流（可能不存在，例如純音訊檔）
    let video_stream = probe.streams.as_ref().and_then(|streams| {
        streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
    });

    // 影片長度（優先從 format，其次從 stream）；讀不到就是致命錯誤
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or_else(|| video_stream.and_then(|s| s.duration.as_ref()))
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow::anyhow!("無法取得影片長度: {}", path.display()))?;

    // 幀率字串格式可能是 "30/1" 或 "30000/1001"
    let frame_rate = video_stream
        .and_then(|s| s.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    Ok(VideoInfo {
        duration_seconds,
        width: video_stream.and_then(|s| s.width),
        height: video_stream.and_then(|s| s.height),
        codec: video_stream.and_then(|s| s.codec_name.clone()),
        frame_rate,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    rate.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fraction() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("24/1").unwrap() - 24.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_decimal() {
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("60").unwrap() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_invalid() {
        assert!(parse_frame_rate("invalid").is_none());
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn test_parse_probe_output_full() {
        let json = r#"{
            "format": {"duration": "63.5"},
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264",
                 "width": 1920, "height": 1080, "r_frame_rate": "30000/1001"}
            ]
        }"#;
        let info = parse_probe_output(json, Path::new("/test/video.mp4")).unwrap();
        assert!((info.duration_seconds - 63.5).abs() < 0.001);
        assert_eq!(info.width, Some(1920));
        assert_eq!(info.height, Some(1080));
        assert_eq!(info.codec.as_deref(), Some("h264"));
        assert!((info.frame_rate - 29.97).abs() < 0.01);
        assert_eq!(info.resolution(), "1920x1080");
    }

    #[test]
    fn test_parse_probe_output_duration_from_stream() {
        let json = r#"{
            "format": {},
            "streams": [{"codec_type": "video", "duration": "12.0"}]
        }"#;
        let info = parse_probe_output(json, Path::new("/test/video.mp4")).unwrap();
        assert!((info.duration_seconds - 12.0).abs() < 0.001);
        // 缺少的描述欄位不致命
        assert_eq!(info.width, None);
        assert_eq!(info.resolution(), "未知");
        assert!((info.frame_rate - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_probe_output_missing_duration_is_fatal() {
        let json = r#"{"format": {}, "streams": [{"codec_type": "video"}]}"#;
        assert!(parse_probe_output(json, Path::new("/test/video.mp4")).is_err());
    }
}
