//! E2E 測試 - 完整擷取流程
//!
//! 需要系統上有 ffmpeg；沒有時直接跳過。測試影片以 lavfi 測試訊號
//! 即時產生，不依賴外部素材。

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use keyframe_extract::component::keyframe_extractor::{
    ExtractionOptions, KeyframeExtractor, REPORT_FILE_NAME, Strategy,
};
use keyframe_extract::tools::get_video_info;

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .is_ok_and(|ok| ok)
}

/// 產生一段 10 秒的測試影片
fn generate_test_video(dir: &Path) -> Option<PathBuf> {
    let path = dir.join("test_clip.mp4");
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=10:size=320x240:rate=10",
            "-pix_fmt",
            "yuv420p",
            "-y",
        ])
        .arg(&path)
        .status()
        .ok()?;

    if status.success() && path.exists() {
        Some(path)
    } else {
        None
    }
}

#[test]
fn test_interval_extraction_end_to_end() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let Some(video) = generate_test_video(dir.path()) else {
        println!("跳過測試：無法產生測試影片");
        return;
    };

    let info = get_video_info(&video).unwrap();
    assert!((info.duration_seconds - 10.0).abs() < 0.5);

    let output_dir = dir.path().join("frames");
    let options = ExtractionOptions {
        video_path: video,
        output_dir: Some(output_dir.clone()),
        strategy: Strategy::Interval,
        threshold: 0.3,
    };

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let summary = KeyframeExtractor::new(options, shutdown_signal)
        .run()
        .unwrap();

    // 10 秒片段的固定間隔取樣應是 4 個點
    assert_eq!(summary.planned, 4);
    assert_eq!(summary.extracted, 4);
    assert_eq!(summary.failed, 0);

    for index in 1..=4 {
        let frame = output_dir.join(format!("frame_{index:03}.jpg"));
        assert!(frame.exists(), "缺少 {}", frame.display());
    }

    // 驗證報告內容
    let report_path = output_dir.join(REPORT_FILE_NAME);
    assert_eq!(summary.report_path, report_path);
    let content = std::fs::read_to_string(&report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["extraction_strategy"], "interval");
    assert_eq!(report["frame_count"], 4);
    assert!(report["scene_threshold"].is_null());
    assert_eq!(report["frames"][0]["index"], 1);
    assert_eq!(report["frames"][0]["timestamp_seconds"], 0.5);
}

#[test]
fn test_hybrid_extraction_end_to_end() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let Some(video) = generate_test_video(dir.path()) else {
        println!("跳過測試：無法產生測試影片");
        return;
    };

    let output_dir = dir.path().join("frames");
    let options = ExtractionOptions {
        video_path: video,
        output_dir: Some(output_dir.clone()),
        strategy: Strategy::Hybrid,
        threshold: 0.3,
    };

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let summary = KeyframeExtractor::new(options, shutdown_signal)
        .run()
        .unwrap();

    // 無論偵測結果如何，最低密度網格保證至少有點可取
    assert!(summary.extracted >= 2);
    assert!(summary.extracted <= 30);
    assert!(output_dir.join(REPORT_FILE_NAME).exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let options = ExtractionOptions {
        video_path: PathBuf::from("/nonexistent/clip.mp4"),
        output_dir: None,
        strategy: Strategy::Hybrid,
        threshold: 0.3,
    };

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let result = KeyframeExtractor::new(options, shutdown_signal).run();
    assert!(result.is_err());
}
