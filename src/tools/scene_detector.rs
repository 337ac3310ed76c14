//! 場景變換偵測
//!
//! 透過 ffmpeg 的 scene 濾鏡找出畫面顯著變化的時間點（剪接、轉場、
//! 大幅度移動）。偵測失敗或逾時一律回傳空訊號，由呼叫端的備援策略
//! 接手，不會讓整體流程失敗。

use anyhow::Result;
use log::{debug, warn};
use regex::Regex;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// 場景變換點：時間與變化分數 (0-1)
#[derive(Debug, Clone)]
pub struct SceneChange {
    pub timestamp: f64,
    pub score: f64,
}

/// 偵測逾時上限
const DETECTION_TIMEOUT: Duration = Duration::from_secs(120);

/// 逾時輪詢間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 偵測場景變換點
///
/// 閾值 (0.0-1.0) 控制敏感度：0.2 連細微變化都抓，0.3 為平衡值，
/// 0.5 只抓硬切。呼叫端應先以有效閾值調整過再傳入。
#[must_use]
pub fn detect_scene_changes(path: &Path, duration: f64, threshold: f64) -> Vec<SceneChange> {
    // select 套閾值，metadata=print 把每幀的 pts_time 與分數寫到 stderr
    let filter = format!("select='gt(scene,{threshold})',metadata=print");

    debug!("場景偵測: threshold={threshold}, filter={filter}");

    let child = Command::new("ffmpeg")
        .args(["-hide_banner", "-i"])
        .arg(path)
        .args(["-an", "-sn", "-dn", "-threads", "1", "-vf", &filter, "-f", "null", "-"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            warn!("無法啟動 ffmpeg 場景偵測: {e}");
            return Vec::new();
        }
    };

    // stderr 需在等待期間持續讀取，避免管線塞滿造成死結
    let stderr = child.stderr.take();
    let reader = thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut stderr) = stderr {
            let _ = stderr.read_to_string(&mut buffer);
        }
        buffer
    });

    let deadline = Instant::now() + DETECTION_TIMEOUT;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    warn!(
                        "場景偵測逾時（{} 秒），改用備援策略",
                        DETECTION_TIMEOUT.as_secs()
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                warn!("無法檢查場景偵測程序狀態: {e}");
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
        }
    };

    let output = reader.join().unwrap_or_default();

    let Some(status) = status else {
        return Vec::new();
    };

    if !status.success() {
        warn!("ffmpeg 場景偵測失敗 (exit {:?})，改用備援策略", status.code());
        return Vec::new();
    }

    match parse_metadata_output(&output, duration) {
        Ok(changes) => {
            debug!("偵測到 {} 個場景變換點", changes.len());
            changes
        }
        Err(e) => {
            warn!("無法解析場景偵測輸出: {e}");
            Vec::new()
        }
    }
}

/// 解析 metadata=print 的輸出
///
/// 格式成對出現：
/// `[Parsed_metadata_1 @ 0x...] frame:3 pts:12345 pts_time:1.234`
/// `[Parsed_metadata_1 @ 0x...] lavfi.scene_score=0.456`
fn parse_metadata_output(output: &str, duration: f64) -> Result<Vec<SceneChange>> {
    let pts_regex = Regex::new(r"pts_time:([0-9]+\.?[0-9]*)")?;
    let score_regex = Regex::new(r"lavfi\.scene_score=([0-9]+\.?[0-9]*)")?;

    let mut changes = Vec::new();
    let mut pending: Option<f64> = None;

    for line in output.lines() {
        if let Some(timestamp) = capture_f64(&pts_regex, line) {
            // 前一個時間點沒等到分數：保留，分數視為已過上游閾值
            if let Some(orphan) = pending.take() {
                changes.push(SceneChange {
                    timestamp: orphan,
                    score: 1.0,
                });
            }
            pending = Some(timestamp);
        }

        if let Some(score) = capture_f64(&score_regex, line) {
            if let Some(timestamp) = pending.take() {
                changes.push(SceneChange { timestamp, score });
            }
        }
    }

    if let Some(timestamp) = pending.take() {
        changes.push(SceneChange {
            timestamp,
            score: 1.0,
        });
    }

    changes.retain(|change| change.timestamp > 0.0 && change.timestamp < duration);

    Ok(changes)
}

fn capture_f64(regex: &Regex, line: &str) -> Option<f64> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
