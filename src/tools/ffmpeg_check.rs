use anyhow::{Context, Result, bail};
use std::process::Command;

/// 確認 ffmpeg 已安裝且可執行
///
/// 找不到 ffmpeg 屬於輸入層級的致命錯誤，在任何計算開始前就擋下。
pub fn ensure_ffmpeg_available() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .with_context(|| {
            "找不到 ffmpeg，請先安裝（macOS: brew install ffmpeg / Ubuntu: apt install ffmpeg）"
        })?;

    if !output.status.success() {
        bail!("ffmpeg 無法正常執行");
    }

    Ok(())
}
