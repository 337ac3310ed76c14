//! 命令列介面

use clap::Parser;
use std::path::PathBuf;

use crate::component::keyframe_extractor::Strategy;

/// 智慧關鍵幀擷取：挑出能重建片段敘事的最小幀集合
#[derive(Parser, Debug)]
#[command(name = "keyframe_extract")]
#[command(about = "智慧關鍵幀擷取，用於視覺故事分析")]
#[command(after_help = "\
策略:
  hybrid    場景偵測 + 最低密度網格（預設，推薦）
  scene     純場景變換偵測
  interval  依長度固定間隔

範例:
  keyframe_extract video.mp4                       # hybrid，預設輸出資料夾
  keyframe_extract video.mp4 -s scene -t 0.2       # 高敏感度場景偵測
  keyframe_extract video.mp4 -s interval -o frames # 固定間隔，自訂輸出
")]
pub struct Args {
    /// 影片檔案路徑
    pub video: PathBuf,

    /// 關鍵幀輸出資料夾（預設為影片旁的 .keyframes/<檔名>/）
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 擷取策略
    #[arg(short, long, value_enum, default_value_t = Strategy::Hybrid)]
    pub strategy: Strategy,

    /// 場景偵測閾值 0.0-1.0（越低越敏感）
    #[arg(short, long, default_value_t = 0.3)]
    pub threshold: f64,
}
