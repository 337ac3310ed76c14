//! 關鍵幀擷取元件
//!
//! 目標是「漫畫分格」式取樣：挑出一小組時間點，讓人光看這些幀
//! 就能重建片段的敘事，而不產生過多冗餘。
//!
//! 五階段流程：
//! A. 取得影片資訊（ffprobe）
//! B. 場景變換偵測（scene 濾鏡）
//! C. 依策略計算時間點
//! D. 平行擷取幀
//! E. 寫出 JSON 報告

mod frame_extractor;
mod hybrid_merger;
mod interval_planner;
mod main;
mod sampling;
mod scene_filter;
mod sidecar;
mod strategy;

pub use frame_extractor::{
    FrameResult, FrameTask, create_frame_tasks, extract_frame, extract_frames_parallel,
};
pub use hybrid_merger::{
    MIN_GAP_SECONDS, merge_sets, merge_with_density_grid, minimum_density_grid,
};
pub use interval_planner::plan_interval_timestamps;
pub use main::{ExtractionOptions, ExtractionSummary, KeyframeExtractor};
pub use sampling::{round2, subsample_evenly};
pub use scene_filter::{DEFAULT_MAX_SCENE_FRAMES, effective_threshold, filter_scene_changes};
pub use sidecar::{FrameRecord, KeyframeReport, REPORT_FILE_NAME, write_report};
pub use strategy::{Strategy, compute_timestamps};
