mod ffmpeg_check;
mod ffprobe_info;
mod path_validator;
mod scene_detector;
mod time_format;

pub use ffmpeg_check::ensure_ffmpeg_available;
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use path_validator::{ensure_directory_exists, validate_file_exists};
pub use scene_detector::{SceneChange, detect_scene_changes};
pub use time_format::format_timestamp;
