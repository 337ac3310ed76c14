use clap::Parser;
use console::style;
use keyframe_extract::cli::Args;
use keyframe_extract::component::keyframe_extractor::{ExtractionOptions, KeyframeExtractor};
use keyframe_extract::signal::setup_shutdown_signal;
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let shutdown_signal = setup_shutdown_signal();

    let options = ExtractionOptions {
        video_path: args.video,
        output_dir: args.output_dir,
        strategy: args.strategy,
        threshold: args.threshold,
    };

    let extractor = KeyframeExtractor::new(options, shutdown_signal);
    match extractor.run() {
        Ok(summary) => {
            info!(
                "完成 - 擷取 {}/{} 幀",
                summary.extracted, summary.planned
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::FAILURE
        }
    }
}
