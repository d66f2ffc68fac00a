use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use yolo2coco::{config::Args, process_coco_dataset, setup_coco_output_directories};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.label_dir.is_dir() {
        error!(
            "The specified label_dir does not exist: {}",
            args.label_dir.display()
        );
        return ExitCode::FAILURE;
    }
    if !args.image_dir.is_dir() {
        error!(
            "The specified image_dir does not exist: {}",
            args.image_dir.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Starting YOLO to COCO conversion process...");

    let config = match args.to_convert_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load categories: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output_dirs = match setup_coco_output_directories(&args.output_dir) {
        Ok(output_dirs) => output_dirs,
        Err(e) => {
            error!("Failed to set up output directories: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match process_coco_dataset(&output_dirs, &args.label_dir, &args.image_dir, &config) {
        Ok(_) => {
            info!("COCO dataset saved to {}", args.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
