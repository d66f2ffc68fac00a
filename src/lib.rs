//! YOLO to COCO format converter
//!
//! This library pairs YOLO label files with their images, converts the
//! normalized boxes to pixel coordinates and writes a single COCO annotation
//! file together with a directory of re-encoded JPEG images.

pub mod coco;
pub mod coco_dataset;
pub mod config;
pub mod conversion;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, ConvertConfig, ImageIdMode};
pub use error::ConvertError;
pub use types::{LabelRecord, ProcessingStats};

// COCO-specific exports
pub use coco::{Annotation, Category, CocoFile, CocoWriter, Image};
pub use coco_dataset::{
    convert, plan_conversion, process_coco_dataset, setup_coco_output_directories,
};
