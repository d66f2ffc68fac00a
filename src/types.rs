use std::path::PathBuf;

// Image extensions probed for each label file, in priority order
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "webp", "png", "jpeg"];

// Suffix that marks a file in the label directory as a YOLO label file
pub const LABEL_SUFFIX: &str = ".txt";

// Extension of every image written to the output directory
pub const OUTPUT_IMAGE_EXTENSION: &str = "jpg";

// File name of the COCO document inside the output directory
pub const ANNOTATIONS_FILE_NAME: &str = "annotations_train.json";

// Subdirectory of the output directory receiving the re-encoded images
pub const TRAIN_DIR_NAME: &str = "train";

/// One line of a YOLO label file, with normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// A label file found in the label directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFile {
    pub path: PathBuf,
    pub base_name: String,
    /// Position of the entry in the sorted directory listing, counting every entry
    pub listing_index: usize,
}

/// A matched image that still has to be re-encoded into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub label_files_found: usize,
    pub images_converted: usize,
    pub skipped_missing_image: usize,
    pub annotations_written: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Label files found: {}", self.label_files_found);
        log::info!("Images converted: {}", self.images_converted);
        log::info!("Annotations written: {}", self.annotations_written);

        if self.skipped_missing_image > 0 {
            log::warn!(
                "Skipped label files (no matching image): {}",
                self.skipped_missing_image
            );
        }
    }
}
