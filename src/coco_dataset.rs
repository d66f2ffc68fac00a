//! COCO dataset processing module
//!
//! Pairs YOLO label files with their images, denormalizes the boxes and writes
//! one COCO annotation file next to a `train/` directory of JPEG images.
//!
//! A run has three phases. Planning is sequential: it lists the label files,
//! probes for images, reads image headers, parses every label line and fixes
//! all ids. Encoding then re-encodes the matched images on a worker pool.
//! Finally the COCO document is written in one piece. A malformed label file
//! therefore aborts the run before anything is written.

use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::coco::{Category, CocoFile, CocoWriter, Image};
use crate::config::{ConvertConfig, ImageIdMode};
use crate::conversion::{
    calculate_bounding_box, encode_image_to_jpeg, read_image_dimensions, read_label_file,
};
use crate::error::{ConvertError, Result};
use crate::io::{discover_label_files, find_image_for_label};
use crate::types::{
    ImageJob, ProcessingStats, ANNOTATIONS_FILE_NAME, OUTPUT_IMAGE_EXTENSION, TRAIN_DIR_NAME,
};
use crate::utils::{
    create_io_thread_pool, create_progress_bar, ensure_output_directory, write_json_atomically,
};

/// Struct to hold the paths of the COCO dataset output
#[derive(Debug, Clone)]
pub struct CocoOutputDirs {
    pub train_images_dir: PathBuf,
    pub annotations_path: PathBuf,
}

/// Everything a run will write, computed before any output is touched.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub coco: CocoFile,
    pub jobs: Vec<ImageJob>,
    pub stats: ProcessingStats,
}

/// Set up the directory structure for COCO dataset output
pub fn setup_coco_output_directories(output_dir: &Path) -> Result<CocoOutputDirs> {
    let output_dir = ensure_output_directory(output_dir)?;
    let train_images_dir = ensure_output_directory(&output_dir.join(TRAIN_DIR_NAME))?;

    Ok(CocoOutputDirs {
        train_images_dir,
        annotations_path: output_dir.join(ANNOTATIONS_FILE_NAME),
    })
}

/// Convert a YOLO label directory into `output_dir/train/*.jpg` and
/// `output_dir/annotations_train.json` using the default settings.
pub fn convert(
    label_dir: &Path,
    image_dir: &Path,
    output_dir: &Path,
    categories: Vec<Category>,
) -> Result<()> {
    let config = ConvertConfig::with_categories(categories);
    let output_dirs = setup_coco_output_directories(output_dir)?;
    process_coco_dataset(&output_dirs, label_dir, image_dir, &config)?;
    Ok(())
}

/// Main COCO dataset processing pipeline
pub fn process_coco_dataset(
    output_dirs: &CocoOutputDirs,
    label_dir: &Path,
    image_dir: &Path,
    config: &ConvertConfig,
) -> Result<ProcessingStats> {
    if config.categories.is_empty() {
        warn!("No categories configured; the COCO file will have an empty category list");
    }

    info!("Scanning label files in {}...", label_dir.display());
    let plan = plan_conversion(label_dir, image_dir, &output_dirs.train_images_dir, config)?;

    info!("Re-encoding {} images as JPEG...", plan.jobs.len());
    encode_images(&plan.jobs, config)?;

    info!("Writing COCO JSON file...");
    write_json_atomically(&plan.coco, &output_dirs.annotations_path)?;
    info!("Wrote {}", output_dirs.annotations_path.display());

    let mut stats = plan.stats;
    stats.images_converted = plan.jobs.len();
    stats.print_summary();
    info!("COCO conversion process completed successfully.");
    Ok(stats)
}

/// Build the COCO document and the list of images to encode.
pub fn plan_conversion(
    label_dir: &Path,
    image_dir: &Path,
    train_images_dir: &Path,
    config: &ConvertConfig,
) -> Result<ConversionPlan> {
    let label_files = discover_label_files(label_dir)?;
    let mut stats = ProcessingStats::new();
    stats.label_files_found = label_files.len();

    let mut writer = CocoWriter::new(config);
    let mut jobs = Vec::with_capacity(label_files.len());

    for label_file in &label_files {
        let Some(image_path) = find_image_for_label(image_dir, &label_file.base_name) else {
            warn!(
                "No image found for label file {}; skipping",
                label_file.path.display()
            );
            stats.skipped_missing_image += 1;
            continue;
        };

        let (width, height) = read_image_dimensions(&image_path)?;
        let image_id = assign_image_id(config, writer.image_count(), label_file.listing_index)?;
        let file_name = format!("{}.{}", label_file.base_name, OUTPUT_IMAGE_EXTENSION);

        for record in read_label_file(&label_file.path)? {
            let (bbox, area) = calculate_bounding_box(&record, width, height);
            writer.add_annotation(image_id, record.class_id, bbox, area)?;
        }

        jobs.push(ImageJob {
            source: image_path,
            destination: train_images_dir.join(&file_name),
        });
        writer.add_image(Image::new(image_id, file_name, width, height));
    }

    stats.annotations_written = writer.annotation_count();
    Ok(ConversionPlan {
        coco: writer.build(),
        jobs,
        stats,
    })
}

fn assign_image_id(
    config: &ConvertConfig,
    matched_so_far: usize,
    listing_index: usize,
) -> Result<u32> {
    let offset = match config.id_mode {
        ImageIdMode::Contiguous => matched_so_far,
        ImageIdMode::Listing => listing_index,
    };
    u32::try_from(offset)
        .ok()
        .and_then(|offset| config.start_image_id.checked_add(offset))
        .ok_or(ConvertError::IdOverflow("image"))
}

/// Re-encode every planned image on the worker pool. Stops at the first failure.
pub fn encode_images(jobs: &[ImageJob], config: &ConvertConfig) -> Result<()> {
    if jobs.is_empty() {
        return Ok(());
    }

    let thread_pool = create_io_thread_pool(config.workers)?;
    let pb = create_progress_bar(jobs.len() as u64, "Images");

    let result: Result<()> = thread_pool.install(|| {
        jobs.par_iter().try_for_each(|job| {
            encode_image_to_jpeg(job, config.jpeg_quality)?;
            pb.inc(1);
            Ok(())
        })
    });

    match &result {
        Ok(()) => pb.finish_with_message("Image processing complete"),
        Err(_) => pb.abandon(),
    }
    result
}
