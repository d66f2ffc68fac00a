use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::coco::Category;
use crate::error::{ConvertError, Result};

/// Command-line arguments for converting YOLO labels to a COCO annotation file.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing YOLO label (.txt) files
    #[arg(short = 'l', long = "label_dir")]
    pub label_dir: PathBuf,

    /// Directory containing the images the labels refer to
    #[arg(short = 'i', long = "image_dir")]
    pub image_dir: PathBuf,

    /// Output directory for train/ images and annotations_train.json
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: PathBuf,

    /// JSON file with the category list: [{"id": 0, "name": "cat"}, ...]
    #[arg(long = "categories_file", conflicts_with = "label_list")]
    pub categories_file: Option<PathBuf>,

    /// Category id assigned to the first name of label_list
    #[arg(long = "start_category_id", default_value_t = 0)]
    pub start_category_id: u32,

    /// How image ids are numbered
    #[arg(long = "id_mode", value_enum, default_value = "contiguous")]
    pub id_mode: ImageIdMode,

    /// First image id
    #[arg(long = "start_image_id", default_value_t = 1)]
    pub start_image_id: u32,

    /// First annotation id
    #[arg(long = "start_annotation_id", default_value_t = 1)]
    pub start_annotation_id: u32,

    /// JPEG quality of the re-encoded images (1-100)
    #[arg(long = "quality", default_value_t = 75, value_parser = validate_quality)]
    pub quality: u8,

    /// Number of worker threads used to re-encode images (default: all cores)
    #[arg(long = "workers")]
    pub workers: Option<usize>,

    /// Ordered category names, comma separated
    #[arg(use_value_delimiter = true)]
    pub label_list: Vec<String>,
}

/// Numbering scheme for `images[].id`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum ImageIdMode {
    /// Consecutive ids over the images that were actually matched
    #[default]
    Contiguous,
    /// Position in the sorted label directory listing; skipped entries leave gaps
    Listing,
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub categories: Vec<Category>,
    pub id_mode: ImageIdMode,
    pub start_image_id: u32,
    pub start_annotation_id: u32,
    pub jpeg_quality: u8,
    pub workers: Option<usize>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            id_mode: ImageIdMode::Contiguous,
            start_image_id: 1,
            start_annotation_id: 1,
            jpeg_quality: 75,
            workers: None,
        }
    }
}

impl ConvertConfig {
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }
}

impl Args {
    /// Resolve the category list and build the run configuration.
    pub fn to_convert_config(&self) -> Result<ConvertConfig> {
        let categories = match &self.categories_file {
            Some(path) => read_categories_file(path)?,
            None => categories_from_names(&self.label_list, self.start_category_id),
        };

        Ok(ConvertConfig {
            categories,
            id_mode: self.id_mode,
            start_image_id: self.start_image_id,
            start_annotation_id: self.start_annotation_id,
            jpeg_quality: self.quality,
            workers: self.workers,
        })
    }
}

/// Number category names sequentially starting at `start_id`.
pub fn categories_from_names(names: &[String], start_id: u32) -> Vec<Category> {
    names
        .iter()
        .zip(start_id..)
        .map(|(name, id)| Category::new(id, name.clone()))
        .collect()
}

/// Load a JSON category list, rejecting duplicate ids.
pub fn read_categories_file(path: &Path) -> Result<Vec<Category>> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let categories: Vec<Category> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ConvertError::Categories(format!("{}: {}", path.display(), e)))?;

    let mut seen = std::collections::HashSet::new();
    for category in &categories {
        if !seen.insert(category.id) {
            return Err(ConvertError::Categories(format!(
                "duplicate category id {} in {}",
                category.id,
                path.display()
            )));
        }
    }
    Ok(categories)
}

// Validate that the JPEG quality is between 1 and 100
fn validate_quality(s: &str) -> std::result::Result<u8, String> {
    match u8::from_str(s) {
        Ok(val) if (1..=100).contains(&val) => Ok(val),
        _ => Err("QUALITY must be between 1 and 100".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quality() {
        assert_eq!(validate_quality("75"), Ok(75));
        assert!(validate_quality("1").is_ok());
        assert!(validate_quality("100").is_ok());
        assert!(validate_quality("0").is_err());
        assert!(validate_quality("101").is_err());
        assert!(validate_quality("high").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from([
            "yolo2coco", "-l", "labels", "-i", "images", "-o", "out", "car,person",
        ]);
        let config = args.to_convert_config().unwrap();

        assert_eq!(config.id_mode, ImageIdMode::Contiguous);
        assert_eq!(config.start_image_id, 1);
        assert_eq!(config.start_annotation_id, 1);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].id, 0);
        assert_eq!(config.categories[0].name, "car");
        assert_eq!(config.categories[1].id, 1);
        assert_eq!(config.categories[1].name, "person");
    }

    #[test]
    fn test_args_listing_mode_and_start_id() {
        let args = Args::parse_from([
            "yolo2coco",
            "-l",
            "labels",
            "-i",
            "images",
            "-o",
            "out",
            "--id_mode",
            "listing",
            "--start_category_id",
            "1",
            "sinif1,sinif2",
        ]);
        let config = args.to_convert_config().unwrap();

        assert_eq!(config.id_mode, ImageIdMode::Listing);
        assert_eq!(config.categories[0].id, 1);
        assert_eq!(config.categories[1].id, 2);
    }

    #[test]
    fn test_categories_file_conflicts_with_label_list() {
        let result = Args::try_parse_from([
            "yolo2coco",
            "-l",
            "labels",
            "-i",
            "images",
            "-o",
            "out",
            "--categories_file",
            "cats.json",
            "car",
        ]);
        assert!(result.is_err());
    }
}
