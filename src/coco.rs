//! COCO format data structures and utilities
//!
//! The document written by this crate carries only the `images`, `annotations`
//! and `categories` sections, in that order.

use serde::{Deserialize, Serialize};

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};

/// COCO category information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

impl Category {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            supercategory: None,
        }
    }
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u32,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(id: u32, file_name: String, width: u32, height: u32) -> Self {
        Self {
            id,
            file_name,
            width,
            height,
        }
    }
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub image_id: u32,
    pub category_id: u32,
    pub bbox: [f64; 4], // [x, y, width, height]
    pub area: f64,
    pub iscrowd: u32,
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// Accumulates images and annotations for one run and hands out their ids.
///
/// Annotation ids are strictly increasing across the whole run. Image ids
/// come from the caller so that both numbering modes share one code path.
pub struct CocoWriter {
    // None once u32::MAX has been handed out
    next_annotation_id: Option<u32>,
    categories: Vec<Category>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
}

impl CocoWriter {
    /// Create a new COCO writer with the given configuration
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            next_annotation_id: Some(config.start_annotation_id),
            categories: config.categories.clone(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add an image to the COCO dataset
    pub fn add_image(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Add an annotation and return the id it was given
    pub fn add_annotation(
        &mut self,
        image_id: u32,
        category_id: u32,
        bbox: [f64; 4],
        area: f64,
    ) -> Result<u32> {
        let id = self
            .next_annotation_id
            .ok_or(ConvertError::IdOverflow("annotation"))?;
        self.next_annotation_id = id.checked_add(1);
        self.annotations.push(Annotation {
            id,
            image_id,
            category_id,
            bbox,
            area,
            iscrowd: 0,
        });
        Ok(id)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Build the complete COCO dataset structure
    pub fn build(self) -> CocoFile {
        CocoFile {
            images: self.images,
            annotations: self.annotations,
            categories: self.categories,
        }
    }
}

/// Convert a normalized YOLO box `(x_center, y_center, w, h)` into a pixel
/// COCO box `[x_min, y_min, width, height]`.
pub fn denormalize_bbox(
    x_center: f64,
    y_center: f64,
    w: f64,
    h: f64,
    image_width: u32,
    image_height: u32,
) -> [f64; 4] {
    let img_w = image_width as f64;
    let img_h = image_height as f64;
    [
        (x_center - w / 2.0) * img_w,
        (y_center - h / 2.0) * img_h,
        w * img_w,
        h * img_h,
    ]
}

/// Inverse of [`denormalize_bbox`].
pub fn normalize_bbox(bbox: [f64; 4], image_width: u32, image_height: u32) -> (f64, f64, f64, f64) {
    let img_w = image_width as f64;
    let img_h = image_height as f64;
    let [x_min, y_min, width, height] = bbox;
    (
        x_min / img_w + width / img_w / 2.0,
        y_min / img_h + height / img_h / 2.0,
        width / img_w,
        height / img_h,
    )
}

/// Area of a COCO `[x, y, width, height]` box
pub fn bbox_area(bbox: &[f64; 4]) -> f64 {
    bbox[2] * bbox[3]
}
