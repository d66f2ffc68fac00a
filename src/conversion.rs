use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::coco::{bbox_area, denormalize_bbox};
use crate::error::{ConvertError, Result};
use crate::types::{ImageJob, LabelRecord};

const LABEL_FIELDS: usize = 5;

/// Parse one line of a YOLO label file.
///
/// Returns `Ok(None)` for blank lines. The class id may be written as an
/// integer or a float; it is truncated toward zero.
pub fn parse_label_line(line: &str, path: &Path, line_num: usize) -> Result<Option<LabelRecord>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() != LABEL_FIELDS {
        return Err(ConvertError::LabelParse {
            path: path.to_path_buf(),
            line: line_num,
            message: format!("expected {} fields, found {}", LABEL_FIELDS, tokens.len()),
        });
    }

    let class_value = parse_number(tokens[0], "class_id", path, line_num)?;
    let truncated = class_value.trunc();
    // -0.5 truncates to 0 and is accepted
    if !class_value.is_finite() || truncated < 0.0 || truncated > u32::MAX as f64 {
        return Err(ConvertError::LabelParse {
            path: path.to_path_buf(),
            line: line_num,
            message: format!("class_id '{}' is not a valid category id", tokens[0]),
        });
    }

    Ok(Some(LabelRecord {
        class_id: truncated as u32,
        x_center: parse_number(tokens[1], "x_center", path, line_num)?,
        y_center: parse_number(tokens[2], "y_center", path, line_num)?,
        width: parse_number(tokens[3], "width", path, line_num)?,
        height: parse_number(tokens[4], "height", path, line_num)?,
    }))
}

fn parse_number(raw: &str, field: &str, path: &Path, line_num: usize) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| ConvertError::LabelParse {
        path: path.to_path_buf(),
        line: line_num,
        message: format!("invalid {} '{}'; expected a number", field, raw),
    })
}

/// Read every record of a label file. Any malformed line fails the whole file.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRecord>> {
    let content = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if let Some(record) = parse_label_line(line, path, idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Pixel-space `[x_min, y_min, width, height]` box and its area
pub fn calculate_bounding_box(
    record: &LabelRecord,
    image_width: u32,
    image_height: u32,
) -> ([f64; 4], f64) {
    let bbox = denormalize_bbox(
        record.x_center,
        record.y_center,
        record.width,
        record.height,
        image_width,
        image_height,
    );
    let area = bbox_area(&bbox);
    (bbox, area)
}

/// Read the pixel dimensions of an image from its header.
///
/// The format is sniffed from the file content, not the extension.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    ImageReader::open(path)
        .map_err(|e| ConvertError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| ConvertError::io(path, e))?
        .into_dimensions()
        .map_err(|e| ConvertError::image(path, e))
}

/// Decode the source image, drop any alpha channel and write it as JPEG.
pub fn encode_image_to_jpeg(job: &ImageJob, quality: u8) -> Result<()> {
    let decoded = ImageReader::open(&job.source)
        .map_err(|e| ConvertError::io(&job.source, e))?
        .with_guessed_format()
        .map_err(|e| ConvertError::io(&job.source, e))?
        .decode()
        .map_err(|e| ConvertError::image(&job.source, e))?;
    let rgb = decoded.to_rgb8();

    let file = File::create(&job.destination).map_err(|e| ConvertError::io(&job.destination, e))?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| ConvertError::image(&job.destination, e))?;

    writer.flush().map_err(|e| ConvertError::io(&job.destination, e))?;
    debug!(
        "Encoded {} -> {}",
        job.source.display(),
        job.destination.display()
    );
    Ok(())
}
