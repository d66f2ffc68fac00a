use jwalk::WalkDir;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::types::{LabelFile, IMAGE_EXTENSIONS, LABEL_SUFFIX};

/// List the label files directly inside `label_dir`, sorted by file name.
///
/// Every entry of the directory, label file or not, takes a slot in the
/// listing so that `listing_index` reflects its position among all entries.
pub fn discover_label_files(label_dir: &Path) -> Result<Vec<LabelFile>> {
    let walk_error = |source| ConvertError::Walk {
        path: label_dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in WalkDir::new(label_dir)
        .skip_hidden(false)
        .sort(true)
        .min_depth(1)
        .max_depth(1)
    {
        let entry = entry.map_err(walk_error)?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry));
    }

    let label_files = entries
        .into_iter()
        .enumerate()
        .filter_map(|(listing_index, (name, entry))| {
            let base_name = name.strip_suffix(LABEL_SUFFIX)?;
            let path = entry.path();
            // follows symlinks, unlike entry.file_type()
            if !path.is_file() {
                return None;
            }
            Some(LabelFile {
                path,
                base_name: base_name.to_string(),
                listing_index,
            })
        })
        .collect();

    Ok(label_files)
}

/// Find the image belonging to a label base name, trying each extension of
/// [`IMAGE_EXTENSIONS`] in order.
pub fn find_image_for_label(image_dir: &Path, base_name: &str) -> Option<PathBuf> {
    find_image_with_extensions(image_dir, base_name, IMAGE_EXTENSIONS)
}

pub fn find_image_with_extensions(
    image_dir: &Path,
    base_name: &str,
    extensions: &[&str],
) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| image_dir.join(format!("{}.{}", base_name, ext)))
        .find(|candidate| candidate.is_file())
}
