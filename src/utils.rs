use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Build the thread pool used for image re-encoding.
///
/// `None` lets rayon pick one thread per logical CPU.
pub fn create_io_thread_pool(workers: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = workers {
        builder = builder.num_threads(workers.max(1));
    }
    Ok(builder.build()?)
}

/// Create a directory (and its parents) if missing. Existing content is kept.
pub fn ensure_output_directory(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path).map_err(|e| ConvertError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Serialize `value` as JSON indented with four spaces and move it into
/// place at `path` only once it has been fully written.
pub fn write_json_atomically<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = write_pretty_json(value, &tmp_path).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| ConvertError::io(path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_pretty_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer)?;
    writer.flush().map_err(|e| ConvertError::io(path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| ConvertError::io(path, e))
}
