use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{get_image_extensions_set, SampleEntries, Sample};

/// Check that a regular file exists at the given path
pub fn check_file_path(path: &Path) -> bool {
    path.is_file()
}

/// Check that the path carries one of the supported image extensions (case-insensitive)
pub fn check_file_type(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| get_image_extensions_set().contains(&ext.to_lowercase()))
}

/// Read a manifest and resolve every image path against the manifest's directory.
///
/// The manifest is parsed straight from a buffered file stream.
pub fn read_manifest(path: &Path) -> Result<SampleEntries> {
    let file = fs::File::open(path)?;
    let samples: Vec<Sample> = serde_json::from_reader(BufReader::new(file))?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(samples
        .into_iter()
        .map(|sample| (resolve_image_path(&base_dir, &sample.image_path), sample))
        .collect())
}

fn resolve_image_path(base_dir: &Path, image_path: &str) -> PathBuf {
    let image_path = Path::new(image_path);
    if image_path.is_absolute() {
        image_path.to_path_buf()
    } else {
        base_dir.join(image_path)
    }
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(&format!(
        "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
        label
    )) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Safely create an output directory, replacing any existing one
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).and_then(|_| fs::create_dir_all(path))?;
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}
