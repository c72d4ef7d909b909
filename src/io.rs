use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::labels::LabelMap;
use crate::types::OutputDirs;
use crate::utils::create_output_directory;

/// Root of the generated dataset, relative to the output directory
pub const DATASET_ROOT: &str = "data/dataset";

/// Set up the directory structure for YOLO dataset output
pub fn setup_output_directories(output: &Path) -> std::io::Result<OutputDirs> {
    let root_dir = output.join(DATASET_ROOT);
    let labels_dir = create_output_directory(&root_dir.join("labels"))?;
    let images_dir = create_output_directory(&root_dir.join("images"))?;

    Ok(OutputDirs {
        train_labels_dir: create_output_directory(&labels_dir.join("train"))?,
        val_labels_dir: create_output_directory(&labels_dir.join("val"))?,
        test_labels_dir: create_output_directory(&labels_dir.join("test"))?,
        train_images_dir: create_output_directory(&images_dir.join("train"))?,
        val_images_dir: create_output_directory(&images_dir.join("val"))?,
        test_images_dir: create_output_directory(&images_dir.join("test"))?,
        root_dir,
    })
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(
    output_dirs: &OutputDirs,
    label_map: &LabelMap,
    has_test: bool,
) -> std::io::Result<()> {
    let dataset_yaml_path = output_dirs.root_dir.join("dataset.yaml");
    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    let absolute_path = fs::canonicalize(&output_dirs.root_dir)?;
    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\n",
        absolute_path.to_string_lossy()
    );
    if has_test {
        yaml_content.push_str("test: images/test\n");
    } else {
        yaml_content.push_str("test:\n");
    }
    yaml_content.push_str("\nnames:\n");

    for (id, label) in label_map.sorted_by_id() {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }
    dataset_yaml.write_all(yaml_content.as_bytes())?;
    dataset_yaml.flush()
}
