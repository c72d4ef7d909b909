use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::Scalar;

/// Convert Pascal VOC boxes to YOLO format and lay out a YOLO training dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check the dataset manifests and build the YOLO directory layout
    Prepare(PrepareArgs),

    /// Convert a single bounding box
    #[command(subcommand)]
    Convert(ConvertArgs),

    /// Draw the boxes of one manifest sample onto its image
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    /// Manifest of the training split
    #[arg(long = "train")]
    pub train: PathBuf,

    /// Manifest of the validation split; split off the training manifest when omitted
    #[arg(long = "val")]
    pub val: Option<PathBuf>,

    /// Manifest of the test split
    #[arg(long = "test")]
    pub test: Option<PathBuf>,

    /// Directory that receives data/dataset
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Proportion of the training manifest to use for validation when --val is omitted
    #[arg(long = "val_size", default_value_t = 0.2, value_parser = validate_size)]
    pub val_size: f32,

    /// Proportion of the training manifest to use for testing when --val is omitted
    #[arg(long = "test_size", default_value_t = 0.0, value_parser = validate_size)]
    pub test_size: f32,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Ordered list of labels; labels are sorted alphabetically when omitted
    #[arg(use_value_delimiter = true)]
    pub label_list: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConvertArgs {
    /// Pixel corners (x_min y_min x_max y_max) to a normalized center box
    ToCenter {
        #[arg(
            value_parser = parse_scalar,
            num_args = 6,
            required = true,
            allow_negative_numbers = true,
            value_names = ["X_MIN", "Y_MIN", "X_MAX", "Y_MAX", "IMAGE_WIDTH", "IMAGE_HEIGHT"]
        )]
        values: Vec<Scalar>,
    },

    /// Normalized center box (x_c y_c w h) to pixel corners
    ToCorner {
        #[arg(
            value_parser = parse_scalar,
            num_args = 6,
            required = true,
            allow_negative_numbers = true,
            value_names = ["X_C", "Y_C", "W", "H", "IMAGE_WIDTH", "IMAGE_HEIGHT"]
        )]
        values: Vec<Scalar>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Manifest holding the sample
    #[arg(short = 'm', long = "manifest")]
    pub manifest: PathBuf,

    /// Index of the sample in the manifest
    #[arg(short = 'i', long = "index", default_value_t = 0)]
    pub index: usize,

    /// Where to save the rendered image; must not exist yet
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Outline thickness in pixels
    #[arg(long = "thickness", default_value_t = 2)]
    pub thickness: u32,
}

// Validate that the size is between 0.0 and 1.0
fn validate_size(s: &str) -> Result<f32, String> {
    match f32::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}

// Non-numeric tokens are kept so the converter reports them as type mismatches
fn parse_scalar(s: &str) -> Result<Scalar, String> {
    Ok(Scalar::parse(s))
}
