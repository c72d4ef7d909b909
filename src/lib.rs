//! Pascal VOC to YOLO bounding box converter
//!
//! This library converts bounding boxes between pixel corners and normalized YOLO boxes,
//! and lays out labeled image datasets in the directory structure YOLO training expects.

pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod io;
pub mod labels;
pub mod types;
pub mod utils;
pub mod visualize;

// Re-export commonly used types and functions
pub use config::{Cli, Command, ConvertArgs, PrepareArgs, ShowArgs};
pub use convert::{center_to_corner, corner_to_center};
pub use dataset::prepare_dataset;
pub use error::{Error, Result, ValidationError};
pub use io::setup_output_directories;
pub use labels::{format_label_line, LabelMap};
pub use types::{CenterBox, CornerBox, OutputDirs, Sample, Scalar, SplitData};
pub use visualize::{render_overlay, Palette};
