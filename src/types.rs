use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

// Image extensions accepted by the dataset checks and the overlay renderer
pub const IMG_FORMATS: &[&str] = &["png", "jpg", "jpeg"];

pub static IMAGE_EXTENSIONS_SET: OnceLock<HashSet<String>> = OnceLock::new();

/// Get the image extensions set
pub fn get_image_extensions_set() -> &'static HashSet<String> {
    IMAGE_EXTENSIONS_SET.get_or_init(|| IMG_FORMATS.iter().map(|ext| ext.to_lowercase()).collect())
}

/// A loosely typed number as it arrives from annotation data.
///
/// Annotation files do not guarantee that a coordinate is a number at all, and the
/// center-based conversion only accepts floating point input, so the integer/float
/// distinction is kept until the converter has validated it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Scalar {
    Int(i64),
    Float(f64),
    /// Anything that is not a number, kept verbatim for error reporting.
    Other(String),
}

impl Scalar {
    /// Numeric value, if this is a number of either kind.
    pub fn to_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Int(v) => Some(v as f64),
            Scalar::Float(v) => Some(v),
            Scalar::Other(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Scalar::Float(_))
    }

    /// Parse a command-line token: integer if it parses as one, then float, otherwise kept as text.
    pub fn parse(token: &str) -> Self {
        if let Ok(v) = token.parse::<i64>() {
            Scalar::Int(v)
        } else if let Ok(v) = token.parse::<f64>() {
            Scalar::Float(v)
        } else {
            Scalar::Other(token.to_string())
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "int {}", v),
            Scalar::Float(v) => write!(f, "float {}", v),
            Scalar::Other(s) => write!(f, "non-numeric {:?}", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v as f64)
    }
}

impl From<serde_json::Value> for Scalar {
    fn from(value: serde_json::Value) -> Self {
        Scalar::from(&value)
    }
}

impl From<&serde_json::Value> for Scalar {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Scalar::Int(v)
                } else if let Some(v) = n.as_f64() {
                    Scalar::Float(v)
                } else {
                    Scalar::Other(n.to_string())
                }
            }
            other => Scalar::Other(other.to_string()),
        }
    }
}

/// Bounding box as absolute pixel corners (Pascal VOC, XYXY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CornerBox<T = f64> {
    pub x_min: T,
    pub y_min: T,
    pub x_max: T,
    pub y_max: T,
}

impl<T> CornerBox<T> {
    pub fn new(x_min: T, y_min: T, x_max: T, y_max: T) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn into_tuple(self) -> (T, T, T, T) {
        (self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

impl CornerBox<i64> {
    pub fn to_f64(self) -> CornerBox<f64> {
        CornerBox {
            x_min: self.x_min as f64,
            y_min: self.y_min as f64,
            x_max: self.x_max as f64,
            y_max: self.y_max as f64,
        }
    }
}

/// Bounding box as normalized center and extent (YOLO, XYWH).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CenterBox {
    pub x_c: f64,
    pub y_c: f64,
    pub w: f64,
    pub h: f64,
}

impl CenterBox {
    pub fn new(x_c: f64, y_c: f64, w: f64, h: f64) -> Self {
        Self { x_c, y_c, w, h }
    }

    pub fn into_tuple(self) -> (f64, f64, f64, f64) {
        (self.x_c, self.y_c, self.w, self.h)
    }
}

// One labeled object of a manifest sample; bbox is (x_min, y_min, x_max, y_max) in pixels
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ObjectAnnotation {
    pub label: String,
    pub bbox: [Scalar; 4],
}

impl ObjectAnnotation {
    pub fn corner_box(&self) -> CornerBox<Scalar> {
        let [x_min, y_min, x_max, y_max] = self.bbox.clone();
        CornerBox::new(x_min, y_min, x_max, y_max)
    }
}

// One image of a dataset manifest; sizes stay loosely typed like the box corners
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Sample {
    pub image_path: String,
    pub image_width: Scalar,
    pub image_height: Scalar,
    #[serde(default)]
    pub objects: Vec<ObjectAnnotation>,
}

/// Samples of one split, each paired with its resolved image path.
pub type SampleEntries = Vec<(PathBuf, Sample)>;

// Paths of the fixed output layout
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root_dir: PathBuf,
    pub train_labels_dir: PathBuf,
    pub val_labels_dir: PathBuf,
    pub test_labels_dir: PathBuf,
    pub train_images_dir: PathBuf,
    pub val_images_dir: PathBuf,
    pub test_images_dir: PathBuf,
}

// Samples for training, validation and testing
#[derive(Debug, Default, Clone)]
pub struct SplitData {
    pub train_samples: SampleEntries,
    pub val_samples: SampleEntries,
    pub test_samples: SampleEntries,
}

// Counters for one split
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_samples: usize,
    pub successful_samples: usize,
    pub failed_samples: usize,
    pub objects_written: usize,
    pub objects_skipped: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.total_samples += other.total_samples;
        self.successful_samples += other.successful_samples;
        self.failed_samples += other.failed_samples;
        self.objects_written += other.objects_written;
        self.objects_skipped += other.objects_skipped;
        self
    }

    pub fn print_summary(&self, split: &str) {
        log::info!("=== {} Summary ===", split);
        log::info!("Total samples processed: {}", self.total_samples);
        log::info!("Successful samples: {}", self.successful_samples);
        log::info!("Objects written: {}", self.objects_written);

        if self.objects_skipped > 0 {
            log::warn!(
                "Skipped objects with labels outside the label list: {}",
                self.objects_skipped
            );
        }
        if self.failed_samples > 0 {
            log::warn!("Failed samples: {}", self.failed_samples);
        }
    }
}
