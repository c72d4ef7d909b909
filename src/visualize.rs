//! Draw CornerBox outlines onto images for visual inspection of a dataset.

use image::{Rgb, RgbImage};
use log::info;
use std::path::Path;

use crate::convert::check_numeric;
use crate::error::{Error, Result, ValidationError};
use crate::labels::LabelMap;
use crate::types::{CornerBox, ObjectAnnotation, Sample};
use crate::utils::{check_file_path, check_file_type};

const DEFAULT_COLORS: [[u8; 3]; 10] = [
    [31, 119, 180],  // blue
    [255, 127, 14],  // orange
    [44, 160, 44],   // green
    [214, 39, 40],   // red
    [148, 103, 189], // purple
    [140, 86, 75],   // brown
    [227, 119, 194], // pink
    [127, 127, 127], // gray
    [188, 189, 34],  // olive
    [23, 190, 207],  // cyan
];

/// Class index to outline color. Indices past the end wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|&c| Rgb(c)).collect(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Rgb<u8>>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::Argument("palette needs at least one color".into()));
        }
        Ok(Self { colors })
    }

    pub fn color(&self, class_id: usize) -> Rgb<u8> {
        self.colors[class_id % self.colors.len()]
    }
}

/// Pixel corners of an object, as floats
pub fn pixel_box(object: &ObjectAnnotation) -> Result<CornerBox<f64>, ValidationError> {
    let [x_min, y_min, x_max, y_max] = &object.bbox;
    Ok(CornerBox::new(
        check_numeric(x_min, "x_min must be float or int")?,
        check_numeric(y_min, "y_min must be float or int")?,
        check_numeric(x_max, "x_max must be float or int")?,
        check_numeric(y_max, "y_max must be float or int")?,
    ))
}

// Fill [x0, x1) x [y0, y1), clipped to the image
fn fill_rect(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    for y in y0.max(0)..y1.min(height) {
        for x in x0.max(0)..x1.min(width) {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

// Pixel coordinate limited to [-margin, limit + margin]; NaN becomes 0
fn clamp_coord(value: f64, limit: u32, margin: i64) -> i64 {
    value.clamp((-margin) as f64, (limit as i64 + margin) as f64) as i64
}

/// Draw one outline per box in the color of its class
pub fn draw_boxes(
    image: &mut RgbImage,
    boxes: &[CornerBox<f64>],
    class_ids: &[usize],
    palette: &Palette,
    thickness: u32,
) -> Result<()> {
    if boxes.len() != class_ids.len() {
        return Err(Error::Argument(format!(
            "length of bounding boxes ({}) and classes ({}) do not match",
            boxes.len(),
            class_ids.len()
        )));
    }

    let t = thickness.max(1) as i64;
    // An edge clamped past the margin is still entirely outside the image
    let margin = t + 1;
    let (width, height) = (image.width(), image.height());
    for (rect, &class_id) in boxes.iter().zip(class_ids) {
        let color = palette.color(class_id);
        let l = clamp_coord(rect.x_min, width, margin);
        let t0 = clamp_coord(rect.y_min, height, margin);
        let r = clamp_coord(rect.x_max, width, margin);
        let b = clamp_coord(rect.y_max, height, margin);

        fill_rect(image, l, t0, r + 1, t0 + t, color);
        fill_rect(image, l, b - t + 1, r + 1, b + 1, color);
        fill_rect(image, l, t0, l + t, b + 1, color);
        fill_rect(image, r - t + 1, t0, r + 1, b + 1, color);
    }
    Ok(())
}

/// Load an image, draw the boxes and save the result to a new file
pub fn render_overlay(
    image_path: &Path,
    boxes: &[CornerBox<f64>],
    class_ids: &[usize],
    palette: &Palette,
    thickness: u32,
    save_path: &Path,
) -> Result<()> {
    if !check_file_path(image_path) {
        return Err(Error::Argument(format!(
            "file does not exist at {}",
            image_path.display()
        )));
    }
    if !check_file_type(image_path) {
        return Err(Error::Argument(format!(
            "{} does not have an image extension",
            image_path.display()
        )));
    }
    if save_path.exists() {
        return Err(Error::Argument(format!(
            "there is a file with the same name at {}",
            save_path.display()
        )));
    }

    let mut image = image::open(image_path)?.to_rgb8();
    draw_boxes(&mut image, boxes, class_ids, palette, thickness)?;
    image.save(save_path)?;
    info!("Saved overlay to {}", save_path.display());
    Ok(())
}

/// Render every object of a sample; labels outside the map are drawn with class 0
pub fn render_sample(
    image_path: &Path,
    sample: &Sample,
    label_map: &LabelMap,
    palette: &Palette,
    thickness: u32,
    save_path: &Path,
) -> Result<()> {
    let boxes = sample
        .objects
        .iter()
        .map(pixel_box)
        .collect::<Result<Vec<_>, _>>()?;
    let class_ids: Vec<usize> = sample
        .objects
        .iter()
        .map(|object| label_map.get(&object.label).unwrap_or(0))
        .collect();
    render_overlay(image_path, &boxes, &class_ids, palette, thickness, save_path)
}
