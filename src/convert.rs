//! Conversion between Pascal VOC corners (XYXY, pixels) and YOLO boxes (XYWH, normalized).
//!
//! Both conversions validate every argument before any arithmetic and fail on the first
//! violated precondition.

use crate::error::ValidationError;
use crate::types::{CenterBox, CornerBox, Scalar};

/// Require a number of either kind and return its value.
pub fn check_numeric(value: &Scalar, constraint: &'static str) -> Result<f64, ValidationError> {
    value
        .to_f64()
        .ok_or_else(|| ValidationError::TypeMismatch {
            constraint,
            found: value.to_string(),
        })
}

/// Require a floating point number and return its value.
pub fn check_float(value: &Scalar, constraint: &'static str) -> Result<f64, ValidationError> {
    match *value {
        Scalar::Float(v) => Ok(v),
        _ => Err(ValidationError::TypeMismatch {
            constraint,
            found: value.to_string(),
        }),
    }
}

pub fn check_non_negative(value: f64, constraint: &'static str) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { constraint, value })
    }
}

pub fn check_normalized_range(value: f64, constraint: &'static str) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { constraint, value })
    }
}

/// Require a positive image dimension and return its value.
pub fn check_image_size(value: &Scalar, constraint: &'static str) -> Result<f64, ValidationError> {
    let size = value
        .to_f64()
        .ok_or_else(|| ValidationError::TypeMismatch {
            constraint,
            found: value.to_string(),
        })?;
    if size > 0.0 {
        Ok(size)
    } else {
        Err(ValidationError::InvalidImageSize {
            constraint,
            value: size,
        })
    }
}

fn check_geometry(
    holds: bool,
    constraint: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if holds {
        Ok(())
    } else {
        Err(ValidationError::GeometryViolation { constraint, value })
    }
}

/// Convert pixel corners to a normalized center box.
///
/// Corners may be integers or floats. The geometry check bounds `x_min + x_max` by the
/// image width (and likewise for y), not `x_max` alone.
pub fn corner_to_center(
    x_min: impl Into<Scalar>,
    y_min: impl Into<Scalar>,
    x_max: impl Into<Scalar>,
    y_max: impl Into<Scalar>,
    image_width: impl Into<Scalar>,
    image_height: impl Into<Scalar>,
) -> Result<CenterBox, ValidationError> {
    let x_min = check_numeric(&x_min.into(), "x_min must be float or int")?;
    let y_min = check_numeric(&y_min.into(), "y_min must be float or int")?;
    let x_max = check_numeric(&x_max.into(), "x_max must be float or int")?;
    let y_max = check_numeric(&y_max.into(), "y_max must be float or int")?;

    let image_width = check_image_size(&image_width.into(), "image_width > 0")?;
    let image_height = check_image_size(&image_height.into(), "image_height > 0")?;

    check_non_negative(x_min, "x_min >= 0")?;
    check_non_negative(y_min, "y_min >= 0")?;
    check_non_negative(x_max, "x_max >= 0")?;
    check_non_negative(y_max, "y_max >= 0")?;

    // Bounds the sum of the corners, not x_max alone.
    check_geometry(
        x_min + x_max <= image_width,
        "x_min + x_max <= image_width",
        x_min + x_max,
    )?;
    check_geometry(
        y_min + y_max <= image_height,
        "y_min + y_max <= image_height",
        y_min + y_max,
    )?;

    Ok(CenterBox {
        x_c: (x_max + x_min) / (2.0 * image_width),
        y_c: (y_max + y_min) / (2.0 * image_height),
        w: (x_max - x_min) / image_width,
        h: (y_max - y_min) / image_height,
    })
}

/// Convert a normalized center box to pixel corners, truncating toward zero.
///
/// The center box values must be floats in `[0.0, 1.0]`. Truncation makes the round trip
/// from corners lossy for corners that are not integer aligned.
pub fn center_to_corner(
    x_c: impl Into<Scalar>,
    y_c: impl Into<Scalar>,
    w: impl Into<Scalar>,
    h: impl Into<Scalar>,
    image_width: impl Into<Scalar>,
    image_height: impl Into<Scalar>,
) -> Result<CornerBox<i64>, ValidationError> {
    let x_c = check_float(&x_c.into(), "x_c must be float")?;
    let y_c = check_float(&y_c.into(), "y_c must be float")?;
    let w = check_float(&w.into(), "w must be float")?;
    let h = check_float(&h.into(), "h must be float")?;

    let image_width = check_image_size(&image_width.into(), "image_width > 0")?;
    let image_height = check_image_size(&image_height.into(), "image_height > 0")?;

    check_normalized_range(x_c, "0.0 <= x_c <= 1.0")?;
    check_normalized_range(y_c, "0.0 <= y_c <= 1.0")?;
    check_normalized_range(w, "0.0 <= w <= 1.0")?;
    check_normalized_range(h, "0.0 <= h <= 1.0")?;

    check_geometry(x_c + w <= image_width, "x_c + w <= image_width", x_c + w)?;
    check_geometry(x_c - w >= 0.0, "x_c - w >= 0.0", x_c - w)?;
    check_geometry(y_c + h <= image_height, "y_c + h <= image_height", y_c + h)?;
    // TODO: confirm whether "y_c - h >= 0.0" should be enforced like its x counterpart.

    let half_w = w * image_width / 2.0;
    let half_h = h * image_height / 2.0;

    Ok(CornerBox {
        x_min: (x_c * image_width - half_w).trunc() as i64,
        y_min: (y_c * image_height - half_h).trunc() as i64,
        x_max: (x_c * image_width + half_w).trunc() as i64,
        y_max: (y_c * image_height + half_h).trunc() as i64,
    })
}

impl<T> CornerBox<T>
where
    T: Clone + Into<Scalar>,
{
    pub fn to_center(
        &self,
        image_width: impl Into<Scalar>,
        image_height: impl Into<Scalar>,
    ) -> Result<CenterBox, ValidationError> {
        corner_to_center(
            self.x_min.clone(),
            self.y_min.clone(),
            self.x_max.clone(),
            self.y_max.clone(),
            image_width,
            image_height,
        )
    }
}

impl CenterBox {
    pub fn to_corner(
        &self,
        image_width: impl Into<Scalar>,
        image_height: impl Into<Scalar>,
    ) -> Result<CornerBox<i64>, ValidationError> {
        center_to_corner(self.x_c, self.y_c, self.w, self.h, image_width, image_height)
    }
}
