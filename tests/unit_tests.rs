use approx::assert_relative_eq;
use image::RgbImage;
use std::fs;
use std::path::Path;

use voc2yolo::{
    center_to_corner, corner_to_center, prepare_dataset, CornerBox, Error, PrepareArgs, Scalar,
    ValidationError,
};

// Power-of-two image sizes keep every intermediate value exactly representable
const WIDTH: i64 = 512;
const HEIGHT: i64 = 256;

#[test]
fn test_reference_round_trip() {
    let center = corner_to_center(100, 50, 300, 200, 500, 400).unwrap();
    assert_eq!(center.into_tuple(), (0.4, 0.3125, 0.4, 0.375));

    let (x_c, y_c, w, h) = center.into_tuple();
    let corners = center_to_corner(x_c, y_c, w, h, 500, 400).unwrap();
    assert_eq!(corners.into_tuple(), (100, 50, 300, 200));
}

#[test]
fn test_valid_corners_give_normalized_values() {
    for x_min in (0..WIDTH).step_by(37) {
        for x_max in (x_min + 1..=WIDTH - x_min).step_by(29) {
            for (y_min, y_max) in [(0, 1), (0, HEIGHT), (17, 90), (100, 156)] {
                let center = corner_to_center(x_min, y_min, x_max, y_max, WIDTH, HEIGHT).unwrap();
                for value in [center.x_c, center.y_c, center.w, center.h] {
                    assert!(
                        (0.0..=1.0).contains(&value),
                        "{:?} from {:?}",
                        center,
                        (x_min, y_min, x_max, y_max)
                    );
                }
            }
        }
    }
}

#[test]
fn test_integer_round_trip_is_exact() {
    // center_to_corner requires x_c >= w, i.e. x_max <= 3 * x_min
    for x_min in (1..WIDTH / 2).step_by(11) {
        for x_max in (x_min + 1..=(3 * x_min).min(WIDTH - x_min)).step_by(7) {
            for (y_min, y_max) in [(0, 10), (3, 250), (64, 128), (120, 136)] {
                let corners = CornerBox::new(x_min, y_min, x_max, y_max);
                let center = corners.to_center(WIDTH, HEIGHT).unwrap();
                let back = center.to_corner(WIDTH, HEIGHT).unwrap();
                assert_eq!(back, corners, "via {:?}", center);
            }
        }
    }
}

#[test]
fn test_real_round_trip_truncates() {
    let cases: [(f64, f64, f64, f64); 3] = [
        (100.5, 50.25, 300.75, 200.5),
        (10.25, 0.75, 29.5, 1.5),
        (64.75, 120.125, 190.5, 135.875),
    ];
    for (x_min, y_min, x_max, y_max) in cases {
        let center = corner_to_center(x_min, y_min, x_max, y_max, WIDTH, HEIGHT).unwrap();
        let back = center.to_corner(WIDTH, HEIGHT).unwrap();
        assert_eq!(
            back.into_tuple(),
            (
                x_min.trunc() as i64,
                y_min.trunc() as i64,
                x_max.trunc() as i64,
                y_max.trunc() as i64
            )
        );
    }
}

#[test]
fn test_full_image_box() {
    let center = corner_to_center(0, 0, 1920, 1080, 1920, 1080).unwrap();
    assert_relative_eq!(center.x_c, 0.5);
    assert_relative_eq!(center.y_c, 0.5);
    assert_relative_eq!(center.w, 1.0);
    assert_relative_eq!(center.h, 1.0);
}

#[test]
fn test_negative_input_fails() {
    let err = corner_to_center(-1, 0, 10, 10, 100, 100).unwrap_err();
    assert!(matches!(err, ValidationError::OutOfRange { .. }));

    let err = corner_to_center(0.0, -0.5, 10.0, 10.0, 100.0, 100.0).unwrap_err();
    assert_eq!(err.constraint(), "y_min >= 0");
}

#[test]
fn test_zero_width_always_invalid_image_size() {
    let inputs: [(Scalar, Scalar, Scalar, Scalar); 3] = [
        (Scalar::Int(0), Scalar::Int(0), Scalar::Int(10), Scalar::Int(10)),
        (Scalar::Int(-3), Scalar::Float(7.5), Scalar::Float(1.0e12), Scalar::Int(0)),
        (Scalar::Int(1), Scalar::Int(1), Scalar::Int(2), Scalar::Int(2)),
    ];
    for (a, b, c, d) in inputs {
        let err = corner_to_center(a, b, c, d, 0, 100).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidImageSize { .. }),
            "{:?}",
            err
        );
    }
}

#[test]
fn test_out_of_range_center_fails_first() {
    // x_c is out of range and the geometry would also fail
    let err = center_to_corner(1.5, 0.5, 0.9, 0.9, 500, 400).unwrap_err();
    assert_eq!(
        err,
        ValidationError::OutOfRange {
            constraint: "0.0 <= x_c <= 1.0",
            value: 1.5
        }
    );
}

#[test]
fn test_validation_error_message_names_constraint() {
    let err = corner_to_center(300, 0, 400, 10, 500, 400).unwrap_err();
    assert_eq!(
        err.to_string(),
        "geometry violation: x_min + x_max <= image_width (got 700)"
    );
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::new(width, height).save(path).unwrap();
}

fn prepare_args(dir: &Path, val: bool, label_list: Vec<String>) -> PrepareArgs {
    PrepareArgs {
        train: dir.join("train.json"),
        val: val.then(|| dir.join("val.json")),
        test: None,
        output: dir.join("out"),
        val_size: 0.2,
        test_size: 0.0,
        seed: 42,
        label_list,
    }
}

#[test]
fn test_prepare_dataset_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("images")).unwrap();
    write_png(&dir.join("images/a.png"), 500, 400);
    write_png(&dir.join("images/b.png"), 500, 400);

    fs::write(
        dir.join("train.json"),
        r#"[{"image_path": "images/a.png", "image_width": 500, "image_height": 400,
             "objects": [{"label": "cat", "bbox": [100, 50, 300, 200]}]}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("val.json"),
        r#"[{"image_path": "images/b.png", "image_width": 500, "image_height": 400,
             "objects": [{"label": "dog", "bbox": [0, 0, 100, 100]}]}]"#,
    )
    .unwrap();

    prepare_dataset(&prepare_args(dir, true, Vec::new())).unwrap();

    let root = dir.join("out/data/dataset");
    assert!(root.join("images/train/a.png").is_file());
    assert!(root.join("images/val/b.png").is_file());
    assert!(root.join("images/test").is_dir());
    assert_eq!(
        fs::read_to_string(root.join("labels/train/a.txt")).unwrap(),
        "0 0.400000 0.312500 0.400000 0.375000\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("labels/val/b.txt")).unwrap(),
        "1 0.100000 0.125000 0.200000 0.250000\n"
    );

    let yaml = fs::read_to_string(root.join("dataset.yaml")).unwrap();
    assert!(yaml.contains("test:\n"));
    assert!(yaml.contains("    0: cat\n    1: dog\n"));
}

#[test]
fn test_prepare_dataset_with_label_list_skips_unknown_labels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    write_png(&dir.join("a.png"), 100, 100);
    fs::write(
        dir.join("train.json"),
        r#"[{"image_path": "a.png", "image_width": 100, "image_height": 100,
             "objects": [{"label": "cat", "bbox": [10, 10, 20, 20]},
                         {"label": "dog", "bbox": [20, 20, 40, 40]}]}]"#,
    )
    .unwrap();

    let mut args = prepare_args(dir, false, vec!["dog".to_string()]);
    args.val_size = 0.0;
    prepare_dataset(&args).unwrap();

    let label = fs::read_to_string(dir.join("out/data/dataset/labels/train/a.txt")).unwrap();
    assert_eq!(label, "0 0.300000 0.300000 0.200000 0.200000\n");
}

#[test]
fn test_prepare_dataset_rejects_invalid_boxes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    write_png(&dir.join("a.png"), 100, 100);
    fs::write(
        dir.join("train.json"),
        r#"[{"image_path": "a.png", "image_width": 100, "image_height": 100,
             "objects": [{"label": "cat", "bbox": [-1, 10, 20, 20]}]}]"#,
    )
    .unwrap();

    let mut args = prepare_args(dir, false, Vec::new());
    args.val_size = 0.0;
    let err = prepare_dataset(&args).unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidDataset { ref split, bad_samples: 1 } if split == "train"
    ));
    assert!(!dir.join("out").exists());
}

#[test]
fn test_prepare_dataset_keeps_dotted_stems_apart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    write_png(&dir.join("x.v1.png"), 100, 100);
    write_png(&dir.join("x.v2.png"), 100, 100);
    fs::write(
        dir.join("train.json"),
        r#"[{"image_path": "x.v1.png", "image_width": 100, "image_height": 100,
             "objects": [{"label": "cat", "bbox": [10, 10, 20, 20]}]},
            {"image_path": "x.v2.png", "image_width": 100.0, "image_height": 100.0,
             "objects": [{"label": "cat", "bbox": [20, 20, 40, 40]}]}]"#,
    )
    .unwrap();

    let mut args = prepare_args(dir, false, Vec::new());
    args.val_size = 0.0;
    prepare_dataset(&args).unwrap();

    let root = dir.join("out/data/dataset");
    let mut labels: Vec<_> = fs::read_dir(root.join("labels/train"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    labels.sort();
    assert_eq!(labels, vec!["x.v1.txt", "x.v2.txt"]);
    assert!(root.join("images/train/x.v1.png").is_file());
    assert!(root.join("images/train/x.v2.png").is_file());
    assert_eq!(
        fs::read_to_string(root.join("labels/train/x.v2.txt")).unwrap(),
        "0 0.300000 0.300000 0.200000 0.200000\n"
    );
}

#[test]
fn test_prepare_dataset_rejects_colliding_output_names() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("a")).unwrap();
    fs::create_dir_all(dir.join("b")).unwrap();
    write_png(&dir.join("a/img.png"), 100, 100);
    write_png(&dir.join("b/img.png"), 100, 100);
    fs::write(
        dir.join("train.json"),
        r#"[{"image_path": "a/img.png", "image_width": 100, "image_height": 100},
            {"image_path": "b/img.png", "image_width": 100, "image_height": 100}]"#,
    )
    .unwrap();

    let mut args = prepare_args(dir, false, Vec::new());
    args.val_size = 0.0;
    let err = prepare_dataset(&args).unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidDataset { ref split, bad_samples: 1 } if split == "train"
    ));
    assert!(!dir.join("out").exists());
}
