use indicatif::ProgressBar;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{copy, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::PrepareArgs;
use crate::error::{Error, Result};
use crate::io::{create_dataset_yaml, setup_output_directories};
use crate::labels::{convert_to_yolo_format, LabelMap};
use crate::types::{ProcessingStats, Sample, SampleEntries, SplitData};
use crate::utils::{check_file_path, check_file_type, create_progress_bar, read_manifest};

/// Split the samples into training, validation, and testing sets
pub fn split_samples(
    samples: &mut SampleEntries,
    val_size: f32,
    test_size: f32,
    seed: u64,
) -> SplitData {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let test_size = ((samples.len() as f32 * test_size).ceil() as usize).min(samples.len());
    let val_size =
        ((samples.len() as f32 * val_size).ceil() as usize).min(samples.len() - test_size);

    let test_samples = samples.drain(0..test_size).collect();
    let val_samples = samples.drain(0..val_size).collect();
    let train_samples = std::mem::take(samples);

    SplitData {
        train_samples,
        val_samples,
        test_samples,
    }
}

/// Load the manifests named on the command line into train/val/test splits
pub fn load_splits(args: &PrepareArgs) -> Result<SplitData> {
    let mut train_samples = read_manifest(&args.train)?;
    info!(
        "Read {} samples from {}",
        train_samples.len(),
        args.train.display()
    );

    let mut split_data = match &args.val {
        Some(val) => SplitData {
            val_samples: read_manifest(val)?,
            train_samples,
            test_samples: Vec::new(),
        },
        None => {
            info!(
                "No validation manifest given, splitting {} with val_size={} test_size={}",
                args.train.display(),
                args.val_size,
                args.test_size
            );
            split_samples(&mut train_samples, args.val_size, args.test_size, args.seed)
        }
    };

    if let Some(test) = &args.test {
        split_data.test_samples.extend(read_manifest(test)?);
    }

    Ok(split_data)
}

/// Problems found in one sample
fn check_sample(image_path: &Path, sample: &Sample) -> Vec<String> {
    let mut problems = Vec::new();
    if !check_file_path(image_path) {
        problems.push(format!("file does not exist at {}", image_path.display()));
    }
    if !check_file_type(image_path) {
        problems.push(format!(
            "{} does not have an image extension",
            image_path.display()
        ));
    }
    for (idx, object) in sample.objects.iter().enumerate() {
        if let Err(e) = object
            .corner_box()
            .to_center(sample.image_width.clone(), sample.image_height.clone())
        {
            problems.push(format!("object {} ({}): {}", idx, object.label, e));
        }
    }
    problems
}

/// Sanitized file stem shared by the copied image and its label file
pub fn output_stem(image_path: &Path) -> Result<String> {
    let stem = image_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::Argument(format!("invalid image path {}", image_path.display())))?;
    Ok(sanitize_filename::sanitize(stem))
}

/// Check one split; every problem is logged before the split is rejected.
///
/// Two samples of a split that would be written under the same output name are
/// rejected too, since the parallel copy would keep only one of them.
pub fn check_dataset(name: &str, samples: &SampleEntries) -> Result<()> {
    let mut output_names: HashMap<String, &Path> = HashMap::with_capacity(samples.len());
    let mut bad_samples = 0;

    for (image_path, sample) in samples {
        let mut problems = check_sample(image_path, sample);
        match output_stem(image_path) {
            Ok(stem) => match output_names.entry(stem) {
                Entry::Occupied(first) => problems.push(format!(
                    "output name {:?} is already used by {}",
                    first.key(),
                    first.get().display()
                )),
                Entry::Vacant(slot) => {
                    slot.insert(image_path.as_path());
                }
            },
            Err(e) => problems.push(e.to_string()),
        }

        for problem in &problems {
            error!("[{}] {}: {}", name, sample.image_path, problem);
        }
        if !problems.is_empty() {
            bad_samples += 1;
        }
    }

    if bad_samples > 0 {
        return Err(Error::InvalidDataset {
            split: name.to_string(),
            bad_samples,
        });
    }
    Ok(())
}

/// Check all three splits, stopping at the first invalid one
pub fn check_datasets(split_data: &SplitData) -> Result<()> {
    info!("Checking dataset...");
    check_dataset("train", &split_data.train_samples)?;
    check_dataset("val", &split_data.val_samples)?;
    check_dataset("test", &split_data.test_samples)?;
    info!("All samples passed the checks.");
    Ok(())
}

/// Copy one image and write its label file; returns the label counters for the sample
pub fn process_sample(
    image_path: &Path,
    sample: &Sample,
    labels_dir: &Path,
    images_dir: &Path,
    label_map: &LabelMap,
) -> Result<(usize, usize)> {
    let labels = convert_to_yolo_format(sample, label_map)?;

    let stem = output_stem(image_path)?;

    // The stem may itself contain dots, so the extension is appended, never swapped in
    let image_output_path = match image_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => images_dir.join(format!("{}.{}", stem, ext)),
        None => images_dir.join(&stem),
    };
    copy(image_path, &image_output_path)?;

    let label_output_path = labels_dir.join(format!("{}.txt", stem));
    let mut writer = BufWriter::new(File::create(&label_output_path)?);
    writer.write_all(labels.content.as_bytes())?;
    writer.flush()?;

    Ok((labels.written, labels.skipped))
}

/// Process the samples of one split in parallel
pub fn process_samples_in_parallel(
    samples: &SampleEntries,
    labels_dir: &Path,
    images_dir: &Path,
    label_map: &LabelMap,
    pb: &ProgressBar,
) -> ProcessingStats {
    samples
        .par_iter()
        .map(|(image_path, sample)| {
            let mut stats = ProcessingStats::new();
            stats.total_samples = 1;
            match process_sample(image_path, sample, labels_dir, images_dir, label_map) {
                Ok((written, skipped)) => {
                    stats.successful_samples = 1;
                    stats.objects_written = written;
                    stats.objects_skipped = skipped;
                }
                Err(e) => {
                    error!("Failed to process sample {}: {}", image_path.display(), e);
                    stats.failed_samples = 1;
                }
            }
            pb.inc(1);
            stats
        })
        .reduce(ProcessingStats::new, ProcessingStats::merge)
}

/// Main dataset preparation pipeline
pub fn prepare_dataset(args: &PrepareArgs) -> Result<()> {
    let split_data = load_splits(args)?;
    check_datasets(&split_data)?;

    let label_map = if args.label_list.is_empty() {
        LabelMap::from_samples([
            &split_data.train_samples,
            &split_data.val_samples,
            &split_data.test_samples,
        ])
    } else {
        LabelMap::from_label_list(&args.label_list)
    };
    info!("Using {} labels.", label_map.len());

    let output_dirs = setup_output_directories(&args.output)?;

    let splits = [
        (
            "Train",
            &split_data.train_samples,
            &output_dirs.train_labels_dir,
            &output_dirs.train_images_dir,
        ),
        (
            "Val",
            &split_data.val_samples,
            &output_dirs.val_labels_dir,
            &output_dirs.val_images_dir,
        ),
        (
            "Test",
            &split_data.test_samples,
            &output_dirs.test_labels_dir,
            &output_dirs.test_images_dir,
        ),
    ];

    let mut failed = 0;
    for (name, samples, labels_dir, images_dir) in splits {
        if samples.is_empty() {
            warn!("{} split is empty.", name);
            continue;
        }
        let pb = create_progress_bar(samples.len() as u64, name);
        let stats = process_samples_in_parallel(samples, labels_dir, images_dir, &label_map, &pb);
        pb.finish_with_message(format!("{} processing complete", name));
        stats.print_summary(name);
        failed += stats.failed_samples;
    }

    info!("Creating dataset.yaml file...");
    create_dataset_yaml(&output_dirs, &label_map, !split_data.test_samples.is_empty())?;

    if failed > 0 {
        warn!("{} sample(s) could not be processed.", failed);
    }
    info!("Dataset written to {}", output_dirs.root_dir.display());
    Ok(())
}
