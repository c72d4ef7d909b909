//! YOLO label files: one `class_id x_c y_c w h` line per object.

use log::warn;
use std::collections::{BTreeSet, HashMap};

use crate::error::ValidationError;
use crate::types::{CenterBox, Sample, SampleEntries};

/// Mapping from label name to YOLO class id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    ids: HashMap<String, usize>,
}

impl LabelMap {
    /// Ids follow the order of the given list.
    pub fn from_label_list(labels: &[String]) -> Self {
        let mut ids = HashMap::with_capacity(labels.len());
        for label in labels {
            let next_id = ids.len();
            ids.entry(label.clone()).or_insert(next_id);
        }
        Self { ids }
    }

    /// Ids follow the alphabetical order of every label found in the samples.
    pub fn from_samples<'a, I>(splits: I) -> Self
    where
        I: IntoIterator<Item = &'a SampleEntries>,
    {
        let labels: BTreeSet<&str> = splits
            .into_iter()
            .flat_map(|entries| entries.iter())
            .flat_map(|(_, sample)| sample.objects.iter())
            .map(|object| object.label.as_str())
            .collect();

        Self {
            ids: labels
                .into_iter()
                .enumerate()
                .map(|(id, label)| (label.to_string(), id))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn sorted_by_id(&self) -> Vec<(usize, &str)> {
        let mut sorted: Vec<_> = self
            .ids
            .iter()
            .map(|(label, &id)| (id, label.as_str()))
            .collect();
        sorted.sort_unstable();
        sorted
    }
}

/// Format one label line with six decimals per coordinate.
pub fn format_label_line(class_id: usize, center: &CenterBox) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        class_id, center.x_c, center.y_c, center.w, center.h
    )
}

/// Label file content for one sample
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SampleLabels {
    pub content: String,
    pub written: usize,
    pub skipped: usize,
}

/// Convert every object of a sample to YOLO label lines.
///
/// Objects whose label is missing from the map are skipped. The first box that fails
/// validation aborts the whole sample.
pub fn convert_to_yolo_format(
    sample: &Sample,
    label_map: &LabelMap,
) -> Result<SampleLabels, ValidationError> {
    let mut labels = SampleLabels {
        content: String::with_capacity(sample.objects.len() * 48),
        ..Default::default()
    };

    for object in &sample.objects {
        let class_id = match label_map.get(&object.label) {
            Some(class_id) => class_id,
            None => {
                warn!(
                    "Label {:?} of {} is not in the label list, skipping it",
                    object.label, sample.image_path
                );
                labels.skipped += 1;
                continue;
            }
        };

        let center = object
            .corner_box()
            .to_center(sample.image_width.clone(), sample.image_height.clone())?;
        labels.content.push_str(&format_label_line(class_id, &center));
        labels.content.push('\n');
        labels.written += 1;
    }

    Ok(labels)
}
