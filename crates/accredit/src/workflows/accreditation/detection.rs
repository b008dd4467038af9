//! Image findings: loading oracle output and selecting confident detections.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::domain::{ImageFinding, ImageFindings};
use super::extraction::ExtractionError;

/// Embedded images smaller than this are icons or logos, not photographs.
pub const MIN_IMAGE_BYTES: usize = 15_000;
/// A model must be more confident than this (0..=1) for its label to count.
pub const MIN_MODEL_CONFIDENCE: f64 = 0.35;

/// Per-category detection models run over a single image.
pub trait ImageClassifier: Send + Sync {
    /// Best confidence (0..=1) each model reports for the image, keyed by category label.
    fn confidences(&self, image: &[u8]) -> Vec<(String, f64)>;
}

/// Pick the category whose model is confident and strictly ahead of every other model.
///
/// Ties and low-confidence images yield no finding; nothing is invented to fill the gap.
pub fn select_category(candidates: &[(String, f64)]) -> Option<ImageFinding> {
    let (best_index, (category, confidence)) = candidates
        .iter()
        .enumerate()
        .max_by(|(_, (_, left)), (_, (_, right))| left.total_cmp(right))?;

    if *confidence <= MIN_MODEL_CONFIDENCE {
        return None;
    }

    let contested = candidates
        .iter()
        .enumerate()
        .any(|(index, (_, other))| index != best_index && other >= confidence);
    if contested {
        return None;
    }

    Some(ImageFinding::new(category.clone(), confidence * 100.0))
}

/// Classify every photograph-sized image, in order.
pub fn detect_images<C, I, B>(classifier: &C, images: I) -> ImageFindings
where
    C: ImageClassifier + ?Sized,
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut findings = ImageFindings::default();

    for (index, image) in images.into_iter().enumerate() {
        let bytes = image.as_ref();
        if bytes.len() < MIN_IMAGE_BYTES {
            debug!(index, size = bytes.len(), "skipping icon-sized image");
            continue;
        }

        match select_category(&classifier.confidences(bytes)) {
            Some(finding) => {
                debug!(
                    index,
                    category = %finding.category,
                    confidence = finding.confidence,
                    "image classified"
                );
                findings.push(finding);
            }
            None => debug!(index, "no confident match for image"),
        }
    }

    findings
}

/// Read oracle output: a JSON array of `{ "category" | "type", "confidence" }` objects.
pub fn findings_from_reader<R: Read>(reader: R) -> Result<ImageFindings, ExtractionError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn findings_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFindings, ExtractionError> {
    let file = std::fs::File::open(path)?;
    findings_from_reader(std::io::BufReader::new(file))
}
