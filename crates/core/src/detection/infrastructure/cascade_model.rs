use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::infrastructure::integral_image::IntegralImage;

#[derive(Error, Debug)]
pub enum CascadeModelError {
    #[error("failed to read cascade file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cascade description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid cascade: {0}")]
    Invalid(String),
}

/// One weighted rectangle of a Haar-like feature, in window coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f32,
}

/// A decision stump over a weighted rectangle sum.
///
/// Contributes `left_value` to its stage when the weighted sum falls below
/// `threshold`, `right_value` otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaarFeature {
    pub rects: Vec<WeightedRect>,
    pub threshold: f32,
    pub left_value: f32,
    pub right_value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeStage {
    pub threshold: f32,
    pub features: Vec<HaarFeature>,
}

/// A pretrained boosted cascade: ordered stages of Haar decision stumps
/// evaluated over a fixed native window.
///
/// Read-only after load; one model may back any number of concurrent
/// detectors. The staged structure exists purely for speed — most non-face
/// windows fail within the first stages and skip the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeModel {
    window_width: u32,
    window_height: u32,
    stages: Vec<CascadeStage>,
}

impl CascadeModel {
    pub fn new(
        window_width: u32,
        window_height: u32,
        stages: Vec<CascadeStage>,
    ) -> Result<Self, CascadeModelError> {
        let model = Self {
            window_width,
            window_height,
            stages,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, CascadeModelError> {
        let file = File::open(path).map_err(|e| CascadeModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, CascadeModelError> {
        let model: CascadeModel = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn window_width(&self) -> u32 {
        self.window_width
    }

    pub fn window_height(&self) -> u32 {
        self.window_height
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluates the window at `(x, y)` (native size) against every stage.
    ///
    /// A window is a hit only if it passes all stages; the first failing
    /// stage rejects it immediately.
    pub fn eval_window(&self, integral: &IntegralImage, x: u32, y: u32) -> bool {
        for stage in &self.stages {
            let mut stage_sum = 0.0f64;
            for feature in &stage.features {
                let mut feature_sum = 0.0f64;
                for rect in &feature.rects {
                    let sum = integral.rect_sum(x + rect.x, y + rect.y, rect.width, rect.height);
                    feature_sum += sum as f64 * f64::from(rect.weight);
                }
                stage_sum += if feature_sum < f64::from(feature.threshold) {
                    f64::from(feature.left_value)
                } else {
                    f64::from(feature.right_value)
                };
            }
            if stage_sum < f64::from(stage.threshold) {
                return false;
            }
        }
        true
    }

    fn validate(&self) -> Result<(), CascadeModelError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(CascadeModelError::Invalid(format!(
                "native window must be at least 1x1, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.stages.is_empty() {
            return Err(CascadeModelError::Invalid("no stages".into()));
        }
        for (si, stage) in self.stages.iter().enumerate() {
            if stage.features.is_empty() {
                return Err(CascadeModelError::Invalid(format!(
                    "stage {si} has no features"
                )));
            }
            for feature in &stage.features {
                if feature.rects.is_empty() {
                    return Err(CascadeModelError::Invalid(format!(
                        "stage {si} has a feature with no rectangles"
                    )));
                }
                for rect in &feature.rects {
                    let inside = rect.width >= 1
                        && rect.height >= 1
                        && rect.x + rect.width <= self.window_width
                        && rect.y + rect.height <= self.window_height;
                    if !inside {
                        return Err(CascadeModelError::Invalid(format!(
                            "stage {si} has a rectangle outside the {}x{} window",
                            self.window_width, self.window_height
                        )));
                    }
                    if !rect.weight.is_finite() {
                        return Err(CascadeModelError::Invalid(format!(
                            "stage {si} has a non-finite rectangle weight"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::image::GrayImage;
    use std::io::Write;

    /// Single-stage cascade over a 4x4 window: passes when the top half is
    /// darker than the bottom half by more than 400.
    fn contrast_model() -> CascadeModel {
        CascadeModel::new(
            4,
            4,
            vec![CascadeStage {
                threshold: 0.5,
                features: vec![HaarFeature {
                    rects: vec![
                        WeightedRect {
                            x: 0,
                            y: 0,
                            width: 4,
                            height: 2,
                            weight: 1.0,
                        },
                        WeightedRect {
                            x: 0,
                            y: 2,
                            width: 4,
                            height: 2,
                            weight: -1.0,
                        },
                    ],
                    threshold: -400.0,
                    left_value: 1.0,
                    right_value: -1.0,
                }],
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_eval_rejects_uniform_window() {
        let gray = GrayImage::new(vec![128u8; 16], 4, 4);
        let integral = IntegralImage::new(&gray);
        assert!(!contrast_model().eval_window(&integral, 0, 0));
    }

    #[test]
    fn test_eval_accepts_contrast_window() {
        // Top half 0, bottom half 200: feature sum = -1600 < -400.
        let mut data = vec![0u8; 8];
        data.extend_from_slice(&[200u8; 8]);
        let integral = IntegralImage::new(&GrayImage::new(data, 4, 4));
        assert!(contrast_model().eval_window(&integral, 0, 0));
    }

    #[test]
    fn test_eval_rejects_inverted_contrast() {
        // Bright top, dark bottom: feature sum is positive.
        let mut data = vec![200u8; 8];
        data.extend_from_slice(&[0u8; 8]);
        let integral = IntegralImage::new(&GrayImage::new(data, 4, 4));
        assert!(!contrast_model().eval_window(&integral, 0, 0));
    }

    #[test]
    fn test_first_failing_stage_rejects() {
        // Second stage can never pass (threshold above any reachable sum).
        let mut model = contrast_model();
        let mut stages = vec![
            model.stages[0].clone(),
            CascadeStage {
                threshold: 10.0,
                features: model.stages[0].features.clone(),
            },
        ];
        std::mem::swap(&mut model.stages, &mut stages);

        let mut data = vec![0u8; 8];
        data.extend_from_slice(&[200u8; 8]);
        let integral = IntegralImage::new(&GrayImage::new(data, 4, 4));
        assert!(!model.eval_window(&integral, 0, 0));
    }

    #[test]
    fn test_json_roundtrip() {
        let model = contrast_model();
        let json = serde_json::to_string(&model).unwrap();
        let back = CascadeModel::from_reader(json.as_bytes()).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade.json");
        let json = serde_json::to_string(&contrast_model()).unwrap();
        let mut file = File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let model = CascadeModel::load(&path).unwrap();
        assert_eq!(model.window_width(), 4);
        assert_eq!(model.stage_count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = CascadeModel::load(Path::new("/nonexistent/cascade.json"));
        assert!(matches!(result, Err(CascadeModelError::Io { .. })));
    }

    #[test]
    fn test_corrupt_json_is_parse_error() {
        let result = CascadeModel::from_reader("{not json".as_bytes());
        assert!(matches!(result, Err(CascadeModelError::Parse(_))));
    }

    #[test]
    fn test_empty_stages_rejected() {
        let result = CascadeModel::new(4, 4, vec![]);
        assert!(matches!(result, Err(CascadeModelError::Invalid(_))));
    }

    #[test]
    fn test_rect_outside_window_rejected() {
        let result = CascadeModel::new(
            4,
            4,
            vec![CascadeStage {
                threshold: 0.0,
                features: vec![HaarFeature {
                    rects: vec![WeightedRect {
                        x: 2,
                        y: 0,
                        width: 4,
                        height: 2,
                        weight: 1.0,
                    }],
                    threshold: 0.0,
                    left_value: 1.0,
                    right_value: -1.0,
                }],
            }],
        );
        assert!(matches!(result, Err(CascadeModelError::Invalid(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = CascadeModel::new(0, 4, vec![]);
        assert!(matches!(result, Err(CascadeModelError::Invalid(_))));
    }
}
