use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::detection::domain::detector_config::{CacheKey, DetectorConfig};
use crate::detection::domain::face_detector::DetectionError;
use crate::detection::infrastructure::cascade_model::{CascadeModel, CascadeModelError};
use crate::detection::infrastructure::haar_cascade_detector::HaarCascadeDetector;

/// Keyed cache of constructed detectors, one per configuration.
///
/// Loading and validating a cascade is the expensive step, so embedding
/// callers (a dashboard re-rendering per interaction, a server handling
/// many requests) build each detector once and share it. Entries are
/// immutable after insertion: a changed configuration maps to a new key
/// and a freshly constructed instance, never an in-place mutation.
pub struct DetectorCache {
    entries: Mutex<HashMap<CacheKey, Arc<HaarCascadeDetector>>>,
}

impl DetectorCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached detector for `config`, constructing it via
    /// `load_model` on first use.
    ///
    /// The loader runs only on a cache miss; its failure surfaces as
    /// [`DetectionError::ClassifierUnavailable`] and nothing is cached.
    pub fn get_or_build<F>(
        &self,
        config: &DetectorConfig,
        load_model: F,
    ) -> Result<Arc<HaarCascadeDetector>, DetectionError>
    where
        F: FnOnce() -> Result<CascadeModel, CascadeModelError>,
    {
        let mut entries = self.entries.lock().expect("detector cache poisoned");

        if let Some(detector) = entries.get(&config.cache_key()) {
            return Ok(Arc::clone(detector));
        }

        let model =
            load_model().map_err(|e| DetectionError::ClassifierUnavailable(Box::new(e)))?;
        let detector = Arc::new(HaarCascadeDetector::new(model, config.clone())?);
        entries.insert(config.cache_key(), Arc::clone(&detector));
        Ok(detector)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("detector cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DetectorCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::infrastructure::cascade_model::{
        CascadeStage, HaarFeature, WeightedRect,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_model() -> CascadeModel {
        CascadeModel::new(
            4,
            4,
            vec![CascadeStage {
                threshold: 0.5,
                features: vec![HaarFeature {
                    rects: vec![WeightedRect {
                        x: 0,
                        y: 0,
                        width: 4,
                        height: 4,
                        weight: 1.0,
                    }],
                    threshold: 0.0,
                    left_value: 1.0,
                    right_value: -1.0,
                }],
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_same_config_shares_one_instance() {
        let cache = DetectorCache::new();
        let config = DetectorConfig::default();

        let first = cache.get_or_build(&config, || Ok(tiny_model())).unwrap();
        let second = cache.get_or_build(&config, || Ok(tiny_model())).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_loader_runs_once_per_config() {
        let cache = DetectorCache::new();
        let config = DetectorConfig::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_build(&config, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(tiny_model())
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_changed_config_builds_new_instance() {
        let cache = DetectorCache::new();
        let a = DetectorConfig::default();
        let b = DetectorConfig {
            min_neighbors: 3,
            ..Default::default()
        };

        let first = cache.get_or_build(&a, || Ok(tiny_model())).unwrap();
        let second = cache.get_or_build(&b, || Ok(tiny_model())).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_loader_failure_surfaces_and_is_not_cached() {
        let cache = DetectorCache::new();
        let config = DetectorConfig::default();

        let result = cache.get_or_build(&config, || {
            Err(CascadeModelError::Invalid("corrupt".into()))
        });
        assert!(matches!(
            result,
            Err(DetectionError::ClassifierUnavailable(_))
        ));
        assert!(cache.is_empty());

        // A later successful load still works
        assert!(cache.get_or_build(&config, || Ok(tiny_model())).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected_before_caching() {
        let cache = DetectorCache::new();
        let bad = DetectorConfig {
            scale_factor: 1.0,
            ..Default::default()
        };
        let result = cache.get_or_build(&bad, || Ok(tiny_model()));
        assert!(matches!(result, Err(DetectionError::InvalidConfig { .. })));
        assert!(cache.is_empty());
    }
}
