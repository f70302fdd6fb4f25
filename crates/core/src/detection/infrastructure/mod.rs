pub mod cascade_model;
pub mod detector_cache;
pub mod haar_cascade_detector;
pub mod image_pyramid;
pub mod integral_image;
pub mod model_resolver;
