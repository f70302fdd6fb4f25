pub mod detection_window;
pub mod detector_config;
pub mod face_detector;
pub mod normalizer;
pub mod window_grouper;
