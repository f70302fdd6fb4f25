pub mod detect_image_use_case;
pub mod pipeline_logger;
