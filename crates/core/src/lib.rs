//! Face detection and annotation pipeline.
//!
//! One linear flow per image: normalize (grayscale + histogram
//! equalization), scan a multi-scale pyramid with a pretrained cascade,
//! suppress duplicate hits by neighbor count, and render the surviving
//! regions as outlined, captioned boxes on a copy of the original.
//!
//! The library exposes two operations to callers: detection
//! ([`detection::domain::face_detector::FaceDetector`]) and annotation
//! ([`annotation::domain::face_annotator::FaceAnnotator`]). Everything
//! else — file decoding, downscale policy, metric display — belongs to
//! the calling layer (see the `facemark` CLI).

pub mod annotation;
pub mod detection;
pub mod io;
pub mod pipeline;
pub mod shared;
