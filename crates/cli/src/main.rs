use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use facemark_core::annotation::infrastructure::outline_annotator::OutlineAnnotator;
use facemark_core::detection::domain::detector_config::{DetectorConfig, ModelVariant};
use facemark_core::detection::domain::face_detector::{DetectionError, FaceDetector};
use facemark_core::detection::infrastructure::cascade_model::CascadeModel;
use facemark_core::detection::infrastructure::haar_cascade_detector::HaarCascadeDetector;
use facemark_core::detection::infrastructure::model_resolver;
use facemark_core::io::domain::image_reader::ImageReader;
use facemark_core::io::infrastructure::image_file_reader::ImageFileReader;
use facemark_core::io::infrastructure::image_file_writer::ImageFileWriter;
use facemark_core::pipeline::detect_image_use_case::DetectImageUseCase;
use facemark_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facemark_core::shared::constants::IMAGE_EXTENSIONS;

/// Face detection and box annotation for still images.
#[derive(Parser)]
#[command(name = "facemark")]
struct Cli {
    /// Input image files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for annotated outputs.
    #[arg(long, default_value = "annotated")]
    out_dir: PathBuf,

    /// Caption every face with this label instead of the file name.
    #[arg(long)]
    label: Option<String>,

    /// Caption faces "Face 1", "Face 2", ... instead of any label.
    #[arg(long)]
    numbered: bool,

    /// Cascade variant: short-range or full-range.
    #[arg(long, default_value = "full-range")]
    model: String,

    /// Minimum confidence (0.0-1.0). The classical cascade backend reports
    /// only a fixed sentinel score, so this knob does not filter its output.
    #[arg(long, default_value = "0.6")]
    confidence: f32,

    /// Scan pyramid growth factor (must be > 1.0).
    #[arg(long, default_value = "1.1")]
    scale_factor: f32,

    /// Minimum overlapping raw hits to keep a face (0 reports every hit).
    #[arg(long, default_value = "5")]
    min_neighbors: u32,

    /// Smallest face side to report, in pixels.
    #[arg(long, default_value = "40")]
    min_size: u32,

    /// Cap on the longest image side before detection (0 disables).
    #[arg(long, default_value = "1024")]
    max_size: u32,

    /// Directory with pre-downloaded cascade files.
    #[arg(long)]
    cascade_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let reader: Box<dyn ImageReader> = if cli.max_size > 0 {
        Box::new(ImageFileReader::with_max_dimension(cli.max_size))
    } else {
        Box::new(ImageFileReader::new())
    };

    let mut use_case = DetectImageUseCase::new(
        reader,
        Box::new(ImageFileWriter::new()),
        detector,
        Box::new(OutlineAnnotator::new()),
        Box::new(StdoutPipelineLogger::new()),
    );

    let total = cli.inputs.len();
    let mut images_processed = 0usize;
    let mut total_faces = 0usize;
    let mut total_latency_ms = 0.0f64;

    for (index, input) in cli.inputs.iter().enumerate() {
        use_case.report_progress(index + 1, total);

        let label = caption_label(&cli, input);
        let output = cli.out_dir.join(input.file_name().expect("validated input path"));

        match use_case.execute(input, &output, label.as_deref()) {
            Ok(outcome) => {
                images_processed += 1;
                total_faces += outcome.regions.len();
                total_latency_ms += outcome.detect_ms + outcome.annotate_ms;
                log::info!(
                    "{}: {} faces in {:.1} ms -> {}",
                    input.display(),
                    outcome.regions.len(),
                    outcome.detect_ms + outcome.annotate_ms,
                    output.display()
                );
            }
            Err(e) => {
                log::warn!("Skipping {}: {e}", input.display());
            }
        }
    }

    use_case.finish();

    println!("Total faces:      {total_faces}");
    println!(
        "Avg latency:      {:.1} ms",
        total_latency_ms / images_processed.max(1) as f64
    );
    println!("Images processed: {images_processed}");

    if images_processed == 0 {
        return Err("No input image could be processed".into());
    }
    Ok(())
}

/// Caption for every face in one image: `--numbered` forces per-face
/// numbering, `--label` wins otherwise, and the default is a display name
/// derived from the file name.
fn caption_label(cli: &Cli, input: &Path) -> Option<String> {
    if cli.numbered {
        return None;
    }
    match &cli.label {
        Some(label) => Some(label.clone()),
        None => Some(label_from_filename(input)),
    }
}

/// Derive a display name from a file name: separators become spaces,
/// words are title-cased. `ada_lovelace.png` -> `Ada Lovelace`.
fn label_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let cleaned = stem.replace(['_', '-'], " ");

    let name = cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name
    }
}

fn build_detector(cli: &Cli) -> Result<Arc<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let variant = parse_model(&cli.model)?;
    let config = DetectorConfig {
        min_confidence: cli.confidence,
        variant,
        scale_factor: cli.scale_factor,
        min_neighbors: cli.min_neighbors,
        min_size: (cli.min_size, cli.min_size),
    };

    log::info!("Resolving cascade: {}", variant.cascade_name());
    let cascade_path = model_resolver::resolve(
        variant.cascade_name(),
        variant.cascade_url(),
        cli.cascade_dir.as_deref(),
        Some(Box::new(download_progress)),
    )
    .map_err(|e| DetectionError::ClassifierUnavailable(Box::new(e)))?;
    eprintln!();

    let model = CascadeModel::load(&cascade_path)
        .map_err(|e| DetectionError::ClassifierUnavailable(Box::new(e)))?;
    Ok(Arc::new(HaarCascadeDetector::new(model, config)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !is_image(input) {
            return Err(format!("Not a supported image file: {}", input.display()).into());
        }
    }
    if cli.label.is_some() && cli.numbered {
        return Err("--label and --numbered are mutually exclusive".into());
    }
    if cli.scale_factor <= 1.0 {
        return Err(format!(
            "Scale factor must be greater than 1.0, got {}",
            cli.scale_factor
        )
        .into());
    }
    if cli.min_size == 0 {
        return Err("Minimum face size must be at least 1 pixel".into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_model(name: &str) -> Result<ModelVariant, String> {
    match name {
        "short-range" => Ok(ModelVariant::ShortRange),
        "full-range" => Ok(ModelVariant::FullRange),
        other => Err(format!(
            "Model must be 'short-range' or 'full-range', got '{other}'"
        )),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading cascade... {pct}%");
    } else {
        eprint!("\rDownloading cascade... {downloaded} bytes");
    }
}
