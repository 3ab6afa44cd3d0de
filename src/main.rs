use clap::Parser;
use image::{DynamicImage, ImageReader, Rgba};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use rectscan::debug::DebugDump;
use rectscan::{Detection, DetectionParameters, RectangleDetector};

#[derive(Parser)]
#[command(name = "rectscan")]
#[command(version)]
#[command(about = "Find axis-aligned rectangles in images")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Gradient threshold (10-300); lower finds weaker edges
    #[arg(long, env = "RECTSCAN_EDGE_SENSITIVITY", default_value_t = 50)]
    edge_sensitivity: u32,

    /// Smallest accepted box area in pixels (100-50000)
    #[arg(long, env = "RECTSCAN_MIN_AREA", default_value_t = 1000)]
    min_area: u32,

    /// Largest accepted long/short side ratio (1-20)
    #[arg(long, env = "RECTSCAN_MAX_ASPECT_RATIO", default_value_t = 5.0)]
    max_aspect_ratio: f64,

    /// Gaussian blur radius in pixels
    #[arg(long, default_value_t = rectscan::detection::DEFAULT_BLUR_RADIUS)]
    blur_radius: u32,

    /// Polygon simplification tolerance as a fraction of contour length
    #[arg(long, default_value_t = rectscan::detection::polygon::DEFAULT_EPSILON_RATIO)]
    epsilon: f64,

    /// Overlap ratio above which the weaker of two boxes is dropped
    #[arg(long, default_value_t = rectscan::detection::overlap::DEFAULT_OVERLAP_THRESHOLD)]
    overlap_threshold: f64,

    /// Maximum number of detections to report
    #[arg(long, default_value_t = rectscan::detection::DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Print detections as JSON
    #[arg(long)]
    json: bool,

    /// Write a copy of the image with detections outlined
    #[arg(long, value_name = "FILE")]
    annotate: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let params = DetectionParameters::new(
        args.edge_sensitivity,
        args.min_area,
        args.max_aspect_ratio,
    );
    let detector = RectangleDetector::new()
        .with_blur_radius(args.blur_radius)
        .with_epsilon_ratio(args.epsilon)
        .with_overlap_threshold(args.overlap_threshold)
        .with_max_results(args.max_results);
    if let Err(err) = detector.validate(&params) {
        for v in err.violations() {
            eprintln!("invalid parameter {}", v);
        }
        return Err(err.into());
    }

    info!(path = ?args.image_path, "loading image");
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!(width = img.width(), height = img.height(), "image loaded");

    let result = match args.debug_out {
        Some(debug_dir) => {
            let dump = DebugDump::new(debug_dir)?;
            dump.save_input(&img)?;
            let mut workspace = detector.preprocess(&img, &params)?;
            dump.save_stages(&workspace)?;
            detector.detect_prepared(&mut workspace, &params)
        }
        None => detector.detect_image(&img, &params),
    };

    let detections = match result {
        Ok(detections) => detections,
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "detection failed, reporting no rectangles");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(path) = &args.annotate {
        annotate(&img, &detections, path)?;
        info!(path = ?path, "wrote annotated image");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detections)?);
    } else {
        print_summary(&detections);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn print_summary(detections: &[Detection]) {
    println!("=== Rectangle Detection Results ===");
    println!("Total detections: {}", detections.len());

    if detections.is_empty() {
        println!("No rectangles detected.");
        return;
    }

    println!();
    for d in detections {
        println!(
            "  #{} at ({}, {}) {}x{} - area: {}, aspect: {:.2}, confidence: {:.2}, center: ({}, {})",
            d.id, d.x, d.y, d.width, d.height, d.area, d.aspect_ratio, d.confidence, d.center.x, d.center.y
        );
    }
}

fn annotate(img: &DynamicImage, detections: &[Detection], path: &Path) -> anyhow::Result<()> {
    let mut canvas = img.to_rgba8();
    let color = Rgba([255u8, 0, 0, 255]);
    for d in detections {
        let outer = Rect::at(d.x as i32, d.y as i32).of_size(d.width, d.height);
        draw_hollow_rect_mut(&mut canvas, outer, color);
        if d.width > 2 && d.height > 2 {
            let inner = Rect::at(d.x as i32 + 1, d.y as i32 + 1).of_size(d.width - 2, d.height - 2);
            draw_hollow_rect_mut(&mut canvas, inner, color);
        }
    }
    canvas
        .save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))
}
