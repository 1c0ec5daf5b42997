//! File-level glue around the detector: discovering inputs, decoding them,
//! and writing labelled/debug images next to the per-image results.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageReader, RgbImage};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::detection::label::Labeller;
use crate::detection::ShapeDetector;
use crate::error::{Result, ShapeError};
use crate::models::ShapeRecord;

/// File extensions picked up when scanning a directory
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Result for one input file
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<ShapeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labelled: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageReport {
    fn new(path: &Path, img: &RgbImage, shapes: Vec<ShapeRecord>) -> Self {
        Self {
            path: path.to_path_buf(),
            width: img.width(),
            height: img.height(),
            shapes,
            labelled: None,
            error: None,
        }
    }

    fn failed(path: &Path, err: &ShapeError) -> Self {
        Self {
            path: path.to_path_buf(),
            width: 0,
            height: 0,
            shapes: Vec::new(),
            labelled: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Optional outputs written while running a batch
#[derive(Default)]
pub struct BatchOptions {
    /// Directory for annotated copies of the inputs
    pub labelled_out: Option<PathBuf>,
    /// Directory for the intermediate edge maps
    pub debug_out: Option<PathBuf>,
    pub labeller: Labeller,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub reports: Vec<ImageReport>,
}

impl BatchSummary {
    pub fn failures(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_ok()).count()
    }

    pub fn total_shapes(&self) -> usize {
        self.reports.iter().map(|r| r.shapes.len()).sum()
    }
}

/// Image files directly inside `dir`, in natural order
/// (`test_image_2.png` sorts before `test_image_10.png`)
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| natural_cmp(a, b));
    debug!("Found {} images in {}", paths.len(), dir.display());
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NameChunk {
    Number(u64),
    Text(String),
}

fn name_chunks(name: &str) -> Vec<NameChunk> {
    let mut chunks = Vec::new();
    let mut rest = name;

    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);

        match chunk.parse::<u64>() {
            Ok(n) if is_digit => chunks.push(NameChunk::Number(n)),
            _ => chunks.push(NameChunk::Text(chunk.to_lowercase())),
        }
        rest = tail;
    }

    chunks
}

fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let (name_a, name_b) = (name(a), name(b));
    name_chunks(&name_a)
        .cmp(&name_chunks(&name_b))
        .then_with(|| name_a.cmp(&name_b))
}

/// Decode any supported image file into an RGB buffer
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = ImageReader::open(path)?.decode()?;
    debug!("Image loaded: {}x{} from {}", img.width(), img.height(), path.display());
    Ok(img.to_rgb8())
}

/// Load one file and detect its shapes
pub fn process_image_file(detector: &ShapeDetector, path: &Path) -> Result<ImageReport> {
    let (report, _, _) = detect_file(detector, path)?;
    Ok(report)
}

/// Report for `path` plus the decoded image and its edge map, so callers
/// writing extra outputs do not decode or run edge detection twice
fn detect_file(detector: &ShapeDetector, path: &Path) -> Result<(ImageReport, RgbImage, GrayImage)> {
    let img = load_image(path)?;
    let edges = detector.get_edges(&img)?;
    let shapes = detector.detect_shapes_in_edges(&img, &edges);
    Ok((ImageReport::new(path, &img, shapes), img, edges))
}

/// Create `dir` if missing. An existing directory must be empty.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if std::fs::read_dir(dir)?.next().is_some() {
            return Err(ShapeError::OutputDirNotEmpty(dir.to_path_buf()));
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Process every path in order. A failing file is recorded in its report
/// and the batch carries on with the next one.
pub fn run_batch(detector: &ShapeDetector, paths: &[PathBuf], options: &BatchOptions) -> BatchSummary {
    let mut reports = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, paths.len(), path.display());

        let report = match process_with_outputs(detector, path, options) {
            Ok(report) => report,
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                ImageReport::failed(path, &e)
            }
        };
        reports.push(report);
    }

    BatchSummary { reports }
}

fn process_with_outputs(
    detector: &ShapeDetector,
    path: &Path,
    options: &BatchOptions,
) -> Result<ImageReport> {
    let (mut report, img, edges) = detect_file(detector, path)?;

    if let Some(dir) = &options.debug_out {
        let out = dir.join(output_name(path, "edges"));
        edges.save(&out)?;
        debug!("  Debug: saved {}", out.display());
    }

    if let Some(dir) = &options.labelled_out {
        let out = dir.join(output_name(path, "labelled"));
        options.labeller.label_image(&img, &report.shapes).save(&out)?;
        debug!("  Saved labelled image {}", out.display());
        report.labelled = Some(out);
    }

    Ok(report)
}

fn output_name(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{}_{}.png", stem, suffix)
}
