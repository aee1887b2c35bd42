//! Sequential batch processing of an input directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use remesh_decimation::{ReductionConfig, ReductionController, ReductionOutcome};
use remesh_engine::NativeEngine;
use remesh_io::{export_mesh, import_merged};
use remesh_preview::render_preview;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: ReductionConfig,
    pub preview: bool,
}

/// What happened to one input file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ReductionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub input_dir: String,
    pub output_dir: String,
    pub target_reduction: f32,
    pub processed: usize,
    pub successful: usize,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.processed - self.successful
    }
}

/// `*.obj` files directly inside `dir`, sorted by name.
///
/// A missing directory yields no files.
pub fn find_obj_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let path = entry?.path();
        let is_obj = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("obj"))
            .unwrap_or(false);
        if is_obj && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Process every OBJ file in the input directory, one after another.
///
/// Only failing to create the output directory or to list the input aborts
/// the batch; per-file errors are logged and counted.
pub fn run(options: &BatchOptions) -> Result<BatchSummary> {
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", options.output_dir))?;

    let files = find_obj_files(&options.input_dir)?;
    let mut summary = BatchSummary {
        input_dir: options.input_dir.display().to_string(),
        output_dir: options.output_dir.display().to_string(),
        target_reduction: options.config.target_reduction,
        processed: 0,
        successful: 0,
        files: Vec::with_capacity(files.len()),
    };

    if files.is_empty() {
        info!(dir = %options.input_dir.display(), "No OBJ files found");
        return Ok(summary);
    }
    info!(
        count = files.len(),
        target = options.config.target_reduction,
        "Found OBJ files"
    );

    let engine = NativeEngine::new();
    let controller =
        ReductionController::new(&engine).with_post_process(options.config.post_process);

    for (i, path) in files.iter().enumerate() {
        info!(file = %path.display(), index = i + 1, total = files.len(), "Processing");
        let report = match process_file(path, options, &controller) {
            Ok(report) => report,
            Err(e) => {
                error!(file = %path.display(), error = %format!("{:#}", e), "File failed");
                FileReport {
                    file: path.display().to_string(),
                    success: false,
                    output: None,
                    outcome: None,
                    error: Some(format!("{:#}", e)),
                }
            }
        };
        summary.processed += 1;
        if report.success {
            summary.successful += 1;
        }
        summary.files.push(report);
    }

    Ok(summary)
}

fn process_file(
    path: &Path,
    options: &BatchOptions,
    controller: &ReductionController<'_, NativeEngine>,
) -> Result<FileReport> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string();

    let mut mesh =
        import_merged(path).with_context(|| format!("Failed to import {:?}", path))?;

    if options.preview {
        preview(&mesh, &options.output_dir.join(format!("{}_before.png", stem)));
    }

    let target = options.config.target_reduction;
    let outcome = controller.reduce(&mut mesh, target);

    if !outcome.overall_success {
        warn!(
            file = %path.display(),
            status = ?outcome.status,
            message = outcome.message.as_deref().unwrap_or(""),
            "Reduction failed"
        );
        return Ok(FileReport {
            file: path.display().to_string(),
            success: false,
            output: None,
            error: outcome.message.clone(),
            outcome: Some(outcome),
        });
    }

    if options.preview {
        preview(&mesh, &options.output_dir.join(format!("{}_after.png", stem)));
    }
    info!(
        file = %path.display(),
        original = outcome.original_faces,
        final_faces = outcome.final_faces,
        reduction_pct = outcome.actual_reduction_pct,
        quality = %outcome.quality(target),
        "Reduction finished"
    );

    let output_path = options.output_dir.join(format!("{}_remeshed.obj", stem));
    export_mesh(&output_path, &mesh)
        .with_context(|| format!("Failed to export {:?}", output_path))?;

    Ok(FileReport {
        file: path.display().to_string(),
        success: true,
        output: Some(output_path.display().to_string()),
        outcome: Some(outcome),
        error: None,
    })
}

/// Previews are informational, a failure is only logged
fn preview(mesh: &remesh_core::PolygonMesh, path: &Path) {
    if let Err(e) = render_preview(mesh, path) {
        warn!(path = %path.display(), error = %e, "Preview failed");
    }
}
