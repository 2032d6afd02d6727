//! Output formatting and export of the aggregated views.
//!
//! Supports JSON rendering, the overview as CSV, and a full export directory
//! that can be reloaded as input.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::views::OverviewRow;
use crate::dataset::Dataset;

/// Summary written alongside an export.
#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub generated_at: DateTime<Utc>,
    pub records: usize,
    pub lecturers: usize,
    pub dataset_file: String,
}

/// Renders any view as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes a view to `path` as pretty-printed JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    fs::write(path, to_json(value)?).with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes the overview list as CSV with a header row.
pub fn write_overview_csv(path: &Path, rows: &[OverviewRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Filesystem-safe directory name for a lecturer.
pub fn safe_filename(name: &str) -> String {
    name.replace([' ', '/', '\\'], "_")
}

/// Writes the normalized records back in input form, gzip-compressed if asked.
/// Returns the file written.
pub fn export_dataset(dir: &Path, dataset: &Dataset, gzip: bool) -> Result<PathBuf> {
    let body = serde_json::to_vec_pretty(&dataset.to_raw())?;

    let (path, body) = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        (dir.join("dataset.json.gz"), encoder.finish()?)
    } else {
        (dir.join("dataset.json"), body)
    };

    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Writes every view, the reloadable dataset and a manifest under `dir`.
#[tracing::instrument(skip(dataset), fields(dir = %dir.display()))]
pub fn export_all(dir: &Path, dataset: &Dataset, gzip: bool) -> Result<ExportManifest> {
    let lecturer_dir = dir.join("lecturers");
    fs::create_dir_all(&lecturer_dir)
        .with_context(|| format!("Failed to create {}", lecturer_dir.display()))?;

    let dataset_path = export_dataset(dir, dataset, gzip)?;

    let overview = dataset.overview();
    write_json(&dir.join("overview.json"), &overview)?;
    write_overview_csv(&dir.join("overview.csv"), &overview)?;
    write_json(&dir.join("reviews.json"), &dataset.review_feed())?;

    let mut url_mapping = BTreeMap::new();
    for name in dataset.lecturers().keys() {
        let safe_name = safe_filename(name);
        let detail = dataset.lecturer_detail(name)?;
        write_json(&lecturer_dir.join(format!("{safe_name}.json")), &detail)?;
        url_mapping.insert(name.to_string(), safe_name);
    }
    write_json(&dir.join("url-mapping.json"), &url_mapping)?;

    let manifest = ExportManifest {
        generated_at: Utc::now(),
        records: dataset.records().len(),
        lecturers: dataset.lecturers().len(),
        dataset_file: dataset_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
    };
    write_json(&dir.join("manifest.json"), &manifest)?;

    info!(
        records = manifest.records,
        lecturers = manifest.lecturers,
        "Export complete"
    );
    Ok(manifest)
}
