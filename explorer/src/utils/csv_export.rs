use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use image::RgbaImage;
use serde::Serialize;
use tracing::info;

use crate::core::session::SessionSummary;
use crate::data::poi::Coordinate;
use crate::render::export::save_frame_png;
use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Serialize)]
struct TileRow<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct PathRow {
    seq: usize,
    lat: f64,
    lng: f64,
}

/// Writes the artefacts of one session into a timestamped directory.
/// Nothing here is read back by later sessions.
pub struct SessionExporter {
    output_dir: PathBuf,
    timestamp: String,
}

impl SessionExporter {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let output_dir = base_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create report directory {}", output_dir.display()))?;

        Ok(Self { output_dir, timestamp })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Visited path as `seq,lat,lng`, origin first.
    pub fn write_path_csv(&self, path: &[Coordinate]) -> Result<PathBuf> {
        let _timing = logging::start_timing("write_path_csv",
            OperationCategory::FileIO { subcategory: FileIOType::ReportSave });

        let file_path = self.output_dir.join("path.csv");
        let mut writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("failed to create {}", file_path.display()))?;
        for (seq, coordinate) in path.iter().enumerate() {
            writer.serialize(PathRow {
                seq,
                lat: coordinate.lat,
                lng: coordinate.lng,
            })?;
        }
        writer.flush()?;

        info!("Wrote {} path points to {}", path.len(), file_path.display());
        Ok(file_path)
    }

    pub fn write_summary_json(&self, summary: &SessionSummary) -> Result<PathBuf> {
        let _timing = logging::start_timing("write_summary_json",
            OperationCategory::FileIO { subcategory: FileIOType::ReportSave });

        let file_path = self.output_dir.join("summary.json");
        let file = File::create(&file_path)
            .with_context(|| format!("failed to create {}", file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, summary)?;
        writer.flush()?;
        Ok(file_path)
    }

    /// Raster tiles behind the final frame, one URL per row.
    pub fn write_tile_list(&self, urls: &[String]) -> Result<PathBuf> {
        let _timing = logging::start_timing("write_tile_list",
            OperationCategory::FileIO { subcategory: FileIOType::ReportSave });

        let file_path = self.output_dir.join("tiles.csv");
        let mut writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("failed to create {}", file_path.display()))?;
        for url in urls {
            writer.serialize(TileRow { url: url.as_str() })?;
        }
        writer.flush()?;
        Ok(file_path)
    }

    pub fn write_frame(&self, frame: &RgbaImage) -> Result<PathBuf> {
        let _timing = logging::start_timing("write_frame",
            OperationCategory::FileIO { subcategory: FileIOType::ReportSave });

        let file_path = self.output_dir.join("final_frame.png");
        save_frame_png(frame, &file_path)?;
        Ok(file_path)
    }
}
