use super::{FrameStorage, SelectionReport};
use crate::core::{FramePickerError, Frame, PickerResult};
use anyhow::Context;
use async_trait::async_trait;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// ローカルディレクトリへの出力
#[derive(Clone, Debug)]
pub struct LocalFrameStorage {
    output_dir: PathBuf,
}

impl LocalFrameStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn create_parent(path: &Path) -> PickerResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))
                .map_err(|e| FramePickerError::persistence(parent, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl FrameStorage for LocalFrameStorage {
    async fn prepare(&self) -> PickerResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create output directory: {}", self.output_dir.display()))
            .map_err(|e| FramePickerError::persistence(&self.output_dir, e))
    }

    async fn store_frame(&self, frame: &Frame) -> PickerResult<PathBuf> {
        let destination = self.output_dir.join(frame.file_name());

        let metadata = tokio::fs::metadata(frame.path())
            .await
            .map_err(|e| FramePickerError::frame_copy(frame.path(), &destination, e))?;
        if !metadata.is_file() {
            return Err(FramePickerError::frame_copy(
                frame.path(),
                &destination,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        tokio::fs::copy(frame.path(), &destination)
            .await
            .map_err(|e| FramePickerError::frame_copy(frame.path(), &destination, e))?;

        log::debug!("Copied {} -> {}", frame.path().display(), destination.display());
        Ok(destination)
    }

    async fn store_image(&self, name: &str, image: &RgbImage) -> PickerResult<PathBuf> {
        let destination = self.output_dir.join(name);
        Self::create_parent(&destination).await?;

        let image = image.clone();
        let path = destination.clone();
        tokio::task::spawn_blocking(move || image.save(&path))
            .await?
            .with_context(|| format!("Failed to write image: {}", destination.display()))
            .map_err(|e| FramePickerError::persistence(&destination, e))?;

        Ok(destination)
    }

    async fn store_report(&self, path: &Path, report: &SelectionReport) -> PickerResult<()> {
        Self::create_parent(path).await?;

        let json = serde_json::to_string_pretty(report)
            .context("Failed to serialize selection report")
            .map_err(|e| FramePickerError::persistence(path, e))?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report: {}", path.display()))
            .map_err(|e| FramePickerError::persistence(path, e))
    }
}
