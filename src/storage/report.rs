// 選択結果レポート

use crate::core::{MatchRect, MatchResult, ReferenceExtent};
use crate::selection::{SelectionOutcome, SelectionStats};
use crate::template_matching::{MatchMethod, Region};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct SelectedFrameEntry {
    pub file_name: String,
    pub sequence: u64,
    pub rect: MatchRect,
}

impl From<&MatchResult> for SelectedFrameEntry {
    fn from(result: &MatchResult) -> Self {
        Self {
            file_name: result.frame.file_name(),
            sequence: result.frame.sequence,
            rect: result.rect,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub generated_at: DateTime<Utc>,
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub method_index: usize,
    pub method_name: String,
    pub scale_down: f64,
    pub template: Region,
    pub reference_extent: ReferenceExtent,
    pub total_frames: usize,
    pub delta_y_threshold: f64,
    pub template_x_threshold: f64,
    pub avg_delta_y: f64,
    pub stats: SelectionStats,
    pub selected: Vec<SelectedFrameEntry>,
}

impl SelectionReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        images_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        method: MatchMethod,
        scale_down: f64,
        template: Region,
        reference_extent: ReferenceExtent,
        total_frames: usize,
        outcome: &SelectionOutcome,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            images_dir: images_dir.into(),
            output_dir: output_dir.into(),
            method_index: method.index(),
            method_name: method.name().to_string(),
            scale_down,
            template,
            reference_extent,
            total_frames,
            delta_y_threshold: outcome.thresholds.delta_y,
            template_x_threshold: outcome.thresholds.template_x,
            avg_delta_y: outcome.avg_delta_y,
            stats: outcome.stats,
            selected: outcome.selected.iter().map(SelectedFrameEntry::from).collect(),
        }
    }
}
