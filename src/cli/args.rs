use crate::core::{PickerResult, RunConfig, RunMode};
use crate::template_matching::{MatchMethod, Region};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "frame_picker")]
#[command(about = "Select frames from a scrolling scan so that a reference pattern moves steadily upward")]
#[command(version)]
pub struct Cli {
    /// Directory containing the numbered frames
    #[arg(long = "imagesdir")]
    pub images_dir: PathBuf,

    /// Draw the match of every method on one frame instead of selecting frames
    #[arg(long)]
    pub check_methods: bool,

    /// Template matching method (0-5)
    #[arg(long, default_value_t = 0)]
    pub method: usize,

    /// Divide frame dimensions by this factor before matching
    #[arg(long, default_value_t = 4.0)]
    pub scale_down: f64,

    /// Output directory for the selected frames
    #[arg(long = "outdir", default_value = "out")]
    pub output_dir: PathBuf,

    /// Template region as x,y,width,height on the downscaled first frame
    #[arg(long)]
    pub template: Option<Region>,

    /// Number of matching workers
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Accept every large jump without confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Write a JSON selection report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Font file used to label the confirmation preview
    #[arg(long)]
    pub label_font: Option<PathBuf>,
}

impl Cli {
    /// 検証済みの実行設定に変換する
    pub fn into_run_config(self) -> PickerResult<RunConfig> {
        let mode = if self.check_methods {
            RunMode::CheckMethods
        } else {
            RunMode::Select
        };

        let mut config = RunConfig::new(self.images_dir)
            .with_mode(mode)
            .with_method(MatchMethod::from_index(self.method)?)
            .with_scale_down(self.scale_down)
            .with_output_dir(self.output_dir)
            .with_auto_accept(self.yes);

        if let Some(template) = self.template {
            config = config.with_template(template);
        }
        if let Some(threads) = self.threads {
            config = config.with_workers(threads);
        }
        if let Some(report) = self.report {
            config = config.with_report(report);
        }
        if let Some(label_font) = self.label_font {
            config = config.with_label_font(label_font);
        }

        config.validate()
    }
}
