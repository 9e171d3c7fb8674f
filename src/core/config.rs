// 実行設定
// コマンドライン引数から一度だけ構築し、以降は変更しない

use super::error::{FramePickerError, PickerResult};
use crate::template_matching::{MatchMethod, Region};
use std::path::PathBuf;

/// 実行するコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// フレーム選択
    Select,
    /// 全照合方式の診断画像を出力
    CheckMethods,
}

/// 1回の実行の設定
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub images_dir: PathBuf,
    pub mode: RunMode,
    pub method: MatchMethod,
    pub scale_down: f64,
    pub output_dir: PathBuf,
    /// 指定がなければ端末で問い合わせる
    pub template: Option<Region>,
    pub workers: usize,
    /// 大きな移動量も確認なしで採用する
    pub auto_accept: bool,
    pub report: Option<PathBuf>,
    /// 確認画像にラベルを描くフォント
    pub label_font: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            mode: RunMode::Select,
            method: MatchMethod::default(),
            scale_down: 4.0,
            output_dir: PathBuf::from("out"),
            template: None,
            workers: num_cpus::get().max(1),
            auto_accept: false,
            report: None,
            label_font: None,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_method(mut self, method: MatchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_scale_down(mut self, scale_down: f64) -> Self {
        self.scale_down = scale_down;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_template(mut self, template: Region) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_auto_accept(mut self, auto_accept: bool) -> Self {
        self.auto_accept = auto_accept;
        self
    }

    pub fn with_report(mut self, report: impl Into<PathBuf>) -> Self {
        self.report = Some(report.into());
        self
    }

    pub fn with_label_font(mut self, label_font: impl Into<PathBuf>) -> Self {
        self.label_font = Some(label_font.into());
        self
    }

    /// 値の範囲を検証する
    pub fn validate(self) -> PickerResult<Self> {
        if !self.scale_down.is_finite() || self.scale_down <= 0.0 {
            return Err(FramePickerError::configuration(format!(
                "Scale down factor must be a positive number, got {}",
                self.scale_down
            )));
        }
        if self.workers == 0 {
            return Err(FramePickerError::configuration(
                "Worker count must be at least 1",
            ));
        }

        Ok(self)
    }
}
