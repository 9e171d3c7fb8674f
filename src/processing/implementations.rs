// 並列照合の基本実装群

use super::traits::{ProcessingConfig, ProgressReporter};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    workers: usize,
    buffer_size: usize,
    enable_progress: bool,
}

impl DefaultProcessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            buffer_size: 100,
            enable_progress: true,
        }
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn worker_count(&self) -> usize {
        self.workers
    }

    fn result_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// indicatif のプログレスバーによる進捗報告実装
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    quiet: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_frames: usize) {
        if self.quiet {
            return;
        }

        println!("🔍 Matching template in {total_frames} frames...");
        let bar = ProgressBar::new(total_frames as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}<{eta_precise}]",
        ) {
            bar.set_style(style.progress_chars("##-"));
        }
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    async fn report_progress(&self, completed: usize, _total: usize) {
        self.with_bar(|bar| bar.set_position(completed as u64));
    }

    async fn report_error(&self, file_path: &str, error: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|bar| bar.abandon());
        log::error!("❌ Error processing {file_path}: {error}");
    }

    async fn report_completed(&self, total_matched: usize, total_errors: usize) {
        if self.quiet {
            return;
        }
        self.with_bar(|bar| bar.finish_and_clear());
        println!("✅ Matched: {total_matched}, Errors: {total_errors}");
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_frames: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _file_path: &str, _error: &str) {}

    async fn report_completed(&self, _total_matched: usize, _total_errors: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_processing_config() {
        let config = DefaultProcessingConfig::default();

        assert_eq!(config.worker_count(), num_cpus::get().max(1));
        assert_eq!(config.result_buffer_size(), 100);
        assert!(config.enable_progress_reporting());
    }

    #[test]
    fn test_processing_config_builder() {
        let config = DefaultProcessingConfig::new()
            .with_workers(8)
            .with_buffer_size(16)
            .with_progress_reporting(false);

        assert_eq!(config.worker_count(), 8);
        assert_eq!(config.result_buffer_size(), 16);
        assert!(!config.enable_progress_reporting());
    }

    #[test]
    fn test_processing_config_minimums() {
        let config = DefaultProcessingConfig::new()
            .with_workers(0)
            .with_buffer_size(0);

        assert_eq!(config.worker_count(), 1);
        assert_eq!(config.result_buffer_size(), 1);
    }

    #[tokio::test]
    async fn test_quiet_console_reporter_creates_no_bar() {
        let reporter = ConsoleProgressReporter::quiet();

        reporter.report_started(10).await;
        reporter.report_progress(5, 10).await;
        reporter.report_error("/scans/f3.png", "decode failed").await;
        reporter.report_completed(9, 1).await;

        assert!(reporter.quiet);
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_noop_progress_reporter() {
        let reporter = NoOpProgressReporter::new();

        reporter.report_started(3).await;
        reporter.report_progress(3, 3).await;
        reporter.report_completed(3, 0).await;
    }
}
