// 並列照合のトレイト定義

use async_trait::async_trait;

/// 並列照合の設定を抽象化するトレイト
pub trait ProcessingConfig: Send + Sync {
    /// 照合ワーカー数
    fn worker_count(&self) -> usize;

    /// 結果チャンネルのバッファサイズ
    fn result_buffer_size(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

/// 進捗報告の抽象化トレイト
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_frames: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// エラー発生時の報告
    async fn report_error(&self, file_path: &str, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_matched: usize, total_errors: usize);
}
