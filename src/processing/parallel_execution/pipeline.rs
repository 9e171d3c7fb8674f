// Pipeline - 作業キュー → ワーカープール → 結果集約

use super::{consumer::spawn_consumers, producer::fill_work_queue, MatchJob};
use crate::{
    core::{FramePickerError, Frame, MatchResult, PickerResult},
    image_loader::FramePreprocessor,
    processing::traits::{ProcessingConfig, ProgressReporter},
    template_matching::PatternLocator,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 全フレームの照合を並列に行うパイプライン
pub struct MatchPipeline<P, L> {
    preprocessor: Arc<P>,
    locator: Arc<L>,
}

impl<P, L> MatchPipeline<P, L>
where
    P: FramePreprocessor + 'static,
    L: PatternLocator + 'static,
{
    pub fn new(preprocessor: Arc<P>, locator: Arc<L>) -> Self {
        Self {
            preprocessor,
            locator,
        }
    }

    /// フレームごとに1件の照合結果を返す（順序は不定）
    ///
    /// 最初の失敗で残りのワーカーを中断し、そのエラーを返す。
    pub async fn execute<C, R>(
        &self,
        frames: Vec<Frame>,
        job: Arc<MatchJob>,
        config: &C,
        reporter: Arc<R>,
    ) -> PickerResult<Vec<MatchResult>>
    where
        C: ProcessingConfig,
        R: ProgressReporter + ?Sized,
    {
        let total_frames = frames.len();
        if config.enable_progress_reporting() {
            reporter.report_started(total_frames).await;
        }

        let work_rx = fill_work_queue(frames);
        let (result_tx, mut result_rx) = mpsc::channel(config.result_buffer_size().max(1));

        let handles = spawn_consumers(
            self.preprocessor.clone(),
            self.locator.clone(),
            job,
            work_rx,
            result_tx,
            config.worker_count(),
        );

        let mut results = Vec::with_capacity(total_frames);
        while let Some(result) = result_rx.recv().await {
            match result {
                Ok(matched) => {
                    results.push(matched);
                    if config.enable_progress_reporting() {
                        reporter.report_progress(results.len(), total_frames).await;
                    }
                }
                Err(error) => {
                    for handle in &handles {
                        handle.abort();
                    }
                    if config.enable_progress_reporting() {
                        let resource = error.context().resource.unwrap_or_default();
                        reporter.report_error(&resource, &error.to_string()).await;
                    }
                    return Err(error);
                }
            }
        }

        for handle in handles {
            handle.await??;
        }

        if results.len() != total_frames {
            return Err(FramePickerError::pipeline(format!(
                "expected {total_frames} match results, got {}",
                results.len()
            )));
        }

        if config.enable_progress_reporting() {
            reporter.report_completed(results.len(), 0).await;
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_loader::GrayscalePreprocessor;
    use crate::processing::tests::{scroll_fixture, write_corrupt_frame};
    use crate::processing::{DefaultProcessingConfig, NoOpProgressReporter};
    use crate::template_matching::{CorrelationLocator, MatchMethod};

    fn pipeline() -> MatchPipeline<GrayscalePreprocessor, CorrelationLocator> {
        MatchPipeline::new(
            Arc::new(GrayscalePreprocessor::new(1.0)),
            Arc::new(CorrelationLocator::new()),
        )
    }

    #[tokio::test]
    async fn test_pipeline_returns_one_result_per_frame() {
        let offsets = [0, 4, 8, 12, 16, 20, 24, 28];
        let fixture = scroll_fixture(&offsets);
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::SqDiff));
        let config = DefaultProcessingConfig::new().with_workers(3).with_buffer_size(2);

        let mut results = pipeline()
            .execute(
                fixture.frames.clone(),
                job,
                &config,
                Arc::new(NoOpProgressReporter::new()),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), offsets.len());
        results.sort_by_key(|r| r.frame.sequence);
        for (index, result) in results.iter().enumerate() {
            assert_eq!(result.rect.top_left(), fixture.expected_top_left(index));
        }
    }

    #[tokio::test]
    async fn test_pipeline_fails_fast_on_corrupt_frame() {
        let fixture = scroll_fixture(&[0, 4, 8]);
        let mut frames = fixture.frames.clone();
        frames.insert(1, write_corrupt_frame(fixture.dir.path(), "f9.png", 9));
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::SqDiff));

        let error = pipeline()
            .execute(
                frames,
                job,
                &DefaultProcessingConfig::new().with_workers(2),
                Arc::new(NoOpProgressReporter::new()),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, FramePickerError::ImageDecode { .. }));
        assert!(error.to_string().contains("f9.png"));
    }

    #[tokio::test]
    async fn test_pipeline_empty_frames() {
        let fixture = scroll_fixture(&[0]);
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::SqDiff));

        let results = pipeline()
            .execute(
                vec![],
                job,
                &DefaultProcessingConfig::default(),
                Arc::new(NoOpProgressReporter::new()),
            )
            .await
            .unwrap();

        assert!(results.is_empty());
    }
}
