// Consumer - 並列照合ワーカー

use super::MatchJob;
use crate::{
    core::{Frame, MatchResult, PickerResult},
    image_loader::FramePreprocessor,
    template_matching::PatternLocator,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub type WorkQueue = Arc<Mutex<mpsc::UnboundedReceiver<Frame>>>;

/// 1フレームの前処理と照合
pub async fn match_single_frame<P, L>(
    preprocessor: &P,
    locator: Arc<L>,
    job: Arc<MatchJob>,
    frame: Frame,
) -> PickerResult<MatchResult>
where
    P: FramePreprocessor + ?Sized,
    L: PatternLocator + 'static,
{
    let image = preprocessor.preprocess(frame.path()).await?;

    let rect = tokio::task::spawn_blocking(move || {
        locator.locate(&image, job.pattern.image(), job.method)
    })
    .await??;

    log::debug!(
        "{} matched at ({}, {})",
        frame.file_name(),
        rect.x,
        rect.y
    );
    Ok(MatchResult::new(frame, rect))
}

/// 単一Consumerワーカー
///
/// キューが空になるまで照合を続ける。失敗した場合はエラーを送信して終了する。
pub fn spawn_single_consumer<P, L>(
    worker_id: usize,
    preprocessor: Arc<P>,
    locator: Arc<L>,
    job: Arc<MatchJob>,
    work_rx: WorkQueue,
    result_tx: mpsc::Sender<PickerResult<MatchResult>>,
) -> tokio::task::JoinHandle<PickerResult<()>>
where
    P: FramePreprocessor + 'static,
    L: PatternLocator + 'static,
{
    tokio::spawn(async move {
        loop {
            // 次のフレームを取得
            let frame = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(frame) => frame,
                    None => break,
                }
            };

            let result =
                match_single_frame(preprocessor.as_ref(), locator.clone(), job.clone(), frame)
                    .await;
            let failed = result.is_err();

            if result_tx.send(result).await.is_err() {
                // 集約側が終了済み
                break;
            }
            if failed {
                log::debug!("worker {worker_id} stopped after a failure");
                break;
            }
        }
        Ok(())
    })
}

/// Consumers: 並列ワーカープール
pub fn spawn_consumers<P, L>(
    preprocessor: Arc<P>,
    locator: Arc<L>,
    job: Arc<MatchJob>,
    work_rx: mpsc::UnboundedReceiver<Frame>,
    result_tx: mpsc::Sender<PickerResult<MatchResult>>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<PickerResult<()>>>
where
    P: FramePreprocessor + 'static,
    L: PatternLocator + 'static,
{
    let work_rx = Arc::new(Mutex::new(work_rx));

    (0..worker_count.max(1))
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                preprocessor.clone(),
                locator.clone(),
                job.clone(),
                work_rx.clone(),
                result_tx.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FramePickerError;
    use crate::image_loader::GrayscalePreprocessor;
    use crate::processing::parallel_execution::fill_work_queue;
    use crate::processing::tests::{scroll_fixture, write_corrupt_frame};
    use crate::template_matching::{CorrelationLocator, MatchMethod};
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_match_single_frame_finds_scrolled_pattern() {
        let fixture = scroll_fixture(&[0, 12]);
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::SqDiff));

        let result = match_single_frame(
            &GrayscalePreprocessor::new(1.0),
            Arc::new(CorrelationLocator::new()),
            job,
            fixture.frames[1].clone(),
        )
        .await
        .unwrap();

        assert_eq!(result.frame.sequence, 2);
        assert_eq!(result.rect.top_left(), fixture.expected_top_left(1));
    }

    #[tokio::test]
    async fn test_consumer_pool_matches_every_frame() {
        let fixture = scroll_fixture(&[0, 5, 10, 15, 20]);
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::CCoeffNormed));
        let (result_tx, mut result_rx) = mpsc::channel(10);

        let handles = spawn_consumers(
            Arc::new(GrayscalePreprocessor::new(1.0)),
            Arc::new(CorrelationLocator::new()),
            job,
            fill_work_queue(fixture.frames.clone()),
            result_tx,
            3,
        );

        let mut sequences = HashSet::new();
        while let Some(result) = result_rx.recv().await {
            sequences.insert(result.unwrap().frame.sequence);
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(sequences, (1..=5).collect::<HashSet<u64>>());
    }

    #[tokio::test]
    async fn test_consumer_reports_decode_failure() {
        let fixture = scroll_fixture(&[0]);
        let corrupt = write_corrupt_frame(fixture.dir.path(), "f2.png", 2);
        let job = Arc::new(MatchJob::new(fixture.pattern(), MatchMethod::SqDiff));
        let (result_tx, mut result_rx) = mpsc::channel(10);
        let work_rx = Arc::new(Mutex::new(fill_work_queue(vec![corrupt])));

        let handle = spawn_single_consumer(
            0,
            Arc::new(GrayscalePreprocessor::new(1.0)),
            Arc::new(CorrelationLocator::new()),
            job,
            work_rx,
            result_tx,
        );

        let result = result_rx.recv().await.unwrap();
        handle.await.unwrap().unwrap();

        assert!(matches!(result, Err(FramePickerError::ImageDecode { .. })));
    }
}
