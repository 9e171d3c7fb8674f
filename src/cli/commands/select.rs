use crate::core::{FramePickerError, Frame, PickerResult, RunConfig};
use crate::file_scanner::FileScanner;
use crate::image_loader::{FramePreprocessor, GrayscalePreprocessor};
use crate::interactive::{Confirmer, RegionSelector};
use crate::processing::{DefaultProcessingConfig, MatchJob, MatchPipeline, ProgressReporter};
use crate::selection::{select_frames, SelectionStats};
use crate::storage::{FrameStorage, SelectionReport};
use crate::template_matching::{CorrelationLocator, ReferencePattern, Region};
use image::GrayImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// select コマンドの結果
#[derive(Debug, Clone)]
pub struct SelectionSummary {
    pub total_frames: usize,
    pub copied: Vec<PathBuf>,
    pub avg_delta_y: f64,
    pub stats: SelectionStats,
    pub template: Region,
}

/// 先頭フレームを読み込み、テンプレート領域を決める
pub async fn prepare_pattern<R>(
    frames: &[Frame],
    preprocessor: &GrayscalePreprocessor,
    mut region_selector: R,
) -> PickerResult<ReferencePattern>
where
    R: RegionSelector + 'static,
{
    let first = frames
        .first()
        .ok_or_else(|| FramePickerError::configuration("No frames to select from"))?;
    let first_image = preprocessor.preprocess(first.path()).await?;

    // 端末入力を待つ可能性があるためブロッキングスレッドで実行
    let (region, first_image) =
        tokio::task::spawn_blocking(move || -> PickerResult<(Region, GrayImage)> {
            let region = region_selector.select_region(&first_image)?;
            Ok((region, first_image))
        })
        .await??;

    log::info!("Template region {region} on {}", first.file_name());
    ReferencePattern::extract(&first_image, region)
}

/// フレーム選択を実行し、採用フレームを出力先にコピーする
pub async fn execute_select<R, C, S, P>(
    config: &RunConfig,
    region_selector: R,
    confirmer: C,
    storage: &S,
    reporter: Arc<P>,
) -> PickerResult<SelectionSummary>
where
    R: RegionSelector + 'static,
    C: Confirmer + 'static,
    S: FrameStorage + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let start_time = Instant::now();
    let frames = FileScanner::scan_frames(&config.images_dir)?;
    let total_frames = frames.len();

    println!("🔍 フレーム選択開始");
    println!("   - 入力ディレクトリ: {}", config.images_dir.display());
    println!("   - フレーム数: {total_frames}");
    println!("   - 照合方式: {}", config.method);

    let preprocessor = GrayscalePreprocessor::new(config.scale_down);
    let scale_down = preprocessor.scale_down();
    println!("   - 縮小率: 1/{scale_down}");
    let pattern = prepare_pattern(&frames, &preprocessor, region_selector).await?;
    let template = pattern.region();
    let extent = pattern.extent();

    let processing_config = DefaultProcessingConfig::new().with_workers(config.workers);
    println!("⚙️  照合ワーカー数: {}", config.workers);

    let pipeline = MatchPipeline::new(Arc::new(preprocessor), Arc::new(CorrelationLocator::new()));
    let job = Arc::new(MatchJob::new(pattern, config.method));
    let results = pipeline
        .execute(frames, job, &processing_config, reporter)
        .await?;

    log::info!("Selecting images...");
    let outcome = tokio::task::spawn_blocking(move || {
        let mut confirmer = confirmer;
        select_frames(results, extent, &mut confirmer)
    })
    .await??;

    storage.prepare().await?;
    let mut copied = Vec::with_capacity(outcome.selected.len());
    for result in &outcome.selected {
        copied.push(storage.store_frame(&result.frame).await?);
    }

    if let Some(report_path) = &config.report {
        let report = SelectionReport::new(
            &config.images_dir,
            &config.output_dir,
            config.method,
            scale_down,
            template,
            extent,
            total_frames,
            &outcome,
        );
        storage.store_report(report_path, &report).await?;
        println!("📄 レポートを {} に保存しました", report_path.display());
    }

    println!("✅ 選択完了!");
    println!("   - 採用フレーム: {}/{total_frames}", copied.len());
    println!("   - 平均移動量: {:.1}px", outcome.avg_delta_y);
    println!(
        "   - 不採用: 横ずれ {}, 前進なし {}, 確認で破棄 {}",
        outcome.stats.drift_rejections,
        outcome.stats.no_progress_rejections,
        outcome.stats.confirmations_rejected
    );
    println!("   - 処理時間: {:.2}秒", start_time.elapsed().as_secs_f64());
    println!("📁 出力先: {}", config.output_dir.display());

    Ok(SelectionSummary {
        total_frames,
        copied,
        avg_delta_y: outcome.avg_delta_y,
        stats: outcome.stats,
        template,
    })
}
