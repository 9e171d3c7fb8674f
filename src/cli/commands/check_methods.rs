use super::select::prepare_pattern;
use crate::core::{MatchRect, PickerResult, RunConfig};
use crate::file_scanner::FileScanner;
use crate::image_loader::{FramePreprocessor, GrayscalePreprocessor};
use crate::interactive::RegionSelector;
use crate::storage::FrameStorage;
use crate::template_matching::{CorrelationLocator, MatchMethod, PatternLocator};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::PathBuf;
use std::sync::Arc;

/// 診断に使うフレーム番号（フレーム数が足りなければ最後のフレーム）
pub const CHECK_FRAME_INDEX: usize = 100;

const RECT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const RECT_THICKNESS: i32 = 3;

/// 1方式分の診断結果
#[derive(Debug, Clone)]
pub struct MethodCheck {
    pub method: MatchMethod,
    pub rect: MatchRect,
    pub image_path: PathBuf,
}

/// 一致矩形を描いたカラー画像
pub fn annotate(image: &GrayImage, rect: MatchRect) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(image.clone()).to_rgb8();

    for thickness in 0..RECT_THICKNESS {
        let outline = Rect::at(rect.x as i32 - thickness, rect.y as i32 - thickness).of_size(
            rect.width + (2 * thickness) as u32,
            rect.height + (2 * thickness) as u32,
        );
        draw_hollow_rect_mut(&mut canvas, outline, RECT_COLOR);
    }
    canvas
}

/// 全照合方式を1枚のフレームで試し、結果画像を書き出す
pub async fn execute_check_methods<R, S>(
    config: &RunConfig,
    region_selector: R,
    storage: &S,
) -> PickerResult<Vec<MethodCheck>>
where
    R: RegionSelector + 'static,
    S: FrameStorage + ?Sized,
{
    let frames = FileScanner::scan_frames(&config.images_dir)?;
    let preprocessor = GrayscalePreprocessor::new(config.scale_down);
    let pattern = Arc::new(prepare_pattern(&frames, &preprocessor, region_selector).await?);

    let target = &frames[CHECK_FRAME_INDEX.min(frames.len() - 1)];
    let image = Arc::new(preprocessor.preprocess(target.path()).await?);

    println!("🧪 照合方式の比較: {}", target.file_name());
    storage.prepare().await?;

    let locator = Arc::new(CorrelationLocator::new());
    let mut checks = Vec::with_capacity(MatchMethod::ALL.len());
    for method in MatchMethod::ALL {
        let (image, pattern, locator) = (image.clone(), pattern.clone(), locator.clone());
        let (rect, annotated) = tokio::task::spawn_blocking(move || {
            locator
                .locate(&image, pattern.image(), method)
                .map(|rect| (rect, annotate(&image, rect)))
        })
        .await??;

        let name = format!("check-methods/method-{}-{}.png", method.index(), method.name());
        let image_path = storage.store_image(&name, &annotated).await?;

        let bottom_right = rect.bottom_right();
        log::info!(
            "Method {method}: ({}, {}) - ({}, {})",
            rect.x,
            rect.y,
            bottom_right.x,
            bottom_right.y
        );
        println!("   - {method}: ({}, {}) -> {}", rect.x, rect.y, image_path.display());
        checks.push(MethodCheck {
            method,
            rect,
            image_path,
        });
    }

    Ok(checks)
}
