use crate::core::PickerResult;
use async_trait::async_trait;
use image::GrayImage;
use std::path::Path;

pub mod standard;

pub use standard::GrayscalePreprocessor;

/// フレーム前処理のトレイト
///
/// 照合に使う縮小済みグレースケール画像を返す。
#[async_trait]
pub trait FramePreprocessor: Send + Sync {
    /// ファイルを読み込み、グレースケール化して縮小する
    async fn preprocess(&self, path: &Path) -> PickerResult<GrayImage>;

    /// 縮小率（元の寸法をこの値で割る）
    fn scale_down(&self) -> f64;
}
