use super::FramePreprocessor;
use crate::core::{FramePickerError, PickerResult};
use async_trait::async_trait;
use image::imageops::FilterType;
use image::GrayImage;
use std::path::Path;

/// デコード → グレースケール → Lanczos3 縮小を行う標準実装
#[derive(Clone, Debug)]
pub struct GrayscalePreprocessor {
    scale_down: f64,
}

impl Default for GrayscalePreprocessor {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl GrayscalePreprocessor {
    pub fn new(scale_down: f64) -> Self {
        Self { scale_down }
    }

    /// 縮小後の寸法（四捨五入、最小1ピクセル）
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |dim: u32| ((dim as f64 / self.scale_down).round() as u32).max(1);
        (scale(width), scale(height))
    }

    /// 同期版。ブロッキングスレッドから呼び出す
    pub fn decode_and_downsample(&self, path: &Path) -> PickerResult<GrayImage> {
        let image = image::open(path).map_err(|e| FramePickerError::image_decode(path, e))?;
        Ok(self.downsample(image.to_luma8()))
    }

    /// 縮小率1なら入力をそのまま返す
    pub fn downsample(&self, image: GrayImage) -> GrayImage {
        if self.scale_down == 1.0 {
            return image;
        }

        let (width, height) = self.target_dimensions(image.width(), image.height());
        image::imageops::resize(&image, width, height, FilterType::Lanczos3)
    }
}

#[async_trait]
impl FramePreprocessor for GrayscalePreprocessor {
    async fn preprocess(&self, path: &Path) -> PickerResult<GrayImage> {
        let preprocessor = self.clone();
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || preprocessor.decode_and_downsample(&path)).await?
    }

    fn scale_down(&self) -> f64 {
        self.scale_down
    }
}
