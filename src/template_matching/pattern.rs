use crate::core::{FramePickerError, PickerResult, ReferenceExtent};
use image::{imageops, GrayImage};
use serde::Serialize;
use std::str::FromStr;

/// 縮小済み先頭フレーム上の矩形領域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 領域が空でなく、`width x height` の画像に収まることを確認する
    pub fn validate(&self, width: u32, height: u32) -> PickerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FramePickerError::configuration(
                "Template region must have a positive width and height",
            ));
        }

        let fits_x = self.x.checked_add(self.width).is_some_and(|right| right <= width);
        let fits_y = self.y.checked_add(self.height).is_some_and(|bottom| bottom <= height);
        if !fits_x || !fits_y {
            return Err(FramePickerError::configuration(format!(
                "Template region {self} is outside of the {width}x{height} frame"
            )));
        }

        Ok(())
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// `x,y,width,height` 形式の文字列を解析する
impl FromStr for Region {
    type Err = FramePickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                FramePickerError::configuration(format!("Invalid template region '{s}': {e}"))
            })?;

        match values.as_slice() {
            [x, y, width, height] => Ok(Self::new(*x, *y, *width, *height)),
            _ => Err(FramePickerError::configuration(format!(
                "Template region must be x,y,width,height, got '{s}'"
            ))),
        }
    }
}

/// 先頭フレームから切り出した照合用テンプレート
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    image: GrayImage,
    region: Region,
    extent: ReferenceExtent,
}

impl ReferencePattern {
    /// 縮小済み先頭フレームから `region` を切り出す
    pub fn extract(frame: &GrayImage, region: Region) -> PickerResult<Self> {
        let (width, height) = frame.dimensions();
        region.validate(width, height)?;

        let image =
            imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();

        Ok(Self {
            image,
            region,
            extent: ReferenceExtent::new(width, height),
        })
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// 切り出し元フレームの大きさ
    pub fn extent(&self) -> ReferenceExtent {
        self.extent
    }
}
