// オペレーターとの対話
// 大きな移動量の確認とテンプレート領域の指定

use crate::core::{Frame, PickerResult};
use crate::template_matching::Region;
use image::GrayImage;
use mockall::automock;

pub mod console;

pub use console::{
    draw_labels, load_label_font, side_by_side, ConsoleConfirmer, ConsoleRegionSelector,
};

/// 平均より大きく進んだフレームを採用するか問い合わせる
///
/// 戻るまで選択処理は停止する。
#[automock]
pub trait Confirmer: Send {
    fn confirm(&mut self, last: &Frame, candidate: &Frame) -> PickerResult<bool>;
}

impl Confirmer for Box<dyn Confirmer> {
    fn confirm(&mut self, last: &Frame, candidate: &Frame) -> PickerResult<bool> {
        self.as_mut().confirm(last, candidate)
    }
}

/// 常に採用する（非対話実行とテスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl Confirmer for AlwaysAccept {
    fn confirm(&mut self, last: &Frame, candidate: &Frame) -> PickerResult<bool> {
        log::info!(
            "Accepting large jump {} -> {} without confirmation",
            last.file_name(),
            candidate.file_name()
        );
        Ok(true)
    }
}

/// 縮小済み先頭フレームからテンプレート領域を決める
#[automock]
pub trait RegionSelector: Send {
    fn select_region(&mut self, first_frame: &GrayImage) -> PickerResult<Region>;
}

impl RegionSelector for Box<dyn RegionSelector> {
    fn select_region(&mut self, first_frame: &GrayImage) -> PickerResult<Region> {
        self.as_mut().select_region(first_frame)
    }
}

/// コマンドラインで指定された領域
#[derive(Debug, Clone, Copy)]
pub struct FixedRegion(pub Region);

impl RegionSelector for FixedRegion {
    fn select_region(&mut self, first_frame: &GrayImage) -> PickerResult<Region> {
        let (width, height) = first_frame.dimensions();
        self.0.validate(width, height)?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_accept() {
        let mut confirmer = AlwaysAccept;

        let accepted = confirmer
            .confirm(&Frame::new("f1.png", 1), &Frame::new("f2.png", 2))
            .unwrap();

        assert!(accepted);
    }

    #[test]
    fn test_fixed_region_is_validated() {
        let frame = GrayImage::new(40, 30);

        let mut inside = FixedRegion(Region::new(0, 0, 40, 30));
        assert_eq!(inside.select_region(&frame).unwrap(), Region::new(0, 0, 40, 30));

        let mut outside = FixedRegion(Region::new(30, 0, 20, 10));
        assert!(outside.select_region(&frame).is_err());
    }
}
