// テスト用の共通データ
// スクロール撮影を模した合成フレームを作成する

use crate::core::{Frame, Point};
use crate::template_matching::{ReferencePattern, Region};
use image::{GrayImage, Luma};
use std::path::Path;
use tempfile::TempDir;

pub const FRAME_WIDTH: u32 = 48;
pub const FRAME_HEIGHT: u32 = 64;

/// 先頭フレーム上のテンプレート領域
pub const PATTERN_REGION: Region = Region::new(10, 40, 16, 12);

/// 位置ごとに異なる値を持つ縦長の原稿
pub fn textured_document(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mixed = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663))
            .wrapping_mul(2_654_435_761);
        Luma([(mixed >> 24) as u8])
    })
}

/// 合成フレーム一式
pub struct ScrollFixture {
    pub dir: TempDir,
    pub frames: Vec<Frame>,
    pub offsets: Vec<u32>,
    first_frame: GrayImage,
}

impl ScrollFixture {
    pub fn pattern(&self) -> ReferencePattern {
        ReferencePattern::extract(&self.first_frame, PATTERN_REGION)
            .expect("pattern region fits the first frame")
    }

    /// `index` 番目のフレームでテンプレートが現れる位置
    pub fn expected_top_left(&self, index: usize) -> Point {
        Point::new(PATTERN_REGION.x, PATTERN_REGION.y - self.offsets[index])
    }
}

/// 原稿を `offsets` 行ずつ送ったフレームを `f1.png`, `f2.png`, ... として書き出す
pub fn scroll_fixture(offsets: &[u32]) -> ScrollFixture {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let document = textured_document(FRAME_WIDTH, FRAME_HEIGHT + PATTERN_REGION.y);

    let mut frames = Vec::new();
    let mut first_frame = None;
    for (index, &offset) in offsets.iter().enumerate() {
        let frame_image =
            image::imageops::crop_imm(&document, 0, offset, FRAME_WIDTH, FRAME_HEIGHT).to_image();
        let sequence = index as u64 + 1;
        let path = dir.path().join(format!("f{sequence}.png"));
        frame_image.save(&path).expect("Failed to write frame");

        first_frame.get_or_insert(frame_image);
        frames.push(Frame::new(path, sequence));
    }

    ScrollFixture {
        dir,
        frames,
        offsets: offsets.to_vec(),
        first_frame: first_frame.unwrap_or_else(|| GrayImage::new(FRAME_WIDTH, FRAME_HEIGHT)),
    }
}

/// デコードできないフレームを書き出す
pub fn write_corrupt_frame(dir: &Path, name: &str, sequence: u64) -> Frame {
    let path = dir.join(name);
    std::fs::write(&path, b"not a valid image").expect("Failed to write corrupt frame");
    Frame::new(path, sequence)
}
