// 統合テスト用の合成フレーム
// 縦長の原稿を少しずつ送りながら撮影したフレームを模倣する

#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 位置ごとに異なる値を持つ原稿
pub fn textured_document(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mixed = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663))
            .wrapping_mul(2_654_435_761);
        Luma([(mixed >> 24) as u8])
    })
}

/// 書き出したフレーム一式
pub struct ScanFixture {
    pub dir: TempDir,
    pub paths: Vec<PathBuf>,
}

impl ScanFixture {
    pub fn images_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("selected")
    }
}

/// `frames` の (ファイル名, 送り量) ごとに `width x height` のフレームを書き出す
pub fn write_scroll_frames(frames: &[(&str, u32)], width: u32, height: u32) -> ScanFixture {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let max_offset = frames.iter().map(|(_, offset)| *offset).max().unwrap_or(0);
    let document = textured_document(width, height + max_offset);

    let paths = frames
        .iter()
        .map(|(name, offset)| {
            let frame = image::imageops::crop_imm(&document, 0, *offset, width, height).to_image();
            let path = dir.path().join(name);
            frame.save(&path).expect("Failed to write frame");
            path
        })
        .collect();

    ScanFixture { dir, paths }
}

/// 出力ディレクトリ内のファイル名（ソート済み）
pub fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
