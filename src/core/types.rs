// フレーム選択に関連するデータ型定義

use serde::Serialize;
use std::path::{Path, PathBuf};

/// 入力ディレクトリ内の1フレーム
///
/// `sequence` はファイル名の拡張子直前の数字列から取り出した連番。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub path: PathBuf,
    pub sequence: u64,
}

impl Frame {
    pub fn new(path: impl Into<PathBuf>, sequence: u64) -> Self {
        Self {
            path: path.into(),
            sequence,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ベースファイル名（出力先でもこの名前を使う）
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// 縮小座標系での点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// テンプレートの最良一致位置（左上座標 + テンプレートサイズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MatchRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// 右下（排他的）の座標
    pub const fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// 1フレーム分の照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub frame: Frame,
    pub rect: MatchRect,
}

impl MatchResult {
    pub fn new(frame: Frame, rect: MatchRect) -> Self {
        Self { frame, rect }
    }
}

/// 閾値計算の基準となる大きさ（テンプレートを切り出した縮小済み先頭フレームのサイズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceExtent {
    pub width: u32,
    pub height: u32,
}

impl ReferenceExtent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
