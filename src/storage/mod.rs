use crate::core::{Frame, PickerResult};
use async_trait::async_trait;
use image::RgbImage;
use mockall::automock;
use std::path::{Path, PathBuf};

pub mod local;
pub mod report;

pub use local::LocalFrameStorage;
pub use report::{SelectedFrameEntry, SelectionReport};

/// 出力先のトレイト
#[automock]
#[async_trait]
pub trait FrameStorage: Send + Sync {
    /// 出力ディレクトリを用意する（なければ作成）
    async fn prepare(&self) -> PickerResult<()>;

    /// フレームを同じファイル名でそのままコピーする
    async fn store_frame(&self, frame: &Frame) -> PickerResult<PathBuf>;

    /// 診断画像を出力ディレクトリからの相対パス `name` に書き出す
    async fn store_image(&self, name: &str, image: &RgbImage) -> PickerResult<PathBuf>;

    /// 選択結果を JSON で書き出す
    async fn store_report(&self, path: &Path, report: &SelectionReport) -> PickerResult<()>;
}
