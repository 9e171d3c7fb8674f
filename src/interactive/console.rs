use super::{Confirmer, RegionSelector};
use crate::core::{FramePickerError, Frame, PickerResult};
use crate::template_matching::Region;
use ab_glyph::FontVec;
use image::{imageops, GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::io::{self, BufRead, BufReader, Stdin};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 2枚の画像を横に並べる（左: `left`、右: `right`）
pub fn side_by_side(left: &GrayImage, right: &GrayImage) -> GrayImage {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());

    let mut composite = GrayImage::new(width, height);
    imageops::replace(&mut composite, left, 0, 0);
    imageops::replace(&mut composite, right, left.width() as i64, 0);
    composite
}

const LEFT_LABEL: &str = "Last Selected Image";
const RIGHT_LABEL: &str = "Current Selected Image";
const LABEL_MARGIN: i32 = 10;
const LABEL_BACKGROUND: Luma<u8> = Luma([255]);
const LABEL_COLOR: Luma<u8> = Luma([0]);

/// ラベル描画用のフォントを読み込む
pub fn load_label_font(path: &Path) -> PickerResult<FontVec> {
    let data = std::fs::read(path).map_err(|e| {
        FramePickerError::configuration(format!("Failed to read font {}: {e}", path.display()))
    })?;
    FontVec::try_from_vec(data).map_err(|_| {
        FramePickerError::configuration(format!("Failed to parse font file: {}", path.display()))
    })
}

/// 左右の画像にラベルを描く。`left_width` は左画像の幅
pub fn draw_labels(composite: &mut GrayImage, left_width: u32, font: &FontVec) {
    let scale = (composite.height() as f32 / 30.0).max(16.0);
    let banner_height = (scale * 1.4) as u32;

    for (x, text) in [(0, LEFT_LABEL), (left_width as i32, RIGHT_LABEL)] {
        let banner_width = (text.len() as f32 * scale * 0.6) as u32 + 2 * LABEL_MARGIN as u32;
        draw_filled_rect_mut(
            composite,
            Rect::at(x + LABEL_MARGIN, LABEL_MARGIN).of_size(banner_width, banner_height),
            LABEL_BACKGROUND,
        );
        draw_text_mut(
            composite,
            LABEL_COLOR,
            x + 2 * LABEL_MARGIN,
            LABEL_MARGIN,
            scale,
            font,
            text,
        );
    }
}

fn read_answer<R: BufRead>(reader: &mut R) -> PickerResult<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(FramePickerError::interaction)?;
    if read == 0 {
        return Err(FramePickerError::interaction(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "terminal input closed",
        )));
    }

    let answer = line
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(&line);
    Ok(answer.to_string())
}

/// 標準入力の読み取り口
///
/// 確認と領域指定で標準入力を共有するため、1バイトずつ読んで次の行を先読みしない。
fn terminal_input() -> BufReader<Stdin> {
    BufReader::with_capacity(1, io::stdin())
}

fn preview_dir() -> PickerResult<TempDir> {
    tempfile::Builder::new()
        .prefix("frame-picker-")
        .tempdir()
        .map_err(FramePickerError::interaction)
}

fn write_preview(image: &GrayImage, path: &Path) -> PickerResult<()> {
    image
        .save(path)
        .map_err(|e| FramePickerError::persistence(path, e.into()))
}

/// 端末で採否を問い合わせる
///
/// 直前の採用フレームと候補を並べた画像を一時ディレクトリに書き出し、
/// 1行読み込む。スペース1文字なら採用、それ以外は不採用。
/// フォントがあれば左右にラベルを描き、なければラベルはログにだけ出す。
pub struct ConsoleConfirmer<R> {
    reader: R,
    preview_dir: TempDir,
    font: Option<FontVec>,
}

impl ConsoleConfirmer<BufReader<Stdin>> {
    pub fn stdin() -> PickerResult<Self> {
        Self::with_reader(terminal_input())
    }
}

impl<R: BufRead + Send> ConsoleConfirmer<R> {
    pub fn with_reader(reader: R) -> PickerResult<Self> {
        Ok(Self {
            reader,
            preview_dir: preview_dir()?,
            font: None,
        })
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn preview_path(&self) -> PathBuf {
        self.preview_dir.path().join("confirm.png")
    }

    fn load_full_resolution(frame: &Frame) -> PickerResult<GrayImage> {
        let image =
            image::open(frame.path()).map_err(|e| FramePickerError::image_decode(frame.path(), e))?;
        Ok(image.to_luma8())
    }
}

impl<R: BufRead + Send> Confirmer for ConsoleConfirmer<R> {
    fn confirm(&mut self, last: &Frame, candidate: &Frame) -> PickerResult<bool> {
        let left = Self::load_full_resolution(last)?;
        let mut composite = side_by_side(&left, &Self::load_full_resolution(candidate)?);
        if let Some(font) = &self.font {
            draw_labels(&mut composite, left.width(), font);
        }
        let preview = self.preview_path();
        write_preview(&composite, &preview)?;

        log::info!("Preview: {}", preview.display());
        log::info!("  left:  {LEFT_LABEL} ({})", last.file_name());
        log::info!("  right: {RIGHT_LABEL} ({})", candidate.file_name());
        log::info!("Press Space and Enter to confirm the current selection, anything else discards it.");

        let accepted = read_answer(&mut self.reader)? == " ";
        log::debug!(
            "{} {}",
            candidate.file_name(),
            if accepted { "confirmed" } else { "discarded" }
        );
        Ok(accepted)
    }
}

/// 端末で `x,y,width,height` を入力してもらう
pub struct ConsoleRegionSelector<R> {
    reader: R,
    preview_dir: TempDir,
}

impl ConsoleRegionSelector<BufReader<Stdin>> {
    pub fn stdin() -> PickerResult<Self> {
        Self::with_reader(terminal_input())
    }
}

impl<R: BufRead + Send> ConsoleRegionSelector<R> {
    pub fn with_reader(reader: R) -> PickerResult<Self> {
        Ok(Self {
            reader,
            preview_dir: preview_dir()?,
        })
    }

    pub fn preview_path(&self) -> PathBuf {
        self.preview_dir.path().join("template-preview.png")
    }
}

impl<R: BufRead + Send> RegionSelector for ConsoleRegionSelector<R> {
    fn select_region(&mut self, first_frame: &GrayImage) -> PickerResult<Region> {
        let preview = self.preview_path();
        write_preview(first_frame, &preview)?;

        let (width, height) = first_frame.dimensions();
        log::info!("Preview of the first frame ({width}x{height}): {}", preview.display());

        loop {
            log::info!("Select template to match, enter x,y,width,height:");
            let answer = read_answer(&mut self.reader)?;

            match answer
                .parse::<Region>()
                .and_then(|region| region.validate(width, height).map(|_| region))
            {
                Ok(region) => return Ok(region),
                Err(error) => log::warn!("{error}"),
            }
        }
    }
}
