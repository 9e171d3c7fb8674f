use super::{MatchMethod, PatternLocator, ScoreOrientation};
use crate::core::{FramePickerError, MatchRect, PickerResult};
use image::GrayImage;
use rustfft::{num_complex::Complex, FftPlanner};

/// 画素値と二乗値の積分画像
///
/// `(width + 1) x (height + 1)` の表で、先頭行・先頭列は0。
struct IntegralImage {
    stride: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl IntegralImage {
    fn new(image: &GrayImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let stride = width + 1;
        let mut sums = vec![0u64; stride * (height + 1)];
        let mut squares = vec![0u64; stride * (height + 1)];
        let raw = image.as_raw();

        for y in 0..height {
            let mut row_sum = 0u64;
            let mut row_square = 0u64;
            for x in 0..width {
                let value = raw[y * width + x] as u64;
                row_sum += value;
                row_square += value * value;
                let index = (y + 1) * stride + x + 1;
                sums[index] = sums[index - stride] + row_sum;
                squares[index] = squares[index - stride] + row_square;
            }
        }

        Self {
            stride,
            sums,
            squares,
        }
    }

    /// (x, y) を左上とする w x h の窓の (合計, 二乗和)
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let s = self.stride;
        let (top_left, top_right) = (y * s + x, y * s + x + w);
        let (bottom_left, bottom_right) = ((y + h) * s + x, (y + h) * s + x + w);

        let sum = self.sums[bottom_right] + self.sums[top_left]
            - self.sums[top_right]
            - self.sums[bottom_left];
        let square = self.squares[bottom_right] + self.squares[top_left]
            - self.squares[top_right]
            - self.squares[bottom_left];

        (sum as f64, square as f64)
    }
}

/// テンプレート統計量
struct PatternStats {
    sum: f64,
    square: f64,
    count: f64,
}

impl PatternStats {
    fn new(pattern: &GrayImage) -> Self {
        let (sum, square) = pattern.as_raw().iter().fold((0u64, 0u64), |(s, q), &v| {
            let v = v as u64;
            (s + v, q + v * v)
        });

        Self {
            sum: sum as f64,
            square: square as f64,
            count: pattern.as_raw().len() as f64,
        }
    }
}

/// 全オフセットの Σ T·I（フレームと同じ行優先の並びで `y * W + x`）
///
/// テンプレートをフレームの行幅で並べ直し、1次元の FFT 相互相関として計算する。
/// 有効な位置では行の折り返しも循環の回り込みも起きない。
/// 真の値は整数なので丸めて浮動小数点誤差を消す。
fn cross_correlation(frame: &GrayImage, pattern: &GrayImage) -> Vec<f64> {
    let frame_width = frame.width() as usize;
    let pattern_width = pattern.width() as usize;
    let used = frame.as_raw().len();
    let len = used.next_power_of_two();
    let zero = Complex::new(0.0, 0.0);

    let mut frame_freq: Vec<Complex<f64>> = frame
        .as_raw()
        .iter()
        .map(|&v| Complex::new(v as f64, 0.0))
        .chain(std::iter::repeat(zero))
        .take(len)
        .collect();

    let mut pattern_freq = vec![zero; len];
    for (row, values) in pattern.as_raw().chunks_exact(pattern_width).enumerate() {
        let start = row * frame_width;
        for (slot, &v) in pattern_freq[start..start + pattern_width].iter_mut().zip(values) {
            *slot = Complex::new(v as f64, 0.0);
        }
    }

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(len);
    forward.process(&mut frame_freq);
    forward.process(&mut pattern_freq);

    let mut product: Vec<Complex<f64>> = frame_freq
        .iter()
        .zip(&pattern_freq)
        .map(|(&i, &t)| i * t.conj())
        .collect();
    planner.plan_fft_inverse(len).process(&mut product);

    let norm = len as f64;
    product
        .iter()
        .take(used)
        .map(|c| (c.re / norm).round())
        .collect()
}

/// 全ての候補位置のスコア面
#[derive(Debug, Clone)]
pub struct ScoreSurface {
    width: u32,
    height: u32,
    scores: Vec<f64>,
}

impl ScoreSurface {
    /// `(W - w + 1) x (H - h + 1)` のスコア面を計算する
    pub fn compute(
        frame: &GrayImage,
        pattern: &GrayImage,
        method: MatchMethod,
    ) -> PickerResult<Self> {
        let (fw, fh) = frame.dimensions();
        let (pw, ph) = pattern.dimensions();

        if pw == 0 || ph == 0 {
            return Err(FramePickerError::pattern_location("pattern is empty"));
        }
        if pw > fw || ph > fh {
            return Err(FramePickerError::pattern_location(format!(
                "pattern {pw}x{ph} does not fit into frame {fw}x{fh}"
            )));
        }

        let width = fw - pw + 1;
        let height = fh - ph + 1;
        let integral = IntegralImage::new(frame);
        let stats = PatternStats::new(pattern);

        let cross = cross_correlation(frame, pattern);
        let (fw, pw, ph) = (fw as usize, pw as usize, ph as usize);

        let mut scores = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let (window_sum, window_square) = integral.window(x, y, pw, ph);
                scores.push(Self::score(
                    method,
                    cross[y * fw + x],
                    window_sum,
                    window_square,
                    &stats,
                ));
            }
        }

        Ok(Self {
            width,
            height,
            scores,
        })
    }

    fn score(
        method: MatchMethod,
        cross: f64,
        window_sum: f64,
        window_square: f64,
        stats: &PatternStats,
    ) -> f64 {
        match method {
            MatchMethod::SqDiff => window_square - 2.0 * cross + stats.square,
            MatchMethod::SqDiffNormed => {
                let numerator = window_square - 2.0 * cross + stats.square;
                let denominator = (stats.square * window_square).sqrt();
                if denominator > f64::EPSILON {
                    numerator / denominator
                } else if numerator.abs() <= f64::EPSILON {
                    0.0
                } else {
                    1.0
                }
            }
            MatchMethod::CCorr => cross,
            MatchMethod::CCorrNormed => {
                let denominator = (stats.square * window_square).sqrt();
                if denominator > f64::EPSILON {
                    cross / denominator
                } else {
                    0.0
                }
            }
            MatchMethod::CCoeff => cross - stats.sum * window_sum / stats.count,
            MatchMethod::CCoeffNormed => {
                let numerator = cross - stats.sum * window_sum / stats.count;
                let pattern_var = stats.square - stats.sum * stats.sum / stats.count;
                let window_var = window_square - window_sum * window_sum / stats.count;
                let denominator = (pattern_var.max(0.0) * window_var.max(0.0)).sqrt();
                if denominator > f64::EPSILON {
                    numerator / denominator
                } else {
                    0.0
                }
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn score_at(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get((y * self.width + x) as usize).copied()
    }

    /// 最良スコアの位置。同点の場合は行優先で最初の位置
    pub fn best_location(&self, orientation: ScoreOrientation) -> (u32, u32) {
        let mut best_index = 0;
        for (index, &score) in self.scores.iter().enumerate().skip(1) {
            let best = self.scores[best_index];
            let better = match orientation {
                ScoreOrientation::Minimize => score < best,
                ScoreOrientation::Maximize => score > best,
            };
            if better {
                best_index = index;
            }
        }

        let width = self.width as usize;
        ((best_index % width) as u32, (best_index / width) as u32)
    }
}

/// 全位置のスコア面から最良位置を選ぶ実装（相関項は FFT、窓の統計量は積分画像）
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationLocator;

impl CorrelationLocator {
    pub fn new() -> Self {
        Self
    }
}

impl PatternLocator for CorrelationLocator {
    fn locate(
        &self,
        frame: &GrayImage,
        pattern: &GrayImage,
        method: MatchMethod,
    ) -> PickerResult<MatchRect> {
        let surface = ScoreSurface::compute(frame, pattern, method)?;
        let (x, y) = surface.best_location(method.orientation());

        Ok(MatchRect::new(x, y, pattern.width(), pattern.height()))
    }
}
