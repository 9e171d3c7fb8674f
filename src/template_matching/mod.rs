use crate::core::{FramePickerError, MatchRect, PickerResult};
use image::GrayImage;
use std::fmt;

pub mod correlation;
pub mod pattern;

pub use correlation::{CorrelationLocator, ScoreSurface};
pub use pattern::{ReferencePattern, Region};

/// スコアの向き（小さいほど良いか、大きいほど良いか）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrientation {
    Minimize,
    Maximize,
}

/// テンプレート照合のスコア計算方式
///
/// 番号はコマンドラインの `--method` に対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMethod {
    /// 平均を引いた相互相関
    #[default]
    CCoeff,
    /// 正規化した相関係数
    CCoeffNormed,
    /// 相互相関
    CCorr,
    /// 正規化相互相関
    CCorrNormed,
    /// 差の二乗和
    SqDiff,
    /// 正規化した差の二乗和
    SqDiffNormed,
}

impl MatchMethod {
    /// 番号順の全方式
    pub const ALL: [MatchMethod; 6] = [
        MatchMethod::CCoeff,
        MatchMethod::CCoeffNormed,
        MatchMethod::CCorr,
        MatchMethod::CCorrNormed,
        MatchMethod::SqDiff,
        MatchMethod::SqDiffNormed,
    ];

    pub fn from_index(index: usize) -> PickerResult<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            FramePickerError::configuration(format!(
                "Method can be between 0 and {}, got {index}",
                Self::ALL.len() - 1
            ))
        })
    }

    pub fn index(&self) -> usize {
        match self {
            MatchMethod::CCoeff => 0,
            MatchMethod::CCoeffNormed => 1,
            MatchMethod::CCorr => 2,
            MatchMethod::CCorrNormed => 3,
            MatchMethod::SqDiff => 4,
            MatchMethod::SqDiffNormed => 5,
        }
    }

    pub fn orientation(&self) -> ScoreOrientation {
        match self {
            MatchMethod::SqDiff | MatchMethod::SqDiffNormed => ScoreOrientation::Minimize,
            MatchMethod::CCoeff
            | MatchMethod::CCoeffNormed
            | MatchMethod::CCorr
            | MatchMethod::CCorrNormed => ScoreOrientation::Maximize,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchMethod::CCoeff => "ccoeff",
            MatchMethod::CCoeffNormed => "ccoeff-normed",
            MatchMethod::CCorr => "ccorr",
            MatchMethod::CCorrNormed => "ccorr-normed",
            MatchMethod::SqDiff => "sqdiff",
            MatchMethod::SqDiffNormed => "sqdiff-normed",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

/// フレーム内でテンプレートが最もよく一致する矩形を求める
pub trait PatternLocator: Send + Sync {
    fn locate(
        &self,
        frame: &GrayImage,
        pattern: &GrayImage,
        method: MatchMethod,
    ) -> PickerResult<MatchRect>;
}
