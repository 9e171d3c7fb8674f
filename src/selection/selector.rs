use crate::core::{MatchResult, PickerResult, Point, ReferenceExtent};
use crate::interactive::Confirmer;
use serde::Serialize;

/// 基準サイズから求める閾値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionThresholds {
    /// 平均移動量からの許容幅（高さの1%）
    pub delta_y: f64,
    /// 横方向のずれの上限（幅の2%）
    pub template_x: f64,
}

impl SelectionThresholds {
    pub fn from_extent(extent: ReferenceExtent) -> Self {
        Self {
            delta_y: 0.01 * extent.height as f64,
            template_x: 0.02 * extent.width as f64,
        }
    }
}

/// 1候補に対する判定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// 採用。最初の採用は基準になるだけで平均には入らない
    Accepted { delta_y: f64 },
    /// 横方向のずれが大きい
    Drifted,
    /// 上方向に進んでいない
    NoProgress,
    /// 確認で不採用になった
    Discarded,
}

/// 選択処理の状態
#[derive(Debug, Clone)]
pub struct SelectionState {
    min_point: Point,
    avg_delta_y: Option<f64>,
    selected: Vec<MatchResult>,
}

impl SelectionState {
    fn new(extent: ReferenceExtent) -> Self {
        Self {
            min_point: Point::new(0, extent.height),
            avg_delta_y: None,
            selected: Vec::new(),
        }
    }

    /// 直前に採用したフレームの一致位置
    pub fn min_point(&self) -> Point {
        self.min_point
    }

    /// 採用済みの移動量の平均。履歴がなければ0
    pub fn avg_delta_y(&self) -> f64 {
        self.avg_delta_y.unwrap_or(0.0)
    }
}

/// 判定の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    pub drift_rejections: usize,
    pub no_progress_rejections: usize,
    pub confirmations_requested: usize,
    pub confirmations_rejected: usize,
}

/// 選択結果
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub selected: Vec<MatchResult>,
    pub avg_delta_y: f64,
    pub stats: SelectionStats,
    pub thresholds: SelectionThresholds,
}

/// 連番順に1件ずつ採否を決める
#[derive(Debug, Clone)]
pub struct SequentialSelector {
    thresholds: SelectionThresholds,
    state: SelectionState,
    stats: SelectionStats,
}

impl SequentialSelector {
    pub fn new(extent: ReferenceExtent) -> Self {
        Self {
            thresholds: SelectionThresholds::from_extent(extent),
            state: SelectionState::new(extent),
            stats: SelectionStats::default(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// 候補を判定し、採用なら状態を更新する。不採用なら状態は変わらない
    pub fn consider<C>(&mut self, candidate: MatchResult, confirmer: &mut C) -> PickerResult<Decision>
    where
        C: Confirmer + ?Sized,
    {
        let top_left = candidate.rect.top_left();
        let min_point = self.state.min_point;

        if min_point.x != 0 && top_left.x.abs_diff(min_point.x) as f64 >= self.thresholds.template_x {
            self.stats.drift_rejections += 1;
            log::debug!("{} drifted sideways to x={}", candidate.frame.file_name(), top_left.x);
            return Ok(Decision::Drifted);
        }

        if top_left.y >= min_point.y {
            self.stats.no_progress_rejections += 1;
            log::debug!("{} did not move up (y={})", candidate.frame.file_name(), top_left.y);
            return Ok(Decision::NoProgress);
        }

        let delta_y = (min_point.y - top_left.y) as f64;

        if let Some(avg) = self.state.avg_delta_y {
            if delta_y > avg + self.thresholds.delta_y {
                if let Some(last) = self.state.selected.last() {
                    log::info!(
                        "Found an image which has template higher than average ({delta_y:.1} > {avg:.1}). Need confirmation!"
                    );
                    self.stats.confirmations_requested += 1;
                    if !confirmer.confirm(&last.frame, &candidate.frame)? {
                        self.stats.confirmations_rejected += 1;
                        return Ok(Decision::Discarded);
                    }
                }
            }
        }

        if !self.state.selected.is_empty() {
            self.state.avg_delta_y = Some(match self.state.avg_delta_y {
                None => delta_y,
                Some(avg) => (avg + delta_y) / 2.0,
            });
        }
        self.state.min_point = top_left;
        self.state.selected.push(candidate);

        Ok(Decision::Accepted { delta_y })
    }

    pub fn finish(self) -> SelectionOutcome {
        SelectionOutcome {
            avg_delta_y: self.state.avg_delta_y(),
            selected: self.state.selected,
            stats: self.stats,
            thresholds: self.thresholds,
        }
    }
}

/// 照合結果を連番順に並べ、採用するフレームを決める
pub fn select_frames<C>(
    mut results: Vec<MatchResult>,
    extent: ReferenceExtent,
    confirmer: &mut C,
) -> PickerResult<SelectionOutcome>
where
    C: Confirmer + ?Sized,
{
    results.sort_by(|a, b| {
        a.frame
            .sequence
            .cmp(&b.frame.sequence)
            .then_with(|| a.frame.path.cmp(&b.frame.path))
    });

    let mut selector = SequentialSelector::new(extent);
    for result in results {
        selector.consider(result, confirmer)?;
    }

    let outcome = selector.finish();
    log::info!(
        "Selected {} frames (average step {:.1})",
        outcome.selected.len(),
        outcome.avg_delta_y
    );
    Ok(outcome)
}
