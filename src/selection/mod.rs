// フレーム選択
// 照合結果を連番順に見て、上方向に一定量ずつ進むフレームだけを残す

pub mod selector;

pub use selector::{
    select_frames, Decision, SelectionOutcome, SelectionState, SelectionStats,
    SelectionThresholds, SequentialSelector,
};
