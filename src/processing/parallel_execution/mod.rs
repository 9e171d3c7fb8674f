// 並列実行機能
// 作業キューとワーカープールによる照合

pub mod consumer;
pub mod pipeline;
pub mod producer;

use crate::template_matching::{MatchMethod, ReferencePattern};

pub use consumer::{match_single_frame, spawn_consumers, spawn_single_consumer};
pub use pipeline::MatchPipeline;
pub use producer::fill_work_queue;

/// 全ワーカーで共有する照合内容
#[derive(Debug, Clone)]
pub struct MatchJob {
    pub pattern: ReferencePattern,
    pub method: MatchMethod,
}

impl MatchJob {
    pub fn new(pattern: ReferencePattern, method: MatchMethod) -> Self {
        Self { pattern, method }
    }
}
