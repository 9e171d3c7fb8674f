// 並列照合システムのモジュール

pub mod implementations;
pub mod parallel_execution;
pub mod traits;

#[cfg(test)]
pub mod tests;

// 公開API
pub use implementations::{ConsoleProgressReporter, DefaultProcessingConfig, NoOpProgressReporter};
pub use parallel_execution::{MatchJob, MatchPipeline};
pub use traits::{ProcessingConfig, ProgressReporter};
