pub mod cli;
pub mod core;
pub mod file_scanner;
pub mod image_loader;
pub mod interactive;
pub mod processing;
pub mod selection;
pub mod storage;
pub mod template_matching;

pub use crate::core::{FramePickerError, PickerResult, RunConfig};
