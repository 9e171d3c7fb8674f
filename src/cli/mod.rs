// CLI層 - コマンドライン引数の定義と処理
// ユーザーインターフェースとアプリケーションロジックの橋渡し

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;

use crate::core::{PickerResult, RunConfig, RunMode};
use crate::interactive::{
    load_label_font, AlwaysAccept, Confirmer, ConsoleConfirmer, ConsoleRegionSelector,
    FixedRegion, RegionSelector,
};
use crate::processing::ConsoleProgressReporter;
use crate::storage::LocalFrameStorage;
use std::sync::Arc;

fn region_selector(config: &RunConfig) -> PickerResult<Box<dyn RegionSelector>> {
    Ok(match config.template {
        Some(region) => Box::new(FixedRegion(region)),
        None => Box::new(ConsoleRegionSelector::stdin()?),
    })
}

fn confirmer(config: &RunConfig) -> PickerResult<Box<dyn Confirmer>> {
    if config.auto_accept {
        return Ok(Box::new(AlwaysAccept));
    }

    let confirmer = ConsoleConfirmer::stdin()?;
    Ok(match &config.label_font {
        Some(path) => Box::new(confirmer.with_font(load_label_font(path)?)),
        None => Box::new(confirmer),
    })
}

/// 設定に従ってコマンドを実行する
pub async fn run(cli: Cli) -> PickerResult<()> {
    let config = cli.into_run_config()?;
    let storage = LocalFrameStorage::new(&config.output_dir);

    match config.mode {
        RunMode::Select => {
            execute_select(
                &config,
                region_selector(&config)?,
                confirmer(&config)?,
                &storage,
                Arc::new(ConsoleProgressReporter::new()),
            )
            .await?;
        }
        RunMode::CheckMethods => {
            execute_check_methods(&config, region_selector(&config)?, &storage).await?;
        }
    }

    Ok(())
}
