use clap::Parser;
use frame_picker::cli::{run, Cli};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        log::error!("❌ {error}");
        if let Some(suggestion) = error.context().suggestion {
            log::error!("   {suggestion}");
        }
        std::process::exit(1);
    }
}
