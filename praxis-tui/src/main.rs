mod app;
mod columns;
mod config;
mod paths;
mod shell;

use std::fs::File;
use std::process::ExitCode;

use simplelog::Config as LogConfig;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use praxis_lib::cache::InMemoryCache;
use praxis_lib::PraxisClient;

use crate::app::App;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let log_path = paths::log_file();
    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(LevelFilter::Debug, LogConfig::default(), log_file);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = PraxisClient::builder()
        .url(config.base_url.clone())
        .timeout(config.timeout)
        .cache(InMemoryCache::new());
    if let Some(token) = &config.bearer_token {
        builder = builder.bearer_token(token);
    }
    let client = builder.build();

    log::info!("starting against {}", config.base_url);

    if let Err(e) = App::new(client, config.page_size).run().await {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
