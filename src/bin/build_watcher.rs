//! build-watcher
//!
//! Запускает команды сборки и завершается с кодом 0, как только в выводе
//! появляется строка успеха. Иначе (команда упала, строки не было,
//! процесс прерван) - код 1.
//!
//! Использование: `build-watcher [COMMAND ...]`; без аргументов команды берутся
//! из WATCHER_COMMANDS (через `;;`) или из набора по умолчанию.

use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{
    config::WatcherConfig,
    watcher::{BuildWatcher, WatchOutcome},
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let mut config = WatcherConfig::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        config.commands = args;
    }

    let watcher = BuildWatcher::from_config(&config);
    info!("{} build commands queued", watcher.commands().len());

    tokio::select! {
        result = watcher.run() => match result {
            Ok(WatchOutcome::SuccessMessageFound { command }) => {
                info!("✨ {} (from `{}`)", config.success_message, command);
                ExitCode::SUCCESS
            }
            Ok(WatchOutcome::SuccessMessageNotFound) => ExitCode::FAILURE,
            Err(e) => {
                error!("❌ {}", e);
                ExitCode::FAILURE
            }
        },
        _ = shutdown_signal() => {
            warn!("🛑 Build process interrupted");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
