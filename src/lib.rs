pub mod config;
pub mod crm;
pub mod csv_import;
pub mod dates;
pub mod errors;
pub mod generator;
pub mod ids;
pub mod messaging;
pub mod models;
pub mod redaction;
pub mod secretary;
pub mod seed;
pub mod selection;
pub mod share;
pub mod state;
pub mod store;
pub mod toast;
pub mod undo;
pub mod views;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use commands::run;

pub use crate::crm::CrmCore;
pub use crate::errors::{AppError, AppResult};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// JSON logs, rolled daily, under `<app_data_dir>/logs/crm.log`.
pub fn init_tracing(app_data_dir: &Path) -> Result<(), String> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "crm.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

pub fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
