//! Tracing setup.
//!
//! The terminal belongs to the UI, so log output goes to the configured
//! error log file instead of stderr.

use crate::config::TuiConfig;
use crate::error::TuiError;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing(config: &TuiConfig) -> Result<(), TuiError> {
    if let Some(parent) = config.error_log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.error_log_path)?;

    let env_filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| TuiError::Logging(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        log_path = %config.error_log_path.display(),
        "Tracing initialized"
    );
    Ok(())
}
