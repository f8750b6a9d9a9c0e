//! Whole-site mirroring through an external `wget` process
//!
//! This is the alternative to the built-in harvest: wget walks the snapshot
//! itself, rewrites links for offline use and fetches page requisites.

use crate::config::{Config, MirrorConfig};
use crate::HarvestError;
use tokio::process::Command;

/// Builds the wget argument list for mirroring `seed`
pub fn wget_args(config: &MirrorConfig, seed: &str) -> Vec<String> {
    let mut args = vec![
        "--mirror".to_string(),
        "--convert-links".to_string(),
        "--adjust-extension".to_string(),
        "--page-requisites".to_string(),
        "--no-parent".to_string(),
        format!("--wait={}", config.wait_secs),
    ];

    if config.random_wait {
        args.push("--random-wait".to_string());
    }

    if config.ignore_robots {
        args.push("-e".to_string());
        args.push("robots=off".to_string());
    }

    args.push(format!("--directory-prefix={}", config.directory_prefix));
    args.push(seed.to_string());
    args
}

/// Runs wget against the configured seed and waits for it to finish
///
/// The exit status is logged and returned but never treated as an error;
/// wget reports partial failures (a single 404 among thousands of files)
/// through its exit code. Only a failure to start the process is an error.
///
/// # Returns
///
/// * `Ok(Some(code))` - wget exited with `code`
/// * `Ok(None)` - wget was terminated by a signal
/// * `Err(HarvestError::Mirror)` - wget could not be started
pub async fn mirror(config: &Config) -> Result<Option<i32>, HarvestError> {
    let args = wget_args(&config.mirror, &config.crawler.seed);

    tracing::info!(
        "Mirroring {} into {} with {}",
        config.crawler.seed,
        config.mirror.directory_prefix,
        config.mirror.wget_path
    );
    tracing::debug!("wget arguments: {:?}", args);

    let status = Command::new(&config.mirror.wget_path)
        .args(&args)
        .status()
        .await
        .map_err(|e| {
            HarvestError::Mirror(format!(
                "Failed to run {}: {}",
                config.mirror.wget_path, e
            ))
        })?;

    match status.code() {
        Some(0) => tracing::info!("Mirror finished successfully"),
        Some(code) => tracing::warn!("wget exited with code {}", code),
        None => tracing::warn!("wget was terminated by a signal"),
    }

    Ok(status.code())
}
