use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// Route `log` output to a file. The terminal is in raw mode while the app
/// runs, so nothing may be written to stdout or stderr. The level comes from
/// `RUST_LOG`, defaulting to `info`.
pub fn init_logger(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn logger_writes_records_to_the_requested_file() {
        let dir = TempDir::new().expect("create temp dir");
        let log_path = dir.path().join("logs").join("registry.log");

        init_logger(&log_path).expect("install logger");
        log::error!("logger smoke record");
        log::logger().flush();

        let contents = fs::read_to_string(&log_path).expect("read log file");
        assert!(contents.contains("logger smoke record"));
    }
}
