use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

const MAX_SESSION_LOGS: usize = 10;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber, writing to stderr and to
/// `<data_dir>/logs/latest.log`.
///
/// - Rotates a previous `latest.log` → `session-{timestamp}.log`
/// - Keeps at most 10 rotated sessions
/// - Falls back to stderr alone when the log file cannot be opened
///
/// Returns the log file path when file logging is active. Calling this more
/// than once keeps the first subscriber.
pub async fn init_logging(data_dir: &Path) -> Option<PathBuf> {
    match open_session_log(data_dir).await {
        Some((path, file)) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .try_init();
            Some(path)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

async fn open_session_log(data_dir: &Path) -> Option<(PathBuf, std::fs::File)> {
    let logs_dir = data_dir.join("logs");
    tokio::fs::create_dir_all(&logs_dir).await.ok()?;

    let latest = logs_dir.join("latest.log");
    if tokio::fs::try_exists(&latest).await.unwrap_or(false) {
        let ts = chrono::Utc::now().timestamp_millis();
        let rotated = logs_dir.join(format!("session-{ts}.log"));
        let _ = tokio::fs::rename(&latest, &rotated).await;
    }

    cleanup_old_sessions(&logs_dir, MAX_SESSION_LOGS).await;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&latest)
        .ok()?;
    Some((latest, file))
}

/// Keep only the `keep` most recent `session-*.log` files.
async fn cleanup_old_sessions(logs_dir: &Path, keep: usize) {
    let mut entries = match tokio::fs::read_dir(logs_dir).await {
        Ok(rd) => rd,
        Err(_) => return,
    };

    let mut session_files: Vec<(i64, PathBuf)> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let stamp = name
            .strip_prefix("session-")
            .and_then(|rest| rest.strip_suffix(".log"))
            .and_then(|ts| ts.parse::<i64>().ok());
        if let Some(stamp) = stamp {
            session_files.push((stamp, entry.path()));
        }
    }

    // Oldest first
    session_files.sort();

    let excess = session_files.len().saturating_sub(keep);
    for (_, path) in session_files.into_iter().take(excess) {
        let _ = tokio::fs::remove_file(path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_cleanup_keeps_newest_sessions() {
        let dir = tempdir().unwrap();
        for ts in [5, 40, 100, 7, 2000] {
            std::fs::write(dir.path().join(format!("session-{ts}.log")), "x").unwrap();
        }
        std::fs::write(dir.path().join("latest.log"), "x").unwrap();

        cleanup_old_sessions(dir.path(), 3).await;

        let mut left: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        assert_eq!(
            left,
            ["latest.log", "session-100.log", "session-2000.log", "session-40.log"]
        );
    }

    #[tokio::test]
    async fn test_previous_latest_is_rotated() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir_all(&logs).unwrap();
        std::fs::write(logs.join("latest.log"), "previous run").unwrap();

        let (path, _file) = open_session_log(dir.path()).await.unwrap();
        assert_eq!(path, logs.join("latest.log"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        let rotated = std::fs::read_dir(&logs)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("session-"))
            .count();
        assert_eq!(rotated, 1);
    }
}
