//! Poll-loop watcher that reports LAN port changes.
//!
//! Re-reads the log on a fixed interval and invokes the callback whenever a
//! port is detected that differs from the previous detection. Detection
//! failures (log missing, no LAN world open) are normal between sessions
//! and only logged.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{LanLogError, detect_port};

/// Callback invoked with each newly detected port.
pub type OnPortFn = Box<dyn Fn(u16) + Send + Sync + 'static>;

/// Watches the Minecraft log for LAN port changes.
pub struct PortWatcher {
    inner: Arc<Mutex<WatchState>>,
}

struct WatchState {
    on_port: OnPortFn,
    cancel: Option<CancellationToken>,
    /// Port from the most recent changed detection. Updated before the
    /// callback runs, so a failed downstream start is reported once and
    /// not retried until the detected port changes again.
    last_seen: Option<u16>,
}

impl PortWatcher {
    /// Creates a watcher with the given port-change callback.
    pub fn new(on_port: OnPortFn) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WatchState {
                on_port,
                cancel: None,
                last_seen: None,
            })),
        }
    }

    /// Starts polling the given log file.
    ///
    /// The first check runs immediately, then once per `interval`. If a
    /// watch is already running, it is replaced.
    pub async fn start(&self, log_path: PathBuf, interval: Duration) {
        let mut state = self.inner.lock().await;

        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        state.last_seen = None;

        let cancel = CancellationToken::new();
        state.cancel = Some(cancel.clone());

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            watch_loop(inner, log_path, interval, cancel).await;
        });

        tracing::info!(interval_secs = interval.as_secs(), "port watch started");
    }

    /// Stops the watch. Idempotent.
    pub async fn stop(&self) {
        let mut state = self.inner.lock().await;
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
            tracing::info!("port watch stopped");
        }
    }

    /// Returns `true` while a watch task is active.
    pub async fn is_watching(&self) -> bool {
        self.inner.lock().await.cancel.is_some()
    }

    /// Port from the most recent changed detection, if any.
    pub async fn last_seen(&self) -> Option<u16> {
        self.inner.lock().await.last_seen
    }
}

/// Polls the log until cancelled, firing the callback on changed ports.
async fn watch_loop(
    inner: Arc<Mutex<WatchState>>,
    log_path: PathBuf,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match detect_port(&log_path) {
                    Ok(port) => {
                        let mut state = inner.lock().await;
                        if state.last_seen != Some(port) {
                            state.last_seen = Some(port);
                            tracing::info!(port, "LAN world port detected");
                            (state.on_port)(port);
                        }
                    }
                    Err(LanLogError::PortNotDetected) => {
                        tracing::debug!("no LAN world open");
                    }
                    Err(e) => {
                        tracing::debug!("log poll failed: {e}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn hosted_line(port: u16) -> String {
        format!("[12:00:00] [Server thread/INFO]: Local game hosted on port [{port}]")
    }

    #[tokio::test]
    async fn watcher_start_stop() {
        let watcher = PortWatcher::new(Box::new(|_| {}));
        assert!(!watcher.is_watching().await);

        let tmp = tempfile::NamedTempFile::new().unwrap();
        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;
        assert!(watcher.is_watching().await);

        watcher.stop().await;
        assert!(!watcher.is_watching().await);
    }

    #[tokio::test]
    async fn watcher_fires_once_per_port() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = Arc::clone(&fired);

        let watcher = PortWatcher::new(Box::new(move |_port| {
            fired2.fetch_add(1, Ordering::SeqCst);
        }));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", hosted_line(51234)).unwrap();
        tmp.flush().unwrap();

        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;

        // Several ticks over an unchanged log: exactly one report.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(watcher.last_seen().await, Some(51234));

        watcher.stop().await;
    }

    #[tokio::test]
    async fn watcher_reports_port_change() {
        let seen: Arc<std::sync::Mutex<Vec<u16>>> = Arc::default();
        let seen2 = Arc::clone(&seen);

        let watcher = PortWatcher::new(Box::new(move |port| {
            seen2.lock().unwrap().push(port);
        }));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", hosted_line(51234)).unwrap();
        tmp.flush().unwrap();

        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        {
            let mut f = std::fs::OpenOptions::new()
                .append(true)
                .open(tmp.path())
                .unwrap();
            writeln!(f, "{}", hosted_line(62000)).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        watcher.stop().await;

        assert_eq!(seen.lock().unwrap().as_slice(), &[51234, 62000]);
    }

    #[tokio::test]
    async fn watcher_quiet_when_log_missing() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = Arc::clone(&fired);

        let watcher = PortWatcher::new(Box::new(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        }));

        let dir = tempfile::tempdir().unwrap();
        watcher
            .start(dir.path().join("latest.log"), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        watcher.stop().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn watcher_stops_firing_after_stop() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = Arc::clone(&fired);

        let watcher = PortWatcher::new(Box::new(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        }));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", hosted_line(40000)).unwrap();
        tmp.flush().unwrap();

        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        watcher.stop().await;

        let before = fired.load(Ordering::SeqCst);
        {
            let mut f = std::fs::OpenOptions::new()
                .append(true)
                .open(tmp.path())
                .unwrap();
            writeln!(f, "{}", hosted_line(40001)).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(fired.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn restart_replaces_previous_watch() {
        let watcher = PortWatcher::new(Box::new(|_| {}));
        let tmp = tempfile::NamedTempFile::new().unwrap();

        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;
        watcher
            .start(tmp.path().to_path_buf(), Duration::from_millis(50))
            .await;
        assert!(watcher.is_watching().await);

        watcher.stop().await;
        assert!(!watcher.is_watching().await);
    }
}
