//! Minecraft log scanning: LAN port detection and change watching.
//!
//! When a world is opened to LAN, the client appends
//! `Local game hosted on port [NNNNN]` to `logs/latest.log`.
//! [`detect_port`] pulls the most recent port out of that file;
//! [`PortWatcher`] polls it on an interval and reports changes.

mod detect;
mod watcher;

pub use detect::{default_log_path, detect_port, extract_lan_port};
pub use watcher::{OnPortFn, PortWatcher};

/// Errors for log scanning operations.
#[derive(Debug, thiserror::Error)]
pub enum LanLogError {
    #[error("minecraft log not found at {0}")]
    LogNotFound(String),

    #[error("failed to read minecraft log: {0}")]
    LogRead(String),

    #[error("no LAN world port in log")]
    PortNotDetected,
}
