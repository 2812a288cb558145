//! Tunnel process supervision.
//!
//! Wraps the external tunneling executable (the playit agent): start it on
//! a detected LAN port, stop it by image name, probe whether it is running.
//! The tunnel protocol itself is entirely the external tool's business.

mod supervisor;

pub use supervisor::{SETTLE_WINDOW, Supervisor, TunnelState};

/// Errors for tunnel lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("tunnel executable `{0}` not found on PATH")]
    ExecutableNotFound(String),

    #[error("tunnel launch failed: {0}")]
    LaunchFailed(String),

    #[error("tunnel process not running")]
    NotRunning,

    #[error("failed to terminate tunnel process: {0}")]
    TerminateFailed(String),

    #[error("unexpected process error: {0}")]
    Unexpected(String),
}
