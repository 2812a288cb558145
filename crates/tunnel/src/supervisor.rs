//! Tunnel supervisor: external process lifecycle and public address.
//!
//! Platform-specific termination and liveness live in `process_unix.rs`
//! and `process_windows.rs`. This module provides the unified API.

use std::time::Duration;

use crate::TunnelError;

/// How long a freshly spawned tunnel may take to prove it did not die
/// on startup. A child still alive at the end of the window is detached.
pub const SETTLE_WINDOW: Duration = Duration::from_secs(1);

/// Poll interval while waiting out the settle window.
const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Intended tunnel state, derived from the last explicit start/stop call.
///
/// The supervisor is fire and forget: it does not reconcile this against
/// the actual process table if the external tool dies on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Stopped,
    Running(u16),
}

/// Supervises the external tunneling executable.
///
/// One supervisor intentionally runs at most one tunnel process; it does
/// not guard against instances of the same executable started elsewhere.
pub struct Supervisor {
    /// Executable name, resolved via PATH at start time.
    program: String,
    /// Public hostname the tunnel forwards from.
    public_host: String,
    /// Port of the most recent successful start, cleared by `stop`.
    last_started: Option<u16>,
}

impl Supervisor {
    pub fn new(program: impl Into<String>, public_host: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            public_host: public_host.into(),
            last_started: None,
        }
    }

    /// Starts the tunnel process and returns the composed public address.
    ///
    /// Always attempts a launch, even if a tunnel was already started on
    /// the same port; skipping redundant restarts is the poll loop's job.
    /// A child that exits non-zero within [`SETTLE_WINDOW`] counts as a
    /// failed launch; otherwise the child is detached and never watched
    /// again.
    pub async fn start(&mut self, port: u16) -> Result<String, TunnelError> {
        let exe = which::which(&self.program)
            .map_err(|_| TunnelError::ExecutableNotFound(self.program.clone()))?;

        let mut child = tokio::process::Command::new(&exe)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| TunnelError::LaunchFailed(e.to_string()))?;

        let deadline = tokio::time::Instant::now() + SETTLE_WINDOW;
        while tokio::time::Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        break;
                    }
                    return Err(TunnelError::LaunchFailed(format!(
                        "{} exited during startup: {status}",
                        self.program
                    )));
                }
                Ok(None) => tokio::time::sleep(SETTLE_POLL_INTERVAL).await,
                Err(e) => return Err(TunnelError::Unexpected(e.to_string())),
            }
        }

        self.last_started = Some(port);
        let address = self.public_address(port);
        tracing::info!(port, %address, "tunnel started");
        Ok(address)
    }

    /// Force-terminates the tunnel process by image name.
    ///
    /// Clears `last_started` whatever the outcome: after an explicit stop
    /// request the supervisor no longer claims a running tunnel.
    pub async fn stop(&mut self) -> Result<(), TunnelError> {
        self.last_started = None;

        let result = platform::terminate_by_name(&self.program).await;
        match &result {
            Ok(()) => tracing::info!(program = %self.program, "tunnel stopped"),
            Err(e) => tracing::debug!(program = %self.program, "stop: {e}"),
        }
        result
    }

    /// Whether a process with the tunnel's image name is currently alive.
    ///
    /// Query only; the supervisor never consults this on its own.
    pub async fn is_running(&self) -> bool {
        platform::is_running(&self.program).await
    }

    /// State implied by the last explicit start/stop call.
    pub fn state(&self) -> TunnelState {
        match self.last_started {
            Some(port) => TunnelState::Running(port),
            None => TunnelState::Stopped,
        }
    }

    /// Port of the most recent successful start, if any.
    pub fn last_started(&self) -> Option<u16> {
        self.last_started
    }

    /// Composes the user-facing public address for a port.
    pub fn public_address(&self, port: u16) -> String {
        format!("{}:{port}", self.public_host)
    }
}

// Platform-specific implementation.
#[cfg(unix)]
#[path = "process_unix.rs"]
mod platform;

#[cfg(windows)]
#[path = "process_windows.rs"]
mod platform;

#[cfg(not(any(unix, windows)))]
mod platform {
    use crate::TunnelError;

    pub async fn terminate_by_name(program: &str) -> Result<(), TunnelError> {
        Err(TunnelError::Unexpected(format!(
            "no process control for this platform ({program})"
        )))
    }

    pub async fn is_running(_program: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_address_composition() {
        let sup = Supervisor::new("playit", "example.tld");
        assert_eq!(sup.public_address(25565), "example.tld:25565");
    }

    #[test]
    fn fresh_supervisor_is_stopped() {
        let sup = Supervisor::new("playit", "example.tld");
        assert_eq!(sup.state(), TunnelState::Stopped);
        assert_eq!(sup.last_started(), None);
    }

    #[tokio::test]
    async fn start_unresolvable_program_reports_not_found() {
        let mut sup = Supervisor::new("minetunnel-no-such-binary", "example.tld");
        let err = sup.start(25565).await.unwrap_err();
        assert!(matches!(err, TunnelError::ExecutableNotFound(_)));
        assert_eq!(sup.last_started(), None);
        assert_eq!(sup.state(), TunnelState::Stopped);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn start_with_clean_exit_succeeds() {
        let mut sup = Supervisor::new("true", "example.tld");
        let address = sup.start(62000).await.unwrap();
        assert_eq!(address, "example.tld:62000");
        assert_eq!(sup.last_started(), Some(62000));
        assert_eq!(sup.state(), TunnelState::Running(62000));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn repeated_start_on_same_port_always_launches() {
        // Skipping redundant restarts is the poll loop's job; a direct
        // start call attempts a launch every time.
        let mut sup = Supervisor::new("true", "example.tld");
        assert_eq!(sup.start(62000).await.unwrap(), "example.tld:62000");
        assert_eq!(sup.start(62000).await.unwrap(), "example.tld:62000");
        assert_eq!(sup.last_started(), Some(62000));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn start_with_failing_exit_reports_launch_failed() {
        let mut sup = Supervisor::new("false", "example.tld");
        let err = sup.start(62000).await.unwrap_err();
        assert!(matches!(err, TunnelError::LaunchFailed(_)));
        assert_eq!(sup.last_started(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_without_process_reports_not_running_and_clears_state() {
        let mut sup = Supervisor::new("minetunnel-no-such-binary", "example.tld");
        // Simulate a prior start so there is state to clear.
        sup.last_started = Some(51234);

        let err = sup.stop().await.unwrap_err();
        assert!(matches!(err, TunnelError::NotRunning));
        assert_eq!(sup.last_started(), None);
        assert_eq!(sup.state(), TunnelState::Stopped);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn is_running_false_for_absent_process() {
        let sup = Supervisor::new("minetunnel-no-such-binary", "example.tld");
        assert!(!sup.is_running().await);
    }
}
