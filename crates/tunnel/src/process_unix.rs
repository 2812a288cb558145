//! Unix process control: kill and probe by process name.

use crate::TunnelError;

/// `pkill` exit code when no process matched.
const PKILL_NO_MATCH: i32 = 1;

/// Force-kills every process with the given image name via `pkill -x`.
pub async fn terminate_by_name(program: &str) -> Result<(), TunnelError> {
    let output = tokio::process::Command::new("pkill")
        .args(["-9", "-x", image_name(program)])
        .output()
        .await
        .map_err(|e| TunnelError::Unexpected(format!("failed to run pkill: {e}")))?;

    match output.status.code() {
        Some(0) => Ok(()),
        Some(PKILL_NO_MATCH) => Err(TunnelError::NotRunning),
        _ => Err(TunnelError::TerminateFailed(format!(
            "pkill -x {} exited with {}",
            image_name(program),
            output.status
        ))),
    }
}

/// Checks for a live process with the given image name via `pgrep -x`.
pub async fn is_running(program: &str) -> bool {
    let output = tokio::process::Command::new("pgrep")
        .args(["-x", image_name(program)])
        .output()
        .await;

    match output {
        Ok(o) => o.status.success() && !o.stdout.is_empty(),
        Err(_) => false,
    }
}

/// The process-table name for a configured program: its file name, with
/// any directory part stripped.
fn image_name(program: &str) -> &str {
    std::path::Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program)
}
