//! Windows process control: kill and probe by image name.

use crate::TunnelError;

/// `taskkill` exit code when no process matched the filter.
const TASKKILL_NO_MATCH: i32 = 128;

/// Force-kills every process with the given image name via `taskkill /F`.
pub async fn terminate_by_name(program: &str) -> Result<(), TunnelError> {
    let image = image_name(program);
    let output = tokio::process::Command::new("taskkill")
        .args(["/F", "/IM", &image])
        .output()
        .await
        .map_err(|e| TunnelError::Unexpected(format!("failed to run taskkill: {e}")))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    if output.status.code() == Some(TASKKILL_NO_MATCH) || stderr.contains("not found") {
        return Err(TunnelError::NotRunning);
    }

    Err(TunnelError::TerminateFailed(format!(
        "taskkill /F /IM {image} exited with {}",
        output.status
    )))
}

/// Checks for a live process with the given image name via `tasklist`.
pub async fn is_running(program: &str) -> bool {
    let image = image_name(program);
    let output = tokio::process::Command::new("tasklist")
        .args(["/FI", &format!("IMAGENAME eq {image}"), "/NH"])
        .output()
        .await;

    match output {
        Ok(o) => String::from_utf8_lossy(&o.stdout)
            .to_lowercase()
            .contains(&image.to_lowercase()),
        Err(_) => false,
    }
}

/// The image name for a configured program: its file name with an `.exe`
/// suffix, as `taskkill`/`tasklist` expect.
fn image_name(program: &str) -> String {
    let name = std::path::Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);

    if name.to_lowercase().ends_with(".exe") {
        name.to_string()
    } else {
        format!("{name}.exe")
    }
}
