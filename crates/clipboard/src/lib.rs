//! One-way clipboard access.
//!
//! A single "set text" operation, implemented by piping into the platform
//! clipboard command (`clip`, `pbcopy`, `wl-copy`/`xclip`). Callers treat
//! failures as cosmetic: the address is always printed regardless.

use tokio::io::AsyncWriteExt;

/// Errors for clipboard operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no clipboard tool available ({0})")]
    ToolUnavailable(String),

    #[error("clipboard copy failed: {0}")]
    CopyFailed(String),
}

/// Places `text` on the system clipboard.
pub async fn set_text(text: &str) -> Result<(), ClipboardError> {
    platform::set_text(text).await
}

/// Pipes `text` into a clipboard command's stdin and waits for it.
async fn pipe_to(cmd: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = tokio::process::Command::new(cmd)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ClipboardError::ToolUnavailable(cmd.to_string()),
            _ => ClipboardError::CopyFailed(e.to_string()),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        // A tool that exits early closes the pipe; the exit status below
        // is the authoritative result.
        let _ = stdin.write_all(text.as_bytes()).await;
        let _ = stdin.shutdown().await;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CopyFailed(format!(
            "{cmd} exited with {status}"
        )))
    }
}

/// Tries `primary`, then `fallback` on any failure of the first.
///
/// A present-but-failing primary (wl-copy on an X11-only session) falls
/// through just like a missing one; the fallback's error wins if both fail.
#[cfg(any(target_os = "linux", test))]
async fn pipe_with_fallback(
    primary: (&str, &[&str]),
    fallback: (&str, &[&str]),
    text: &str,
) -> Result<(), ClipboardError> {
    match pipe_to(primary.0, primary.1, text).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!("{} failed ({e}), trying {}", primary.0, fallback.0);
            pipe_to(fallback.0, fallback.1, text).await
        }
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::{ClipboardError, pipe_to};

    pub async fn set_text(text: &str) -> Result<(), ClipboardError> {
        pipe_to("clip", &[], text).await
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::{ClipboardError, pipe_to};

    pub async fn set_text(text: &str) -> Result<(), ClipboardError> {
        pipe_to("pbcopy", &[], text).await
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::{ClipboardError, pipe_with_fallback};

    /// Wayland first, X11 fallback.
    pub async fn set_text(text: &str) -> Result<(), ClipboardError> {
        pipe_with_fallback(
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            text,
        )
        .await
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
mod platform {
    use super::ClipboardError;

    pub async fn set_text(_text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::ToolUnavailable("unsupported platform".into()))
    }
}
