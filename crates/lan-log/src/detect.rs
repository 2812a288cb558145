//! LAN port detection from the Minecraft client log.
//!
//! The log is append-only across a client session, so the last hosting line
//! holds the authoritative current port; earlier LAN sessions are shadowed.

use std::path::{Path, PathBuf};

use crate::LanLogError;

/// Marker preceding the port digits in the hosting line.
const PORT_MARKER: &str = "Local game hosted on port [";

/// Extracts the LAN port from a single log line.
///
/// Returns `None` unless the line contains the hosting marker followed by
/// decimal digits and a closing bracket, and the digits form a non-zero
/// `u16`. Out-of-range digits make the line a non-match, not an error.
pub fn extract_lan_port(line: &str) -> Option<u16> {
    let start = line.find(PORT_MARKER)? + PORT_MARKER.len();
    let rest = &line[start..];
    let digits = &rest[..rest.find(']')?];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match digits.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

/// Scans the log for the most recently hosted LAN port.
///
/// Lines are scanned from last to first so the newest hosting event wins,
/// whatever came before it.
pub fn detect_port(path: &Path) -> Result<u16, LanLogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LanLogError::LogNotFound(path.display().to_string()),
        _ => LanLogError::LogRead(e.to_string()),
    })?;

    contents
        .lines()
        .rev()
        .find_map(extract_lan_port)
        .ok_or(LanLogError::PortNotDetected)
}

/// Returns the platform default location of the client's `latest.log`.
pub fn default_log_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")
            .unwrap_or_else(|_| "C:\\Users\\Default\\AppData\\Roaming".into());
        PathBuf::from(appdata)
            .join(".minecraft")
            .join("logs")
            .join("latest.log")
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("minecraft")
            .join("logs")
            .join("latest.log")
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".minecraft")
            .join("logs")
            .join("latest.log")
    }
}
