//! Subcommand implementations built on the capability crates.

use std::time::Duration;

use minetunnel_lan_log::{PortWatcher, detect_port};
use minetunnel_tunnel::Supervisor;

use crate::config::Config;

/// `watch`: poll the log and (re)start the tunnel on every port change.
///
/// Runs until Ctrl-C. A failed start is reported once and retried only
/// when the detected port changes again, on the next poll tick.
pub async fn watch(config: Config, interval_override: Option<u64>) -> anyhow::Result<()> {
    let interval = Duration::from_secs(interval_override.unwrap_or(config.poll_interval));
    let mut supervisor = Supervisor::new(&config.tunnel_program, &config.public_host);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let watcher = PortWatcher::new(Box::new(move |port| {
        let _ = tx.send(port);
    }));
    watcher.start(config.log_file.clone(), interval).await;

    println!(
        "watching {} every {}s, Ctrl-C to stop",
        config.log_file.display(),
        interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(port) = rx.recv() => {
                match supervisor.start(port).await {
                    Ok(address) => announce(&address, config.copy_to_clipboard).await,
                    Err(e) => tracing::warn!(port, "tunnel start failed: {e}"),
                }
            }
        }
    }

    watcher.stop().await;
    tracing::info!("watch cancelled");
    Ok(())
}

/// `start`: one-shot tunnel start on an explicit or detected port.
pub async fn start(
    config: Config,
    port_override: Option<u16>,
    no_clipboard: bool,
) -> anyhow::Result<()> {
    let port = match port_override.or(config.manual_port) {
        Some(port) => port,
        None => detect_port(&config.log_file)?,
    };

    let mut supervisor = Supervisor::new(&config.tunnel_program, &config.public_host);
    let address = supervisor.start(port).await?;

    announce(&address, config.copy_to_clipboard && !no_clipboard).await;
    Ok(())
}

/// `stop`: terminate the tunnel process by image name.
pub async fn stop(config: Config) -> anyhow::Result<()> {
    let mut supervisor = Supervisor::new(&config.tunnel_program, &config.public_host);
    supervisor.stop().await?;
    println!("tunnel stopped");
    Ok(())
}

/// `detect`: print the currently detected LAN port.
pub async fn detect(config: Config, copy: bool) -> anyhow::Result<()> {
    let port = detect_port(&config.log_file)?;
    println!("{port}");

    if copy {
        copy_to_clipboard(&port.to_string()).await;
    }
    Ok(())
}

/// `status`: report whether the tunnel process is currently alive.
pub async fn status(config: Config) -> anyhow::Result<()> {
    let supervisor = Supervisor::new(&config.tunnel_program, &config.public_host);
    if supervisor.is_running().await {
        println!("{}: running", config.tunnel_program);
    } else {
        println!("{}: not running", config.tunnel_program);
    }
    Ok(())
}

/// Prints the public address and optionally copies it.
async fn announce(address: &str, copy: bool) {
    println!("{address}");
    if copy {
        copy_to_clipboard(address).await;
    }
}

/// Clipboard failures are cosmetic; the value was already printed.
async fn copy_to_clipboard(text: &str) {
    match minetunnel_clipboard::set_text(text).await {
        Ok(()) => tracing::info!("copied to clipboard"),
        Err(e) => tracing::warn!("clipboard copy skipped: {e}"),
    }
}
