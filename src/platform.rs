//! Platform-specific handoff of the finished report to a viewer.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        return Platform::MacOS;
        #[cfg(target_os = "windows")]
        return Platform::Windows;
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        return Platform::Linux;
    }

    /// Command that opens a file in the user's default application.
    pub fn open_command(&self, path: &Path) -> Command {
        match self {
            Platform::Linux => {
                let mut cmd = Command::new("xdg-open");
                cmd.arg(path);
                cmd
            }
            Platform::MacOS => {
                let mut cmd = Command::new("open");
                cmd.arg(path);
                cmd
            }
            Platform::Windows => {
                let mut cmd = Command::new("cmd");
                cmd.args(["/C", "start", ""]).arg(path);
                cmd
            }
        }
    }
}

/// Opens `path` in the default viewer without waiting for it.
///
/// A viewer that fails to launch is only logged.
pub fn open_in_viewer(path: &Path) {
    let mut cmd = Platform::current().open_command(path);
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    match cmd.spawn() {
        Ok(child) => debug!(pid = child.id(), path = %path.display(), "launched viewer"),
        Err(err) => warn!(path = %path.display(), error = %err, "failed to launch viewer"),
    }
}
