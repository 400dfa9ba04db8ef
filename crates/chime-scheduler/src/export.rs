//! Plain-text alarm history export.

use crate::registry::AlarmHistory;
use chime_core::error::ChimeError;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Render history as one `"{task} - {token}\n"` line per entry.
pub fn render_history(history: &AlarmHistory) -> String {
    let mut out = String::new();
    for entry in history.entries() {
        let _ = writeln!(out, "{} - {}", entry.task, entry.token);
    }
    out
}

/// Write history to `path`, replacing any existing file.
///
/// Missing parent directories are created. Returns the number of entries written.
pub fn write_history(path: &Path, history: &AlarmHistory) -> Result<usize, ChimeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ChimeError::Persistence(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, render_history(history)).map_err(|e| {
        ChimeError::Persistence(format!(
            "An error occurred while saving the file {}: {e}",
            path.display()
        ))
    })?;
    info!("alarm history saved: {} entries to {}", history.len(), path.display());
    Ok(history.len())
}
