//! Git-derived site metadata for Lectern.
//!
//! Provides the "last updated" date stamped into generated pages: the
//! commit date of the most recent commit, formatted for display. The
//! lookup is best-effort by design. A site checked out from a tarball,
//! built on a machine without git, or served from an empty repository
//! simply gets no date.

use std::path::Path;
use std::process::Command;

/// `git log` arguments producing the latest commit date as e.g. "November 22, 2024".
const LAST_UPDATED_ARGS: &[&str] = &[
    "log",
    "--pretty=format:%cd",
    "--date=format:%B %d, %Y",
    "-n1",
];

/// Date of the most recent commit in the repository containing `dir`.
///
/// Returns `None` when the date cannot be determined for any reason:
/// git missing from the system, `dir` outside a repository, a repository
/// with no commits, or unparseable command output. Failures are traced
/// at debug level and otherwise swallowed.
#[must_use]
pub fn last_updated(dir: &Path) -> Option<String> {
    let output = match Command::new("git")
        .current_dir(dir)
        .args(LAST_UPDATED_ARGS)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("last-updated lookup skipped, git did not run: {e}");
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(
            "last-updated lookup skipped, git log exited with {}: {}",
            output.status,
            stderr.trim()
        );
        return None;
    }

    let date = String::from_utf8(output.stdout).ok()?;
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    Some(date.to_owned())
}
