//! Logging for triagectl
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a
//! file found through an XDG-style fallback chain.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `TRIAGE_LOG=triagectl=debug`
pub const LOG_ENV: &str = "TRIAGE_LOG";

/// Explicit log file for the TUI
pub const LOG_FILE_ENV: &str = "TRIAGECTL_LOG_FILE";

const DEFAULT_DIRECTIVES: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Log to stderr
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to the TUI log file; returns the path in use, if any
///
/// With no usable path logging is disabled rather than written over the
/// alternate screen.
pub fn init_tui() -> Option<PathBuf> {
    let path = discover_log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}

/// Line printed after the TUI exits so the log file can be found
pub fn log_location_hint(path: &Path) -> String {
    format!("triagectl log: {}", path.display())
}

/// Discover the TUI log path
///
/// Priority:
/// 1. $TRIAGECTL_LOG_FILE
/// 2. $XDG_STATE_HOME/triage/triagectl.log
/// 3. ~/.local/state/triage/triagectl.log
pub fn discover_log_path() -> Option<PathBuf> {
    log_path_from(
        std::env::var_os(LOG_FILE_ENV),
        std::env::var_os("XDG_STATE_HOME"),
        std::env::var_os("HOME"),
    )
}

fn log_path_from(
    explicit: Option<OsString>,
    xdg_state: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);

    if let Some(path) = non_empty(explicit) {
        return Some(path);
    }
    if let Some(state) = non_empty(xdg_state) {
        return Some(state.join("triage").join("triagectl.log"));
    }
    non_empty(home).map(|home| {
        home.join(".local")
            .join("state")
            .join("triage")
            .join("triagectl.log")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(s: &str) -> Option<OsString> {
        Some(OsString::from(s))
    }

    #[test]
    fn test_log_location_hint() {
        let hint = log_location_hint(Path::new("/var/tmp/triagectl.log"));
        assert_eq!(hint, "triagectl log: /var/tmp/triagectl.log");
    }

    #[test]
    fn test_explicit_override_wins() {
        assert_eq!(
            log_path_from(os("/tmp/t.log"), os("/state"), os("/home/u")),
            Some(PathBuf::from("/tmp/t.log"))
        );
    }

    #[test]
    fn test_xdg_state_home() {
        assert_eq!(
            log_path_from(None, os("/state"), os("/home/u")),
            Some(PathBuf::from("/state/triage/triagectl.log"))
        );
    }

    #[test]
    fn test_home_fallback() {
        assert_eq!(
            log_path_from(os(""), None, os("/home/u")),
            Some(PathBuf::from("/home/u/.local/state/triage/triagectl.log"))
        );
        assert_eq!(log_path_from(None, None, None), None);
    }
}
