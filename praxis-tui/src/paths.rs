//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "praxis";
const APPLICATION: &str = "praxis";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for temporary/regenerable data.
///
/// - Linux: `$XDG_CACHE_HOME/praxis` or `~/.cache/praxis`
/// - macOS: `~/Library/Caches/org.praxis.praxis`
/// - Windows: `C:\Users\<User>\AppData\Local\praxis\praxis\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file, creating the directory if needed.
///
/// Falls back to the working directory when no home is available.
pub fn log_file() -> PathBuf {
    match cache_dir() {
        Some(dir) => {
            let _ = fs::create_dir_all(&dir);
            dir.join("latest.log")
        }
        None => PathBuf::from("praxis-tui.log"),
    }
}
