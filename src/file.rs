//! Config file discovery.
//!
//! Each [`SearchPath`] resolves to one or more concrete directories:
//!
//! - `Cwd`, `ExeDir`, `Platform`, `Path` resolve to a single directory.
//! - `CwdAncestors`, `ExeDirAncestors` expand inline to every parent of the
//!   start directory, **nearest first**, up to the filesystem root.
//!
//! The expanded list is then checked in order for `{dir}/{file_name}` and the
//! **first** hit wins. Missing files are skipped. A hit that is a directory, or
//! a stat failure other than not-found, is an error.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TiercfgError;
use crate::types::SearchPath;

/// Directory containing the running executable.
pub fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Every parent of `start`, nearest first. `start` itself is not included.
pub fn ancestors_from(start: &Path) -> Vec<PathBuf> {
    start.ancestors().skip(1).map(Path::to_path_buf).collect()
}

/// Expand search paths into concrete directories, in search order.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe = exe_dir();
    expand_search_paths_from(search_paths, cwd.as_deref(), exe.as_deref())
}

/// Like [`expand_search_paths`] but with explicit working and executable
/// directories. Variants whose start directory is `None` are skipped.
pub fn expand_search_paths_from(
    search_paths: &[SearchPath],
    cwd: Option<&Path>,
    exe_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for sp in search_paths {
        match sp {
            SearchPath::Cwd => dirs.extend(cwd.map(Path::to_path_buf)),
            SearchPath::ExeDir => dirs.extend(exe_dir.map(Path::to_path_buf)),
            SearchPath::CwdAncestors => dirs.extend(cwd.map(ancestors_from).unwrap_or_default()),
            SearchPath::ExeDirAncestors => {
                dirs.extend(exe_dir.map(ancestors_from).unwrap_or_default())
            }
            SearchPath::Platform(app_name) => {
                if let Some(proj) = directories::ProjectDirs::from("", "", app_name) {
                    dirs.push(proj.config_dir().to_path_buf());
                }
            }
            SearchPath::Path(p) => dirs.push(p.clone()),
        }
    }
    dirs
}

/// The first `{dir}/{file_name}` that exists, searching `dirs` in order.
pub fn find_config_file(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Option<PathBuf>, TiercfgError> {
    for dir in dirs {
        let file_path = dir.join(file_name);
        match std::fs::metadata(&file_path) {
            Ok(meta) if meta.is_dir() => return Err(TiercfgError::NotAFile(file_path)),
            Ok(_) => {
                debug!(path = %file_path.display(), "discovered config file");
                return Ok(Some(file_path));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(TiercfgError::IoError {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(None)
}

/// Expand `search_paths` and find `file_name` in them.
pub fn discover(
    search_paths: &[SearchPath],
    file_name: &str,
) -> Result<Option<PathBuf>, TiercfgError> {
    find_config_file(&expand_search_paths(search_paths), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_resolves_to_itself() {
        let p = PathBuf::from("/tmp/myapp");
        let dirs = expand_search_paths_from(&[SearchPath::Path(p.clone())], None, None);
        assert_eq!(dirs, vec![p]);
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let dirs = ancestors_from(Path::new("/a/b/c"));
        assert_eq!(
            dirs,
            vec![PathBuf::from("/a/b"), PathBuf::from("/a"), PathBuf::from("/")]
        );
        assert!(ancestors_from(Path::new("/")).is_empty());
    }

    #[test]
    fn default_order_is_cwd_exe_then_ancestors() {
        let dirs = expand_search_paths_from(
            &SearchPath::defaults(),
            Some(Path::new("/work/proj")),
            Some(Path::new("/opt/bin")),
        );
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/work/proj"),
                PathBuf::from("/opt/bin"),
                PathBuf::from("/work"),
                PathBuf::from("/"),
                PathBuf::from("/opt"),
                PathBuf::from("/"),
            ]
        );
    }

    #[test]
    fn unknown_start_directories_are_skipped() {
        let dirs = expand_search_paths_from(&SearchPath::defaults(), None, None);
        assert!(dirs.is_empty());
    }

    #[test]
    fn cwd_expansion_uses_real_directory() {
        let dirs = expand_search_paths(&[SearchPath::Cwd]);
        assert_eq!(dirs, vec![std::env::current_dir().unwrap()]);
    }

    #[test]
    fn platform_dir_mentions_app() {
        let dirs = expand_search_paths_from(&[SearchPath::Platform("tiercfg-test")], None, None);
        for dir in dirs {
            assert!(dir.to_string_lossy().contains("tiercfg-test"));
        }
    }

    #[test]
    fn find_returns_none_when_missing() {
        let dir = TempDir::new().unwrap();
        let found = find_config_file(&[dir.path().to_path_buf()], "base_config.ini").unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn first_match_wins() {
        let near = TempDir::new().unwrap();
        let far = TempDir::new().unwrap();
        fs::write(near.path().join("base_config.ini"), "A = near\n").unwrap();
        fs::write(far.path().join("base_config.ini"), "A = far\n").unwrap();

        let dirs = vec![near.path().to_path_buf(), far.path().to_path_buf()];
        let found = find_config_file(&dirs, "base_config.ini").unwrap();
        assert_eq!(found, Some(near.path().join("base_config.ini")));
    }

    #[test]
    fn missing_file_falls_through() {
        let empty = TempDir::new().unwrap();
        let full = TempDir::new().unwrap();
        fs::write(full.path().join("local_config.ini"), "A = 1\n").unwrap();

        let dirs = vec![empty.path().to_path_buf(), full.path().to_path_buf()];
        let found = find_config_file(&dirs, "local_config.ini").unwrap();
        assert_eq!(found, Some(full.path().join("local_config.ini")));
    }

    #[test]
    fn directory_in_place_of_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("base_config.ini")).unwrap();

        let result = find_config_file(&[dir.path().to_path_buf()], "base_config.ini");
        assert!(matches!(result, Err(TiercfgError::NotAFile(_))));
    }

    #[cfg(unix)]
    #[test]
    fn stat_failure_is_io_error() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain");
        fs::write(&not_a_dir, "").unwrap();

        let result = find_config_file(&[not_a_dir], "base_config.ini");
        assert!(matches!(result, Err(TiercfgError::IoError { .. })));
    }

    #[test]
    fn ancestors_find_nearest_file() {
        let root = TempDir::new().unwrap();
        let mid = root.path().join("mid");
        let deep = mid.join("deep");
        fs::create_dir_all(&deep).unwrap();
        fs::write(mid.join("base_config.ini"), "A = mid\n").unwrap();
        fs::write(root.path().join("base_config.ini"), "A = root\n").unwrap();

        let dirs = expand_search_paths_from(&[SearchPath::CwdAncestors], Some(&deep), None);
        let found = find_config_file(&dirs, "base_config.ini").unwrap();
        assert_eq!(found, Some(mid.join("base_config.ini")));
    }
}
