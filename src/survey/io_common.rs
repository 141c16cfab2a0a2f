use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::survey::*;

/// The home directory of the user, or the current directory when it is unknown.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Creates the parent directory of the file if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            debug!("ensure_parent_dir: creating {}", parent.display());
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parents() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("a/b/data.csv");
        ensure_parent_dir(&p).unwrap();
        assert!(dir.path().join("a/b").is_dir());
        ensure_parent_dir(Path::new("data.csv")).unwrap();

        // A regular file is in the way.
        fs::write(dir.path().join("f"), "").unwrap();
        assert!(ensure_parent_dir(&dir.path().join("f/g/data.csv")).is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(
            simplify_file_name(Path::new("/tmp/survey_responses.xlsx")),
            "survey_responses.xlsx"
        );
    }
}
