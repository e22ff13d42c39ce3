use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::error::{ParseError, ParseResult};

/// Files larger than this are rejected rather than loaded into memory.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads a file's full contents, enforcing [`MAX_FILE_SIZE`].
pub fn read_file_checked(path: &Path) -> ParseResult<Vec<u8>> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(ParseError::SizeError {
            path: path.to_path_buf(),
            size: metadata.len(),
        });
    }
    Ok(fs::read(path)?)
}

pub fn modified(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Lexically collapses `.` and `..` components without touching the
/// filesystem, so cache keys are stable regardless of how a path was
/// spelled by the caller.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(
            normalize_path(Path::new("a/./b/../c")),
            PathBuf::from("a/c")
        );
        assert_eq!(normalize_path(Path::new("/a/b/..")), PathBuf::from("/a"));
    }
}
