//! # File System Operations Module / 文件系统操作模块
//!
//! Helpers for the transient artifacts of a run. Removal is best-effort:
//! a missing path is not an error, and [`discard`] only logs failures.
//!
//! 单次运行临时产物的辅助函数。删除操作尽力而为：
//! 路径不存在不算错误，[`discard`] 只记录失败。

use std::fs;
use std::io;
use std::path::Path;

/// Removes a file or a directory tree. Returns `false` if nothing was there.
/// 删除文件或目录树。如果路径不存在则返回 `false`。
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

/// Best-effort removal; failures are logged and otherwise ignored.
/// 尽力删除；失败只会被记录，其他情况下忽略。
pub fn discard(path: &Path) {
    match remove_if_exists(path) {
        Ok(true) => log::trace!("removed {}", path.display()),
        Ok(false) => {}
        Err(e) => log::warn!("failed to remove {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_files_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(".vagrant");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("state"), "x").unwrap();
        let file = root.path().join("t1-0.sh");
        fs::write(&file, "set -e").unwrap();

        assert!(remove_if_exists(&file).unwrap());
        assert!(remove_if_exists(&dir).unwrap());
        assert!(!dir.exists());
        assert!(!remove_if_exists(&dir).unwrap());
    }
}
