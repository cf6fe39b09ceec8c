//! 文件系统工具
//!
//! 提供资源发布所需的目录镜像能力。

use crate::utils::{CoreError, Result};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// 递归镜像目录树
///
/// 将 `source` 下的全部文件和子目录复制到 `dest`，保持相对结构。
/// 目标目录不存在时自动创建，已存在的同名文件会被覆盖。
///
/// # Errors
///
/// 源目录不存在或任一复制步骤失败时返回 IO 错误。
pub fn mirror(source: &Path, dest: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(CoreError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("源目录不存在: {}", source.display()),
        )));
    }

    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| CoreError::Io(io::Error::from(e)))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| CoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mirror_copies_nested_tree() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");

        fs::create_dir_all(src.join("css")).unwrap();
        fs::write(src.join("app.js"), "console.log(1);").unwrap();
        fs::write(src.join("css/main.css"), "body {}").unwrap();

        mirror(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("app.js")).unwrap(), "console.log(1);");
        assert_eq!(fs::read_to_string(dst.join("css/main.css")).unwrap(), "body {}");
    }

    #[test]
    fn test_mirror_overwrites_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");

        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.txt"), "new").unwrap();
        fs::write(dst.join("a.txt"), "old").unwrap();

        mirror(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_mirror_missing_source_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = mirror(&temp_dir.path().join("nope"), &temp_dir.path().join("dst"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
