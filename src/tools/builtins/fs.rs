use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::error::ToolError;

/// 工作目录：启动时确定，所有工具的相对路径都基于它解析
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// root 会被规范化，后续越界检查都以规范化路径为准
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {}", root.display()),
            ));
        }
        Ok(Workspace { root })
    }

    /// 使用进程当前目录
    pub fn current_dir() -> io::Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析文件名，拒绝绝对路径和跳出 root 的 `..`
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ToolError> {
        if filename.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "filename must not be empty".to_string(),
            ));
        }

        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in Path::new(filename).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(ToolError::PathEscape(filename.to_string()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ToolError::PathEscape(filename.to_string()));
                }
            }
        }

        if depth == 0 {
            return Err(ToolError::InvalidInput(format!(
                "filename does not name a file: {}",
                filename
            )));
        }

        self.ensure_contained(&resolved, filename)?;
        Ok(resolved)
    }

    /// 最近的已存在祖先（含悬空的符号链接）规范化后必须仍在 root 内
    fn ensure_contained(&self, path: &Path, filename: &str) -> Result<(), ToolError> {
        let mut probe = Some(path);
        while let Some(candidate) = probe {
            match std::fs::symlink_metadata(candidate) {
                Ok(meta) => {
                    let canonical = match candidate.canonicalize() {
                        Ok(canonical) => canonical,
                        // 悬空链接：写入会穿过链接落到目标位置，无法确认目标在 root 内
                        Err(e)
                            if meta.file_type().is_symlink()
                                && e.kind() == io::ErrorKind::NotFound =>
                        {
                            return Err(ToolError::PathEscape(filename.to_string()));
                        }
                        Err(e) => return Err(e.into()),
                    };
                    if !canonical.starts_with(&self.root) {
                        return Err(ToolError::PathEscape(filename.to_string()));
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    probe = candidate.parent();
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// 覆盖写入，缺失的父目录会被创建
    pub async fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ToolError> {
        let full_path = self.resolve(filename)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&full_path, content).await?;
        Ok(full_path)
    }

    pub async fn read(&self, filename: &str) -> Result<String, ToolError> {
        let full_path = self.resolve(filename)?;
        let content = fs::read_to_string(&full_path).await?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();
        (dir, ws)
    }

    #[test]
    fn resolves_relative_names_under_root() {
        let (_dir, ws) = workspace();
        assert_eq!(ws.resolve("Dockerfile").unwrap(), ws.root().join("Dockerfile"));
        assert_eq!(
            ws.resolve("./k8s/../k8s/deployment.yaml").unwrap(),
            ws.root().join("k8s").join("deployment.yaml")
        );
    }

    #[test]
    fn rejects_escapes_and_absolute_paths() {
        let (_dir, ws) = workspace();
        for name in ["../outside.txt", "k8s/../../outside.txt", "/etc/passwd"] {
            assert!(
                matches!(ws.resolve(name), Err(ToolError::PathEscape(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn rejects_empty_and_directory_only_names() {
        let (_dir, ws) = workspace();
        assert!(matches!(ws.resolve(""), Err(ToolError::InvalidInput(_))));
        assert!(matches!(ws.resolve("  "), Err(ToolError::InvalidInput(_))));
        assert!(matches!(ws.resolve("."), Err(ToolError::InvalidInput(_))));
        assert!(matches!(ws.resolve("k8s/.."), Err(ToolError::InvalidInput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_pointing_outside() {
        let (_dir, ws) = workspace();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), ws.root().join("escape")).unwrap();

        assert!(matches!(
            ws.resolve("escape/secret.txt"),
            Err(ToolError::PathEscape(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn rejects_dangling_symlink_pointing_outside() {
        let (_dir, ws) = workspace();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("pwned.txt");
        std::os::unix::fs::symlink(&target, ws.root().join("Dockerfile")).unwrap();

        assert!(matches!(
            ws.resolve("Dockerfile"),
            Err(ToolError::PathEscape(_))
        ));
        assert!(matches!(
            ws.write("Dockerfile", "FROM alpine\n").await,
            Err(ToolError::PathEscape(_))
        ));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_inside_workspace_is_followed() {
        let (_dir, ws) = workspace();
        std::fs::create_dir(ws.root().join("deploy")).unwrap();
        std::os::unix::fs::symlink(ws.root().join("deploy"), ws.root().join("k8s")).unwrap();

        ws.write("k8s/service.yaml", "kind: Service\n").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(ws.root().join("deploy/service.yaml")).unwrap(),
            "kind: Service\n"
        );
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let (_dir, ws) = workspace();
        let path = ws
            .write(".github/workflows/ci.yml", "on: push\n")
            .await
            .unwrap();

        assert!(path.starts_with(ws.root()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "on: push\n");
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let (_dir, ws) = workspace();
        assert!(matches!(ws.read("nope.yaml").await, Err(ToolError::Io(_))));
    }
}
