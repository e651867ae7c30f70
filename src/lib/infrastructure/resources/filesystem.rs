//! Filesystem resource resolver

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::notifications::{errors::InlineError, ResourceResolver};

/// Reads resources from a directory on disk
#[derive(Debug, Clone)]
pub struct FilesystemResolver {
    root: PathBuf,
}

impl FilesystemResolver {
    /// Creates a resolver reading from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins `reference` to the root, rejecting anything that could escape it
    fn resolve(&self, reference: &str) -> Result<PathBuf, InlineError> {
        let relative = Path::new(reference);

        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if !contained {
            warn!("rejected resource outside of the root: {}", reference);

            return Err(InlineError::ResourceOutsideRoot(reference.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceResolver for FilesystemResolver {
    async fn read(&self, reference: &str) -> Result<Vec<u8>, InlineError> {
        let path = self.resolve(reference)?;

        debug!("reading resource {}", path.display());

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(InlineError::LocalResourceNotFound(reference.to_string()))
            }
            Err(e) => Err(InlineError::UnknownError(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_read_existing_resource() -> TestResult {
        let root = tempfile::tempdir()?;
        fs::create_dir(root.path().join("images"))?;
        fs::write(root.path().join("images/logo.png"), [1, 2, 3])?;

        let resolver = FilesystemResolver::new(root.path());

        assert_eq!(resolver.read("images/logo.png").await?, vec![1, 2, 3]);
        assert_eq!(resolver.read("./images/logo.png").await?, vec![1, 2, 3]);

        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_resource() -> TestResult {
        let root = tempfile::tempdir()?;

        let resolver = FilesystemResolver::new(root.path());

        let result = resolver.read("missing.png").await;

        assert!(matches!(
            result,
            Err(InlineError::LocalResourceNotFound(reference)) if reference == "missing.png"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_rejects_parent_traversal() -> TestResult {
        let parent = tempfile::tempdir()?;
        fs::write(parent.path().join("secret.png"), [9])?;
        fs::create_dir(parent.path().join("root"))?;

        let resolver = FilesystemResolver::new(parent.path().join("root"));

        let result = resolver.read("../secret.png").await;

        assert!(matches!(result, Err(InlineError::ResourceOutsideRoot(_))));

        let result = resolver.read("images/../../secret.png").await;

        assert!(matches!(result, Err(InlineError::ResourceOutsideRoot(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_read_rejects_absolute_paths() -> TestResult {
        let root = tempfile::tempdir()?;
        let absolute = root.path().join("logo.png");
        fs::write(&absolute, [1])?;

        let resolver = FilesystemResolver::new(root.path());

        let result = resolver.read(&absolute.to_string_lossy()).await;

        assert!(matches!(result, Err(InlineError::ResourceOutsideRoot(_))));

        Ok(())
    }
}
