//! Local resource resolver

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::notifications::errors::InlineError;

/// Reads local resources referenced from rendered templates
#[async_trait]
pub trait ResourceResolver: Clone + Send + Sync + 'static {
    /// Reads the bytes of a local resource.
    ///
    /// # Arguments
    /// * `reference` - The `src` value as written in the template, relative to the resource root.
    ///
    /// # Returns
    /// - [`Ok`] with the resource's bytes.
    /// - [`Err`] with [`InlineError::LocalResourceNotFound`] if the resource does not exist, or
    ///   [`InlineError::ResourceOutsideRoot`] if the reference escapes the resource root.
    async fn read(&self, reference: &str) -> Result<Vec<u8>, InlineError>;
}

#[cfg(test)]
mock! {
    pub ResourceResolver {}

    impl Clone for ResourceResolver {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ResourceResolver for ResourceResolver {
        async fn read(&self, reference: &str) -> Result<Vec<u8>, InlineError>;
    }
}
