//! Bundle collaborator boundary
//!
//! Turning a root module URL into a single opaque code blob is the job of an
//! external bundler. The packager only depends on this seam: it hands the
//! collaborator an absolute URL and receives bytes it never inspects.

use crate::error::{CapsuleError, Result};
use std::future::Future;
use url::Url;

/// Resolves a root module URL into an opaque application bundle
pub trait Bundler {
    /// Build the bundle for `root`
    ///
    /// Resolution failures (unresolved imports, unsupported syntax) surface
    /// as [`CapsuleError::Bundle`] with the collaborator's message.
    fn bundle(&self, root: &Url) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Single-module bundler
///
/// Resolves a `file://` root to the raw bytes of that one module. It is
/// deterministic, which makes packaged images byte-for-byte reproducible.
/// Graph-aware bundlers plug in through [`Bundler`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileBundler;

impl Bundler for FileBundler {
    fn bundle(&self, root: &Url) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let root = root.clone();
        async move {
            let path = root
                .to_file_path()
                .map_err(|_| CapsuleError::Bundle(format!("unsupported scheme: {}", root.scheme())))?;

            tokio::fs::read(&path).await.map_err(|err| {
                CapsuleError::Bundle(format!("failed to read module {}: {err}", path.display()))
            })
        }
    }
}
