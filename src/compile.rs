//! Image composition pipeline
//!
//! Builds a standalone executable by appending the application bundle, a
//! JSON metadata record, and the locating trailer to a prebuilt runtime
//! stub:
//!
//! ```text
//! [ runtime stub ][ bundle ][ metadata JSON ][ trailer (24 bytes) ]
//! ```
//!
//! The pipeline is one sequential async task: resolve entrypoint, read
//! stub, bundle, compose, write. Nothing is retried internally; a failed
//! run is re-invoked from scratch by the caller. The image is written to a
//! sibling staging path and renamed onto the output only after a full
//! flush, so a failed or cancelled run never leaves a partial image at the
//! destination.

use crate::bundle::Bundler;
use crate::error::{CapsuleError, Result};
use crate::metadata::Metadata;
use crate::trailer::{Trailer, TRAILER_SIZE};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Options for one packaging run
///
/// All fields are optional at the type level; `input` is required at run
/// time. `output` defaults to the entrypoint's file stem plus the platform
/// executable suffix, in the current directory. `author` and `name` default
/// to absent and are then omitted from the embedded metadata.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Entrypoint script, as a path or `file://` URL
    pub input: Option<String>,

    /// Output executable path
    pub output: Option<PathBuf>,

    /// Author string embedded in the image metadata
    pub author: Option<String>,

    /// Application name embedded in the image metadata
    pub name: Option<String>,
}

/// Layout summary of a produced image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    /// Path the image was written to
    pub output: PathBuf,

    /// Absolute offset of the bundle (equals the stub length)
    pub bundle_offset: u64,

    /// Absolute offset of the metadata JSON
    pub metadata_offset: u64,

    /// Total image length in bytes
    pub total_len: u64,
}

/// Packager for standalone executables
///
/// Owns the bundle collaborator and the path of the runtime stub to extend.
/// One `compile` call is one unit of work; callers must not run two calls
/// against the same output path concurrently.
pub struct Compiler<B> {
    bundler: B,
    stub_path: PathBuf,
}

impl<B: Bundler> Compiler<B> {
    pub fn new(bundler: B, stub_path: impl Into<PathBuf>) -> Self {
        Compiler {
            bundler,
            stub_path: stub_path.into(),
        }
    }

    /// Package `options.input` into a standalone executable
    ///
    /// On success the output file holds stub, bundle, metadata, and trailer
    /// in that order, with trailer offsets matching the section boundaries.
    pub async fn compile(&self, options: &CompileOptions) -> Result<ImageLayout> {
        let entrypoint = resolve_entrypoint(options.input.as_deref())?;
        let output = match &options.output {
            Some(path) => path.clone(),
            None => default_output_path(&entrypoint)?,
        };

        debug!(stub = %self.stub_path.display(), "reading runtime stub");
        let stub = fs::read(&self.stub_path)
            .await
            .map_err(|source| CapsuleError::StubRead {
                path: self.stub_path.clone(),
                source,
            })?;

        debug!(entrypoint = %entrypoint, "resolving application bundle");
        let bundle = self.bundler.bundle(&entrypoint).await?;

        let bundle_offset = stub.len() as u64;
        let metadata_offset = bundle_offset
            .checked_add(bundle.len() as u64)
            .ok_or(CapsuleError::OffsetOverflow)?;
        let trailer = Trailer::new(bundle_offset, metadata_offset);

        let metadata = Metadata::new(entrypoint, options.author.clone(), options.name.clone());
        let metadata_bytes = serde_json::to_vec(&metadata)?;

        let total_len = write_image(&output, &stub, &bundle, &metadata_bytes, &trailer).await?;

        info!(
            output = %output.display(),
            bundle_offset,
            metadata_offset,
            total_len,
            "packaged standalone executable"
        );

        Ok(ImageLayout {
            output,
            bundle_offset,
            metadata_offset,
            total_len,
        })
    }
}

/// Resolve the entrypoint argument to an absolute `file://` URL
///
/// Accepts an absolute `file://` URL verbatim; anything else is treated as a
/// filesystem path and canonicalized against the current directory, so the
/// entrypoint must exist at resolution time.
pub fn resolve_entrypoint(input: Option<&str>) -> Result<Url> {
    let input = input.ok_or(CapsuleError::MissingEntrypoint)?;

    if let Ok(url) = Url::parse(input) {
        if url.scheme() == "file" {
            return Ok(url);
        }
    }

    let path = std::fs::canonicalize(input)
        .map_err(|err| CapsuleError::InvalidEntrypoint(format!("{input}: {err}")))?;

    Url::from_file_path(&path).map_err(|_| CapsuleError::InvalidEntrypoint(input.to_string()))
}

/// Default output path: entrypoint stem + platform executable suffix, in the
/// current directory
fn default_output_path(entrypoint: &Url) -> Result<PathBuf> {
    let path = entrypoint
        .to_file_path()
        .map_err(|_| CapsuleError::InvalidEntrypoint(entrypoint.to_string()))?;

    let stem = path
        .file_stem()
        .ok_or_else(|| CapsuleError::InvalidEntrypoint(entrypoint.to_string()))?;

    let mut name = stem.to_os_string();
    name.push(std::env::consts::EXE_SUFFIX);

    Ok(std::env::current_dir()?.join(name))
}

/// Staging path next to the output, renamed onto it after a full flush
fn staging_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("capsule"));
    name.push(".tmp");
    output.with_file_name(name)
}

async fn write_image(
    output: &Path,
    stub: &[u8],
    bundle: &[u8],
    metadata: &[u8],
    trailer: &Trailer,
) -> Result<u64> {
    let staging = staging_path(output);

    let written = write_sections(&staging, output, stub, bundle, metadata, trailer).await;

    match written {
        Ok(total_len) => {
            fs::rename(&staging, output)
                .await
                .map_err(|source| CapsuleError::OutputWrite {
                    path: output.to_path_buf(),
                    source,
                })?;
            Ok(total_len)
        }
        Err(err) => {
            let _ = fs::remove_file(&staging).await;
            Err(err)
        }
    }
}

async fn write_sections(
    staging: &Path,
    output: &Path,
    stub: &[u8],
    bundle: &[u8],
    metadata: &[u8],
    trailer: &Trailer,
) -> Result<u64> {
    let write_err = |source| CapsuleError::OutputWrite {
        path: output.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(staging).await.map_err(write_err)?;

    let trailer_bytes = trailer.to_bytes();
    for section in [stub, bundle, metadata, &trailer_bytes[..]] {
        file.write_all(section).await.map_err(write_err)?;
    }

    file.flush().await.map_err(write_err)?;
    file.sync_all().await.map_err(write_err)?;

    let total = stub.len() as u64 + bundle.len() as u64 + metadata.len() as u64;
    Ok(total + TRAILER_SIZE as u64)
}
