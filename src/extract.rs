//! Loader-side payload recovery
//!
//! The runtime host recovers its embedded application at startup by reading
//! the trailer from the end of its own executable. The same logic is useful
//! for inspecting packaged images offline, so it lives here next to the
//! packager: both halves of the wire contract are kept in one place.

use crate::error::{CapsuleError, Result};
use crate::metadata::Metadata;
use crate::trailer::{Trailer, TRAILER_SIZE};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader};

/// Application payload recovered from a packaged image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedApp {
    /// Parsed metadata record
    pub metadata: Metadata,

    /// Opaque bundle bytes
    pub bundle: Vec<u8>,

    /// Decoded trailer
    pub trailer: Trailer,
}

/// Recover the embedded payload from a packaged executable
///
/// Reads the last 24 bytes, validates the magic, then slices the bundle as
/// `[bundle_offset, metadata_offset)` and parses the metadata JSON from
/// `[metadata_offset, len - 24)`. Fails with
/// [`CapsuleError::CorruptTrailer`] when the file is not a packaged image.
pub async fn extract<P: AsRef<Path>>(path: P) -> Result<ExtractedApp> {
    let file = File::open(path.as_ref()).await?;
    let mut reader = BufReader::new(file);

    let file_len = reader.get_ref().metadata().await?.len();
    if file_len < TRAILER_SIZE as u64 {
        return Err(CapsuleError::CorruptTrailer);
    }

    let trailer_pos = reader.seek(SeekFrom::End(-(TRAILER_SIZE as i64))).await?;
    let mut trailer_bytes = [0u8; TRAILER_SIZE];
    reader.read_exact(&mut trailer_bytes).await?;
    let trailer = Trailer::from_bytes(&trailer_bytes)?;

    // Offsets must be ordered and land inside the file.
    if trailer.bundle_offset > trailer.metadata_offset || trailer.metadata_offset > trailer_pos {
        return Err(CapsuleError::CorruptTrailer);
    }

    reader.seek(SeekFrom::Start(trailer.bundle_offset)).await?;
    let mut bundle = vec![0u8; (trailer.metadata_offset - trailer.bundle_offset) as usize];
    reader.read_exact(&mut bundle).await?;

    let metadata_len = trailer_pos - trailer.metadata_offset;
    let mut metadata_json = String::new();
    reader
        .take(metadata_len)
        .read_to_string(&mut metadata_json)
        .await?;
    let metadata: Metadata = serde_json::from_str(&metadata_json)?;

    Ok(ExtractedApp {
        metadata,
        bundle,
        trailer,
    })
}

/// Check whether `path` carries the packaged-image magic
///
/// This is the probe the runtime host runs against its own executable to
/// decide between "plain stub" and "packaged application" startup. Files
/// shorter than a trailer are plain.
pub async fn is_packaged<P: AsRef<Path>>(path: P) -> Result<bool> {
    let mut file = File::open(path.as_ref()).await?;

    let file_len = file.metadata().await?.len();
    if file_len < TRAILER_SIZE as u64 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-(TRAILER_SIZE as i64))).await?;
    let mut trailer_bytes = [0u8; TRAILER_SIZE];
    file.read_exact(&mut trailer_bytes).await?;

    Ok(Trailer::from_bytes(&trailer_bytes).is_ok())
}
