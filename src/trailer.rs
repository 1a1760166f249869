//! Image trailer: the fixed 24-byte footer at the end of every packaged
//! executable.
//!
//! The trailer is the wire-level contract between the packager and the
//! runtime host. The host seeks to `End - 24`, validates the magic, and uses
//! the two offsets to locate the embedded bundle and metadata without any
//! out-of-band information.

use crate::error::{CapsuleError, Result};

/// Magic sentinel identifying a packaged image: "4str0d0n"
pub const MAGIC: [u8; 8] = *b"4str0d0n";

/// Total trailer size in bytes: magic + two u64 offsets
pub const TRAILER_SIZE: usize = 24;

/// Fixed-size footer encoding the image layout
///
/// Offsets are absolute file positions, serialized big-endian. They are
/// native `u64` end-to-end, so images are addressable across the full
/// 64-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Absolute offset of the bundle blob (equals the stub length)
    pub bundle_offset: u64,

    /// Absolute offset of the metadata JSON (bundle offset + bundle length)
    pub metadata_offset: u64,
}

impl Trailer {
    pub fn new(bundle_offset: u64, metadata_offset: u64) -> Self {
        Trailer {
            bundle_offset,
            metadata_offset,
        }
    }

    /// Serialize the trailer to its 24-byte wire form
    pub fn to_bytes(&self) -> [u8; TRAILER_SIZE] {
        let mut bytes = [0u8; TRAILER_SIZE];
        bytes[..8].copy_from_slice(&MAGIC);
        bytes[8..16].copy_from_slice(&self.bundle_offset.to_be_bytes());
        bytes[16..24].copy_from_slice(&self.metadata_offset.to_be_bytes());
        bytes
    }

    /// Deserialize a trailer from the last bytes of an image
    ///
    /// Fails with [`CapsuleError::CorruptTrailer`] when the input is not
    /// exactly 24 bytes or the leading 8 bytes are not the magic sentinel.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != TRAILER_SIZE {
            return Err(CapsuleError::CorruptTrailer);
        }

        let (magic, rest) = bytes.split_at(8);
        if magic != MAGIC {
            return Err(CapsuleError::CorruptTrailer);
        }

        let (bundle_bytes, metadata_bytes) = rest.split_at(8);

        let mut buf = [0u8; 8];
        buf.copy_from_slice(bundle_bytes);
        let bundle_offset = u64::from_be_bytes(buf);

        buf.copy_from_slice(metadata_bytes);
        let metadata_offset = u64::from_be_bytes(buf);

        Ok(Trailer {
            bundle_offset,
            metadata_offset,
        })
    }
}
