//! # Capsule - Standalone Executable Packager
//!
//! `capsule-rs` packages an application (an entrypoint script plus its
//! resolved dependency graph) and a prebuilt runtime host binary into a
//! single self-contained executable:
//!
//! - **Append-only image**: the runtime stub is never modified, the
//!   application is appended after it
//! - **Fixed 24-byte trailer** with a magic sentinel and two big-endian
//!   64-bit offsets, so the host can locate the payload from the file end
//! - **JSON metadata** (`entrypoint`, optional `author`/`name`) embedded
//!   between the bundle and the trailer
//! - **Atomic output**: images are staged and renamed into place, a failed
//!   run leaves nothing at the output path
//! - **Pluggable bundling** through the [`Bundler`] trait
//!
//! ## Image Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Packaged Executable (output)         │
//! ├─────────────────────────────────────────────┤
//! │ Runtime stub (prebuilt host binary)         │
//! ├─────────────────────────────────────────────┤  ← bundle_offset
//! │ Bundle blob (opaque application code)       │
//! ├─────────────────────────────────────────────┤  ← metadata_offset
//! │ Metadata JSON (UTF-8)                       │
//! ├─────────────────────────────────────────────┤
//! │ Trailer (24 bytes)                          │
//! │  - Magic: "4str0d0n"                        │
//! │  - bundle_offset   (u64, big-endian)        │
//! │  - metadata_offset (u64, big-endian)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! `bundle_offset` always equals the stub length and `metadata_offset`
//! equals `bundle_offset` plus the bundle length; a loader recovers the
//! sections by reading the last 24 bytes and slicing.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use capsule_rs::{CompileOptions, Compiler, FileBundler};
//!
//! # async fn demo() -> capsule_rs::Result<()> {
//! let compiler = Compiler::new(FileBundler, "target/release/runtime");
//!
//! let layout = compiler
//!     .compile(&CompileOptions {
//!         input: Some("app/main.js".to_string()),
//!         author: Some("Ada".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!(
//!     "packaged {} ({} bytes)",
//!     layout.output.display(),
//!     layout.total_len
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The `capsule` binary wraps this API: `capsule compile <entrypoint>
//! [output]` produces an image, `capsule inspect <image>` prints its
//! recovered layout and metadata.

pub mod bundle;
pub mod compile;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod trailer;

// Re-export commonly used types
pub use bundle::{Bundler, FileBundler};
pub use compile::{CompileOptions, Compiler, ImageLayout};
pub use error::{CapsuleError, Result};
pub use extract::{extract, is_packaged, ExtractedApp};
pub use metadata::Metadata;
pub use trailer::{Trailer, MAGIC, TRAILER_SIZE};

/// Packager version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
