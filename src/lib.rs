//! A cross-platform convenience handle over self-deleting scratch files.
//!
//! The library is built around a single type:
//!  * [ScratchFile](scratch/struct.ScratchFile.html): Owns one uniquely-named
//! file in temporary storage, exposing position-based reads and writes,
//! content replacement and appending, CSV record reading and copying. The
//! backing file is removed as soon as the handle is released - explicitly
//! through [close](scratch/struct.ScratchFile.html#method.close), or
//! implicitly when the value is dropped.
//!
//! # Usage
//!
//! ```no_run
//! use fs_scratch::ScratchFile;
//!
//! # fn main() -> fs_scratch::Result<()> {
//! let mut file = ScratchFile::new()?;
//! file.put("Hello, World!")?;
//! assert_eq!(file.contents()?, b"Hello, World!");
//! file.close();
//! # Ok(())
//! # }
//! ```
//!
//! For detailed usage, read the documentation of the individual operations on
//! [ScratchFile](scratch/struct.ScratchFile.html).

/// Provides the `Error` type and `Result` alias used across the library.
pub mod error;
/// Provides a minimal, dialect-aware CSV record reader for byte streams.
pub mod csv;
/// Provides the `ScratchFile` handle owning one self-deleting file.
pub mod scratch;

pub use error::{Error, Result};
pub use scratch::ScratchFile;
