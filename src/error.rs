//! The error and result types of the library.

use std::io;
use thiserror::Error;

/// The `Result` type of this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors this library can produce.
#[derive(Error, Debug)]
pub enum Error {
    /// The operation needs an open handle, but the file has been closed.
    #[error("the scratch file is not open")]
    NotOpen,

    /// An `std::io::Error`.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns `true` if the error is the closed-handle variant, rather than
    /// an underlying IO failure.
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }
}
