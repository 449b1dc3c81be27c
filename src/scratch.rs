//! A handle type owning one self-deleting file in temporary storage.
//!
//! The backing file is created uniquely named - in the platform temporary
//! directory by default - and removed as soon as the handle is released.
//! Operations follow a two-state contract:
//!
//!  * While a handle is owned, queries and reads work on it, writes advance
//! the file position.
//!  * After [close](struct.ScratchFile.html#method.close) or
//! [delete](struct.ScratchFile.html#method.delete), queries and reads return
//! [Error::NotOpen](../error/enum.Error.html), positioning is a no-op, and
//! writes open a fresh backing file first.

use std::fs::{self, File, Metadata};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::csv::{self, Dialect};
use crate::error::{Error, Result};

/// The UTF-8 byte-order-mark sequence.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A uniquely-named file in temporary storage that deletes itself when its
/// handle is released.
///
/// Construction creates the backing file right away, so a fresh value is
/// always open with size `0`. Mutating operations return `&mut Self` so they
/// can be chained.
///
/// # Examples
///
/// ```no_run
/// use fs_scratch::ScratchFile;
///
/// # fn main() -> fs_scratch::Result<()> {
/// let mut file = ScratchFile::new()?;
/// file.put("HOGE")?.append("FUGA")?;
/// assert_eq!(file.contents()?, b"HOGEFUGA");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScratchFile {
    file: Option<NamedTempFile>,
    root: Option<PathBuf>,
}

impl ScratchFile {
    /// Creates a new handle with a fresh backing file in the platform
    /// temporary directory.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn new() -> Result<Self> {
        let mut result = Self{ file: None, root: None };
        result.create()?;
        Ok(result)
    }

    /// Creates a new handle with a fresh backing file inside the given root
    /// directory. Later [create](#method.create) and [reset](#method.reset)
    /// calls stay inside that root.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn new_in(root: impl AsRef<Path>) -> Result<Self> {
        let mut result = Self{ file: None, root: Some(root.as_ref().to_path_buf()) };
        result.create()?;
        Ok(result)
    }

    /// Opens a new uniquely-named backing file, closing - and thereby
    /// removing - the previous one first, if there was any.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn create(&mut self) -> Result<&mut Self> {
        self.close();
        let file = match &self.root {
            Some(root) => NamedTempFile::new_in(root)?,
            None => NamedTempFile::new()?,
        };
        debug!("created scratch file at {:?}", file.path());
        self.file = Some(file);
        Ok(self)
    }

    /// Returns `true` while a backing file handle is owned.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Returns the location of the open backing file.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed.
    pub fn path(&self) -> Result<&Path> {
        Ok(self.handle()?.path())
    }

    /// Returns the file-status record of the open backing file.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the query fails.
    pub fn metadata(&self) -> Result<Metadata> {
        Ok(self.handle()?.as_file().metadata()?)
    }

    /// Returns the byte size of the open backing file.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the query fails.
    pub fn len(&self) -> Result<u64> {
        Ok(self.metadata()?.len())
    }

    /// Returns `true` if the open backing file holds no bytes.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the query fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Rewinds to the start of the file and returns the raw handle, for
    /// interfacing with APIs that want a plain `File`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed - never
    /// a handle to nothing.
    pub fn file(&mut self) -> Result<&mut File> {
        self.rewind()?;
        self.handle_mut()
    }

    /// Moves the file position to the beginning. A no-op when closed.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn rewind(&mut self) -> Result<&mut Self> {
        self.seek(SeekFrom::Start(0))
    }

    /// Moves the file position to the end. A no-op when closed.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn to_end(&mut self) -> Result<&mut Self> {
        self.seek(SeekFrom::End(0))
    }

    /// Moves the file position relative to the start, the current position or
    /// the end. A no-op when closed.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<&mut Self> {
        if let Some(file) = &mut self.file {
            file.as_file_mut().seek(pos)?;
        }
        Ok(self)
    }

    /// Returns the current file position.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the query fails.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.handle_mut()?.stream_position()?)
    }

    /// Writes the given bytes at the current position, advancing it. A closed
    /// handle opens a fresh backing file first, so this never needs an
    /// explicit [create](#method.create).
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) -> Result<&mut Self> {
        if !self.is_open() {
            self.create()?;
        }
        self.handle_mut()?.write_all(bytes.as_ref())?;
        Ok(self)
    }

    /// Replaces the entire content with the given bytes: the current backing
    /// file is discarded and the bytes are written to a fresh one from
    /// offset `0`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fs_scratch::ScratchFile;
    ///
    /// # fn main() -> fs_scratch::Result<()> {
    /// let mut file = ScratchFile::new()?;
    /// file.put("HOGE")?.put("FUGA")?;
    /// assert_eq!(file.contents()?, b"FUGA");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn put(&mut self, bytes: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.close();
        self.write(bytes)
    }

    /// Adds the given bytes to the end of the file, leaving earlier content
    /// in place.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.to_end()?;
        self.write(bytes)
    }

    /// Writes the 3-byte UTF-8 byte-order-mark at the current position.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn write_bom(&mut self) -> Result<&mut Self> {
        self.write(UTF8_BOM)
    }

    /// Truncates or zero-extends the backing file to the given byte size. The
    /// file position is left where it was.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the resize fails.
    pub fn set_len(&mut self, size: u64) -> Result<&mut Self> {
        self.handle()?.as_file().set_len(size)?;
        Ok(self)
    }

    /// Reads up to `len` bytes from the current position, advancing it. At
    /// the end of the file fewer bytes - possibly none - are returned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when reading fails.
    pub fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        let file = self.handle_mut()?;
        let mut buffer = Vec::new();
        file.take(len as u64).read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads the entire content of the file, from the beginning regardless of
    /// the current position. An open zero-size file yields an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when reading fails.
    pub fn contents(&mut self) -> Result<Vec<u8>> {
        let size = self.len()?;
        self.rewind()?;
        self.read(size as usize)
    }

    /// Reads the next CSV record from the current position with the
    /// conventional comma-separated dialect. See
    /// [read_record_with](#method.read_record_with).
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when reading fails.
    pub fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        self.read_record_with(&Dialect::default())
    }

    /// Reads the next CSV record from the current position with the given
    /// dialect, advancing past the record terminator. Returns `None` once the
    /// end of the file is reached with nothing read, which keeps exhaustion
    /// distinguishable from the closed-handle error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fs_scratch::ScratchFile;
    /// use fs_scratch::csv::Dialect;
    ///
    /// # fn main() -> fs_scratch::Result<()> {
    /// let mut file = ScratchFile::new()?;
    /// file.put("hoge;fuga\n")?.rewind()?;
    /// let record = file.read_record_with(&Dialect::new(b';', b'"', b'\\'))?;
    /// assert_eq!(record, Some(vec!["hoge".to_string(), "fuga".to_string()]));
    /// assert_eq!(file.read_record()?, None);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when reading fails.
    pub fn read_record_with(&mut self, dialect: &Dialect) -> Result<Option<Vec<String>>> {
        let file = self.handle_mut()?;
        Ok(csv::read_record(file, dialect)?)
    }

    /// Copies the full content of the backing file to the given destination
    /// path, returning the number of bytes copied. The file position is
    /// unaffected.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotOpen](../error/enum.Error.html) when closed, an IO
    /// error variant when the destination is not writable.
    pub fn copy_to(&self, to: impl AsRef<Path>) -> Result<u64> {
        Ok(fs::copy(self.path()?, to)?)
    }

    /// Discards all content by replacing the backing file with a fresh one.
    /// Works from both states and always leaves the handle open with size
    /// `0`.
    ///
    /// # Errors
    ///
    /// In case of an IO error, an error variant is returned.
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.close().create()
    }

    /// Releases the handle; the backing file is removed with it. Calling this
    /// on an already-closed handle is a safe no-op. A failed removal is
    /// logged, not raised.
    pub fn close(&mut self) -> &mut Self {
        if let Some(file) = self.file.take() {
            if let Err(error) = file.close() {
                warn!("failed to remove scratch file: {}", error);
            }
        }
        self
    }

    /// Deletes the backing file. Removal rides on releasing the handle, so
    /// this is [close](#method.close) under the name the intent reads best
    /// by.
    pub fn delete(&mut self) -> &mut Self {
        self.close()
    }

    /// The open handle, or the closed-handle error.
    fn handle(&self) -> Result<&NamedTempFile> {
        self.file.as_ref().ok_or(Error::NotOpen)
    }

    /// The open raw file handle, or the closed-handle error.
    fn handle_mut(&mut self) -> Result<&mut File> {
        match &mut self.file {
            Some(file) => Ok(file.as_file_mut()),
            None => Err(Error::NotOpen),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.close();
    }
}
