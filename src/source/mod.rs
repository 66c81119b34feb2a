//! Media sources: caller-supplied paths or open handles
//!
//! Every operation that reads or seeks a handle puts the stream position back
//! where it found it, on success and on failure alike.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::MediaMetaResult;
use crate::utils::path::PathUtils;

/// A seekable byte stream with an optional logical name
pub trait MediaHandle: Read + Seek {
    /// Name the stream was uploaded or opened under
    fn name(&self) -> Option<String> {
        None
    }

    /// Backing file on disk, when there is one
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Wraps any reader with a logical name
pub struct NamedHandle<R> {
    inner: R,
    name: Option<String>,
    path: Option<PathBuf>,
}

impl<R: Read + Seek> NamedHandle<R> {
    pub fn new(inner: R, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: Some(name.into()),
            path: None,
        }
    }

    /// Handle without a name; callers must pass a filename explicitly
    pub fn anonymous(inner: R) -> Self {
        Self {
            inner,
            name: None,
            path: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl NamedHandle<File> {
    /// Open a file, keeping its path as both name and backing file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            inner: File::open(path)?,
            name: Some(PathUtils::display(path)),
            path: Some(path.to_path_buf()),
        })
    }
}

impl<R: Read> Read for NamedHandle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for NamedHandle<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<R: Read + Seek> MediaHandle for NamedHandle<R> {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Input to parser and thumbnail dispatch
pub enum MediaSource<'a> {
    /// Opened and closed by the dispatcher
    Path(&'a Path),
    /// Caller-owned; left open and at its original position
    Handle(&'a mut dyn MediaHandle),
}

impl<'a> MediaSource<'a> {
    /// Shorter-lived copy of this source
    pub fn reborrow(&mut self) -> MediaSource<'_> {
        match self {
            MediaSource::Path(path) => MediaSource::Path(*path),
            MediaSource::Handle(handle) => MediaSource::Handle(&mut **handle),
        }
    }

    /// Filename used for dispatch when the caller gives none
    pub fn default_name(&self) -> Option<String> {
        match self {
            MediaSource::Path(path) => Some(PathUtils::display(path)),
            MediaSource::Handle(handle) => handle
                .name()
                .or_else(|| handle.path().map(PathUtils::display)),
        }
    }

    /// Acquire an open stream for the duration of `f`, named by the
    /// filename the caller dispatched on.
    ///
    /// Path inputs are opened here and closed when `f` returns, whatever its result.
    pub fn with_open<T>(
        &mut self,
        filename: &str,
        f: impl FnOnce(&mut OpenMedia<'_>) -> MediaMetaResult<T>,
    ) -> MediaMetaResult<T> {
        match self {
            MediaSource::Path(path) => {
                let mut file = NamedHandle::open(*path)?;
                let mut media = OpenMedia::named(&mut file, filename);
                f(&mut media)
            }
            MediaSource::Handle(handle) => {
                let mut media = OpenMedia::named(&mut **handle, filename);
                f(&mut media)
            }
        }
    }
}

/// A locally addressable copy of the media
pub enum LocalFile {
    /// The handle is already backed by this file
    Existing(PathBuf),
    /// Spooled copy, removed on drop
    Spooled(NamedTempFile),
}

impl LocalFile {
    pub fn path(&self) -> &Path {
        match self {
            LocalFile::Existing(path) => path,
            LocalFile::Spooled(file) => file.path(),
        }
    }
}

/// An open stream handed to collaborators
pub struct OpenMedia<'a> {
    handle: &'a mut dyn MediaHandle,
    filename: Option<String>,
}

impl<'a> OpenMedia<'a> {
    pub fn new(handle: &'a mut dyn MediaHandle) -> Self {
        Self {
            handle,
            filename: None,
        }
    }

    /// Stream known by an explicit filename rather than the handle's own name
    pub fn named(handle: &'a mut dyn MediaHandle, filename: impl Into<String>) -> Self {
        Self {
            handle,
            filename: Some(filename.into()),
        }
    }

    /// Dispatch filename if one was given, else the handle's name
    pub fn name(&self) -> Option<String> {
        self.filename.clone().or_else(|| self.handle.name())
    }

    /// Run `f` at the start of the stream, then restore the saved position
    fn rewound<T>(
        &mut self,
        f: impl FnOnce(&mut dyn MediaHandle) -> io::Result<T>,
    ) -> io::Result<T> {
        let saved = self.handle.stream_position()?;
        let result = self
            .handle
            .seek(SeekFrom::Start(0))
            .and_then(|_| f(&mut *self.handle));
        let restored = self.handle.seek(SeekFrom::Start(saved));
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Total size in bytes, measured by seeking to the end
    pub fn size(&mut self) -> MediaMetaResult<u64> {
        let saved = self.handle.stream_position()?;
        let end = self.handle.seek(SeekFrom::End(0));
        let restored = self.handle.seek(SeekFrom::Start(saved));
        let size = end?;
        restored?;
        Ok(size)
    }

    /// Entire content from the first byte
    pub fn read_all(&mut self) -> MediaMetaResult<Vec<u8>> {
        Ok(self.rewound(|handle| {
            let mut bytes = Vec::new();
            handle.read_to_end(&mut bytes)?;
            Ok(bytes)
        })?)
    }

    /// Path-only collaborators get the backing file, or a spooled copy
    /// named with the same extension.
    pub fn local_file(&mut self) -> MediaMetaResult<LocalFile> {
        if let Some(path) = self.handle.path() {
            return Ok(LocalFile::Existing(path.to_path_buf()));
        }

        let suffix = self
            .name()
            .map(|name| PathUtils::extension(&name).to_string())
            .unwrap_or_default();
        let mut spool = tempfile::Builder::new()
            .prefix("mediameta-")
            .suffix(&suffix)
            .tempfile()?;

        let copied = self.rewound(|handle| io::copy(handle, spool.as_file_mut()))?;
        spool.as_file_mut().flush()?;
        debug!(bytes = copied, path = %spool.path().display(), "Spooled handle to local file");
        Ok(LocalFile::Spooled(spool))
    }
}
