// src/listing/entry.rs

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::unistd::{AccessFlags, access};

/// One directory member selected for (potential) execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: OsString,
    full_path: PathBuf,
    location: PathBuf,
}

impl Entry {
    /// `display_root` is the directory as the user named it; `dir` is where it
    /// can be reached from our current working directory.
    pub fn new(name: impl Into<OsString>, display_root: &Path, dir: &Path) -> Self {
        let name = name.into();
        Self {
            full_path: display_root.join(&name),
            location: dir.join(&name),
            name,
        }
    }

    /// File name within the directory.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// `<directory>/<name>`: printed in print mode, used as argv[0] and as
    /// the display name in diagnostics.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path to open or execute the entry from the current directory.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn display_name(&self) -> String {
        self.full_path.to_string_lossy().into_owned()
    }

    /// Raw name bytes, the ordering key.
    pub fn sort_key(&self) -> &[u8] {
        self.name.as_bytes()
    }

    pub fn is_hidden(name: &OsStr) -> bool {
        name.as_bytes().first() == Some(&b'.')
    }
}

impl Entry {
    /// Advisory check: a regular file (after following symlinks) that we may
    /// execute. Racy by nature; the answer can change before the path is used.
    pub fn is_executable(&self) -> bool {
        let is_file = std::fs::metadata(&self.location)
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        is_file && access(&self.location, AccessFlags::X_OK).is_ok()
    }
}
