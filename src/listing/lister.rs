// src/listing/lister.rs

use std::fs;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use tracing::{debug, trace};

use crate::errors::{Result, SequenceError};
use crate::listing::entry::Entry;

/// Which directory members are candidates for execution.
///
/// - `Strict` (default): regular files, and symlinks that resolve to a
///   regular file. Everything else is skipped while listing.
/// - `Permissive`: every non-hidden member. Type and permission problems
///   surface when the entry is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListingPolicy {
    #[default]
    Strict,
    Permissive,
}

/// Enumerates a directory into a sorted, fully materialised list of entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryLister {
    policy: ListingPolicy,
}

impl EntryLister {
    pub fn new(policy: ListingPolicy) -> Self {
        Self { policy }
    }

    /// Read `dir` once and return its candidate entries in byte-wise order.
    ///
    /// Any failure aborts the whole listing; a partial list is never
    /// returned. `display_root` only affects [`Entry::full_path`].
    pub fn list(&self, dir: &Path, display_root: &Path) -> Result<Vec<Entry>> {
        let read_err = |source: io::Error| SequenceError::ReadDirectory {
            path: display_root.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for dent in fs::read_dir(dir).map_err(read_err)? {
            let dent = dent.map_err(read_err)?;
            let name = dent.file_name();

            if Entry::is_hidden(&name) {
                trace!(name = ?name, "skipping hidden entry");
                continue;
            }

            let entry = Entry::new(name, display_root, dir);
            if self.admits(&dent, &entry)? {
                entries.push(entry);
            }
        }

        sort_entries(&mut entries);
        debug!(
            dir = %display_root.display(),
            policy = ?self.policy,
            count = entries.len(),
            "listed directory"
        );
        Ok(entries)
    }

    fn admits(&self, dent: &fs::DirEntry, entry: &Entry) -> Result<bool> {
        if self.policy == ListingPolicy::Permissive {
            return Ok(true);
        }

        let file_type = dent.file_type().map_err(|source| SequenceError::Stat {
            path: entry.full_path().to_path_buf(),
            source,
        })?;

        if file_type.is_file() {
            return Ok(true);
        }

        if file_type.is_symlink() {
            return match fs::metadata(entry.location()) {
                Ok(meta) => {
                    if !meta.is_file() {
                        debug!(entry = %entry.display_name(), "symlink target is not a regular file; skipping");
                    }
                    Ok(meta.is_file())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(entry = %entry.display_name(), "dangling symlink; skipping");
                    Ok(false)
                }
                Err(source) => Err(SequenceError::Stat {
                    path: entry.full_path().to_path_buf(),
                    source,
                }),
            };
        }

        debug!(entry = %entry.display_name(), ?file_type, "not a regular file; skipping");
        Ok(false)
    }
}

/// Sort by raw name bytes and drop duplicate names.
///
/// Not locale-aware and not case-insensitive: `10-a` sorts before `2-b`, and
/// `B` before `a`.
pub fn sort_entries(entries: &mut Vec<Entry>) {
    entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    entries.dedup_by(|a, b| a.name() == b.name());
}
