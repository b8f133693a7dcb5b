#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sequence::config::RunOptions;
use tempfile::TempDir;

/// Builder for a scratch directory of scripts to sequence.
///
/// Every script gets a `#!/bin/sh` line prepended and mode 0755.
pub struct ScriptDirBuilder {
    dir: TempDir,
}

impl ScriptDirBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("creating temp dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Executable shell script with `body`.
    pub fn script(self, name: &str, body: &str) -> Result<Self> {
        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))
            .with_context(|| format!("writing script {:?}", path))?;
        set_mode(&path, 0o755)?;
        Ok(self)
    }

    /// Script that appends its own name to `marker` (see [`Self::marker_path`]).
    pub fn recording_script(self, name: &str, exit_code: i32) -> Result<Self> {
        let marker = self.marker_path();
        let body = format!(
            "echo {name} >> '{}'\nexit {exit_code}",
            marker.display()
        );
        self.script(name, &body)
    }

    /// Regular file with the given mode.
    pub fn file(self, name: &str, contents: &str, mode: u32) -> Result<Self> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("writing file {:?}", path))?;
        set_mode(&path, mode)?;
        Ok(self)
    }

    pub fn symlink(self, name: &str, target: impl AsRef<Path>) -> Result<Self> {
        let path = self.dir.path().join(name);
        symlink(target.as_ref(), &path).with_context(|| format!("symlinking {:?}", path))?;
        Ok(self)
    }

    pub fn subdir(self, name: &str) -> Result<Self> {
        let path = self.dir.path().join(name);
        fs::create_dir(&path).with_context(|| format!("creating dir {:?}", path))?;
        Ok(self)
    }

    /// Where [`Self::recording_script`] records runs. Lives next to, not
    /// inside, the listed directory's candidates (it is a dotfile).
    pub fn marker_path(&self) -> PathBuf {
        self.dir.path().join(".ran")
    }

    /// Names recorded by recording scripts, in run order.
    pub fn recorded(&self) -> Vec<String> {
        fs::read_to_string(self.marker_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Default options targeting this directory.
    pub fn options(&self) -> RunOptions {
        RunOptions::new(self.dir.path())
    }

    /// Keep the directory alive as a `TempDir`.
    pub fn build(self) -> TempDir {
        self.dir
    }
}

fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("chmod {:o} {:?}", mode, path))
}
