//! Process-scoped staging and witness files.
//!
//! # Responsibilities
//! - Name the staging transaction and witness files after the process id
//! - Refuse to reuse a staging file that already exists
//! - Write secret key files readable by the owner only, never through an
//!   existing path
//! - Remove every file it created, on success and on failure
//!
//! # Design Decisions
//! - Cleanup is a drop guard so an aborted run does not leave key material
//!   on disk
//! - A pre-existing staging file is never touched

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::jcli::SecretKey;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("staging file {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

/// The on-disk files of one transaction being assembled.
#[derive(Debug)]
pub struct StagingArea {
    staging: PathBuf,
    witness_secret: PathBuf,
    witness_output: PathBuf,
    /// Secret key files handed to `transaction auth`.
    extra_secrets: Vec<PathBuf>,
    pid: u32,
    finished: bool,
}

impl StagingArea {
    /// Reserve the files for process `pid` inside `workdir`.
    ///
    /// Fails without side effects if the staging file already exists.
    pub fn create(workdir: &Path, pid: u32) -> Result<Self, StagingError> {
        let staging = workdir.join(format!("staging.{}.transaction", pid));
        if staging.exists() {
            return Err(StagingError::AlreadyExists(staging));
        }
        Ok(Self {
            staging,
            witness_secret: workdir.join(format!("witness.secret.{}", pid)),
            witness_output: workdir.join(format!("witness.out.{}", pid)),
            extra_secrets: Vec::new(),
            pid,
            finished: false,
        })
    }

    /// Like [`StagingArea::create`] for the current process.
    pub fn for_current_process(workdir: &Path) -> Result<Self, StagingError> {
        Self::create(workdir, std::process::id())
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    pub fn witness_secret_path(&self) -> &Path {
        &self.witness_secret
    }

    pub fn witness_output_path(&self) -> &Path {
        &self.witness_output
    }

    /// Write the key signing the account witness.
    pub fn write_witness_secret(&self, key: &SecretKey) -> Result<&Path, StagingError> {
        write_secret(&self.witness_secret, key)?;
        Ok(&self.witness_secret)
    }

    /// Write an additional secret key file, removed with the area.
    pub fn write_secret(&mut self, name: &str, key: &SecretKey) -> Result<PathBuf, StagingError> {
        let path = self
            .staging
            .with_file_name(format!("{}.{}", name, self.pid));
        self.extra_secrets.push(path.clone());
        write_secret(&path, key)?;
        Ok(path)
    }

    fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.staging, &self.witness_secret, &self.witness_output]
            .into_iter()
            .chain(self.extra_secrets.iter())
    }

    /// Remove all files now, reporting the first failure.
    pub fn finish(mut self) -> Result<(), StagingError> {
        self.finished = true;
        let mut result = Ok(());
        for path in self.paths() {
            if let Err(e) = remove_if_present(path) {
                if result.is_ok() {
                    result = Err(StagingError::Remove {
                        path: path.clone(),
                        source: e,
                    });
                }
            }
        }
        result
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        for path in self.paths() {
            if let Err(e) = remove_if_present(path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove staging file");
            } else {
                tracing::debug!(path = %path.display(), "Removed staging file");
            }
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Create a new secret key file at `path` with owner-only permissions.
///
/// Fails if anything, including a dangling symlink, already exists there.
pub fn write_secret(path: &Path, key: &SecretKey) -> Result<(), StagingError> {
    open_private(path, true, key.expose().as_bytes())
}

/// Write `contents` to `path` with owner-only permissions, replacing any
/// existing file.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<(), StagingError> {
    open_private(path, false, contents)
}

fn open_private(path: &Path, create_new: bool, contents: &[u8]) -> Result<(), StagingError> {
    let wrap = |source| StagingError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut options = OpenOptions::new();
    options.write(true);
    if create_new {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(wrap)?;
    file.write_all(contents).map_err(wrap)?;
    file.flush().map_err(wrap)
}
