use crate::GenerateError;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

/// Write `contents` to `root/relative`, creating namespace directories below
/// `root`. The root itself must already exist. The file is written next to
/// its target and renamed into place, so readers never see a partial file.
pub(crate) fn persist(root: &Path, relative: &Path, contents: &str) -> Result<PathBuf, GenerateError> {
    stage(root, relative, contents)?.commit()
}

///
/// Staged
///
/// A fully written sibling of its target, waiting to be renamed into place.
///

#[derive(Debug)]
pub(crate) struct Staged {
    staging: PathBuf,
    target: PathBuf,
    bytes: usize,
}

impl Staged {
    pub(crate) fn commit(self) -> Result<PathBuf, GenerateError> {
        if let Err(source) = fs::rename(&self.staging, &self.target) {
            self.discard();

            return Err(GenerateError::Persist {
                path: self.target,
                source,
            });
        }

        info!(path = %self.target.display(), bytes = self.bytes, "wrote artifact");

        Ok(self.target)
    }

    // best effort; the error that caused the discard is the one worth reporting
    pub(crate) fn discard(&self) {
        let _ = fs::remove_file(&self.staging);
    }
}

/// Write the staging file for `root/relative` without touching the target.
pub(crate) fn stage(root: &Path, relative: &Path, contents: &str) -> Result<Staged, GenerateError> {
    check_root(root)?;

    let target = root.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Persist {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = staging_path(&target);
    fs::write(&staging, contents).map_err(|source| GenerateError::Persist {
        path: staging.clone(),
        source,
    })?;

    Ok(Staged {
        staging,
        target,
        bytes: contents.len(),
    })
}

fn check_root(root: &Path) -> Result<(), GenerateError> {
    let kind = match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => io::ErrorKind::NotADirectory,
        Err(err) => err.kind(),
    };

    Err(GenerateError::Persist {
        path: root.to_path_buf(),
        source: io::Error::new(kind, "output directory is not usable"),
    })
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");

    target.with_file_name(name)
}
