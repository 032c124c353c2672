//! Responsible for materializing the output tree: writing rendered pages and
//! copying static assets from the site root into the output directory.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Writes files into an output directory, mirroring their paths relative to
/// the site root.
pub struct Writer<'a> {
    /// The site root. Assets are copied from here.
    pub root: &'a Path,

    /// The directory into which pages and assets are written.
    pub output_directory: &'a Path,

    /// Directories already created during this build.
    seen_dirs: HashSet<PathBuf>,
}

impl<'a> Writer<'a> {
    pub fn new(root: &'a Path, output_directory: &'a Path) -> Writer<'a> {
        Writer {
            root,
            output_directory,
            seen_dirs: HashSet::new(),
        }
    }

    /// Removes the output directory so a build starts from an empty tree. A
    /// missing directory is fine.
    pub fn clean(&self) -> Result<()> {
        match std::fs::remove_dir_all(self.output_directory) {
            Ok(()) => Ok(()),
            Err(e) => match e.kind() {
                io::ErrorKind::NotFound => Ok(()),
                _ => Err(Error::Clean {
                    path: self.output_directory.to_owned(),
                    err: e,
                }),
            },
        }
    }

    /// Writes `document` to `{output_directory}/{relative}`, creating parent
    /// directories as needed.
    pub fn write_page(&mut self, relative: &Path, document: &str) -> Result<()> {
        let target = self.output_directory.join(relative);
        self.create_parent(&target)?;
        std::fs::write(&target, document).map_err(|err| Error::Write {
            path: target.clone(),
            err,
        })?;
        log::info!("wrote {}", relative.display());
        Ok(())
    }

    /// Copies the file or directory at `{root}/{relative}` to
    /// `{output_directory}/{relative}` byte-for-byte. Directories are copied
    /// recursively.
    pub fn copy_path(&mut self, relative: &Path) -> Result<()> {
        let source = self.root.join(relative);
        let metadata = std::fs::metadata(&source).map_err(|err| Error::Copy {
            path: relative.to_owned(),
            err,
        })?;

        if metadata.is_file() {
            self.copy_file(&source, &self.output_directory.join(relative))?;
        } else {
            for result in WalkDir::new(&source).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
                let entry = result?;
                if !entry.file_type().is_file() {
                    continue;
                }
                // strip_prefix shouldn't fail since `source` is always an
                // ancestor of the entry path
                let nested = match entry.path().strip_prefix(&source) {
                    Ok(nested) => nested,
                    Err(_) => continue,
                };
                self.copy_file(entry.path(), &self.output_directory.join(relative).join(nested))?;
            }
        }
        log::info!("copied {}", relative.display());
        Ok(())
    }

    fn copy_file(&mut self, source: &Path, target: &Path) -> Result<()> {
        self.create_parent(target)?;
        std::fs::copy(source, target).map_err(|err| Error::Copy {
            path: source.to_owned(),
            err,
        })?;
        log::debug!("copied {} to {}", source.display(), target.display());
        Ok(())
    }

    fn create_parent(&mut self, target: &Path) -> Result<()> {
        if let Some(dir) = target.parent() {
            if self.seen_dirs.insert(dir.to_owned()) {
                std::fs::create_dir_all(dir).map_err(|err| Error::Write {
                    path: dir.to_owned(),
                    err,
                })?;
            }
        }
        Ok(())
    }
}

/// The result of a fallible output operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error materializing the output tree.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: io::Error },

    /// Returned for I/O problems writing a page or creating a directory.
    Write { path: PathBuf, err: io::Error },

    /// Returned for I/O problems copying an asset.
    Copy { path: PathBuf, err: io::Error },

    /// Returned for errors walking an asset directory.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
            Error::Copy { path, err } => {
                write!(f, "Copying '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clean { err, .. } => Some(err),
            Error::Write { err, .. } => Some(err),
            Error::Copy { err, .. } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking asset directories.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
