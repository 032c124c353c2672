//! Defines the [`Composer`], which assembles a page from the configured
//! header fragments, the page's own body and the footer fragments, expanding
//! function markers in each (see [`crate::substitute`]).

use crate::function::{self, Functions};
use crate::substitute::{markers, substitute};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A piece of template text (a header, a footer or a page body) along with
/// the path it was loaded from.
#[derive(Clone, Debug)]
pub struct Fragment {
    /// The path relative to the site root.
    pub path: PathBuf,

    /// The raw, unexpanded text.
    pub text: String,
}

impl Fragment {
    /// Loads the fragment at `path` (relative to `root`).
    pub fn load(root: &Path, path: &Path) -> Result<Fragment> {
        let mut text = String::new();
        File::open(root.join(path))
            .and_then(|mut file| file.read_to_string(&mut text))
            .map_err(|err| Error::Read {
                path: path.to_owned(),
                err,
            })?;
        Ok(Fragment {
            path: path.to_owned(),
            text,
        })
    }

    /// Loads every fragment in `paths`, preserving order.
    pub fn load_all<P: AsRef<Path>>(root: &Path, paths: &[P]) -> Result<Vec<Fragment>> {
        paths.iter().map(|p| Fragment::load(root, p.as_ref())).collect()
    }

    fn expand(&self, functions: &Functions, page: &Path) -> Result<String> {
        substitute(&self.text, functions, page).map_err(|err| Error::Substitute {
            fragment: self.path.clone(),
            err,
        })
    }
}

/// Composes pages from shared headers and footers. The headers and footers
/// are loaded once and expanded again for each page, since their markers are
/// evaluated against the page being rendered rather than the fragment's own
/// path.
pub struct Composer<'a> {
    pub headers: &'a [Fragment],
    pub footers: &'a [Fragment],
    pub functions: &'a Functions,
}

impl Composer<'_> {
    /// Renders `body` as the page at `page`: every header in order, then the
    /// body, then every footer in order, each expanded with `page` as the
    /// current file.
    pub fn render(&self, page: &Path, body: &Fragment) -> Result<String> {
        let mut document = String::new();
        for header in self.headers {
            document.push_str(&header.expand(self.functions, page)?);
        }
        document.push_str(&body.expand(self.functions, page)?);
        for footer in self.footers {
            document.push_str(&footer.expand(self.functions, page)?);
        }
        Ok(document)
    }

    /// Checks that every marker in the headers and footers names a registered
    /// function. This lets a build fail before any page is written.
    pub fn check(&self) -> Result<()> {
        for fragment in self.headers.iter().chain(self.footers) {
            if let Some(name) = markers(&fragment.text)
                .into_iter()
                .find(|name| !self.functions.contains(name))
            {
                return Err(Error::UnknownFunction {
                    fragment: fragment.path.clone(),
                    name: name.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// The result of a composition operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error composing a page.
#[derive(Debug)]
pub enum Error {
    /// Returned when a header, footer or page file can't be read.
    Read { path: PathBuf, err: io::Error },

    /// Returned when expanding the markers of `fragment` fails.
    Substitute {
        fragment: PathBuf,
        err: function::Error,
    },

    /// Returned by [`Composer::check`] when a header or footer marker names a
    /// function that isn't registered.
    UnknownFunction { fragment: PathBuf, name: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading '{}': {}", path.display(), err)
            }
            Error::Substitute { fragment, err } => {
                write!(f, "Expanding '{}': {}", fragment.display(), err)
            }
            Error::UnknownFunction { fragment, name } => write!(
                f,
                "Unknown function `{}` referenced in '{}'",
                name,
                fragment.display()
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { err, .. } => Some(err),
            Error::Substitute { err, .. } => Some(err),
            Error::UnknownFunction { .. } => None,
        }
    }
}
