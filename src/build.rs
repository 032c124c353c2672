//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the header and footer
//! fragments, composing every configured page ([`crate::compose`]), and
//! writing the pages and copying the static assets into the output directory
//! ([`crate::write`]).

use crate::compose::{Composer, Error as ComposeError, Fragment};
use crate::config::Config;
use crate::write::{Error as WriteError, Writer};
use std::fmt;
use std::path::PathBuf;

/// A rendered page: its path relative to the site root and its contents.
pub type Page = (PathBuf, String);

/// Builds the site from a [`Config`] object. Every page is rendered before
/// anything is written, so a configuration error (e.g., a marker naming an
/// unknown function) leaves the previous output untouched. The output
/// directory is then cleared, the pages are written and the `to_copy` entries
/// are copied.
pub fn build_site(config: &Config) -> Result<()> {
    log::info!(
        "building {} page(s) from {} into {}",
        config.files.len(),
        config.root.display(),
        config.output_dir.display()
    );
    let pages = render_pages(config)?;

    // Blow away the old output directory so stale pages from a previous build
    // don't linger. `Config` guarantees it holds no source file.
    let mut writer = Writer::new(&config.root, &config.output_dir);
    writer.clean()?;

    for (path, document) in &pages {
        writer.write_page(path, document)?;
    }

    for path in &config.to_copy {
        writer.copy_path(path)?;
    }

    log::info!(
        "built {} page(s) and copied {} asset path(s)",
        pages.len(),
        config.to_copy.len()
    );
    Ok(())
}

/// Renders every page in `config.files`, in order, without touching the
/// output directory.
pub fn render_pages(config: &Config) -> Result<Vec<Page>> {
    let headers = Fragment::load_all(&config.root, &config.headers)?;
    let footers = Fragment::load_all(&config.root, &config.footers)?;
    let composer = Composer {
        headers: &headers,
        footers: &footers,
        functions: &config.functions,
    };
    composer.check()?;
    log::debug!("functions: {}", config.functions.names().join(", "));

    config
        .files
        .iter()
        .map(|file| -> Result<Page> {
            log::debug!("rendering {}", file.display());
            let body = Fragment::load(&config.root, file)?;
            Ok((file.clone(), composer.render(file, &body)?))
        })
        .collect()
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during composition
/// (unreadable fragments, unknown or failing functions) or while writing the
/// output tree.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors composing pages.
    Compose(ComposeError),

    /// Returned for errors writing pages or copying assets.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Compose(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compose(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<ComposeError> for Error {
    /// Converts [`ComposeError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ComposeError) -> Error {
        Error::Compose(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
