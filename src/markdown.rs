//! Defines the [`Markdown`] function, which renders the markdown source that
//! sits next to a page (`posts/hello.html` → `posts/hello.md`).

use crate::function::{self, Function};
use crate::meta::companion_path;
use pulldown_cmark::{html, Options, Parser};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSION: &str = ".md";

/// Produced by [`Markdown`] when the page's markdown source can't be
/// rendered.
pub const FALLBACK: &str = "POST";

/// Renders the page's markdown source to HTML, or [`FALLBACK`] if the source
/// is missing or unreadable.
pub struct Markdown {
    root: PathBuf,
}

impl Markdown {
    pub fn new(root: &Path) -> Markdown {
        Markdown {
            root: root.to_owned(),
        }
    }

    fn render(&self, filename: &Path) -> Result<String> {
        let path = self.root.join(source_path(filename));
        let mut markdown = String::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_string(&mut markdown))
            .map_err(|err| Error { path, err })?;
        Ok(to_html(&markdown))
    }
}

impl Function for Markdown {
    fn invoke(&self, filename: &Path) -> function::Result<String> {
        match self.render(filename) {
            Ok(html) => Ok(html),
            Err(err) => {
                log::warn!("rendering markdown for '{}': {}", filename.display(), err);
                Ok(FALLBACK.to_owned())
            }
        }
    }
}

/// Returns the markdown source path for `page`: its companion path plus
/// `.md`.
pub fn source_path(page: &Path) -> PathBuf {
    let mut path = companion_path(page).into_os_string();
    path.push(MARKDOWN_EXTENSION);
    PathBuf::from(path)
}

/// Converts markdown to HTML. Fenced code blocks are part of CommonMark; the
/// usual extensions are enabled on top of that.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, Parser::new_ext(markdown, options));
    output
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a markdown source file.
#[derive(Debug)]
struct Error {
    path: PathBuf,
    err: io::Error,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "reading '{}': {}", self.path.display(), self.err)
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
