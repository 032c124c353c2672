//! Post metadata lives in a companion file next to the page: for the page
//! `posts/hello.html` the companion is the extensionless `posts/hello`, whose
//! contents look like `Hello, world! - 2021-04-16`. This module parses those
//! files into [`PostMeta`] and defines the [`PostTitle`] and [`PostSubtitle`]
//! functions on top of them.

use crate::function::{self, Function};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const HTML_EXTENSION: &str = ".html";

/// Separates the title from the subtitle in a companion file.
pub const SEPARATOR: &str = " - ";

/// Prefix of the text [`PostTitle`] produces when a page has no readable
/// companion file. The page path follows the prefix.
pub const NO_TITLE: &str = "NO TITLE FOR ";

/// The title and subtitle (typically a date) of a post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostMeta {
    pub title: String,
    pub subtitle: String,
}

impl PostMeta {
    /// Parses the contents of a companion file. The contents are split on the
    /// first [`SEPARATOR`] and each half is trimmed; any later separators stay
    /// in the subtitle. Contents without a separator are treated as a title
    /// with an empty subtitle.
    pub fn parse(contents: &str) -> PostMeta {
        match contents.find(SEPARATOR) {
            Some(i) => PostMeta {
                title: contents[..i].trim().to_owned(),
                subtitle: contents[i + SEPARATOR.len()..].trim().to_owned(),
            },
            None => PostMeta {
                title: contents.trim().to_owned(),
                subtitle: String::new(),
            },
        }
    }

    /// Reads the companion file of `page` (relative to `root`).
    pub fn read(root: &Path, page: &Path) -> Result<PostMeta> {
        let path = root.join(companion_path(page));
        let mut contents = String::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => Error::Missing(path.clone()),
                _ => Error::Io {
                    path: path.clone(),
                    err,
                },
            })?;
        Ok(PostMeta::parse(&contents))
    }
}

/// Returns the companion path of `page`: the path with its `.html` suffix
/// stripped. Pages with some other extension lose that extension instead.
pub fn companion_path(page: &Path) -> PathBuf {
    match page.to_str().and_then(|s| s.strip_suffix(HTML_EXTENSION)) {
        Some(stem) => PathBuf::from(stem),
        None => page.with_extension(""),
    }
}

/// Produces the title of the page being rendered, or
/// `NO TITLE FOR {page}` when the page has no readable companion file.
pub struct PostTitle {
    root: PathBuf,
}

impl PostTitle {
    pub fn new(root: &Path) -> PostTitle {
        PostTitle {
            root: root.to_owned(),
        }
    }
}

impl Function for PostTitle {
    fn invoke(&self, filename: &Path) -> function::Result<String> {
        match PostMeta::read(&self.root, filename) {
            Ok(meta) => Ok(meta.title),
            Err(err) => {
                err.log(filename);
                Ok(format!("{}{}", NO_TITLE, filename.display()))
            }
        }
    }
}

/// Produces the subtitle of the page being rendered. A page without a
/// readable companion file gets an empty subtitle.
pub struct PostSubtitle {
    root: PathBuf,
}

impl PostSubtitle {
    pub fn new(root: &Path) -> PostSubtitle {
        PostSubtitle {
            root: root.to_owned(),
        }
    }
}

impl Function for PostSubtitle {
    fn invoke(&self, filename: &Path) -> function::Result<String> {
        match PostMeta::read(&self.root, filename) {
            Ok(meta) => Ok(meta.subtitle),
            Err(err) => {
                err.log(filename);
                Ok(String::new())
            }
        }
    }
}

/// Represents the result of reading a companion file.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a companion file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the companion file doesn't exist.
    Missing(PathBuf),

    /// Returned for any other I/O error (e.g., permissions or invalid UTF-8).
    Io { path: PathBuf, err: io::Error },
}

impl Error {
    /// Logs the error at a level matching its severity: a page without
    /// metadata is common, an unreadable one isn't.
    fn log(&self, page: &Path) {
        match self {
            Error::Missing(_) => {
                log::warn!("no metadata for '{}': {}", page.display(), self)
            }
            Error::Io { .. } => {
                log::error!("unreadable metadata for '{}': {}", page.display(), self)
            }
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Missing(path) => {
                write!(f, "missing metadata file '{}'", path.display())
            }
            Error::Io { path, err } => {
                write!(f, "reading metadata file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Missing(_) => None,
            Error::Io { err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_title_and_subtitle() {
        assert_eq!(
            PostMeta {
                title: String::from("A"),
                subtitle: String::from("B"),
            },
            PostMeta::parse("A - B")
        );
    }

    #[test]
    fn test_parse_trims_trailing_newline() {
        let meta = PostMeta::parse("Hello - 2021\n");
        assert_eq!("Hello", meta.title);
        assert_eq!("2021", meta.subtitle);
    }

    #[test]
    fn test_parse_keeps_later_separators_in_subtitle() {
        let meta = PostMeta::parse("Rust - part one - 2021");
        assert_eq!("Rust", meta.title);
        assert_eq!("part one - 2021", meta.subtitle);
    }

    #[test]
    fn test_parse_separator_at_either_end() {
        let meta = PostMeta::parse("A - \n");
        assert_eq!("A", meta.title);
        assert_eq!("", meta.subtitle);

        let meta = PostMeta::parse(" - B\n");
        assert_eq!("", meta.title);
        assert_eq!("B", meta.subtitle);
    }

    #[test]
    fn test_parse_without_separator() {
        let meta = PostMeta::parse("  Just a title\n");
        assert_eq!("Just a title", meta.title);
        assert_eq!("", meta.subtitle);
    }

    #[test]
    fn test_companion_path() {
        assert_eq!(
            PathBuf::from("posts/hello"),
            companion_path(Path::new("posts/hello.html"))
        );
        assert_eq!(
            PathBuf::from("notes/readme"),
            companion_path(Path::new("notes/readme.txt"))
        );
        assert_eq!(PathBuf::from("about"), companion_path(Path::new("about")));
    }

    #[test]
    fn test_title_from_companion_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("hello"), "Hello - 2021\n")?;

        let page = Path::new("hello.html");
        assert_eq!("Hello", PostTitle::new(dir.path()).invoke(page)?);
        assert_eq!("2021", PostSubtitle::new(dir.path()).invoke(page)?);
        Ok(())
    }

    #[test]
    fn test_missing_title_sentinel() -> function::Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let title = PostTitle::new(dir.path()).invoke(Path::new("missing.html"))?;
        assert_eq!("NO TITLE FOR missing.html", title);

        let subtitle = PostSubtitle::new(dir.path()).invoke(Path::new("missing.html"))?;
        assert_eq!("", subtitle);
        Ok(())
    }

    #[test]
    fn test_read_missing_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        match PostMeta::read(dir.path(), Path::new("posts/none.html")) {
            Err(Error::Missing(path)) => assert_eq!(dir.path().join("posts/none"), path),
            other => panic!("wanted Error::Missing, got {:?}", other),
        }
    }

    #[test]
    fn test_read_directory_is_io_error() {
        // A directory where the companion file should be can't be read as a
        // file, but it isn't missing either.
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("odd")).unwrap();
        match PostMeta::read(dir.path(), Path::new("odd.html")) {
            Err(Error::Io { .. }) => {}
            other => panic!("wanted Error::Io, got {:?}", other),
        }
    }
}
