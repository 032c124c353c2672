//! Defines the [`Function`] trait and the [`Functions`] registry. A function
//! is a named producer of text: templates reference it by name with a marker
//! (see [`crate::substitute`]) and the function is invoked with the path of
//! the page currently being rendered.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A content-generating function. Implementations hold only immutable state
/// captured at construction (e.g., a list of posts or the site root), so a
/// single instance can be invoked for every page of a build.
pub trait Function {
    /// Produces the text for the page at `filename`. `filename` is the page
    /// path as configured, relative to the site root.
    fn invoke(&self, filename: &Path) -> Result<String>;
}

/// Maps function names to [`Function`] instances.
#[derive(Default)]
pub struct Functions(HashMap<String, Box<dyn Function>>);

impl Functions {
    pub fn new() -> Functions {
        Functions(HashMap::new())
    }

    /// Registers `function` under `name`. An existing registration with the
    /// same name is replaced, which is how configured functions override the
    /// built-in defaults.
    pub fn register<F: Function + 'static>(&mut self, name: &str, function: F) {
        self.register_boxed(name, Box::new(function));
    }

    pub fn register_boxed(&mut self, name: &str, function: Box<dyn Function>) {
        if self.0.insert(name.to_owned(), function).is_some() {
            log::debug!("function `{}` overridden", name);
        }
    }

    /// Invokes the function registered as `name` for the page at `filename`.
    /// Returns [`Error::UnknownFunction`] if nothing is registered under
    /// `name`; a missing function never yields empty output.
    pub fn invoke(&self, name: &str, filename: &Path) -> Result<String> {
        match self.0.get(name) {
            Some(function) => function.invoke(filename),
            None => Err(Error::UnknownFunction {
                name: name.to_owned(),
                page: filename.to_owned(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The result of a function invocation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed function invocation.
#[derive(Debug)]
pub enum Error {
    /// Returned when a marker names a function that isn't registered.
    UnknownFunction { name: String, page: PathBuf },

    /// Returned when a function fails while producing output for `page`.
    Failed {
        name: &'static str,
        page: PathBuf,
        err: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownFunction { name, page } => write!(
                f,
                "unknown function `{}` referenced while rendering '{}'",
                name,
                page.display()
            ),
            Error::Failed { name, page, err } => write!(
                f,
                "function `{}` failed for '{}': {}",
                name,
                page.display(),
                err
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownFunction { .. } => None,
            Error::Failed { err, .. } => Some(err.as_ref()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Constant(&'static str);

    impl Function for Constant {
        fn invoke(&self, _filename: &Path) -> Result<String> {
            Ok(self.0.to_owned())
        }
    }

    struct Echo;

    impl Function for Echo {
        fn invoke(&self, filename: &Path) -> Result<String> {
            Ok(filename.display().to_string())
        }
    }

    #[test]
    fn test_invoke_passes_page_path() -> Result<()> {
        let mut functions = Functions::new();
        functions.register("echo", Echo);
        assert_eq!(
            "posts/a.html",
            functions.invoke("echo", Path::new("posts/a.html"))?
        );
        Ok(())
    }

    #[test]
    fn test_register_last_write_wins() -> Result<()> {
        let mut functions = Functions::new();
        functions.register("greeting", Constant("hello"));
        functions.register("greeting", Constant("goodbye"));
        assert_eq!("goodbye", functions.invoke("greeting", Path::new("index.html"))?);
        assert_eq!(vec!["greeting"], functions.names());
        Ok(())
    }

    #[test]
    fn test_unknown_function_is_an_error() {
        let functions = Functions::new();
        match functions.invoke("missing", Path::new("index.html")) {
            Err(Error::UnknownFunction { name, page }) => {
                assert_eq!("missing", name);
                assert_eq!(PathBuf::from("index.html"), page);
            }
            other => panic!("wanted UnknownFunction, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_output_is_not_an_error() -> Result<()> {
        let mut functions = Functions::new();
        functions.register("empty", Constant(""));
        assert!(functions.contains("empty"));
        assert_eq!("", functions.invoke("empty", Path::new("index.html"))?);
        Ok(())
    }
}
