//! Expands function markers in template and page text.
//!
//! A marker is `{{ name }}` (the inner whitespace is optional) where `name`
//! matches `[A-Za-z_][A-Za-z0-9_]*`. Each marker is replaced with the output
//! of the function registered under `name`, invoked with the path of the page
//! being rendered. Expansion is a single left-to-right pass: function output
//! is copied verbatim and never scanned for markers itself.
//!
//! `\{{` produces a literal `{{`. A `{{` that isn't closed, or whose contents
//! aren't a valid name, is left as is.

use crate::function::{Functions, Result};
use std::path::Path;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Expands every marker in `text` for the page at `page`. Fails if a marker
/// names an unregistered function or if a function fails.
pub fn substitute(text: &str, functions: &Functions, page: &Path) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        // Escaped \{{ → literal
        if start > 0 && rest.as_bytes()[start - 1] == b'\\' {
            output.push_str(&rest[..start - 1]);
            output.push_str(OPEN);
            rest = &rest[start + OPEN.len()..];
            continue;
        }

        output.push_str(&rest[..start]);
        let remaining = &rest[start + OPEN.len()..];

        let (name, end) = match remaining.find(CLOSE) {
            Some(end) if is_valid_name(remaining[..end].trim()) => {
                (remaining[..end].trim(), end)
            }
            _ => {
                output.push_str(OPEN);
                rest = remaining;
                continue;
            }
        };

        output.push_str(&functions.invoke(name, page)?);
        rest = &remaining[end + CLOSE.len()..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Returns the names of all markers in `text`, in order of appearance.
pub fn markers(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        let remaining = &rest[start + OPEN.len()..];
        let escaped = start > 0 && rest.as_bytes()[start - 1] == b'\\';
        match remaining.find(CLOSE) {
            Some(end) if !escaped && is_valid_name(remaining[..end].trim()) => {
                names.push(remaining[..end].trim());
                rest = &remaining[end + CLOSE.len()..];
            }
            _ => rest = remaining,
        }
    }
    names
}

/// Valid function name: `[A-Za-z_][A-Za-z0-9_]*`
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::function::{Error, Function};
    use std::path::PathBuf;

    struct Constant(&'static str);

    impl Function for Constant {
        fn invoke(&self, _filename: &Path) -> Result<String> {
            Ok(self.0.to_owned())
        }
    }

    struct Page;

    impl Function for Page {
        fn invoke(&self, filename: &Path) -> Result<String> {
            Ok(filename.display().to_string())
        }
    }

    fn functions() -> Functions {
        let mut functions = Functions::new();
        functions.register("hello", Constant("HELLO"));
        functions.register("page", Page);
        functions.register("nested", Constant("{{ hello }}"));
        functions
    }

    fn expand(text: &str) -> Result<String> {
        substitute(text, &functions(), Path::new("posts/a.html"))
    }

    #[test]
    fn test_substitute() -> Result<()> {
        assert_eq!("before HELLO after", expand("before {{ hello }} after")?);
        assert_eq!("HELLOHELLO", expand("{{hello}}{{ hello }}")?);
        assert_eq!("<title>posts/a.html</title>", expand("<title>{{ page }}</title>")?);
        Ok(())
    }

    #[test]
    fn test_no_markers() -> Result<()> {
        assert_eq!("", expand("")?);
        assert_eq!("<p>plain</p>", expand("<p>plain</p>")?);
        Ok(())
    }

    #[test]
    fn test_output_is_not_rescanned() -> Result<()> {
        assert_eq!("{{ hello }}", expand("{{ nested }}")?);
        Ok(())
    }

    #[test]
    fn test_escaped_marker() -> Result<()> {
        assert_eq!("{{ hello }} HELLO", expand(r"\{{ hello }} {{ hello }}")?);
        Ok(())
    }

    #[test]
    fn test_non_markers_pass_through() -> Result<()> {
        assert_eq!("{{ not a name }}", expand("{{ not a name }}")?);
        assert_eq!("x = {{ 1 }}", expand("x = {{ 1 }}")?);
        assert_eq!("open {{ hello", expand("open {{ hello")?);
        assert_eq!("{{ HELLO", expand("{{ {{ hello }}")?);
        Ok(())
    }

    #[test]
    fn test_unknown_function() {
        match expand("{{ hello }} {{ nope }}") {
            Err(Error::UnknownFunction { name, page }) => {
                assert_eq!("nope", name);
                assert_eq!(PathBuf::from("posts/a.html"), page);
            }
            other => panic!("wanted UnknownFunction, got {:?}", other),
        }
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            vec!["hello", "page"],
            markers(r"{{ hello }} \{{ skipped }} {{ not valid }} {{page}}")
        );
    }
}
