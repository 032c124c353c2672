//! Defines the [`PostList`] function, which renders a fixed list of posts as
//! links.

use crate::function::{self, Function};
use crate::meta::PostMeta;
use std::path::{Path, PathBuf};

/// Renders one link per post, in the configured order. Each line looks like:
///
/// ```html
/// <a href="/posts/hello.html">Hello <span class="gray"> - 2021</span></a><br />
/// ```
///
/// The label and the gray span come from the post's companion metadata file
/// (see [`crate::meta`]). Unlike [`crate::meta::PostTitle`], a post without
/// readable metadata is an error: the list is only ever rendered from
/// configured posts, so a missing file is a configuration mistake.
pub struct PostList {
    root: PathBuf,
    posts: Vec<PathBuf>,
}

impl PostList {
    /// Constructs a [`PostList`] for `posts`, whose paths are relative to
    /// `root`.
    pub fn new(root: &Path, posts: Vec<PathBuf>) -> PostList {
        PostList {
            root: root.to_owned(),
            posts,
        }
    }
}

impl Function for PostList {
    fn invoke(&self, filename: &Path) -> function::Result<String> {
        let mut html = String::new();
        for post in &self.posts {
            let meta = PostMeta::read(&self.root, post).map_err(|err| function::Error::Failed {
                name: "post_list",
                page: filename.to_owned(),
                err: Box::new(err),
            })?;
            html.push_str(&format!(
                "<a href=\"/{}\">{} <span class=\"gray\"> - {}</span></a><br />\n",
                href(post),
                meta.title,
                meta.subtitle,
            ));
        }
        Ok(html)
    }
}

/// Formats a relative post path as a URL path, always with `/` separators.
fn href(post: &Path) -> String {
    post.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/a"), "Hello - 2021\n").unwrap();
        fs::write(dir.path().join("posts/b"), "World - 2022\n").unwrap();
        dir
    }

    #[test]
    fn test_post_list() -> function::Result<()> {
        let dir = site();
        let list = PostList::new(
            dir.path(),
            vec![PathBuf::from("posts/a.html"), PathBuf::from("posts/b.html")],
        );
        let wanted = concat!(
            "<a href=\"/posts/a.html\">Hello <span class=\"gray\"> - 2021</span></a><br />\n",
            "<a href=\"/posts/b.html\">World <span class=\"gray\"> - 2022</span></a><br />\n",
        );
        assert_eq!(wanted, list.invoke(Path::new("index.html"))?);
        Ok(())
    }

    #[test]
    fn test_post_list_keeps_configured_order() -> function::Result<()> {
        let dir = site();
        let list = PostList::new(
            dir.path(),
            vec![
                PathBuf::from("posts/b.html"),
                PathBuf::from("posts/a.html"),
                PathBuf::from("posts/b.html"),
            ],
        );
        let html = list.invoke(Path::new("index.html"))?;
        let hrefs: Vec<&str> = html
            .lines()
            .map(|line| &line[r#"<a href=""#.len()..line.find("\">").unwrap()])
            .collect();
        assert_eq!(vec!["/posts/b.html", "/posts/a.html", "/posts/b.html"], hrefs);
        Ok(())
    }

    #[test]
    fn test_empty_post_list() -> function::Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let list = PostList::new(dir.path(), Vec::new());
        assert_eq!("", list.invoke(Path::new("index.html"))?);
        Ok(())
    }

    #[test]
    fn test_post_list_fails_on_missing_metadata() {
        let dir = site();
        let list = PostList::new(
            dir.path(),
            vec![PathBuf::from("posts/a.html"), PathBuf::from("posts/gone.html")],
        );
        match list.invoke(Path::new("index.html")) {
            Err(function::Error::Failed { name, page, err }) => {
                assert_eq!("post_list", name);
                assert_eq!(PathBuf::from("index.html"), page);
                assert!(err.to_string().contains("gone"), "{}", err);
            }
            other => panic!("wanted Failed, got {:?}", other),
        }
    }
}
