//! Loads the site configuration from a `walnut.yaml` project file. The file
//! lists the header, footer and page files, the assets to copy, the output
//! directory and any functions beyond the built-in ones. For example:
//!
//! ```yaml
//! headers: [templates/header.html]
//! footers: [templates/footer.html]
//! files: [index.html]
//! posts:
//!   - posts/goodbye.html
//!   - posts/hello-world.html
//! to_copy: [res]
//! output_dir: docs
//! functions:
//!   recent:
//!     kind: post_list
//!     posts: [posts/hello-world.html]
//! ```

use crate::function::{Function, Functions};
use crate::markdown::Markdown;
use crate::meta::{PostSubtitle, PostTitle};
use crate::postlist::PostList;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The name of the project file.
pub const PROJECT_FILE: &str = "walnut.yaml";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default)]
    headers: Vec<PathBuf>,

    #[serde(default)]
    footers: Vec<PathBuf>,

    #[serde(default)]
    files: Vec<PathBuf>,

    /// Rendered like `files` and listed by the built-in `post_list`.
    #[serde(default)]
    posts: Vec<PathBuf>,

    #[serde(default)]
    to_copy: Vec<PathBuf>,

    output_dir: PathBuf,

    #[serde(default)]
    functions: BTreeMap<String, FunctionSpec>,
}

/// A function declared in the project file.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum FunctionSpec {
    /// Lists `posts`, or the project's `posts` if omitted.
    PostList {
        #[serde(default)]
        posts: Option<Vec<PathBuf>>,
    },
    PostTitle,
    PostSubtitle,
    Markdown,
}

/// The fully resolved site configuration.
pub struct Config {
    /// The site source root. Every other path except `output_dir` is relative
    /// to it.
    pub root: PathBuf,

    /// Fragments prepended to every page, in order.
    pub headers: Vec<PathBuf>,

    /// Fragments appended to every page, in order.
    pub footers: Vec<PathBuf>,

    /// The pages to render.
    pub files: Vec<PathBuf>,

    /// Files and directories copied into `output_dir` unchanged.
    pub to_copy: Vec<PathBuf>,

    /// The directory the site is written to.
    pub output_dir: PathBuf,

    /// The functions available to markers.
    pub functions: Functions,
}

impl Config {
    /// Searches `dir` and then its ancestors for a project file and loads the
    /// first one found. `output_directory` overrides the project's
    /// `output_dir`; a relative override is resolved against the site root.
    pub fn from_directory(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let dir = std::fs::canonicalize(dir)
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        Config::search(&dir, output_directory)
    }

    fn search(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::search(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path`. The site root is the directory
    /// containing the file.
    pub fn from_project_file(path: &Path, output_directory: Option<&Path>) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let project_root = match project_root.as_os_str().is_empty() {
                    true => Path::new("."),
                    false => project_root,
                };
                let root = std::fs::canonicalize(project_root).with_context(|| {
                    format!("Resolving site root `{}`", project_root.display())
                })?;
                let output_dir = match output_directory {
                    Some(dir) => dir.to_owned(),
                    None => project.output_dir.clone(),
                };
                Config::from_project(root, output_dir, project)
            }
        }
    }

    fn from_project(root: PathBuf, output_dir: PathBuf, project: Project) -> Result<Config> {
        let output_dir = resolve_output_dir(&root, &output_dir)?;
        let Project {
            headers,
            footers,
            mut files,
            posts,
            to_copy,
            functions: specs,
            ..
        } = project;

        let mut functions = default_functions(&root, &posts);
        for (name, spec) in specs {
            let function: Box<dyn Function> = match spec {
                FunctionSpec::PostList { posts: listed } => Box::new(PostList::new(
                    &root,
                    listed.unwrap_or_else(|| posts.clone()),
                )),
                FunctionSpec::PostTitle => Box::new(PostTitle::new(&root)),
                FunctionSpec::PostSubtitle => Box::new(PostSubtitle::new(&root)),
                FunctionSpec::Markdown => Box::new(Markdown::new(&root)),
            };
            functions.register_boxed(&name, function);
        }

        files.extend(posts);
        check_sources(&root, &output_dir, &[&headers, &footers, &files], &to_copy)?;

        Ok(Config {
            root,
            headers,
            footers,
            files,
            to_copy,
            output_dir,
            functions,
        })
    }
}

/// Builds the functions every site gets: `post_list` over `posts`,
/// `get_post_title`, `get_post_subtitle` and `post` (markdown). Functions
/// declared in the project file are registered afterwards and replace these on
/// a name clash.
pub fn default_functions(root: &Path, posts: &[PathBuf]) -> Functions {
    let mut functions = Functions::new();
    functions.register("post_list", PostList::new(root, posts.to_vec()));
    functions.register("get_post_title", PostTitle::new(root));
    functions.register("get_post_subtitle", PostSubtitle::new(root));
    functions.register("post", Markdown::new(root));
    functions
}

/// Resolves `output_dir` against `root`. The output directory must be neither
/// the root nor one of its ancestors.
fn resolve_output_dir(root: &Path, output_dir: &Path) -> Result<PathBuf> {
    use crate::util::normalize;
    if output_dir.as_os_str().is_empty() {
        return Err(anyhow!("`output_dir` must not be empty"));
    }
    let resolved = normalize(&root.join(output_dir));
    if normalize(root).starts_with(&resolved) {
        return Err(anyhow!(
            "Output directory `{}` contains the site root `{}`",
            resolved.display(),
            root.display()
        ));
    }
    Ok(resolved)
}

/// Makes sure cleaning and writing `output_dir` can't touch a configured
/// source: no header, footer, page or `to_copy` entry may be the output
/// directory or lie inside it, and the output directory may not lie inside a
/// `to_copy` entry (it would be copied into itself).
fn check_sources(
    root: &Path,
    output_dir: &Path,
    sources: &[&Vec<PathBuf>],
    to_copy: &[PathBuf],
) -> Result<()> {
    use crate::util::normalize;
    for path in sources.iter().flat_map(|paths| paths.iter()).chain(to_copy) {
        if normalize(&root.join(path)).starts_with(output_dir) {
            return Err(anyhow!(
                "Output directory `{}` contains the source `{}`",
                output_dir.display(),
                path.display()
            ));
        }
    }
    for path in to_copy {
        if output_dir.starts_with(normalize(&root.join(path))) {
            return Err(anyhow!(
                "Output directory `{}` is inside the copied path `{}`",
                output_dir.display(),
                path.display()
            ));
        }
    }
    Ok(())
}
