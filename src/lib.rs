//! The library code for the `walnutgen` static site generator. A site is a
//! list of pages, each assembled from three parts:
//!
//! 1. The shared header fragments, in order
//! 2. The page's own file
//! 3. The shared footer fragments, in order
//!
//! Any of these may contain markers like `{{ post_list }}`. A marker names a
//! [`function::Function`], which is invoked with the path of the page being
//! rendered and whose output replaces the marker ([`substitute`]). Because the
//! current page is passed even when expanding a shared header, a header can
//! show e.g. the title of whichever post it's rendered into ([`meta`]).
//!
//! The built-in functions are the post list ([`postlist`]), the post title and
//! subtitle ([`meta`]) and the markdown renderer ([`markdown`]). The
//! [`config`] module loads a site from its `walnut.yaml` project file and
//! [`build::build_site`] renders it into the output directory.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod compose;
pub mod config;
pub mod function;
pub mod markdown;
pub mod meta;
pub mod postlist;
pub mod substitute;
pub mod write;

mod util;
