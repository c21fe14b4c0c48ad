//! Output packaging: the same [`SourceSet`](crate::generator::SourceSet)
//! written as files under an output root, or as a `tar.gz` stream.
//!
//! Both paths un-escape the template output first, so generated code keeps
//! `<`, `>`, `&` and `"` exactly as rendered.

mod archive;
mod dir;
mod unescape;

pub use archive::{entry_path, write_archive, ENTRY_MODE};
pub use dir::{write_to_dir, DEFAULT_OUTPUT_ROOT};
pub use unescape::unescape_html;
