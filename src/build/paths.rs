//! Path derivation for rendered pages.
//!
//! This module handles conversions between:
//! - Source file paths (Markdown files under the source root)
//! - Output file paths (their `.html` mirrors under the destination root)
//! - Site-relative URLs and the relative-root prefix used for links

use std::path::{Path, PathBuf};

/// Map a source file to its output path: strip the source-root prefix,
/// replace the extension with `.html`, and join under the destination root.
pub fn output_path(source: &Path, source_root: &Path, dest_root: &Path) -> PathBuf {
    let relative = source.strip_prefix(source_root).unwrap_or(source);
    dest_root.join(relative.with_extension("html"))
}

/// Derive a post's site-relative URL from its output path: the destination
/// root prefix and any leading separator are stripped.
pub fn post_url(output: &Path, dest_root: &Path) -> String {
    let relative = output.strip_prefix(dest_root).unwrap_or(output);
    relative.to_string_lossy().replace('\\', "/")
}

/// The relative path from an output file's parent directory back to the
/// destination root, used to build destination-relative links. Root-level
/// pages get `.`.
pub fn rel_root(output: &Path, dest_root: &Path) -> String {
    let parent = output.parent().unwrap_or(dest_root);
    let diff = pathdiff::diff_paths(dest_root, parent).unwrap_or_default();
    if diff.as_os_str().is_empty() {
        ".".to_string()
    } else {
        diff.to_string_lossy().replace('\\', "/")
    }
}
