//! The render pipeline.
//!
//! One strictly sequential pass over the source tree:
//! discover Markdown files, then for each file parse, classify, inspect,
//! mutate, render, wrap in the page template, and write; finally generate
//! the post listing page when any post was found. Any error aborts the whole
//! run; the tool regenerates whole sites, it does not recover per file.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use super::html::render_html;
use super::paths::{output_path, post_url, rel_root};
use super::post::{
    MetadataError, Post, append_date_footer, extract_post_fields, listing_markdown,
    read_post_metadata,
};
use super::template::{PageTemplate, TemplateData, TemplateError};
use super::tree::parse;
use crate::config::SiteConfig;

/// Fixed name of the generated listing page.
const LISTING_PAGE: &str = "posts.html";

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("invalid post pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct BuildResult {
    pub pages: usize,
    pub posts: usize,
}

pub struct Builder {
    config: SiteConfig,
}

impl Builder {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Run the full render pipeline.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let source_root = Path::new(&self.config.source_path);
        let dest_root = Path::new(&self.config.destination_path);

        let post_pattern = Regex::new(&self.config.post_pattern)?;
        let template = PageTemplate::load(Path::new(&self.config.template_file))?;
        let sources = discover_markdown_files(source_root)?;

        println!(":: Rendering {} page{}", sources.len(), plural(sources.len()));

        // Reused across the loop; the site name stays fixed while body and
        // rel_root are replaced per file.
        let mut data = TemplateData {
            site_name: self.config.site_name.clone(),
            body: String::new(),
            rel_root: String::new(),
        };
        let mut posts: Vec<Post> = Vec::new();

        for (idx, source) in sources.iter().enumerate() {
            let markdown = std::fs::read_to_string(source)?;
            let mut tree = parse(&markdown);

            let output = output_path(source, source_root, dest_root);

            // Inspection reads the tree before the footer mutation touches it.
            let record = if post_pattern.is_match(&source.to_string_lossy()) {
                let (title, summary) = extract_post_fields(&tree);
                let metadata = read_post_metadata(source)?;
                if let Some(metadata) = &metadata {
                    println!("   Decoded metadata: posted {}", metadata.posted);
                    append_date_footer(&mut tree, metadata.posted);
                }
                Some(Post {
                    title,
                    summary,
                    url: post_url(&output, dest_root),
                    metadata,
                })
            } else {
                None
            };

            data.body = render_html(&tree);
            data.rel_root = rel_root(&output, dest_root);

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, template.render_page(&data)?)?;
            println!("   {}: {} -> {}", idx + 1, source.display(), output.display());

            if let Some(post) = record {
                posts.push(post);
            }
        }

        println!(":: Found {} post{}", posts.len(), plural(posts.len()));

        if !posts.is_empty() {
            let tree = parse(&listing_markdown(&posts));
            data.body = render_html(&tree);
            data.rel_root = ".".to_string();

            let output = dest_root.join(LISTING_PAGE);
            println!("   Saving posts: {}", output.display());
            std::fs::write(&output, template.render_page(&data)?)?;
        }

        println!(":: Rendering complete!");

        Ok(BuildResult {
            pages: sources.len(),
            posts: posts.len(),
        })
    }
}

/// Discover all Markdown files under the source root.
///
/// Entries are walked in sorted order per directory, so discovery order is
/// stable across runs and builds are reproducible.
fn discover_markdown_files(source_root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "md") {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0), "s");
        assert_eq!(plural(1), "");
        assert_eq!(plural(2), "s");
    }

    #[test]
    fn test_discover_markdown_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("blog")).unwrap();
        std::fs::write(root.join("zeta.md"), "z").unwrap();
        std::fs::write(root.join("alpha.md"), "a").unwrap();
        std::fs::write(root.join("notes.txt"), "skip").unwrap();
        std::fs::write(root.join("blog/post.md"), "p").unwrap();

        let files = discover_markdown_files(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.md", "blog/post.md", "zeta.md"]);
    }
}
