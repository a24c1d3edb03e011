//! Post inspection, mutation, and the listing page body.
//!
//! A post is a source document whose path matches the configured pattern. Its
//! title and summary are pulled straight out of the document tree, its date
//! comes from an optional sidecar metadata file, and all posts together feed
//! the generated listing page.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pulldown_cmark::HeadingLevel;
use serde::Deserialize;

use super::tree::Node;

/// RFC 1123 rendering of post dates; metadata timestamps are UTC.
const POSTED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Extension appended to the source's stem to address the sidecar file.
const METADATA_EXTENSION: &str = "meta.json";

/// A post record derived from a classified source file.
#[derive(Debug, Clone)]
pub struct Post {
    /// Literal text of the first level-1 heading; empty when none exists.
    pub title: String,
    /// Literal text of the first paragraph in document order; empty when
    /// none exists.
    pub summary: String,
    /// Site-relative URL of the rendered page.
    pub url: String,
    /// Sidecar metadata; `None` when no sidecar file exists.
    pub metadata: Option<PostMetadata>,
}

/// Dates stored next to a post in its sidecar file.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMetadata {
    pub posted: DateTime<Utc>,
    #[serde(default)]
    pub edited: Vec<DateTime<Utc>>,
}

#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("failed to read metadata file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed metadata file {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Extract a post's title and summary from its document tree.
///
/// One pre-order depth-first walk. The title is the literal text of the first
/// level-1 heading; later level-1 headings are ignored and finding one does
/// not stop the walk. The summary is the literal text of the first paragraph
/// encountered anywhere, including nested inside list items, and finding it
/// terminates the walk immediately whether or not a title was found.
pub fn extract_post_fields(tree: &Node) -> (String, String) {
    let mut title = String::new();
    let mut summary = String::new();
    visit(tree, &mut title, &mut summary);
    (title, summary)
}

fn visit(node: &Node, title: &mut String, summary: &mut String) -> bool {
    match node {
        Node::Heading {
            level: HeadingLevel::H1,
            ..
        } if title.is_empty() => *title = node.literal_text(),
        Node::Paragraph(_) => {
            *summary = node.literal_text();
            return true;
        }
        _ => {}
    }
    node.children()
        .iter()
        .any(|child| visit(child, title, summary))
}

/// Append the date footer to a post's document tree, in place.
///
/// Adds two top-level children: a rule, then a paragraph holding
/// `"Posted: <date>"`. Must run after inspection and before HTML rendering.
pub fn append_date_footer(tree: &mut Node, posted: DateTime<Utc>) {
    if let Node::Document(children) = tree {
        let footer = format!("Posted: {}", posted.format(POSTED_DATE_FORMAT));
        children.push(Node::Rule);
        children.push(Node::Paragraph(vec![Node::Text(footer)]));
    }
}

/// Read the sidecar metadata for a source file, if it has one.
///
/// The sidecar lives next to the source with the Markdown extension replaced
/// by `.meta.json`. A missing sidecar is the documented no-metadata case and
/// returns `Ok(None)`; an unreadable or malformed one is an error.
pub fn read_post_metadata(source: &Path) -> Result<Option<PostMetadata>, MetadataError> {
    let sidecar = source.with_extension(METADATA_EXTENSION);
    if !sidecar.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&sidecar).map_err(|source| MetadataError::Read {
        path: sidecar.clone(),
        source,
    })?;
    let metadata = serde_json::from_str(&raw).map_err(|source| MetadataError::Decode {
        path: sidecar,
        source,
    })?;
    Ok(Some(metadata))
}

/// Synthesize the Markdown body of the post listing page.
///
/// One zero-indexed ordered-list entry per post, in collection order, each
/// followed by an indented sub-item carrying the summary.
pub fn listing_markdown(posts: &[Post]) -> String {
    let mut body = String::new();
    for (idx, post) in posts.iter().enumerate() {
        let _ = writeln!(body, "{}. [{}]({})", idx, post.title, post.url);
        let _ = writeln!(body, "    - {}", post.summary);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::tree::parse;
    use chrono::TimeZone;

    #[test]
    fn test_extract_title_and_summary() {
        let tree = parse("# Title\n\nSummary text.\n");
        assert_eq!(
            extract_post_fields(&tree),
            ("Title".to_string(), "Summary text.".to_string())
        );
    }

    #[test]
    fn test_extract_without_level_one_heading() {
        let tree = parse("## Only a subheading\n\nBody here.\n");
        let (title, summary) = extract_post_fields(&tree);
        assert_eq!(title, "");
        assert_eq!(summary, "Body here.");
    }

    #[test]
    fn test_extract_without_paragraph() {
        let tree = parse("# Just a heading\n");
        let (title, summary) = extract_post_fields(&tree);
        assert_eq!(title, "Just a heading");
        assert_eq!(summary, "");
    }

    #[test]
    fn test_first_level_one_heading_wins() {
        let tree = parse("# First\n\n# Second\n\nBody.\n");
        let (title, _) = extract_post_fields(&tree);
        assert_eq!(title, "First");
    }

    #[test]
    fn test_summary_found_inside_list_item() {
        // A loose list wraps item content in paragraphs, so the first
        // paragraph in document order sits inside the first item.
        let tree = parse("# T\n\n- nested summary\n\n- second item\n");
        let (title, summary) = extract_post_fields(&tree);
        assert_eq!(title, "T");
        assert_eq!(summary, "nested summary");
    }

    #[test]
    fn test_paragraph_terminates_walk_before_heading() {
        // The walk stops at the first paragraph even when a level-1 heading
        // follows it, leaving the title empty.
        let tree = parse("Leading paragraph.\n\n# Late Title\n");
        let (title, summary) = extract_post_fields(&tree);
        assert_eq!(title, "");
        assert_eq!(summary, "Leading paragraph.");
    }

    #[test]
    fn test_append_date_footer() {
        let mut tree = parse("# Post\n\nBody.\n");
        let before = tree.children().len();
        let posted = Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap();
        append_date_footer(&mut tree, posted);

        let children = tree.children();
        assert_eq!(children.len(), before + 2);
        assert!(matches!(children[children.len() - 2], Node::Rule));
        let footer = &children[children.len() - 1];
        assert!(matches!(footer, Node::Paragraph(_)));
        assert_eq!(footer.literal_text(), "Posted: Sun, 01 Jan 2023 10:00:00 GMT");
    }

    #[test]
    fn test_listing_markdown_exact_body() {
        let posts = vec![
            Post {
                title: "A".into(),
                summary: "sa".into(),
                url: "a.html".into(),
                metadata: None,
            },
            Post {
                title: "B".into(),
                summary: "sb".into(),
                url: "b.html".into(),
                metadata: None,
            },
        ];
        assert_eq!(
            listing_markdown(&posts),
            "0. [A](a.html)\n    - sa\n1. [B](b.html)\n    - sb\n"
        );
    }

    #[test]
    fn test_read_post_metadata_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("20230101-hello.md");
        std::fs::write(&source, "# Hello\n").unwrap();
        assert!(read_post_metadata(&source).unwrap().is_none());
    }

    #[test]
    fn test_read_post_metadata_decodes_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("20230101-hello.md");
        std::fs::write(
            dir.path().join("20230101-hello.meta.json"),
            r#"{"posted": "2023-01-01T10:00:00Z", "edited": ["2023-01-02T09:30:00Z"]}"#,
        )
        .unwrap();

        let metadata = read_post_metadata(&source).unwrap().unwrap();
        assert_eq!(
            metadata.posted,
            Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(metadata.edited.len(), 1);
    }

    #[test]
    fn test_read_post_metadata_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("20230101-hello.md");
        std::fs::write(dir.path().join("20230101-hello.meta.json"), "{not json").unwrap();
        assert!(matches!(
            read_post_metadata(&source),
            Err(MetadataError::Decode { .. })
        ));
    }
}
