//! The parsed document tree.
//!
//! Markdown sources are parsed into a `Node` tree that the rest of the build
//! can inspect (title/summary extraction) and mutate (date footer injection)
//! before it is serialized to HTML. The tree is built from and converted back
//! to a pulldown-cmark event stream, so parsing stays permissive: any byte
//! sequence yields a best-effort tree, never an error.

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag};

/// A node in the document tree.
///
/// Container variants hold an ordered child sequence; leaf variants hold
/// literal content and have no children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The document root.
    Document(Vec<Node>),
    /// A heading with its level and auto-derived identifier.
    Heading {
        level: HeadingLevel,
        id: Option<String>,
        children: Vec<Node>,
    },
    Paragraph(Vec<Node>),
    BlockQuote(Vec<Node>),
    /// A list; `start` is the first number of an ordered list, `None` for
    /// unordered lists.
    List { start: Option<u64>, children: Vec<Node> },
    Item(Vec<Node>),
    /// A fenced or indented code block; `info` is the fence info string,
    /// `None` for indented blocks.
    CodeBlock { info: Option<String>, literal: String },
    HtmlBlock(String),
    /// A thematic break.
    Rule,
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    Link {
        link_type: LinkType,
        dest: String,
        title: String,
        children: Vec<Node>,
    },
    Image {
        link_type: LinkType,
        dest: String,
        title: String,
        children: Vec<Node>,
    },
    Text(String),
    Code(String),
    InlineHtml(String),
    SoftBreak,
    HardBreak,
}

impl Node {
    /// The node's ordered children; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(children)
            | Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::BlockQuote(children)
            | Node::List { children, .. }
            | Node::Item(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Strikethrough(children)
            | Node::Link { children, .. }
            | Node::Image { children, .. } => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document(children)
            | Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::BlockQuote(children)
            | Node::List { children, .. }
            | Node::Item(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Strikethrough(children)
            | Node::Link { children, .. }
            | Node::Image { children, .. } => Some(children),
            _ => None,
        }
    }

    fn push_child(&mut self, child: Node) {
        self.children_mut()
            .expect("leaf node cannot hold children")
            .push(child);
    }

    /// Concatenated literal text of all leaf descendants, in child order,
    /// with no added separators. Soft and hard breaks contribute a newline.
    pub fn literal_text(&self) -> String {
        let mut text = String::new();
        self.collect_literals(&mut text);
        text
    }

    fn collect_literals(&self, out: &mut String) {
        match self {
            Node::Text(literal) | Node::Code(literal) | Node::InlineHtml(literal) => {
                out.push_str(literal);
            }
            Node::CodeBlock { literal, .. } | Node::HtmlBlock(literal) => out.push_str(literal),
            Node::SoftBreak | Node::HardBreak => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_literals(out);
                }
            }
        }
    }

    /// Serialize the tree back into a pulldown-cmark event stream.
    pub fn to_events(&self) -> Vec<Event<'_>> {
        let mut events = Vec::new();
        self.push_events(&mut events);
        events
    }

    fn push_events<'a>(&'a self, events: &mut Vec<Event<'a>>) {
        match self {
            Node::Document(children) => {
                for child in children {
                    child.push_events(events);
                }
            }
            Node::Heading { level, id, children } => {
                let tag = Tag::Heading {
                    level: *level,
                    id: id.as_deref().map(CowStr::Borrowed),
                    classes: Vec::new(),
                    attrs: Vec::new(),
                };
                self.push_container(tag, children, events);
            }
            Node::Paragraph(children) => self.push_container(Tag::Paragraph, children, events),
            Node::BlockQuote(children) => {
                self.push_container(Tag::BlockQuote(None), children, events);
            }
            Node::List { start, children } => {
                self.push_container(Tag::List(*start), children, events);
            }
            Node::Item(children) => self.push_container(Tag::Item, children, events),
            Node::CodeBlock { info, literal } => {
                let kind = match info {
                    Some(info) => CodeBlockKind::Fenced(CowStr::Borrowed(info)),
                    None => CodeBlockKind::Indented,
                };
                let tag = Tag::CodeBlock(kind);
                let end = tag.to_end();
                events.push(Event::Start(tag));
                events.push(Event::Text(CowStr::Borrowed(literal)));
                events.push(Event::End(end));
            }
            Node::HtmlBlock(html) => {
                let tag = Tag::HtmlBlock;
                let end = tag.to_end();
                events.push(Event::Start(tag));
                events.push(Event::Html(CowStr::Borrowed(html)));
                events.push(Event::End(end));
            }
            Node::Rule => events.push(Event::Rule),
            Node::Emphasis(children) => self.push_container(Tag::Emphasis, children, events),
            Node::Strong(children) => self.push_container(Tag::Strong, children, events),
            Node::Strikethrough(children) => {
                self.push_container(Tag::Strikethrough, children, events);
            }
            Node::Link { link_type, dest, title, children } => {
                let tag = Tag::Link {
                    link_type: *link_type,
                    dest_url: CowStr::Borrowed(dest),
                    title: CowStr::Borrowed(title),
                    id: CowStr::Borrowed(""),
                };
                self.push_container(tag, children, events);
            }
            Node::Image { link_type, dest, title, children } => {
                let tag = Tag::Image {
                    link_type: *link_type,
                    dest_url: CowStr::Borrowed(dest),
                    title: CowStr::Borrowed(title),
                    id: CowStr::Borrowed(""),
                };
                self.push_container(tag, children, events);
            }
            Node::Text(text) => events.push(Event::Text(CowStr::Borrowed(text))),
            Node::Code(code) => events.push(Event::Code(CowStr::Borrowed(code))),
            Node::InlineHtml(html) => events.push(Event::InlineHtml(CowStr::Borrowed(html))),
            Node::SoftBreak => events.push(Event::SoftBreak),
            Node::HardBreak => events.push(Event::HardBreak),
        }
    }

    fn push_container<'a>(
        &'a self,
        tag: Tag<'a>,
        children: &'a [Node],
        events: &mut Vec<Event<'a>>,
    ) {
        let end = tag.to_end();
        events.push(Event::Start(tag));
        for child in children {
            child.push_events(events);
        }
        events.push(Event::End(end));
    }
}

/// Parse a Markdown source into a document tree.
///
/// A fresh parser is constructed per call so extension state cannot leak
/// between documents. Heading identifiers are derived from the heading text
/// and deduplicated in document order.
pub fn parse(source: &str) -> Node {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH);
    let mut stack = vec![Node::Document(Vec::new())];
    // Depth of containers we do not model (extension-gated tags); their
    // events are dropped wholesale.
    let mut skip_depth = 0usize;

    for event in parser {
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(tag) => match open_node(tag) {
                Some(node) => stack.push(node),
                None => skip_depth = 1,
            },
            Event::End(_) => {
                let node = stack.pop().expect("unbalanced event stream");
                stack
                    .last_mut()
                    .expect("document root closed")
                    .push_child(node);
            }
            Event::Text(text) => match stack.last_mut() {
                Some(Node::CodeBlock { literal, .. }) => literal.push_str(&text),
                Some(parent) => parent.push_child(Node::Text(text.into_string())),
                None => unreachable!("empty node stack"),
            },
            Event::Code(code) => top(&mut stack).push_child(Node::Code(code.into_string())),
            Event::Html(html) => match stack.last_mut() {
                Some(Node::HtmlBlock(literal)) => literal.push_str(&html),
                Some(parent) => parent.push_child(Node::HtmlBlock(html.into_string())),
                None => unreachable!("empty node stack"),
            },
            Event::InlineHtml(html) => {
                top(&mut stack).push_child(Node::InlineHtml(html.into_string()));
            }
            Event::SoftBreak => top(&mut stack).push_child(Node::SoftBreak),
            Event::HardBreak => top(&mut stack).push_child(Node::HardBreak),
            Event::Rule => top(&mut stack).push_child(Node::Rule),
            // Gated behind extensions we do not enable.
            _ => {}
        }
    }

    let mut root = stack.pop().expect("document root missing");
    let mut used_ids = HashSet::new();
    assign_heading_ids(&mut root, &mut used_ids);
    root
}

fn top<'a>(stack: &'a mut [Node]) -> &'a mut Node {
    stack.last_mut().expect("empty node stack")
}

/// Map a start tag to an open container node, or `None` for tags outside the
/// modeled set.
fn open_node(tag: Tag<'_>) -> Option<Node> {
    let node = match tag {
        Tag::Paragraph => Node::Paragraph(Vec::new()),
        Tag::Heading { level, id, .. } => Node::Heading {
            level,
            id: id.map(|id| id.into_string()),
            children: Vec::new(),
        },
        Tag::BlockQuote(_) => Node::BlockQuote(Vec::new()),
        Tag::CodeBlock(kind) => Node::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => Some(info.into_string()),
                CodeBlockKind::Indented => None,
            },
            literal: String::new(),
        },
        Tag::HtmlBlock => Node::HtmlBlock(String::new()),
        Tag::List(start) => Node::List {
            start,
            children: Vec::new(),
        },
        Tag::Item => Node::Item(Vec::new()),
        Tag::Emphasis => Node::Emphasis(Vec::new()),
        Tag::Strong => Node::Strong(Vec::new()),
        Tag::Strikethrough => Node::Strikethrough(Vec::new()),
        Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        } => Node::Link {
            link_type,
            dest: dest_url.into_string(),
            title: title.into_string(),
            children: Vec::new(),
        },
        Tag::Image {
            link_type,
            dest_url,
            title,
            ..
        } => Node::Image {
            link_type,
            dest: dest_url.into_string(),
            title: title.into_string(),
            children: Vec::new(),
        },
        _ => return None,
    };
    Some(node)
}

/// Assign slug identifiers to headings that do not already carry one,
/// deduplicating in document order with a numeric suffix.
fn assign_heading_ids(node: &mut Node, used: &mut HashSet<String>) {
    if matches!(node, Node::Heading { id: None, .. }) {
        let base = slugify(&node.literal_text());
        let mut candidate = base.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        used.insert(candidate.clone());
        if let Node::Heading { id, .. } = node {
            *id = Some(candidate);
        }
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            assign_heading_ids(child, used);
        }
    }
}

/// Convert a string to a slug suitable for use as an HTML id.
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
    }

    #[test]
    fn test_parse_basic_structure() {
        let tree = parse("# Hello\n\nWorld");
        let Node::Document(children) = &tree else {
            panic!("root is not a document");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(
            children[0],
            Node::Heading {
                level: HeadingLevel::H1,
                ..
            }
        ));
        assert!(matches!(children[1], Node::Paragraph(_)));
    }

    #[test]
    fn test_parse_is_pure() {
        let source = "# Title\n\nSome *emphasis* and a [link](x.html).\n";
        assert_eq!(parse(source), parse(source));
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let tree = parse("# Setup\n\n## Setup\n");
        let ids: Vec<_> = tree
            .children()
            .iter()
            .filter_map(|node| match node {
                Node::Heading { id, .. } => id.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["setup".to_string(), "setup-1".to_string()]);
    }

    #[test]
    fn test_literal_text_concatenates_leaves() {
        let tree = parse("# A `b` *c*\n");
        let heading = &tree.children()[0];
        assert_eq!(heading.literal_text(), "A b c");
    }

    #[test]
    fn test_literal_text_keeps_soft_breaks() {
        let tree = parse("line one\nline two\n");
        let paragraph = &tree.children()[0];
        assert_eq!(paragraph.literal_text(), "line one\nline two");
    }

    #[test]
    fn test_malformed_input_still_parses() {
        // Arbitrary bytes produce a best-effort tree, never an error.
        let tree = parse("[unclosed link\n\n``` \x00\nraw");
        assert!(matches!(tree, Node::Document(_)));
    }

    #[test]
    fn test_nested_list_structure() {
        let tree = parse("1. first\n    - sub\n");
        let Node::List { start, children } = &tree.children()[0] else {
            panic!("expected ordered list");
        };
        assert_eq!(*start, Some(1));
        let item = &children[0];
        assert!(matches!(item, Node::Item(_)));
        assert!(
            item.children()
                .iter()
                .any(|node| matches!(node, Node::List { start: None, .. }))
        );
    }
}
