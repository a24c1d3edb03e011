//! HTML serialization of the document tree.

use pulldown_cmark::html;

use super::tree::Node;

/// Render a document tree to an HTML fragment.
///
/// The output carries no `<html>`/`<body>` wrapper; wrapping the fragment in
/// a full page is the template's job. Literal text is escaped for HTML
/// context by the writer, and heading identifiers come out as `id`
/// attributes.
pub fn render_html(tree: &Node) -> String {
    let mut output = String::new();
    html::push_html(&mut output, tree.to_events().into_iter());
    output
}
