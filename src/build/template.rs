//! Page template rendering.
//!
//! Every rendered page is an HTML fragment wrapped in a single page template
//! loaded once per run. The template sees exactly three fields (`site_name`,
//! `body`, `rel_root`), substituted raw: the caller supplies pre-rendered
//! HTML, so autoescaping is disabled. Template correctness is a precondition
//! of the whole run, not a per-file concern; any template failure is fatal.

use std::path::{Path, PathBuf};

use tera::{Context, Tera};

/// Name the page template is registered under.
const PAGE_TEMPLATE: &str = "page";

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// The fields a page template can reference.
///
/// One instance is reused across the render loop: the site name is fixed for
/// the run while `body` and `rel_root` are replaced per file.
#[derive(Debug)]
pub struct TemplateData {
    /// Pre-escaped HTML fragment naming the site.
    pub site_name: String,
    /// Pre-escaped HTML fragment with the page body.
    pub body: String,
    /// Relative path prefix pointing back at the destination root.
    pub rel_root: String,
}

/// The page template, wrapping Tera.
pub struct PageTemplate {
    tera: Tera,
}

impl PageTemplate {
    /// Load and compile the page template from a file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tera = Tera::default();
        // Fields are pre-rendered HTML and trusted verbatim.
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(PAGE_TEMPLATE, &source)?;
        Ok(Self { tera })
    }

    /// Render a full page from the template and the given data.
    pub fn render_page(&self, data: &TemplateData) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("site_name", &data.site_name);
        context.insert("body", &data.body);
        context.insert("rel_root", &data.rel_root);
        Ok(self.tera.render(PAGE_TEMPLATE, &context)?)
    }
}
