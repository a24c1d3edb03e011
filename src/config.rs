//! Site configuration loading and defaults.
//!
//! Configuration comes from an optional `config.*` file in the working
//! directory (any format the `config` crate understands). A missing file is
//! not an error (every field has a default), but a malformed file or an
//! unknown field aborts the run before any rendering starts.

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),
}

/// The site configuration driving a full run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name substituted into the page template, pre-escaped HTML.
    pub site_name: String,
    /// Root of the Markdown source tree.
    pub source_path: String,
    /// Root of the generated HTML tree.
    pub destination_path: String,
    /// Path to the page template file.
    pub template_file: String,
    /// Directory copied verbatim under the destination root.
    pub resource_path: String,
    /// Regular expression classifying source paths as posts.
    pub post_pattern: String,
}

impl SiteConfig {
    /// Load the configuration from `config.*` in the working directory,
    /// falling back to defaults when the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load the configuration from the named file (extension resolved by the
    /// `config` crate), falling back to defaults when it is absent.
    pub fn load_from(name: &str) -> Result<Self, ConfigError> {
        Ok(config::Config::builder()
            .set_default("site_name", "")?
            .set_default("source_path", "pages-md")?
            .set_default("destination_path", "html")?
            .set_default("template_file", "templates/template.html")?
            .set_default("resource_path", "res")?
            .set_default("post_pattern", "[0-9]{8}-.*")?
            .add_source(config::File::with_name(name).required(false))
            .build()?
            .try_deserialize()?)
    }
}
