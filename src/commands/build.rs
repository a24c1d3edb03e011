use crate::build::{Builder, copy_resources, create_output_dirs};
use crate::config::SiteConfig;

/// Run a full site build: load config, create the output directories,
/// render every page, then copy resources.
pub fn run() -> Result<(), anyhow::Error> {
    let config = SiteConfig::load()?;
    create_output_dirs(&config)?;

    let builder = Builder::new(config.clone());
    builder.build()?;

    copy_resources(&config)?;

    Ok(())
}
