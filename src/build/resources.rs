//! Output directory creation and resource copying.

use std::path::Path;

use walkdir::WalkDir;

use super::builder::BuildError;
use crate::config::SiteConfig;

/// Create the destination root plus the `images` and `res` directories the
/// site expects to exist, whether or not anything is copied into them.
pub fn create_output_dirs(config: &SiteConfig) -> std::io::Result<()> {
    let dest_root = Path::new(&config.destination_path);
    std::fs::create_dir_all(dest_root)?;
    std::fs::create_dir_all(dest_root.join("images"))?;
    std::fs::create_dir_all(dest_root.join("res"))?;
    Ok(())
}

/// Copy the resource tree under the destination root.
///
/// Every directory and regular file under the resource path is mirrored at
/// the destination root joined with its walked path, so `res/style.css`
/// lands at `<dest>/res/style.css`. Returns the number of files copied.
pub fn copy_resources(config: &SiteConfig) -> Result<usize, BuildError> {
    println!(":: Copying resources");
    let dest_root = Path::new(&config.destination_path);
    let mut copied = 0;

    for entry in WalkDir::new(&config.resource_path).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix("/").unwrap_or(entry.path());
        let target = dest_root.join(relative);

        if entry.file_type().is_dir() {
            println!("   Creating directory {}", target.display());
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            println!("   {} -> {}", entry.path().display(), target.display());
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    println!("== Done ==");
    Ok(copied)
}
