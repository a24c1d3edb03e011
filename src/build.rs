mod builder;
mod html;
mod paths;
mod post;
mod resources;
mod template;
mod tree;

pub use builder::{BuildError, BuildResult, Builder};
pub use post::{Post, PostMetadata};
pub use resources::{copy_resources, create_output_dirs};
