use clap::Parser;

use mdsite::commands;

/// Render a Markdown source tree into a templated HTML site.
///
/// The run is entirely config-driven; the only flag is `--version`.
#[derive(Parser)]
#[command(version = version())]
struct Args {}

/// Version string, extended with the build commit when one was baked in at
/// compile time.
fn version() -> &'static str {
    match option_env!("BUILD_COMMIT") {
        Some(commit) => {
            Box::leak(format!("{} ({})", env!("CARGO_PKG_VERSION"), commit).into_boxed_str())
        }
        None => env!("CARGO_PKG_VERSION"),
    }
}

fn main() -> Result<(), anyhow::Error> {
    let _args = Args::parse();
    commands::build::run()
}
