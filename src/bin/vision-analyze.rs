//! vision-analyze CLI tool
//!
//! Command-line interface for analyzing an image by URL with a cloud vision
//! service, annotating detected objects and saving a smart-cropped thumbnail.

#[cfg(feature = "cli")]
use vision_analyze::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
