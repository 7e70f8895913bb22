#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # vision-analyze
//!
//! Client library and CLI for a cloud image-analysis service (Computer Vision
//! REST API v3.2).
//!
//! An image is fetched by URL and sent to the service for captions, tags,
//! categories, brands, objects and adult-content ratings. The results are
//! written as a localized text report. Detected objects are outlined on a copy
//! of the image (`objects.jpg`), and a smart-cropped thumbnail is requested
//! separately (`thumbnail.jpg`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vision_analyze::{
//!     analyze_image, AnalysisConfig, HttpImageSource, ReportWriter, ServiceSettings,
//!     VisionClient,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = ServiceSettings::load("appsettings.json")?;
//! let config = AnalysisConfig::builder().output_dir("out").build()?;
//!
//! let client = VisionClient::new(&settings, config.request_timeout)?;
//! let source = HttpImageSource::new(config.request_timeout)?;
//! let mut report = ReportWriter::new(std::io::stdout(), config.locale);
//!
//! let outcome = analyze_image(
//!     &client,
//!     &source,
//!     "https://example.com/street.jpg",
//!     &config,
//!     &mut report,
//! )
//! .await?;
//! println!("{} objects", outcome.result.objects.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line interface, spinner and tracing subscriber
//! - `webp-support` (default): WebP input decoding for annotation
//! - `tracing-json`: JSON log output

pub mod annotate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod report;
pub mod services;
pub mod stages;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use annotate::{annotate_objects, AnnotationStyle};
pub use client::{ByteStream, HttpImageSource, ImageSource, VisionClient, VisionService};
pub use config::{AdultReportPolicy, AnalysisConfig, AnalysisConfigBuilder, Locale, ServiceSettings};
pub use error::{Result, VisionError};
pub use models::{
    AdultInfo, AnalysisResult, BoundingRect, Caption, Category, CategoryDetail, DetectedBrand,
    DetectedObject, ImageTag, Landmark, ThumbnailRequest, VisualFeature,
};
pub use report::{format_percent, Labels, ReportWriter};
pub use services::ImageIOService;
pub use stages::{analyze_image, generate_thumbnail, thumbnail_stage, AnalysisOutcome};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};
