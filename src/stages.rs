//! The analysis and thumbnail stages
//!
//! Both stages receive the service and the image source explicitly. The
//! analysis stage propagates every failure; the thumbnail stage has a
//! reporting wrapper ([`thumbnail_stage`]) that prints the failure and lets
//! the run continue.

use crate::annotate::{annotate_objects, AnnotationStyle};
use crate::client::{ImageSource, VisionService};
use crate::config::{AdultReportPolicy, AnalysisConfig};
use crate::error::Result;
use crate::models::{AnalysisResult, ThumbnailRequest, VisualFeature};
use crate::report::ReportWriter;
use crate::services::ImageIOService;
use std::io::Write;
use std::path::PathBuf;

/// What the analysis stage produced
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    /// Path of `objects.jpg` when at least one object was detected
    pub annotated_path: Option<PathBuf>,
    /// Whether the adult-content block was written
    pub adult_reported: bool,
}

/// Fetch `url`, analyze it, write the report and annotate detected objects.
///
/// # Errors
/// - Image fetch, service call or response decoding fails
/// - The image cannot be decoded or `objects.jpg` cannot be written
/// - Writing the report fails
pub async fn analyze_image<S, I, W>(
    service: &S,
    source: &I,
    url: &str,
    config: &AnalysisConfig,
    report: &mut ReportWriter<W>,
) -> Result<AnalysisOutcome>
where
    S: VisionService + ?Sized,
    I: ImageSource + ?Sized,
    W: Write,
{
    report.analyzing(url)?;

    let image_bytes = source.fetch(url).await?;
    let result = service
        .analyze_image(image_bytes.clone(), &VisualFeature::ALL)
        .await?;

    report.captions(&result)?;
    report.tags(&result)?;
    report.categories(&result)?;
    report.landmarks(&result.landmarks())?;
    report.brands(&result)?;

    let annotated_path = if result.objects.is_empty() {
        None
    } else {
        report.objects(&result.objects)?;

        let image = ImageIOService::decode_image(&image_bytes)?;
        let annotated = annotate_objects(&image, &result.objects, &AnnotationStyle::default());

        let path = config.objects_path();
        ImageIOService::save_jpeg(&annotated, &path, config.jpeg_quality)?;
        tracing::info!(path = %path.display(), objects = result.objects.len(), "annotated image saved");
        report.objects_saved(&path)?;
        Some(path)
    };

    let adult_reported = match config.adult_policy {
        AdultReportPolicy::Always => true,
        AdultReportPolicy::WithObjects => annotated_path.is_some(),
    };
    if adult_reported {
        report.adult_content(&result.adult)?;
    }

    Ok(AnalysisOutcome {
        result,
        annotated_path,
        adult_reported,
    })
}

/// Fetch `url` again, request a thumbnail and stream it into `thumbnail.jpg`.
///
/// # Errors
/// - Image fetch or service call fails (including rejected dimensions)
/// - The thumbnail file cannot be written
pub async fn generate_thumbnail<S, I>(
    service: &S,
    source: &I,
    url: &str,
    request: ThumbnailRequest,
    config: &AnalysisConfig,
) -> Result<PathBuf>
where
    S: VisionService + ?Sized,
    I: ImageSource + ?Sized,
{
    let image_bytes = source.fetch(url).await?;
    let mut stream = service.generate_thumbnail(request, image_bytes).await?;

    let path = config.thumbnail_path();
    let written = ImageIOService::write_stream(&mut stream, &path).await?;
    tracing::info!(
        path = %path.display(),
        bytes = written,
        width = request.width,
        height = request.height,
        "thumbnail saved"
    );
    Ok(path)
}

/// Run [`generate_thumbnail`] and report the outcome.
///
/// A failed thumbnail is printed and swallowed: the returned `Ok(None)` lets
/// the caller carry on. Only a failure to write the report itself is an error.
///
/// # Errors
/// - Writing to the report fails
pub async fn thumbnail_stage<S, I, W>(
    service: &S,
    source: &I,
    url: &str,
    request: ThumbnailRequest,
    config: &AnalysisConfig,
    report: &mut ReportWriter<W>,
) -> Result<Option<PathBuf>>
where
    S: VisionService + ?Sized,
    I: ImageSource + ?Sized,
    W: Write,
{
    match generate_thumbnail(service, source, url, request, config).await {
        Ok(path) => {
            report.thumbnail_saved(&path)?;
            Ok(Some(path))
        },
        Err(e) => {
            tracing::warn!(error = %e, "thumbnail generation failed");
            report.error(&e.to_string())?;
            Ok(None)
        },
    }
}
