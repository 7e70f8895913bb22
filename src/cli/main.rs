//! Image analysis CLI tool
//!
//! Analyzes an image by URL, saves an annotated copy and a smart-cropped thumbnail.

use super::config::CliConfigBuilder;
use super::progress::SpinnerService;
use crate::{
    client::{HttpImageSource, VisionClient},
    models::ThumbnailRequest,
    prompt::{prompt_dimension, prompt_line},
    report::ReportWriter,
    stages::{analyze_image, thumbnail_stage},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Image analysis CLI tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "vision-analyze")]
pub struct Cli {
    /// Image URL to analyze (prompted for when omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// JSON settings file with CognitiveServicesEndpoint and CognitiveServiceKey
    #[arg(long, value_name = "PATH", default_value = crate::config::DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Directory for objects.jpg and thumbnail.jpg
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Thumbnail width (prompted for when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i32>,

    /// Thumbnail height (prompted for when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<i32>,

    /// Report language
    #[arg(long, value_enum, default_value_t = CliLanguage::Sv)]
    pub lang: CliLanguage,

    /// Language the service should answer in (for example en, es, ja)
    #[arg(long, value_name = "CODE")]
    pub service_language: Option<String>,

    /// Only print the sensitive-content ratings when objects were detected
    #[arg(long)]
    pub adult_with_objects: bool,

    /// JPEG quality for objects.jpg (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Skip the thumbnail stage
    #[arg(long)]
    pub skip_thumbnail: bool,

    /// Enable verbose logging on stderr (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliLanguage {
    /// Swedish
    Sv,
    /// English
    En,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::tracing_config::init_cli_tracing(cli.verbose)
        .context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;
    let settings = CliConfigBuilder::load_settings(&cli)?;

    info!(endpoint = %settings.endpoint, output_dir = %config.output_dir.display(), "starting image analysis");

    let client = VisionClient::new(&settings, config.request_timeout)
        .context("Failed to create vision client")?
        .with_language(config.service_language.clone());
    let service = SpinnerService::new(client);
    let source =
        HttpImageSource::new(config.request_timeout).context("Failed to create HTTP client")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut report = ReportWriter::new(io::stdout(), config.locale);

    let url = match &cli.url {
        Some(url) => url.clone(),
        None => {
            let prompt = report.labels().url_prompt;
            prompt_line(&mut input, &mut report, prompt).context("Failed to read image URL")?
        },
    };

    let start_time = Instant::now();
    let outcome = analyze_image(&service, &source, &url, &config, &mut report)
        .await
        .with_context(|| format!("Failed to analyze image '{}'", url))?;
    debug!(
        objects = outcome.result.objects.len(),
        annotated = outcome.annotated_path.is_some(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "analysis stage finished"
    );

    if cli.skip_thumbnail {
        info!("thumbnail stage skipped");
        return Ok(());
    }

    let request = read_thumbnail_request(&cli, &mut input, &mut report)?;
    thumbnail_stage(&service, &source, &url, request, &config, &mut report)
        .await
        .context("Failed to write report")?;

    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "done");
    Ok(())
}

/// Width and height from flags, prompting for whichever is missing
fn read_thumbnail_request<R, W>(
    cli: &Cli,
    input: &mut R,
    report: &mut ReportWriter<W>,
) -> Result<ThumbnailRequest>
where
    R: BufRead,
    W: Write,
{
    let labels = report.labels();
    if cli.width.is_none() || cli.height.is_none() {
        report.thumbnail_intro()?;
    }

    let width = match cli.width {
        Some(width) => width,
        None => prompt_dimension(input, report, labels.width_prompt)
            .context("Failed to read thumbnail width")?,
    };
    let height = match cli.height {
        Some(height) => height,
        None => prompt_dimension(input, report, labels.height_prompt)
            .context("Failed to read thumbnail height")?,
    };

    Ok(ThumbnailRequest::new(width, height))
}
