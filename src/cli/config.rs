//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliLanguage};
use crate::config::{AdultReportPolicy, AnalysisConfig, Locale, ServiceSettings};
use crate::error::VisionError;
use anyhow::{Context, Result};
use std::time::Duration;

/// Convert CLI arguments to `AnalysisConfig` and `ServiceSettings`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `AnalysisConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<AnalysisConfig> {
        let locale = match cli.lang {
            CliLanguage::Sv => Locale::Swedish,
            CliLanguage::En => Locale::English,
        };

        let adult_policy = if cli.adult_with_objects {
            AdultReportPolicy::WithObjects
        } else {
            AdultReportPolicy::Always
        };

        let config = AnalysisConfig::builder()
            .output_dir(cli.output_dir.clone())
            .locale(locale)
            .adult_policy(adult_policy)
            .jpeg_quality(cli.jpeg_quality)
            .service_language(cli.service_language.clone())
            .request_timeout(Duration::from_secs(cli.timeout))
            .build()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Load credentials from the settings file named on the command line
    pub(crate) fn load_settings(cli: &Cli) -> Result<ServiceSettings> {
        ServiceSettings::load(&cli.settings).with_context(|| {
            format!(
                "Failed to load service settings from '{}'",
                cli.settings.display()
            )
        })
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            return Err(VisionError::config_value_error(
                "JPEG quality",
                cli.jpeg_quality,
                "0-100",
                Some(90),
            ))
            .context("Invalid quality settings");
        }

        if cli.timeout == 0 {
            anyhow::bail!("Timeout must be at least one second");
        }

        if let Some(url) = &cli.url {
            if url.trim().is_empty() {
                anyhow::bail!("Image URL must not be empty");
            }
        }

        Ok(())
    }
}
