//! Configuration types for image analysis runs

use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file key holding the service endpoint
pub const ENDPOINT_KEY: &str = "CognitiveServicesEndpoint";
/// Settings file key holding the subscription key
pub const API_KEY_KEY: &str = "CognitiveServiceKey";

/// Environment variable overriding the endpoint from the settings file
pub const ENDPOINT_ENV: &str = "VISION_ENDPOINT";
/// Environment variable overriding the key from the settings file
pub const API_KEY_ENV: &str = "VISION_KEY";

/// Default settings file, looked up relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// File name of the annotated copy of the analyzed image
pub const OBJECTS_FILE_NAME: &str = "objects.jpg";
/// File name of the generated thumbnail
pub const THUMBNAIL_FILE_NAME: &str = "thumbnail.jpg";

/// Credentials for the vision service
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub api_key: String,
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ServiceSettings {
    /// Create settings from explicit values
    pub fn new<E: Into<String>, K: Into<String>>(endpoint: E, api_key: K) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Load settings from a JSON file, then apply environment overrides.
    ///
    /// A missing file is tolerated only when both environment variables are set.
    ///
    /// # Errors
    /// - The file exists but cannot be read or is not valid JSON
    /// - Either value is missing or empty after overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let env_endpoint = non_empty_env(ENDPOINT_ENV);
        let env_key = non_empty_env(API_KEY_ENV);

        let document = match std::fs::read_to_string(path) {
            Ok(content) => Some(serde_json::from_str::<serde_json::Value>(&content).map_err(
                |e| VisionError::config(format!("Failed to parse '{}': {}", path.display(), e)),
            )?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound
                && env_endpoint.is_some()
                && env_key.is_some() =>
            {
                tracing::debug!(path = %path.display(), "settings file missing, using environment");
                None
            },
            Err(e) => return Err(VisionError::file_io_error("read settings file", path, &e)),
        };

        Self::resolve(document.as_ref(), env_endpoint, env_key, &path.display().to_string())
    }

    /// Load settings from a JSON file without environment overrides.
    ///
    /// # Errors
    /// - The file cannot be read or is not valid JSON
    /// - Either key is missing or empty
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| VisionError::file_io_error("read settings file", path, &e))?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Parse settings from JSON text; `source` names the origin in error messages.
    ///
    /// # Errors
    /// - Invalid JSON
    /// - Either key is missing or empty
    pub fn from_json_str(content: &str, source: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| VisionError::config(format!("Failed to parse '{}': {}", source, e)))?;
        Self::resolve(Some(&document), None, None, source)
    }

    fn resolve(
        document: Option<&serde_json::Value>,
        env_endpoint: Option<String>,
        env_key: Option<String>,
        source: &str,
    ) -> Result<Self> {
        let lookup = |key: &str| {
            document
                .and_then(|doc| doc.get(key))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };

        let endpoint = env_endpoint
            .or_else(|| lookup(ENDPOINT_KEY))
            .ok_or_else(|| VisionError::missing_setting(ENDPOINT_KEY, source))?;
        let api_key = env_key
            .or_else(|| lookup(API_KEY_KEY))
            .ok_or_else(|| VisionError::missing_setting(API_KEY_KEY, source))?;

        Ok(Self { endpoint, api_key })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Language of the console report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Swedish labels, `92,35 %` percentages
    #[default]
    Swedish,
    /// English labels, `92.35%` percentages
    English,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Swedish => write!(f, "sv"),
            Self::English => write!(f, "en"),
        }
    }
}

/// When the adult-content block is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdultReportPolicy {
    /// Whenever the analysis succeeds
    #[default]
    Always,
    /// Only when at least one object was detected
    WithObjects,
}

/// Options for one analysis + thumbnail run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directory receiving `objects.jpg` and `thumbnail.jpg`
    pub output_dir: PathBuf,

    /// Report language
    pub locale: Locale,

    /// Adult-content block gating
    pub adult_policy: AdultReportPolicy,

    /// JPEG quality for the annotated image (0-100)
    pub jpeg_quality: u8,

    /// Optional `language` query parameter sent to the analyze endpoint
    pub service_language: Option<String>,

    /// Timeout applied to every HTTP request
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            locale: Locale::default(),
            adult_policy: AdultReportPolicy::default(),
            jpeg_quality: 90,
            service_language: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Path of the annotated image
    #[must_use]
    pub fn objects_path(&self) -> PathBuf {
        self.output_dir.join(OBJECTS_FILE_NAME)
    }

    /// Path of the thumbnail
    #[must_use]
    pub fn thumbnail_path(&self) -> PathBuf {
        self.output_dir.join(THUMBNAIL_FILE_NAME)
    }

    /// Validate configuration parameters
    ///
    /// # Errors
    /// - JPEG quality outside 0-100
    /// - Zero request timeout
    /// - Empty output directory
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality > 100 {
            return Err(VisionError::config_value_error(
                "JPEG quality",
                self.jpeg_quality,
                "0-100",
                Some(90),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(VisionError::config("Request timeout must be greater than zero"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(VisionError::config("Output directory must not be empty"));
        }

        Ok(())
    }
}

/// Builder for `AnalysisConfig`
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set output directory
    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set report locale
    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    /// Set adult-content gating
    #[must_use]
    pub fn adult_policy(mut self, policy: AdultReportPolicy) -> Self {
        self.config.adult_policy = policy;
        self
    }

    /// Set JPEG quality
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Set the analyze endpoint's `language` parameter
    #[must_use]
    pub fn service_language<S: Into<String>>(mut self, language: Option<S>) -> Self {
        self.config.service_language = language.map(Into::into);
        self
    }

    /// Set HTTP request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Configuration validation failures
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
