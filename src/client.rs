//! Vision service client and image retrieval
//!
//! Both stages talk to the outside world only through the [`VisionService`] and
//! [`ImageSource`] traits, so the orchestration in [`crate::stages`] can run
//! against in-memory doubles.

use crate::config::ServiceSettings;
use crate::error::{Result, VisionError};
use crate::models::{AnalysisResult, ThumbnailRequest, VisualFeature};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::TryStreamExt;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

/// REST API version prefix
const API_PATH: &str = "vision/v3.2";

/// Header carrying the subscription key
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Streamed response body
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Remote image analysis capability
#[async_trait]
pub trait VisionService: Send + Sync {
    /// Analyze raw image bytes for the requested feature categories
    ///
    /// # Errors
    /// - Transport failures
    /// - Non-success status from the service
    /// - Undecodable response body
    async fn analyze_image(
        &self,
        image: Bytes,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult>;

    /// Produce a thumbnail of raw image bytes, streamed back
    ///
    /// # Errors
    /// - Transport failures
    /// - Non-success status from the service (including out-of-range dimensions)
    async fn generate_thumbnail(
        &self,
        request: ThumbnailRequest,
        image: Bytes,
    ) -> Result<ByteStream>;
}

/// Retrieval of image bytes by URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the full body behind `url`
    ///
    /// # Errors
    /// - Malformed URL or transport failures
    /// - Non-success HTTP status
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| VisionError::network_error("Failed to create HTTP client", &e))
}

/// Authenticated client for the Computer Vision REST API
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: Option<String>,
}

impl VisionClient {
    /// Create a client from service settings
    ///
    /// # Errors
    /// - Failed to create HTTP client
    pub fn new(settings: &ServiceSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: None,
        })
    }

    /// Ask the service for results in `language` (for example `en`, `es`)
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Endpoint without trailing slash
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}/{}", self.endpoint, API_PATH, operation)
    }

    async fn post_image(
        &self,
        operation: &str,
        query: &[(&str, String)],
        image: Bytes,
    ) -> Result<Response> {
        let url = self.operation_url(operation);
        tracing::debug!(%url, bytes = image.len(), "calling vision service");

        let response = self
            .client
            .post(&url)
            .query(query)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(|e| VisionError::network_error(&format!("Failed to call {}", operation), &e))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "vision service responded");
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, operation, "failed to read error response body");
                String::new()
            },
        };
        tracing::warn!(status = status.as_u16(), operation, "vision service returned an error");
        Err(parse_service_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl VisionService for VisionClient {
    async fn analyze_image(
        &self,
        image: Bytes,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult> {
        let feature_list = features
            .iter()
            .map(|f| f.as_query_value())
            .collect::<Vec<_>>()
            .join(",");

        let mut query = vec![("visualFeatures", feature_list)];
        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }

        let response = self.post_image("analyze", &query, image).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| VisionError::network_error("Failed to read analysis response", &e))?;

        let result: AnalysisResult = serde_json::from_slice(&body)?;
        tracing::info!(
            request_id = result.request_id.as_deref().unwrap_or("-"),
            objects = result.objects.len(),
            tags = result.tags.len(),
            "analysis completed"
        );
        Ok(result)
    }

    async fn generate_thumbnail(
        &self,
        request: ThumbnailRequest,
        image: Bytes,
    ) -> Result<ByteStream> {
        let query = [
            ("width", request.width.to_string()),
            ("height", request.height.to_string()),
            ("smartCropping", request.smart_cropping.to_string()),
        ];

        let response = self.post_image("generateThumbnail", &query, image).await?;
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }
}

/// Plain HTTP GET image retrieval
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    /// # Errors
    /// - Failed to create HTTP client
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        tracing::debug!(url, "fetching image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VisionError::network_error("Failed to fetch image", &e))?
            .error_for_status()
            .map_err(|e| VisionError::network_error("Image host returned an error", &e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VisionError::network_error("Failed to read image body", &e))?;

        tracing::debug!(url, bytes = bytes.len(), "image fetched");
        Ok(bytes)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Turn a non-success response body into a [`VisionError::Service`].
///
/// Accepts both `{"error": {"code", "message"}}` and the flat
/// `{"code", "message"}` shape; anything else keeps the raw body as message.
#[must_use]
pub fn parse_service_error(status: u16, body: &str) -> VisionError {
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(inner), ..
        }) => (inner.code, inner.message),
        Ok(ErrorEnvelope { code, message, .. }) => (code, message),
        Err(_) => (None, None),
    };

    let message = message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("HTTP status {}", status)
        } else {
            trimmed.to_string()
        }
    });

    VisionError::Service {
        status,
        code,
        message,
    }
}
