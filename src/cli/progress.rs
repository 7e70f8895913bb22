//! Terminal spinner shown while the vision service is working

use crate::client::{ByteStream, VisionService};
use crate::error::Result;
use crate::models::{AnalysisResult, ThumbnailRequest, VisualFeature};
use async_trait::async_trait;
use bytes::Bytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Wraps a [`VisionService`] and shows a spinner on stderr during each call.
///
/// The spinner is cleared before the call returns so it never interleaves with
/// report lines on stdout.
pub(crate) struct SpinnerService<S> {
    inner: S,
}

impl<S> SpinnerService<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

#[async_trait]
impl<S: VisionService> VisionService for SpinnerService<S> {
    async fn analyze_image(
        &self,
        image: Bytes,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult> {
        let spinner = Self::spinner("analyzing");
        let result = self.inner.analyze_image(image, features).await;
        spinner.finish_and_clear();
        result
    }

    async fn generate_thumbnail(
        &self,
        request: ThumbnailRequest,
        image: Bytes,
    ) -> Result<ByteStream> {
        let spinner = Self::spinner("generating thumbnail");
        let result = self.inner.generate_thumbnail(request, image).await;
        spinner.finish_and_clear();
        result
    }
}
