//! Shared test doubles and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use vision_analyze::{
    AdultInfo, AnalysisResult, BoundingRect, ByteStream, Caption, Category, CategoryDetail,
    DetectedObject, ImageSource, Landmark, Result, ThumbnailRequest, VisionError, VisionService,
    VisualFeature,
};

/// Image source serving fixed bytes, or failing every fetch
pub struct MockImageSource {
    image: Bytes,
    fail: bool,
    fetches: AtomicUsize,
}

impl MockImageSource {
    pub fn serving(image: Vec<u8>) -> Self {
        Self {
            image: Bytes::from(image),
            fail: false,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            image: Bytes::new(),
            fail: true,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Address of the served buffer, for checking that it was not copied
    pub fn buffer_addr(&self) -> usize {
        self.image.as_ptr() as usize
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn fetch(&self, _url: &str) -> Result<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(VisionError::Network("simulated connection reset".to_string()));
        }
        Ok(self.image.clone())
    }
}

/// Vision service answering with canned results
pub struct MockVisionService {
    result: AnalysisResult,
    thumbnail: Vec<u8>,
    thumbnail_status: Option<u16>,
    requested_features: Mutex<Vec<VisualFeature>>,
    thumbnail_requests: Mutex<Vec<ThumbnailRequest>>,
    received_bytes: Mutex<Vec<usize>>,
    received_addrs: Mutex<Vec<usize>>,
}

impl MockVisionService {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            thumbnail: b"\xFF\xD8thumbnail-bytes\xFF\xD9".to_vec(),
            thumbnail_status: None,
            requested_features: Mutex::new(Vec::new()),
            thumbnail_requests: Mutex::new(Vec::new()),
            received_bytes: Mutex::new(Vec::new()),
            received_addrs: Mutex::new(Vec::new()),
        }
    }

    /// Make thumbnail requests fail with the given HTTP status
    pub fn with_thumbnail_status(mut self, status: u16) -> Self {
        self.thumbnail_status = Some(status);
        self
    }

    pub fn thumbnail_bytes(&self) -> &[u8] {
        &self.thumbnail
    }

    pub fn requested_features(&self) -> Vec<VisualFeature> {
        self.requested_features.lock().unwrap().clone()
    }

    pub fn thumbnail_requests(&self) -> Vec<ThumbnailRequest> {
        self.thumbnail_requests.lock().unwrap().clone()
    }

    pub fn received_bytes(&self) -> Vec<usize> {
        self.received_bytes.lock().unwrap().clone()
    }

    pub fn received_addrs(&self) -> Vec<usize> {
        self.received_addrs.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionService for MockVisionService {
    async fn analyze_image(
        &self,
        image: Bytes,
        features: &[VisualFeature],
    ) -> Result<AnalysisResult> {
        self.received_bytes.lock().unwrap().push(image.len());
        self.received_addrs.lock().unwrap().push(image.as_ptr() as usize);
        self.requested_features
            .lock()
            .unwrap()
            .extend_from_slice(features);
        Ok(self.result.clone())
    }

    async fn generate_thumbnail(
        &self,
        request: ThumbnailRequest,
        image: Bytes,
    ) -> Result<ByteStream> {
        self.received_bytes.lock().unwrap().push(image.len());
        self.thumbnail_requests.lock().unwrap().push(request);
        if let Some(status) = self.thumbnail_status {
            return Err(VisionError::Service {
                status,
                code: Some("InvalidRequest".to_string()),
                message: "Width or height is out of range.".to_string(),
            });
        }
        Ok(Box::new(Cursor::new(self.thumbnail.clone())))
    }
}

/// PNG-encoded solid image
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

pub fn caption(text: &str, confidence: f64) -> Caption {
    Caption {
        text: text.to_string(),
        confidence,
    }
}

pub fn landmark(name: &str, confidence: f64) -> Landmark {
    Landmark {
        name: name.to_string(),
        confidence,
    }
}

pub fn category(name: &str, score: f64, landmarks: Option<Vec<Landmark>>) -> Category {
    Category {
        name: name.to_string(),
        score,
        detail: landmarks.map(|landmarks| CategoryDetail {
            landmarks: Some(landmarks),
            celebrities: None,
        }),
    }
}

pub fn object(label: &str, x: i32, y: i32, w: i32, h: i32) -> DetectedObject {
    DetectedObject {
        label: label.to_string(),
        confidence: 0.75,
        rectangle: BoundingRect { x, y, w, h },
        parent: None,
    }
}

pub fn adult(adult: bool, racy: bool, gory: bool) -> AdultInfo {
    AdultInfo {
        is_adult_content: adult,
        is_racy_content: racy,
        is_gory_content: gory,
        ..AdultInfo::default()
    }
}
