//! Image I/O operations service
//!
//! Keeps decoding, encoding and file writes out of the stage orchestration.

use crate::error::{Result, VisionError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Service for handling image decoding and output file writes
pub struct ImageIOService;

impl ImageIOService {
    /// Decode an image from raw bytes, detecting the format from content
    ///
    /// # Errors
    /// - Unknown or corrupt image data
    pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(data).map_err(|e| {
            VisionError::processing(format!(
                "Failed to decode image ({} bytes): {}",
                data.len(),
                e
            ))
        })
    }

    /// Encode `image` as JPEG and write it to `path`, replacing any existing file
    ///
    /// # Errors
    /// - Output directory cannot be created
    /// - File cannot be created or written
    /// - JPEG encoding failure
    pub fn save_jpeg<P: AsRef<Path>>(image: &RgbImage, path: P, quality: u8) -> Result<()> {
        let path_ref = path.as_ref();
        Self::ensure_parent_dir(path_ref)?;

        let file = std::fs::File::create(path_ref)
            .map_err(|e| VisionError::file_io_error("create output file", path_ref, &e))?;
        let mut writer = std::io::BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, quality.min(100)).encode_image(image)?;

        std::io::Write::flush(&mut writer)
            .map_err(|e| VisionError::file_io_error("write output file", path_ref, &e))?;

        tracing::debug!(path = %path_ref.display(), quality, "saved JPEG");
        Ok(())
    }

    /// Copy an async byte stream into `path`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// - Output directory cannot be created
    /// - Reading the stream or writing the file fails
    pub async fn write_stream<R, P>(reader: &mut R, path: P) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
        P: AsRef<Path>,
    {
        let path_ref = path.as_ref();
        Self::ensure_parent_dir(path_ref)?;

        let mut file = tokio::fs::File::create(path_ref)
            .await
            .map_err(|e| VisionError::file_io_error("create output file", path_ref, &e))?;

        let written = tokio::io::copy(reader, &mut file)
            .await
            .map_err(|e| VisionError::file_io_error("write output file", path_ref, &e))?;
        file.flush()
            .await
            .map_err(|e| VisionError::file_io_error("flush output file", path_ref, &e))?;

        tracing::debug!(path = %path_ref.display(), bytes = written, "stream written");
        Ok(written)
    }

    fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    VisionError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_image() {
        let image = ImageIOService::decode_image(&encoded_png(8, 6)).unwrap();
        assert_eq!((image.width(), image.height()), (8, 6));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = ImageIOService::decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, VisionError::Processing(_)));
        assert!(err.to_string().contains("23 bytes"));
    }

    #[test]
    fn test_save_jpeg_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("objects.jpg");
        let image = RgbImage::from_pixel(16, 12, Rgb([0, 255, 255]));

        ImageIOService::save_jpeg(&image, &path, 90).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (16, 12));
    }

    #[tokio::test]
    async fn test_write_stream_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("thumbnail.jpg");
        std::fs::write(&path, b"old content that is longer").unwrap();

        let mut reader = Cursor::new(b"new".to_vec());
        let written = ImageIOService::write_stream(&mut reader, &path).await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
