//! Bounding-box annotation of detected objects
//!
//! Rectangles and labels are rasterized directly into an `RgbImage`. Labels use
//! a built-in 5x7 bitmap font (upper-case Latin letters, digits, Swedish
//! vowels and a little punctuation), scaled up by an integer factor.

use crate::models::{BoundingRect, DetectedObject};
use image::{DynamicImage, Rgb, RgbImage};

/// Glyph cell width in font pixels
const GLYPH_WIDTH: i64 = 5;
/// Glyph cell height in font pixels
const GLYPH_HEIGHT: i64 = 7;
/// Horizontal advance per character in font pixels
const GLYPH_ADVANCE: i64 = 6;

/// Colors and sizes used when drawing annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationStyle {
    pub stroke: Rgb<u8>,
    pub stroke_width: u32,
    pub text: Rgb<u8>,
    pub text_scale: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            stroke: Rgb([0, 255, 255]),
            stroke_width: 3,
            text: Rgb([0, 0, 0]),
            text_scale: 2,
        }
    }
}

/// Draw one rectangle and one label per detected object onto a copy of `image`
#[must_use]
pub fn annotate_objects(
    image: &DynamicImage,
    objects: &[DetectedObject],
    style: &AnnotationStyle,
) -> RgbImage {
    let mut canvas = image.to_rgb8();

    for object in objects {
        tracing::trace!(
            label = %object.label,
            x = object.rectangle.x,
            y = object.rectangle.y,
            w = object.rectangle.w,
            h = object.rectangle.h,
            "drawing object"
        );
        draw_rectangle(&mut canvas, object.rectangle, style.stroke, style.stroke_width);
        let (x, y) = label_origin(&canvas, object.rectangle, &object.label, style.text_scale);
        draw_label(&mut canvas, x, y, &object.label, style.text, style.text_scale);
    }

    canvas
}

/// Top-left corner of the label for `rect`.
///
/// The label sits at the rectangle's top-left corner, shifted just enough to
/// stay inside the image when the rectangle touches the right or bottom edge.
fn label_origin(image: &RgbImage, rect: BoundingRect, text: &str, scale: u32) -> (i64, i64) {
    let (width, height) = label_size(text, scale);
    let max_x = (i64::from(image.width()) - i64::from(width)).max(0);
    let max_y = (i64::from(image.height()) - i64::from(height)).max(0);
    (
        i64::from(rect.x).clamp(0, max_x),
        i64::from(rect.y).clamp(0, max_y),
    )
}

fn put_pixel_checked(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return;
    }
    image.put_pixel(x as u32, y as u32, color);
}

/// Outline `rect` with a pen of `width` pixels centered on the edge.
///
/// The right and bottom edges sit at `x + w` and `y + h`. Pixels outside the
/// image are skipped.
pub fn draw_rectangle(image: &mut RgbImage, rect: BoundingRect, color: Rgb<u8>, width: u32) {
    let left = i64::from(rect.x);
    let top = i64::from(rect.y);
    let right = left + i64::from(rect.w);
    let bottom = top + i64::from(rect.h);

    let width = i64::from(width.max(1));
    let before = (width - 1) / 2;
    let after = width - 1 - before;

    for offset in -before..=after {
        for x in (left - before)..=(right + after) {
            put_pixel_checked(image, x, top + offset, color);
            put_pixel_checked(image, x, bottom + offset, color);
        }
        for y in (top - before)..=(bottom + after) {
            put_pixel_checked(image, left + offset, y, color);
            put_pixel_checked(image, right + offset, y, color);
        }
    }
}

/// Render `text` with its top-left corner at (`x`, `y`).
///
/// Characters without a glyph advance the cursor without drawing.
pub fn draw_label(image: &mut RgbImage, x: i64, y: i64, text: &str, color: Rgb<u8>, scale: u32) {
    let scale = i64::from(scale.max(1));
    let mut cursor = x;

    for ch in text.chars().flat_map(char::to_uppercase) {
        if let Some(rows) = glyph_bits(ch) {
            for (row, pattern) in (0_i64..).zip(rows) {
                for col in 0..GLYPH_WIDTH {
                    if (pattern >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            put_pixel_checked(
                                image,
                                cursor + col * scale + dx,
                                y + row * scale + dy,
                                color,
                            );
                        }
                    }
                }
            }
        }
        cursor += GLYPH_ADVANCE * scale;
    }
}

/// Pixel size of `text` rendered at `scale`
#[must_use]
pub fn label_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().flat_map(char::to_uppercase).count() as u32;
    let scale = scale.max(1);
    let width = if chars == 0 {
        0
    } else {
        (chars - 1) * GLYPH_ADVANCE as u32 * scale + GLYPH_WIDTH as u32 * scale
    };
    (width, GLYPH_HEIGHT as u32 * scale)
}

#[allow(clippy::too_many_lines)]
fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        'Å' => [0b00100, 0b01010, 0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
        'Ä' => [0b01010, 0b00000, 0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
        'Ö' => [0b01010, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}
