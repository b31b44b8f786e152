use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// One face-mesh landmark in normalized frame coordinates (0.0..=1.0 inside the frame).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// External face detector. Returns the landmarks of the single tracked face,
/// or `None` when nobody is in view.
pub trait FaceLocator: Send + Sync {
    fn locate(&self, frame: &DynamicImage) -> Option<Vec<Landmark>>;
}

/// Pixel-space crop rectangle, always inside the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Padded face region cut out of a frame, ready to be encoded and classified.
#[derive(Debug, Clone)]
pub struct FaceCrop {
    pub bounds: FaceBox,
    pub image: RgbImage,
}

impl FaceCrop {
    pub fn to_jpeg(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .context("failed to encode face crop as jpeg")?;
        Ok(buffer.into_inner())
    }
}

/// Bounding box of `landmarks` scaled to a `width`x`height` frame, grown by
/// `padding` pixels on every side and clamped to the frame edges.
pub fn locate_face_box(
    landmarks: &[Landmark],
    width: u32,
    height: u32,
    padding: u32,
) -> Option<FaceBox> {
    if landmarks.is_empty() || width == 0 || height == 0 {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for lm in landmarks {
        let (x, y) = (lm.x as f64, lm.y as f64);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let (frame_w, frame_h) = (width as f64, height as f64);
    let pad = padding as f64;

    let left = (min_x * frame_w - pad).floor().clamp(0.0, frame_w);
    let top = (min_y * frame_h - pad).floor().clamp(0.0, frame_h);
    let right = (max_x * frame_w + pad).ceil().clamp(0.0, frame_w);
    let bottom = (max_y * frame_h + pad).ceil().clamp(0.0, frame_h);

    let box_w = right - left;
    let box_h = bottom - top;
    if box_w <= 0.0 || box_h <= 0.0 {
        return None;
    }

    Some(FaceBox {
        x: left as u32,
        y: top as u32,
        width: box_w as u32,
        height: box_h as u32,
    })
}

/// Cuts the padded face region out of `frame`. `None` means "skip this cycle":
/// either no face was detected or the region collapsed to nothing.
pub fn extract_face(
    frame: &DynamicImage,
    landmarks: Option<&[Landmark]>,
    padding: u32,
) -> Option<FaceCrop> {
    let landmarks = landmarks?;
    let bounds = locate_face_box(landmarks, frame.width(), frame.height(), padding)?;
    let image = frame
        .crop_imm(bounds.x, bounds.y, bounds.width, bounds.height)
        .to_rgb8();

    Some(FaceCrop { bounds, image })
}
