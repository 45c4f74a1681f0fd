//! Image-to-tensor conversion for both models.

use crate::constants::{classification::CHANNELS, detection::PAD_VALUE};
use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array4;

/// Resize to `size`×`size` and scale channels to [0,1], as an NHWC batch of one.
///
/// The output shape is `[1, size, size, 3]`.
pub fn classifier_input(image: &RgbImage, size: u32) -> Result<Array4<f32>> {
    ensure_non_empty(image)?;

    let resized = imageops::resize(image, size, size, FilterType::CatmullRom);
    let side = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, CHANNELS));

    for (x, y, pixel) in resized.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            tensor[[0, y as usize, x as usize, c]] = f32::from(value) / 255.0;
        }
    }

    Ok(tensor)
}

/// Geometry of a letterbox transform, used to map boxes back to the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Uniform scale applied to the source image.
    pub scale: f32,
    /// Horizontal padding on the left, in model-input pixels.
    pub pad_x: f32,
    /// Vertical padding on the top, in model-input pixels.
    pub pad_y: f32,
    /// Source image width.
    pub source_width: u32,
    /// Source image height.
    pub source_height: u32,
}

impl Letterbox {
    /// Map a point from model-input coordinates to source coordinates, clamped to the image.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        let sx = ((x - self.pad_x) / self.scale).clamp(0.0, self.source_width as f32);
        let sy = ((y - self.pad_y) / self.scale).clamp(0.0, self.source_height as f32);
        (sx, sy)
    }
}

/// Fit the image into a `size`×`size` gray canvas keeping its aspect ratio.
///
/// Returns an NCHW batch of one (`[1, 3, size, size]`, values in [0,1]) and the
/// transform that produced it.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn letterbox_input(image: &RgbImage, size: u32) -> Result<(Array4<f32>, Letterbox)> {
    ensure_non_empty(image)?;

    let (width, height) = image.dimensions();
    let target = size as f32;
    let scale = (target / width as f32).min(target / height as f32);
    let new_width = ((width as f32 * scale).round() as u32).clamp(1, size);
    let new_height = ((height as f32 * scale).round() as u32).clamp(1, size);

    let resized = imageops::resize(image, new_width, new_height, FilterType::Triangle);
    let pad_x = (size - new_width) / 2;
    let pad_y = (size - new_height) / 2;

    let mut canvas = RgbImage::from_pixel(size, size, Rgb([PAD_VALUE; 3]));
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(pad_x),
        i64::from(pad_y),
    );

    let side = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, side, side));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            tensor[[0, c, y as usize, x as usize]] = f32::from(value) / 255.0;
        }
    }

    Ok((
        tensor,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
            source_width: width,
            source_height: height,
        },
    ))
}

fn ensure_non_empty(image: &RgbImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Inference {
            reason: format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                255,
            ])
        })
    }

    #[test]
    fn test_classifier_input_shape_and_range() {
        for (w, h) in [(1, 1), (50, 30), (224, 224), (640, 427), (13, 999)] {
            let tensor = classifier_input(&gradient(w, h), 224).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            assert!(
                tensor.iter().all(|v| (0.0..=1.0).contains(v)),
                "values out of range for {w}x{h}"
            );
        }
    }

    #[test]
    fn test_classifier_input_extremes() {
        let white = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let tensor = classifier_input(&white, 224).unwrap();
        assert!(tensor.iter().all(|&v| v == 1.0));

        let black = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let tensor = classifier_input(&black, 224).unwrap();
        assert!(tensor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_classifier_input_rejects_empty_image() {
        let empty = RgbImage::new(0, 0);
        assert!(classifier_input(&empty, 224).is_err());
    }

    #[test]
    fn test_letterbox_wide_image_pads_vertically() {
        let (tensor, lb) = letterbox_input(&gradient(200, 100), 64).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);
        assert_eq!(lb.pad_x, 0.0);
        assert_eq!(lb.pad_y, 16.0);
        assert!((lb.scale - 0.32).abs() < 1e-6);

        let pad = f32::from(PAD_VALUE) / 255.0;
        assert!((tensor[[0, 0, 0, 0]] - pad).abs() < 1e-6);
        assert!((tensor[[0, 2, 32, 32]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_letterbox_maps_back_into_bounds() {
        let (_, lb) = letterbox_input(&gradient(300, 120), 640).unwrap();

        let (x, y) = lb.to_source(lb.pad_x, lb.pad_y);
        assert!(x.abs() < 1e-3 && y.abs() < 1e-3);

        let (x, y) = lb.to_source(640.0, 640.0);
        assert!((x - 300.0).abs() < 1e-3);
        assert_eq!(y, 120.0);

        let (x, y) = lb.to_source(-50.0, -50.0);
        assert_eq!((x, y), (0.0, 0.0));
    }
}
