//! Renders detection boxes onto an image.

use crate::constants::draw::{
    BOX_THICKNESS, FALLBACK_CHAR_WIDTH, FONT_SIZE, LABEL_HEIGHT, PALETTE,
    SYSTEM_FONT_CANDIDATES, TEXT_PADDING,
};
use crate::error::{Error, Result};
use crate::inference::BoundingBox;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, warn};

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Draws boxes and `<label> <score>` tabs.
///
/// Without a font the tabs are drawn empty.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Annotator {
    /// Load the configured font, or probe common system locations when none is set.
    ///
    /// A configured font that fails to load is an error. A failed probe only
    /// logs a warning.
    pub fn load(font: Option<&Path>) -> Result<Self> {
        if let Some(path) = font {
            let font = read_font(path)?;
            debug!("Using label font {}", path.display());
            return Ok(Self { font: Some(font) });
        }

        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match read_font(path) {
                Ok(font) => {
                    debug!("Using system font {}", path.display());
                    return Ok(Self { font: Some(font) });
                }
                Err(e) => debug!("Skipping font candidate: {e}"),
            }
        }

        warn!("No label font found; detection boxes will be drawn without text. Set detection.font in the config file");
        Ok(Self::without_font())
    }

    /// An annotator that draws boxes only.
    pub fn without_font() -> Self {
        Self { font: None }
    }

    /// Return a copy of `image` with every box drawn on it.
    pub fn annotate(&self, image: &RgbImage, boxes: &[BoundingBox]) -> RgbImage {
        let mut canvas = image.clone();
        for bbox in boxes {
            self.draw_box(&mut canvas, bbox);
        }
        canvas
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_box(&self, canvas: &mut RgbImage, bbox: &BoundingBox) {
        let color = color_for(bbox.class_id);
        let x = bbox.x_min.round() as i32;
        let y = bbox.y_min.round() as i32;
        let width = (bbox.x_max - bbox.x_min).round().max(1.0) as u32;
        let height = (bbox.y_max - bbox.y_min).round().max(1.0) as u32;

        for inset in 0..BOX_THICKNESS {
            let w = width.saturating_sub(2 * inset.unsigned_abs());
            let h = height.saturating_sub(2 * inset.unsigned_abs());
            if w == 0 || h == 0 {
                break;
            }
            draw_hollow_rect_mut(canvas, Rect::at(x + inset, y + inset).of_size(w, h), color);
        }

        let text = format!("{} {:.2}", bbox.label, bbox.score);
        let tab_width = self.text_width(&text) + 2 * TEXT_PADDING.unsigned_abs();

        // Tab sits above the box, or inside it when the box touches the top edge.
        let tab_height = LABEL_HEIGHT.cast_signed();
        let tab_y = if y >= tab_height { y - tab_height } else { y };
        draw_filled_rect_mut(
            canvas,
            Rect::at(x, tab_y).of_size(tab_width.max(1), LABEL_HEIGHT),
            color,
        );

        if let Some(font) = &self.font {
            draw_text_mut(
                canvas,
                TEXT_COLOR,
                x + TEXT_PADDING,
                tab_y + TEXT_PADDING,
                PxScale::from(FONT_SIZE),
                font,
                &text,
            );
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn text_width(&self, text: &str) -> u32 {
        match &self.font {
            Some(font) => text_size(PxScale::from(FONT_SIZE), font, text).0,
            None => (text.chars().count() as f32 * FALLBACK_CHAR_WIDTH) as u32,
        }
    }
}

fn read_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontVec::try_from_vec(bytes).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn color_for(class_id: usize) -> Rgb<u8> {
    Rgb(PALETTE[class_id % PALETTE.len()])
}

/// Write an annotated image as PNG.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
