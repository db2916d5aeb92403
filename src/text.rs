//! Font loading and text rendering.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{Error, Result};

/// A TrueType/OpenType font loaded at a fixed size.
pub struct SizedFont {
    font: FontVec,
    scale: PxScale,
}

impl std::fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedFont")
            .field("scale", &(self.scale.x, self.scale.y))
            .finish_non_exhaustive()
    }
}

impl SizedFont {
    /// Load a font file and size it so one em spans `size` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFontSize`] unless `size` is finite and positive,
    /// [`Error::FontLoad`] if the file cannot be read and
    /// [`Error::InvalidFont`] if its contents are not a parseable font.
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::InvalidFontSize { size });
        }
        let data = std::fs::read(path).map_err(|source| Error::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| Error::InvalidFont {
            path: path.to_path_buf(),
        })?;

        let scale = em_scale(&font, size);
        log::trace!("loaded font {} at {size}px/em", path.display());
        Ok(Self { font, scale })
    }

    /// Pixel width and height of `text` when drawn with this font.
    ///
    /// Both are measured from the draw origin to the far edge of the ink, so
    /// text drawn at `(x, y)` ends just before `x + width` and `y + height`.
    /// Descenders are included.
    #[must_use]
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0f32;
        let mut last: Option<GlyphId> = None;
        let (mut right, mut bottom) = (0.0f32, 0.0f32);

        // same caret and kerning walk as draw_text_mut
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                if let Some(last) = last {
                    caret += scaled.kern(id, last);
                }
                last = Some(id);
                let bounds = outlined.px_bounds();
                right = right.max(bounds.max.x);
                bottom = bottom.max(bounds.max.y);
            }
        }

        (to_px(right), to_px(bottom))
    }

    /// Draw `text` onto `canvas` with its top-left at `(x, y)`.
    ///
    /// Glyph pixels falling outside the canvas are dropped, so negative
    /// coordinates are allowed.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, fill: Rgba<u8>) {
        draw_text_mut(canvas, fill, x, y, self.scale, &self.font, text);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(extent: f32) -> u32 {
    extent.ceil().max(0.0) as u32
}

/// Convert an em size in pixels to the line-height based [`PxScale`].
///
/// `PxScale` measures ascent-to-descent, while font sizes are usually given
/// per em.
fn em_scale(font: &FontVec, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(size),
    }
}
