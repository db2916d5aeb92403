//! Alpha blending math for watermark compositing.
//!
//! The overlay is combined with the base image using the Porter-Duff "over"
//! operator on straight (non-premultiplied) alpha:
//!
//! `out_a = src_a + dst_a * (1 - src_a)`
//! `out_c = (src_c * src_a + dst_c * dst_a * (1 - src_a)) / out_a`
//!
//! Overlay pixels with alpha 0 leave the base untouched.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Below this output alpha the pixel is treated as fully transparent.
const MIN_OUT_ALPHA: f32 = 1.0 / 512.0;

/// Blend a single overlay pixel over a base pixel.
#[must_use]
pub fn over(base: Rgba<u8>, overlay: Rgba<u8>) -> Rgba<u8> {
    if overlay[3] == 0 {
        return base;
    }

    let src_a = f32::from(overlay[3]) / 255.0;
    let dst_a = f32::from(base[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a < MIN_OUT_ALPHA {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |src: u8, dst: u8| -> u8 {
        let value = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
        to_channel(value)
    };

    Rgba([
        blend(overlay[0], base[0]),
        blend(overlay[1], base[1]),
        blend(overlay[2], base[2]),
        to_channel(out_a * 255.0),
    ])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Composite `overlay` over `base` in-place.
///
/// Both rasters must have identical dimensions.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the sizes differ.
pub fn alpha_composite(base: &mut RgbaImage, overlay: &RgbaImage) -> Result<()> {
    if base.dimensions() != overlay.dimensions() {
        return Err(Error::DimensionMismatch {
            base: base.dimensions(),
            overlay: overlay.dimensions(),
        });
    }

    for (dst, src) in base.pixels_mut().zip(overlay.pixels()) {
        *dst = over(*dst, *src);
    }

    Ok(())
}
