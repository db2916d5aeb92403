//! Brightness measurement and text color selection.
//!
//! An image is "light" when the mean of its 8-bit grayscale intensities is
//! strictly greater than a threshold (127 by default). Light images get white
//! text, everything else keeps the dark default.

use image::{GrayImage, Luma};

use crate::error::{Error, Result};

/// Default brightness threshold on the 0-255 scale.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// An RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Near-black, the default text color.
    pub const DARK: Self = Self::new(0, 0, 0);
    /// Near-white, used on light images.
    pub const LIGHT: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as an RGBA pixel with the given alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Pick the watermark text color from a brightness verdict.
///
/// Only ever returns [`Color::LIGHT`] or [`Color::DARK`].
#[must_use]
pub const fn select_text_color(is_light: bool) -> Color {
    if is_light {
        Color::LIGHT
    } else {
        Color::DARK
    }
}

/// Decode encoded image bytes into a single-channel 8-bit raster.
///
/// The container format is sniffed from the leading magic bytes. Alpha, if
/// present, is ignored.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a decodable image.
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage> {
    let rgb = image::load_from_memory(bytes)
        .map_err(Error::Decode)?
        .to_rgb8();

    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (dst, src) in gray.pixels_mut().zip(rgb.pixels()) {
        *dst = Luma([luma(src[0], src[1], src[2])]);
    }
    Ok(gray)
}

/// BT.601 luma in 14-bit fixed point, rounded.
///
/// The weights sum to exactly `1 << 14`, so a neutral gray maps to itself.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    let y = (R * u32::from(r) + G * u32::from(g) + B * u32::from(b) + (1 << (SHIFT - 1))) >> SHIFT;
    // y <= 255 since the weights sum to 1 << SHIFT
    #[allow(clippy::cast_possible_truncation)]
    {
        y as u8
    }
}

/// Arithmetic mean of all pixel intensities, on the 0-255 scale.
///
/// An empty raster has mean 0.
#[must_use]
pub fn mean_intensity(image: &GrayImage) -> f64 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = image.as_raw().iter().map(|&v| u64::from(v)).sum();
    #[allow(clippy::cast_precision_loss)]
    {
        sum as f64 / count as f64
    }
}

/// Returns `true` if the encoded image is light.
///
/// Light means the grayscale mean strictly exceeds `threshold`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a decodable image.
pub fn is_light(bytes: &[u8], threshold: u8) -> Result<bool> {
    let gray = decode_grayscale(bytes)?;
    let mean = mean_intensity(&gray);
    let light = mean > f64::from(threshold);
    log::debug!(
        "brightness: {}x{} mean={mean:.2} threshold={threshold} light={light}",
        gray.width(),
        gray.height()
    );
    Ok(light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use proptest::prelude::*;
    use std::io::Cursor;

    fn solid_png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn luma_preserves_neutral_gray() {
        for v in [0u8, 1, 127, 128, 200, 255] {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn luma_weights_green_over_red_over_blue() {
        let r = luma(255, 0, 0);
        let g = luma(0, 255, 0);
        let b = luma(0, 0, 255);
        assert!(g > r && r > b, "r={r} g={g} b={b}");
        assert_eq!(r, 76);
        assert_eq!(g, 150);
        assert_eq!(b, 29);
    }

    #[test]
    fn mean_of_empty_raster_is_zero() {
        assert!(mean_intensity(&GrayImage::new(0, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_of_half_black_half_white() {
        let mut img = GrayImage::new(4, 2);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = Luma([if x < 2 { 0 } else { 255 }]);
        }
        assert!((mean_intensity(&img) - 127.5).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_light(&solid_png(8, 8, 127), DEFAULT_THRESHOLD).unwrap());
        assert!(is_light(&solid_png(8, 8, 128), DEFAULT_THRESHOLD).unwrap());
    }

    #[test]
    fn white_is_light_and_black_is_not() {
        assert!(is_light(&solid_png(16, 16, 255), DEFAULT_THRESHOLD).unwrap());
        assert!(!is_light(&solid_png(16, 16, 0), DEFAULT_THRESHOLD).unwrap());
    }

    #[test]
    fn measurement_is_repeatable() {
        let bytes = solid_png(20, 10, 180);
        let first = is_light(&bytes, DEFAULT_THRESHOLD).unwrap();
        let second = is_light(&bytes, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 0]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        assert!(is_light(&buf, DEFAULT_THRESHOLD).unwrap());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = is_light(b"definitely not an image", DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn color_selection_is_binary() {
        assert_eq!(select_text_color(true), Color::new(255, 255, 255));
        assert_eq!(select_text_color(false), Color::new(0, 0, 0));
    }

    proptest! {
        #[test]
        fn solid_gray_is_light_iff_above_threshold(value in any::<u8>(), threshold in any::<u8>()) {
            let bytes = solid_png(3, 3, value);
            prop_assert_eq!(is_light(&bytes, threshold).unwrap(), value > threshold);
        }
    }
}
