//! The watermarking pipeline.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::blending;
use crate::brightness::{self, Color, DEFAULT_THRESHOLD};
use crate::error::{Error, Result};
use crate::text::SizedFont;

/// Font file used when none is configured, resolved against the working directory.
pub const DEFAULT_FONT_PATH: &str = "Arial.ttf";

/// Options controlling watermark placement and appearance.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Font file, read when the watermark is rendered.
    pub font_path: PathBuf,
    /// Font size in pixels per em; must be finite and positive.
    pub font_size: f32,
    /// Inset from the right and bottom edges, in pixels.
    pub margin: u32,
    /// Alpha of the text fill (0-255).
    pub opacity: u8,
    /// Grayscale mean above which the image counts as light.
    pub threshold: u8,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: 30.0,
            margin: 10,
            opacity: 80,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Stamps a text watermark into the bottom-right corner of one image.
///
/// The text color is black, or white when the image is light. The
/// watermarker holds no mutable state, so `place_watermark` can be called
/// repeatedly and from several threads.
#[derive(Debug, Clone)]
pub struct Watermarker {
    image: Vec<u8>,
    text: String,
    options: WatermarkOptions,
}

impl Watermarker {
    /// Create a watermarker for encoded image bytes and a text, using default options.
    #[must_use]
    pub fn new(image: impl Into<Vec<u8>>, text: impl Into<String>) -> Self {
        Self::with_options(image, text, WatermarkOptions::default())
    }

    /// Create a watermarker with explicit options.
    #[must_use]
    pub fn with_options(
        image: impl Into<Vec<u8>>,
        text: impl Into<String>,
        options: WatermarkOptions,
    ) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
            options,
        }
    }

    /// The encoded source image.
    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// The watermark text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }

    /// Whether the source image is light at the configured threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the source bytes are not an image.
    pub fn is_light(&self) -> Result<bool> {
        brightness::is_light(&self.image, self.options.threshold)
    }

    /// The color the watermark text will be drawn in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the source bytes are not an image.
    pub fn text_color(&self) -> Result<Color> {
        Ok(brightness::select_text_color(self.is_light()?))
    }

    /// Composite the watermark and return the raster without encoding it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for undecodable input, [`Error::InvalidFontSize`],
    /// [`Error::FontLoad`] or [`Error::InvalidFont`] if the font cannot be used.
    pub fn compose(&self) -> Result<RgbaImage> {
        let mut base = decode_rgba(&self.image)?;
        let color = self.text_color()?;
        let (width, height) = base.dimensions();

        // transparent, but carrying the text color so anti-aliased edges blend toward it
        let mut overlay = RgbaImage::from_pixel(width, height, color.with_alpha(0));

        let font = SizedFont::load(&self.options.font_path, self.options.font_size)?;
        let text_box = font.measure(&self.text);
        let (x, y) = text_origin((width, height), text_box, self.options.margin);
        log::debug!(
            "watermark {:?}: color={color:?} box={}x{} origin=({x}, {y}) on {width}x{height}",
            self.text,
            text_box.0,
            text_box.1,
        );

        font.draw(
            &mut overlay,
            &self.text,
            x,
            y,
            color.with_alpha(self.options.opacity),
        );
        blending::alpha_composite(&mut base, &overlay)?;

        Ok(base)
    }

    /// Render the watermarked image as PNG bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Watermarker::compose`], plus [`Error::Image`] if PNG encoding fails.
    pub fn place_watermark(&self) -> Result<Vec<u8>> {
        let composed = self.compose()?;
        encode_png(composed)
    }
}

/// Decode encoded image bytes into an RGBA raster.
///
/// The format is sniffed from the magic bytes; any color mode is converted
/// to 8-bit RGBA.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a decodable image.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(Error::Decode)?;
    log::trace!(
        "decoded {} bytes as {}x{} {:?}",
        bytes.len(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.into_rgba8())
}

/// Top-left corner for text of size `text` in the bottom-right of an `image`.
///
/// `x = width - text_width - margin`, likewise for `y`. The result is not
/// clamped and goes negative when the text does not fit.
#[must_use]
pub fn text_origin(image: (u32, u32), text: (u32, u32), margin: u32) -> (i32, i32) {
    let axis = |extent: u32, size: u32| -> i32 {
        let v = i64::from(extent) - i64::from(size) - i64::from(margin);
        i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
    };
    (axis(image.0, text.0), axis(image.1, text.1))
}

/// Encode an RGBA raster as PNG bytes.
///
/// # Errors
///
/// Returns [`Error::Image`] if encoding fails.
pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    log::trace!("encoded {} PNG bytes", buf.len());
    Ok(buf)
}

/// Watermark the image at `input` and write the PNG result to `output`.
///
/// Missing parent directories of `output` are created.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading or writing fails, otherwise the errors of
/// [`Watermarker::place_watermark`].
pub fn watermark_file(
    input: &Path,
    output: &Path,
    text: &str,
    options: &WatermarkOptions,
) -> Result<()> {
    let bytes = std::fs::read(input)?;
    let png = Watermarker::with_options(bytes, text, options.clone()).place_watermark()?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, png)?;
    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.png"))
}
