//! Stamp a legible text watermark onto images.
//!
//! The watermark goes in the bottom-right corner, 10 pixels in from each edge,
//! drawn at roughly 31% opacity. Its color depends on how bright the image is:
//! when the mean grayscale value exceeds 127 the text is white, otherwise black.
//! The result is always returned as PNG bytes.
//!
//! # Quick Start
//!
//! ```no_run
//! use text_watermark::Watermarker;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let png = Watermarker::new(bytes, "Sample").place_watermark().unwrap();
//! std::fs::write("photo_watermarked.png", png).unwrap();
//! ```
//!
//! # Options
//!
//! The font is read from `Arial.ttf` in the working directory unless
//! configured otherwise.
//!
//! ```no_run
//! use text_watermark::{WatermarkOptions, Watermarker};
//!
//! let opts = WatermarkOptions {
//!     font_path: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".into(),
//!     ..WatermarkOptions::default()
//! };
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let wm = Watermarker::with_options(bytes, "Sample", opts);
//! println!("text color: {:?}", wm.text_color().unwrap());
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod brightness;
mod engine;
pub mod error;
pub mod text;

pub use brightness::{is_light, select_text_color, Color};
pub use engine::{
    decode_rgba, default_output_path, encode_png, text_origin, watermark_file, WatermarkOptions,
    Watermarker, DEFAULT_FONT_PATH,
};
pub use error::{Error, Result};
