use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use std::fmt;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const PNG_IHDR_COLOR_TYPE_OFFSET: usize = 25;
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// How the source stores its pixels, as far as transparency is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Opaque,
    Alpha,
    Palette,
    GrayscaleAlpha,
}

impl ColorMode {
    /// The decoder expands indexed PNGs to RGB(A), so the palette tag is read from the IHDR chunk of the encoded bytes.
    pub fn detect(format: ImageFormat, encoded: &[u8], image: &DynamicImage) -> Self {
        if format == ImageFormat::Png && is_indexed_png(encoded) {
            return ColorMode::Palette;
        }

        let color_type = image.color();
        match (color_type.has_alpha(), color_type.has_color()) {
            (true, true) => ColorMode::Alpha,
            (true, false) => ColorMode::GrayscaleAlpha,
            (false, _) => ColorMode::Opaque,
        }
    }

    pub fn is_transparency_capable(self) -> bool {
        self != ColorMode::Opaque
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Opaque => "opaque",
            ColorMode::Alpha => "alpha",
            ColorMode::Palette => "palette",
            ColorMode::GrayscaleAlpha => "grayscale-with-alpha",
        };
        f.write_str(name)
    }
}

fn is_indexed_png(encoded: &[u8]) -> bool {
    encoded.len() > PNG_IHDR_COLOR_TYPE_OFFSET
        && encoded.starts_with(&PNG_SIGNATURE)
        && &encoded[12..16] == b"IHDR"
        && encoded[PNG_IHDR_COLOR_TYPE_OFFSET] == PNG_COLOR_TYPE_INDEXED
}

/// Composites transparency-capable images over an opaque white canvas of the same size.
/// Opaque images are returned untouched.
pub fn flatten_onto_white(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    match mode {
        ColorMode::Opaque => image,
        ColorMode::Alpha | ColorMode::Palette | ColorMode::GrayscaleAlpha => {
            let rgba = image.into_rgba8();
            let (width, height) = rgba.dimensions();

            let mut background = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
            for (canvas_pixel, source_pixel) in background.pixels_mut().zip(rgba.pixels()) {
                let Rgba([red, green, blue, alpha]) = *source_pixel;
                *canvas_pixel = Rgb([blend_over_white(red, alpha), blend_over_white(green, alpha), blend_over_white(blue, alpha)]);
            }

            DynamicImage::ImageRgb8(background)
        }
    }
}

fn blend_over_white(channel: u8, alpha: u8) -> u8 {
    let channel = u32::from(channel);
    let alpha = u32::from(alpha);

    ((channel * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}
